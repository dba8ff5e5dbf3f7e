//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::assistant::{
    self, Assessment, AssistantConfig, DEFAULT_LIMIT, DEFAULT_SYMBOL, DataSource, MarketConfig,
};
use crate::domain::backtest::{BacktestConfig, BacktestResult, MAX_BARS, Outcome};
use crate::domain::config_validation::{validate_all, validate_limit};
use crate::domain::enrich::EnrichConfig;
use crate::domain::error::TacticalError;
use crate::domain::signal::RuleConfig;
use crate::domain::timeframe::{Timeframe, describe_span};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "tactical", about = "Short-horizon crypto signal assistant")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Market selection flags that override the `[market]` section.
#[derive(Args, Debug, Clone, Default)]
pub struct MarketOverrides {
    /// Trading pair, e.g. BTC/USDT
    #[arg(long)]
    pub symbol: Option<String>,
    /// Bar interval, e.g. 2m, 1h
    #[arg(long)]
    pub timeframe: Option<Timeframe>,
    /// Directory holding <SYMBOL>_<timeframe>.csv files
    #[arg(long)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read the current signal and score the rule over recent history
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        market: MarketOverrides,
        /// Write a Typst report, or the enriched series when the path ends in .csv
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score the UP rule over history and print the trade log
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        market: MarketOverrides,
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_BARS as u64))]
        horizon: Option<u64>,
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=MAX_BARS as u64))]
        warmup: Option<u64>,
    },
    /// Validate a configuration file and print the effective settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Signal {
            config,
            market,
            output,
        } => run_signal(&config, &market, output.as_deref()),
        Command::Backtest {
            config,
            market,
            horizon,
            warmup,
        } => run_backtest(&config, &market, horizon, warmup),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TacticalError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

/// Validate and read every section into an [`AssistantConfig`].
pub fn build_assistant_config(config: &dyn ConfigPort) -> Result<AssistantConfig, TacticalError> {
    validate_all(config)?;

    let defaults = AssistantConfig::default();
    let indicators = build_enrich_config(config, &defaults.indicators);

    let limit = config.get_int("market", "limit", DEFAULT_LIMIT as i64);
    validate_limit(limit, &indicators)?;

    let timeframe = config
        .get_string_or("market", "timeframe", &defaults.market.timeframe.to_string())
        .parse::<Timeframe>()
        .map_err(|e| TacticalError::config_invalid("market", "timeframe", e.to_string()))?;

    let source = match config.get_string_or("market", "source", "csv").as_str() {
        "binance" => DataSource::Binance,
        _ => DataSource::Csv,
    };

    let market = MarketConfig {
        symbol: config.get_string_or("market", "symbol", DEFAULT_SYMBOL),
        timeframe,
        limit: limit as usize,
        source,
        data_dir: config.get_string_or("market", "data_dir", &defaults.market.data_dir),
        base_url: config.get_string_or("market", "base_url", &defaults.market.base_url),
    };

    let rule = RuleConfig {
        oversold: config.get_double("rule", "oversold", defaults.rule.oversold),
        overbought: config.get_double("rule", "overbought", defaults.rule.overbought),
    };

    let backtest = BacktestConfig {
        horizon: config.get_int("backtest", "horizon", defaults.backtest.horizon as i64) as usize,
        warmup: config.get_int("backtest", "warmup", defaults.backtest.warmup as i64) as usize,
    };

    Ok(AssistantConfig {
        market,
        indicators,
        rule,
        backtest,
    })
}

fn build_enrich_config(config: &dyn ConfigPort, defaults: &EnrichConfig) -> EnrichConfig {
    let int = |key: &str, default: usize| config.get_int("indicators", key, default as i64) as usize;
    EnrichConfig {
        rsi_period: int("rsi_period", defaults.rsi_period),
        macd_fast: int("macd_fast", defaults.macd_fast),
        macd_slow: int("macd_slow", defaults.macd_slow),
        macd_signal: int("macd_signal", defaults.macd_signal),
        volume_window: int("volume_window", defaults.volume_window),
        volume_spike_mult: config.get_double(
            "indicators",
            "volume_spike_mult",
            defaults.volume_spike_mult,
        ),
    }
}

pub fn apply_overrides(
    market: &mut MarketConfig,
    overrides: &MarketOverrides,
) -> Result<(), TacticalError> {
    if let Some(symbol) = &overrides.symbol {
        if symbol.trim().is_empty() {
            return Err(TacticalError::config_invalid(
                "market",
                "symbol",
                "symbol must not be empty",
            ));
        }
        market.symbol = symbol.trim().to_string();
    }
    if let Some(timeframe) = overrides.timeframe {
        market.timeframe = timeframe;
    }
    if let Some(data_dir) = &overrides.data_dir {
        market.data_dir = data_dir.clone();
    }
    Ok(())
}

pub fn open_data_port(market: &MarketConfig) -> Result<Box<dyn MarketDataPort>, TacticalError> {
    match market.source {
        DataSource::Csv => Ok(Box::new(CsvAdapter::new(PathBuf::from(&market.data_dir)))),
        #[cfg(feature = "binance")]
        DataSource::Binance => {
            use crate::adapters::binance_adapter::BinanceAdapter;
            Ok(Box::new(BinanceAdapter::new(&market.base_url)?))
        }
        #[cfg(not(feature = "binance"))]
        DataSource::Binance => Err(TacticalError::DataSource {
            reason: "binance feature is required for source = binance".into(),
        }),
    }
}

/// Pick the report writer from the output file extension.
pub fn select_report(output: &Path, template_path: Option<PathBuf>) -> Box<dyn ReportPort> {
    let is_csv = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(CsvReportAdapter)
    } else {
        Box::new(TypstReportAdapter::new(template_path))
    }
}

fn fetch_and_assess(config: &AssistantConfig) -> Result<Assessment, TacticalError> {
    let market = &config.market;
    let data_port = open_data_port(market)?;
    info!(
        symbol = %market.symbol,
        timeframe = %market.timeframe,
        limit = market.limit,
        "fetching market data"
    );
    let series = data_port.fetch_series(&market.symbol, market.timeframe, market.limit)?;
    if series.len() < market.limit {
        warn!(
            bars = series.len(),
            requested = market.limit,
            "data source returned fewer bars than requested"
        );
    }
    assistant::assess(&series, config)
}

fn print_backtest_summary(result: &BacktestResult) {
    println!("Executed {} historical trades.", result.entries);
    println!("Win Rate: {:.2}%", result.win_rate * 100.0);
}

fn run_signal(
    config_path: &Path,
    overrides: &MarketOverrides,
    output: Option<&Path>,
) -> Result<(), TacticalError> {
    let adapter = load_config(config_path)?;
    let mut config = build_assistant_config(&adapter)?;
    apply_overrides(&mut config.market, overrides)?;

    let assessment = fetch_and_assess(&config)?;

    println!("{}", assessment.headline());
    print_backtest_summary(&assessment.backtest);

    if let Some(output) = output {
        let template_path = adapter
            .get_string("report", "template_path")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        select_report(output, template_path).write(&assessment, &config, output)?;
        println!("Report written to: {}", output.display());
    }
    Ok(())
}

fn run_backtest(
    config_path: &Path,
    overrides: &MarketOverrides,
    horizon: Option<u64>,
    warmup: Option<u64>,
) -> Result<(), TacticalError> {
    let adapter = load_config(config_path)?;
    let mut config = build_assistant_config(&adapter)?;
    apply_overrides(&mut config.market, overrides)?;
    if let Some(horizon) = horizon {
        config.backtest.horizon = horizon as usize;
    }
    if let Some(warmup) = warmup {
        config.backtest.warmup = warmup as usize;
    }

    let assessment = fetch_and_assess(&config)?;
    let result = &assessment.backtest;

    println!(
        "{} {}: UP rule over {} bars, horizon {} bars ({})",
        assessment.series.symbol(),
        assessment.series.timeframe(),
        assessment.series.len(),
        assessment.horizon,
        describe_span(assessment.forecast_window())
    );
    for trade in &result.trades {
        let label = match trade.outcome {
            Outcome::Win => "WIN",
            Outcome::Loss => "LOSS",
        };
        println!(
            "  {}  {:>12.2} -> {:>12.2}  {}",
            trade.timestamp.format("%Y-%m-%d %H:%M"),
            trade.entry_close,
            trade.exit_close,
            label
        );
    }
    print_backtest_summary(result);
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TacticalError> {
    let adapter = load_config(config_path)?;
    let config = build_assistant_config(&adapter)?;
    let market = &config.market;
    let ind = &config.indicators;

    println!("[market]");
    println!("  symbol:     {}", market.symbol);
    println!("  timeframe:  {}", market.timeframe);
    println!("  limit:      {}", market.limit);
    match market.source {
        DataSource::Csv => println!("  source:     csv ({})", market.data_dir),
        DataSource::Binance => println!("  source:     binance ({})", market.base_url),
    }
    println!("[indicators]");
    println!("  rsi:        {}", ind.rsi_period);
    println!(
        "  macd:       {}/{}/{}",
        ind.macd_fast, ind.macd_slow, ind.macd_signal
    );
    println!(
        "  volume:     window {}, spike > {}x average",
        ind.volume_window, ind.volume_spike_mult
    );
    println!("  warm-up:    {} bars", ind.warmup());
    println!("[rule]");
    println!(
        "  oversold:   {}  overbought: {}",
        config.rule.oversold, config.rule.overbought
    );
    println!("[backtest]");
    println!(
        "  horizon:    {} bars ({})",
        config.backtest.horizon,
        describe_span(market.timeframe.span(config.backtest.horizon))
    );
    println!("  warmup:     {}", config.backtest.warmup);
    println!("\nConfiguration is valid.");
    Ok(())
}
