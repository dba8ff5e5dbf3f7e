//! The end-to-end assessment: enrich a series, read the latest signal and
//! score the rule over the same history.

use chrono::TimeDelta;
use tracing::info;

use crate::domain::backtest::{self, BacktestConfig, BacktestResult};
use crate::domain::enrich::{self, EnrichConfig, EnrichedSeries};
use crate::domain::error::TacticalError;
use crate::domain::ohlcv::Series;
use crate::domain::signal::{self, RuleConfig, Signal};
use crate::domain::timeframe::{Timeframe, describe_span};

pub const DEFAULT_SYMBOL: &str = "BTC/USDT";
pub const DEFAULT_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Csv,
    Binance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketConfig {
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Number of most recent bars to fetch.
    pub limit: usize,
    pub source: DataSource,
    pub data_dir: String,
    pub base_url: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            timeframe: Timeframe::default(),
            limit: DEFAULT_LIMIT,
            source: DataSource::Csv,
            data_dir: "data".to_string(),
            base_url: "https://api.binance.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantConfig {
    pub market: MarketConfig,
    pub indicators: EnrichConfig,
    pub rule: RuleConfig,
    pub backtest: BacktestConfig,
}

#[derive(Debug, Clone)]
pub struct Assessment {
    pub series: EnrichedSeries,
    pub signal: Signal,
    pub backtest: BacktestResult,
    pub horizon: usize,
}

impl Assessment {
    /// Wall-clock time covered by the backtest horizon.
    pub fn forecast_window(&self) -> TimeDelta {
        self.series.timeframe().span(self.horizon)
    }

    /// One-line reading of the current signal.
    pub fn headline(&self) -> String {
        let when = self.signal.timestamp.format("%Y-%m-%d %H:%M:%S");
        match self.signal.direction() {
            Some(_) => format!(
                "[{}] {} is likely to go {} in the next {}",
                when,
                self.series.symbol(),
                self.signal.kind,
                describe_span(self.forecast_window())
            ),
            None => format!("[{}] No clear signal for {}", when, self.series.symbol()),
        }
    }
}

pub fn assess(series: &Series, config: &AssistantConfig) -> Result<Assessment, TacticalError> {
    let enriched = enrich::enrich(series, &config.indicators)?;
    let signal = signal::current_signal(&enriched, &config.rule)?;
    let backtest = backtest::run_backtest(&enriched, &config.rule, &config.backtest)?;

    info!(
        symbol = series.symbol(),
        signal = %signal.kind,
        entries = backtest.entries,
        win_rate = backtest.win_rate,
        "assessment complete"
    );

    Ok(Assessment {
        series: enriched,
        signal,
        backtest,
        horizon: config.backtest.horizon,
    })
}
