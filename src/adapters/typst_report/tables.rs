//! Table formatting for reports.
//!
//! Provides functions to generate Typst markup for:
//! - Signal summary (symbol, timeframe, latest reading, thresholds)
//! - Backtest results table
//! - Trade log table (every scored UP entry)

use crate::domain::assistant::{AssistantConfig, Assessment};
use crate::domain::backtest::{BacktestResult, Outcome, TradeOutcome};
use crate::domain::timeframe::describe_span;

/// Escape text for use inside a Typst content block.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '[' | ']' | '#' | '*' | '_' | '\\' | '$' | '@' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn optional(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "n/a".to_string())
}

pub fn render_signal_summary(assessment: &Assessment, config: &AssistantConfig) -> String {
    let series = &assessment.series;
    let latest = series.bars().last();

    let mut output = String::new();
    output.push_str(&format!("*{}*\n\n", escape(&assessment.headline())));
    output.push_str("#table(\n");
    output.push_str("  columns: 2,\n");
    output.push_str("  [*Property*], [*Value*],\n");
    output.push_str(&format!("  [Symbol], [{}],\n", escape(series.symbol())));
    output.push_str(&format!("  [Timeframe], [{}],\n", series.timeframe()));
    output.push_str(&format!("  [Bars], [{}],\n", series.len()));
    if let Some(bar) = latest {
        output.push_str(&format!(
            "  [Latest Bar], [{}],\n",
            bar.timestamp().format("%Y-%m-%d %H:%M:%S")
        ));
        output.push_str(&format!("  [Close], [{:.2}],\n", bar.close()));
        output.push_str(&format!("  [RSI], [{}],\n", optional(bar.rsi, 2)));
        output.push_str(&format!(
            "  [MACD Histogram], [{}],\n",
            optional(bar.macd_histogram, 4)
        ));
        output.push_str(&format!(
            "  [Volume Spike], [{}],\n",
            bar.volume_spike
                .map(|s| if s { "yes" } else { "no" })
                .unwrap_or("n/a")
        ));
    }
    output.push_str(&format!("  [Signal], [{}],\n", assessment.signal.kind));
    output.push_str(&format!(
        "  [RSI Thresholds], [{:.1} / {:.1}],\n",
        config.rule.oversold, config.rule.overbought
    ));
    output.push_str(")\n\n");
    output
}

pub fn render_backtest_table(result: &BacktestResult, horizon: usize, window: &str) -> String {
    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: 2,\n");
    output.push_str("  [*Metric*], [*Value*],\n");
    output.push_str(&format!("  [Horizon], [{} bars ({})],\n", horizon, window));
    output.push_str(&format!("  [Entries], [{}],\n", result.entries));
    output.push_str(&format!("  [Wins], [{}],\n", result.wins));
    output.push_str(&format!("  [Losses], [{}],\n", result.losses()));
    output.push_str(&format!(
        "  [Win Rate], [{:.2}%],\n",
        result.win_rate * 100.0
    ));
    output.push_str(")\n\n");
    output
}

/// Convenience wrapper taking the window from the assessment.
pub fn render_assessment_backtest(assessment: &Assessment) -> String {
    render_backtest_table(
        &assessment.backtest,
        assessment.horizon,
        &describe_span(assessment.forecast_window()),
    )
}

pub fn render_trade_log(trades: &[TradeOutcome]) -> String {
    if trades.is_empty() {
        return "_No qualifying entries._\n".to_string();
    }

    let mut output = String::new();
    output.push_str("#table(\n");
    output.push_str("  columns: 6,\n");
    output.push_str("  [*#*], [*Entry Time*], [*Entry*], [*Exit*], [*Change*], [*Outcome*],\n");

    for (i, trade) in trades.iter().enumerate() {
        let change = (trade.exit_close - trade.entry_close) / trade.entry_close * 100.0;
        let (label, color) = match trade.outcome {
            Outcome::Win => ("WIN", "green"),
            Outcome::Loss => ("LOSS", "red"),
        };
        output.push_str(&format!(
            "  [{}], [{}], [{:.2}], [{:.2}], [{:+.2}%], text(fill: {}, [{}]),\n",
            i + 1,
            trade.timestamp.format("%Y-%m-%d %H:%M"),
            trade.entry_close,
            trade.exit_close,
            change,
            color,
            label
        ));
    }

    output.push_str(")\n\n");
    output
}
