//! Historical replay of the UP rule.
//!
//! For each bar `i` in `[warmup, len - horizon - 1]` the UP predicate is
//! tested on `(series[i], series[i - 1])`. A qualifying bar is an entry at
//! its close; it wins when the close `horizon` bars later is strictly higher.
//! Only the UP direction is scored.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::enrich::EnrichedSeries;
use crate::domain::error::TacticalError;
use crate::domain::signal::{self, Direction, RuleConfig};

pub const DEFAULT_HORIZON: usize = 10;
pub const DEFAULT_WARMUP: usize = 15;
/// Upper bound accepted from config and the command line for either setting.
pub const MAX_BARS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BacktestConfig {
    /// Bars between entry and the close it is scored against.
    pub horizon: usize,
    /// First index considered for entries.
    pub warmup: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            warmup: DEFAULT_WARMUP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeOutcome {
    pub timestamp: DateTime<Utc>,
    pub entry_close: f64,
    pub exit_close: f64,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BacktestResult {
    pub entries: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub trades: Vec<TradeOutcome>,
}

impl BacktestResult {
    fn from_trades(trades: Vec<TradeOutcome>) -> Self {
        let entries = trades.len();
        let wins = trades.iter().filter(|t| t.outcome == Outcome::Win).count();
        let win_rate = if entries == 0 {
            0.0
        } else {
            wins as f64 / entries as f64
        };
        Self {
            entries,
            wins,
            win_rate,
            trades,
        }
    }

    pub fn losses(&self) -> usize {
        self.entries - self.wins
    }
}

pub fn run_backtest(
    series: &EnrichedSeries,
    rule: &RuleConfig,
    config: &BacktestConfig,
) -> Result<BacktestResult, TacticalError> {
    let bars = series.bars();
    if bars.len() <= config.warmup.saturating_add(config.horizon) {
        debug!(
            bars = bars.len(),
            warmup = config.warmup,
            horizon = config.horizon,
            "series too short to backtest"
        );
        return Ok(BacktestResult::default());
    }

    // Both bars of every evaluated pair must be past the indicator warm-up.
    let defined_from = series.warmup() + 1;
    let start = config.warmup.max(defined_from).max(1);
    if start > config.warmup {
        warn!(
            configured = config.warmup,
            effective = start,
            "backtest warm-up raised to the first fully defined bar pair"
        );
    }

    let end = bars.len() - config.horizon;
    let mut trades = Vec::new();
    for i in start..end {
        if !signal::matches(Direction::Up, &bars[i], &bars[i - 1], rule)? {
            continue;
        }
        let entry_close = bars[i].close();
        let exit_close = bars[i + config.horizon].close();
        trades.push(TradeOutcome {
            timestamp: bars[i].timestamp(),
            entry_close,
            exit_close,
            outcome: if exit_close > entry_close {
                Outcome::Win
            } else {
                Outcome::Loss
            },
        });
    }

    let result = BacktestResult::from_trades(trades);
    debug!(
        entries = result.entries,
        wins = result.wins,
        start,
        end,
        "backtest complete"
    );
    Ok(result)
}
