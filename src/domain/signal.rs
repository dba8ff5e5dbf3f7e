//! Signal rule engine.
//!
//! The rule reads a two-bar window `(current, previous)`:
//!
//! - UP:   `rsi < oversold`   and the MACD histogram is rising  and volume spiked
//! - DOWN: `rsi > overbought` and the histogram is not rising   and volume spiked
//! - otherwise no signal
//!
//! "Rising" is strict, so an unchanged histogram can only ever feed DOWN.
//! Both directions go through [`matches`], which the backtest also replays.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::domain::enrich::{EnrichedBar, EnrichedSeries};
use crate::domain::error::TacticalError;

pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleConfig {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            oversold: DEFAULT_OVERSOLD,
            overbought: DEFAULT_OVERBOUGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Up,
    Down,
    NoSignal,
}

impl From<Direction> for SignalKind {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => SignalKind::Up,
            Direction::Down => SignalKind::Down,
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Up => write!(f, "UP"),
            SignalKind::Down => write!(f, "DOWN"),
            SignalKind::NoSignal => write!(f, "NONE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub kind: SignalKind,
    pub timestamp: DateTime<Utc>,
}

impl Signal {
    pub fn direction(&self) -> Option<Direction> {
        match self.kind {
            SignalKind::Up => Some(Direction::Up),
            SignalKind::Down => Some(Direction::Down),
            SignalKind::NoSignal => None,
        }
    }
}

/// Whether the two-bar window satisfies the rule for `direction`.
pub fn matches(
    direction: Direction,
    current: &EnrichedBar,
    previous: &EnrichedBar,
    rule: &RuleConfig,
) -> Result<bool, TacticalError> {
    let now = current.defined_fields()?;
    let before = previous.defined_fields()?;

    let rising = now.macd_histogram > before.macd_histogram;
    let momentum = match direction {
        Direction::Up => now.rsi < rule.oversold && rising,
        Direction::Down => now.rsi > rule.overbought && !rising,
    };
    Ok(momentum && now.volume_spike)
}

pub fn evaluate(
    current: &EnrichedBar,
    previous: &EnrichedBar,
    rule: &RuleConfig,
) -> Result<Signal, TacticalError> {
    let kind = if matches(Direction::Up, current, previous, rule)? {
        SignalKind::Up
    } else if matches(Direction::Down, current, previous, rule)? {
        SignalKind::Down
    } else {
        SignalKind::NoSignal
    };
    Ok(Signal {
        kind,
        timestamp: current.timestamp(),
    })
}

/// Signal for the most recent bar of the series.
pub fn current_signal(series: &EnrichedSeries, rule: &RuleConfig) -> Result<Signal, TacticalError> {
    let (current, previous) = series
        .latest_pair()
        .ok_or_else(|| TacticalError::InsufficientData {
            symbol: series.symbol().to_string(),
            bars: series.len(),
            minimum: 2,
        })?;
    evaluate(current, previous, rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use crate::domain::timeframe::Timeframe;

    fn enriched(minute: i64, rsi: f64, histogram: f64, spike: bool) -> EnrichedBar {
        EnrichedBar {
            bar: Bar {
                timestamp: DateTime::from_timestamp(1_700_000_000 + minute * 60, 0).unwrap(),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0,
                volume: if spike { 3000.0 } else { 1000.0 },
            },
            rsi: Some(rsi),
            macd_histogram: Some(histogram),
            volume_avg: Some(1000.0),
            volume_spike: Some(spike),
        }
    }

    /// Independent statement of the policy used to check the grid.
    fn expected(rsi: f64, current: f64, previous: f64, spike: bool) -> SignalKind {
        if rsi < 30.0 && current > previous && spike {
            SignalKind::Up
        } else if rsi > 70.0 && current <= previous && spike {
            SignalKind::Down
        } else {
            SignalKind::NoSignal
        }
    }

    #[test]
    fn boundary_grid_matches_policy() {
        let rule = RuleConfig::default();
        let histograms = [(0.5, 0.2), (0.2, 0.5), (0.3, 0.3)];

        for rsi in [29.0, 30.0, 31.0, 69.0, 70.0, 71.0] {
            for (now, before) in histograms {
                for spike in [true, false] {
                    let current = enriched(2, rsi, now, spike);
                    let previous = enriched(0, 50.0, before, false);
                    let signal = evaluate(&current, &previous, &rule).unwrap();
                    assert_eq!(
                        signal.kind,
                        expected(rsi, now, before, spike),
                        "rsi={} hist {}->{} spike={}",
                        rsi,
                        before,
                        now,
                        spike
                    );
                    assert_eq!(signal.timestamp, current.timestamp());
                }
            }
        }
    }

    #[test]
    fn up_requires_all_three_conditions() {
        let rule = RuleConfig::default();
        let previous = enriched(0, 50.0, -1.0, false);
        assert_eq!(
            evaluate(&enriched(2, 25.0, -0.5, true), &previous, &rule).unwrap().kind,
            SignalKind::Up
        );
        assert_eq!(
            evaluate(&enriched(2, 25.0, -0.5, false), &previous, &rule).unwrap().kind,
            SignalKind::NoSignal
        );
        assert_eq!(
            evaluate(&enriched(2, 25.0, -1.5, true), &previous, &rule).unwrap().kind,
            SignalKind::NoSignal
        );
    }

    #[test]
    fn equal_histogram_feeds_down_only() {
        let rule = RuleConfig::default();
        let previous = enriched(0, 50.0, 0.3, false);
        let oversold = enriched(2, 20.0, 0.3, true);
        let overbought = enriched(2, 80.0, 0.3, true);
        assert!(!matches(Direction::Up, &oversold, &previous, &rule).unwrap());
        assert!(matches(Direction::Down, &overbought, &previous, &rule).unwrap());
    }

    #[test]
    fn previous_rsi_is_irrelevant() {
        let rule = RuleConfig::default();
        let current = enriched(2, 20.0, 1.0, true);
        for prev_rsi in [0.0, 50.0, 100.0] {
            let previous = enriched(0, prev_rsi, 0.0, false);
            assert_eq!(
                evaluate(&current, &previous, &rule).unwrap().kind,
                SignalKind::Up
            );
        }
    }

    #[test]
    fn custom_thresholds() {
        let rule = RuleConfig {
            oversold: 40.0,
            overbought: 60.0,
        };
        let previous = enriched(0, 50.0, 0.0, false);
        assert_eq!(
            evaluate(&enriched(2, 35.0, 1.0, true), &previous, &rule).unwrap().kind,
            SignalKind::Up
        );
        assert_eq!(
            evaluate(&enriched(2, 65.0, -1.0, true), &previous, &rule).unwrap().kind,
            SignalKind::Down
        );
    }

    #[test]
    fn undefined_current_field_fails() {
        let rule = RuleConfig::default();
        let mut current = enriched(2, 20.0, 1.0, true);
        current.rsi = None;
        let previous = enriched(0, 50.0, 0.0, false);
        let err = evaluate(&current, &previous, &rule).unwrap_err();
        assert!(matches!(err, TacticalError::UndefinedField { field: "rsi", .. }));
    }

    #[test]
    fn undefined_previous_field_fails() {
        let rule = RuleConfig::default();
        let current = enriched(2, 50.0, 1.0, false);
        let mut previous = enriched(0, 50.0, 0.0, false);
        previous.volume_spike = None;
        previous.volume_avg = None;
        let err = evaluate(&current, &previous, &rule).unwrap_err();
        assert!(matches!(
            err,
            TacticalError::UndefinedField {
                field: "volume_spike",
                ..
            }
        ));
    }

    #[test]
    fn current_signal_uses_last_two_bars() {
        let bars = vec![
            enriched(0, 50.0, 0.0, false),
            enriched(2, 50.0, 0.1, false),
            enriched(4, 80.0, -0.2, true),
        ];
        let series = EnrichedSeries::from_bars("BTC/USDT", Timeframe::default(), bars);
        let signal = current_signal(&series, &RuleConfig::default()).unwrap();
        assert_eq!(signal.kind, SignalKind::Down);
        assert_eq!(signal.timestamp, series.bars()[2].timestamp());
        assert_eq!(signal.direction(), Some(Direction::Down));
    }

    #[test]
    fn current_signal_needs_two_bars() {
        let series =
            EnrichedSeries::from_bars("BTC/USDT", Timeframe::default(), vec![enriched(0, 50.0, 0.0, true)]);
        let err = current_signal(&series, &RuleConfig::default()).unwrap_err();
        assert!(matches!(err, TacticalError::InsufficientData { minimum: 2, .. }));
    }

    #[test]
    fn signal_kind_display() {
        assert_eq!(SignalKind::Up.to_string(), "UP");
        assert_eq!(SignalKind::Down.to_string(), "DOWN");
        assert_eq!(SignalKind::NoSignal.to_string(), "NONE");
        assert_eq!(SignalKind::from(Direction::Up), SignalKind::Up);
    }
}
