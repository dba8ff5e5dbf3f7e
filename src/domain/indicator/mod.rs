//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator values
//!
//! Every calculator returns one point per input bar; points inside the
//! indicator's warm-up carry `valid == false`.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod volume;

pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use volume::calculate_volume_sma;

use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Utc>,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rsi(usize),
    VolumeSma(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Scalar readings, `None` for invalid points. MACD yields its histogram.
    pub fn defined_values(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|p| {
                if !p.valid {
                    return None;
                }
                match p.value {
                    IndicatorValue::Simple(v) => Some(v),
                    IndicatorValue::Macd { histogram, .. } => Some(histogram),
                }
            })
            .collect()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::ohlcv::Bar;
    use chrono::DateTime;

    pub fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: DateTime::from_timestamp(1_700_000_000 + i as i64 * 120, 0).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    pub fn make_volume_bars(volumes: &[f64]) -> Vec<Bar> {
        volumes
            .iter()
            .enumerate()
            .map(|(i, &volume)| Bar {
                timestamp: DateTime::from_timestamp(1_700_000_000 + i as i64 * 120, 0).unwrap(),
                open: 100.0,
                high: 100.0,
                low: 100.0,
                close: 100.0,
                volume,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display_rsi() {
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI(14)");
    }

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn indicator_type_display_volume() {
        assert_eq!(IndicatorType::VolumeSma(10).to_string(), "VOLUME_SMA(10)");
    }

    #[test]
    fn defined_values_masks_invalid_points() {
        let ts = DateTime::from_timestamp(0, 0).unwrap();
        let series = IndicatorSeries {
            indicator_type: IndicatorType::Rsi(2),
            values: vec![
                IndicatorPoint {
                    timestamp: ts,
                    valid: false,
                    value: IndicatorValue::Simple(0.0),
                },
                IndicatorPoint {
                    timestamp: ts,
                    valid: true,
                    value: IndicatorValue::Simple(5.0),
                },
                IndicatorPoint {
                    timestamp: ts,
                    valid: true,
                    value: IndicatorValue::Macd {
                        line: 1.0,
                        signal: 0.25,
                        histogram: 0.75,
                    },
                },
            ],
        };
        assert_eq!(series.defined_values(), vec![None, Some(5.0), Some(0.75)]);
    }
}
