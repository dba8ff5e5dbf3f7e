//! OHLCV bar and validated series representation.

use chrono::{DateTime, Utc};

use crate::domain::error::TacticalError;
use crate::domain::timeframe::Timeframe;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    fn check(&self) -> Result<(), String> {
        for (name, price) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !price.is_finite() || price <= 0.0 {
                return Err(format!(
                    "{} at {} must be a positive number, got {}",
                    name, self.timestamp, price
                ));
            }
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(format!(
                "volume at {} must be non-negative, got {}",
                self.timestamp, self.volume
            ));
        }
        Ok(())
    }
}

/// Chronologically ordered bars for one symbol at one timeframe.
///
/// Only constructible through [`Series::new`], so every `Series` has strictly
/// increasing timestamps and well-formed prices.
#[derive(Debug, Clone)]
pub struct Series {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<Bar>,
}

impl Series {
    pub fn new(
        symbol: impl Into<String>,
        timeframe: Timeframe,
        bars: Vec<Bar>,
    ) -> Result<Self, TacticalError> {
        for bar in &bars {
            bar.check()
                .map_err(|reason| TacticalError::InvalidSeries { reason })?;
        }
        for pair in bars.windows(2) {
            if pair[1].timestamp == pair[0].timestamp {
                return Err(TacticalError::InvalidSeries {
                    reason: format!("duplicate timestamp {}", pair[1].timestamp),
                });
            }
            if pair[1].timestamp < pair[0].timestamp {
                return Err(TacticalError::InvalidSeries {
                    reason: format!(
                        "bar at {} follows later bar at {}",
                        pair[1].timestamp, pair[0].timestamp
                    ),
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            timeframe,
            bars,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Keep only the most recent `limit` bars.
    pub fn tail(mut self, limit: usize) -> Self {
        if self.bars.len() > limit {
            self.bars.drain(..self.bars.len() - limit);
        }
        self
    }
}

/// Exchange-style compact symbol: "BTC/USDT" -> "BTCUSDT".
pub fn compact_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}
