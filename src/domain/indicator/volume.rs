//! Rolling volume average.
//!
//! Simple mean of the last n volumes including the current bar.
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_WINDOW: usize = 10;
pub const DEFAULT_SPIKE_MULTIPLIER: f64 = 1.5;

pub fn calculate_volume_sma(bars: &[Bar], window: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let valid = window > 0 && i + 1 >= window;
        // A run of zero volumes must average to exactly zero.
        let average = if valid {
            bars[i + 1 - window..=i].iter().map(|b| b.volume).sum::<f64>() / window as f64
        } else {
            0.0
        };
        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid,
            value: IndicatorValue::Simple(average),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::VolumeSma(window),
        values,
    }
}

/// True when `volume` exceeds `multiplier` times its rolling average.
pub fn is_spike(volume: f64, average: f64, multiplier: f64) -> bool {
    volume > average * multiplier
}
