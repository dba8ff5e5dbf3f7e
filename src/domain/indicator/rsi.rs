//! RSI (Relative Strength Index) momentum oscillator.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - The first bar has no predecessor and counts as a zero change
//! - The averages start at that first change
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! The smoothing runs from the first bar; the first n-1 readings are masked.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::Bar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[Bar], period: usize) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    if period == 0 {
        values.extend(bars.iter().map(invalid));
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values,
        };
    }

    let n = period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        let change = if i == 0 { 0.0 } else { bar.close - bars[i - 1].close };
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i == 0 {
            avg_gain = gain;
            avg_loss = loss;
        } else {
            avg_gain = (avg_gain * (n - 1.0) + gain) / n;
            avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        }

        if i + 1 < period {
            values.push(invalid(bar));
            continue;
        }

        let rsi = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        };
        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: true,
            value: IndicatorValue::Simple(rsi),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn invalid(bar: &Bar) -> IndicatorPoint {
    IndicatorPoint {
        timestamp: bar.timestamp,
        valid: false,
        value: IndicatorValue::Simple(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::make_bars;
    use approx::assert_relative_eq;

    fn rsi_at(series: &IndicatorSeries, i: usize) -> f64 {
        match series.values[i].value {
            IndicatorValue::Simple(v) => v,
            _ => panic!("Expected Simple value"),
        }
    }

    #[test]
    fn rsi_empty_bars() {
        let series = calculate_rsi(&[], 14);
        assert!(series.values.is_empty());
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + (i % 5) as f64 * 2.0).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        assert_eq!(series.values.len(), 20);
        for i in 0..13 {
            assert!(!series.values[i].valid, "Bar {} should be invalid", i);
        }
        for i in 13..20 {
            assert!(series.values[i].valid, "Bar {} should be valid", i);
        }
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        assert_relative_eq!(rsi_at(&series, 13), 100.0);
        assert_relative_eq!(rsi_at(&series, 14), 100.0);
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);
        assert_relative_eq!(rsi_at(&series, 14), 0.0);
    }

    #[test]
    fn rsi_smoothing_starts_at_first_bar() {
        // changes: 0 (first bar), +2, -1 with alpha 1/3
        // gains 0 -> 2/3 -> 4/9, losses 0 -> 0 -> 1/3
        let series = calculate_rsi(&make_bars(&[10.0, 12.0, 11.0]), 3);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert_relative_eq!(rsi_at(&series, 2), 400.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn rsi_wilder_smoothing_continues() {
        let series = calculate_rsi(&make_bars(&[10.0, 12.0, 11.0, 14.0]), 3);
        let gain = (4.0 / 9.0 * 2.0 + 3.0) / 3.0;
        let loss = (1.0 / 3.0 * 2.0 + 0.0) / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + gain / loss);
        assert_relative_eq!(rsi_at(&series, 3), expected, epsilon = 1e-12);
    }

    #[test]
    fn rsi_matches_exponential_recurrence_on_zigzag() {
        let prices: Vec<f64> = (0..40)
            .map(|i| {
                let swing = if i % 2 == 0 { 0.0 } else { 3.0 };
                100.0 + swing - i as f64 * 0.25
            })
            .collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        let alpha = 1.0 / 14.0;
        let (mut up, mut down) = (0.0, 0.0);
        for i in 1..prices.len() {
            let change: f64 = prices[i] - prices[i - 1];
            up = (1.0 - alpha) * up + alpha * change.max(0.0);
            down = (1.0 - alpha) * down + alpha * (-change).max(0.0);
            if i >= 13 {
                let expected = 100.0 - 100.0 / (1.0 + up / down);
                assert_relative_eq!(rsi_at(&series, i), expected, epsilon = 1e-9);
            }
        }
        assert!(!series.values[12].valid);
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        for point in series.values.iter().filter(|p| p.valid) {
            if let IndicatorValue::Simple(rsi) = point.value {
                assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
            }
        }
    }

    #[test]
    fn rsi_zero_period() {
        let series = calculate_rsi(&make_bars(&[100.0, 101.0]), 0);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.valid));
    }

    #[test]
    fn rsi_indicator_type() {
        let series = calculate_rsi(&make_bars(&[100.0]), DEFAULT_PERIOD);
        assert_eq!(series.indicator_type, IndicatorType::Rsi(14));
    }
}
