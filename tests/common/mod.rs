#![allow(dead_code)]

use chrono::DateTime;
use std::collections::HashMap;
use tactical::domain::enrich::{EnrichedBar, EnrichedSeries};
use tactical::domain::error::TacticalError;
pub use tactical::domain::ohlcv::{Bar, Series};
use tactical::domain::timeframe::Timeframe;
use tactical::ports::data_port::MarketDataPort;

pub const START_SECS: i64 = 1_700_000_000;
pub const STEP_SECS: i64 = 120;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Series, TacticalError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TacticalError::DataSource {
                reason: reason.clone(),
            });
        }
        let bars = self.data.get(symbol).cloned().unwrap_or_default();
        Ok(Series::new(symbol, timeframe, bars)?.tail(limit))
    }
}

pub fn make_bar(index: usize, close: f64, volume: f64) -> Bar {
    Bar {
        timestamp: DateTime::from_timestamp(START_SECS + index as i64 * STEP_SECS, 0).unwrap(),
        open: close,
        high: close + 0.5,
        low: close - 0.5,
        close,
        volume,
    }
}

/// Bars with constant volume 1000 at the given closes.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i, c, 1000.0))
        .collect()
}

/// A steady trend of `steps` bars moving by `step`, then one final bar that
/// moves by `step / 10` on five times the usual volume.
///
/// With default indicator settings the final bar reads UP for a falling
/// trend (RSI 0, histogram turning up) and DOWN for a rising one.
pub fn exhausted_trend(start: f64, step: f64, steps: usize) -> Vec<Bar> {
    let mut bars: Vec<Bar> = (0..steps)
        .map(|i| make_bar(i, start + step * i as f64, 1000.0))
        .collect();
    let last = start + step * (steps - 1) as f64 + step / 10.0;
    bars.push(make_bar(steps, last, 5000.0));
    bars
}

pub fn series(symbol: &str, bars: Vec<Bar>) -> Series {
    Series::new(symbol, Timeframe::default(), bars).unwrap()
}

/// A fully defined enriched bar.
pub fn enriched_bar(index: usize, close: f64, rsi: f64, histogram: f64, spike: bool) -> EnrichedBar {
    EnrichedBar {
        bar: make_bar(index, close, if spike { 3000.0 } else { 1000.0 }),
        rsi: Some(rsi),
        macd_histogram: Some(histogram),
        volume_avg: Some(1000.0),
        volume_spike: Some(spike),
    }
}

/// Hand-built enriched series where every bar carries the same RSI and
/// spike flag, the histogram rises by 0.1 per bar, and the close moves by
/// `close_step` per bar from 100.
pub fn pinned_series(len: usize, rsi: f64, close_step: f64, spike: bool) -> EnrichedSeries {
    let bars = (0..len)
        .map(|i| enriched_bar(i, 100.0 + close_step * i as f64, rsi, 0.1 * i as f64, spike))
        .collect();
    EnrichedSeries::from_bars("BTC/USDT", Timeframe::default(), bars)
}

pub fn write_bars_csv(dir: &std::path::Path, file: &str, bars: &[Bar]) {
    let mut content = String::from("timestamp,open,high,low,close,volume\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.timestamp.timestamp_millis(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    std::fs::write(dir.join(file), content).unwrap();
}
