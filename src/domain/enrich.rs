//! Indicator enrichment: raw series in, indicator-augmented series out.
//!
//! Each [`EnrichedBar`] carries the RSI, MACD histogram, rolling volume
//! average and volume-spike flag for its bar. Fields are `None` while their
//! indicator is still warming up; they are never zero-filled.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::error::TacticalError;
use crate::domain::indicator::{self, macd, rsi, volume};
use crate::domain::ohlcv::{Bar, Series};
use crate::domain::timeframe::Timeframe;

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub volume_window: usize,
    pub volume_spike_mult: f64,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            volume_window: volume::DEFAULT_WINDOW,
            volume_spike_mult: volume::DEFAULT_SPIKE_MULTIPLIER,
        }
    }
}

impl EnrichConfig {
    /// Index of the first bar at which every derived field is defined.
    pub fn warmup(&self) -> usize {
        let rsi_warmup = self.rsi_period.saturating_sub(1);
        let macd_warmup = macd::warmup(self.macd_fast, self.macd_slow, self.macd_signal);
        let volume_warmup = self.volume_window.saturating_sub(1);
        rsi_warmup.max(macd_warmup).max(volume_warmup)
    }

    /// Shortest series for which at least one bar is fully defined.
    pub fn required_bars(&self) -> usize {
        self.warmup() + 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedBar {
    pub bar: Bar,
    pub rsi: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub volume_avg: Option<f64>,
    pub volume_spike: Option<bool>,
}

/// The derived fields of a bar past its warm-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefinedFields {
    pub rsi: f64,
    pub macd_histogram: f64,
    pub volume_spike: bool,
}

impl EnrichedBar {
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.bar.timestamp
    }

    pub fn close(&self) -> f64 {
        self.bar.close
    }

    pub fn is_defined(&self) -> bool {
        self.rsi.is_some() && self.macd_histogram.is_some() && self.volume_spike.is_some()
    }

    /// The fields the signal rule reads, or `UndefinedField` for the first missing one.
    pub fn defined_fields(&self) -> Result<DefinedFields, TacticalError> {
        let undefined = |field| TacticalError::UndefinedField {
            field,
            timestamp: self.bar.timestamp,
        };
        Ok(DefinedFields {
            rsi: self.rsi.ok_or_else(|| undefined("rsi"))?,
            macd_histogram: self.macd_histogram.ok_or_else(|| undefined("macd_histogram"))?,
            volume_spike: self.volume_spike.ok_or_else(|| undefined("volume_spike"))?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct EnrichedSeries {
    symbol: String,
    timeframe: Timeframe,
    bars: Vec<EnrichedBar>,
    warmup: usize,
}

impl EnrichedSeries {
    /// Wrap already-enriched bars; the warm-up index is the first fully defined bar.
    pub fn from_bars(symbol: impl Into<String>, timeframe: Timeframe, bars: Vec<EnrichedBar>) -> Self {
        let warmup = bars.iter().position(EnrichedBar::is_defined).unwrap_or(bars.len());
        Self {
            symbol: symbol.into(),
            timeframe,
            bars,
            warmup,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn bars(&self) -> &[EnrichedBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Index of the first bar whose derived fields are all defined
    /// (`len()` when there is none).
    pub fn warmup(&self) -> usize {
        self.warmup
    }

    /// The last two bars as `(current, previous)`.
    pub fn latest_pair(&self) -> Option<(&EnrichedBar, &EnrichedBar)> {
        match self.bars.as_slice() {
            [.., previous, current] => Some((current, previous)),
            _ => None,
        }
    }
}

pub fn enrich(series: &Series, config: &EnrichConfig) -> Result<EnrichedSeries, TacticalError> {
    let minimum = config.required_bars();
    if series.len() < minimum {
        return Err(TacticalError::InsufficientData {
            symbol: series.symbol().to_string(),
            bars: series.len(),
            minimum,
        });
    }

    let bars = series.bars();
    let rsi = indicator::calculate_rsi(bars, config.rsi_period).defined_values();
    let histogram = indicator::calculate_macd(
        bars,
        config.macd_fast,
        config.macd_slow,
        config.macd_signal,
    )
    .defined_values();
    let volume_avg = indicator::calculate_volume_sma(bars, config.volume_window).defined_values();

    let enriched: Vec<EnrichedBar> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| EnrichedBar {
            bar: bar.clone(),
            rsi: rsi[i],
            macd_histogram: histogram[i],
            volume_avg: volume_avg[i],
            volume_spike: volume_avg[i]
                .map(|avg| volume::is_spike(bar.volume, avg, config.volume_spike_mult)),
        })
        .collect();

    let result = EnrichedSeries::from_bars(series.symbol(), series.timeframe(), enriched);
    debug!(
        symbol = result.symbol(),
        bars = result.len(),
        warmup = result.warmup(),
        "enriched series"
    );
    Ok(result)
}
