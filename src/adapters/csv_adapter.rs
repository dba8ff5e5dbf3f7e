//! CSV file market data adapter.
//!
//! Reads `<SYMBOL>_<timeframe>.csv` from a base directory, where the symbol
//! is written without separators (`BTCUSDT_2m.csv`). Columns:
//! `timestamp,open,high,low,close,volume`, with the timestamp either Unix
//! milliseconds or `YYYY-MM-DD HH:MM:SS` in UTC.

use crate::domain::error::TacticalError;
use crate::domain::ohlcv::{Bar, Series, compact_symbol};
use crate::domain::timeframe::Timeframe;
use crate::ports::data_port::MarketDataPort;
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", compact_symbol(symbol), timeframe))
    }
}

fn data_error(reason: impl Into<String>) -> TacticalError {
    TacticalError::DataSource {
        reason: reason.into(),
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TacticalError> {
    let value = value.trim();
    if let Ok(millis) = value.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| data_error(format!("timestamp out of range: {}", millis)));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| data_error(format!("invalid timestamp '{}': {}", value, e)))
}

fn parse_field(record: &StringRecord, index: usize, name: &str) -> Result<f64, TacticalError> {
    record
        .get(index)
        .ok_or_else(|| data_error(format!("missing {} column", name)))?
        .trim()
        .parse()
        .map_err(|e| data_error(format!("invalid {} value: {}", name, e)))
}

fn parse_record(record: &StringRecord) -> Result<Bar, TacticalError> {
    let timestamp = parse_timestamp(
        record
            .get(0)
            .ok_or_else(|| data_error("missing timestamp column"))?,
    )?;
    Ok(Bar {
        timestamp,
        open: parse_field(record, 1, "open")?,
        high: parse_field(record, 2, "high")?,
        low: parse_field(record, 3, "low")?,
        close: parse_field(record, 4, "close")?,
        volume: parse_field(record, 5, "volume")?,
    })
}

impl MarketDataPort for CsvAdapter {
    fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Series, TacticalError> {
        let path = self.csv_path(symbol, timeframe);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;
            bars.push(parse_record(&record)?);
        }

        bars.sort_by_key(|b| b.timestamp);
        debug!(path = %path.display(), rows = bars.len(), "loaded bars");
        Ok(Series::new(symbol, timeframe, bars)?.tail(limit))
    }
}
