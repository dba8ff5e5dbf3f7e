//! Binance public klines adapter.
//!
//! `GET {base_url}/api/v3/klines?symbol=BTCUSDT&interval=2m&limit=200` returns
//! an array of arrays: open time (ms), then open/high/low/close/volume as
//! decimal strings, followed by fields this adapter ignores.

use crate::domain::error::TacticalError;
use crate::domain::ohlcv::{Bar, Series, compact_symbol};
use crate::domain::timeframe::Timeframe;
use crate::ports::data_port::MarketDataPort;
use chrono::DateTime;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Binance caps a single klines request at this many bars.
pub const MAX_LIMIT: usize = 1000;

pub struct BinanceAdapter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl BinanceAdapter {
    pub fn new(base_url: &str) -> Result<Self, TacticalError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| data_error(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn klines_url(&self, symbol: &str, timeframe: Timeframe, limit: usize) -> String {
        format!(
            "{}/api/v3/klines?symbol={}&interval={}&limit={}",
            self.base_url,
            compact_symbol(symbol),
            timeframe,
            limit.min(MAX_LIMIT)
        )
    }
}

fn data_error(reason: impl Into<String>) -> TacticalError {
    TacticalError::DataSource {
        reason: reason.into(),
    }
}

fn number(row: &[Value], index: usize, name: &str) -> Result<f64, TacticalError> {
    match row.get(index) {
        Some(Value::String(s)) => s
            .parse()
            .map_err(|e| data_error(format!("invalid {} value '{}': {}", name, s, e))),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| data_error(format!("invalid {} value {}", name, n))),
        _ => Err(data_error(format!("missing {} field", name))),
    }
}

/// Parse a klines payload into bars, oldest first.
pub fn parse_klines(body: &str) -> Result<Vec<Bar>, TacticalError> {
    let payload: Value =
        serde_json::from_str(body).map_err(|e| data_error(format!("invalid JSON: {}", e)))?;
    let rows = payload
        .as_array()
        .ok_or_else(|| data_error(format!("expected an array of klines, got {}", payload)))?;

    rows.iter()
        .map(|row| {
            let row = row
                .as_array()
                .ok_or_else(|| data_error("kline entry is not an array"))?;
            let open_time = row
                .first()
                .and_then(Value::as_i64)
                .ok_or_else(|| data_error("missing open time"))?;
            let timestamp = DateTime::from_timestamp_millis(open_time)
                .ok_or_else(|| data_error(format!("open time out of range: {}", open_time)))?;
            Ok(Bar {
                timestamp,
                open: number(row, 1, "open")?,
                high: number(row, 2, "high")?,
                low: number(row, 3, "low")?,
                close: number(row, 4, "close")?,
                volume: number(row, 5, "volume")?,
            })
        })
        .collect()
}

impl MarketDataPort for BinanceAdapter {
    fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Series, TacticalError> {
        let url = self.klines_url(symbol, timeframe, limit);
        info!(%url, "fetching klines");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| data_error(format!("request failed: {}", e)))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| data_error(format!("failed to read response: {}", e)))?;
        if !status.is_success() {
            return Err(data_error(format!("HTTP {}: {}", status, body)));
        }

        let bars = parse_klines(&body)?;
        debug!(bars = bars.len(), "parsed klines");
        Series::new(symbol, timeframe, bars)
    }
}
