//! Configuration validation.
//!
//! Validates all config fields before any data is fetched.

use crate::domain::backtest::{DEFAULT_HORIZON, DEFAULT_WARMUP, MAX_BARS};
use crate::domain::enrich::EnrichConfig;
use crate::domain::error::TacticalError;
use crate::domain::timeframe::Timeframe;
use crate::ports::config_port::ConfigPort;

pub fn validate_market_config(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    validate_symbol(config)?;
    validate_timeframe(config)?;
    validate_source(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    validate_rsi_period(config)?;
    validate_macd_periods(config)?;
    validate_volume(config)?;
    Ok(())
}

pub fn validate_rule_config(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    let oversold = config.get_double("rule", "oversold", 30.0);
    let overbought = config.get_double("rule", "overbought", 70.0);
    if !(0.0..=100.0).contains(&oversold) {
        return Err(TacticalError::config_invalid(
            "rule",
            "oversold",
            "oversold must be between 0 and 100",
        ));
    }
    if !(0.0..=100.0).contains(&overbought) {
        return Err(TacticalError::config_invalid(
            "rule",
            "overbought",
            "overbought must be between 0 and 100",
        ));
    }
    if oversold >= overbought {
        return Err(TacticalError::config_invalid(
            "rule",
            "oversold",
            "oversold must be below overbought",
        ));
    }
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    for (key, default) in [("horizon", DEFAULT_HORIZON), ("warmup", DEFAULT_WARMUP)] {
        let value = config.get_int("backtest", key, default as i64);
        if value < 1 || value > MAX_BARS as i64 {
            return Err(TacticalError::config_invalid(
                "backtest",
                key,
                format!("{} must be between 1 and {}", key, MAX_BARS),
            ));
        }
    }
    Ok(())
}

/// The fetch limit must leave room for the indicator warm-up.
pub fn validate_limit(limit: i64, indicators: &EnrichConfig) -> Result<(), TacticalError> {
    let required = indicators.required_bars();
    if limit < required as i64 {
        return Err(TacticalError::config_invalid(
            "market",
            "limit",
            format!("limit must be at least {} to cover the indicator warm-up", required),
        ));
    }
    Ok(())
}

pub fn validate_all(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    validate_market_config(config)?;
    validate_indicator_config(config)?;
    validate_rule_config(config)?;
    validate_backtest_config(config)?;
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    match config.get_string("market", "symbol") {
        Some(s) if s.trim().is_empty() => Err(TacticalError::config_invalid(
            "market",
            "symbol",
            "symbol must not be empty",
        )),
        _ => Ok(()),
    }
}

fn validate_timeframe(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    if let Some(tf) = config.get_string("market", "timeframe") {
        tf.parse::<Timeframe>()
            .map_err(|e| TacticalError::config_invalid("market", "timeframe", e.to_string()))?;
    }
    Ok(())
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    match config.get_string("market", "source").as_deref().map(str::trim) {
        None | Some("csv") | Some("binance") => Ok(()),
        Some(other) => Err(TacticalError::config_invalid(
            "market",
            "source",
            format!("unknown source '{}' (expected csv or binance)", other),
        )),
    }
}

fn validate_rsi_period(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    if config.get_int("indicators", "rsi_period", 14) < 2 {
        return Err(TacticalError::config_invalid(
            "indicators",
            "rsi_period",
            "rsi_period must be at least 2",
        ));
    }
    Ok(())
}

fn validate_macd_periods(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    let fast = config.get_int("indicators", "macd_fast", 12);
    let slow = config.get_int("indicators", "macd_slow", 26);
    let signal = config.get_int("indicators", "macd_signal", 9);

    for (key, value) in [("macd_fast", fast), ("macd_slow", slow), ("macd_signal", signal)] {
        if value < 1 {
            return Err(TacticalError::config_invalid(
                "indicators",
                key,
                format!("{} must be at least 1", key),
            ));
        }
    }
    if fast >= slow {
        return Err(TacticalError::config_invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be below macd_slow",
        ));
    }
    Ok(())
}

fn validate_volume(config: &dyn ConfigPort) -> Result<(), TacticalError> {
    if config.get_int("indicators", "volume_window", 10) < 1 {
        return Err(TacticalError::config_invalid(
            "indicators",
            "volume_window",
            "volume_window must be at least 1",
        ));
    }
    if config.get_double("indicators", "volume_spike_mult", 1.5) <= 0.0 {
        return Err(TacticalError::config_invalid(
            "indicators",
            "volume_spike_mult",
            "volume_spike_mult must be positive",
        ));
    }
    Ok(())
}
