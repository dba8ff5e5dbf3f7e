//! Core domain types and logic.

pub mod ohlcv;
pub mod timeframe;
pub mod indicator;
pub mod enrich;
pub mod signal;
pub mod backtest;
pub mod assistant;
pub mod config_validation;
pub mod error;
