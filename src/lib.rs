//! tactical: short-horizon crypto signal assistant.
//!
//! Enriches OHLCV bars with RSI, MACD histogram and a volume-spike flag,
//! reads an UP/DOWN/NONE signal from the latest two bars, and scores the UP
//! rule over the same history.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
