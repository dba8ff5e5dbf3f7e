//! Domain error types.

use chrono::{DateTime, Utc};

/// Top-level error type for tactical.
#[derive(Debug, thiserror::Error)]
pub enum TacticalError {
    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("undefined {field} at {timestamp}: bar is still in indicator warm-up")]
    UndefinedField {
        field: &'static str,
        timestamp: DateTime<Utc>,
    },

    #[error("invalid series: {reason}")]
    InvalidSeries { reason: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TacticalError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TacticalError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TacticalError> for std::process::ExitCode {
    fn from(err: &TacticalError) -> Self {
        let code: u8 = match err {
            TacticalError::Io(_) | TacticalError::Report { .. } => 1,
            TacticalError::ConfigParse { .. }
            | TacticalError::ConfigInvalid { .. } => 2,
            TacticalError::DataSource { .. } => 3,
            TacticalError::InvalidSeries { .. } | TacticalError::InsufficientData { .. } => 5,
            TacticalError::UndefinedField { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
