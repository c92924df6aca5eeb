//! Errors raised by the fail-loud parameter getters

use thiserror::Error;

/// A parameter was present (or required) but could not be accepted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// The value is not a recognised boolean literal
    #[error("{key} must be a boolean, got {value:?}")]
    InvalidBool {
        /// Parameter name
        key: String,
        /// Raw value that failed to parse
        value: String,
    },

    /// The value is not an RFC 3339 timestamp
    #[error("{key} must be an RFC 3339 timestamp, got {value:?}: {reason}")]
    InvalidTimestamp {
        /// Parameter name
        key: String,
        /// Raw value that failed to parse
        value: String,
        /// Parser diagnostic
        reason: String,
    },

    /// The month parameter is missing or outside 1-12
    #[error("a month must be between 1 and 12 inclusive")]
    MonthOutOfRange {
        /// The value read by the positive-integer getter (0 when missing or invalid)
        value: i64,
    },
}

impl ParamError {
    /// Name of the parameter that failed
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidBool { key, .. } | Self::InvalidTimestamp { key, .. } => key,
            Self::MonthOutOfRange { .. } => super::meta::MONTH_KEY,
        }
    }
}
