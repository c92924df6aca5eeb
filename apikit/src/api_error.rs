//! Structured client-facing errors
//!
//! [`ApiError`] is the error half of a response envelope: an HTTP status code,
//! a list of general messages and a map of per-field messages. Parameter
//! validation failures convert into it so handlers can surface them with `?`.
//!
//! # Example
//!
//! ```rust
//! use apikit::ApiError;
//! use axum::http::StatusCode;
//!
//! let error = ApiError::bad_request("Invalid query")
//!     .with_field("month", "a month must be between 1 and 12 inclusive");
//! assert_eq!(error.code, StatusCode::BAD_REQUEST);
//! assert!(error.has_field("month"));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::params::ParamError;

/// Structured API error with a status code and messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status code used for the response line
    #[serde(with = "status_code")]
    pub code: StatusCode,
    /// General error messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    /// Messages keyed by the offending field or parameter
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl ApiError {
    /// Create an error with the given status code and no messages
    pub fn new(code: StatusCode) -> Self {
        Self {
            code,
            messages: Vec::new(),
            fields: BTreeMap::new(),
        }
    }

    /// Create an error with a status code and a single message
    pub fn with_message(code: StatusCode, message: impl Into<String>) -> Self {
        Self::new(code).add_message(message)
    }

    /// Create a 400 Bad Request error
    ///
    /// # Example
    ///
    /// ```rust
    /// use apikit::ApiError;
    ///
    /// let error = ApiError::bad_request("Invalid query parameter 'page'");
    /// assert_eq!(error.code.as_u16(), 400);
    /// ```
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::BAD_REQUEST, message)
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::NOT_FOUND, message)
    }

    /// Create a 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Append a general message
    #[must_use]
    pub fn add_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Set the message for a field, replacing any previous one
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.fields.insert(field.into(), message.into());
        self
    }

    /// Check whether a message exists for the field
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Check whether the error carries any message at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.fields.is_empty()
    }

    /// Fold another error into this one
    ///
    /// Messages are appended, fields are merged with `other` winning on
    /// conflicts and the status code of `other` replaces this one.
    pub fn merge(&mut self, other: ApiError) {
        self.code = other.code;
        self.messages.extend(other.messages);
        self.fields.extend(other.fields);
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if !self.messages.is_empty() {
            write!(f, ": {}", self.messages.join("; "))?;
        }
        for (field, message) in &self.fields {
            write!(f, " [{}: {}]", field, message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<ParamError> for ApiError {
    fn from(err: ParamError) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST).with_field(err.key(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.code.is_server_error() {
            tracing::error!(code = %self.code, fields = ?self.fields, "API error: {}", self);
        } else {
            tracing::debug!(code = %self.code, fields = ?self.fields, "API error: {}", self);
        }

        (self.code, Json(self)).into_response()
    }
}

mod status_code {
    use axum::http::StatusCode;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(code: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(code.as_u16())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<StatusCode, D::Error> {
        let raw = u16::deserialize(deserializer)?;
        StatusCode::from_u16(raw).map_err(D::Error::custom)
    }
}
