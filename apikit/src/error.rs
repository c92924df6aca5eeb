//! Error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// JSON input could not be decoded
    #[error("JSON decoding error: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// A value could not be encoded as JSON
    #[error("JSON encoding error: {0}")]
    JsonEncode(serde_json::Error),

    /// Form encoding failed
    #[error("Form encoding error: {0}")]
    FormEncode(#[from] serde_urlencoded::ser::Error),

    /// Form decoding failed
    #[error("Form decoding error: {0}")]
    FormDecode(#[from] serde_urlencoded::de::Error),

    /// The raw query string could not be decoded
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    /// No serializer is registered for the media type
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(Box<axum::http::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
            status: status.as_u16(),
        }
    }

    /// Create error response with a code
    pub fn with_code(
        status: StatusCode,
        code: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status: status.as_u16(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            Error::Config(e) => {
                tracing::error!("Configuration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIG_ERROR",
                        "Service misconfigured",
                    ),
                )
            }

            // Decoding failures come from client bodies; encoding failures are ours
            Error::JsonDecode(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_code(StatusCode::BAD_REQUEST, "INVALID_BODY", e.to_string()),
            ),

            Error::FormDecode(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_code(StatusCode::BAD_REQUEST, "INVALID_BODY", e.to_string()),
            ),

            Error::JsonEncode(e) => {
                tracing::error!("JSON encoding error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "ENCODING_ERROR",
                        "Response encoding failed",
                    ),
                )
            }

            Error::FormEncode(e) => {
                tracing::error!("Form encoding error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "ENCODING_ERROR",
                        "Response encoding failed",
                    ),
                )
            }

            Error::InvalidQuery(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_code(StatusCode::BAD_REQUEST, "INVALID_QUERY", msg),
            ),

            Error::UnsupportedMediaType(media_type) => (
                StatusCode::NOT_ACCEPTABLE,
                ErrorResponse::with_code(
                    StatusCode::NOT_ACCEPTABLE,
                    "UNSUPPORTED_MEDIA_TYPE",
                    format!("No serializer for {media_type}"),
                ),
            ),

            Error::Http(e) => {
                tracing::error!("HTTP error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "HTTP_ERROR",
                        "Response could not be built",
                    ),
                )
            }

            Error::Io(e) => {
                tracing::error!("I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_code(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "IO_ERROR",
                        "I/O operation failed",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

impl From<axum::http::Error> for Error {
    fn from(err: axum::http::Error) -> Self {
        Error::Http(Box::new(err))
    }
}
