//! # apikit
//!
//! Request-parameter sanitization and pluggable response serialization for
//! axum HTTP APIs.
//!
//! ## Features
//!
//! - **Parameter sanitization**: [`params::Meta`] keeps the raw query next to
//!   the set of values that passed validation, so only accepted input is ever
//!   echoed back or used as a cache key
//! - **Sort orders**: `-year,name` style expressions with a field whitelist
//! - **Serialization**: JSON and URL-encoded form serializers behind one
//!   object-safe trait, selected per request by `format` or `Accept`
//! - **Configuration**: Figment layering of defaults, `apikit.toml` and
//!   `APIKIT_` environment variables
//!
//! ## Example
//!
//! ```rust,no_run
//! use apikit::prelude::*;
//! use axum::{routing::get, Router};
//!
//! async fn list(mut meta: Meta) -> Envelope<serde_json::Value> {
//!     let config = ParamsConfig::default();
//!     meta.paginate(&config);
//!     meta.parse_configured_order(&config, &["name", "year"]);
//!
//!     let registry = SerializerRegistry::with_defaults();
//!     let serializer = registry.default_serializer();
//!     match meta.timestamp("before") {
//!         Ok(before) => Envelope::ok(
//!             serializer,
//!             serde_json::json!({ "meta": meta, "before": before.to_rfc3339() }),
//!         ),
//!         Err(e) => Envelope::err(serializer, e.into()),
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let app: Router = Router::new().route("/items", get(list));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

pub mod api_error;
pub mod config;
pub mod error;
pub mod observability;
pub mod params;
pub mod serializer;

pub use api_error::ApiError;
pub use error::{Error, ErrorResponse, Result};

/// Common imports
pub mod prelude {
    pub use crate::api_error::ApiError;
    pub use crate::config::{Config, ParamsConfig, SerializerConfig, ServiceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::observability::init_tracing;
    pub use crate::params::{AddErrors, Meta, Orders, ParamError, SortOrder, Values};
    pub use crate::serializer::{Envelope, Serializer, SerializerExt, SerializerRegistry};
}
