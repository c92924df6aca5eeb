//! Query parameter sanitization
//!
//! This module turns untrusted, multi-valued query parameters into typed
//! values while keeping a record of exactly which parameters were accepted.
//!
//! # Features
//!
//! - **Raw and accepted sets**: [`Meta`] wraps the decoded query ([`Values`])
//!   and copies every successfully parsed value into a second set
//! - **Fail-soft and fail-loud getters**: zero values for optional input,
//!   [`ParamError`] where the caller must report the failure
//! - **Sort orders**: [`Orders`] parses `-year,name` expressions against an
//!   optional whitelist
//! - **Axum integration**: [`Meta`] is an extractor
//!
//! # Example
//!
//! ```rust
//! use apikit::{params::Meta, ApiError};
//!
//! fn list(mut meta: Meta) -> Result<String, ApiError> {
//!     let campus = meta.positive("campus");
//!     let active = meta.bool("active")?;
//!     meta.parse_order("order", &["name", "created_at"]);
//!     Ok(format!("{campus} {active} {}", meta.order()))
//! }
//!
//! let meta = Meta::from_query("campus=3&active=1&order=-created_at").unwrap();
//! assert_eq!(list(meta).unwrap(), "3 true -created_at");
//! ```

mod error;
mod extract;
mod meta;
mod order;
mod values;

// Re-export all public types
pub use error::ParamError;
pub use meta::{
    AddErrors, Meta, YearMonth, FORMAT_KEY, LIMIT_KEY, MONTH_KEY, OFFSET_KEY, YEAR_KEY,
};
pub use order::{Order, Orders, SortOrder};
pub use values::Values;
