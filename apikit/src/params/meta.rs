//! Typed, validating access to request parameters
//!
//! [`Meta`] holds two parameter sets for one request: the raw values decoded
//! from the query string, and the values that typed getters have accepted.
//! Every successful getter call copies the canonical form of what it parsed
//! into the accepted set, so [`Meta::valid`] is an exact record of which
//! parameters the handler actually used.
//!
//! Two kinds of getter exist. Fail-soft getters return a zero value for
//! missing or invalid input and never error; use [`Meta::has`] to tell absent
//! from invalid. Fail-loud getters return a [`ParamError`].
//!
//! # Example
//!
//! ```rust
//! use apikit::params::Meta;
//!
//! let mut meta = Meta::from_query("campus=1&limit=500&ids=1,%202,3,&order=-year,bogus").unwrap();
//!
//! assert_eq!(meta.positive("campus"), 1);
//! assert_eq!(meta.positive_max("limit", 100), 0);
//! assert_eq!(meta.multiple_positives("ids"), vec![1, 2, 3]);
//! meta.parse_order("order", &["year", "name"]);
//!
//! assert_eq!(meta.valid().encode().unwrap(), "campus=1&ids=1%2C2%2C3&order=-year");
//! ```

use chrono::{DateTime, FixedOffset, Month, Utc};
use serde::{Deserialize, Serialize};

use super::{order::Orders, values::Values, ParamError};
use crate::api_error::ApiError;
use crate::config::ParamsConfig;
use crate::error::Result;

/// Parameter read by [`Meta::format`]
pub const FORMAT_KEY: &str = "format";
/// Parameter read by [`Meta::month`]
pub const MONTH_KEY: &str = "month";
/// Parameter read by [`Meta::year_month`]
pub const YEAR_KEY: &str = "year";
/// Parameter read by [`Meta::paginate`] for the page size
pub const LIMIT_KEY: &str = "limit";
/// Parameter read by [`Meta::paginate`] for the page start
pub const OFFSET_KEY: &str = "offset";

/// A validated year and month
///
/// `year` is 0 when the month was valid but the year was missing or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    /// Requested year, 0 if absent or invalid
    pub year: i64,
    /// Requested month
    pub month: Month,
}

/// Something a response can attach errors to
pub trait AddErrors {
    /// Record an error on the response
    fn add_errors(&mut self, errors: ApiError);
}

/// Per-request parameter accessor
///
/// Serializes as the response metadata block: `limit`, `offset` and, when
/// present, `errors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Page size echoed back to the client
    pub limit: i64,
    /// Page start echoed back to the client
    pub offset: i64,
    /// Errors collected while handling the request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ApiError>,
    #[serde(skip)]
    order: Orders,
    #[serde(skip)]
    valid: Values,
    #[serde(skip)]
    dirty: Values,
}

impl Meta {
    /// Wrap decoded request parameters
    #[must_use]
    pub fn new(dirty: Values) -> Self {
        Self {
            dirty,
            ..Self::default()
        }
    }

    /// Decode a raw query string and wrap it
    pub fn from_query(query: &str) -> Result<Self> {
        Ok(Self::new(Values::parse(query)?))
    }

    /// Whether the key was sent at all, valid or not
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.dirty.contains_key(key)
    }

    /// The parsed sort order, empty until [`Meta::parse_order`] is called
    #[must_use]
    pub fn order(&self) -> &Orders {
        &self.order
    }

    /// The raw parameters this accessor was built from
    #[must_use]
    pub fn raw(&self) -> &Values {
        &self.dirty
    }

    /// Parameters accepted so far, in canonical form
    #[must_use]
    pub fn valid(&self) -> &Values {
        &self.valid
    }

    /// Retract a previously accepted parameter
    pub fn delete(&mut self, key: &str) {
        self.valid.remove(key);
    }

    /// Accept a value without validation
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.valid.set(key, value);
    }

    fn raw_value(&self, key: &str) -> &str {
        self.dirty.get(key).unwrap_or_default()
    }

    fn accept(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        tracing::trace!(key, value = %value, "accepted parameter");
        self.valid.set(key, value);
    }

    // Sanitization
    // ------------

    /// Boolean parameter; errors when the value is not a boolean literal
    ///
    /// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and the matching false
    /// forms. A missing or empty value is an error.
    pub fn bool(&mut self, key: &str) -> std::result::Result<bool, ParamError> {
        let raw = self.raw_value(key);
        match parse_bool(raw) {
            Some(b) => {
                self.accept(key, if b { "true" } else { "false" });
                Ok(b)
            }
            None => {
                let err = ParamError::InvalidBool {
                    key: key.to_string(),
                    value: raw.to_string(),
                };
                tracing::debug!(key, error = %err, "rejected parameter");
                Err(err)
            }
        }
    }

    /// Output format, trimmed and lower-cased
    pub fn format(&mut self) -> String {
        let format = self.raw_value(FORMAT_KEY).trim().to_lowercase();
        if !format.is_empty() {
            self.accept(FORMAT_KEY, format.clone());
        }
        format
    }

    /// The `month` parameter as a calendar month
    ///
    /// A month outside 1-12 is an error and is not left in the accepted set.
    /// When the raw value is a positive number outside that range, any
    /// `month` already in the accepted set is removed too, including one
    /// added with [`Meta::set`].
    pub fn month(&mut self) -> std::result::Result<Month, ParamError> {
        let value = self.positive(MONTH_KEY);
        let month = u8::try_from(value)
            .ok()
            .and_then(|m| Month::try_from(m).ok());
        match month {
            Some(month) => Ok(month),
            None => {
                if value > 0 {
                    self.delete(MONTH_KEY);
                }
                let err = ParamError::MonthOutOfRange { value };
                tracing::debug!(key = MONTH_KEY, error = %err, "rejected parameter");
                Err(err)
            }
        }
    }

    /// Comma-separated integers, keeping the nonzero ones
    ///
    /// Tokens are trimmed; tokens that fail to parse are dropped. The
    /// accepted form is the surviving values joined by commas.
    pub fn multiple_positives(&mut self, key: &str) -> Vec<i64> {
        let values: Vec<i64> = self
            .raw_value(key)
            .to_lowercase()
            .split(',')
            .filter_map(|part| parse_int(part.trim()))
            .filter(|&n| n != 0)
            .collect();
        if !values.is_empty() {
            let canonical = values
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            self.accept(key, canonical);
        }
        values
    }

    /// Comma-separated strings, trimmed, lower-cased, empties dropped
    pub fn multiple_strings(&mut self, key: &str) -> Vec<String> {
        let values: Vec<String> = self
            .raw_value(key)
            .to_lowercase()
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        if !values.is_empty() {
            self.accept(key, values.join(","));
        }
        values
    }

    /// Integer greater than zero, or 0
    ///
    /// The raw value is not trimmed: `" 5"` is rejected.
    pub fn positive(&mut self, key: &str) -> i64 {
        match parse_int(self.raw_value(key)) {
            Some(n) if n > 0 => {
                self.accept(key, n.to_string());
                n
            }
            _ => 0,
        }
    }

    /// Integer in `1..=max`, or 0
    pub fn positive_max(&mut self, key: &str, max: i64) -> i64 {
        match parse_int(self.raw_value(key)) {
            Some(n) if n > 0 && n <= max => {
                self.accept(key, n.to_string());
                n
            }
            _ => 0,
        }
    }

    /// Non-empty string, or an empty string
    ///
    /// The raw value is accepted verbatim, without trimming.
    pub fn string(&mut self, key: &str) -> String {
        let value = self.raw_value(key).to_string();
        if !value.is_empty() {
            self.accept(key, value.clone());
        }
        value
    }

    /// RFC 3339 timestamp, with optional fractional seconds
    ///
    /// The date and time must be separated by an upper-case `T` and UTC
    /// written as `Z` or a numeric offset. The original string, not a
    /// re-formatted one, is accepted.
    pub fn timestamp(&mut self, key: &str) -> std::result::Result<DateTime<Utc>, ParamError> {
        let raw = self.raw_value(key).to_string();
        match parse_timestamp(&raw) {
            Ok(timestamp) => {
                self.accept(key, raw);
                Ok(timestamp.with_timezone(&Utc))
            }
            Err(e) => {
                let err = ParamError::InvalidTimestamp {
                    key: key.to_string(),
                    value: raw,
                    reason: e,
                };
                tracing::debug!(key, error = %err, "rejected parameter");
                Err(err)
            }
        }
    }

    /// Whether the parameter is a true boolean
    ///
    /// Only a true value is accepted; false and invalid input both return
    /// false.
    pub fn is_true(&mut self, key: &str) -> bool {
        if parse_bool(self.raw_value(key)) == Some(true) {
            self.accept(key, "true");
            return true;
        }
        false
    }

    /// The requested year and month, if either was sent
    ///
    /// Returns `Ok(None)` when neither `year` nor `month` is present. An
    /// invalid month is an error. The year is read after the month and falls
    /// back to 0 when missing or invalid, even though the month was valid.
    pub fn year_month(&mut self) -> std::result::Result<Option<YearMonth>, ParamError> {
        if !(self.has(YEAR_KEY) || self.has(MONTH_KEY)) {
            return Ok(None);
        }

        let month = self.month()?;
        let year = self.positive(YEAR_KEY);
        Ok(Some(YearMonth { year, month }))
    }

    /// Parse the sort order under `key`, keeping whitelisted fields
    ///
    /// The result replaces any previously parsed order. It is accepted in its
    /// serialized form only when at least one field survived.
    pub fn parse_order(&mut self, key: &str, whitelist: &[&str]) -> &Orders {
        self.order = Orders::parse(self.raw_value(key), whitelist);
        if !self.order.is_empty() {
            let canonical = self.order.to_string();
            self.accept(key, canonical);
        }
        &self.order
    }

    /// Parse the sort order under the configured key
    pub fn parse_configured_order(&mut self, config: &ParamsConfig, whitelist: &[&str]) -> &Orders {
        self.parse_order(&config.order_key, whitelist)
    }

    /// Read `limit` (bounded by the configured maximum) and `offset`
    ///
    /// Both fall back to 0 when missing or invalid.
    pub fn paginate(&mut self, config: &ParamsConfig) -> &mut Self {
        self.limit = self.positive_max(LIMIT_KEY, config.max_limit);
        self.offset = self.positive(OFFSET_KEY);
        self
    }
}

impl AddErrors for Meta {
    fn add_errors(&mut self, errors: ApiError) {
        match self.errors.as_mut() {
            Some(existing) => existing.merge(errors),
            None => self.errors = Some(errors),
        }
    }
}

/// Base-10 integer with an optional sign, no surrounding whitespace
fn parse_int(s: &str) -> Option<i64> {
    s.parse().ok()
}

/// Strict RFC 3339: `T` separator, `Z` or `±hh:mm` zone
fn parse_timestamp(s: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    if s.as_bytes().get(10) != Some(&b'T') {
        return Err("date and time must be separated by 'T'".to_string());
    }
    if s.ends_with('z') {
        return Err("UTC must be written as 'Z'".to_string());
    }
    DateTime::parse_from_rfc3339(s).map_err(|e| e.to_string())
}

/// Boolean literal in any of the accepted spellings
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
