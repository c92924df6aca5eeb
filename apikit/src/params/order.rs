//! Sort order expressions
//!
//! An order expression is a comma-separated list of field names, each
//! optionally prefixed with `-` for descending order: `-year,name,-month`.
//! Entry order defines tie-break priority and is always preserved.
//!
//! # Example
//!
//! ```rust
//! use apikit::params::{Orders, SortOrder};
//!
//! let orders = Orders::parse("-year,bogus,month", &["year", "month"]);
//! assert_eq!(orders.names(), vec!["year", "month"]);
//! assert_eq!(orders.get("year").map(|o| o.direction), Some(SortOrder::Desc));
//! assert_eq!(orders.to_string(), "-year,month");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sort direction for a single field
///
/// # Example
///
/// ```rust
/// use apikit::params::SortOrder;
///
/// assert_eq!(format!("{}", SortOrder::Asc), "asc");
/// assert_eq!(format!("{}", SortOrder::Desc), "desc");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Sort in ascending order (A-Z, 0-9, oldest first)
    #[default]
    Asc,
    /// Sort in descending order (Z-A, 9-0, newest first)
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// A single field of an order expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Order {
    /// Field name, without the direction prefix
    pub name: String,
    /// Sort direction
    pub direction: SortOrder,
}

impl Order {
    /// Ascending order on `name`
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: SortOrder::Asc,
        }
    }

    /// Descending order on `name`
    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: SortOrder::Desc,
        }
    }

    /// Whether this field sorts descending
    #[must_use]
    pub fn is_desc(&self) -> bool {
        self.direction == SortOrder::Desc
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_desc() {
            write!(f, "-{}", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// An ordered list of sort fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Orders(Vec<Order>);

impl Orders {
    /// Parse an order expression, keeping only whitelisted fields
    ///
    /// Tokens that are empty (including a bare `-`) are skipped. When the
    /// whitelist is non-empty, fields not in it are silently dropped. There
    /// is no whitespace trimming and no escaping: a field name cannot contain
    /// a comma.
    ///
    /// # Example
    ///
    /// ```rust
    /// use apikit::params::Orders;
    ///
    /// assert!(Orders::parse("", &[]).is_empty());
    /// assert_eq!(Orders::parse("-year,,-,n", &[]).len(), 2);
    /// ```
    #[must_use]
    pub fn parse(input: &str, whitelist: &[&str]) -> Self {
        let mut orders = Vec::new();
        for part in input.split(',') {
            let (name, direction) = match part.strip_prefix('-') {
                Some(rest) => (rest, SortOrder::Desc),
                None => (part, SortOrder::Asc),
            };

            if name.is_empty() {
                continue;
            }

            if !whitelist.is_empty() && !whitelist.contains(&name) {
                tracing::trace!(field = name, "dropping order field not in whitelist");
                continue;
            }

            orders.push(Order {
                name: name.to_string(),
                direction,
            });
        }
        Self(orders)
    }

    /// Whether a field with this name is present
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|order| order.name == name)
    }

    /// The first entry for this field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Order> {
        self.0.iter().find(|order| order.name == name)
    }

    /// Field names in order, without direction
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|order| order.name.as_str()).collect()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in priority order
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.0.iter()
    }
}

impl fmt::Display for Orders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, order) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{order}")?;
        }
        Ok(())
    }
}

impl FromStr for Orders {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s, &[]))
    }
}

impl From<Vec<Order>> for Orders {
    fn from(orders: Vec<Order>) -> Self {
        Self(orders)
    }
}

impl<'a> IntoIterator for &'a Orders {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
