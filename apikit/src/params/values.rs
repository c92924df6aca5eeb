//! Multi-valued query parameter maps

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameter name to ordered values, as produced by URL query decoding
///
/// Keys are kept sorted so [`Values::encode`] is deterministic, which makes
/// the encoded form usable as a cache key.
///
/// # Example
///
/// ```rust
/// use apikit::params::Values;
///
/// let values = Values::parse("tag=a&tag=b&limit=10").unwrap();
/// assert_eq!(values.get("tag"), Some("a"));
/// assert_eq!(values.get_all("tag"), &["a".to_string(), "b".to_string()]);
/// assert_eq!(values.encode().unwrap(), "limit=10&tag=a&tag=b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Values(BTreeMap<String, Vec<String>>);

impl Values {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw (percent-encoded) query string
    ///
    /// A leading `?` is ignored. Keys without `=` decode to an empty value.
    pub fn parse(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| Error::InvalidQuery(e.to_string()))?;
        Ok(pairs.into_iter().collect())
    }

    /// First value for the key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values for the key, empty if absent
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Replace all values for the key with a single value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    /// Append a value to the key
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Remove the key, returning its values
    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.0.remove(key)
    }

    /// Whether the key is present, regardless of its values
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate keys with their values in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }

    /// Encode as a query string, sorted by key
    pub fn encode(&self) -> Result<String> {
        let pairs: Vec<(&str, &str)> = self
            .0
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
            .collect();
        Ok(serde_urlencoded::to_string(pairs)?)
    }
}

impl<K, V> FromIterator<(K, V)> for Values
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        for (key, value) in iter {
            values.add(key, value);
        }
        values
    }
}

impl<'a> IntoIterator for &'a Values {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<BTreeMap<String, Vec<String>>> for Values {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}
