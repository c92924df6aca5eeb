//! Media type lookup and content negotiation

use std::collections::BTreeMap;
use std::sync::Arc;

use http::HeaderValue;

use super::{Form, Json, Serializer};
use crate::config::SerializerConfig;
use crate::error::{Error, Result};

/// Serializers keyed by media type, with one default
///
/// # Example
///
/// ```rust
/// use apikit::serializer::SerializerRegistry;
/// use http::HeaderValue;
///
/// let registry = SerializerRegistry::with_defaults();
/// let accept = HeaderValue::from_static("application/x-www-form-urlencoded;q=0.9");
///
/// assert_eq!(registry.negotiate("", Some(&accept)).unwrap().name(), "form");
/// assert_eq!(registry.negotiate("json", Some(&accept)).unwrap().name(), "json");
/// assert!(registry.negotiate("yaml", None).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SerializerRegistry {
    serializers: BTreeMap<String, Arc<dyn Serializer>>,
    default: Arc<dyn Serializer>,
}

impl SerializerRegistry {
    /// A registry holding only `default`
    pub fn new(default: Arc<dyn Serializer>) -> Self {
        let mut serializers = BTreeMap::new();
        serializers.insert(default.media_type().to_ascii_lowercase(), Arc::clone(&default));
        Self {
            serializers,
            default,
        }
    }

    /// JSON (default) and URL-encoded form
    pub fn with_defaults() -> Self {
        let mut registry = Self::new(Arc::new(Json));
        registry.register(Arc::new(Form));
        registry
    }

    /// The built-in serializers with the configured default
    ///
    /// Fails with [`Error::UnsupportedMediaType`] when the configured media
    /// type is not registered.
    pub fn from_config(config: &SerializerConfig) -> Result<Self> {
        let mut registry = Self::with_defaults();
        let default = registry
            .get(&config.default_media_type)
            .ok_or_else(|| Error::UnsupportedMediaType(config.default_media_type.clone()))?;
        registry.default = default;
        Ok(registry)
    }

    /// Add or replace the serializer for its media type
    pub fn register(&mut self, serializer: Arc<dyn Serializer>) -> &mut Self {
        self.serializers
            .insert(serializer.media_type().to_ascii_lowercase(), serializer);
        self
    }

    /// Serializer for a media type
    ///
    /// Matching ignores case and any parameters such as `charset`.
    pub fn get(&self, media_type: &str) -> Option<Arc<dyn Serializer>> {
        let essence = essence(media_type);
        self.serializers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(essence))
            .map(|(_, serializer)| Arc::clone(serializer))
    }

    /// Serializer with the given short name, as used by the `format` parameter
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn Serializer>> {
        self.serializers
            .values()
            .find(|serializer| serializer.name().eq_ignore_ascii_case(name))
            .map(Arc::clone)
    }

    /// Serializer used when nothing else matches
    pub fn default_serializer(&self) -> Arc<dyn Serializer> {
        Arc::clone(&self.default)
    }

    /// Pick a serializer for a request
    ///
    /// A non-empty `format` must name a registered serializer. Otherwise the
    /// `Accept` entries are tried in the order given (quality values are not
    /// ranked) and the default is used when none match.
    pub fn negotiate(&self, format: &str, accept: Option<&HeaderValue>) -> Result<Arc<dyn Serializer>> {
        if !format.is_empty() {
            return self.by_name(format).ok_or_else(|| {
                tracing::debug!(format, "unknown format requested");
                Error::UnsupportedMediaType(format.to_string())
            });
        }

        if let Some(accept) = accept.and_then(|value| value.to_str().ok()) {
            for candidate in accept.split(',').map(essence) {
                if candidate == "*/*" {
                    return Ok(self.default_serializer());
                }
                if let Some(serializer) = self.get(candidate) {
                    return Ok(serializer);
                }
            }
            tracing::debug!(accept, "no acceptable serializer, using default");
        }

        Ok(self.default_serializer())
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn essence(media_type: &str) -> &str {
    media_type.split(';').next().unwrap_or_default().trim()
}
