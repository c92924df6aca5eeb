//! Configuration management using Figment
//!
//! Configuration is loaded from the following sources, highest precedence first:
//! 1. Environment variables (prefix `APIKIT_`, nested keys separated by `__`)
//! 2. Current working directory: `./apikit.toml`
//! 3. Default values
//!
//! For example `APIKIT_PARAMS__MAX_LIMIT=50` overrides `params.max_limit`.

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::serializer::MEDIA_TYPE_JSON;

/// File read by [`Config::load`]
pub const CONFIG_FILE: &str = "apikit.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "APIKIT_";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Response serialization
    #[serde(default)]
    pub serializer: SerializerConfig,

    /// Query parameter handling
    #[serde(default)]
    pub params: ParamsConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name, used in log output
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Log filter directive (trace, debug, info, warn, error or an `EnvFilter` string)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human readable multi-line output
    Pretty,
}

/// Serializer selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Media type used when a request expresses no preference
    #[serde(default = "default_media_type")]
    pub default_media_type: String,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            default_media_type: default_media_type(),
        }
    }
}

/// Query parameter handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamsConfig {
    /// Parameter holding the order expression
    #[serde(default = "default_order_key")]
    pub order_key: String,

    /// Largest accepted `limit`; larger values are rejected, not clamped
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            order_key: default_order_key(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_service_name() -> String {
    "apikit".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_media_type() -> String {
    MEDIA_TYPE_JSON.to_string()
}

fn default_order_key() -> String {
    "order".to_string()
}

fn default_max_limit() -> i64 {
    100
}

impl Config {
    /// Load configuration from `./apikit.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific file
    ///
    /// A missing file is not an error; defaults and environment overrides still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading configuration");

        let config = Self::figment(path).extract()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.name, "apikit");
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.service.log_format, LogFormat::Json);
        assert_eq!(config.serializer.default_media_type, "application/json");
        assert_eq!(config.params.order_key, "order");
        assert_eq!(config.params.max_limit, 100);
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_load_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "apikit.toml",
                r#"
                [service]
                name = "catalog"
                log_format = "pretty"

                [params]
                max_limit = 25
                order_key = "sort"
                "#,
            )?;
            jail.set_env("APIKIT_PARAMS__MAX_LIMIT", "50");
            jail.set_env("APIKIT_SERIALIZER__DEFAULT_MEDIA_TYPE", "application/x-www-form-urlencoded");

            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.service.name, "catalog");
            assert_eq!(config.service.log_level, "info");
            assert_eq!(config.service.log_format, LogFormat::Pretty);
            assert_eq!(config.params.order_key, "sort");
            assert_eq!(config.params.max_limit, 50);
            assert_eq!(
                config.serializer.default_media_type,
                "application/x-www-form-urlencoded"
            );
            Ok(())
        });
    }

    #[test]
    fn test_load_from_explicit_path() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[params]\nmax_limit = 7\n")?;
            let config = Config::load_from("custom.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.params.max_limit, 7);
            assert_eq!(config.params.order_key, "order");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_config_error() {
        Jail::expect_with(|jail| {
            jail.create_file("apikit.toml", "[params]\nmax_limit = \"many\"\n")?;
            let result = Config::load();
            assert!(matches!(result, Err(crate::Error::Config(_))));
            Ok(())
        });
    }
}
