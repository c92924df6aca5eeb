//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};
use crate::error::Result;

/// Install a global `tracing` subscriber configured from `config.service`
///
/// The filter comes from `log_level`, falling back to `info` when it does not
/// parse. Installing twice is not an error: the first subscriber stays active.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.service.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match config.service.log_format {
        LogFormat::Json => builder.json().try_init().is_ok(),
        LogFormat::Pretty => builder.pretty().try_init().is_ok(),
    };

    if installed {
        tracing::info!("Tracing initialized for service: {}", config.service.name);
    } else {
        tracing::debug!("global subscriber already installed, keeping it");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        let mut config = Config::default();
        config.service.log_level = "not a [valid filter".to_string();
        assert!(init_tracing(&config).is_ok());

        config.service.log_format = LogFormat::Pretty;
        assert!(init_tracing(&config).is_ok());
    }
}
