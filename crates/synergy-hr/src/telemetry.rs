//! Tracing bootstrap for the service binaries. One global subscriber,
//! compact single-line output, filter taken from the loaded configuration.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("'{value}' is not a valid tracing filter")]
    Filter {
        value: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("tracing subscriber could not be installed")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Install the global subscriber. `SYNERGY_LOG` overrides the configured
/// filter for ad-hoc debugging sessions.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_env("SYNERGY_LOG") {
        Ok(filter) => filter,
        Err(_) => {
            EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
                value: config.log_level.clone(),
                source,
            })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(config.ansi)
        .compact()
        .try_init()
        .map_err(TelemetryError::Install)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_in_one_process_is_rejected() {
        let config = TelemetryConfig {
            log_level: "warn".to_string(),
            ansi: false,
        };
        init(&config).expect("first install succeeds");
        assert!(matches!(
            init(&config),
            Err(TelemetryError::Install(_))
        ));
    }
}
