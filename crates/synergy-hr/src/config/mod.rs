//! Environment-driven configuration. Every knob is a `SYNERGY_*` variable so
//! the service reads nothing a co-located process might also own.

use std::env;
use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a port number between 1 and 65535, got '{value}'")]
    InvalidPort { name: &'static str, value: String },
    #[error("{name} must be an IP address or 'localhost', got '{value}'")]
    InvalidHost { name: &'static str, value: String },
    #[error("{name} must be a boolean flag (true/false, on/off, 1/0), got '{value}'")]
    InvalidFlag { name: &'static str, value: String },
}

/// Deployment stage. Picks the logging default when `SYNERGY_LOG_LEVEL` is
/// not set explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Development,
    Test,
    Production,
}

impl RuntimeEnv {
    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    const fn default_log_level(self) -> &'static str {
        match self {
            RuntimeEnv::Development => "debug",
            RuntimeEnv::Test => "warn",
            RuntimeEnv::Production => "info",
        }
    }
}

/// Top-level configuration for the HR operations service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: RuntimeEnv,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub metrics: MetricsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = RuntimeEnv::from_env_value(&env_or("SYNERGY_ENV", "development"));

        let host = env_or("SYNERGY_HOST", "127.0.0.1");
        let port_raw = env_or("SYNERGY_PORT", "8080");
        let port = match port_raw.parse::<u16>() {
            Ok(port) if port != 0 => port,
            _ => {
                return Err(ConfigError::InvalidPort {
                    name: "SYNERGY_PORT",
                    value: port_raw,
                })
            }
        };

        let log_level = env::var("SYNERGY_LOG_LEVEL")
            .unwrap_or_else(|_| environment.default_log_level().to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: flag("SYNERGY_LOG_ANSI", false)?,
            },
            metrics: MetricsConfig {
                enabled: flag("SYNERGY_METRICS_ENABLED", true)?,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            self.host.parse().map_err(|_| ConfigError::InvalidHost {
                name: "SYNERGY_HOST",
                value: self.host.clone(),
            })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Prometheus exporter toggle. Off means the `/metrics` surface is absent
/// entirely, not just empty.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub enabled: bool,
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(true),
            "0" | "false" | "off" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { name, value }),
        },
    }
}
