//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;
use strum::{Display, EnumString};

/// Service name reported by the health endpoints.
pub const SERVICE_NAME: &str = "pickup-backend";

/// Service version reported by the health endpoints.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Deployment environment tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    /// Local development, relaxed validation.
    #[default]
    Development,
    /// Production deployment, strict validation.
    Production,
    /// Test runs, upstream usually mocked.
    Testing,
}

impl Environment {
    /// Check if this is the production tier.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the upstream ML service.
    #[serde(default = "default_ml_service_url")]
    pub ml_service_url: String,

    /// Port the gateway listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log filter (tracing EnvFilter syntax).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Session secret. Must be overridden in production.
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Deployment environment tier.
    #[serde(default)]
    pub app_env: Environment,

    /// Timeout for the upstream predict call, in seconds.
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,

    /// Timeout for the upstream health probe, in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

fn default_ml_service_url() -> String {
    "http://ml:5001".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_secret_key() -> String {
    "dev-secret-key".to_string()
}

fn default_upstream_timeout() -> u64 {
    10
}

fn default_probe_timeout() -> u64 {
    5
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.ml_service_url.is_empty() {
            return Err("ML_SERVICE_URL is required".to_string());
        }

        if url::Url::parse(&self.ml_service_url).is_err() {
            return Err(format!(
                "ML_SERVICE_URL is not a valid URL: {}",
                self.ml_service_url
            ));
        }

        if self.upstream_timeout_secs == 0 {
            return Err("UPSTREAM_TIMEOUT_SECS must be positive".to_string());
        }

        if self.probe_timeout_secs == 0 {
            return Err("PROBE_TIMEOUT_SECS must be positive".to_string());
        }

        if self.app_env.is_production() && self.secret_key == default_secret_key() {
            return Err("SECRET_KEY must be set in production".to_string());
        }

        Ok(())
    }

    /// Timeout for the upstream predict call.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Timeout for the upstream health probe.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            ml_service_url: default_ml_service_url(),
            port: default_port(),
            rust_log: default_log_level(),
            secret_key: default_secret_key(),
            app_env: Environment::Development,
            upstream_timeout_secs: default_upstream_timeout(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_ml_service_url(), "http://ml:5001");
        assert_eq!(default_port(), 5000);
        assert_eq!(default_upstream_timeout(), 10);
        assert_eq!(default_probe_timeout(), 5);
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_upstream_url() {
        let mut config = test_config();
        config.ml_service_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unparseable_upstream_url() {
        let mut config = test_config();
        config.ml_service_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeouts() {
        let mut config = test_config();
        config.upstream_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.probe_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_default_secret_in_production() {
        let mut config = test_config();
        config.app_env = Environment::Production;
        assert!(config.validate().is_err());

        config.secret_key = "real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_parses_from_string() {
        use std::str::FromStr;
        assert_eq!(
            Environment::from_str("production").unwrap(),
            Environment::Production
        );
        assert_eq!(
            Environment::from_str("TESTING").unwrap(),
            Environment::Testing
        );
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn timeout_helpers_convert_to_duration() {
        let config = test_config();
        assert_eq!(config.upstream_timeout(), Duration::from_secs(10));
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
    }
}
