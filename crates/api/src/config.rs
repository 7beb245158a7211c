//! Configuration loading and validation for the API service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any required variable is missing or invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated API service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Deployment mode: `"development"` enables per-request logging,
    /// `"production"` switches logs to JSON and hides error detail.
    #[serde(default = "default_run_mode")]
    pub run_mode: String,

    /// Port the HTTP listener binds on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// MongoDB connection URI. **Required.**
    pub mongo_uri: String,

    /// Directory served as static assets at the site root.
    #[serde(default = "default_public_dir")]
    pub public_dir: String,

    /// Maximum requests per client identity per rate-limit window.
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,

    /// Rate-limit window length in seconds.
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,

    /// Maximum accepted JSON body size in bytes.
    #[serde(default = "default_max_json_body")]
    pub max_json_body_bytes: usize,

    /// Maximum accepted multipart upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// CORS allowed origin; `"*"` permits any origin.
    #[serde(default = "default_cors_origin")]
    pub cors_allow_origin: String,

    /// Terminate the process after a logged panic instead of continuing.
    #[serde(default)]
    pub exit_on_fatal: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_run_mode() -> String {
    "development".into()
}
fn default_port() -> u16 {
    5000
}
fn default_public_dir() -> String {
    "public".into()
}
fn default_rate_limit_max() -> u32 {
    100
}
fn default_rate_limit_window() -> u64 {
    600
}
fn default_max_json_body() -> usize {
    100 * 1024
}
fn default_max_upload() -> usize {
    10 * 1024 * 1024
}
fn default_request_timeout() -> u64 {
    30
}
fn default_cors_origin() -> String {
    "*".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any required variable is absent or cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Whether per-request diagnostic logging is enabled.
    pub fn is_development(&self) -> bool {
        self.run_mode == "development"
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.mongo_uri, "MONGO_URI")?;

        if self.rate_limit_max == 0 {
            anyhow::bail!("RATE_LIMIT_MAX must be > 0");
        }
        if self.rate_limit_window_secs == 0 {
            anyhow::bail!("RATE_LIMIT_WINDOW_SECS must be > 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

impl Default for Config {
    /// Documented defaults with a localhost database URI. Intended for tests
    /// and local tooling; production loads via [`Config::from_env`].
    fn default() -> Self {
        Self {
            run_mode: default_run_mode(),
            port: default_port(),
            mongo_uri: "mongodb://localhost:27017/devcamper".into(),
            public_dir: default_public_dir(),
            rate_limit_max: default_rate_limit_max(),
            rate_limit_window_secs: default_rate_limit_window(),
            max_json_body_bytes: default_max_json_body(),
            max_upload_bytes: default_max_upload(),
            request_timeout_secs: default_request_timeout(),
            cors_allow_origin: default_cors_origin(),
            exit_on_fatal: false,
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_run_mode(), "development");
        assert_eq!(default_port(), 5000);
        assert_eq!(default_public_dir(), "public");
        assert_eq!(default_rate_limit_max(), 100);
        assert_eq!(default_rate_limit_window(), 600);
        assert_eq!(default_max_json_body(), 102_400);
        assert_eq!(default_max_upload(), 10_485_760);
        assert_eq!(default_request_timeout(), 30);
        assert_eq!(default_cors_origin(), "*");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_rejects_empty_mongo_uri() {
        let cfg = Config {
            mongo_uri: "".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_rate_limit() {
        let cfg = Config {
            rate_limit_max: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_window() {
        let cfg = Config {
            rate_limit_window_secs: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn development_mode_flag() {
        let cfg = Config::default();
        assert!(cfg.is_development());
        let prod = Config {
            run_mode: "production".into(),
            ..Config::default()
        };
        assert!(!prod.is_development());
    }
}
