//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name logged at startup
    pub service_name: String,

    /// Filter directives (trace, debug, info, warn, error, or `target=level` lists)
    pub log_level: String,

    /// Whether to print JSON lines instead of pretty text
    pub json_logs: bool,

    /// Whether to print source file and line
    pub with_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tag-storage".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TAG_SERVICE_NAME`: Service name (default: tag-storage)
    /// - `TAG_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `TAG_JSON_LOGS`: Enable JSON logs (default: false)
    /// - `TAG_LOG_LOCATION`: Print file and line (default: false)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("TAG_SERVICE_NAME")
                .unwrap_or_else(|_| "tag-storage".to_string()),

            log_level: env::var("TAG_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("TAG_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),

            with_location: env::var("TAG_LOG_LOCATION")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Configuration for test suites: debug level, pretty output.
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }

    /// Set the filter directives.
    pub fn with_log_level(mut self, directives: impl Into<String>) -> Self {
        self.log_level = directives.into();
        self
    }
}
