//! Subscriber installation.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and one
//! formatting layer, pretty for development or JSON for log shippers.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, so test
/// suites may call this from every test.
pub fn init_logging(config: &TelemetryConfig) -> Result<bool, TelemetryError> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::InvalidFilter {
            directives: config.log_level.clone(),
            reason: e.to_string(),
        })?;

    let installed = if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.with_location)
            .with_line_number(config.with_location);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .try_init()
            .is_ok()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(config.with_location)
            .with_line_number(config.with_location);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::info!(
            service = %config.service_name,
            filter = %config.log_level,
            json = config.json_logs,
            "Logging initialized"
        );
    }
    Ok(installed)
}
