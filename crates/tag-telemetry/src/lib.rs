//! # Tag Telemetry
//!
//! Logging bootstrap for programs and test suites using `tag-storage`.
//!
//! The storage crates only emit `tracing` events; this crate installs the
//! subscriber that prints them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tag_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     init_logging(&TelemetryConfig::from_env()).expect("invalid log filter");
//!     // storage events are now printed
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TAG_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directives |
//! | `TAG_JSON_LOGS` | `false` | JSON output instead of pretty text |
//! | `TAG_SERVICE_NAME` | `tag-storage` | Service name attached to the startup line |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{directives}': {reason}")]
    InvalidFilter { directives: String, reason: String },
}
