//! # Integration Tests
//!
//! Flows through all three storage layers on simulated tags.

pub mod dictionary_flows;
pub mod fault_tolerance;

use tag_storage::{InMemoryTag, TagType, Uid};
use tag_telemetry::{init_logging, TelemetryConfig};

/// Install a debug-level subscriber once per test binary.
///
/// Panics if the test filter is rejected.
pub fn init_test_logging() {
    init_logging(&TelemetryConfig::for_testing()).expect("valid test log filter");
}

/// A fresh tag of the given class with a 4-byte UID.
pub fn fresh_tag(tag_type: TagType, uid: [u8; 4]) -> InMemoryTag {
    InMemoryTag::new(tag_type, Uid::new(uid.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_logging_is_repeatable() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_testing_filter_is_accepted() {
        let installed = init_logging(&TelemetryConfig::for_testing());
        assert!(installed.is_ok());
    }
}
