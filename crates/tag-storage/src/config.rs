//! # Tag Storage Configuration
//!
//! Retry bounds, sector key and dictionary placement.

use crate::domain::value_objects::SectorKey;
use serde::{Deserialize, Serialize};
use std::env;

/// Attempts per authentication and per block read / write-verify cycle.
pub const DEFAULT_ATTEMPTS: u8 = 5;

/// Attempts per tag detection.
pub const DEFAULT_DETECT_ATTEMPTS: u8 = 2;

/// Label of the file holding the dictionary.
pub const DICTIONARY_LABEL: &str = "_rfiddict_";

/// Storage stack configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagStorageConfig {
    /// Key A used for every sector.
    pub key_a: SectorKey,

    /// Attempts per sector authentication.
    pub auth_attempts: u8,

    /// Attempts per block read and per block write-verify cycle.
    pub io_attempts: u8,

    /// Attempts per tag detection.
    pub detect_attempts: u8,

    /// Dictionary placement.
    pub dictionary: DictionaryConfig,
}

/// Where and how the dictionary is stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Block holding the dictionary file header.
    pub start_block: u16,

    /// File label (at most 12 bytes are significant).
    pub label: String,

    /// Entries reserved up front in the snapshot.
    pub initial_pairs: usize,

    /// Entries added whenever the snapshot is full.
    pub growth_pairs: usize,
}

impl Default for TagStorageConfig {
    fn default() -> Self {
        Self {
            key_a: SectorKey::DEFAULT,
            auth_attempts: DEFAULT_ATTEMPTS,
            io_attempts: DEFAULT_ATTEMPTS,
            detect_attempts: DEFAULT_DETECT_ATTEMPTS,
            dictionary: DictionaryConfig::default(),
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            start_block: 1,
            label: DICTIONARY_LABEL.to_string(),
            initial_pairs: 15,
            growth_pairs: 15,
        }
    }
}

impl TagStorageConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config for testing (single attempts, so faults surface at once).
    pub fn for_testing() -> Self {
        Self {
            auth_attempts: 1,
            io_attempts: 1,
            detect_attempts: 1,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TAG_KEY_A`: key A as 12 hex digits (default: FFFFFFFFFFFF)
    /// - `TAG_RETRY_ATTEMPTS`: authentication and block attempts (default: 5)
    /// - `TAG_DICT_START_BLOCK`: dictionary start block (default: 1)
    /// - `TAG_DICT_LABEL`: dictionary file label (default: _rfiddict_)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let attempts = env::var("TAG_RETRY_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &u8| *n > 0);

        Self {
            key_a: env::var("TAG_KEY_A")
                .ok()
                .and_then(|v| SectorKey::from_hex(&v))
                .unwrap_or(defaults.key_a),

            auth_attempts: attempts.unwrap_or(defaults.auth_attempts),

            io_attempts: attempts.unwrap_or(defaults.io_attempts),

            detect_attempts: defaults.detect_attempts,

            dictionary: DictionaryConfig {
                start_block: env::var("TAG_DICT_START_BLOCK")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.dictionary.start_block),

                label: env::var("TAG_DICT_LABEL").unwrap_or(defaults.dictionary.label),

                ..defaults.dictionary
            },
        }
    }

    /// Set key A.
    pub fn with_key_a(mut self, key: SectorKey) -> Self {
        self.key_a = key;
        self
    }

    /// Set authentication and block attempts.
    pub fn with_attempts(mut self, attempts: u8) -> Self {
        self.auth_attempts = attempts.max(1);
        self.io_attempts = attempts.max(1);
        self
    }

    /// Set the dictionary start block.
    pub fn with_dictionary_start(mut self, block: u16) -> Self {
        self.dictionary.start_block = block;
        self
    }

    /// Set the dictionary file label.
    pub fn with_dictionary_label(mut self, label: impl Into<String>) -> Self {
        self.dictionary.label = label.into();
        self
    }
}
