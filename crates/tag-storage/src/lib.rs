//! # Tag Storage
//!
//! Persistent storage on MIFARE Classic RFID tags (Mini, 1K, 4K).
//!
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Layers
//!
//! | Layer | Type | Stores |
//! |-------|------|--------|
//! | Blocks | [`BlockStore`] | byte extents, skipping sector trailers |
//! | Files | [`FileStore`] | labelled payloads behind a header block |
//! | Dictionary | [`DictionaryMirror`] | string pairs, cached per tag UID |
//!
//! Every sector is authenticated with key A before access; every block
//! write is read back and verified. Failed device operations are retried
//! a bounded number of times.
//!
//! ## Module Structure
//!
//! ```text
//! tag-storage/
//! ├── domain/          # Geometry, header and dictionary formats, errors, events
//! ├── ports/           # API traits (inbound) + reader and sink traits (outbound)
//! ├── application/     # BlockStore, FileStore, DictionaryMirror
//! ├── adapters/        # InMemoryTag, event sinks
//! └── config.rs        # TagStorageConfig
//! ```
//!
//! ## Usage
//!
//! ```
//! use tag_storage::{DictionaryMirror, InMemoryTag, TagDictionaryApi, TagStorageConfig, TagType, Uid};
//!
//! let tag = InMemoryTag::new(TagType::Classic1K, Uid::new(vec![0xDE, 0xAD, 0xBE, 0xEF]));
//! let mut dictionary = DictionaryMirror::new(tag, &TagStorageConfig::default());
//!
//! dictionary.detect_medium().expect("tag in field");
//! dictionary.set("owner", "ada").unwrap();
//! assert_eq!(dictionary.get("owner").as_deref(), Some("ada"));
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{DeviceStats, FaultPlan, InMemoryTag, NullSink, RecordingSink, TracingSink};
pub use application::{BlockStore, DictionaryMirror, FileStore};
pub use config::{DictionaryConfig, TagStorageConfig, DICTIONARY_LABEL};
pub use domain::{
    Block, Component, DeviceError, DictionarySnapshot, Entry, ErrorKind, FileHeader, FileLabel,
    InvalidationReason, Operation, SectorKey, SkipReason, StorageEvent, TagStorageError, TagType,
    Uid, BLOCK_SIZE, FILE_MARKER, MAX_FILE_SIZE,
};
pub use ports::{EventSink, TagDevice, TagDictionaryApi, TagFileApi};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
