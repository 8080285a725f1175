//! # Inbound Ports (Driving Ports)
//!
//! The APIs this library exposes to host programs.

use crate::domain::errors::Result;
use crate::domain::value_objects::{FileLabel, Uid};

/// Labelled files on a tag.
///
/// A file is identified by the pair (start block, label). Files must not
/// overlap; the caller picks non-overlapping start blocks.
pub trait TagFileApi {
    /// Write a header block and the payload after it.
    ///
    /// Returns the last block written.
    ///
    /// ## Errors
    ///
    /// - `FileTooLarge`: payload above 65535 bytes
    /// - `OutOfAddressSpace`: the file does not fit
    /// - `AuthenticationFailure`, `BlockWriteFailure`, `VerificationMismatch`
    fn write_file(&mut self, start_block: u16, label: &FileLabel, data: &[u8]) -> Result<u16>;

    /// Size recorded in the header at `start_block`.
    ///
    /// ## Errors
    ///
    /// - `NotAFile`: no header at this block
    /// - `LabelMismatch`: header with another label
    fn read_file_size(&mut self, start_block: u16, label: &FileLabel) -> Result<usize>;

    /// Read the payload of a file.
    ///
    /// ## Errors
    ///
    /// - `BufferTooSmall`: `capacity` below the stored size
    /// - everything `read_file_size` raises
    fn read_file(&mut self, start_block: u16, label: &FileLabel, capacity: usize)
        -> Result<Vec<u8>>;

    /// Whether a file with this label starts at `start_block`.
    fn exists_file(&mut self, start_block: u16, label: &FileLabel) -> bool;
}

/// String dictionary persisted on the tag.
///
/// Reads come from an in-memory snapshot, reloaded whenever the tag in the
/// field changes. Writes go through to the tag immediately.
pub trait TagDictionaryApi {
    /// Select a tag; the snapshot reloads lazily on the next call.
    fn detect_medium(&mut self) -> Option<Uid>;

    /// Value stored under `key`. `None` when absent or when loading failed.
    fn get(&mut self, key: &str) -> Option<String>;

    /// Whether `key` is present. `false` when loading failed.
    fn has_key(&mut self, key: &str) -> bool;

    /// Key of the `index`-th entry in insertion order.
    fn key_at(&mut self, index: usize) -> Option<String>;

    /// Number of entries; `None` when loading failed.
    fn num_entries(&mut self) -> Option<usize>;

    /// Insert or overwrite an entry and write the dictionary through.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove an entry and write the dictionary through.
    ///
    /// ## Errors
    ///
    /// - `KeyNotFound`: nothing to remove, nothing written
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Halt the tag and drop the snapshot.
    fn disconnect(&mut self, allow_redetection: bool);
}
