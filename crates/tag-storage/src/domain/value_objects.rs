//! # Domain Value Objects
//!
//! Immutable value types shared by the storage layers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum label length in bytes.
pub const LABEL_LEN: usize = 12;

/// Unique identifier of the tag currently in the field.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uid(Vec<u8>);

impl Uid {
    /// Wrap raw UID bytes (4, 7 or 10 bytes on real cards).
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(&self.0))
    }
}

impl fmt::Debug for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uid({})", self)
    }
}

/// Six-byte sector key (key A).
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorKey(pub [u8; 6]);

impl SectorKey {
    /// Factory default key `FF FF FF FF FF FF`.
    pub const DEFAULT: SectorKey = SectorKey([0xFF; 6]);

    /// Parse a key from 12 hex digits.
    pub fn from_hex(text: &str) -> Option<Self> {
        let mut key = [0u8; 6];
        hex::decode_to_slice(text.trim(), &mut key).ok()?;
        Some(Self(key))
    }
}

impl Default for SectorKey {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// Keys never show up in logs.
impl fmt::Debug for SectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SectorKey(******)")
    }
}

/// Label identifying a file, truncated to 12 bytes and zero-padded.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileLabel([u8; LABEL_LEN]);

impl FileLabel {
    /// Build a label; bytes past the twelfth are dropped.
    pub fn new(label: &str) -> Self {
        let mut bytes = [0u8; LABEL_LEN];
        for (slot, byte) in bytes.iter_mut().zip(label.bytes()) {
            *slot = byte;
        }
        Self(bytes)
    }

    /// Wrap the twelve label bytes stored in a header block.
    pub fn from_raw(bytes: [u8; LABEL_LEN]) -> Self {
        Self(bytes)
    }

    /// Encoded bytes.
    pub fn as_bytes(&self) -> &[u8; LABEL_LEN] {
        &self.0
    }

    /// Compare against a stored label up to (and including) our first terminator.
    ///
    /// Bytes after the terminator are ignored, other writers may leave them dirty.
    pub fn matches(&self, stored: &[u8; LABEL_LEN]) -> bool {
        for (ours, theirs) in self.0.iter().zip(stored.iter()) {
            if ours != theirs {
                return false;
            }
            if *ours == 0 {
                break;
            }
        }
        true
    }
}

impl From<&str> for FileLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl fmt::Display for FileLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.0.iter().position(|b| *b == 0).unwrap_or(LABEL_LEN);
        f.write_str(&String::from_utf8_lossy(&self.0[..end]))
    }
}

impl fmt::Debug for FileLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileLabel({:?})", self.to_string())
    }
}
