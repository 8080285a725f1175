//! # File Header
//!
//! One-block header that starts every labelled file.
//!
//! ```text
//! byte  0       marker 0x1C (ASCII file separator)
//! bytes 1..=12  label, zero-padded
//! byte  13      flags, reserved (0)
//! bytes 14..=15 payload size, little-endian u16
//! ```

use super::geometry::{Block, BLOCK_SIZE};
use super::value_objects::{FileLabel, LABEL_LEN};

/// Marker byte of a header block.
pub const FILE_MARKER: u8 = 0x1C;

/// Largest payload a header can describe.
pub const MAX_FILE_SIZE: usize = u16::MAX as usize;

const LABEL_OFFSET: usize = 1;
const FLAGS_OFFSET: usize = LABEL_OFFSET + LABEL_LEN;
const SIZE_OFFSET: usize = FLAGS_OFFSET + 1;

/// Decoded header block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    /// Stored label.
    pub label: FileLabel,
    /// Payload size in bytes.
    pub size: u16,
}

impl FileHeader {
    /// Create a header.
    pub fn new(label: FileLabel, size: u16) -> Self {
        Self { label, size }
    }

    /// Encode into a full block.
    pub fn encode(&self) -> Block {
        let mut block = [0u8; BLOCK_SIZE];
        block[0] = FILE_MARKER;
        block[LABEL_OFFSET..FLAGS_OFFSET].copy_from_slice(self.label.as_bytes());
        block[SIZE_OFFSET..].copy_from_slice(&self.size.to_le_bytes());
        block
    }

    /// Decode a block; `None` when the marker is missing.
    pub fn decode(block: &Block) -> Option<Self> {
        if block[0] != FILE_MARKER {
            return None;
        }
        let mut label = [0u8; LABEL_LEN];
        label.copy_from_slice(&block[LABEL_OFFSET..FLAGS_OFFSET]);
        let size = u16::from_le_bytes([block[SIZE_OFFSET], block[SIZE_OFFSET + 1]]);
        Some(Self {
            label: FileLabel::from_raw(label),
            size,
        })
    }
}
