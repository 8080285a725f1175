//! # Domain Errors
//!
//! Error types for the tag storage stack.
//!
//! Every failure carries the [`Operation`] it came from, and through it the
//! layer (block store, file layer, dictionary) that raised it, plus the block
//! or sector involved. Device failures are kept as the error source.

use super::value_objects::FileLabel;
use std::fmt;
use thiserror::Error;

/// Storage layer that raised an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Component {
    /// Block addressing, authentication and retries.
    BlockStore,
    /// Labelled files.
    FileLayer,
    /// Key-value dictionary.
    Dictionary,
}

/// Public operation an error originated in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Sector authentication.
    Authenticate,
    /// Unlabelled extent write.
    WriteExtent,
    /// Unlabelled extent read.
    ReadExtent,
    /// Capacity query.
    Capacity,
    /// Labelled file write (header or payload).
    WriteFile,
    /// Header lookup.
    ReadFileSize,
    /// Labelled file read.
    ReadFile,
    /// Dictionary load.
    LoadDictionary,
    /// Dictionary save.
    SaveDictionary,
    /// Dictionary removal.
    Remove,
}

impl Operation {
    /// Layer owning this operation.
    pub fn component(self) -> Component {
        match self {
            Self::Authenticate | Self::WriteExtent | Self::ReadExtent | Self::Capacity => {
                Component::BlockStore
            }
            Self::WriteFile | Self::ReadFileSize | Self::ReadFile => Component::FileLayer,
            Self::LoadDictionary | Self::SaveDictionary | Self::Remove => Component::Dictionary,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authenticate => "authenticate",
            Self::WriteExtent => "write_extent",
            Self::ReadExtent => "read_extent",
            Self::Capacity => "capacity",
            Self::WriteFile => "write_file",
            Self::ReadFileSize => "read_file_size",
            Self::ReadFile => "read_file",
            Self::LoadDictionary => "load_dictionary",
            Self::SaveDictionary => "save_dictionary",
            Self::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// Failures reported by the tag reader driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// No tag is selected.
    #[error("no tag present")]
    NotPresent,

    /// The sector key was rejected.
    #[error("sector key rejected")]
    AuthenticationRejected,

    /// The block's sector is not authenticated.
    #[error("sector not authenticated")]
    NotAuthenticated,

    /// The block cannot be accessed with the current access bits.
    #[error("access denied")]
    AccessDenied,

    /// Link-level failure (timeout, CRC, collision).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Fieldless mirror of [`TagStorageError`] for matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    AuthenticationFailure,
    BlockReadFailure,
    BlockWriteFailure,
    VerificationMismatch,
    OutOfAddressSpace,
    NotAFile,
    LabelMismatch,
    BufferTooSmall,
    KeyNotFound,
    CapacityExceeded,
    FileTooLarge,
    MediumNotPresent,
}

/// Errors raised by the storage stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagStorageError {
    /// Sector key rejected on every attempt.
    #[error("{op}: authentication of sector {sector} failed after {attempts} attempts")]
    AuthenticationFailure {
        op: Operation,
        sector: u8,
        attempts: u8,
        source: DeviceError,
    },

    /// Block could not be read.
    #[error("{op}: could not read block {block} after {attempts} attempts")]
    BlockReadFailure {
        op: Operation,
        block: u16,
        attempts: u8,
        source: DeviceError,
    },

    /// Block could not be written.
    #[error("{op}: could not write block {block} after {attempts} attempts")]
    BlockWriteFailure {
        op: Operation,
        block: u16,
        attempts: u8,
        source: DeviceError,
    },

    /// Read-back after a write differed from the data written.
    #[error("{op}: block {block} did not verify after {attempts} attempts")]
    VerificationMismatch {
        op: Operation,
        block: u16,
        attempts: u8,
    },

    /// The extent ran past the last block of the tag.
    #[error("{op}: block {block} is past the end of the tag ({block_count} blocks)")]
    OutOfAddressSpace {
        op: Operation,
        block: u16,
        block_count: u16,
    },

    /// The block does not start a file.
    #[error("{op}: block {block} does not start a file")]
    NotAFile { op: Operation, block: u16 },

    /// The block starts a file with another label.
    #[error("{op}: block {block} holds file {found}, expected {expected}")]
    LabelMismatch {
        op: Operation,
        block: u16,
        expected: FileLabel,
        found: FileLabel,
    },

    /// The caller's buffer cannot hold the stored file.
    #[error("{op}: file needs {required} bytes, capacity is {capacity}")]
    BufferTooSmall {
        op: Operation,
        required: usize,
        capacity: usize,
    },

    /// No entry with this key.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// The serialized dictionary does not fit on the tag.
    #[error("dictionary needs {required} bytes, {available} available")]
    CapacityExceeded { required: usize, available: usize },

    /// Payload larger than a header can describe.
    #[error("{op}: payload of {size} bytes exceeds 65535")]
    FileTooLarge { op: Operation, size: usize },

    /// No supported tag is selected.
    #[error("{op}: no supported tag selected")]
    MediumNotPresent { op: Operation },
}

impl TagStorageError {
    /// Kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailure { .. } => ErrorKind::AuthenticationFailure,
            Self::BlockReadFailure { .. } => ErrorKind::BlockReadFailure,
            Self::BlockWriteFailure { .. } => ErrorKind::BlockWriteFailure,
            Self::VerificationMismatch { .. } => ErrorKind::VerificationMismatch,
            Self::OutOfAddressSpace { .. } => ErrorKind::OutOfAddressSpace,
            Self::NotAFile { .. } => ErrorKind::NotAFile,
            Self::LabelMismatch { .. } => ErrorKind::LabelMismatch,
            Self::BufferTooSmall { .. } => ErrorKind::BufferTooSmall,
            Self::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::MediumNotPresent { .. } => ErrorKind::MediumNotPresent,
        }
    }

    /// Operation this error came from, when it is tied to one.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::AuthenticationFailure { op, .. }
            | Self::BlockReadFailure { op, .. }
            | Self::BlockWriteFailure { op, .. }
            | Self::VerificationMismatch { op, .. }
            | Self::OutOfAddressSpace { op, .. }
            | Self::NotAFile { op, .. }
            | Self::LabelMismatch { op, .. }
            | Self::BufferTooSmall { op, .. }
            | Self::FileTooLarge { op, .. }
            | Self::MediumNotPresent { op } => Some(*op),
            Self::KeyNotFound { .. } => Some(Operation::Remove),
            Self::CapacityExceeded { .. } => Some(Operation::SaveDictionary),
        }
    }

    /// Layer that raised this error.
    pub fn component(&self) -> Option<Component> {
        self.operation().map(Operation::component)
    }

    /// Whether the header lookup found no file with the requested label.
    pub fn is_missing_file(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotAFile | ErrorKind::LabelMismatch)
    }
}

/// Result alias for storage operations.
pub type Result<T> = std::result::Result<T, TagStorageError>;
