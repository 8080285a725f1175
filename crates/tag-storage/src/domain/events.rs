//! # Storage Events
//!
//! Diagnostic events emitted by the storage layers to the configured
//! [`EventSink`](crate::ports::outbound::EventSink).

use super::value_objects::Uid;

/// Why a block was skipped during an extent walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Sector trailer.
    Trailer,
    /// Manufacturer block, never written.
    ManufacturerBlock,
}

/// Why the dictionary cache was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidationReason {
    /// A tag was (re)detected.
    Detected,
    /// A different tag is in the field.
    UidChanged,
    /// The host released the tag.
    Disconnected,
    /// A load or save failed.
    Failure,
}

/// Something worth knowing happened on the tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageEvent {
    /// A sector accepted the key.
    SectorAuthenticated { sector: u8, attempts: u8 },
    /// A reserved block was stepped over.
    BlockSkipped { block: u16, reason: SkipReason },
    /// A block read or write-verify cycle failed and will be retried.
    BlockRetry { block: u16, attempt: u8 },
    /// An extent was written.
    ExtentWritten {
        start: u16,
        last_block: u16,
        bytes: usize,
    },
    /// An extent was read.
    ExtentRead { start: u16, bytes: usize },
    /// A tag was selected.
    MediumDetected { uid: Uid },
    /// The tag was halted.
    MediumReleased,
    /// The dictionary snapshot was (re)loaded.
    DictionaryLoaded { entries: usize },
    /// The dictionary was written through.
    DictionarySaved { entries: usize, bytes: usize },
    /// The dictionary snapshot stopped being trusted.
    DictionaryInvalidated { reason: InvalidationReason },
}
