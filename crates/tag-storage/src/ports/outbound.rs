//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the storage stack requires from the host: the tag reader
//! driver and an optional diagnostics sink.
//!
//! Production: a driver wrapping the reader chip (SPI/I2C/UART).
//! Testing: `InMemoryTag` (adapters/memory.rs).

use crate::domain::errors::DeviceError;
use crate::domain::events::StorageEvent;
use crate::domain::geometry::{Block, TagType};
use crate::domain::value_objects::{SectorKey, Uid};

/// Tag reader driver.
///
/// Every call is blocking and talks to at most one tag. The driver does not
/// retry; the block store does.
pub trait TagDevice {
    /// Look for a tag in the field and select it.
    fn detect(&mut self) -> bool;

    /// UID of the selected tag.
    fn current_uid(&self) -> Option<Uid>;

    /// Capacity class of the selected tag; `None` when unsupported.
    fn tag_type(&self) -> Option<TagType>;

    /// Authenticate `sector` with key A.
    fn authenticate_sector(&mut self, sector: u8, key: &SectorKey) -> Result<(), DeviceError>;

    /// Read one block of the authenticated sector.
    fn read_block(&mut self, block: u16) -> Result<Block, DeviceError>;

    /// Write one block of the authenticated sector.
    fn write_block(&mut self, block: u16, data: &Block) -> Result<(), DeviceError>;

    /// Halt the tag and drop authentication. With `allow_redetection` the
    /// field is cycled so the same tag can be detected again immediately.
    fn release(&mut self, allow_redetection: bool);
}

// A store can own its device or borrow one owned elsewhere.
impl<D: TagDevice + ?Sized> TagDevice for &mut D {
    fn detect(&mut self) -> bool {
        (**self).detect()
    }

    fn current_uid(&self) -> Option<Uid> {
        (**self).current_uid()
    }

    fn tag_type(&self) -> Option<TagType> {
        (**self).tag_type()
    }

    fn authenticate_sector(&mut self, sector: u8, key: &SectorKey) -> Result<(), DeviceError> {
        (**self).authenticate_sector(sector, key)
    }

    fn read_block(&mut self, block: u16) -> Result<Block, DeviceError> {
        (**self).read_block(block)
    }

    fn write_block(&mut self, block: u16, data: &Block) -> Result<(), DeviceError> {
        (**self).write_block(block, data)
    }

    fn release(&mut self, allow_redetection: bool) {
        (**self).release(allow_redetection)
    }
}

impl<D: TagDevice + ?Sized> TagDevice for Box<D> {
    fn detect(&mut self) -> bool {
        (**self).detect()
    }

    fn current_uid(&self) -> Option<Uid> {
        (**self).current_uid()
    }

    fn tag_type(&self) -> Option<TagType> {
        (**self).tag_type()
    }

    fn authenticate_sector(&mut self, sector: u8, key: &SectorKey) -> Result<(), DeviceError> {
        (**self).authenticate_sector(sector, key)
    }

    fn read_block(&mut self, block: u16) -> Result<Block, DeviceError> {
        (**self).read_block(block)
    }

    fn write_block(&mut self, block: u16, data: &Block) -> Result<(), DeviceError> {
        (**self).write_block(block, data)
    }

    fn release(&mut self, allow_redetection: bool) {
        (**self).release(allow_redetection)
    }
}

/// Receiver of diagnostic events, chosen when a store is built.
pub trait EventSink: Send + Sync {
    /// Handle one event.
    fn record(&self, event: &StorageEvent);
}
