//! # Block Store
//!
//! Contiguous byte extents over the usable blocks of a tag.
//!
//! ## Extent Walk
//!
//! An extent starts at a caller-given block and continues through the
//! following blocks, stepping over reserved ones:
//!
//! | Access | Skipped blocks |
//! |--------|----------------|
//! | write | sector trailers and block 0 |
//! | read | sector trailers |
//!
//! Each sector is authenticated once when the walk enters it. Every block
//! write is read back and compared; a failed write-verify cycle, read or
//! authentication is retried up to the configured number of attempts.
//! Each call uses its own block buffer.

use std::sync::Arc;

use crate::adapters::sinks::TracingSink;
use crate::config::TagStorageConfig;
use crate::domain::errors::{Operation, Result, TagStorageError};
use crate::domain::events::{SkipReason, StorageEvent};
use crate::domain::geometry::{Block, TagType, BLOCK_SIZE};
use crate::domain::value_objects::SectorKey;
use crate::ports::outbound::{EventSink, TagDevice};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// Sector authenticated during the current extent walk.
#[derive(Default)]
struct SectorSession {
    current: Option<u8>,
}

impl SectorSession {
    fn enter<D: TagDevice>(
        &mut self,
        store: &mut BlockStore<D>,
        op: Operation,
        sector: u8,
    ) -> Result<()> {
        if self.current != Some(sector) {
            self.current = None;
            store.authenticate(op, sector)?;
            self.current = Some(sector);
        }
        Ok(())
    }
}

/// Byte-extent access to a tag through its reader.
///
/// The store owns `D`; pass `&mut device` to borrow a device owned
/// elsewhere instead.
pub struct BlockStore<D: TagDevice> {
    device: D,
    key: SectorKey,
    auth_attempts: u8,
    io_attempts: u8,
    sink: Arc<dyn EventSink>,
}

impl<D: TagDevice> BlockStore<D> {
    /// Create a store that reports events to `tracing`.
    pub fn new(device: D, config: &TagStorageConfig) -> Self {
        Self::with_sink(device, config, Arc::new(TracingSink))
    }

    /// Create a store reporting events to `sink`.
    pub fn with_sink(device: D, config: &TagStorageConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            device,
            key: config.key_a,
            auth_attempts: config.auth_attempts.max(1),
            io_attempts: config.io_attempts.max(1),
            sink,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Give the device back.
    pub fn into_device(self) -> D {
        self.device
    }

    pub(crate) fn emit(&self, event: StorageEvent) {
        self.sink.record(&event);
    }

    /// Capacity class of the selected tag.
    pub(crate) fn tag_type(&self, op: Operation) -> Result<TagType> {
        self.device
            .tag_type()
            .ok_or(TagStorageError::MediumNotPresent { op })
    }

    /// Authenticate `sector` with key A.
    pub fn authenticate_sector(&mut self, sector: u8) -> Result<()> {
        self.authenticate(Operation::Authenticate, sector)
    }

    /// Write `data` from `start`, zero-padding the last block.
    ///
    /// Returns the last block written, `None` for empty `data`.
    pub fn write_extent(&mut self, start: u16, data: &[u8]) -> Result<Option<u16>> {
        self.write_blocks(Operation::WriteExtent, start, data)
    }

    /// Read `len` bytes from `start`.
    pub fn read_extent(&mut self, start: u16, len: usize) -> Result<Vec<u8>> {
        self.read_blocks(Operation::ReadExtent, start, len)
    }

    /// Usable bytes from `start` to the end of the selected tag.
    pub fn usable_capacity(&mut self, start: u16) -> Result<usize> {
        Ok(self.tag_type(Operation::Capacity)?.usable_capacity(start))
    }

    pub(crate) fn authenticate(&mut self, op: Operation, sector: u8) -> Result<()> {
        let attempts = self.auth_attempts;
        let mut attempt = 1;
        loop {
            match self.device.authenticate_sector(sector, &self.key) {
                Ok(()) => {
                    self.emit(StorageEvent::SectorAuthenticated {
                        sector,
                        attempts: attempt,
                    });
                    return Ok(());
                }
                Err(source) if attempt >= attempts => {
                    tracing::warn!(%op, sector, attempts, error = %source, "[tag] authentication failed");
                    return Err(TagStorageError::AuthenticationFailure {
                        op,
                        sector,
                        attempts,
                        source,
                    });
                }
                Err(_) => attempt += 1,
            }
        }
    }

    pub(crate) fn read_block(&mut self, op: Operation, block: u16) -> Result<Block> {
        let attempts = self.io_attempts;
        let mut attempt = 1;
        loop {
            match self.device.read_block(block) {
                Ok(data) => return Ok(data),
                Err(source) if attempt >= attempts => {
                    tracing::warn!(%op, block, attempts, error = %source, "[tag] block read failed");
                    return Err(TagStorageError::BlockReadFailure {
                        op,
                        block,
                        attempts,
                        source,
                    });
                }
                Err(_) => {
                    attempt += 1;
                    self.emit(StorageEvent::BlockRetry { block, attempt });
                }
            }
        }
    }

    fn write_verified(&mut self, op: Operation, block: u16, chunk: &[u8]) -> Result<()> {
        let mut buffer = [0u8; BLOCK_SIZE];
        buffer[..chunk.len()].copy_from_slice(chunk);

        let attempts = self.io_attempts;
        let mut attempt = 1;
        loop {
            let failure = match self.write_once(op, block, &buffer, chunk.len()) {
                Ok(()) => return Ok(()),
                Err(failure) => failure,
            };
            if attempt >= attempts {
                tracing::warn!(%op, block, attempts, error = %failure, "[tag] block write failed");
                return Err(failure);
            }
            attempt += 1;
            self.emit(StorageEvent::BlockRetry { block, attempt });
        }
    }

    fn write_once(&mut self, op: Operation, block: u16, buffer: &Block, len: usize) -> Result<()> {
        let attempts = self.io_attempts;
        self.device
            .write_block(block, buffer)
            .map_err(|source| TagStorageError::BlockWriteFailure {
                op,
                block,
                attempts,
                source,
            })?;
        let read_back = self
            .device
            .read_block(block)
            .map_err(|source| TagStorageError::BlockReadFailure {
                op,
                block,
                attempts,
                source,
            })?;
        if read_back[..len] != buffer[..len] {
            return Err(TagStorageError::VerificationMismatch {
                op,
                block,
                attempts,
            });
        }
        Ok(())
    }

    fn next_usable(&self, tag: TagType, op: Operation, mut block: u16, access: Access) -> Result<u16> {
        loop {
            if block >= tag.block_count() {
                return Err(TagStorageError::OutOfAddressSpace {
                    op,
                    block,
                    block_count: tag.block_count(),
                });
            }
            let reason = if tag.is_trailer(block) {
                Some(SkipReason::Trailer)
            } else if block == 0 && access == Access::Write {
                Some(SkipReason::ManufacturerBlock)
            } else {
                None
            };
            match reason {
                Some(reason) => {
                    self.emit(StorageEvent::BlockSkipped { block, reason });
                    block += 1;
                }
                None => return Ok(block),
            }
        }
    }

    pub(crate) fn write_blocks(
        &mut self,
        op: Operation,
        start: u16,
        data: &[u8],
    ) -> Result<Option<u16>> {
        let tag = self.tag_type(op)?;
        let mut session = SectorSession::default();
        let mut block = start;
        let mut last = None;

        for chunk in data.chunks(BLOCK_SIZE) {
            block = self.next_usable(tag, op, block, Access::Write)?;
            session.enter(self, op, tag.sector_of(block))?;
            self.write_verified(op, block, chunk)?;
            last = Some(block);
            block += 1;
        }

        if let Some(last_block) = last {
            self.emit(StorageEvent::ExtentWritten {
                start,
                last_block,
                bytes: data.len(),
            });
        }
        Ok(last)
    }

    pub(crate) fn read_blocks(&mut self, op: Operation, start: u16, len: usize) -> Result<Vec<u8>> {
        let tag = self.tag_type(op)?;
        let mut session = SectorSession::default();
        let mut block = start;
        let mut out = Vec::with_capacity(len);

        while out.len() < len {
            block = self.next_usable(tag, op, block, Access::Read)?;
            session.enter(self, op, tag.sector_of(block))?;
            let data = self.read_block(op, block)?;
            let take = (len - out.len()).min(BLOCK_SIZE);
            out.extend_from_slice(&data[..take]);
            block += 1;
        }

        self.emit(StorageEvent::ExtentRead { start, bytes: len });
        Ok(out)
    }
}
