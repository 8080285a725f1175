//! # File Store
//!
//! Labelled files on top of [`BlockStore`] extents.
//!
//! A file is one header block followed by its payload extent. The header
//! is written at the first writable block at or after the start block and
//! the payload right after it. Lookups read the header at the start block,
//! moving past it only when it is a sector trailer.

use std::sync::Arc;

use crate::application::block_store::BlockStore;
use crate::config::TagStorageConfig;
use crate::domain::errors::{Operation, Result, TagStorageError};
use crate::domain::header::FileHeader;
use crate::domain::value_objects::FileLabel;
use crate::ports::inbound::TagFileApi;
use crate::ports::outbound::{EventSink, TagDevice};

/// Labelled files on a tag.
pub struct FileStore<D: TagDevice> {
    blocks: BlockStore<D>,
}

impl<D: TagDevice> FileStore<D> {
    pub fn new(device: D, config: &TagStorageConfig) -> Self {
        Self::from_block_store(BlockStore::new(device, config))
    }

    pub fn with_sink(device: D, config: &TagStorageConfig, sink: Arc<dyn EventSink>) -> Self {
        Self::from_block_store(BlockStore::with_sink(device, config, sink))
    }

    pub fn from_block_store(blocks: BlockStore<D>) -> Self {
        Self { blocks }
    }

    pub fn block_store(&self) -> &BlockStore<D> {
        &self.blocks
    }

    pub fn block_store_mut(&mut self) -> &mut BlockStore<D> {
        &mut self.blocks
    }

    pub fn into_block_store(self) -> BlockStore<D> {
        self.blocks
    }

    pub(crate) fn write_labelled(
        &mut self,
        op: Operation,
        start_block: u16,
        label: &FileLabel,
        data: &[u8],
    ) -> Result<u16> {
        let size = u16::try_from(data.len()).map_err(|_| TagStorageError::FileTooLarge {
            op,
            size: data.len(),
        })?;
        let header = FileHeader::new(*label, size).encode();
        let header_block = self
            .blocks
            .write_blocks(op, start_block, &header)?
            .unwrap_or(start_block);
        let last = self
            .blocks
            .write_blocks(op, header_block + 1, data)?
            .unwrap_or(header_block);

        tracing::debug!(start_block, header_block, last, size, label = %label, "[tag] file written");
        Ok(last)
    }

    /// Locate the header for `label`; returns its block and the payload size.
    pub(crate) fn locate(
        &mut self,
        op: Operation,
        start_block: u16,
        label: &FileLabel,
    ) -> Result<(u16, usize)> {
        let tag = self.blocks.tag_type(op)?;
        let block = if tag.is_trailer(start_block) {
            start_block.saturating_add(1)
        } else {
            start_block
        };
        if block >= tag.block_count() {
            return Err(TagStorageError::OutOfAddressSpace {
                op,
                block,
                block_count: tag.block_count(),
            });
        }

        self.blocks.authenticate(op, tag.sector_of(block))?;
        let raw = self.blocks.read_block(op, block)?;
        let header = FileHeader::decode(&raw).ok_or(TagStorageError::NotAFile { op, block })?;
        if !label.matches(header.label.as_bytes()) {
            return Err(TagStorageError::LabelMismatch {
                op,
                block,
                expected: *label,
                found: header.label,
            });
        }
        Ok((block, usize::from(header.size)))
    }

    pub(crate) fn read_labelled(
        &mut self,
        op: Operation,
        start_block: u16,
        label: &FileLabel,
        capacity: usize,
    ) -> Result<Vec<u8>> {
        let (header_block, size) = self.locate(op, start_block, label)?;
        if size > capacity {
            return Err(TagStorageError::BufferTooSmall {
                op,
                required: size,
                capacity,
            });
        }
        self.blocks.read_blocks(op, header_block + 1, size)
    }
}

impl<D: TagDevice> TagFileApi for FileStore<D> {
    fn write_file(&mut self, start_block: u16, label: &FileLabel, data: &[u8]) -> Result<u16> {
        self.write_labelled(Operation::WriteFile, start_block, label, data)
    }

    fn read_file_size(&mut self, start_block: u16, label: &FileLabel) -> Result<usize> {
        self.locate(Operation::ReadFileSize, start_block, label)
            .map(|(_, size)| size)
    }

    fn read_file(
        &mut self,
        start_block: u16,
        label: &FileLabel,
        capacity: usize,
    ) -> Result<Vec<u8>> {
        self.read_labelled(Operation::ReadFile, start_block, label, capacity)
    }

    fn exists_file(&mut self, start_block: u16, label: &FileLabel) -> bool {
        self.read_file_size(start_block, label).is_ok()
    }
}
