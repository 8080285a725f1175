//! # In-Memory Tag
//!
//! Simulated tag and reader for tests, benches and host-side demos.
//!
//! The simulation keeps the rules a real MIFARE Classic card enforces:
//! a sector must be authenticated with its key A before its blocks can be
//! read or written, block 0 and the trailers are write-protected, and a
//! halted tag is not detected again until it leaves the field unless the
//! field was cycled. Faults can be injected per operation.

use crate::domain::errors::DeviceError;
use crate::domain::geometry::{Block, TagType, BLOCK_SIZE};
use crate::domain::value_objects::{SectorKey, Uid};
use crate::ports::outbound::TagDevice;

/// Access bits and general purpose byte of a transport-configured trailer.
const TRANSPORT_ACCESS_BITS: [u8; 4] = [0xFF, 0x07, 0x80, 0x69];

/// Faults to inject into the next operations. Each counter is consumed one
/// failure at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaultPlan {
    /// Failing authentications.
    pub auth_failures: u32,
    /// Failing block reads.
    pub read_failures: u32,
    /// Failing block writes.
    pub write_failures: u32,
    /// Writes that report success but store a corrupted block.
    pub corrupt_writes: u32,
    /// Detections that find nothing.
    pub detect_failures: u32,
}

/// Operation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub detections: usize,
    pub authentications: usize,
    pub reads: usize,
    pub writes: usize,
    pub releases: usize,
}

/// A MIFARE Classic tag held in memory.
#[derive(Clone, Debug)]
pub struct InMemoryTag {
    tag_type: TagType,
    uid: Uid,
    blocks: Vec<Block>,
    in_field: bool,
    selected: bool,
    halted: bool,
    authenticated: Option<u8>,
    faults: FaultPlan,
    stats: DeviceStats,
}

impl InMemoryTag {
    /// A factory-fresh tag, in the field and already selected.
    pub fn new(tag_type: TagType, uid: Uid) -> Self {
        let mut tag = Self {
            tag_type,
            uid,
            blocks: vec![[0u8; BLOCK_SIZE]; usize::from(tag_type.block_count())],
            in_field: true,
            selected: true,
            halted: false,
            authenticated: None,
            faults: FaultPlan::default(),
            stats: DeviceStats::default(),
        };
        tag.blocks[0] = tag.manufacturer_block();
        tag.set_sector_keys(SectorKey::DEFAULT);
        tag
    }

    /// Set key A of every sector.
    pub fn with_key(mut self, key: SectorKey) -> Self {
        self.set_sector_keys(key);
        self
    }

    fn set_sector_keys(&mut self, key: SectorKey) {
        for sector in 0..self.tag_type.sector_count() {
            let trailer = self.trailer_of(sector);
            let block = &mut self.blocks[usize::from(trailer)];
            block[..6].copy_from_slice(&key.0);
            block[6..10].copy_from_slice(&TRANSPORT_ACCESS_BITS);
            block[10..].copy_from_slice(&SectorKey::DEFAULT.0);
        }
    }

    fn trailer_of(&self, sector: u8) -> u16 {
        self.tag_type.first_block_of(sector) + self.tag_type.blocks_in_sector(sector) - 1
    }

    fn manufacturer_block(&self) -> Block {
        let mut block = [0x62u8; BLOCK_SIZE];
        let uid = self.uid.as_bytes();
        let n = uid.len().min(4);
        block[..n].copy_from_slice(&uid[..n]);
        block[4] = uid[..n].iter().fold(0, |acc, b| acc ^ b);
        block[5] = match self.tag_type {
            TagType::Mini => 0x09,
            TagType::Classic1K => 0x08,
            TagType::Classic4K => 0x18,
        };
        block[6] = 0x04;
        block[7] = 0x00;
        block
    }

    /// Take the tag out of the field.
    pub fn remove(&mut self) {
        self.in_field = false;
        self.selected = false;
        self.halted = false;
        self.authenticated = None;
    }

    /// Put the tag back in the field; it must be detected again.
    pub fn insert(&mut self) {
        self.in_field = true;
    }

    /// Present a different tag with the same contents.
    pub fn replace_uid(&mut self, uid: Uid) {
        self.uid = uid;
        self.blocks[0] = self.manufacturer_block();
        self.authenticated = None;
    }

    /// Faults to inject.
    pub fn faults_mut(&mut self) -> &mut FaultPlan {
        &mut self.faults
    }

    /// Operation counters.
    pub fn stats(&self) -> DeviceStats {
        self.stats
    }

    /// Reset operation counters.
    pub fn reset_stats(&mut self) {
        self.stats = DeviceStats::default();
    }

    /// Raw block contents, bypassing authentication.
    pub fn block(&self, block: u16) -> Block {
        self.blocks[usize::from(block)]
    }

    /// Overwrite a block, bypassing authentication and write protection.
    pub fn poke(&mut self, block: u16, data: Block) {
        self.blocks[usize::from(block)] = data;
    }

    fn check_selected(&self) -> Result<(), DeviceError> {
        if self.in_field && self.selected {
            Ok(())
        } else {
            Err(DeviceError::NotPresent)
        }
    }

    fn check_access(&self, block: u16) -> Result<(), DeviceError> {
        self.check_selected()?;
        if block >= self.tag_type.block_count() {
            return Err(DeviceError::AccessDenied);
        }
        if self.authenticated != Some(self.tag_type.sector_of(block)) {
            return Err(DeviceError::NotAuthenticated);
        }
        Ok(())
    }

    fn take_fault(counter: &mut u32) -> bool {
        if *counter > 0 {
            *counter -= 1;
            true
        } else {
            false
        }
    }
}

impl TagDevice for InMemoryTag {
    fn detect(&mut self) -> bool {
        self.stats.detections += 1;
        if Self::take_fault(&mut self.faults.detect_failures) || !self.in_field || self.halted {
            return false;
        }
        self.selected = true;
        self.authenticated = None;
        true
    }

    fn current_uid(&self) -> Option<Uid> {
        self.check_selected().ok().map(|_| self.uid.clone())
    }

    fn tag_type(&self) -> Option<TagType> {
        self.check_selected().ok().map(|_| self.tag_type)
    }

    fn authenticate_sector(&mut self, sector: u8, key: &SectorKey) -> Result<(), DeviceError> {
        self.stats.authentications += 1;
        self.authenticated = None;
        self.check_selected()?;
        if sector >= self.tag_type.sector_count() {
            return Err(DeviceError::AccessDenied);
        }
        if Self::take_fault(&mut self.faults.auth_failures) {
            return Err(DeviceError::Transport("authentication timeout".into()));
        }
        let trailer = self.blocks[usize::from(self.trailer_of(sector))];
        if trailer[..6] != key.0 {
            return Err(DeviceError::AuthenticationRejected);
        }
        self.authenticated = Some(sector);
        Ok(())
    }

    fn read_block(&mut self, block: u16) -> Result<Block, DeviceError> {
        self.stats.reads += 1;
        self.check_access(block)?;
        if Self::take_fault(&mut self.faults.read_failures) {
            return Err(DeviceError::Transport("CRC error".into()));
        }
        let mut data = self.blocks[usize::from(block)];
        if self.tag_type.is_trailer(block) {
            // key A always reads back as zeros
            data[..6].fill(0);
        }
        Ok(data)
    }

    fn write_block(&mut self, block: u16, data: &Block) -> Result<(), DeviceError> {
        self.stats.writes += 1;
        self.check_access(block)?;
        if self.tag_type.is_reserved_for_write(block) {
            return Err(DeviceError::AccessDenied);
        }
        if Self::take_fault(&mut self.faults.write_failures) {
            return Err(DeviceError::Transport("write NAK".into()));
        }
        let mut stored = *data;
        if Self::take_fault(&mut self.faults.corrupt_writes) {
            stored[0] ^= 0xFF;
        }
        self.blocks[usize::from(block)] = stored;
        Ok(())
    }

    fn release(&mut self, allow_redetection: bool) {
        self.stats.releases += 1;
        self.selected = false;
        self.authenticated = None;
        self.halted = self.in_field && !allow_redetection;
    }
}
