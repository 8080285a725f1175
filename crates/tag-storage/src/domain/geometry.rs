//! # Tag Geometry
//!
//! Block and sector layout of the supported MIFARE Classic capacity classes.
//!
//! ## Layout
//!
//! | Class | Sectors | Blocks | Usable bytes |
//! |-------|---------|--------|--------------|
//! | Mini | 5 × 4 | 20 | 224 |
//! | 1K | 16 × 4 | 64 | 752 |
//! | 4K | 32 × 4 + 8 × 16 | 256 | 3440 |
//!
//! The last block of every sector is its trailer (keys and access bits).
//! Block 0 holds the manufacturer data and the UID.

use serde::{Deserialize, Serialize};

/// Bytes per block.
pub const BLOCK_SIZE: usize = 16;

/// A raw block.
pub type Block = [u8; BLOCK_SIZE];

/// First block of the 16-block sector region on 4K tags.
const LARGE_SECTOR_REGION: u16 = 128;

/// Number of 4-block sectors on 4K tags.
const SMALL_SECTORS_4K: u16 = 32;

/// Capacity class of a MIFARE Classic tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagType {
    /// MIFARE Mini (320 bytes).
    Mini,
    /// MIFARE Classic 1K.
    Classic1K,
    /// MIFARE Classic 4K.
    Classic4K,
}

impl TagType {
    /// Classify a card from its SAK (select acknowledge) byte.
    pub fn from_sak(sak: u8) -> Option<Self> {
        match sak {
            0x09 => Some(Self::Mini),
            0x08 | 0x88 | 0x28 => Some(Self::Classic1K),
            0x18 | 0x98 | 0x38 => Some(Self::Classic4K),
            _ => None,
        }
    }

    /// Total number of blocks, trailers and block 0 included.
    pub const fn block_count(self) -> u16 {
        match self {
            Self::Mini => 20,
            Self::Classic1K => 64,
            Self::Classic4K => 256,
        }
    }

    /// Number of sectors.
    pub const fn sector_count(self) -> u8 {
        match self {
            Self::Mini => 5,
            Self::Classic1K => 16,
            Self::Classic4K => 40,
        }
    }

    /// Usable bytes from block 0 (or 1) to the end of the tag.
    pub const fn total_usable_bytes(self) -> usize {
        match self {
            Self::Mini => 224,
            Self::Classic1K => 752,
            Self::Classic4K => 3440,
        }
    }

    fn has_large_sectors(self) -> bool {
        matches!(self, Self::Classic4K)
    }

    /// Sector containing `block`.
    pub fn sector_of(self, block: u16) -> u8 {
        if self.has_large_sectors() && block >= LARGE_SECTOR_REGION {
            (SMALL_SECTORS_4K + (block - LARGE_SECTOR_REGION) / 16) as u8
        } else {
            (block / 4) as u8
        }
    }

    /// First block of `sector`.
    pub fn first_block_of(self, sector: u8) -> u16 {
        let sector = u16::from(sector);
        if self.has_large_sectors() && sector >= SMALL_SECTORS_4K {
            LARGE_SECTOR_REGION + (sector - SMALL_SECTORS_4K) * 16
        } else {
            sector * 4
        }
    }

    /// Number of blocks in `sector`.
    pub fn blocks_in_sector(self, sector: u8) -> u16 {
        if self.has_large_sectors() && u16::from(sector) >= SMALL_SECTORS_4K {
            16
        } else {
            4
        }
    }

    /// Whether `block` is a sector trailer.
    pub fn is_trailer(self, block: u16) -> bool {
        if self.has_large_sectors() && block >= LARGE_SECTOR_REGION {
            (block - LARGE_SECTOR_REGION) % 16 == 15
        } else {
            block % 4 == 3
        }
    }

    /// Whether payload writes must skip `block` (trailers and block 0).
    pub fn is_reserved_for_write(self, block: u16) -> bool {
        block == 0 || self.is_trailer(block)
    }

    /// Remaining usable bytes from `start_block` to the end of the tag.
    ///
    /// Block 0 and every trailer are excluded. A start block that is itself
    /// reserved counts from the next usable block.
    pub fn usable_capacity(self, start_block: u16) -> usize {
        if start_block <= 1 {
            return self.total_usable_bytes();
        }
        if start_block >= self.block_count() {
            return 0;
        }

        let (small_sectors, large_sectors, remainder) =
            if self.has_large_sectors() && start_block > LARGE_SECTOR_REGION {
                let offset = start_block - LARGE_SECTOR_REGION;
                (SMALL_SECTORS_4K, offset / 16, offset % 16)
            } else {
                (start_block / 4, 0, start_block % 4)
            };

        // usable blocks before the start block, block 0 counted once
        let previous_blocks = usize::from(small_sectors) * 3 + usize::from(large_sectors) * 15
            + usize::from(remainder)
            - 1;

        self.total_usable_bytes()
            .saturating_sub(previous_blocks * BLOCK_SIZE)
    }
}
