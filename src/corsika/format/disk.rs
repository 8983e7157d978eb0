//! Disk block layout and the single-block read buffer.
//!
//! # Disk Block Structure
//! ```text
//! [P bytes]         Start marker = byte length of the payload (little-endian)
//! [N * W * 4 bytes] N logical blocks of W words each
//! [P bytes]         End marker, same value as the start marker
//! ```
//! `P` is 4 or 8, `W` depends on the thinning mode and `N` is
//! [`SUB_BLOCKS_PER_BLOCK`].

use std::io::Read;
use log::trace;

use crate::corsika::types::error::{CorsikaError, Result};
use crate::corsika::types::models::{Variant, SUB_BLOCKS_PER_BLOCK};
use crate::corsika::utils;
use super::block::LogicalBlock;

/// Size of the prefix consumed by format detection.
pub const PREFIX_LEN: usize = 8;

/// In-memory copy of exactly one disk block plus a validity flag.
pub struct DiskBlockBuffer {
    variant: Variant,
    bytes: Vec<u8>,
    valid: bool,
}

impl DiskBlockBuffer {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            bytes: vec![0u8; variant.disk_block_size()],
            valid: false,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Reads one whole disk block from `reader`.
    ///
    /// Returns `Ok(false)` when the reader is exhausted at the block boundary.
    ///
    /// # Errors
    /// - [`CorsikaError::TruncatedBlock`] if only part of a disk block was available
    /// - [`CorsikaError::PaddingMismatch`] if the two markers disagree
    pub fn fill(&mut self, reader: &mut impl Read, disk_block: u64) -> Result<bool> {
        self.valid = false;
        let found = utils::read_full(reader, &mut self.bytes)?;
        if found == 0 {
            trace!("End of stream before disk block {}", disk_block);
            return Ok(false);
        }
        self.finish_fill(found, disk_block)?;
        Ok(true)
    }

    /// Reads the first disk block when its leading bytes were already consumed.
    ///
    /// `prefix` is placed at offset 0 of the buffer and the remainder of the
    /// disk block is read from `reader`. For a 4-byte marker the last four
    /// prefix bytes are the start of the first logical block.
    pub fn fill_after_prefix(
        &mut self,
        reader: &mut impl Read,
        prefix: [u8; PREFIX_LEN],
    ) -> Result<()> {
        self.valid = false;
        self.bytes[..PREFIX_LEN].copy_from_slice(&prefix);
        let found = utils::read_full(reader, &mut self.bytes[PREFIX_LEN..])?;
        self.finish_fill(PREFIX_LEN + found, 0)
    }

    fn finish_fill(&mut self, found: usize, disk_block: u64) -> Result<()> {
        if found < self.bytes.len() {
            return Err(CorsikaError::TruncatedBlock {
                disk_block,
                expected: self.bytes.len(),
                found,
            });
        }
        let (start, end) = (self.start_marker(), self.end_marker());
        if start != end {
            return Err(CorsikaError::PaddingMismatch { disk_block, start, end });
        }
        trace!("Read disk block {} (marker {})", disk_block, start);
        self.valid = true;
        Ok(())
    }

    pub fn start_marker(&self) -> u64 {
        utils::read_marker(&self.bytes, self.variant.padding)
    }

    pub fn end_marker(&self) -> u64 {
        let offset = self.bytes.len() - self.variant.padding.bytes();
        utils::read_marker(&self.bytes[offset..], self.variant.padding)
    }

    /// Copies out logical block `index` of the buffered disk block.
    ///
    /// `index` must be below [`SUB_BLOCKS_PER_BLOCK`].
    pub fn sub_block(&self, index: usize) -> Result<LogicalBlock> {
        debug_assert!(index < SUB_BLOCKS_PER_BLOCK);
        let size = self.variant.thinning.sub_block_size();
        let start = self.variant.padding.bytes() + index * size;
        LogicalBlock::from_bytes(self.variant.thinning, &self.bytes[start..start + size])
    }
}

impl std::fmt::Debug for DiskBlockBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskBlockBuffer")
            .field("variant", &self.variant)
            .field("len", &self.bytes.len())
            .field("valid", &self.valid)
            .finish()
    }
}
