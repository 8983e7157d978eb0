//! Logical block codec.
//!
//! A logical block is an opaque run of 4-byte words whose count depends on the
//! thinning mode. The only content this crate looks at is word 0, which holds
//! a 4-character tag for header and trailer blocks.

use byteorder::{ByteOrder, LittleEndian};

use crate::corsika::types::error::{CorsikaError, Result};
use crate::corsika::types::models::{BlockTag, Thinning, WORD_SIZE};

/// One fixed-size logical block copied out of a disk block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalBlock {
    thinning: Thinning,
    bytes: Box<[u8]>,
}

impl LogicalBlock {
    /// Wraps raw bytes as a logical block of the given thinning mode.
    ///
    /// # Errors
    /// Returns [`CorsikaError::SizeMismatch`] if `bytes` is not exactly one
    /// logical block long.
    pub fn from_bytes(thinning: Thinning, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != thinning.sub_block_size() {
            return Err(CorsikaError::SizeMismatch {
                context: "logical block",
                expected: thinning.sub_block_size(),
                found: bytes.len(),
            });
        }
        Ok(Self {
            thinning,
            bytes: bytes.into(),
        })
    }

    pub fn thinning(&self) -> Thinning {
        self.thinning
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_vec()
    }

    /// Number of words in this block.
    pub fn len_words(&self) -> usize {
        self.thinning.words_per_sub_block()
    }

    /// The raw 4 bytes of word 0.
    pub fn id(&self) -> [u8; 4] {
        [self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]]
    }

    /// The header/trailer tag in word 0, if it is one of the known tags.
    pub fn tag(&self) -> Option<BlockTag> {
        BlockTag::try_from(self.id()).ok()
    }

    pub fn is_run_header(&self) -> bool {
        self.tag() == Some(BlockTag::RunHeader)
    }

    /// Decodes word `index` as a little-endian float.
    pub fn word(&self, index: usize) -> Option<f32> {
        let start = index.checked_mul(WORD_SIZE)?;
        let bytes = self.bytes.get(start..start + WORD_SIZE)?;
        Some(LittleEndian::read_f32(bytes))
    }

    /// Iterates over all words decoded as little-endian floats.
    pub fn words(&self) -> impl Iterator<Item = f32> + '_ {
        self.bytes.chunks_exact(WORD_SIZE).map(LittleEndian::read_f32)
    }
}
