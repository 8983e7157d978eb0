//! Core data structures describing the raw CORSIKA file layout.
//!
//! This module defines the fundamental types used throughout the library:
//! - Layout constants shared by every file variant
//! - Thinning and padding variant enumerations
//! - Block tags and the stream cursor

use std::fmt;

/// Number of logical blocks (sub-blocks) in one disk block.
pub const SUB_BLOCKS_PER_BLOCK: usize = 21;

/// Byte width of one word inside a logical block.
pub const WORD_SIZE: usize = 4;

/// Simulation mode, which fixes the word count of a logical block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Thinning {
    Thinned,
    NotThinned,
}

impl Thinning {
    /// Returns the number of words in one logical block.
    ///
    /// - Thinned: 312 words (39 particles of 8 words)
    /// - NotThinned: 273 words (39 particles of 7 words)
    pub const fn words_per_sub_block(self) -> usize {
        match self {
            Thinning::Thinned => 312,
            Thinning::NotThinned => 273,
        }
    }

    /// Returns the byte length of one logical block.
    pub const fn sub_block_size(self) -> usize {
        self.words_per_sub_block() * WORD_SIZE
    }

    /// Returns the byte length of the logical blocks of one disk block,
    /// which is also the value carried by its padding markers.
    pub const fn payload_size(self) -> usize {
        self.sub_block_size() * SUB_BLOCKS_PER_BLOCK
    }
}

impl fmt::Display for Thinning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Thinning::Thinned => write!(f, "thinned"),
            Thinning::NotThinned => write!(f, "not-thinned"),
        }
    }
}

/// Byte width of the Fortran record markers bracketing each disk block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaddingWidth {
    Four,
    Eight,
}

impl PaddingWidth {
    pub const fn bytes(self) -> usize {
        match self {
            PaddingWidth::Four => 4,
            PaddingWidth::Eight => 8,
        }
    }
}

/// The on-disk layout of a file: thinning mode and marker width.
///
/// Chosen once by format detection and never changed for a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variant {
    pub thinning: Thinning,
    pub padding: PaddingWidth,
}

impl Variant {
    /// Every variant, in the order format detection tries them.
    pub const ALL: [Variant; 4] = [
        Variant::new(Thinning::Thinned, PaddingWidth::Eight),
        Variant::new(Thinning::NotThinned, PaddingWidth::Eight),
        Variant::new(Thinning::Thinned, PaddingWidth::Four),
        Variant::new(Thinning::NotThinned, PaddingWidth::Four),
    ];

    pub const fn new(thinning: Thinning, padding: PaddingWidth) -> Self {
        Self { thinning, padding }
    }

    /// Byte length of one whole disk block, markers included.
    pub const fn disk_block_size(self) -> usize {
        2 * self.padding.bytes() + self.thinning.payload_size()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}-byte padding", self.thinning, self.padding.bytes())
    }
}

/// Known 4-byte tags found in word 0 of header and trailer blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    RunHeader,
    EventHeader,
    Longitudinal,
    EventTrailer,
    RunTrailer,
}

impl BlockTag {
    pub const fn id(self) -> &'static [u8; 4] {
        match self {
            BlockTag::RunHeader => b"RUNH",
            BlockTag::EventHeader => b"EVTH",
            BlockTag::Longitudinal => b"LONG",
            BlockTag::EventTrailer => b"EVTE",
            BlockTag::RunTrailer => b"RUNE",
        }
    }
}

impl TryFrom<[u8; 4]> for BlockTag {
    type Error = [u8; 4];
    fn try_from(id: [u8; 4]) -> std::result::Result<Self, Self::Error> {
        match &id {
            b"RUNH" => Ok(Self::RunHeader),
            b"EVTH" => Ok(Self::EventHeader),
            b"LONG" => Ok(Self::Longitudinal),
            b"EVTE" => Ok(Self::EventTrailer),
            b"RUNE" => Ok(Self::RunTrailer),
            _ => Err(id),
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            BlockTag::RunHeader => "RUNH",
            BlockTag::EventHeader => "EVTH",
            BlockTag::Longitudinal => "LONG",
            BlockTag::EventTrailer => "EVTE",
            BlockTag::RunTrailer => "RUNE",
        })
    }
}

/// Read position of a stream: which disk block, and which logical block inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub disk_block: u64,
    pub sub_block: usize,
}

impl Cursor {
    /// Splits a linear logical block position into disk block and sub-block index.
    pub fn from_position(position: u64) -> Self {
        let n = SUB_BLOCKS_PER_BLOCK as u64;
        Self {
            disk_block: position / n,
            sub_block: (position % n) as usize,
        }
    }

    /// The linear logical block position of this cursor.
    pub fn position(&self) -> u64 {
        self.disk_block * SUB_BLOCKS_PER_BLOCK as u64 + self.sub_block as u64
    }
}
