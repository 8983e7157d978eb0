//! # corsika-reader
//!
//! A random-access reader for raw CORSIKA simulation output files.
//! Detects thinned and not-thinned files written with 4 or 8 byte record
//! markers, and reads them block by block from seekable or forward-only sources.
pub mod corsika;

// Re-export the main types for convenience
pub use corsika::{
    CorsikaError,
    RawStream,
    Result,
    format::block::LogicalBlock,
    iter::{Blocks, PositionedBlocks},
    source::{ByteSource, Seekable, Sequential, SharedSource},
    types::models::{
        BlockTag,
        Cursor,
        PaddingWidth,
        Thinning,
        Variant,
        SUB_BLOCKS_PER_BLOCK,
        WORD_SIZE,
    },
};
