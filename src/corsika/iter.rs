//! Iterators for sequential access to logical blocks.
//!
//! 1. [`Blocks`] - Yields the remaining logical blocks of a stream
//! 2. [`PositionedBlocks`] - Pairs each block with its logical block position
//!
//! # Example
//! ```no_run
//! # use corsika_reader::{RawStream, BlockTag};
//! let mut stream = RawStream::open("DAT000001").unwrap();
//! for result in stream.blocks().with_positions() {
//!     let (position, block) = result.unwrap();
//!     if block.tag() == Some(BlockTag::EventHeader) {
//!         println!("event header at block {}", position);
//!     }
//! }
//! ```

use super::format::block::LogicalBlock;
use super::reader::RawStream;
use super::source::ByteSource;
use super::types::error::Result;

/// Iterator over the logical blocks remaining in a stream.
///
/// Stops after end of stream or after the first error.
///
/// Created by [`RawStream::blocks()`](crate::RawStream::blocks).
pub struct Blocks<'a, S> {
    stream: &'a mut RawStream<S>,
    done: bool,
}

impl<'a, S: ByteSource> Blocks<'a, S> {
    pub(super) fn new(stream: &'a mut RawStream<S>) -> Self {
        Self { stream, done: false }
    }

    /// Transforms this iterator to also yield the position of each block.
    pub fn with_positions(self) -> PositionedBlocks<'a, S> {
        PositionedBlocks { blocks: self }
    }
}

impl<S: ByteSource> Iterator for Blocks<'_, S> {
    type Item = Result<LogicalBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.next_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Iterator over `(position, block)` pairs.
///
/// Created by [`Blocks::with_positions()`].
pub struct PositionedBlocks<'a, S> {
    blocks: Blocks<'a, S>,
}

impl<S: ByteSource> Iterator for PositionedBlocks<'_, S> {
    type Item = Result<(u64, LogicalBlock)>;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.blocks.stream.position();
        self.blocks.next().map(|result| result.map(|block| (position, block)))
    }
}
