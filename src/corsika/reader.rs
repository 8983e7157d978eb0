//! The raw block stream: sequential reads and seeks over one detected layout.

use std::fs::File;
use std::io;
use std::path::Path;
use log::{debug, info, warn};

use super::format::block::LogicalBlock;
use super::format::detect;
use super::format::disk::{DiskBlockBuffer, PREFIX_LEN};
use super::iter::Blocks;
use super::source::{ByteSource, Seekable};
use super::types::error::{CorsikaError, Result};
use super::types::models::{Cursor, Thinning, Variant, SUB_BLOCKS_PER_BLOCK};

/// Sequential and random-access reader over the logical blocks of a raw CORSIKA file.
///
/// The layout variant is detected once when the stream is built and never
/// changes. The stream keeps exactly one disk block in memory.
#[derive(Debug)]
pub struct RawStream<S> {
    source: Option<S>,
    variant: Variant,
    cursor: Cursor,
    buffer: DiskBlockBuffer,
    state: SourceState,
}

/// How the byte offset of the source relates to the cursor.
#[derive(Debug)]
enum SourceState {
    /// The source sits at the start of the cursor's disk block, or that block is buffered.
    InSync,
    /// The cursor lies past any byte offset the source can address.
    Beyond,
    /// A disk block read failed partway through. Every read reports the
    /// failure again until a seek or reopen puts the source back in sync.
    Faulted(CorsikaError),
}

impl RawStream<Seekable<File>> {
    /// Opens a raw CORSIKA file from the given path.
    ///
    /// # Errors
    /// Returns an error if:
    /// - File cannot be opened
    /// - The leading record marker matches no known layout
    /// - The first disk block is truncated or its markers disagree
    /// - The first logical block is not a run header
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening CORSIKA file: {}", path.display());
        Self::new(Seekable::open(path)?)
    }
}

impl<S: ByteSource> RawStream<S> {
    /// Detects the layout of `source`, which must be positioned at byte 0.
    pub fn new(mut source: S) -> Result<Self> {
        let prefix = detect::read_prefix(&mut source)?;
        let variant = detect::detect_variant(&prefix)?;
        Self::with_prefix(source, variant, prefix)
    }

    /// Builds a stream for a known layout whose first 8 bytes were already consumed.
    ///
    /// `prefix` becomes the first 8 bytes of the first disk block and the rest
    /// of that block is read from `source`. The block must pass validation:
    /// matching markers and a run header in its first logical block.
    pub fn with_prefix(mut source: S, variant: Variant, prefix: [u8; PREFIX_LEN]) -> Result<Self> {
        let mut buffer = DiskBlockBuffer::new(variant);
        buffer
            .fill_after_prefix(&mut source, prefix)
            .inspect_err(|e| warn!("Rejecting {} layout: {}", variant, e))?;

        let first = buffer.sub_block(0)?;
        if !first.is_run_header() {
            warn!("Rejecting {} layout: no run header", variant);
            return Err(CorsikaError::MissingRunHeader { found: first.id() });
        }

        info!(
            "CORSIKA stream opened: {} ({} bytes per disk block, seekable={})",
            variant,
            variant.disk_block_size(),
            source.is_seekable()
        );

        Ok(Self {
            source: Some(source),
            variant,
            cursor: Cursor::default(),
            buffer,
            state: SourceState::InSync,
        })
    }

    /// Reads the next logical block.
    ///
    /// Returns `Ok(None)` once the source is exhausted at a disk block boundary.
    ///
    /// # Errors
    /// - [`CorsikaError::TruncatedBlock`] if the source ends inside a disk block
    /// - [`CorsikaError::PaddingMismatch`] if a disk block's markers disagree
    /// - [`CorsikaError::Closed`] if the stream was closed
    ///
    /// A failed read leaves the source inside a disk block, so the same error
    /// is returned on every later read until the stream is seeked.
    pub fn next_block(&mut self) -> Result<Option<LogicalBlock>> {
        if !self.load_current()? {
            return Ok(None);
        }
        let block = self.buffer.sub_block(self.cursor.sub_block)?;
        self.advance();
        Ok(Some(block))
    }

    /// Skips the next logical block without copying it out.
    ///
    /// Returns `Ok(false)` at end of stream.
    pub fn skip_block(&mut self) -> Result<bool> {
        if !self.load_current()? {
            return Ok(false);
        }
        self.advance();
        Ok(true)
    }

    /// Position of the logical block the next [`next_block`](Self::next_block) call returns.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Repositions the stream so that the next block read is block `target`.
    ///
    /// On a seekable source this is a single byte seek. On a forward-only
    /// source blocks are read and discarded until `target` is reached, which
    /// costs O(distance); a backward target first reopens the source and
    /// replays from block 0. Seeking past the end leaves the stream at end of
    /// stream.
    ///
    /// # Errors
    /// Returns [`CorsikaError::SeekUnsupportedBackward`] if `target` lies behind
    /// the current position on a forward-only source that cannot be reopened.
    pub fn seek_to(&mut self, target: u64) -> Result<()> {
        let seekable = self.source.as_ref().ok_or(CorsikaError::Closed)?.is_seekable();
        if target == self.position() {
            return Ok(());
        }
        if seekable {
            self.seek_native(target)
        } else {
            self.seek_emulated(target)
        }
    }

    fn seek_native(&mut self, target: u64) -> Result<()> {
        let cursor = Cursor::from_position(target);
        if self.buffer.is_valid() && cursor.disk_block == self.cursor.disk_block {
            debug!("Seek to block {} stays in buffered disk block {}", target, cursor.disk_block);
            self.cursor = cursor;
            return Ok(());
        }

        let offset = cursor
            .disk_block
            .checked_mul(self.variant.disk_block_size() as u64)
            .filter(|offset| i64::try_from(*offset).is_ok());
        match offset {
            Some(offset) => {
                debug!("Seek to block {}: disk block {} at byte {}", target, cursor.disk_block, offset);
                self.source_mut()?.seek_to(offset)?;
                self.state = SourceState::InSync;
            }
            None => {
                debug!("Seek to block {} lies beyond any addressable byte offset", target);
                self.state = SourceState::Beyond;
            }
        }
        self.cursor = cursor;
        self.buffer.invalidate();
        Ok(())
    }

    fn seek_emulated(&mut self, target: u64) -> Result<()> {
        let from = self.position();
        if target < from {
            let source = self.source_mut()?;
            if !source.can_reopen() {
                return Err(CorsikaError::SeekUnsupportedBackward { from, to: target });
            }
            debug!("Backward seek from block {} to {}: reopening source", from, target);
            source.reopen()?;
            self.cursor = Cursor::default();
            self.buffer.invalidate();
            self.state = SourceState::InSync;
        }

        debug!("Reading forward from block {} to {}", self.position(), target);
        while self.position() < target {
            if !self.skip_block()? {
                debug!("End of stream at block {} while seeking to {}", self.position(), target);
                break;
            }
        }
        Ok(())
    }

    pub fn is_seekable(&self) -> bool {
        self.source.as_ref().is_some_and(|source| source.is_seekable())
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Whether this file was written by a thinned simulation.
    pub fn is_thinned(&self) -> bool {
        self.variant.thinning == Thinning::Thinned
    }

    /// Whether the stream still owns its byte source.
    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Releases the byte source. Later reads and seeks fail with [`CorsikaError::Closed`].
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!("CORSIKA stream closed at block {}", self.position());
        }
        self.buffer.invalidate();
    }

    /// Gives back the byte source, positioned just after the last disk block read.
    pub fn into_source(self) -> Option<S> {
        self.source
    }

    /// Returns an iterator over the remaining logical blocks.
    pub fn blocks(&mut self) -> Blocks<'_, S> {
        Blocks::new(self)
    }

    fn source_mut(&mut self) -> Result<&mut S> {
        self.source.as_mut().ok_or(CorsikaError::Closed)
    }

    /// Makes sure the disk block under the cursor is buffered.
    fn load_current(&mut self) -> Result<bool> {
        if self.buffer.is_valid() {
            return Ok(true);
        }
        let source = self.source.as_mut().ok_or(CorsikaError::Closed)?;
        match &self.state {
            SourceState::InSync => {}
            SourceState::Beyond => return Ok(false),
            SourceState::Faulted(error) => return Err(repeat_error(error)),
        }
        self.buffer
            .fill(source, self.cursor.disk_block)
            .inspect_err(|e| {
                warn!("Read of disk block {} failed: {}", self.cursor.disk_block, e);
                self.state = SourceState::Faulted(repeat_error(e));
            })
    }

    fn advance(&mut self) {
        self.cursor.sub_block += 1;
        if self.cursor.sub_block >= SUB_BLOCKS_PER_BLOCK {
            self.cursor.disk_block += 1;
            self.cursor.sub_block = 0;
            self.buffer.invalidate();
        }
    }
}

/// Builds a fresh copy of a latched read failure.
fn repeat_error(error: &CorsikaError) -> CorsikaError {
    match error {
        CorsikaError::PaddingMismatch { disk_block, start, end } => CorsikaError::PaddingMismatch {
            disk_block: *disk_block,
            start: *start,
            end: *end,
        },
        CorsikaError::TruncatedBlock { disk_block, expected, found } => CorsikaError::TruncatedBlock {
            disk_block: *disk_block,
            expected: *expected,
            found: *found,
        },
        CorsikaError::Io(e) => CorsikaError::Io(io::Error::new(e.kind(), e.to_string())),
        other => CorsikaError::Io(io::Error::other(other.to_string())),
    }
}
