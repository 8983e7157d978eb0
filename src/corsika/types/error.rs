//! Custom error types for the corsika-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum CorsikaError {
    /// An error originating from the underlying byte source.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The first padding marker matches none of the known disk block layouts.
    #[error("Can't determine type of CORSIKA file: leading marker {len64:#x} (low word {len32:#x}) matches no known layout")]
    FormatUnrecognized { len64: u64, len32: u32 },

    /// The layout was recognised but the file does not start with a run header.
    #[error("Not a valid CORSIKA file: first logical block is tagged {found:?}, expected \"RUNH\"")]
    MissingRunHeader { found: [u8; 4] },

    /// The two padding markers of one disk block disagree.
    #[error("Padding mismatch in disk block {disk_block}: start marker {start}, end marker {end}")]
    PaddingMismatch { disk_block: u64, start: u64, end: u64 },

    /// The source ran dry in the middle of a disk block.
    #[error("Truncated disk block {disk_block}: expected {expected} bytes, but found {found} bytes")]
    TruncatedBlock {
        disk_block: u64,
        expected: usize,
        found: usize,
    },

    /// A buffer handed to the block codec has the wrong length.
    #[error("Size mismatch for {context}: expected {expected} bytes, but found {found} bytes")]
    SizeMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// A backward seek was requested on a forward-only source that cannot be reopened.
    #[error("Cannot seek backward from block {from} to block {to} on a non-seekable source")]
    SeekUnsupportedBackward { from: u64, to: u64 },

    /// The stream has been closed and no longer owns a byte source.
    #[error("Stream is closed")]
    Closed,

    /// A mutex lock was poisoned, indicating a panic in another thread holding the lock.
    #[error("A mutex lock was poisoned, indicating a panic in another thread holding the lock.")]
    LockPoisoned,
}

impl CorsikaError {
    /// Whether this error means the file content itself is damaged.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CorsikaError::PaddingMismatch { .. } | CorsikaError::TruncatedBlock { .. }
        )
    }
}

/// A convenience `Result` type alias using the crate's `CorsikaError` type.
pub type Result<T> = std::result::Result<T, CorsikaError>;
