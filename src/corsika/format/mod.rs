//! File format layer for raw CORSIKA files.
//!
//! This module provides the mid-level layer that bridges between raw byte
//! sources and the high-level [`RawStream`](crate::corsika::reader::RawStream).
//!
//! # Module Organization
//!
//! - [`detect`]: Picks the layout variant from the leading record marker
//! - [`disk`]: Reads and validates whole disk blocks
//! - [`block`]: Wraps the logical blocks copied out of a disk block
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Marker         │ ← detect::detect_variant() (first block only)
//! ├─────────────────┤
//! │  21 logical     │ ← disk::DiskBlockBuffer::fill()
//! │  blocks         │   block::LogicalBlock
//! ├─────────────────┤
//! │  Marker         │ ← must equal the start marker
//! └─────────────────┘
//!   ... repeated for every disk block
//! ```

pub mod block;
pub mod detect;
pub mod disk;
