//! Core raw CORSIKA reader module

pub mod format;
pub mod iter;
pub mod reader;
pub mod source;
pub mod types;
mod utils;

pub use reader::RawStream;
pub use types::error::{CorsikaError, Result};
