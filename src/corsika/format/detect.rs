//! Layout detection from the leading padding marker.
//!
//! A raw CORSIKA file starts with the record marker of its first disk block,
//! whose value is the payload length. That length tells the thinning mode, and
//! whether it lines up as a 64-bit or a 32-bit integer tells the marker width.

use std::io::Read;
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, trace};

use crate::corsika::types::error::{CorsikaError, Result};
use crate::corsika::types::models::{PaddingWidth, Variant};
use crate::corsika::utils;
use super::disk::PREFIX_LEN;

/// Reads the 8-byte prefix used for detection.
///
/// # Errors
/// A source shorter than the prefix cannot be a CORSIKA file and yields
/// [`CorsikaError::FormatUnrecognized`] built from whatever bytes were read.
pub fn read_prefix(reader: &mut impl Read) -> Result<[u8; PREFIX_LEN]> {
    let mut prefix = [0u8; PREFIX_LEN];
    let found = utils::read_full(reader, &mut prefix)?;
    if found < PREFIX_LEN {
        debug!("Source holds only {} bytes, too short for a record marker", found);
        return Err(unrecognized(&prefix));
    }
    Ok(prefix)
}

/// Picks the variant whose payload length matches the leading marker.
///
/// # Detection Order
/// 1. 64-bit marker, thinned payload
/// 2. 64-bit marker, not-thinned payload
/// 3. 32-bit marker, thinned payload
/// 4. 32-bit marker, not-thinned payload
pub fn detect_variant(prefix: &[u8; PREFIX_LEN]) -> Result<Variant> {
    let len64 = LittleEndian::read_u64(prefix);
    let len32 = LittleEndian::read_u32(prefix);
    trace!("Leading marker: len64={:#x}, len32={:#x}", len64, len32);

    Variant::ALL
        .into_iter()
        .find(|variant| {
            let expected = variant.thinning.payload_size() as u64;
            match variant.padding {
                PaddingWidth::Eight => len64 == expected,
                PaddingWidth::Four => len32 as u64 == expected,
            }
        })
        .inspect(|variant| debug!("Detected layout: {}", variant))
        .ok_or(CorsikaError::FormatUnrecognized { len64, len32 })
}

fn unrecognized(prefix: &[u8; PREFIX_LEN]) -> CorsikaError {
    CorsikaError::FormatUnrecognized {
        len64: LittleEndian::read_u64(prefix),
        len32: LittleEndian::read_u32(prefix),
    }
}
