//! Low-level byte reading utilities

use std::io::{ErrorKind, Read};
use byteorder::{ByteOrder, LittleEndian};
use super::types::models::PaddingWidth;

/// Decode a 4 or 8 byte little-endian record marker from the front of `bytes`.
///
/// Used for the Fortran record length that brackets every disk block.
pub fn read_marker(bytes: &[u8], width: PaddingWidth) -> u64 {
    match width {
        PaddingWidth::Eight => LittleEndian::read_u64(bytes),
        PaddingWidth::Four => LittleEndian::read_u32(bytes) as u64,
    }
}

/// Fill `buf` from `reader`, looping over short reads.
///
/// Returns the number of bytes read, which is less than `buf.len()` only if the
/// reader was exhausted first.
pub fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
