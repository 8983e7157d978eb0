//! Synthetic raw CORSIKA files for the integration tests.
#![allow(dead_code)]

use corsika_reader::{PaddingWidth, Thinning, Variant, SUB_BLOCKS_PER_BLOCK, WORD_SIZE};
use std::io::{self, Read};

/// Builds one logical block: word 0 holds `tag` (or zero), word 1 holds `position`.
pub fn logical_block(thinning: Thinning, tag: Option<&[u8; 4]>, position: u64) -> Vec<u8> {
    let mut bytes = vec![0u8; thinning.sub_block_size()];
    if let Some(tag) = tag {
        bytes[..4].copy_from_slice(tag);
    }
    bytes[WORD_SIZE..2 * WORD_SIZE].copy_from_slice(&(position as f32).to_le_bytes());
    bytes
}

pub fn marker(padding: PaddingWidth, value: u64) -> Vec<u8> {
    match padding {
        PaddingWidth::Four => (value as u32).to_le_bytes().to_vec(),
        PaddingWidth::Eight => value.to_le_bytes().to_vec(),
    }
}

/// Wraps logical blocks into one disk block with the given start and end markers.
pub fn disk_block_with_markers(variant: Variant, blocks: &[Vec<u8>], start: u64, end: u64) -> Vec<u8> {
    assert_eq!(blocks.len(), SUB_BLOCKS_PER_BLOCK);
    let mut bytes = marker(variant.padding, start);
    for block in blocks {
        bytes.extend_from_slice(block);
    }
    bytes.extend_from_slice(&marker(variant.padding, end));
    bytes
}

/// Builds a file of `disk_blocks` disk blocks whose logical blocks carry their
/// own position in word 1. Block 0 is a run header and block 1 an event header.
pub fn corsika_file(variant: Variant, disk_blocks: usize) -> Vec<u8> {
    let payload = variant.thinning.payload_size() as u64;
    let mut file = Vec::with_capacity(disk_blocks * variant.disk_block_size());
    for disk in 0..disk_blocks {
        let blocks: Vec<Vec<u8>> = (0..SUB_BLOCKS_PER_BLOCK)
            .map(|sub| {
                let position = (disk * SUB_BLOCKS_PER_BLOCK + sub) as u64;
                let tag = match position {
                    0 => Some(b"RUNH"),
                    1 => Some(b"EVTH"),
                    _ => None,
                };
                logical_block(variant.thinning, tag, position)
            })
            .collect();
        file.extend(disk_block_with_markers(variant, &blocks, payload, payload));
    }
    file
}

/// Overwrites the end marker of disk block `disk` with a wrong value.
pub fn corrupt_end_marker(file: &mut [u8], variant: Variant, disk: usize) {
    let width = variant.padding.bytes();
    let end = (disk + 1) * variant.disk_block_size();
    let bad = marker(variant.padding, 12345);
    file[end - width..end].copy_from_slice(&bad);
}

/// Reads word 1 of a logical block back as the position it was built with.
pub fn position_of(block: &corsika_reader::LogicalBlock) -> u64 {
    block.word(1).expect("word 1") as u64
}

/// A forward-only reader that hands out at most `chunk` bytes per call.
pub struct Trickle<R> {
    inner: R,
    chunk: usize,
}

impl<R: Read> Trickle<R> {
    pub fn new(inner: R, chunk: usize) -> Self {
        Self { inner, chunk }
    }
}

impl<R: Read> Read for Trickle<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len().min(self.chunk);
        self.inner.read(&mut buf[..len])
    }
}
