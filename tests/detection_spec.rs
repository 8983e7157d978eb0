mod common;

use common::{corrupt_end_marker, corsika_file, logical_block, disk_block_with_markers};
use corsika_reader::corsika::format::detect::{detect_variant, read_prefix};
use corsika_reader::corsika::format::disk::DiskBlockBuffer;
use corsika_reader::{
    CorsikaError, PaddingWidth, RawStream, Seekable, Sequential, Thinning, Variant,
    SUB_BLOCKS_PER_BLOCK,
};
use std::io::Cursor;

#[test]
fn payload_sizes_match_format_constants() {
    assert_eq!(Thinning::Thinned.payload_size(), 26208);
    assert_eq!(Thinning::NotThinned.payload_size(), 22932);
    assert_eq!(
        Variant::new(Thinning::NotThinned, PaddingWidth::Eight).disk_block_size(),
        22948
    );
    assert_eq!(
        Variant::new(Thinning::Thinned, PaddingWidth::Four).disk_block_size(),
        26216
    );
}

#[test]
fn all_four_layouts_are_detected() {
    for variant in Variant::ALL {
        let file = corsika_file(variant, 1);
        let stream = RawStream::new(Seekable::new(Cursor::new(file)))
            .unwrap_or_else(|e| panic!("open {} failed: {}", variant, e));
        assert_eq!(stream.variant(), variant);
        assert_eq!(
            stream.is_thinned(),
            variant.thinning == Thinning::Thinned,
            "thinning flag for {}",
            variant
        );
        assert_eq!(stream.position(), 0);
        assert!(stream.is_open());
    }
}

#[test]
fn detection_works_on_forward_only_sources() {
    for variant in Variant::ALL {
        let file = corsika_file(variant, 2);
        let mut stream = RawStream::new(Sequential::new(Cursor::new(file))).expect("open");
        assert_eq!(stream.variant(), variant);
        assert!(!stream.is_seekable());
        let first = stream.next_block().expect("read").expect("block");
        assert!(first.is_run_header());
    }
}

#[test]
fn unknown_leading_marker_is_unrecognized() {
    let mut file = corsika_file(Variant::ALL[0], 1);
    file[..8].copy_from_slice(&1000u64.to_le_bytes());
    match RawStream::new(Seekable::new(Cursor::new(file))) {
        Err(CorsikaError::FormatUnrecognized { len64, len32 }) => {
            assert_eq!(len64, 1000);
            assert_eq!(len32, 1000);
        }
        other => panic!("expected FormatUnrecognized, got {:?}", other.map(|s| s.variant())),
    }
}

#[test]
fn tiny_source_is_unrecognized() {
    let result = RawStream::new(Seekable::new(Cursor::new(vec![1u8, 2, 3])));
    assert!(matches!(result, Err(CorsikaError::FormatUnrecognized { .. })));

    let result = RawStream::new(Seekable::new(Cursor::new(Vec::new())));
    assert!(matches!(result, Err(CorsikaError::FormatUnrecognized { .. })));
}

#[test]
fn detection_prefers_wide_markers() {
    let thinned = Thinning::Thinned.payload_size() as u64;
    let not_thinned = Thinning::NotThinned.payload_size() as u64;

    let prefix = thinned.to_le_bytes();
    assert_eq!(
        detect_variant(&prefix).expect("detect"),
        Variant::new(Thinning::Thinned, PaddingWidth::Eight)
    );

    let prefix = not_thinned.to_le_bytes();
    assert_eq!(
        detect_variant(&prefix).expect("detect"),
        Variant::new(Thinning::NotThinned, PaddingWidth::Eight)
    );

    // A 4-byte marker followed by nonzero payload bytes
    let mut prefix = [0u8; 8];
    prefix[..4].copy_from_slice(&(not_thinned as u32).to_le_bytes());
    prefix[4..].copy_from_slice(b"RUNH");
    assert_eq!(
        detect_variant(&prefix).expect("detect"),
        Variant::new(Thinning::NotThinned, PaddingWidth::Four)
    );
}

#[test]
fn first_block_padding_mismatch_fails_open() {
    for variant in Variant::ALL {
        let mut file = corsika_file(variant, 2);
        corrupt_end_marker(&mut file, variant, 0);
        match RawStream::new(Seekable::new(Cursor::new(file))) {
            Err(CorsikaError::PaddingMismatch { disk_block, start, end }) => {
                assert_eq!(disk_block, 0);
                assert_eq!(start, variant.thinning.payload_size() as u64);
                assert_eq!(end, 12345);
            }
            other => panic!("expected PaddingMismatch for {}, got {:?}", variant, other.err()),
        }
    }
}

#[test]
fn missing_run_header_fails_open() {
    let variant = Variant::new(Thinning::NotThinned, PaddingWidth::Eight);
    let payload = variant.thinning.payload_size() as u64;
    let blocks: Vec<Vec<u8>> = (0..SUB_BLOCKS_PER_BLOCK)
        .map(|i| logical_block(variant.thinning, Some(b"EVTH"), i as u64))
        .collect();
    let file = disk_block_with_markers(variant, &blocks, payload, payload);

    match RawStream::new(Seekable::new(Cursor::new(file))) {
        Err(CorsikaError::MissingRunHeader { found }) => assert_eq!(&found, b"EVTH"),
        other => panic!("expected MissingRunHeader, got {:?}", other.err()),
    }
}

#[test]
fn truncated_first_block_fails_open() {
    let variant = Variant::new(Thinning::Thinned, PaddingWidth::Four);
    let mut file = corsika_file(variant, 1);
    file.truncate(variant.disk_block_size() - 10);
    let err = RawStream::new(Seekable::new(Cursor::new(file))).expect_err("truncated");
    assert!(err.is_structural(), "unexpected error {}", err);
    match err {
        CorsikaError::TruncatedBlock { disk_block, expected, found } => {
            assert_eq!(disk_block, 0);
            assert_eq!(expected, variant.disk_block_size());
            assert_eq!(found, variant.disk_block_size() - 10);
        }
        other => panic!("expected TruncatedBlock, got {}", other),
    }
}

#[test]
fn prefix_hand_off_rebuilds_the_first_disk_block() {
    for variant in Variant::ALL {
        let file = corsika_file(variant, 1);
        let mut reader = Cursor::new(file.clone());
        let prefix = read_prefix(&mut reader).expect("prefix");
        assert_eq!(&prefix[..], &file[..8]);

        let mut buffer = DiskBlockBuffer::new(variant);
        assert_eq!(buffer.variant(), variant);
        buffer.fill_after_prefix(&mut reader, prefix).expect("fill");
        assert!(buffer.is_valid());
        assert_eq!(buffer.start_marker(), variant.thinning.payload_size() as u64);
        assert_eq!(buffer.start_marker(), buffer.end_marker());
        assert!(buffer.sub_block(0).expect("block 0").is_run_header());
        assert_eq!(reader.position() as usize, variant.disk_block_size());

        // The stream sees the same first block
        let mut stream = RawStream::with_prefix(
            Seekable::new(Cursor::new(file[8..].to_vec())),
            variant,
            prefix,
        )
        .expect("with_prefix");
        let from_stream = stream.next_block().expect("read").expect("block");
        assert_eq!(from_stream, buffer.sub_block(0).expect("block 0"));
    }
}
