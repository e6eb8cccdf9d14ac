//! Tile dimension extraction from files on disk.

use tile_matrix::format::tiff::TiffStack;
use tile_matrix::format::{InputFile, MetadataReader, StackMetadataReader, TileMetadata};
use tile_matrix::io::{FileRangeReader, RangeReader};
use tile_matrix::MetadataError;

use super::test_utils::{write_bytes, write_frame, ByteOrderType, PageSpec, StackBuilder};

fn read(path: &std::path::Path) -> TileMetadata {
    StackMetadataReader.read_metadata(path).unwrap()
}

// =============================================================================
// TIFF stacks
// =============================================================================

#[test]
fn test_classic_little_endian_stack() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bytes(dir.path(), "stack.tif", &StackBuilder::uniform(7, 320, 240).build());

    assert_eq!(
        read(&path),
        TileMetadata {
            nfrms: 7,
            ysize: 240,
            xsize: 320,
        }
    );
}

#[test]
fn test_big_endian_stack() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = StackBuilder::uniform(3, 64, 32)
        .with_byte_order(ByteOrderType::BigEndian)
        .build();
    let path = write_bytes(dir.path(), "stack.tif", &bytes);

    let meta = read(&path);
    assert_eq!((meta.nfrms, meta.ysize, meta.xsize), (3, 32, 64));
}

#[test]
fn test_bigtiff_stacks_in_both_byte_orders() {
    let dir = tempfile::tempdir().unwrap();
    for (name, order) in [
        ("le.tif", ByteOrderType::LittleEndian),
        ("be.tif", ByteOrderType::BigEndian),
    ] {
        let bytes = StackBuilder::uniform(12, 2048, 1024)
            .with_bigtiff(true)
            .with_byte_order(order)
            .build();
        let path = write_bytes(dir.path(), name, &bytes);

        let meta = read(&path);
        assert_eq!((meta.nfrms, meta.ysize, meta.xsize), (12, 1024, 2048), "{}", name);
    }
}

#[test]
fn test_reduced_resolution_pages_are_not_frames() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = StackBuilder::new()
        .add_page(PageSpec::new(100, 80))
        .add_page(PageSpec::new(50, 40).reduced())
        .add_page(PageSpec::new(100, 80))
        .add_page(PageSpec::new(50, 40).reduced())
        .build();
    let path = write_bytes(dir.path(), "stack.tif", &bytes);

    let reader = FileRangeReader::open(&path).unwrap();
    let stack = TiffStack::parse(&reader).unwrap();
    assert_eq!(stack.ifd_count, 4);
    assert_eq!(stack.page_count, 2);
    assert_eq!(read(&path).nfrms, 2);
}

#[test]
fn test_imagej_single_ifd_stack() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = StackBuilder::new()
        .add_page(
            PageSpec::new(512, 512).with_description("ImageJ=1.53t\nimages=40\nslices=40\n"),
        )
        .build();
    let path = write_bytes(dir.path(), "stack.tif", &bytes);

    let meta = read(&path);
    assert_eq!(meta.nfrms, 40);
    assert_eq!(meta.xsize, 512);
}

#[test]
fn test_imagej_count_ignored_for_multi_page_files() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = StackBuilder::new()
        .add_page(PageSpec::new(16, 16).with_description("ImageJ=1.53t\nimages=40\n"))
        .add_page(PageSpec::new(16, 16))
        .build();
    let path = write_bytes(dir.path(), "stack.tif", &bytes);

    assert_eq!(read(&path).nfrms, 2);
}

#[test]
fn test_truncated_tiff_is_a_tiff_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = StackBuilder::uniform(2, 16, 16).build();
    bytes.truncate(12);
    let path = write_bytes(dir.path(), "stack.tif", &bytes);

    let err = StackMetadataReader.read_metadata(&path).unwrap_err();
    assert!(matches!(err, MetadataError::Tiff { .. }), "{:?}", err);
}

// =============================================================================
// Single images and frame directories
// =============================================================================

#[test]
fn test_png_is_a_single_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x_0_y_0_z_0.png");
    write_frame(&path, 48, 24);

    assert_eq!(
        read(&path),
        TileMetadata {
            nfrms: 1,
            ysize: 24,
            xsize: 48,
        }
    );
}

#[test]
fn test_frame_directory() {
    let dir = tempfile::tempdir().unwrap();
    let tile = dir.path().join("x_1_y_2_z_3");
    for i in 0..4 {
        write_frame(&tile.join(format!("frame_{:03}.png", i)), 40, 30);
    }
    std::fs::write(tile.join("acquisition.log"), b"ignored").unwrap();

    let input = InputFile::open(&tile).unwrap();
    assert_eq!(input.path(), tile.as_path());
    assert!(matches!(input, InputFile::Frames { ref frames, .. } if frames.len() == 4));
    assert_eq!(
        input.metadata().unwrap(),
        TileMetadata {
            nfrms: 4,
            ysize: 30,
            xsize: 40,
        }
    );
}

#[test]
fn test_frame_directory_of_tiff_frames() {
    let dir = tempfile::tempdir().unwrap();
    let tile = dir.path().join("x_0_y_0_z_0");
    for i in 0..3 {
        write_bytes(&tile, &format!("z{}.tif", i), &StackBuilder::uniform(1, 10, 20).build());
    }

    let meta = read(&tile);
    assert_eq!((meta.nfrms, meta.ysize, meta.xsize), (3, 20, 10));
}

#[test]
fn test_input_file_holds_reader_for_stack() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_bytes(dir.path(), "stack.tif", &StackBuilder::uniform(2, 8, 8).build());

    match InputFile::open(&path).unwrap() {
        InputFile::Stack { reader, stack } => {
            assert_eq!(reader.size(), std::fs::metadata(&path).unwrap().len());
            assert_eq!(stack.frame_count(), 2);
        }
        other => panic!("expected a stack, got {:?}", other),
    }
}
