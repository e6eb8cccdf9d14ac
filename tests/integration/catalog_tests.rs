//! Catalog construction from directory trees.

use std::path::Path;

use tile_matrix::{CatalogError, TileCatalog, TileId};

use super::test_utils::{touch_all, write_bytes, write_frame, write_stack, FixedMetadataReader};

fn positions(catalog: &TileCatalog) -> Vec<(i64, i64, i64)> {
    catalog.tiles().iter().map(|t| (t.x, t.y, t.z)).collect()
}

// =============================================================================
// Loading real files
// =============================================================================

#[test]
fn test_load_grid_of_tiff_stacks() {
    let dir = tempfile::tempdir().unwrap();
    for (x, y) in [(0, 0), (90, 0), (0, 90), (90, 90)] {
        write_stack(dir.path(), &format!("img_x_{:03}_y_{:03}_z_000.tif", x, y), 10, 100, 100);
    }

    let catalog = TileCatalog::load(dir.path()).unwrap();
    assert_eq!(catalog.len(), 4);
    assert!(catalog.skipped().is_empty());
    assert_eq!(positions(&catalog), vec![(0, 0, 0), (90, 0, 0), (0, 90, 0), (90, 90, 0)]);

    let first = catalog.get(TileId(0)).unwrap();
    assert_eq!((first.nfrms, first.xsize, first.ysize), (10, 100, 100));
    assert_eq!(first.z_end, 10);
    assert!(first.filename.starts_with(dir.path()));

    assert_eq!(catalog.slices().len(), 1);
    assert_eq!(catalog.full_height(), Some(190));
    assert_eq!(catalog.full_width(), Some(190));
}

#[test]
fn test_bad_candidates_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_stack(dir.path(), "x_0_y_0_z_0.tif", 5, 64, 64);
    write_bytes(dir.path(), "notes.txt", b"acquisition notes");
    write_bytes(dir.path(), "x_1_y_0_z_0.tif", b"not a tiff at all");

    let catalog = TileCatalog::load(dir.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.tiles()[0].nfrms, 5);

    let skipped = catalog.skipped();
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0].path, dir.path().join("notes.txt"));
    assert_eq!(skipped[0].reason, "Invalid name notes.txt");
    assert_eq!(skipped[1].path, dir.path().join("x_1_y_0_z_0.tif"));
}

#[test]
fn test_directory_tiles_and_nested_directories() {
    let dir = tempfile::tempdir().unwrap();

    // A tile stored as a directory of frames
    let tile_dir = dir.path().join("run1").join("x_10_y_20_z_5");
    for i in 0..3 {
        write_frame(&tile_dir.join(format!("plane_{}.png", i)), 40, 30);
    }
    // A stack further down an unrelated directory
    write_stack(&dir.path().join("run2").join("deep"), "0_0_0_stack.tif", 2, 40, 30);

    let catalog = TileCatalog::load(dir.path()).unwrap();
    assert_eq!(positions(&catalog), vec![(0, 0, 0), (10, 20, 5)]);

    let frames = &catalog.tiles()[1];
    assert_eq!(frames.filename, tile_dir);
    assert_eq!((frames.nfrms, frames.xsize, frames.ysize), (3, 40, 30));
    assert_eq!(frames.z_end, 8);
}

#[test]
fn test_tiles_nested_inside_tile_directories() {
    let dir = tempfile::tempdir().unwrap();
    touch_all(
        dir.path(),
        &["x_0_y_0_z_0/f0.raw", "x_0_y_0_z_0/x_90_y_0_z_0/f0.raw"],
    );

    let catalog = TileCatalog::load_with(dir.path(), &FixedMetadataReader::new(1, 8, 8)).unwrap();
    assert_eq!(positions(&catalog), vec![(0, 0, 0), (90, 0, 0)]);
    assert_eq!(catalog.tiles()[0].filename, dir.path().join("x_0_y_0_z_0"));
    assert_eq!(
        catalog.tiles()[1].filename,
        dir.path().join("x_0_y_0_z_0").join("x_90_y_0_z_0")
    );
    // Frame files of a cataloged tile directory are not candidates
    assert!(catalog.skipped().is_empty());
}

#[test]
fn test_unsized_tile_directory_falls_back_to_its_files() {
    let dir = tempfile::tempdir().unwrap();
    touch_all(dir.path(), &["x_5_y_5_z_5/x_6_y_5_z_5.raw"]);

    let reader = FixedMetadataReader::new(1, 8, 8).failing("x_5_y_5_z_5");
    let catalog = TileCatalog::load_with(dir.path(), &reader).unwrap();

    assert_eq!(positions(&catalog), vec![(6, 5, 5)]);
    assert_eq!(catalog.skipped().len(), 1);
    assert_eq!(catalog.skipped()[0].path, dir.path().join("x_5_y_5_z_5"));
}

#[test]
fn test_root_named_as_tile_is_one_tile() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("x_1_y_1_z_1");
    for i in 0..2 {
        write_frame(&root.join(format!("{}.png", i)), 8, 8);
    }

    let catalog = TileCatalog::load(&root).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.tiles()[0].nfrms, 2);
}

#[test]
fn test_empty_directory_is_an_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();

    let catalog = TileCatalog::load(dir.path()).unwrap();
    assert!(catalog.is_empty());
    assert!(catalog.slices().is_empty());
    assert_eq!(catalog.tiles_along_y().count(), 0);
    assert_eq!(catalog.full_height(), None);
    assert!(matches!(catalog.require_tiles(), Err(CatalogError::Empty(_))));
}

#[test]
fn test_root_must_be_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_stack(dir.path(), "x_0_y_0_z_0.tif", 1, 8, 8);

    assert!(matches!(
        TileCatalog::load(&file),
        Err(CatalogError::NotADirectory(path)) if path == file
    ));
    assert!(matches!(
        TileCatalog::load(dir.path().join("missing")),
        Err(CatalogError::NotADirectory(_))
    ));
}

#[test]
fn test_reload_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b/x_5_y_0_z_0.tif", "a/x_5_y_0_z_0.tif", "x_0_y_5_z_0.tif", "x_0_y_0_z_9.tif"] {
        write_stack(dir.path(), name, 3, 16, 16);
    }

    let first = TileCatalog::load(dir.path()).unwrap();
    let second = TileCatalog::load(dir.path()).unwrap();
    assert_eq!(first.tiles(), second.tiles());

    // Same position: discovery order (a/ before b/) breaks the tie
    assert!(first.tiles()[0].filename.ends_with(Path::new("a/x_5_y_0_z_0.tif")));
    assert!(first.tiles()[1].filename.ends_with(Path::new("b/x_5_y_0_z_0.tif")));
}

// =============================================================================
// Custom metadata readers
// =============================================================================

#[test]
fn test_load_with_custom_reader() {
    let dir = tempfile::tempdir().unwrap();
    touch_all(dir.path(), &["x_0_y_0_z_0.raw", "x_0_y_0_z_50.raw", "x_9_y_9_z_9.raw"]);

    let reader = FixedMetadataReader::new(10, 200, 300)
        .with("x_0_y_0_z_50.raw", 20, 200, 300)
        .failing("x_9_y_9_z_9.raw");

    let catalog = TileCatalog::load_with(dir.path(), &reader).unwrap();
    assert_eq!(positions(&catalog), vec![(0, 0, 0), (0, 0, 50)]);
    assert_eq!(catalog.tiles()[1].z_end, 70);
    assert_eq!(catalog.skipped().len(), 1);
    assert!(catalog.skipped()[0].reason.contains("refused by test reader"));
}

#[test]
fn test_prefix_names() {
    let dir = tempfile::tempdir().unwrap();
    touch_all(dir.path(), &["005_010_020_extra.raw", "001_002_003.raw"]);

    let catalog = TileCatalog::load_with(dir.path(), &FixedMetadataReader::new(1, 1, 1)).unwrap();
    assert_eq!(positions(&catalog), vec![(1, 2, 3), (5, 10, 20)]);
}
