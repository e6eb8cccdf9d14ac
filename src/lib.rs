//! # Tile Matrix
//!
//! Catalogs 3-D microscope tiles on disk and works out how they fit
//! together into a mosaic.
//!
//! Each tile is a multi-page TIFF stack (or a directory of 2-D frames)
//! whose stage position is written in its name, e.g.
//! `img_x_005_y_010_z_020.tif`. The catalog reads only the dimensions of
//! each tile and answers layout questions for a downstream stitcher:
//!
//! - which tiles share depth frames (**slices**),
//! - in which order tiles are merged along X and along Y (**groups**),
//! - how tall and wide the merged mosaic is.
//!
//! ## Architecture
//!
//! - [`io`] - synchronous range reads over local files
//! - [`mod@format`] - TIFF stack parsing and tile dimension extraction
//! - [`catalog`] - coordinate parsing, discovery and the sorted tile table
//! - [`layout`] - slices, directional groups and extent estimation
//! - [`config`] - CLI configuration for the `tile-matrix` binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use tile_matrix::TileCatalog;
//!
//! let catalog = TileCatalog::load("/data/acquisition")?;
//!
//! for group in catalog.tiles_along_x() {
//!     let names: Vec<_> = group.tiles.iter().map(|t| t.filename.display()).collect();
//!     println!("slice {} row Y={}: {:?}", group.slice, group.key, names);
//! }
//!
//! println!("height: {:?}", catalog.full_height());
//! # Ok::<(), tile_matrix::CatalogError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod layout;

// Re-export commonly used types
pub use catalog::{
    parse_coordinates, Axis, SkippedCandidate, StageCoordinates, TileCatalog, TileId, TileRecord,
};
pub use config::{Config, OutputFormat};
pub use error::{CatalogError, IoError, MetadataError, ParseError, TiffError};
pub use format::{InputFile, MetadataReader, StackMetadataReader, TileMetadata};
pub use io::{FileRangeReader, RangeReader};
pub use layout::{group_along, GroupSpec, Groups, Slice, SliceGroups, SliceRule, TileGroup};
