//! Tile file formats.
//!
//! Tiles are read only for their dimensions:
//!
//! - [`tiff`]: directory-level parser for multi-page TIFF / BigTIFF stacks
//! - [`metadata`]: the [`MetadataReader`] used by the catalog, and the
//!   scoped [`InputFile`] handle it opens per tile

pub mod metadata;
pub mod tiff;

pub use metadata::{
    is_tiff_header, InputFile, MetadataReader, StackMetadataReader, TileMetadata,
    FRAME_EXTENSIONS,
};
