//! Tile discovery and the sorted tile table.
//!
//! - [`name`]: stage coordinates encoded in file and directory names
//! - [`TileRecord`]: one row of the table
//! - [`TileCatalog`]: the table itself, plus the layout queries built on it

mod loader;
mod matrix;
pub mod name;
mod record;

pub use loader::SkippedCandidate;
pub use matrix::TileCatalog;
pub use name::{is_tile_name, parse_coordinates, StageCoordinates};
pub use record::{Axis, TileId, TileRecord};
