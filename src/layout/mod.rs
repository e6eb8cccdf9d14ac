//! Spatial layout of a tile catalog.
//!
//! - [`slices`]: partition tiles into depth slices
//! - [`grouping`]: order and group slice tiles along X or Y
//! - [`extent`]: estimate the mosaic's size from those groups

pub mod extent;
pub mod grouping;
pub mod slices;

pub use extent::{full_extent, group_extent};
pub use grouping::{group_along, GroupSpec, Groups, SliceGroups, TileGroup};
pub use slices::{find_slices, Slice, SliceRule};
