use std::fmt;
use std::ops::Range;
use std::path::PathBuf;

use serde::Serialize;

use crate::format::TileMetadata;

use super::name::StageCoordinates;

// =============================================================================
// Axis
// =============================================================================

/// A stage axis, also used as a column name for sorting and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const fn name(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TileId / TileRecord
// =============================================================================

/// Row index of a tile in its catalog's sorted table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TileId(pub usize);

impl TileId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One tile of the mosaic: where it sits on the stage and how big it is.
///
/// `z_end` is always `z + nfrms`, so the depth range `[z, z_end)` is never
/// inverted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TileRecord {
    #[serde(rename = "X")]
    pub x: i64,
    #[serde(rename = "Y")]
    pub y: i64,
    #[serde(rename = "Z")]
    pub z: i64,
    #[serde(rename = "Z_end")]
    pub z_end: i64,
    pub nfrms: u32,
    pub xsize: u32,
    pub ysize: u32,
    pub filename: PathBuf,
}

impl TileRecord {
    pub fn new(
        (x, y, z): StageCoordinates,
        metadata: TileMetadata,
        filename: impl Into<PathBuf>,
    ) -> Self {
        Self {
            x,
            y,
            z,
            z_end: z.saturating_add(metadata.nfrms as i64),
            nfrms: metadata.nfrms,
            xsize: metadata.xsize,
            ysize: metadata.ysize,
            filename: filename.into(),
        }
    }

    /// Stage coordinate along `axis`.
    #[inline]
    pub fn coordinate(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Size of the tile along `axis`: pixels for X and Y, frames for Z.
    #[inline]
    pub fn extent(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.xsize,
            Axis::Y => self.ysize,
            Axis::Z => self.nfrms,
        }
    }

    /// Depth range covered by the tile.
    pub fn z_range(&self) -> Range<i64> {
        self.z..self.z_end
    }

    /// Whether this tile's depth range covers `other`'s entirely.
    #[inline]
    pub fn encloses(&self, other: &TileRecord) -> bool {
        self.z <= other.z && self.z_end >= other.z_end
    }
}
