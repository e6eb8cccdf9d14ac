//! The tile catalog.
//!
//! A [`TileCatalog`] is built once from a directory tree and holds one
//! [`TileRecord`] per readable tile, sorted by (Z, Y, X). Every layout query
//! (slices, merge groups, extents) is recomputed from that table on each
//! call; nothing is cached.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::CatalogError;
use crate::format::{MetadataReader, StackMetadataReader};
use crate::layout::{find_slices, full_extent, GroupSpec, Groups, Slice, SliceRule};

use super::loader::{discover, SkippedCandidate};
use super::record::{Axis, TileId, TileRecord};

/// Tiles found under one root directory.
#[derive(Debug, Clone)]
pub struct TileCatalog {
    root: PathBuf,
    tiles: Vec<TileRecord>,
    skipped: Vec<SkippedCandidate>,
    ascending_tiles_x: bool,
    ascending_tiles_y: bool,
    slice_rule: SliceRule,
}

impl TileCatalog {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Load every tile under `root` using the default metadata reader.
    ///
    /// Candidates whose name or dimensions cannot be read are logged and
    /// skipped; see [`skipped`](Self::skipped). An empty result is not an
    /// error.
    ///
    /// # Errors
    /// [`CatalogError::NotADirectory`] if `root` is not a directory.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::load_with(root, &StackMetadataReader)
    }

    /// Load every tile under `root`, asking `reader` for tile dimensions.
    pub fn load_with<M: MetadataReader>(
        root: impl AsRef<Path>,
        reader: &M,
    ) -> Result<Self, CatalogError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(CatalogError::NotADirectory(root.to_path_buf()));
        }

        let found = discover(root, reader);
        let catalog = Self::assemble(root.to_path_buf(), found.records, found.skipped);

        info!(
            root = %root.display(),
            tiles = catalog.tiles.len(),
            skipped = catalog.skipped.len(),
            "Loaded tile catalog"
        );

        Ok(catalog)
    }

    /// Build a catalog from records gathered elsewhere.
    ///
    /// Records are sorted by (Z, Y, X) exactly as [`load`](Self::load) sorts
    /// them. Each `z_end` is recomputed as `z + nfrms`.
    pub fn from_records(root: impl Into<PathBuf>, records: Vec<TileRecord>) -> Self {
        Self::assemble(root.into(), records, Vec::new())
    }

    fn assemble(
        root: PathBuf,
        mut tiles: Vec<TileRecord>,
        skipped: Vec<SkippedCandidate>,
    ) -> Self {
        // Depth ranges always follow from the frame count
        for tile in &mut tiles {
            tile.z_end = tile.z.saturating_add(i64::from(tile.nfrms));
        }
        // Stable: tiles at the same position keep discovery order
        tiles.sort_by_key(|t| (t.z, t.y, t.x));

        Self {
            root,
            tiles,
            skipped,
            ascending_tiles_x: true,
            ascending_tiles_y: true,
            slice_rule: SliceRule::default(),
        }
    }

    // =========================================================================
    // Table access
    // =========================================================================

    /// The directory the catalog was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All tiles, sorted by (Z, Y, X). A tile's position is its [`TileId`].
    pub fn tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    pub fn get(&self, id: TileId) -> Option<&TileRecord> {
        self.tiles.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Fail with [`CatalogError::Empty`] if no tile was loaded.
    ///
    /// For callers that cannot do anything useful with an empty mosaic.
    pub fn require_tiles(&self) -> Result<&Self, CatalogError> {
        if self.tiles.is_empty() {
            Err(CatalogError::Empty(self.root.clone()))
        } else {
            Ok(self)
        }
    }

    /// Candidates rejected during loading, in visit order.
    pub fn skipped(&self) -> &[SkippedCandidate] {
        &self.skipped
    }

    // =========================================================================
    // Traversal settings
    // =========================================================================

    pub fn ascending_tiles_x(&self) -> bool {
        self.ascending_tiles_x
    }

    /// Direction in which [`tiles_along_x`](Self::tiles_along_x) walks.
    pub fn set_ascending_tiles_x(&mut self, ascending: bool) {
        self.ascending_tiles_x = ascending;
    }

    pub fn ascending_tiles_y(&self) -> bool {
        self.ascending_tiles_y
    }

    /// Direction in which [`tiles_along_y`](Self::tiles_along_y) walks.
    pub fn set_ascending_tiles_y(&mut self, ascending: bool) {
        self.ascending_tiles_y = ascending;
    }

    pub fn slice_rule(&self) -> SliceRule {
        self.slice_rule
    }

    pub fn set_slice_rule(&mut self, rule: SliceRule) {
        self.slice_rule = rule;
    }

    // =========================================================================
    // Layout queries
    // =========================================================================

    /// Partition the tiles into depth slices.
    pub fn slices(&self) -> Vec<Slice> {
        find_slices(&self.tiles, self.slice_rule)
    }

    /// Merge groups of every slice in turn, sorted and grouped per `spec`.
    ///
    /// Slices are computed up front; each slice is sorted only when the
    /// iterator reaches it.
    pub fn groups(&self, spec: GroupSpec) -> Groups<'_> {
        Groups::new(&self.tiles, self.slices(), spec)
    }

    /// Rows of tiles to merge along X, one group per Y value in each slice.
    pub fn tiles_along_x(&self) -> Groups<'_> {
        self.groups(GroupSpec::along_x(self.ascending_tiles_x))
    }

    /// Columns of tiles to merge along Y, one group per X value in each slice.
    pub fn tiles_along_y(&self) -> Groups<'_> {
        self.groups(GroupSpec::along_y(self.ascending_tiles_y))
    }

    /// Height of the mosaic: the tallest column extent across all slices.
    ///
    /// `None` if the catalog is empty.
    pub fn full_height(&self) -> Option<i64> {
        full_extent(self.tiles_along_y(), Axis::Y)
    }

    /// Width of the mosaic: the widest row extent across all slices.
    ///
    /// `None` if the catalog is empty.
    pub fn full_width(&self) -> Option<i64> {
        full_extent(self.tiles_along_x(), Axis::X)
    }
}
