//! Ordered groups of tiles to merge along one lateral axis.
//!
//! Within a slice, tiles are stably sorted by three axis keys and then
//! split by the value of a grouping axis: every tile with the same value
//! lands in the same group. Groups come out in the order their first tile
//! appears in the sorted sequence, and tiles within a group keep that order.
//!
//! Descending order reverses the whole sorted sequence. Within one depth
//! plane this reverses the group order too. In a slice spanning several Z
//! values the first tile met in each direction can share a group key, so
//! the group order may not reverse; membership never changes.
//!
//! Sorting happens one slice at a time, when the iterator first reaches the
//! slice; groups are handed out one per `next()` call.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::vec;

use crate::catalog::{Axis, TileId, TileRecord};

use super::slices::Slice;

// =============================================================================
// GroupSpec
// =============================================================================

/// Sort and grouping parameters for [`group_along`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupSpec {
    /// Sort keys, most significant first
    pub sort_keys: [Axis; 3],

    /// Sort direction, applied to all three keys
    pub ascending: bool,

    /// Axis whose value is shared by every tile of a group
    pub group_key: Axis,
}

impl GroupSpec {
    /// Rows of tiles to merge along X: sorted by (Z, X, Y), grouped by Y.
    pub const fn along_x(ascending: bool) -> Self {
        Self {
            sort_keys: [Axis::Z, Axis::X, Axis::Y],
            ascending,
            group_key: Axis::Y,
        }
    }

    /// Columns of tiles to merge along Y: sorted by (Z, Y, X), grouped by X.
    pub const fn along_y(ascending: bool) -> Self {
        Self {
            sort_keys: [Axis::Z, Axis::Y, Axis::X],
            ascending,
            group_key: Axis::X,
        }
    }

    fn compare(&self, a: &TileRecord, b: &TileRecord) -> Ordering {
        let ordering = self
            .sort_keys
            .iter()
            .map(|&axis| a.coordinate(axis).cmp(&b.coordinate(axis)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal);

        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }
}

// =============================================================================
// TileGroup
// =============================================================================

/// Tiles of one slice sharing the same grouping-axis value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGroup<'a> {
    /// Position of the slice this group belongs to
    pub slice: usize,

    /// Grouping axis
    pub axis: Axis,

    /// Shared value of the grouping axis
    pub key: i64,

    /// Row indices, in merge order
    pub ids: Vec<TileId>,

    /// Records, in merge order
    pub tiles: Vec<&'a TileRecord>,
}

impl<'a> TileGroup<'a> {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// First tile in merge order.
    pub fn first(&self) -> Option<&'a TileRecord> {
        self.tiles.first().copied()
    }
}

// =============================================================================
// Groups of a single slice
// =============================================================================

/// Lazy groups of one slice, produced by [`group_along`].
#[derive(Debug)]
pub struct SliceGroups<'a> {
    table: &'a [TileRecord],
    slice: usize,
    axis: Axis,
    groups: vec::IntoIter<(i64, Vec<TileId>)>,
}

impl<'a> Iterator for SliceGroups<'a> {
    type Item = TileGroup<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, ids) = self.groups.next()?;
        let tiles = ids.iter().map(|id| &self.table[id.index()]).collect();
        Some(TileGroup {
            slice: self.slice,
            axis: self.axis,
            key,
            ids,
            tiles,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.groups.size_hint()
    }
}

impl ExactSizeIterator for SliceGroups<'_> {}

/// Group the tiles of `slice` according to `spec`.
///
/// `slice_index` is recorded in every produced group. Slice members that
/// are not rows of `table` are ignored.
pub fn group_along<'a>(
    table: &'a [TileRecord],
    slice: &Slice,
    slice_index: usize,
    spec: GroupSpec,
) -> SliceGroups<'a> {
    let mut order: Vec<TileId> = slice
        .tiles()
        .iter()
        .copied()
        .filter(|id| id.index() < table.len())
        .collect();

    // `sort_by` is stable: ties keep table order
    order.sort_by(|a, b| spec.compare(&table[a.index()], &table[b.index()]));

    let mut slot_of_key: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<(i64, Vec<TileId>)> = Vec::new();
    for id in order {
        let key = table[id.index()].coordinate(spec.group_key);
        let slot = *slot_of_key.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(id);
    }

    SliceGroups {
        table,
        slice: slice_index,
        axis: spec.group_key,
        groups: groups.into_iter(),
    }
}

// =============================================================================
// Groups across all slices
// =============================================================================

/// Lazy groups of every slice in turn.
///
/// Created by [`TileCatalog::groups`](crate::TileCatalog::groups) and the
/// `tiles_along_*` shorthands. Each call to those builds a fresh iterator;
/// an iterator cannot be rewound.
#[derive(Debug)]
pub struct Groups<'a> {
    table: &'a [TileRecord],
    spec: GroupSpec,
    slices: std::iter::Enumerate<vec::IntoIter<Slice>>,
    current: Option<SliceGroups<'a>>,
}

impl<'a> Groups<'a> {
    pub(crate) fn new(table: &'a [TileRecord], slices: Vec<Slice>, spec: GroupSpec) -> Self {
        Self {
            table,
            spec,
            slices: slices.into_iter().enumerate(),
            current: None,
        }
    }

    /// The sort and grouping parameters in use.
    pub fn spec(&self) -> GroupSpec {
        self.spec
    }
}

impl<'a> Iterator for Groups<'a> {
    type Item = TileGroup<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(group) = self.current.as_mut().and_then(Iterator::next) {
                return Some(group);
            }
            let (index, slice) = self.slices.next()?;
            self.current = Some(group_along(self.table, &slice, index, self.spec));
        }
    }
}

impl std::iter::FusedIterator for Groups<'_> {}
