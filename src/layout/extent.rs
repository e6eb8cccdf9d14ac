//! Mosaic extent estimation from merge groups.
//!
//! A group is one column (or row) of tiles in merge order. Consecutive
//! tiles overlap by `size - step`, where `step` is the coordinate difference
//! to the previous tile; the first tile has a step of zero. The group's
//! absolute extent is
//!
//! ```text
//! sum(size) - (sum(size - step) - size[0]) + coordinate[0]
//! ```
//!
//! A negative step (tiles listed against the coordinate order) is not
//! treated specially and simply enlarges that tile's overlap term.

use crate::catalog::Axis;

use super::grouping::TileGroup;

/// Absolute extent of one group along `axis`, or `None` for an empty group.
///
/// `axis` must be X or Y; Z groups are measured in frames and have no pixel
/// extent.
pub fn group_extent(group: &TileGroup<'_>, axis: Axis) -> Option<i64> {
    let first = group.first()?;

    let mut size_sum: i64 = 0;
    let mut overlap_sum: i64 = 0;
    let mut previous: Option<i64> = None;

    for tile in &group.tiles {
        let size = i64::from(tile.extent(axis));
        let coordinate = tile.coordinate(axis);
        let step = previous.map_or(0, |p| coordinate.saturating_sub(p));

        size_sum = size_sum.saturating_add(size);
        overlap_sum = overlap_sum.saturating_add(size.saturating_sub(step));
        previous = Some(coordinate);
    }

    overlap_sum = overlap_sum.saturating_sub(i64::from(first.extent(axis)));
    Some(
        size_sum
            .saturating_sub(overlap_sum)
            .saturating_add(first.coordinate(axis)),
    )
}

/// Largest group extent along `axis` over all `groups`.
///
/// Returns `None` when there are no groups.
pub fn full_extent<'a, I>(groups: I, axis: Axis) -> Option<i64>
where
    I: IntoIterator<Item = TileGroup<'a>>,
{
    groups
        .into_iter()
        .filter_map(|group| group_extent(&group, axis))
        .max()
}
