//! Slices: groups of tiles that share depth coverage.
//!
//! Tiles are nodes; an edge joins two tiles deemed to share a Z frame; a
//! slice is a connected component. Two rules decide the edges:
//!
//! - [`SliceRule::Enclosure`] (default): for every tile `t`, the tiles whose
//!   depth range covers `t`'s are chained in table order, and the chain is
//!   closed from its first to its last member. Two tiles that only partly
//!   overlap are joined only through a third tile enclosing both.
//! - [`SliceRule::Overlap`]: any two tiles whose depth ranges intersect are
//!   joined. A zero-depth tile counts as covering its own `z` frame.
//!
//! The graph is rebuilt on every call and never cached.

use serde::Serialize;

use crate::catalog::{TileId, TileRecord};

// =============================================================================
// SliceRule
// =============================================================================

/// How tiles are linked into slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SliceRule {
    /// Chain every tile with the tiles whose depth range encloses it
    #[default]
    Enclosure,

    /// Link every pair of tiles whose depth ranges intersect
    Overlap,
}

// =============================================================================
// Slice
// =============================================================================

/// A connected set of tiles, as ascending row indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Slice {
    tiles: Vec<TileId>,
}

impl Slice {
    /// Build a slice from arbitrary row indices; duplicates are dropped.
    pub fn from_ids(mut tiles: Vec<TileId>) -> Self {
        tiles.sort_unstable();
        tiles.dedup();
        Self { tiles }
    }

    /// Tile indices in ascending order.
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.binary_search(&id).is_ok()
    }
}

// =============================================================================
// Union-Find
// =============================================================================

/// Disjoint sets over `0..n` with path compression and union by rank.
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        if root_x == root_y {
            return;
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Less => self.parent[root_x] = root_y,
            std::cmp::Ordering::Greater => self.parent[root_y] = root_x,
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
    }

    /// Components ordered by their smallest member, members ascending.
    fn components(mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
        let mut components: Vec<Vec<usize>> = Vec::new();

        for i in 0..n {
            let root = self.find(i);
            let slot = *slot_of_root[root].get_or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[slot].push(i);
        }

        components
    }
}

// =============================================================================
// Slice discovery
// =============================================================================

/// Partition `tiles` into slices under `rule`.
///
/// Slices are returned ordered by their smallest row index. An empty table
/// yields no slices.
pub fn find_slices(tiles: &[TileRecord], rule: SliceRule) -> Vec<Slice> {
    let mut sets = UnionFind::new(tiles.len());

    match rule {
        SliceRule::Enclosure => link_enclosures(tiles, &mut sets),
        SliceRule::Overlap => link_overlaps(tiles, &mut sets),
    }

    let slices: Vec<Slice> = sets
        .components()
        .into_iter()
        .map(|members| Slice {
            tiles: members.into_iter().map(TileId).collect(),
        })
        .collect();

    tracing::trace!(tiles = tiles.len(), slices = slices.len(), ?rule, "Found slices");
    slices
}

fn link_enclosures(tiles: &[TileRecord], sets: &mut UnionFind) {
    let mut enclosing = Vec::new();
    for tile in tiles {
        enclosing.clear();
        enclosing.extend(
            tiles
                .iter()
                .enumerate()
                .filter(|(_, other)| other.encloses(tile))
                .map(|(i, _)| i),
        );

        for pair in enclosing.windows(2) {
            sets.union(pair[0], pair[1]);
        }
        if let (Some(&first), Some(&last)) = (enclosing.first(), enclosing.last()) {
            sets.union(first, last);
        }
    }
}

fn link_overlaps(tiles: &[TileRecord], sets: &mut UnionFind) {
    // Sweep by start: a tile overlaps the running component while it starts
    // before the furthest end seen so far.
    let mut order: Vec<usize> = (0..tiles.len()).collect();
    order.sort_by_key(|&i| tiles[i].z);

    let mut current: Option<(usize, i64)> = None;
    for i in order {
        let start = tiles[i].z;
        let end = occupied_end(&tiles[i]);
        current = match current {
            Some((anchor, reach)) if start < reach => {
                sets.union(anchor, i);
                Some((anchor, reach.max(end)))
            }
            _ => Some((i, end)),
        };
    }
}

/// End of the frames a tile occupies; a zero-depth tile still occupies `z`.
fn occupied_end(tile: &TileRecord) -> i64 {
    tile.z_end.max(tile.z.saturating_add(1))
}
