//! Nearest-anchor search.
//!
//! Off-network coordinates enter the graph through an **anchor**: the
//! nearest interned node on the same continent.  One R-tree is bulk-loaded
//! per continent at build time, plus a global tree that a query continent of
//! exactly `"Ocean"` selects (sea travel may anchor on any shore).
//!
//! Equidistant candidates resolve to the lowest `NodeId` (lexicographically
//! smallest node key), so snapping is deterministic.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use wf_core::{distance_km, Coord, NodeId};

use crate::graph::NavGraph;

/// Squared map-unit distance below which a query is treated as standing
/// exactly on the node (0.01 map units ≈ 0.1 km at the standard scale).
pub const EXACT_MATCH_EPS: f64 = 1e-4;

/// Continent name that unlocks the global tree.
const OPEN_SEA: &str = "Ocean";

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the spatial index: a 2-D map point with its `NodeId`.
#[derive(Clone)]
struct AnchorEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for AnchorEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AnchorEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── AnchorIndex ───────────────────────────────────────────────────────────────

/// Per-continent R-trees plus the global tree, built once with the graph.
pub(crate) struct AnchorIndex {
    global: RTree<AnchorEntry>,
    by_continent: FxHashMap<String, RTree<AnchorEntry>>,
}

impl AnchorIndex {
    pub(crate) fn build(coords: &[Coord], continents: &[String]) -> Self {
        let mut grouped: FxHashMap<&str, Vec<AnchorEntry>> = FxHashMap::default();
        let mut all = Vec::with_capacity(coords.len());

        for (i, (coord, continent)) in coords.iter().zip(continents).enumerate() {
            let entry = AnchorEntry { point: [coord.x, coord.y], id: NodeId(i as u32) };
            grouped.entry(continent.as_str()).or_default().push(entry.clone());
            all.push(entry);
        }

        let by_continent = grouped
            .into_iter()
            .map(|(continent, entries)| (continent.to_string(), RTree::bulk_load(entries)))
            .collect();

        Self { global: RTree::bulk_load(all), by_continent }
    }

    fn tree_for(&self, continent: &str) -> Option<&RTree<AnchorEntry>> {
        if continent == OPEN_SEA {
            Some(&self.global)
        } else {
            self.by_continent.get(continent)
        }
    }
}

// ── Query ─────────────────────────────────────────────────────────────────────

/// A snapped anchor: the node and the walking distance to reach it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnchorHit {
    pub node: NodeId,
    /// Distance from the query point to the anchor, in km.
    pub walk_km: f64,
}

impl NavGraph {
    /// Nearest graph node to `coords` on `continent` (trimmed before
    /// matching; `"Ocean"` searches every continent).
    ///
    /// `None` when the continent has no nodes at all.  A hit within
    /// [`EXACT_MATCH_EPS`] squared map units returns immediately; otherwise
    /// equidistant candidates tie-break to the lowest `NodeId`.
    pub fn nearest_anchor(&self, coords: Coord, continent: &str) -> Option<AnchorHit> {
        let tree = self.anchors.tree_for(continent.trim())?;

        let query = [coords.x, coords.y];
        let mut candidates = tree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_d2) = candidates.next()?;

        let node = if best_d2 < EXACT_MATCH_EPS {
            first.id
        } else {
            let mut best = first.id;
            for (entry, d2) in candidates {
                if d2 > best_d2 {
                    break;
                }
                if entry.id < best {
                    best = entry.id;
                }
            }
            best
        };

        Some(AnchorHit { node, walk_km: distance_km(coords, self.node_coord(node)) })
    }
}
