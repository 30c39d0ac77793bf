//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_cost`, `edge_km`,
//! `edge_route`) are sorted by source node and indexed by `EdgeId`, so the
//! shortest-path inner loop scans contiguous memory.
//!
//! # Interning
//!
//! Geography node keys are interned to dense `NodeId`s **in lexicographic
//! key order** (the document map is a `BTreeMap`).  That ordering is load
//! bearing: every "lowest `NodeId` wins" tie-break in this crate therefore
//! means "lexicographically smallest node key", which is stable across runs
//! and rebuilds of the same data.
//!
//! # Immutability
//!
//! A built graph is never mutated.  When geography changes, build a fresh
//! graph and swap it in whole (hosts sharing across threads replace an
//! `Arc<NavGraph>`).

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use wf_core::{distance_km, Coord, EdgeId, NodeId, RouteId};
use wf_geo::{GeographyData, PlaceType, Terrain};

use crate::anchor::AnchorIndex;

/// Cost floor per edge.  Keeps zero-length link routes (ferry docks, gates)
/// from collapsing to free moves that dominate the priority order.
pub const MIN_EDGE_COST: f64 = 0.1;

// ── Route metadata ────────────────────────────────────────────────────────────

/// Interned metadata of one distinct route, shared by both directed edges.
#[derive(Clone, Debug)]
pub struct RouteInfo {
    /// Document route id.
    pub key: String,
    /// Display name, used in itinerary narration.
    pub name: Option<String>,
    pub terrain: Terrain,
}

/// Build-time counters, reported once via `tracing` and kept for inspection.
#[derive(Copy, Clone, Debug, Default)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub routes: usize,
    /// Routes dropped because an endpoint key did not resolve.
    pub skipped_routes: usize,
    /// Nodes with no outgoing edges.  Tolerated; they are reachable as
    /// anchors but any network route from them falls back to direct travel.
    pub isolated_nodes: usize,
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Weighted undirected navigation graph over geography nodes, in CSR form,
/// plus the spatial anchor index.
///
/// Build with [`NavGraph::build`]; all methods take `&self`.
pub struct NavGraph {
    // ── Node data (indexed by NodeId, lexicographic key order) ────────────
    pub(crate) node_keys:       Vec<String>,
    pub(crate) node_coords:     Vec<Coord>,
    pub(crate) node_continents: Vec<String>,
    pub(crate) node_places:     Vec<PlaceType>,
    pub(crate) node_names:      Vec<String>,
    key_index: FxHashMap<String, NodeId>,

    // ── CSR edge adjacency (indexed by EdgeId = position in sorted order) ─
    /// Row pointer; length = node count + 1.
    pub(crate) node_out_start: Vec<u32>,
    pub(crate) edge_from:  Vec<NodeId>,
    pub(crate) edge_to:    Vec<NodeId>,
    pub(crate) edge_cost:  Vec<f64>,
    pub(crate) edge_km:    Vec<f64>,
    pub(crate) edge_route: Vec<RouteId>,

    // ── Route metadata (indexed by RouteId) ───────────────────────────────
    routes: Vec<RouteInfo>,

    // ── Spatial index ─────────────────────────────────────────────────────
    pub(crate) anchors: AnchorIndex,

    stats: GraphStats,
}

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    cost:  f64,
    km:    f64,
    route: RouteId,
}

impl NavGraph {
    /// Build the graph from merged geography data.
    ///
    /// Routes whose endpoints are missing from the node set are skipped and
    /// counted, never fatal.  Each kept route yields two directed edges of
    /// equal cost:
    ///
    /// ```text
    /// km   = distance_km (authored)  |  Euclidean endpoint distance
    /// cost = max(0.1, km × cost_multiplier)
    /// ```
    pub fn build(data: &GeographyData) -> NavGraph {
        let node_count = data.nodes.len();

        // ── Intern nodes, lexicographic by key ────────────────────────────
        let mut node_keys       = Vec::with_capacity(node_count);
        let mut node_coords     = Vec::with_capacity(node_count);
        let mut node_continents = Vec::with_capacity(node_count);
        let mut node_places     = Vec::with_capacity(node_count);
        let mut node_names      = Vec::with_capacity(node_count);
        let mut key_index =
            FxHashMap::with_capacity_and_hasher(node_count, Default::default());

        for (key, node) in &data.nodes {
            let id = NodeId(node_keys.len() as u32);
            node_keys.push(key.clone());
            node_coords.push(node.coords());
            node_continents.push(node.continent.trim().to_string());
            node_places.push(node.place_type);
            node_names.push(node.name.clone());
            key_index.insert(key.clone(), id);
        }

        // ── Routes → raw directed edges ───────────────────────────────────
        let mut raw: Vec<RawEdge> = Vec::with_capacity(data.routes.len() * 2);
        let mut routes: Vec<RouteInfo> = Vec::with_capacity(data.routes.len());
        let mut skipped_routes = 0usize;

        for def in &data.routes {
            let (Some(&from), Some(&to)) = (
                key_index.get(def.start.as_str()),
                key_index.get(def.end.as_str()),
            ) else {
                warn!(route = %def.id, start = %def.start, end = %def.end,
                      "route references a missing node; skipped");
                skipped_routes += 1;
                continue;
            };

            let km = def
                .distance_km
                .unwrap_or_else(|| distance_km(node_coords[from.index()], node_coords[to.index()]));
            let cost = (km * def.cost_multiplier.unwrap_or(1.0)).max(MIN_EDGE_COST);

            let route = RouteId(routes.len() as u32);
            routes.push(RouteInfo {
                key:     def.id.clone(),
                name:    def.name.clone(),
                terrain: def.terrain,
            });
            raw.push(RawEdge { from, to, cost, km, route });
            raw.push(RawEdge { from: to, to: from, cost, km, route });
        }

        // ── CSR construction ──────────────────────────────────────────────
        raw.sort_unstable_by_key(|e| e.from.0);

        let edge_from:  Vec<NodeId>  = raw.iter().map(|e| e.from).collect();
        let edge_to:    Vec<NodeId>  = raw.iter().map(|e| e.to).collect();
        let edge_cost:  Vec<f64>     = raw.iter().map(|e| e.cost).collect();
        let edge_km:    Vec<f64>     = raw.iter().map(|e| e.km).collect();
        let edge_route: Vec<RouteId> = raw.iter().map(|e| e.route).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let isolated_nodes = (0..node_count)
            .filter(|&i| node_out_start[i] == node_out_start[i + 1])
            .count();

        let anchors = AnchorIndex::build(&node_coords, &node_continents);

        let stats = GraphStats {
            nodes: node_count,
            edges: raw.len(),
            routes: routes.len(),
            skipped_routes,
            isolated_nodes,
        };
        info!(
            nodes          = stats.nodes,
            edges          = stats.edges,
            routes         = stats.routes,
            skipped_routes = stats.skipped_routes,
            isolated_nodes = stats.isolated_nodes,
            "navigation graph built"
        );

        NavGraph {
            node_keys,
            node_coords,
            node_continents,
            node_places,
            node_names,
            key_index,
            node_out_start,
            edge_from,
            edge_to,
            edge_cost,
            edge_km,
            edge_route,
            routes,
            anchors,
            stats,
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_keys.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_keys.is_empty()
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    // ── Node lookups ──────────────────────────────────────────────────────
    //
    // Id-taking accessors expect ids minted by this graph; a foreign or
    // stale id is a caller bug.

    /// Resolve a document node key to its interned id.
    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    pub fn node_key(&self, node: NodeId) -> &str {
        &self.node_keys[node.index()]
    }

    #[inline]
    pub fn node_coord(&self, node: NodeId) -> Coord {
        self.node_coords[node.index()]
    }

    pub fn node_continent(&self, node: NodeId) -> &str {
        &self.node_continents[node.index()]
    }

    pub fn node_place(&self, node: NodeId) -> PlaceType {
        self.node_places[node.index()]
    }

    /// Display name of the node, falling back to its key when unnamed.
    pub fn node_name(&self, node: NodeId) -> &str {
        let name = &self.node_names[node.index()];
        if name.is_empty() { &self.node_keys[node.index()] } else { name }
    }

    /// Metadata of an interned route.
    pub fn route(&self, route: RouteId) -> &RouteInfo {
        &self.routes[route.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }
}
