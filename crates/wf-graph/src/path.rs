//! Shortest-path search over the navigation graph.
//!
//! Standard Dijkstra with a binary-heap frontier.  The heap key is
//! `(cost, NodeId)`: the secondary id makes equal-cost extraction order
//! deterministic, and predecessor links keep the first strictly better
//! relaxation, so the whole search is a pure function of the graph.
//!
//! Costs are route weights (km × multiplier, floored), not durations;
//! terrain speed applies later, during itinerary generation.

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use wf_core::{Coord, EdgeId, NodeId, RouteId};

use crate::graph::NavGraph;

// ── Path types ────────────────────────────────────────────────────────────────

/// One node visited along a path.
#[derive(Clone, Debug)]
pub struct PathStep {
    pub node:   NodeId,
    pub coords: Coord,
    /// Route travelled to arrive here; `None` on the origin step.
    pub inbound: Option<RouteId>,
    /// Length of the inbound segment in km; `0.0` on the origin step.
    pub segment_km: f64,
}

/// The result of a successful path query: the ordered node sequence and the
/// summed edge cost.
#[derive(Clone, Debug)]
pub struct NavPath {
    pub steps: Vec<PathStep>,
    pub total_cost: f64,
}

impl NavPath {
    /// Physical length of the path in km (sum of segment lengths, which is
    /// not the same thing as `total_cost` once multipliers apply).
    pub fn total_km(&self) -> f64 {
        self.steps.iter().map(|s| s.segment_km).sum()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `true` if the path starts and ends on the same node.
    pub fn is_trivial(&self) -> bool {
        self.steps.len() <= 1
    }
}

/// `f64` cost with a total order, usable as a heap key.
///
/// Equality is defined by the same order, so `Eq` and `Ord` agree on signed
/// zeros and NaN.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Cost(pub(crate) f64);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

impl NavGraph {
    /// Lowest-cost path from `start` to `end`.
    ///
    /// Total: never panics.  `None` when either id is out of range or the
    /// target is unreachable.  `start == end` yields a single-step,
    /// zero-cost path.
    pub fn find_path(&self, start: NodeId, end: NodeId) -> Option<NavPath> {
        let n = self.node_count();
        if start.index() >= n || end.index() >= n {
            return None;
        }
        if start == end {
            return Some(NavPath {
                steps: vec![PathStep {
                    node:       start,
                    coords:     self.node_coord(start),
                    inbound:    None,
                    segment_km: 0.0,
                }],
                total_cost: 0.0,
            });
        }

        // dist[v] = best known cost to reach v.
        let mut dist = vec![f64::INFINITY; n];
        // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
        let mut prev_edge = vec![EdgeId::INVALID; n];

        dist[start.index()] = 0.0;

        // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
        let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
        heap.push(Reverse((Cost(0.0), start)));

        while let Some(Reverse((Cost(cost), node))) = heap.pop() {
            if node == end {
                return Some(self.reconstruct(&prev_edge, end, cost));
            }

            // Skip stale heap entries.
            if cost > dist[node.index()] {
                continue;
            }

            for edge in self.out_edges(node) {
                let neighbor = self.edge_to[edge.index()];
                let new_cost = cost + self.edge_cost[edge.index()];

                if new_cost < dist[neighbor.index()] {
                    dist[neighbor.index()] = new_cost;
                    prev_edge[neighbor.index()] = edge;
                    heap.push(Reverse((Cost(new_cost), neighbor)));
                }
            }
        }

        debug!(%start, %end, "no path in navigation graph");
        None
    }

    fn reconstruct(&self, prev_edge: &[EdgeId], end: NodeId, total_cost: f64) -> NavPath {
        let mut edges = Vec::new();
        let mut cur = end;
        loop {
            let e = prev_edge[cur.index()];
            if e == EdgeId::INVALID {
                break;
            }
            edges.push(e);
            cur = self.edge_from[e.index()];
        }
        edges.reverse();

        // `cur` has walked back to the start node.
        let mut steps = Vec::with_capacity(edges.len() + 1);
        steps.push(PathStep {
            node:       cur,
            coords:     self.node_coord(cur),
            inbound:    None,
            segment_km: 0.0,
        });
        for e in edges {
            let node = self.edge_to[e.index()];
            steps.push(PathStep {
                node,
                coords:     self.node_coord(node),
                inbound:    Some(self.edge_route[e.index()]),
                segment_km: self.edge_km[e.index()],
            });
        }

        NavPath { steps, total_cost }
    }
}
