//! End-to-end route composition between arbitrary coordinates.
//!
//! Snaps both endpoints to anchors, runs the path search, and falls back to
//! straight-line travel when the network cannot serve the query.  This is
//! the single entry point travel planning goes through.

use tracing::{debug, warn};

use wf_core::{distance_km, Coord};

use crate::graph::NavGraph;
use crate::path::NavPath;

/// Detour factor applied to the straight-line distance when two points share
/// a continent but the network cannot connect them: cross-country walking is
/// half again as long as the crow flies.
pub const OFF_ROAD_DETOUR: f64 = 1.5;

/// How a composed route gets from start to end.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RouteKind {
    /// Follows network edges between two anchors.
    Network,
    /// Straight line, off the network.
    Direct,
    /// No connection exists (different continents, no linking route).
    Unreachable,
}

/// A composed route.  `start`/`end` are the raw query coordinates, carried
/// so off-network travel can still interpolate between real endpoints.
#[derive(Clone, Debug)]
pub struct RouteResult {
    pub kind: RouteKind,
    /// Node path for [`RouteKind::Network`]; `None` otherwise.
    pub path: Option<NavPath>,
    /// Anchor walks + network segments, or the penalised straight line.
    /// `0.0` when unreachable.
    pub total_km: f64,
    pub start: Coord,
    pub end: Coord,
}

/// Compose a route from `start` to `end`.
///
/// Decision ladder:
/// 1. both anchors found, path found → `Network`;
/// 2. both anchors found, no path, same continent → `Direct` with the
///    off-road detour factor;
/// 3. both anchors found, no path, different continents → `Unreachable`;
/// 4. an anchor missing → `Direct` at the plain straight-line distance.
pub fn compose_route(
    graph: &NavGraph,
    start: Coord,
    end: Coord,
    start_continent: &str,
    end_continent: &str,
) -> RouteResult {
    let from = graph.nearest_anchor(start, start_continent);
    let to = graph.nearest_anchor(end, end_continent);

    let (Some(from), Some(to)) = (from, to) else {
        let total_km = distance_km(start, end);
        debug!(total_km, "no anchor available; composing direct route");
        return RouteResult { kind: RouteKind::Direct, path: None, total_km, start, end };
    };

    match graph.find_path(from.node, to.node) {
        Some(path) => {
            let total_km = from.walk_km + path.total_km() + to.walk_km;
            debug!(
                from     = %graph.node_key(from.node),
                to       = %graph.node_key(to.node),
                hops     = path.len(),
                total_km,
                "network route composed"
            );
            RouteResult { kind: RouteKind::Network, path: Some(path), total_km, start, end }
        }
        None if start_continent.trim() == end_continent.trim() => {
            let total_km = distance_km(start, end) * OFF_ROAD_DETOUR;
            debug!(total_km, "network disconnected; composing off-road direct route");
            RouteResult { kind: RouteKind::Direct, path: None, total_km, start, end }
        }
        None => {
            warn!(
                start_continent = start_continent.trim(),
                end_continent   = end_continent.trim(),
                "no route between continents"
            );
            RouteResult { kind: RouteKind::Unreachable, path: None, total_km: 0.0, start, end }
        }
    }
}

impl RouteResult {
    pub fn is_reachable(&self) -> bool {
        self.kind != RouteKind::Unreachable
    }
}
