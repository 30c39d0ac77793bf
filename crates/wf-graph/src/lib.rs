//! `wf-graph` — navigation graph, shortest paths, anchors, and composition.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`graph`]   | `NavGraph` (CSR + interning), `RouteInfo`, `GraphStats`   |
//! | [`path`]    | `find_path` (Dijkstra), `NavPath`, `PathStep`             |
//! | [`anchor`]  | `nearest_anchor`, `AnchorHit`, `EXACT_MATCH_EPS`          |
//! | [`compose`] | `compose_route`, `RouteResult`, `RouteKind`               |
//!
//! The graph is built once from merged geography data and then only read;
//! every query method is total and panic-free on well-formed ids.

pub mod anchor;
pub mod compose;
pub mod graph;
pub mod path;


pub use anchor::{AnchorHit, EXACT_MATCH_EPS};
pub use compose::{compose_route, RouteKind, RouteResult, OFF_ROAD_DETOUR};
pub use graph::{GraphStats, NavGraph, RouteInfo, MIN_EDGE_COST};
pub use path::{NavPath, PathStep};
