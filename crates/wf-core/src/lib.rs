//! `wf-core` — foundational types for the `wayfare` navigation framework.
//!
//! This crate is a dependency of every other `wf-*` crate.  It intentionally
//! has no `wf-*` dependencies and no required external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`, `RouteId`, `AgentId`                  |
//! | [`coords`] | `Coord`, `GEO_SCALE`, the shared km distance service      |
//! | [`time`]   | `TimeMs`, `GameClock`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.          |

pub mod coords;
pub mod ids;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coords::{distance_km, distance_sq_units, distance_units, Coord, GEO_SCALE};
pub use ids::{AgentId, EdgeId, NodeId, RouteId};
pub use time::{GameClock, TimeMs};
