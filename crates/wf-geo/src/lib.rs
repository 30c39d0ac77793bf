//! `wf-geo` — geography documents, multi-scale merging, and fallback data.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                      |
//! |-----------|---------------------------------------------------------------|
//! | [`model`] | Document schema: `GeographyData`, `Continent`, `GeoNode`,     |
//! |           | `RouteDef`, `Terrain`, `PlaceType`                            |
//! | [`store`] | `GeographyStore`: load + merge + fallback                     |
//! | [`error`] | `GeoError`, `GeoResult<T>`                                    |
//!
//! The schema types always derive serde; the JSON loader is core function,
//! not an opt-in.

pub mod error;
pub mod model;
pub mod store;


pub use error::{GeoError, GeoResult};
pub use model::{Bounds, Continent, GeoNode, GeographyData, PlaceType, RouteDef, Terrain};
pub use store::GeographyStore;
