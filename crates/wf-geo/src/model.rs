//! Geography document schema.
//!
//! # Document format
//!
//! One JSON document per scale level (a macro world file, then finer-grained
//! regional files).  All sections are optional; a micro document typically
//! carries only `nodes` and `routes`.
//!
//! ```json
//! {
//!   "continents": {
//!     "Eldaron": {
//!       "id": "eldaron",
//!       "name": "Eldaron",
//!       "bounds": { "x_min": 0.0, "x_max": 100.0, "y_min": 0.0, "y_max": 100.0 },
//!       "regions": ["Thornmere", "The Reaches"]
//!     }
//!   },
//!   "nodes": {
//!     "thornmere_inn": {
//!       "x": 12.5, "y": 40.0, "continent": "Eldaron",
//!       "type": "inn", "name": "The Thornmere Inn",
//!       "description": "A low-beamed waystop on the mere road."
//!     }
//!   },
//!   "routes": [
//!     { "id": "mere_road_1", "start": "thornmere_inn", "end": "mere_ford",
//!       "type": "road", "name": "Mere Road", "distance_km": 42.0 }
//!   ]
//! }
//! ```
//!
//! Maps are `BTreeMap` so iteration order (and therefore node interning
//! order downstream) is lexicographic by key — stable across runs and
//! rebuilds.  Unknown `type` strings fall back to the `Other` variant rather
//! than failing the document.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Serialize};

use wf_core::Coord;

use crate::error::{GeoError, GeoResult};

// ── Document root ─────────────────────────────────────────────────────────────

/// One parsed geography document (or the merged union of several).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GeographyData {
    #[serde(default)]
    pub continents: BTreeMap<String, Continent>,
    #[serde(default)]
    pub nodes:      BTreeMap<String, GeoNode>,
    #[serde(default)]
    pub routes:     Vec<RouteDef>,
}

impl GeographyData {
    /// Parse a single document from a JSON string.
    pub fn from_json_str(s: &str) -> GeoResult<Self> {
        serde_json::from_str(s).map_err(|e| GeoError::Parse(e.to_string()))
    }

    /// Like [`from_json_str`](Self::from_json_str) but accepts any `Read`
    /// source.
    pub fn from_json_reader<R: Read>(reader: R) -> GeoResult<Self> {
        serde_json::from_reader(reader).map_err(|e| GeoError::Parse(e.to_string()))
    }

    /// Read and parse one document file.
    pub fn from_json_file(path: &std::path::Path) -> GeoResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Built-in minimal dataset used when no geography documents load at
    /// all: one empty continent, no nodes, no routes.  Everything downstream
    /// degrades gracefully (no anchors, so every route composes as direct
    /// travel).
    pub fn fallback() -> Self {
        let mut continents = BTreeMap::new();
        continents.insert(
            "Eldaron".to_string(),
            Continent {
                id:      "eldaron".to_string(),
                name:    "Eldaron".to_string(),
                bounds:  Bounds { x_min: 0.0, x_max: 100.0, y_min: 0.0, y_max: 100.0 },
                regions: Vec::new(),
            },
        );
        Self { continents, nodes: BTreeMap::new(), routes: Vec::new() }
    }
}

// ── Continents ────────────────────────────────────────────────────────────────

/// A top-level landmass.  Consulted by hosts (spawn areas, map framing);
/// the navigation core itself matches continents by node string only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Continent {
    #[serde(default)]
    pub id:      String,
    pub name:    String,
    pub bounds:  Bounds,
    #[serde(default)]
    pub regions: Vec<String>,
}

/// Axis-aligned map-unit rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

// ── Nodes ─────────────────────────────────────────────────────────────────────

/// A named point of interest: settlement, waystop, crossing, landmark.
/// Keyed in [`GeographyData::nodes`] by a stable string id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeoNode {
    pub x: f64,
    pub y: f64,
    /// Continent key the node belongs to.  Anchor search restricts matches
    /// to this value (trimmed), so documents must agree on spelling.
    #[serde(default = "unknown_continent")]
    pub continent: String,
    #[serde(rename = "type", default)]
    pub place_type: PlaceType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl GeoNode {
    /// Position as a map-space coordinate.
    pub fn coords(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

fn unknown_continent() -> String {
    "Unknown".to_string()
}

/// What kind of place a node is.  Drives rest-stop insertion during
/// itinerary generation; unknown strings become [`PlaceType::Other`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    Inn,
    Tavern,
    Relay,
    Bivouac,
    Oasis,
    Refuge,
    Caravanserai,
    Station,
    Canteen,
    City,
    Village,
    Port,
    Capital,
    Fortress,
    Sanctuary,
    Ruin,
    Landmark,
    Crossing,
    Camp,
    Dungeon,
    #[default]
    #[serde(other)]
    Other,
}

impl PlaceType {
    /// `true` for places where a traveller can plausibly break the journey.
    /// Itinerary generation inserts a rest step after arriving at one of
    /// these, unless it is the final destination.
    pub fn is_rest_stop(self) -> bool {
        matches!(
            self,
            PlaceType::Inn
                | PlaceType::Tavern
                | PlaceType::Relay
                | PlaceType::Bivouac
                | PlaceType::Oasis
                | PlaceType::Refuge
                | PlaceType::Caravanserai
                | PlaceType::Station
                | PlaceType::Canteen
                | PlaceType::City
                | PlaceType::Village
                | PlaceType::Port
                | PlaceType::Capital
                | PlaceType::Fortress
                | PlaceType::Sanctuary
        )
    }

    /// Schema string for the variant, as it appears in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceType::Inn          => "inn",
            PlaceType::Tavern       => "tavern",
            PlaceType::Relay        => "relay",
            PlaceType::Bivouac      => "bivouac",
            PlaceType::Oasis        => "oasis",
            PlaceType::Refuge       => "refuge",
            PlaceType::Caravanserai => "caravanserai",
            PlaceType::Station      => "station",
            PlaceType::Canteen      => "canteen",
            PlaceType::City         => "city",
            PlaceType::Village      => "village",
            PlaceType::Port         => "port",
            PlaceType::Capital      => "capital",
            PlaceType::Fortress     => "fortress",
            PlaceType::Sanctuary    => "sanctuary",
            PlaceType::Ruin         => "ruin",
            PlaceType::Landmark     => "landmark",
            PlaceType::Crossing     => "crossing",
            PlaceType::Camp         => "camp",
            PlaceType::Dungeon      => "dungeon",
            PlaceType::Other        => "other",
        }
    }
}

impl std::fmt::Display for PlaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Routes ────────────────────────────────────────────────────────────────────

/// An undirected connection between two nodes.  The graph builder emits two
/// directed, equal-cost edges per route.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteDef {
    pub id:    String,
    /// Node key of one endpoint.
    pub start: String,
    /// Node key of the other endpoint.
    pub end:   String,
    #[serde(rename = "type", default)]
    pub terrain: Terrain,
    /// Display name, used in itinerary narration ("… via Mere Road").
    pub name: Option<String>,
    /// Authored length.  When absent, the Euclidean endpoint distance is
    /// used instead.
    pub distance_km: Option<f64>,
    /// Extra weighting for path-finding (tolls, danger, preference).
    /// Multiplies the route's cost, not its travel duration.
    pub cost_multiplier: Option<f64>,
}

/// The surface a route runs over, which sets its travel speed.
///
/// Multipliers above 1 are faster than walking and divide the base travel
/// duration; unknown strings become [`Terrain::Other`] at walking speed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Road,
    Path,
    ForestPath,
    MountainPath,
    SwampPath,
    Badlands,
    DesertPath,
    WildPath,
    Tunnel,
    Carriage,
    Boat,
    Sea,
    Sled,
    SandSkiff,
    Beetle,
    CableCar,
    Air,
    IceRoad,
    #[default]
    #[serde(other)]
    Other,
}

impl Terrain {
    /// Speed relative to walking pace.  Travel duration for a segment is
    /// `km × MS_PER_KM ÷ speed_multiplier`, floored at the minimum step.
    pub fn speed_multiplier(self) -> f64 {
        match self {
            Terrain::Road         => 1.0,
            Terrain::Path         => 0.8,
            Terrain::ForestPath   => 0.8,
            Terrain::MountainPath => 0.7,
            Terrain::SwampPath    => 0.6,
            Terrain::Badlands     => 0.6,
            Terrain::DesertPath   => 0.7,
            Terrain::WildPath     => 0.6,
            Terrain::Tunnel       => 0.8,
            Terrain::Carriage     => 2.5,
            Terrain::Boat         => 2.0,
            Terrain::Sea          => 3.0,
            Terrain::Sled         => 3.5,
            Terrain::SandSkiff    => 4.0,
            Terrain::Beetle       => 2.0,
            Terrain::CableCar     => 2.0,
            Terrain::Air          => 8.0,
            Terrain::IceRoad      => 1.2,
            Terrain::Other        => 1.0,
        }
    }

    /// Schema string for the variant, as it appears in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Terrain::Road         => "road",
            Terrain::Path         => "path",
            Terrain::ForestPath   => "forest_path",
            Terrain::MountainPath => "mountain_path",
            Terrain::SwampPath    => "swamp_path",
            Terrain::Badlands     => "badlands",
            Terrain::DesertPath   => "desert_path",
            Terrain::WildPath     => "wild_path",
            Terrain::Tunnel       => "tunnel",
            Terrain::Carriage     => "carriage",
            Terrain::Boat         => "boat",
            Terrain::Sea          => "sea",
            Terrain::Sled         => "sled",
            Terrain::SandSkiff    => "sand_skiff",
            Terrain::Beetle       => "beetle",
            Terrain::CableCar     => "cable_car",
            Terrain::Air          => "air",
            Terrain::IceRoad      => "ice_road",
            Terrain::Other        => "other",
        }
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
