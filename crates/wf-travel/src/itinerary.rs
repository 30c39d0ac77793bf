//! Itinerary generation.
//!
//! An [`Itinerary`] turns a composed route into an ordered list of timed
//! steps: one [`ItineraryStep::Travel`] per route segment, with an
//! [`ItineraryStep::Rest`] inserted after every intermediate stop that
//! offers shelter. Direct (off-network) routes collapse to a single
//! walking step. Step durations come from [`travel_time_ms`], which
//! converts distance to game time through the terrain speed multiplier.

use tracing::debug;

use wf_core::Coord;
use wf_geo::{PlaceType, Terrain};
use wf_graph::{NavGraph, RouteKind, RouteResult};

/// Milliseconds of game time per kilometre at the base walking speed.
pub const MS_PER_KM: f64 = 200.0;

/// Floor applied to every step duration, however short the leg.
pub const MIN_STEP_MS: u64 = 2_000;

/// Fixed length of a rest step.
pub const REST_DURATION_MS: u64 = 30_000;

/// Game-time cost of covering `km` at the given terrain speed multiplier.
///
/// Never returns less than [`MIN_STEP_MS`].
pub fn travel_time_ms(km: f64, speed_multiplier: f64) -> u64 {
    (km * MS_PER_KM / speed_multiplier).max(MIN_STEP_MS as f64).floor() as u64
}

// ── Steps ───────────────────────────────────────────────────────────────────

/// One timed leg of an itinerary.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItineraryStep {
    /// Movement from one point to another.
    Travel {
        /// Narrative line, e.g. `"Sails east via The Whale Road"`.
        desc:        String,
        from:        Coord,
        to:          Coord,
        km:          f64,
        duration_ms: u64,
        /// `None` for off-network travel.
        terrain:     Option<Terrain>,
    },
    /// A pause at a sheltered stop. Covers no distance.
    Rest {
        desc:        String,
        at:          Coord,
        duration_ms: u64,
    },
}

impl ItineraryStep {
    pub fn desc(&self) -> &str {
        match self {
            ItineraryStep::Travel { desc, .. } | ItineraryStep::Rest { desc, .. } => desc,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            ItineraryStep::Travel { duration_ms, .. } | ItineraryStep::Rest { duration_ms, .. } => {
                *duration_ms
            }
        }
    }

    /// Distance covered by this step. Zero for rests.
    pub fn km(&self) -> f64 {
        match self {
            ItineraryStep::Travel { km, .. } => *km,
            ItineraryStep::Rest { .. } => 0.0,
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, ItineraryStep::Rest { .. })
    }

    /// Where the step begins.
    pub fn start_coord(&self) -> Coord {
        match self {
            ItineraryStep::Travel { from, .. } => *from,
            ItineraryStep::Rest { at, .. } => *at,
        }
    }

    /// Where the step ends.
    pub fn end_coord(&self) -> Coord {
        match self {
            ItineraryStep::Travel { to, .. } => *to,
            ItineraryStep::Rest { at, .. } => *at,
        }
    }
}

// ── Itinerary ───────────────────────────────────────────────────────────────

/// An ordered plan of timed steps from one place to another.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Itinerary {
    steps: Vec<ItineraryStep>,
}

impl Itinerary {
    /// Build the itinerary for a composed route.
    ///
    /// Network routes yield one travel step per segment, narrated from the
    /// segment's terrain and heading, with a rest inserted after each
    /// intermediate stop where [`PlaceType::is_rest_stop`] holds. The final
    /// destination never gets a rest. Any other route collapses to a single
    /// walking step across open ground at the base speed.
    pub fn generate(graph: &NavGraph, route: &RouteResult) -> Itinerary {
        let mut steps = Vec::new();

        match (route.kind, &route.path) {
            (RouteKind::Network, Some(path)) => {
                let nodes = &path.steps;
                for i in 1..nodes.len() {
                    let prev = &nodes[i - 1];
                    let cur = &nodes[i];

                    let terrain = cur.inbound.map(|rid| graph.route(rid).terrain);
                    let speed = terrain.map_or(1.0, |t| t.speed_multiplier());
                    let name = cur.inbound.and_then(|rid| graph.route(rid).name.as_deref());

                    let heading = cardinal(prev.coords, cur.coords);
                    let desc = match name {
                        Some(name) => format!("{} {heading} via {name}", travel_verb(terrain)),
                        None => format!("{} {heading}", travel_verb(terrain)),
                    };
                    steps.push(ItineraryStep::Travel {
                        desc,
                        from: prev.coords,
                        to: cur.coords,
                        km: cur.segment_km,
                        duration_ms: travel_time_ms(cur.segment_km, speed),
                        terrain,
                    });

                    // Rests only at intermediate stops, never at the destination.
                    if i < nodes.len() - 1 {
                        let place = graph.node_place(cur.node);
                        if place.is_rest_stop() {
                            steps.push(ItineraryStep::Rest {
                                desc: format!("{} {}", rest_verb(place), graph.node_name(cur.node)),
                                at: cur.coords,
                                duration_ms: REST_DURATION_MS,
                            });
                        }
                    }
                }
            }
            _ => {
                let km = route.total_km;
                steps.push(ItineraryStep::Travel {
                    desc: format!("Walks {} through open country", cardinal(route.start, route.end)),
                    from: route.start,
                    to: route.end,
                    km,
                    duration_ms: travel_time_ms(km, 1.0),
                    terrain: None,
                });
            }
        }

        let itinerary = Itinerary { steps };
        debug!(
            steps = itinerary.len(),
            rests = itinerary.steps.iter().filter(|s| s.is_rest()).count(),
            total_km = itinerary.total_km(),
            total_ms = itinerary.total_duration_ms(),
            "itinerary generated"
        );
        itinerary
    }

    pub fn steps(&self) -> &[ItineraryStep] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&ItineraryStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total distance covered, in kilometres.
    pub fn total_km(&self) -> f64 {
        self.steps.iter().map(ItineraryStep::km).sum()
    }

    /// Total game time, in milliseconds.
    pub fn total_duration_ms(&self) -> u64 {
        self.steps.iter().map(ItineraryStep::duration_ms).sum()
    }
}

// ── Narration ───────────────────────────────────────────────────────────────

/// Verb for a travel step. Cable cars read as walks.
fn travel_verb(terrain: Option<Terrain>) -> &'static str {
    match terrain {
        Some(Terrain::Sea | Terrain::Boat) => "Sails",
        Some(Terrain::Air) => "Flies",
        Some(Terrain::MountainPath) => "Climbs",
        Some(Terrain::Tunnel) => "Delves",
        Some(Terrain::IceRoad | Terrain::Sled) => "Glides",
        Some(Terrain::SandSkiff) => "Skims",
        Some(Terrain::Carriage) => "Drives",
        Some(Terrain::Beetle) => "Rides",
        _ => "Walks",
    }
}

/// Verb phrase for a rest step, chosen from the stop's place type.
fn rest_verb(place: PlaceType) -> &'static str {
    match place {
        PlaceType::Tavern | PlaceType::Canteen => "Has a drink at",
        PlaceType::Bivouac | PlaceType::Refuge => "Makes camp at",
        PlaceType::City | PlaceType::Capital | PlaceType::Village => "Stops over in",
        PlaceType::Sanctuary => "Prays at",
        PlaceType::Station => "Changes mounts at",
        PlaceType::Caravanserai => "Resupplies at",
        _ => "Rests at",
    }
}

/// Dominant compass heading from one point to another.
///
/// The y axis grows southward, matching map pixel space.
fn cardinal(from: Coord, to: Coord) -> &'static str {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dy.abs() > dx.abs() {
        if dy > 0.0 { "south" } else { "north" }
    } else if dx > 0.0 {
        "east"
    } else {
        "west"
    }
}
