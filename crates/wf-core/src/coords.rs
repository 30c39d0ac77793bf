//! Map-space coordinates and the shared distance service.
//!
//! # One scale, everywhere
//!
//! World geography lives in abstract map units; travel math works in
//! kilometres.  [`GEO_SCALE`] is the single conversion constant, and
//! [`distance_km`] is the one function every subsystem uses for it —
//! anchor walk distances, off-network fallbacks and proximity checks all
//! share the same scale conversion, so no two components can disagree about
//! how far apart two points are.

/// Kilometres represented by one map coordinate unit.
pub const GEO_SCALE: f64 = 10.0;

/// A 2-D map-space position stored as double-precision floats.
///
/// The y axis grows southward (screen convention), which is why direction
/// naming treats positive `dy` as "south".
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation from `self` toward `other`.
    ///
    /// `t` is expected in `[0, 1]`; callers clamp before invoking so a step's
    /// interpolated position can never overshoot its endpoints.
    #[inline]
    pub fn lerp(self, other: Coord, t: f64) -> Coord {
        Coord {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Squared Euclidean distance in map units.
///
/// Cheaper than [`distance_units`] for comparisons (nearest-anchor search,
/// exact-match epsilon tests) where the actual magnitude is not needed.
#[inline]
pub fn distance_sq_units(a: Coord, b: Coord) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Euclidean distance in map units.
#[inline]
pub fn distance_units(a: Coord, b: Coord) -> f64 {
    distance_sq_units(a, b).sqrt()
}

/// Euclidean distance in kilometres: map-unit distance × [`GEO_SCALE`].
#[inline]
pub fn distance_km(a: Coord, b: Coord) -> f64 {
    distance_units(a, b) * GEO_SCALE
}
