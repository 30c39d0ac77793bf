//! `wf-travel` — itineraries, travel scheduling, and position interpolation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`itinerary`] | `Itinerary` generation, step narration, `travel_time_ms`|
//! | [`scheduler`] | `TravelScheduler`: orders, polling, retargeting         |
//! | [`interp`]    | `StepWindow`, continuous mid-step positions             |
//! | `timers`      | internal deadline queue with stale-token cancellation   |
//!
//! # Model
//!
//! The scheduler is cooperative: the host owns the clock, passes `now` into
//! every call, and drives everything by polling. One poll drains all due
//! step deadlines in order, so a host that polls rarely still sees travels
//! advance through exact, gapless step windows.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | Derives on `Itinerary`, `ItineraryStep`, `TravelOrder`, and   |
//! |         | `TravelKind`, and propagates to embedded `wf-core` types.     |

pub mod interp;
pub mod itinerary;
pub mod scheduler;
mod timers;

#[cfg(test)]
mod tests;

pub use interp::{step_position, StepWindow};
pub use itinerary::{
    travel_time_ms, Itinerary, ItineraryStep, MIN_STEP_MS, MS_PER_KM, REST_DURATION_MS,
};
pub use scheduler::{
    Arrival, Retarget, TravelKind, TravelOrder, TravelProgress, TravelScheduler,
    PROXIMITY_THRESHOLD_KM,
};
