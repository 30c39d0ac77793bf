//! Travel scheduling.
//!
//! [`TravelScheduler`] owns every in-flight itinerary and the deadline queue
//! that drives them. The model is single-threaded and cooperative: nothing
//! moves on its own, the host calls [`TravelScheduler::poll`] with the
//! current game time and due steps are advanced then. Every entry point
//! takes `now` explicitly so hosts control time (and tests pick arbitrary
//! instants).
//!
//! Step windows are gapless: step `n + 1` always opens at step `n`'s
//! recorded end, not at the instant the host happened to poll. An overdue
//! chain of steps is therefore caught up in a single poll without drift.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use wf_agent::{AgentStatus, AgentStore};
use wf_core::{distance_km, AgentId, Coord, TimeMs};
use wf_graph::{compose_route, NavGraph, RouteKind};

use crate::interp::{self, StepWindow};
use crate::itinerary::{Itinerary, ItineraryStep};
use crate::timers::{StepTimers, TimerToken};

/// Distance under which a retargeted follower snaps to the target instead
/// of travelling.
pub const PROXIMITY_THRESHOLD_KM: f64 = 0.5;

// ── Orders and outcomes ─────────────────────────────────────────────────────

/// What arrival means for the agent's subsequent status.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TravelKind {
    /// Keep tracking the destination after arrival (status `Follow`).
    Follow,
    /// Settle at the destination (status `Fixed`).
    Relocate,
}

/// A destination: the place key, where it is, and what arrival means.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TravelOrder {
    pub passage:   String,
    pub coords:    Coord,
    pub continent: String,
    pub kind:      TravelKind,
}

/// An agent that completed its itinerary during a poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arrival {
    pub agent:   AgentId,
    pub passage: String,
}

/// Outcome of a retarget request.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Retarget {
    /// A new follow itinerary is in flight.
    Started,
    /// Close enough; the agent was assigned to the target directly.
    Teleported,
    /// No way to get there; the agent stays fixed where it stood.
    Failed,
}

/// Snapshot of one agent's travel, for HUDs and host logic.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TravelProgress {
    pub step_index: usize,
    pub step_count: usize,
    /// Fraction of the current step elapsed, in `[0, 1]`.
    pub step_progress: f64,
    /// Ms until the current step's deadline; `0` once overdue.
    pub remaining_ms: u64,
    /// Whole-itinerary totals, fixed at departure.
    pub total_km: f64,
    pub total_ms: u64,
}

// ── State ───────────────────────────────────────────────────────────────────

/// Everything the scheduler tracks for one travelling agent.
#[derive(Debug)]
pub(crate) struct TravelState {
    pub(crate) itinerary:  Itinerary,
    pub(crate) step_index: usize,
    pub(crate) window:     StepWindow,
    pub(crate) order:      TravelOrder,
    pub(crate) total_km:   f64,
    pub(crate) total_ms:   u64,
    /// The only token the deadline queue may advance this travel with.
    pub(crate) timer:      TimerToken,
}

/// Owns all in-flight travels and their deadlines.
#[derive(Debug, Default)]
pub struct TravelScheduler {
    pub(crate) states: FxHashMap<AgentId, TravelState>,
    pub(crate) timers: StepTimers,
}

impl TravelScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Orders ──────────────────────────────────────────────────────────────

    /// Put `agent` on the road toward `order`.
    ///
    /// Any travel already in flight is detached first, so the new route
    /// starts from the agent's current interpolated position. Returns
    /// `false` without touching anything further if the agent is unknown,
    /// and `false` with the agent left fixed at that position if the
    /// destination is unreachable.
    pub fn start_travel(
        &mut self,
        agents: &mut AgentStore,
        graph: &NavGraph,
        agent: AgentId,
        order: TravelOrder,
        now: TimeMs,
    ) -> bool {
        if agents.get(agent).is_none() {
            warn!(%agent, "travel order for unknown agent");
            return false;
        }
        self.interrupt(agents, agent, now);

        let Some(record) = agents.get_mut(agent) else {
            return false;
        };
        let route = compose_route(
            graph,
            record.coordinates,
            order.coords,
            &record.continent,
            &order.continent,
        );
        if route.kind == RouteKind::Unreachable {
            warn!(agent = %record.name, to = %order.passage, "destination unreachable, travel refused");
            return false;
        }

        let itinerary = Itinerary::generate(graph, &route);
        let total_km = itinerary.total_km();
        let total_ms = itinerary.total_duration_ms();

        record.status = AgentStatus::Traveling;
        if let Some(first) = itinerary.get(0) {
            record.coordinates = first.start_coord();
        }
        info!(
            agent = %record.name,
            to = %order.passage,
            steps = itinerary.len(),
            total_km,
            total_ms,
            "travel started"
        );

        // An empty itinerary (departure and destination share an anchor)
        // gets a deadline of `now` and completes on the next poll.
        let end = now.offset(itinerary.get(0).map_or(0, ItineraryStep::duration_ms));
        let timer = self.timers.push(end, agent);
        self.states.insert(
            agent,
            TravelState {
                itinerary,
                step_index: 0,
                window: StepWindow { start: now, end },
                order,
                total_km,
                total_ms,
                timer,
            },
        );
        true
    }

    /// Stop `agent` where it stands.
    ///
    /// The agent is left `Fixed` at its interpolated position. Returns
    /// `true` only if a travel was actually in flight; calling again is a
    /// no-op.
    pub fn cancel(&mut self, agents: &mut AgentStore, agent: AgentId, now: TimeMs) -> bool {
        if agents.get(agent).is_none() {
            return false;
        }
        let had_travel = self.interrupt(agents, agent, now);
        if let Some(record) = agents.get_mut(agent) {
            record.status = AgentStatus::Fixed;
            if had_travel {
                debug!(agent = %record.name, at = %record.coordinates, "travel cancelled");
            }
        }
        had_travel
    }

    /// Redirect `agent` toward a (possibly moved) follow target.
    ///
    /// Progress on any current travel is committed first, so the distance
    /// check runs from where the agent really is. Within
    /// [`PROXIMITY_THRESHOLD_KM`] the agent is assigned to the target
    /// outright; further away a fresh [`TravelKind::Follow`] itinerary
    /// starts. `Failed` leaves the agent fixed at the committed position.
    #[allow(clippy::too_many_arguments)]
    pub fn retarget(
        &mut self,
        agents: &mut AgentStore,
        graph: &NavGraph,
        agent: AgentId,
        passage: &str,
        coords: Coord,
        continent: &str,
        now: TimeMs,
    ) -> Retarget {
        if agents.get(agent).is_none() {
            return Retarget::Failed;
        }
        self.interrupt(agents, agent, now);

        let Some(record) = agents.get_mut(agent) else {
            return Retarget::Failed;
        };
        let km = distance_km(record.coordinates, coords);
        if km <= PROXIMITY_THRESHOLD_KM {
            record.passage = passage.to_string();
            record.coordinates = coords;
            record.continent = continent.to_string();
            record.status = AgentStatus::Follow;
            debug!(agent = %record.name, %passage, km, "close enough, snapped to target");
            return Retarget::Teleported;
        }
        debug!(agent = %record.name, %passage, km, "target moved, following");

        let order = TravelOrder {
            passage:   passage.to_string(),
            coords,
            continent: continent.to_string(),
            kind:      TravelKind::Follow,
        };
        if self.start_travel(agents, graph, agent, order, now) {
            Retarget::Started
        } else {
            if let Some(record) = agents.get_mut(agent) {
                record.status = AgentStatus::Fixed;
            }
            Retarget::Failed
        }
    }

    /// Redirect every live, active follower of `passage` to its new
    /// location. Covers agents idling in `Follow` status and agents already
    /// travelling under a follow order; idle followers standing at the
    /// target are left alone. Returns one outcome per affected agent.
    pub fn retarget_followers(
        &mut self,
        agents: &mut AgentStore,
        graph: &NavGraph,
        passage: &str,
        coords: Coord,
        continent: &str,
        now: TimeMs,
    ) -> Vec<(AgentId, Retarget)> {
        let followers: Vec<AgentId> = agents
            .iter()
            .filter(|&(id, record)| {
                if !record.is_alive || !record.is_active {
                    return false;
                }
                let follows = match record.status {
                    AgentStatus::Follow => true,
                    AgentStatus::Traveling => self
                        .states
                        .get(&id)
                        .is_some_and(|s| s.order.kind == TravelKind::Follow),
                    AgentStatus::Fixed => false,
                };
                // Idle followers already at the target stay put.
                follows && !(record.passage == passage && !self.states.contains_key(&id))
            })
            .map(|(id, _)| id)
            .collect();

        if !followers.is_empty() {
            debug!(count = followers.len(), %passage, "retargeting followers");
        }
        followers
            .into_iter()
            .map(|id| (id, self.retarget(agents, graph, id, passage, coords, continent, now)))
            .collect()
    }

    // ── Polling ─────────────────────────────────────────────────────────────

    /// Advance every travel whose deadline has passed, in deadline order,
    /// and return the agents that arrived.
    ///
    /// Entries whose token no longer matches the agent's travel state are
    /// stale (cancelled or replaced travels) and are dropped silently. A
    /// step advanced here may itself already be overdue; its deadline lands
    /// back in the queue and is drained within the same call.
    pub fn poll(&mut self, agents: &mut AgentStore, now: TimeMs) -> Vec<Arrival> {
        let mut arrivals = Vec::new();
        while let Some((_, entries)) = self.timers.pop_due(now) {
            for entry in entries {
                let live = self
                    .states
                    .get(&entry.agent)
                    .is_some_and(|s| s.timer == entry.token);
                if !live {
                    continue;
                }
                self.advance(agents, entry.agent, &mut arrivals);
            }
        }
        arrivals
    }

    /// Earliest pending step deadline, for hosts that sleep between polls.
    pub fn next_deadline(&self) -> Option<TimeMs> {
        self.timers.next_deadline()
    }

    // ── Inspection ──────────────────────────────────────────────────────────

    pub fn is_traveling(&self, agent: AgentId) -> bool {
        self.states.contains_key(&agent)
    }

    /// The step `agent` is currently on, if travelling.
    pub fn current_step(&self, agent: AgentId) -> Option<&ItineraryStep> {
        let state = self.states.get(&agent)?;
        state.itinerary.get(state.step_index)
    }

    /// Where `agent` is headed, if travelling.
    pub fn destination(&self, agent: AgentId) -> Option<&TravelOrder> {
        self.states.get(&agent).map(|s| &s.order)
    }

    pub fn progress(&self, agent: AgentId, now: TimeMs) -> Option<TravelProgress> {
        let state = self.states.get(&agent)?;
        Some(TravelProgress {
            step_index:    state.step_index,
            step_count:    state.itinerary.len(),
            step_progress: state.window.progress(now),
            remaining_ms:  state.window.end.since(now),
            total_km:      state.total_km,
            total_ms:      state.total_ms,
        })
    }

    /// Continuous position of `agent` at `now`: the interpolated point of
    /// the current step while travelling, the record coordinates otherwise.
    /// `None` only for unknown agents.
    pub fn position(&self, agents: &AgentStore, agent: AgentId, now: TimeMs) -> Option<Coord> {
        let record = agents.get(agent)?;
        if let Some(state) = self.states.get(&agent) {
            if let Some(step) = state.itinerary.get(state.step_index) {
                return Some(interp::step_position(step, state.window, now));
            }
        }
        Some(record.coordinates)
    }

    // ── Internals ───────────────────────────────────────────────────────────

    /// Detach any in-flight travel: commit the interpolated position and
    /// mark the agent fixed. The queue entry stays behind; with the state
    /// gone its token can never match, so the drain skips it.
    fn interrupt(&mut self, agents: &mut AgentStore, agent: AgentId, now: TimeMs) -> bool {
        let Some(state) = self.states.remove(&agent) else {
            return false;
        };
        if let Some(record) = agents.get_mut(agent) {
            if let Some(step) = state.itinerary.get(state.step_index) {
                record.coordinates = interp::step_position(step, state.window, now);
            }
            record.status = AgentStatus::Fixed;
        }
        true
    }

    /// Move one travel past its due step: commit the step endpoint, then
    /// either open the next step's window or complete the travel.
    fn advance(&mut self, agents: &mut AgentStore, agent: AgentId, arrivals: &mut Vec<Arrival>) {
        let mut completed = false;
        if let Some(state) = self.states.get_mut(&agent) {
            if let Some(step) = state.itinerary.get(state.step_index) {
                let end = step.end_coord();
                if let Some(record) = agents.get_mut(agent) {
                    record.coordinates = end;
                }
            }
            let next = state.step_index + 1;
            if next >= state.itinerary.len() {
                completed = true;
            } else if let Some(step) = state.itinerary.get(next) {
                // Gapless: the next window opens where this one closed,
                // regardless of when the host polled.
                let start = state.window.end;
                let end = start.offset(step.duration_ms());
                let from = step.start_coord();
                state.step_index = next;
                state.window = StepWindow { start, end };
                state.timer = self.timers.push(end, agent);
                if let Some(record) = agents.get_mut(agent) {
                    record.coordinates = from;
                }
                debug!(%agent, step = next, deadline = %end, "travel step advanced");
            }
        }
        if completed {
            self.complete(agents, agent, arrivals);
        }
    }

    /// Commit the destination onto the agent record and report the arrival.
    fn complete(&mut self, agents: &mut AgentStore, agent: AgentId, arrivals: &mut Vec<Arrival>) {
        let Some(state) = self.states.remove(&agent) else {
            return;
        };
        let TravelOrder { passage, coords, continent, kind } = state.order;
        if let Some(record) = agents.get_mut(agent) {
            record.coordinates = coords;
            record.continent = continent;
            record.passage = passage.clone();
            record.status = match kind {
                TravelKind::Follow => AgentStatus::Follow,
                TravelKind::Relocate => AgentStatus::Fixed,
            };
            info!(agent = %record.name, passage = %record.passage, status = %record.status, "travel completed");
        }
        arrivals.push(Arrival { agent, passage });
    }
}
