//! Agent registry.
//!
//! Records live in a dense `Vec` owned by the simulation root; the `AgentId`
//! value is the index.  Agents are never removed — death flips `is_alive` —
//! so ids stay valid for the lifetime of the store and can be held freely by
//! schedulers and hosts.

use rustc_hash::FxHashMap;

use wf_core::{AgentId, Coord};

// ── Status ────────────────────────────────────────────────────────────────────

/// What an agent is currently doing with its position.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentStatus {
    /// Stays where placed until ordered elsewhere.
    #[default]
    Fixed,
    /// Keeps station on a moving anchor; follower sweeps re-route it.
    Follow,
    /// A travel itinerary is in flight.
    Traveling,
}

impl AgentStatus {
    #[inline]
    pub fn is_traveling(self) -> bool {
        matches!(self, AgentStatus::Traveling)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Fixed     => "fixed",
            AgentStatus::Follow    => "follow",
            AgentStatus::Traveling => "traveling",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// One agent's world state, read whole by hosts every frame.
///
/// `coordinates` is the *logical* position (last committed step endpoint);
/// the continuous on-screen position during travel comes from the travel
/// scheduler's interpolator, not from here.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentRecord {
    pub name:        String,
    pub coordinates: Coord,
    pub continent:   String,
    /// Key of the place the agent is at (or bound for, once arrived).
    pub passage:     String,
    pub status:      AgentStatus,
    pub is_alive:    bool,
    pub is_active:   bool,
}

impl AgentRecord {
    /// A live, active, stationary agent at the given place.
    pub fn new(
        name: impl Into<String>,
        passage: impl Into<String>,
        coordinates: Coord,
        continent: impl Into<String>,
    ) -> Self {
        Self {
            name:        name.into(),
            coordinates,
            continent:   continent.into(),
            passage:     passage.into(),
            status:      AgentStatus::Fixed,
            is_alive:    true,
            is_active:   true,
        }
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Dense agent storage plus a name index.
///
/// Owned by the simulation root and passed `&mut` into scheduler calls;
/// there is no global registry anywhere.
#[derive(Debug, Default)]
pub struct AgentStore {
    records: Vec<AgentRecord>,
    by_name: FxHashMap<String, AgentId>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent and return its id (sequential from 0).
    ///
    /// Registering a name that already exists replaces that agent's record
    /// in place and returns the existing id, so hosts can re-seed a world
    /// without id churn.
    pub fn register(&mut self, record: AgentRecord) -> AgentId {
        if let Some(&id) = self.by_name.get(&record.name) {
            self.records[id.index()] = record;
            return id;
        }
        let id = AgentId(self.records.len() as u32);
        self.by_name.insert(record.name.clone(), id);
        self.records.push(record);
        id
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&AgentRecord> {
        self.records.get(agent.index())
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut AgentRecord> {
        self.records.get_mut(agent.index())
    }

    /// Resolve an agent name to its id.
    pub fn lookup(&self, name: &str) -> Option<AgentId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.records.len() as u32).map(AgentId)
    }

    /// Iterator over `(id, record)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &AgentRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (AgentId(i as u32), r))
    }
}
