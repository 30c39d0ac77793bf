//! Step deadline queue.
//!
//! Each scheduled itinerary step gets a [`TimerToken`] minted when it is
//! pushed. The scheduler records the token in the agent's travel state; a
//! drained entry whose token no longer matches that record is stale (the
//! travel was cancelled or replaced) and is skipped. Cancellation therefore
//! never has to search the queue.

use std::collections::BTreeMap;

use wf_core::{AgentId, TimeMs};

/// Handle identifying one scheduled deadline. Monotonic per queue.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TimerToken(u64);

/// One agent waiting on a deadline.
#[derive(Copy, Clone, Debug)]
pub struct TimerEntry {
    pub agent: AgentId,
    pub token: TimerToken,
}

/// Deadline-ordered queue of pending step completions.
#[derive(Debug, Default)]
pub struct StepTimers {
    entries:    BTreeMap<TimeMs, Vec<TimerEntry>>,
    next_token: u64,
    total:      usize,
}

impl StepTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `agent` at `deadline` and return the minted token.
    pub fn push(&mut self, deadline: TimeMs, agent: AgentId) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.entries.entry(deadline).or_default().push(TimerEntry { agent, token });
        self.total += 1;
        token
    }

    /// Remove and return the earliest due deadline, or `None` if nothing is
    /// due at `now`. Deadlines are drained one at a time so callers see them
    /// in order even when several are overdue.
    pub fn pop_due(&mut self, now: TimeMs) -> Option<(TimeMs, Vec<TimerEntry>)> {
        let (&deadline, _) = self.entries.first_key_value()?;
        if deadline > now {
            return None;
        }
        let entries = self.entries.remove(&deadline)?;
        self.total -= entries.len();
        Some((deadline, entries))
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<TimeMs> {
        self.entries.keys().next().copied()
    }

    /// Pending entries across all deadlines, stale ones included.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Distinct pending deadlines.
    pub fn deadline_count(&self) -> usize {
        self.entries.len()
    }
}
