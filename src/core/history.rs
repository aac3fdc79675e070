//! State transition history tracking.
//!
//! Records the transitions a state machine applies, keeping only the most
//! recent ones so a long-running simulation does not grow without bound.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single applied state transition.
///
/// # Example
///
/// ```rust
/// use statesim::core::StateTransition;
/// use chrono::Utc;
/// use std::time::Duration;
///
/// let transition = StateTransition {
///     from: "idle".to_string(),
///     to: "moving".to_string(),
///     tick: 1,
///     sim_time: Duration::from_secs(1),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to, "moving");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being transitioned from
    pub from: String,
    /// The state being transitioned to
    pub to: String,
    /// Tick number (1-based) in which the transition fired
    pub tick: u64,
    /// Simulated time elapsed when the transition fired
    pub sim_time: Duration,
    /// Wall-clock time when the transition fired
    pub timestamp: DateTime<Utc>,
}

/// Bounded, ordered history of state transitions.
///
/// Once `capacity` records are held, recording a new transition drops the
/// oldest one. A capacity of zero disables recording.
///
/// # Example
///
/// ```rust
/// use statesim::core::{StateHistory, StateTransition};
/// use chrono::Utc;
/// use std::time::Duration;
///
/// let mut history = StateHistory::with_capacity(8);
///
/// for (from, to) in [("unnamed", "happy"), ("happy", "unhappy")] {
///     history.record(StateTransition {
///         from: from.to_string(),
///         to: to.to_string(),
///         tick: 1,
///         sim_time: Duration::ZERO,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.path(), vec!["unnamed", "happy", "unhappy"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory {
    capacity: usize,
    transitions: VecDeque<StateTransition>,
}

impl Default for StateHistory {
    fn default() -> Self {
        Self::with_capacity(crate::config::DEFAULT_HISTORY_CAPACITY)
    }
}

impl StateHistory {
    /// Create an empty history holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity.min(64)),
        }
    }

    /// Record a transition, evicting the oldest record when full.
    pub fn record(&mut self, transition: StateTransition) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Maximum number of records kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Iterate over the held records, oldest first.
    pub fn transitions(&self) -> impl DoubleEndedIterator<Item = &StateTransition> + '_ {
        self.transitions.iter()
    }

    /// Most recent record, if any.
    pub fn last(&self) -> Option<&StateTransition> {
        self.transitions.back()
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest held record followed by the
    /// `to` state of every record.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from.as_str());
        }
        path.extend(self.transitions.iter().map(|t| t.to.as_str()));
        path
    }

    /// Simulated time between the oldest and newest held record.
    ///
    /// Returns `None` if there are no records.
    pub fn span(&self) -> Option<Duration> {
        let first = self.transitions.front()?;
        let last = self.transitions.back()?;
        Some(last.sim_time.saturating_sub(first.sim_time))
    }

    /// Remove all records, keeping the capacity.
    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
