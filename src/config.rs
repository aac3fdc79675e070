//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default bound on transitions applied within a single tick.
pub const DEFAULT_MAX_TRANSITIONS_PER_TICK: usize = 32;

/// Default number of transitions kept in a machine's history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Tunables for a state machine engine.
///
/// Every field has a default, so a partial document is enough:
///
/// ```rust
/// use statesim::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "max_transitions_per_tick": 8 }"#).unwrap();
/// assert_eq!(config.max_transitions_per_tick, 8);
/// assert_eq!(config.history_capacity, 256);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Transitions allowed in one tick before the tick is aborted as a
    /// cyclic chain. Must be at least one.
    pub max_transitions_per_tick: usize,

    /// Applied transitions kept in the history; zero disables recording.
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_transitions_per_tick: DEFAULT_MAX_TRANSITIONS_PER_TICK,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MachineConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
