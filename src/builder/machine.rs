//! Builder for constructing state machines.

use crate::builder::error::{BuildError, ConfigIssue};
use crate::builder::validate::{check, collect, Check};
use crate::config::MachineConfig;
use crate::core::State;
use crate::machine::engine::{MachineParts, Rule};
use crate::machine::{StateMachine, Transition};
use std::collections::{HashMap, HashSet};

/// Builder for constructing state machines with a fluent API.
///
/// `build` validates the whole table in one pass and reports every problem
/// it finds, so a misconfigured device fails at construction rather than on
/// its first tick.
///
/// # Example
///
/// ```rust
/// use statesim::builder::StateMachineBuilder;
/// use statesim::core::Plain;
/// use statesim::machine::Transition;
///
/// struct Switch {
///     on: bool,
/// }
///
/// let machine = StateMachineBuilder::new()
///     .initial("off")
///     .state("off", Plain)
///     .state("on", Plain)
///     .transition(Transition::new("off", "on").when(|s: &Switch| s.on))
///     .transition(Transition::new("on", "off").when(|s: &Switch| !s.on))
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_state(), "off");
/// ```
pub struct StateMachineBuilder<C> {
    initial: Option<String>,
    states: Vec<(String, Box<dyn State<C>>)>,
    transitions: Vec<Transition<C>>,
    config: MachineConfig,
}

impl<C> StateMachineBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            states: Vec::new(),
            transitions: Vec::new(),
            config: MachineConfig::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add a named state.
    pub fn state<S>(self, name: impl Into<String>, state: S) -> Self
    where
        S: State<C> + 'static,
    {
        self.boxed_state(name, Box::new(state))
    }

    /// Add an already boxed state.
    pub fn boxed_state(mut self, name: impl Into<String>, state: Box<dyn State<C>>) -> Self {
        self.states.push((name.into(), state));
        self
    }

    /// Append a transition rule. Rules are evaluated in insertion order.
    pub fn transition(mut self, transition: Transition<C>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Append multiple transition rules at once.
    pub fn transitions(mut self, transitions: Vec<Transition<C>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Replace the engine configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the state machine.
    /// Returns an error if required fields are missing or any name fails to
    /// resolve.
    pub fn build(self) -> Result<StateMachine<C>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        let mut checks: Vec<Check> = Vec::new();
        let mut index = HashMap::with_capacity(self.states.len());
        let mut reported = HashSet::new();

        for (i, (name, _)) in self.states.iter().enumerate() {
            if index.contains_key(name.as_str()) {
                if reported.insert(name.as_str()) {
                    checks.push(check(false, || ConfigIssue::DuplicateState {
                        name: name.clone(),
                    }));
                }
            } else {
                index.insert(name.as_str(), i);
            }
        }

        checks.push(check(index.contains_key(initial.as_str()), || {
            ConfigIssue::UnknownInitialState {
                name: initial.clone(),
            }
        }));

        for transition in &self.transitions {
            checks.push(check(index.contains_key(transition.from.as_str()), || {
                ConfigIssue::UnknownTransitionSource {
                    from: transition.from.clone(),
                    to: transition.to.clone(),
                }
            }));
            checks.push(check(index.contains_key(transition.to.as_str()), || {
                ConfigIssue::UnknownTransitionTarget {
                    from: transition.from.clone(),
                    to: transition.to.clone(),
                }
            }));
        }

        checks.push(check(self.config.max_transitions_per_tick > 0, || {
            ConfigIssue::ZeroTransitionLimit
        }));

        collect(checks)?;

        let initial = index[initial.as_str()];
        let rules = self
            .transitions
            .into_iter()
            .map(|transition| Rule {
                from: index[transition.from.as_str()],
                to: index[transition.to.as_str()],
                transition,
            })
            .collect::<Vec<_>>();

        let (names, states) = self.states.into_iter().unzip();

        Ok(StateMachine::from_parts(MachineParts {
            names,
            states,
            rules,
            initial,
            max_transitions_per_tick: self.config.max_transitions_per_tick,
            history_capacity: self.config.history_capacity,
        }))
    }
}

impl<C> Default for StateMachineBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
