//! Time-stepped state machine engine.

use crate::core::{State, StateHistory, StateTransition};
use crate::machine::transition::{TickError, Transition};
use chrono::Utc;
use std::collections::HashMap;
use std::time::Duration;

/// A transition with both ends resolved to state indices.
pub(crate) struct Rule<C> {
    pub(crate) transition: Transition<C>,
    pub(crate) from: usize,
    pub(crate) to: usize,
}

/// Parts validated by the builder.
pub(crate) struct MachineParts<C> {
    pub(crate) names: Vec<String>,
    pub(crate) states: Vec<Box<dyn State<C>>>,
    pub(crate) rules: Vec<Rule<C>>,
    pub(crate) initial: usize,
    pub(crate) max_transitions_per_tick: usize,
    pub(crate) history_capacity: usize,
}

/// State machine advanced by discrete ticks.
///
/// Owns the state table, the ordered transition rules and the current state.
/// The device context is passed in on every call, so the engine itself holds
/// no device knowledge. Construct it with
/// [`StateMachineBuilder`](crate::builder::StateMachineBuilder), which
/// guarantees every state name resolves.
///
/// The initial state's `on_entry` is not run at construction; it runs once,
/// with a zero `dt`, at the start of the first tick.
pub struct StateMachine<C> {
    names: Vec<String>,
    states: Vec<Box<dyn State<C>>>,
    index: HashMap<String, usize>,
    rules: Vec<Rule<C>>,
    current: usize,
    entered: bool,
    max_transitions_per_tick: usize,
    history: StateHistory,
    ticks: u64,
    elapsed: Duration,
}

impl<C> StateMachine<C> {
    pub(crate) fn from_parts(parts: MachineParts<C>) -> Self {
        let index = parts
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Self {
            names: parts.names,
            states: parts.states,
            index,
            rules: parts.rules,
            current: parts.initial,
            entered: false,
            max_transitions_per_tick: parts.max_transitions_per_tick,
            history: StateHistory::with_capacity(parts.history_capacity),
            ticks: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Name of the current state (pure)
    pub fn current_state(&self) -> &str {
        &self.names[self.current]
    }

    /// Names of all states, in the order they were defined.
    pub fn state_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Whether `name` is in the state table.
    pub fn has_state(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Ordered transition rules.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition<C>> + '_ {
        self.rules.iter().map(|r| &r.transition)
    }

    /// Get transition history (pure)
    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Ticks processed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated time processed so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn max_transitions_per_tick(&self) -> usize {
        self.max_transitions_per_tick
    }

    /// Whether a rule from the current state to `target` exists, regardless
    /// of its guard (pure).
    pub fn has_transition(&self, target: &str) -> bool {
        self.rules
            .iter()
            .any(|r| r.from == self.current && r.transition.to == target)
    }

    /// Whether a rule from the current state to `target` would fire right
    /// now (pure).
    ///
    /// Evaluates guards against `ctx` but never changes state, so callers
    /// can ask "is the device ready for this command?".
    pub fn can(&self, ctx: &C, target: &str) -> bool {
        self.rules.iter().any(|r| {
            r.from == self.current && r.transition.to == target && r.transition.guard_allows(ctx)
        })
    }

    /// Advance the machine by `dt`.
    ///
    /// Runs `in_state` on the current state, then applies the first rule
    /// whose source is the current state and whose guard holds, rescanning
    /// from the top after every applied rule. Chained transitions only run
    /// exit/entry hooks. Returns the number of transitions applied.
    ///
    /// Fails with [`TickError::TransitionOverflow`] when more than
    /// `max_transitions_per_tick` rules would fire; the machine stays in the
    /// state the chain had reached.
    pub fn tick(&mut self, ctx: &mut C, dt: Duration) -> Result<usize, TickError> {
        self.ticks += 1;
        self.elapsed = self.elapsed.saturating_add(dt);

        if !self.entered {
            self.entered = true;
            tracing::debug!(state = %self.current_state(), "Entering initial state");
            self.states[self.current].on_entry(ctx, Duration::ZERO);
        }

        tracing::trace!(state = %self.current_state(), dt = ?dt, tick = self.ticks, "Tick");
        self.states[self.current].in_state(ctx, dt);

        let mut applied = 0;
        while let Some(target) = self.next_target(ctx) {
            if applied == self.max_transitions_per_tick {
                tracing::warn!(
                    state = %self.current_state(),
                    limit = self.max_transitions_per_tick,
                    "Transition chain exceeded limit, aborting tick"
                );
                return Err(TickError::TransitionOverflow {
                    state: self.current_state().to_string(),
                    limit: self.max_transitions_per_tick,
                });
            }

            self.switch_to(ctx, target, dt);
            applied += 1;
        }

        Ok(applied)
    }

    /// First rule that fires from the current state (pure)
    fn next_target(&self, ctx: &C) -> Option<usize> {
        self.rules
            .iter()
            .find(|r| r.from == self.current && r.transition.guard_allows(ctx))
            .map(|r| r.to)
    }

    fn switch_to(&mut self, ctx: &mut C, target: usize, dt: Duration) {
        let from = self.current;

        self.states[from].on_exit(ctx, dt);
        self.current = target;
        self.states[target].on_entry(ctx, dt);

        tracing::debug!(
            from = %self.names[from],
            to = %self.names[target],
            tick = self.ticks,
            "State transition"
        );

        self.history.record(StateTransition {
            from: self.names[from].clone(),
            to: self.names[target].clone(),
            tick: self.ticks,
            sim_time: self.elapsed,
            timestamp: Utc::now(),
        });
    }
}

impl<C> std::fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_state())
            .field("states", &self.names)
            .field("transitions", &self.rules.len())
            .field("ticks", &self.ticks)
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::StateMachineBuilder;
    use crate::core::{Plain, State};
    use crate::machine::{TickError, Transition};
    use crate::MachineConfig;
    use std::time::Duration;

    #[derive(Default)]
    struct Log {
        events: Vec<String>,
        go: bool,
    }

    struct Traced(&'static str);

    impl State<Log> for Traced {
        fn on_entry(&mut self, ctx: &mut Log, dt: Duration) {
            ctx.events.push(format!("{}:entry({})", self.0, dt.as_secs()));
        }

        fn in_state(&mut self, ctx: &mut Log, dt: Duration) {
            ctx.events.push(format!("{}:in({})", self.0, dt.as_secs()));
        }

        fn on_exit(&mut self, ctx: &mut Log, dt: Duration) {
            ctx.events.push(format!("{}:exit({})", self.0, dt.as_secs()));
        }
    }

    fn chain() -> crate::machine::StateMachine<Log> {
        StateMachineBuilder::new()
            .initial("a")
            .state("a", Traced("a"))
            .state("b", Traced("b"))
            .state("c", Traced("c"))
            .transition(Transition::new("a", "b").when(|l: &Log| l.go))
            .transition(Transition::new("b", "c"))
            .build()
            .unwrap()
    }

    #[test]
    fn initial_entry_runs_once_on_first_tick() {
        let mut machine = chain();
        let mut log = Log::default();

        assert!(log.events.is_empty());

        machine.tick(&mut log, Duration::from_secs(1)).unwrap();
        machine.tick(&mut log, Duration::from_secs(1)).unwrap();

        assert_eq!(log.events, vec!["a:entry(0)", "a:in(1)", "a:in(1)"]);
    }

    #[test]
    fn chained_transitions_skip_in_state() {
        let mut machine = chain();
        let mut log = Log::default();
        machine.tick(&mut log, Duration::ZERO).unwrap();
        log.events.clear();
        log.go = true;

        let applied = machine.tick(&mut log, Duration::from_secs(2)).unwrap();

        assert_eq!(applied, 2);
        assert_eq!(machine.current_state(), "c");
        assert_eq!(
            log.events,
            vec![
                "a:in(2)",
                "a:exit(2)",
                "b:entry(2)",
                "b:exit(2)",
                "c:entry(2)",
            ]
        );
        assert_eq!(machine.history().path(), vec!["a", "b", "c"]);
    }

    #[test]
    fn first_matching_rule_wins() {
        let mut machine = StateMachineBuilder::new()
            .initial("start")
            .state("start", Plain)
            .state("left", Plain)
            .state("right", Plain)
            .transition(Transition::new("start", "left").when(|l: &Log| l.go))
            .transition(Transition::new("start", "right"))
            .build()
            .unwrap();

        let mut log = Log {
            go: true,
            ..Log::default()
        };
        machine.tick(&mut log, Duration::ZERO).unwrap();

        assert_eq!(machine.current_state(), "left");
    }

    #[test]
    fn rules_from_other_states_are_ignored() {
        let mut machine = StateMachineBuilder::new()
            .initial("start")
            .state("start", Plain)
            .state("elsewhere", Plain)
            .state("end", Plain)
            .transition(Transition::new("elsewhere", "end"))
            .build()
            .unwrap();

        let applied = machine.tick(&mut Log::default(), Duration::ZERO).unwrap();

        assert_eq!(applied, 0);
        assert_eq!(machine.current_state(), "start");
    }

    #[test]
    fn can_evaluates_guard_without_mutating() {
        let mut machine = chain();
        let mut log = Log::default();
        machine.tick(&mut log, Duration::ZERO).unwrap();

        assert!(!machine.can(&log, "b"));
        log.go = true;
        assert!(machine.can(&log, "b"));
        assert!(!machine.can(&log, "c"));
        assert!(!machine.can(&log, "missing"));
        assert_eq!(machine.current_state(), "a");
    }

    #[test]
    fn has_transition_ignores_guard() {
        let machine = chain();

        assert!(machine.has_transition("b"));
        assert!(!machine.has_transition("c"));
    }

    #[test]
    fn cyclic_chain_overflows() {
        let mut machine = StateMachineBuilder::new()
            .initial("ping")
            .state("ping", Plain)
            .state("pong", Plain)
            .transition(Transition::new("ping", "pong"))
            .transition(Transition::new("pong", "ping"))
            .config(MachineConfig {
                max_transitions_per_tick: 5,
                ..MachineConfig::default()
            })
            .build()
            .unwrap();

        let result = machine.tick(&mut Log::default(), Duration::ZERO);

        assert_eq!(
            result,
            Err(TickError::TransitionOverflow {
                state: "pong".to_string(),
                limit: 5,
            })
        );
        assert_eq!(machine.history().len(), 5);
    }

    #[test]
    fn chain_up_to_limit_is_allowed() {
        let mut machine = chain();
        let mut log = Log {
            go: true,
            ..Log::default()
        };

        let applied = machine.tick(&mut log, Duration::ZERO).unwrap();

        assert_eq!(applied, 2);
        assert!(applied <= machine.max_transitions_per_tick());
    }

    #[test]
    fn tick_counts_time() {
        let mut machine = chain();
        let mut log = Log::default();

        for _ in 0..3 {
            machine.tick(&mut log, Duration::from_millis(500)).unwrap();
        }

        assert_eq!(machine.ticks(), 3);
        assert_eq!(machine.elapsed(), Duration::from_millis(1500));
    }

    #[test]
    fn history_records_sim_time() {
        let mut machine = chain();
        let mut log = Log::default();
        machine.tick(&mut log, Duration::from_secs(3)).unwrap();
        log.go = true;
        machine.tick(&mut log, Duration::from_secs(4)).unwrap();

        let last = machine.history().last().unwrap();
        assert_eq!(last.tick, 2);
        assert_eq!(last.sim_time, Duration::from_secs(7));
        assert_eq!(last.to, "c");
    }

    #[test]
    fn elapsed_saturates_on_huge_dt() {
        let mut machine = chain();
        let mut log = Log::default();

        machine.tick(&mut log, Duration::MAX).unwrap();
        machine.tick(&mut log, Duration::MAX).unwrap();

        assert_eq!(machine.elapsed(), Duration::MAX);
        assert_eq!(machine.ticks(), 2);
    }
}
