//! Virtual pet that has to be fed, put to bed, washed and played with.
//!
//! ```text
//!  unnamed ──▶ happy ⇄ unhappy ──▶ dying ──▶ dead
//!                │        │          │
//!                └────────┴──────────┴──▶ action_received
//!                                             │
//!                      eating | sleeping | cleaning | playing
//!                                             │
//!                                      action_completed ──▶ happy | dying | unhappy
//! ```
//!
//! `action_received` and `action_completed` are waypoints the pet passes
//! through within a single tick; externally both read as `busy`.

use crate::builder::{BuildError, ConfigIssue, StateMachineBuilder};
use crate::config::MachineConfig;
use crate::core::Plain;
use crate::device::{Device, SimulatedDevice};
use crate::machine::{StateMachine, TickError};
use crate::states::{
    Accessor, ActionSlot, Attributes, Decay, DecayConfig, DecayWithTimeout, Mortal, TimedAction,
    ATTRIBUTE_MAX, ATTRIBUTE_MIN,
};
use crate::transitions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const UNNAMED: &str = "unnamed";
pub const HAPPY: &str = "happy";
pub const UNHAPPY: &str = "unhappy";
pub const ACTION_RECEIVED: &str = "action_received";
pub const ACTION_COMPLETED: &str = "action_completed";
pub const EATING: &str = "eating";
pub const SLEEPING: &str = "sleeping";
pub const CLEANING: &str = "cleaning";
pub const PLAYING: &str = "playing";
pub const DYING: &str = "dying";
pub const DEAD: &str = "dead";

/// Status reported for the instantaneous waypoint states.
pub const BUSY: &str = "busy";

/// Name reported before the pet has been named.
pub const NAME_PLACEHOLDER: &str = "None yet!";

/// Map a raw state name to the status shown to the outside world.
pub fn status_for(state: &str) -> &str {
    match state {
        ACTION_RECEIVED | ACTION_COMPLETED => BUSY,
        other => other,
    }
}

fn clamp(value: f64) -> f64 {
    value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX)
}

/// Something the pet can be asked to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PetAction {
    Eat,
    Sleep,
    Clean,
    Play,
}

impl PetAction {
    /// External command names, indexed as the enumerated `action` variable.
    /// Index 0 means "no action".
    pub const COMMANDS: [&'static str; 5] = ["none", "feed", "tuck_in", "wash", "play"];

    /// Action for an external command index; `None` for 0 or out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            1 => Some(Self::Eat),
            2 => Some(Self::Sleep),
            3 => Some(Self::Clean),
            4 => Some(Self::Play),
            _ => None,
        }
    }

    /// External command index of this action.
    pub fn index(self) -> usize {
        match self {
            Self::Eat => 1,
            Self::Sleep => 2,
            Self::Clean => 3,
            Self::Play => 4,
        }
    }

    /// State the pet is in while performing this action.
    pub fn state(self) -> &'static str {
        match self {
            Self::Eat => EATING,
            Self::Sleep => SLEEPING,
            Self::Clean => CLEANING,
            Self::Play => PLAYING,
        }
    }

    /// Effect on the pet once the action is finished.
    pub fn apply(self, pet: &mut PetContext) {
        match self {
            Self::Eat => {
                pet.energy = clamp(pet.energy + 25.0);
                pet.clean = clamp(pet.clean - 5.0);
                pet.tired = clamp(pet.tired + 5.0);
            }
            Self::Sleep => {
                pet.tired = clamp(pet.tired - 75.0);
                pet.energy = clamp(pet.energy - 5.0);
                pet.clean = clamp(pet.clean - 5.0);
            }
            Self::Clean => {
                pet.clean = clamp(pet.clean + 45.0);
                pet.tired = clamp(pet.tired + 10.0);
                pet.bored = clamp(pet.bored + 5.0);
            }
            Self::Play => {
                pet.bored = clamp(pet.bored - 30.0);
                pet.energy = clamp(pet.energy - 25.0);
                pet.tired = clamp(pet.tired + 15.0);
                pet.clean = clamp(pet.clean - 15.0);
            }
        }
    }
}

/// Attributes of a pet. All levels range over `[0, 100]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PetContext {
    pub energy: f64,
    pub tired: f64,
    pub bored: f64,
    pub clean: f64,
    /// Age in months.
    pub age: f64,
    name: Option<String>,
    action: Option<PetAction>,
    dead: bool,
}

impl Default for PetContext {
    fn default() -> Self {
        Self {
            energy: 100.0,
            tired: 0.0,
            bored: 0.0,
            clean: 100.0,
            age: 0.0,
            name: None,
            action: None,
            dead: false,
        }
    }
}

impl PetContext {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Action requested but not yet completed.
    pub fn pending_action(&self) -> Option<PetAction> {
        self.action
    }

    pub fn is_happy(&self) -> bool {
        self.energy > 35.0 && self.clean > 25.0 && self.tired < 80.0 && self.bored < 75.0
    }

    pub fn is_dying(&self) -> bool {
        self.energy < 5.0 || self.clean < 5.0 || self.tired > 95.0
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }
}

impl ActionSlot for PetContext {
    fn clear_action(&mut self) {
        self.action = None;
    }
}

impl Mortal for PetContext {
    fn set_dead(&mut self) {
        self.dead = true;
        self.energy = ATTRIBUTE_MIN;
        self.tired = ATTRIBUTE_MAX;
        self.bored = ATTRIBUTE_MAX;
        self.clean = ATTRIBUTE_MIN;
    }
}

impl Attributes for PetContext {
    fn accessor(name: &str) -> Option<Accessor<Self>> {
        let accessor: Accessor<Self> = match name {
            "energy" => Accessor {
                get: |p| p.energy,
                set: |p, v| p.energy = v,
            },
            "tired" => Accessor {
                get: |p| p.tired,
                set: |p, v| p.tired = v,
            },
            "bored" => Accessor {
                get: |p| p.bored,
                set: |p, v| p.bored = v,
            },
            "clean" => Accessor {
                get: |p| p.clean,
                set: |p, v| p.clean = v,
            },
            "age" => Accessor {
                get: |p| p.age,
                set: |p, v| p.age = v,
            },
            _ => return None,
        };
        Some(accessor)
    }

    fn add_age(&mut self, delta: f64) {
        self.age += delta;
    }
}

/// Rates and timings of a pet.
///
/// `Default` gives the standard pet; any field may be overridden from JSON:
///
/// ```rust
/// use statesim::devices::PetConfig;
///
/// let config = PetConfig::from_json(r#"{ "action_seconds": 2.5 }"#).unwrap();
/// assert_eq!(config.action_seconds, 2.5);
/// assert_eq!(config.dying_timeout_seconds, 120.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    /// How long eating, sleeping, cleaning and playing take.
    pub action_seconds: f64,
    pub happy: DecayConfig,
    pub unhappy: DecayConfig,
    pub dying: DecayConfig,
    /// Time spent dying before the pet is dead.
    pub dying_timeout_seconds: f64,
    pub machine: MachineConfig,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            action_seconds: 5.0,
            happy: DecayConfig::new(0.01)
                .rate("bored", 0.1)
                .rate("tired", 0.05)
                .rate("energy", -0.05)
                .rate("clean", -0.1),
            unhappy: DecayConfig::new(0.01)
                .rate("bored", 0.05)
                .rate("tired", 0.1)
                .rate("energy", -0.1)
                .rate("clean", -0.1),
            dying: DecayConfig::new(0.01)
                .rate("bored", 0.01)
                .rate("tired", 0.01)
                .rate("energy", -0.01)
                .rate("clean", -0.01),
            dying_timeout_seconds: 120.0,
            machine: MachineConfig::default(),
        }
    }
}

impl PetConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration, BuildError> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        BuildError::Invalid(vec![ConfigIssue::InvalidDuration {
            name: name.to_string(),
            seconds: value,
        }])
    })
}

fn timed(duration: Duration, action: PetAction) -> TimedAction<PetContext> {
    TimedAction::new(duration, move |pet: &mut PetContext| action.apply(pet))
}

/// Simulated pet. Keep it happy or it dies after a while.
///
/// # Example
///
/// ```rust
/// use statesim::devices::Pet;
/// use std::time::Duration;
///
/// let mut pet = Pet::new().unwrap();
/// pet.set_name("Rex");
/// pet.tick(Duration::from_secs(1)).unwrap();
/// assert_eq!(pet.status(), "happy");
///
/// assert!(pet.feed());
/// pet.tick(Duration::from_secs(1)).unwrap();
/// assert_eq!(pet.status(), "eating");
///
/// assert!(!pet.play());
/// ```
#[derive(Debug)]
pub struct Pet {
    device: SimulatedDevice<PetContext>,
}

impl Pet {
    pub fn new() -> Result<Self, BuildError> {
        Self::with_config(&PetConfig::default())
    }

    pub fn with_config(config: &PetConfig) -> Result<Self, BuildError> {
        let action = seconds("action_seconds", config.action_seconds)?;
        let dying_timeout = seconds("dying_timeout_seconds", config.dying_timeout_seconds)?;

        let machine = StateMachineBuilder::<PetContext>::new()
            .initial(UNNAMED)
            .state(UNNAMED, Plain)
            .state(HAPPY, Decay::new(&config.happy)?)
            .state(UNHAPPY, Decay::new(&config.unhappy)?)
            .state(ACTION_RECEIVED, Plain)
            .state(ACTION_COMPLETED, Plain)
            .state(EATING, timed(action, PetAction::Eat))
            .state(SLEEPING, timed(action, PetAction::Sleep))
            .state(CLEANING, timed(action, PetAction::Clean))
            .state(PLAYING, timed(action, PetAction::Play))
            .state(DYING, DecayWithTimeout::from_config(&config.dying, dying_timeout)?)
            .state(DEAD, Plain)
            .transitions(transitions![PetContext;
                "unnamed" => "happy" if |p| p.name.is_some(),

                "happy" => "action_received" if |p| p.action.is_some(),
                "unhappy" => "action_received" if |p| p.action.is_some(),
                "dying" => "action_received" if |p| p.action.is_some(),

                "action_received" => "eating" if |p| p.action == Some(PetAction::Eat),
                "action_received" => "sleeping" if |p| p.action == Some(PetAction::Sleep),
                "action_received" => "cleaning" if |p| p.action == Some(PetAction::Clean),
                "action_received" => "playing" if |p| p.action == Some(PetAction::Play),

                "eating" => "action_completed" if |p| p.action.is_none(),
                "sleeping" => "action_completed" if |p| p.action.is_none(),
                "cleaning" => "action_completed" if |p| p.action.is_none(),
                "playing" => "action_completed" if |p| p.action.is_none(),

                "action_completed" => "happy" if |p| p.is_happy(),
                "action_completed" => "dying" if |p| p.is_dying(),
                "action_completed" => "unhappy" if |p| !p.is_happy(),

                "happy" => "unhappy" if |p| !p.is_happy(),
                "unhappy" => "happy" if |p| p.is_happy(),
                "unhappy" => "dying" if |p| p.is_dying(),

                "dying" => "dead" if |p| p.is_dead(),
            ])
            .config(config.machine.clone())
            .build()?;

        Ok(Self {
            device: SimulatedDevice::new(machine, PetContext::default()),
        })
    }

    pub fn tick(&mut self, dt: Duration) -> Result<usize, TickError> {
        self.device.tick(dt)
    }

    /// Raw state of the underlying machine.
    pub fn state(&self) -> &str {
        self.device.state()
    }

    /// What the pet is doing, with the waypoint states collapsed to `busy`.
    pub fn status(&self) -> &str {
        status_for(self.device.state())
    }

    pub fn context(&self) -> &PetContext {
        self.device.context()
    }

    pub fn machine(&self) -> &StateMachine<PetContext> {
        self.device.machine()
    }

    pub fn energy(&self) -> f64 {
        self.context().energy
    }

    pub fn tired(&self) -> f64 {
        self.context().tired
    }

    pub fn bored(&self) -> f64 {
        self.context().bored
    }

    pub fn clean(&self) -> f64 {
        self.context().clean
    }

    pub fn age(&self) -> f64 {
        self.context().age
    }

    pub fn name(&self) -> Option<&str> {
        self.context().name()
    }

    /// Name for display, with a placeholder until the pet is named.
    pub fn name_or_placeholder(&self) -> &str {
        self.name().unwrap_or(NAME_PLACEHOLDER)
    }

    pub fn pending_action(&self) -> Option<PetAction> {
        self.context().pending_action()
    }

    /// Name the pet. Only possible before the simulation has started it.
    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        if self.state() != UNNAMED {
            tracing::debug!(state = %self.state(), "Ignoring rename of a named pet");
            return false;
        }

        self.device.context_mut().name = Some(name.into());
        true
    }

    pub fn feed(&mut self) -> bool {
        self.request(PetAction::Eat)
    }

    pub fn tuck_in(&mut self) -> bool {
        self.request(PetAction::Sleep)
    }

    pub fn wash(&mut self) -> bool {
        self.request(PetAction::Clean)
    }

    pub fn play(&mut self) -> bool {
        self.request(PetAction::Play)
    }

    /// Request an action by its external command index.
    pub fn request_index(&mut self, index: usize) -> bool {
        match PetAction::from_index(index) {
            Some(action) => self.request(action),
            None => {
                tracing::debug!(index, "Ignoring unknown action index");
                false
            }
        }
    }

    /// Request an action.
    ///
    /// Accepted only when nothing is pending and the pet could take the
    /// request into `action_received` right now; otherwise nothing changes.
    pub fn request(&mut self, action: PetAction) -> bool {
        let (machine, pet) = self.device.parts_mut();

        if let Some(pending) = pet.action {
            tracing::debug!(?action, ?pending, "Ignoring action, another one is pending");
            return false;
        }

        pet.action = Some(action);
        if machine.can(pet, ACTION_RECEIVED) {
            tracing::debug!(?action, state = %machine.current_state(), "Action accepted");
            return true;
        }
        pet.action = None;

        tracing::debug!(?action, state = %machine.current_state(), "Ignoring action, pet is not ready");
        false
    }
}

impl Device for Pet {
    fn process(&mut self, dt: Duration) -> Result<(), TickError> {
        self.tick(dt).map(|_| ())
    }

    fn state(&self) -> &str {
        self.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named() -> Pet {
        let mut pet = Pet::new().unwrap();
        pet.set_name("Rex");
        pet.tick(Duration::from_secs(1)).unwrap();
        pet
    }

    #[test]
    fn status_collapses_waypoints() {
        assert_eq!(status_for(ACTION_RECEIVED), BUSY);
        assert_eq!(status_for(ACTION_COMPLETED), BUSY);
        assert_eq!(status_for(EATING), EATING);
        assert_eq!(status_for(DEAD), DEAD);
    }

    #[test]
    fn action_indices_match_commands() {
        for (index, command) in PetAction::COMMANDS.iter().enumerate() {
            match PetAction::from_index(index) {
                Some(action) => {
                    assert_eq!(action.index(), index);
                    assert_ne!(*command, "none");
                }
                None => assert_eq!(*command, "none"),
            }
        }
        assert_eq!(PetAction::from_index(5), None);
    }

    #[test]
    fn actions_clamp_attributes() {
        let mut pet = PetContext {
            tired: 10.0,
            ..PetContext::default()
        };

        PetAction::Sleep.apply(&mut pet);
        assert_eq!(pet.tired, 0.0);

        PetAction::Eat.apply(&mut pet);
        assert_eq!(pet.energy, 100.0);
        assert_eq!(pet.clean, 90.0);
    }

    #[test]
    fn unnamed_pet_stays_unnamed() {
        let mut pet = Pet::new().unwrap();
        for _ in 0..10 {
            pet.tick(Duration::from_secs(10)).unwrap();
        }

        assert_eq!(pet.status(), UNNAMED);
        assert_eq!(pet.energy(), 100.0);
        assert_eq!(pet.name_or_placeholder(), NAME_PLACEHOLDER);
    }

    #[test]
    fn naming_starts_the_pet() {
        let pet = named();

        assert_eq!(pet.status(), HAPPY);
        assert_eq!(pet.name(), Some("Rex"));
    }

    #[test]
    fn name_is_fixed_once_started() {
        let mut pet = named();

        assert!(!pet.set_name("Max"));
        assert_eq!(pet.name_or_placeholder(), "Rex");
    }

    #[test]
    fn commands_are_ignored_before_naming() {
        let mut pet = Pet::new().unwrap();

        assert!(!pet.feed());
        assert_eq!(pet.pending_action(), None);
    }

    #[test]
    fn second_request_is_ignored_while_pending() {
        let mut pet = named();

        assert!(pet.wash());
        assert!(!pet.play());
        assert_eq!(pet.pending_action(), Some(PetAction::Clean));
    }

    #[test]
    fn request_index_maps_to_actions() {
        let mut pet = named();

        assert!(!pet.request_index(0));
        assert!(!pet.request_index(9));
        assert!(pet.request_index(2));
        assert_eq!(pet.pending_action(), Some(PetAction::Sleep));
    }

    #[test]
    fn context_snapshot_round_trips() {
        let mut pet = named();
        pet.tuck_in();
        pet.tick(Duration::from_secs(1)).unwrap();

        let json = serde_json::to_string(pet.context()).unwrap();
        let restored: PetContext = serde_json::from_str(&json).unwrap();

        assert!((restored.energy - pet.energy()).abs() < 1e-9);
        assert!((restored.clean - pet.clean()).abs() < 1e-9);
        assert_eq!(restored.is_dead(), pet.context().is_dead());
        assert_eq!(restored.name(), Some("Rex"));
        assert_eq!(restored.pending_action(), Some(PetAction::Sleep));
        assert!(json.contains(r#""action":"sleep""#));
    }

    #[test]
    fn set_dead_zeroes_vitals() {
        let mut pet = PetContext::default();
        pet.set_dead();

        assert!(pet.is_dead());
        assert!(pet.is_dying());
        assert!(!pet.is_happy());
        assert_eq!(pet.bored, 100.0);
    }

    #[test]
    fn invalid_durations_are_rejected() {
        let config = PetConfig {
            action_seconds: -1.0,
            ..PetConfig::default()
        };

        let error = Pet::with_config(&config).unwrap_err();
        assert!(matches!(
            error.issues(),
            [ConfigIssue::InvalidDuration { name, .. }] if name == "action_seconds"
        ));
    }

    #[test]
    fn unknown_decay_attribute_is_rejected() {
        let config = PetConfig {
            happy: DecayConfig::new(0.01).rate("hunger", 1.0),
            ..PetConfig::default()
        };

        let error = Pet::with_config(&config).unwrap_err();
        assert_eq!(
            error.issues(),
            &[ConfigIssue::UnknownAttribute {
                attribute: "hunger".to_string()
            }]
        );
    }
}
