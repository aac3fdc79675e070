//! Continuous attribute decay, optionally bounded by a deadline.

use crate::builder::validate::{check, collect};
use crate::builder::{BuildError, ConfigIssue};
use crate::core::State;
use crate::states::context::{Accessor, Attributes, Mortal};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use stillwater::validation::Validation;

/// Lower bound of every decaying attribute.
pub const ATTRIBUTE_MIN: f64 = 0.0;

/// Upper bound of every decaying attribute.
pub const ATTRIBUTE_MAX: f64 = 100.0;

/// Which attributes decay, and how fast.
///
/// Rates are per second and may be negative. Attributes are applied in name
/// order on every tick.
///
/// ```rust
/// use statesim::states::DecayConfig;
///
/// let config = DecayConfig::new(0.01).rate("bored", 0.1).rate("energy", -0.05);
/// assert_eq!(config.rates.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Age added per second spent in the state.
    pub age_rate: f64,

    /// Attribute name to change per second.
    pub rates: BTreeMap<String, f64>,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            age_rate: 0.01,
            rates: BTreeMap::new(),
        }
    }
}

impl DecayConfig {
    pub fn new(age_rate: f64) -> Self {
        Self {
            age_rate,
            rates: BTreeMap::new(),
        }
    }

    /// Add or replace the rate for one attribute.
    pub fn rate(mut self, attribute: impl Into<String>, per_second: f64) -> Self {
        self.rates.insert(attribute.into(), per_second);
        self
    }
}

struct DecayRate<C> {
    attribute: String,
    accessor: Accessor<C>,
    per_second: f64,
}

/// State whose attributes drift every tick, clamped to `[0, 100]`.
///
/// Built from a [`DecayConfig`]; attribute names are resolved against the
/// context's [`Attributes`] once, so an unknown name fails construction
/// rather than the first tick.
pub struct Decay<C> {
    age_rate: f64,
    rates: Vec<DecayRate<C>>,
}

impl<C: Attributes> Decay<C> {
    pub fn new(config: &DecayConfig) -> Result<Self, BuildError> {
        let mut checks = vec![check(config.age_rate.is_finite(), || {
            ConfigIssue::InvalidRate {
                attribute: "age".to_string(),
                rate: config.age_rate,
            }
        })];
        let mut rates = Vec::with_capacity(config.rates.len());

        for (attribute, &per_second) in &config.rates {
            checks.push(check(per_second.is_finite(), || ConfigIssue::InvalidRate {
                attribute: attribute.clone(),
                rate: per_second,
            }));

            match C::accessor(attribute) {
                Some(accessor) => rates.push(DecayRate {
                    attribute: attribute.clone(),
                    accessor,
                    per_second,
                }),
                None => checks.push(Validation::fail(ConfigIssue::UnknownAttribute {
                    attribute: attribute.clone(),
                })),
            }
        }

        collect(checks)?;

        Ok(Self {
            age_rate: config.age_rate,
            rates,
        })
    }
}

impl<C> Decay<C> {
    pub fn age_rate(&self) -> f64 {
        self.age_rate
    }

    /// Names of the decaying attributes, in application order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> + '_ {
        self.rates.iter().map(|r| r.attribute.as_str())
    }
}

impl<C: Attributes> State<C> for Decay<C> {
    fn in_state(&mut self, ctx: &mut C, dt: Duration) {
        let seconds = dt.as_secs_f64();

        for rate in &self.rates {
            let current = (rate.accessor.get)(ctx);
            let next = (current + rate.per_second * seconds).clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX);
            (rate.accessor.set)(ctx, next);
        }

        ctx.add_age(self.age_rate * seconds);
    }
}

impl<C> std::fmt::Debug for Decay<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decay")
            .field("age_rate", &self.age_rate)
            .field("attributes", &self.attributes().collect::<Vec<_>>())
            .finish()
    }
}

/// Decay that kills the device after `max_duration` in the state.
///
/// Delegates the per-tick drift to an embedded [`Decay`], then checks its own
/// timer and calls [`Mortal::set_dead`] once the deadline is reached.
pub struct DecayWithTimeout<C> {
    decay: Decay<C>,
    max_duration: Duration,
    in_state_for: Duration,
}

impl<C> DecayWithTimeout<C> {
    pub fn new(decay: Decay<C>, max_duration: Duration) -> Self {
        Self {
            decay,
            max_duration,
            in_state_for: Duration::ZERO,
        }
    }

    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Time spent in the state since the last entry.
    pub fn elapsed(&self) -> Duration {
        self.in_state_for
    }

    pub fn decay(&self) -> &Decay<C> {
        &self.decay
    }
}

impl<C: Attributes> DecayWithTimeout<C> {
    pub fn from_config(config: &DecayConfig, max_duration: Duration) -> Result<Self, BuildError> {
        Ok(Self::new(Decay::new(config)?, max_duration))
    }
}

impl<C: Attributes + Mortal> State<C> for DecayWithTimeout<C> {
    fn on_entry(&mut self, _ctx: &mut C, _dt: Duration) {
        self.in_state_for = Duration::ZERO;
    }

    fn in_state(&mut self, ctx: &mut C, dt: Duration) {
        self.decay.in_state(ctx, dt);

        self.in_state_for = self.in_state_for.saturating_add(dt);

        if self.in_state_for >= self.max_duration {
            ctx.set_dead();
        }
    }
}

impl<C> std::fmt::Debug for DecayWithTimeout<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecayWithTimeout")
            .field("decay", &self.decay)
            .field("max_duration", &self.max_duration)
            .field("in_state_for", &self.in_state_for)
            .finish()
    }
}
