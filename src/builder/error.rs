//! Build errors for state machines and the states they are wired with.

use thiserror::Error;

/// A single problem found while validating a machine or state configuration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigIssue {
    #[error("initial state '{name}' is not in the state table")]
    UnknownInitialState { name: String },

    #[error("state '{name}' is defined more than once")]
    DuplicateState { name: String },

    #[error("transition '{from}' -> '{to}' starts from an unknown state")]
    UnknownTransitionSource { from: String, to: String },

    #[error("transition '{from}' -> '{to}' leads to an unknown state")]
    UnknownTransitionTarget { from: String, to: String },

    #[error("context has no attribute named '{attribute}'")]
    UnknownAttribute { attribute: String },

    #[error("rate {rate} for '{attribute}' is not a finite number")]
    InvalidRate { attribute: String, rate: f64 },

    #[error("'{name}' must be a non-negative number of seconds, got {seconds}")]
    InvalidDuration { name: String, seconds: f64 },

    #[error("max_transitions_per_tick must be at least 1")]
    ZeroTransitionLimit,
}

/// Errors that can occur when building state machines and states.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(name) before .build()")]
    MissingInitialState,

    #[error("invalid configuration: {}", describe(.0))]
    Invalid(Vec<ConfigIssue>),
}

impl BuildError {
    /// Issues collected during validation, empty for fail-fast errors.
    pub fn issues(&self) -> &[ConfigIssue] {
        match self {
            Self::Invalid(issues) => issues,
            Self::MissingInitialState => &[],
        }
    }
}

fn describe(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_issue() {
        let error = BuildError::Invalid(vec![
            ConfigIssue::DuplicateState {
                name: "idle".to_string(),
            },
            ConfigIssue::ZeroTransitionLimit,
        ]);

        assert_eq!(
            error.to_string(),
            "invalid configuration: state 'idle' is defined more than once; \
             max_transitions_per_tick must be at least 1"
        );
        assert_eq!(error.issues().len(), 2);
    }

    #[test]
    fn missing_initial_has_no_issues() {
        assert!(BuildError::MissingInitialState.issues().is_empty());
    }
}
