//! Accumulating validation for configuration checks.
//!
//! Every check runs, and all failures are reported together instead of
//! stopping at the first one.

use crate::builder::error::{BuildError, ConfigIssue};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Outcome of one configuration check.
pub(crate) type Check = Validation<(), NonEmptyVec<ConfigIssue>>;

/// Pass when `ok` holds, otherwise fail with the issue produced by `issue`.
pub(crate) fn check<F>(ok: bool, issue: F) -> Check
where
    F: FnOnce() -> ConfigIssue,
{
    if ok {
        Validation::success(())
    } else {
        Validation::fail(issue())
    }
}

/// Combine checks, turning any failures into [`BuildError::Invalid`].
pub(crate) fn collect(checks: Vec<Check>) -> Result<(), BuildError> {
    match Validation::all_vec(checks).map(|_| ()) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(issues) => Err(BuildError::Invalid(issues.iter().cloned().collect())),
    }
}
