//! Optimiser error types.

use lng_core::types::{ConstraintViolation, PricingError};
use thiserror::Error;

/// Errors that abort an optimisation run.
///
/// Constraint violations raised while building the option universe only
/// exclude candidates; they surface here when a caller asks for something the
/// contract forbids outright, such as exercising more options than the cap.
///
/// # Examples
///
/// ```
/// use lng_core::types::ConstraintViolation;
/// use lng_optimiser::OptimiserError;
///
/// let err: OptimiserError = ConstraintViolation::ExerciseCapExceeded {
///     requested: 3,
///     cap: 2,
/// }
/// .into();
/// assert!(err.to_string().contains("cap"));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimiserError {
    /// Pricing failed on invalid inputs
    #[error("Pricing failed: {0}")]
    Pricing(#[from] PricingError),

    /// A contract constraint was breached
    #[error("Constraint violated: {0}")]
    Constraint(#[from] ConstraintViolation),

    /// The delivery schedule is empty
    #[error("Strategy '{profile}' has no delivery months")]
    EmptySchedule {
        /// Profile name
        profile: String,
    },
}
