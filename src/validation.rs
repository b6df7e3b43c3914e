//! Boundary validation for simulation inputs.
//!
//! The simulation is closed-world, so the only failures are malformed
//! arguments crossing the boundary:
//! - Non-positive or non-finite burst times
//! - Negative or non-finite time steps
//! - Non-positive time quanta
//! - Unknown policy identifiers
//!
//! Broken internal invariants are not reported here; they abort.

use std::fmt;

use crate::config::SimulationConfig;
use crate::models::SimTime;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Burst time is zero or negative.
    InvalidBurstTime,
    /// Time step is negative.
    InvalidTimeStep,
    /// Round-Robin quantum is zero or negative.
    InvalidTimeQuantum,
    /// Completion tolerance is negative.
    InvalidEpsilon,
    /// A time value is NaN or infinite.
    NonFiniteValue,
    /// A policy identifier matched no known policy.
    UnknownPolicy,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Checks a burst time for `add_process`.
pub fn validate_burst_time(burst_time: SimTime) -> Result<(), ValidationError> {
    if !burst_time.is_finite() {
        return Err(ValidationError::new(
            ValidationErrorKind::NonFiniteValue,
            format!("Burst time must be finite, got {burst_time}"),
        ));
    }
    if burst_time <= 0.0 {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidBurstTime,
            format!("Burst time must be positive, got {burst_time}"),
        ));
    }
    Ok(())
}

/// Checks a tick delta. Zero is allowed (a no-op advance).
pub fn validate_time_step(dt: SimTime) -> Result<(), ValidationError> {
    if !dt.is_finite() {
        return Err(ValidationError::new(
            ValidationErrorKind::NonFiniteValue,
            format!("Time step must be finite, got {dt}"),
        ));
    }
    if dt < 0.0 {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidTimeStep,
            format!("Time step must not be negative, got {dt}"),
        ));
    }
    Ok(())
}

/// Checks a Round-Robin time quantum.
pub fn validate_time_quantum(quantum: SimTime) -> Result<(), ValidationError> {
    if !quantum.is_finite() {
        return Err(ValidationError::new(
            ValidationErrorKind::NonFiniteValue,
            format!("Time quantum must be finite, got {quantum}"),
        ));
    }
    if quantum <= 0.0 {
        return Err(ValidationError::new(
            ValidationErrorKind::InvalidTimeQuantum,
            format!("Time quantum must be positive, got {quantum}"),
        ));
    }
    Ok(())
}

/// Validates a whole simulation configuration.
///
/// Checks:
/// 1. `time_step` is finite and strictly positive
/// 2. `time_quantum` is finite and strictly positive
/// 3. `completion_epsilon` is finite and not negative
/// 4. `initial_policy` names a known policy
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &SimulationConfig) -> ValidationResult {
    let mut errors = Vec::new();

    match validate_time_step(config.time_step) {
        Err(e) => errors.push(e),
        Ok(()) if config.time_step == 0.0 => errors.push(ValidationError::new(
            ValidationErrorKind::InvalidTimeStep,
            "Configured time step must be positive",
        )),
        Ok(()) => {}
    }

    if let Err(e) = validate_time_quantum(config.time_quantum) {
        errors.push(e);
    }

    if !config.completion_epsilon.is_finite() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonFiniteValue,
            format!(
                "Completion epsilon must be finite, got {}",
                config.completion_epsilon
            ),
        ));
    } else if config.completion_epsilon < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidEpsilon,
            format!(
                "Completion epsilon must not be negative, got {}",
                config.completion_epsilon
            ),
        ));
    }

    // Quantum errors were already reported above; only the id matters here.
    if let Err(e) = crate::dispatching::SchedulingPolicy::from_id(&config.initial_policy, 1.0) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_time() {
        assert!(validate_burst_time(1.0).is_ok());
        assert!(validate_burst_time(0.001).is_ok());

        let err = validate_burst_time(0.0).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidBurstTime);
        let err = validate_burst_time(-2.0).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidBurstTime);
        let err = validate_burst_time(f64::NAN).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NonFiniteValue);
        let err = validate_burst_time(f64::INFINITY).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NonFiniteValue);
    }

    #[test]
    fn test_time_step() {
        assert!(validate_time_step(1.0 / 30.0).is_ok());
        assert!(validate_time_step(0.0).is_ok());
        assert_eq!(
            validate_time_step(-0.1).unwrap_err().kind,
            ValidationErrorKind::InvalidTimeStep
        );
        assert_eq!(
            validate_time_step(f64::NAN).unwrap_err().kind,
            ValidationErrorKind::NonFiniteValue
        );
    }

    #[test]
    fn test_time_quantum() {
        assert!(validate_time_quantum(2.0).is_ok());
        assert_eq!(
            validate_time_quantum(0.0).unwrap_err().kind,
            ValidationErrorKind::InvalidTimeQuantum
        );
    }

    #[test]
    fn test_valid_default_config() {
        assert!(validate_config(&SimulationConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_configured_time_step() {
        let config = SimulationConfig::default().with_time_step(0.0);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidTimeStep));
    }

    #[test]
    fn test_unknown_initial_policy() {
        let config = SimulationConfig::default().with_initial_policy("lottery");
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownPolicy);
    }

    #[test]
    fn test_multiple_errors() {
        let config = SimulationConfig::default()
            .with_time_step(-1.0)
            .with_time_quantum(0.0)
            .with_completion_epsilon(-1e-3)
            .with_initial_policy("???");
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_display() {
        let err = validate_burst_time(-1.0).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("InvalidBurstTime"));
        assert!(text.contains("-1"));
    }
}
