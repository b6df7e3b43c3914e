//! Simulation configuration.
//!
//! Every field has a serde default, so a partial JSON document (or an
//! empty one) yields a usable configuration.
//!
//! # Example
//!
//! ```
//! use u_cpusched::config::SimulationConfig;
//!
//! let config = SimulationConfig::default()
//!     .with_time_quantum(1.0)
//!     .with_initial_policy("rr");
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::models::SimTime;
use crate::validation::{validate_config, ValidationResult};

/// Fixed simulation step used by the game loop (30 frames per second).
pub const DEFAULT_TIME_STEP: SimTime = 1.0 / 30.0;

/// Default Round-Robin quantum (seconds).
pub const DEFAULT_TIME_QUANTUM: SimTime = 2.0;

/// Remaining time at or below this value counts as exhausted.
pub const DEFAULT_COMPLETION_EPSILON: SimTime = 1e-9;

/// Safety horizon for batch runs that should drain on their own.
pub const DEFAULT_MAX_TICKS: u64 = 100_000;

/// Tunables for the engine and batch comparison runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Step size used by drivers that tick at a fixed rate.
    pub time_step: SimTime,
    /// Round-Robin time quantum.
    pub time_quantum: SimTime,
    /// Tolerance absorbing float accumulation of `dt`.
    pub completion_epsilon: SimTime,
    /// Policy identifier active after construction.
    pub initial_policy: String,
    /// Upper bound on ticks for comparison runs.
    pub max_ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            time_quantum: DEFAULT_TIME_QUANTUM,
            completion_epsilon: DEFAULT_COMPLETION_EPSILON,
            initial_policy: "fcfs".to_string(),
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }
}

impl SimulationConfig {
    /// Sets the fixed time step.
    pub fn with_time_step(mut self, time_step: SimTime) -> Self {
        self.time_step = time_step;
        self
    }

    /// Sets the Round-Robin time quantum.
    pub fn with_time_quantum(mut self, time_quantum: SimTime) -> Self {
        self.time_quantum = time_quantum;
        self
    }

    /// Sets the completion tolerance.
    pub fn with_completion_epsilon(mut self, epsilon: SimTime) -> Self {
        self.completion_epsilon = epsilon;
        self
    }

    /// Sets the initial policy identifier.
    pub fn with_initial_policy(mut self, policy_id: impl Into<String>) -> Self {
        self.initial_policy = policy_id.into();
        self
    }

    /// Sets the tick horizon for comparison runs.
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Validates all fields.
    pub fn validate(&self) -> ValidationResult {
        validate_config(self)
    }
}
