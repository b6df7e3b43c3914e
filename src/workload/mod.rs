//! Workloads: the processes external collaborators feed the engine.
//!
//! A [`Workload`] is a replayable script of arrivals, used to run the
//! same input under every policy. [`WorkloadGenerator`] produces
//! workloads (or drives a live engine) from per-owner profiles that
//! mimic a game loop: a player spawning short input handlers and
//! enemies occasionally spawning longer AI steps.
//!
//! # Usage
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use u_cpusched::workload::{OwnerProfile, WorkloadGenerator};
//!
//! let generator = WorkloadGenerator::new()
//!     .with_profile(OwnerProfile::player("player"))
//!     .with_profile(OwnerProfile::enemy("enemy-1"));
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let workload = generator.script(10.0, 1.0 / 30.0, &mut rng);
//! assert!(!workload.is_empty());
//! ```

mod generator;

pub use generator::{OwnerProfile, WorkloadGenerator};

use serde::{Deserialize, Serialize};

use crate::models::SimTime;

/// One scripted `add_process` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrival {
    /// Simulation time at which the process is submitted.
    pub at: SimTime,
    /// Owner tag passed through to the process.
    pub owner_tag: String,
    /// Burst time of the process.
    pub burst_time: SimTime,
    /// Priority of the process.
    pub priority: i32,
}

impl Arrival {
    /// Creates an arrival.
    pub fn new(
        at: SimTime,
        owner_tag: impl Into<String>,
        burst_time: SimTime,
        priority: i32,
    ) -> Self {
        Self {
            at,
            owner_tag: owner_tag.into(),
            burst_time,
            priority,
        }
    }
}

/// A replayable list of arrivals, kept sorted by submission time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    /// Arrivals in submission order.
    pub arrivals: Vec<Arrival>,
}

impl Workload {
    /// Creates an empty workload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an arrival, keeping submission order stable for equal times.
    pub fn with_arrival(mut self, arrival: Arrival) -> Self {
        self.push(arrival);
        self
    }

    /// Adds an arrival in place.
    pub fn push(&mut self, arrival: Arrival) {
        let idx = self.arrivals.partition_point(|a| a.at <= arrival.at);
        self.arrivals.insert(idx, arrival);
    }

    /// Number of arrivals.
    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    /// Whether there are no arrivals.
    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// Sum of all burst times.
    pub fn total_burst(&self) -> SimTime {
        self.arrivals.iter().map(|a| a.burst_time).sum()
    }

    /// Time of the last arrival.
    pub fn last_arrival(&self) -> SimTime {
        self.arrivals.last().map(|a| a.at).unwrap_or(0.0)
    }
}
