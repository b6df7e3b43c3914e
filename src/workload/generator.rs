//! Randomized workload generation from owner profiles.

use rand::Rng;
use tracing::warn;

use super::{Arrival, Workload};
use crate::models::{ProcessId, SimTime};
use crate::scheduler::SchedulingEngine;
use crate::validation::{validate_burst_time, ValidationError};

/// How one owner submits work.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerProfile {
    /// Owner tag stamped on every process.
    pub owner_tag: String,
    /// Priority of every process (lower = more important).
    pub priority: i32,
    /// Smallest burst time.
    pub min_burst: SimTime,
    /// Largest burst time (exclusive).
    pub max_burst: SimTime,
    /// Probability of submitting per opportunity (0.0..=1.0).
    pub spawn_chance: f64,
}

impl OwnerProfile {
    /// Creates a profile with a 1.0 s burst that always spawns.
    pub fn new(owner_tag: impl Into<String>, priority: i32) -> Self {
        Self {
            owner_tag: owner_tag.into(),
            priority,
            min_burst: 1.0,
            max_burst: 1.0,
            spawn_chance: 1.0,
        }
    }

    /// Player input handler: short, important, submitted whenever idle.
    pub fn player(owner_tag: impl Into<String>) -> Self {
        Self::new(owner_tag, 1)
            .with_burst_range(0.5, 1.5)
            .with_spawn_chance(1.0)
    }

    /// Enemy AI step: longer, less important, submitted occasionally.
    pub fn enemy(owner_tag: impl Into<String>) -> Self {
        Self::new(owner_tag, 3)
            .with_burst_range(1.5, 3.0)
            .with_spawn_chance(0.3)
    }

    /// Sets the burst range.
    pub fn with_burst_range(mut self, min_burst: SimTime, max_burst: SimTime) -> Self {
        self.min_burst = min_burst;
        self.max_burst = max_burst;
        self
    }

    /// Sets the spawn probability.
    pub fn with_spawn_chance(mut self, spawn_chance: f64) -> Self {
        self.spawn_chance = spawn_chance;
        self
    }

    fn wants_spawn<R: Rng>(&self, rng: &mut R) -> bool {
        let p = if self.spawn_chance.is_nan() {
            0.0
        } else {
            self.spawn_chance.clamp(0.0, 1.0)
        };
        rng.random_bool(p)
    }

    /// Both bounds must be valid burst times.
    fn sample_burst<R: Rng>(&self, rng: &mut R) -> Result<SimTime, ValidationError> {
        validate_burst_time(self.min_burst)?;
        validate_burst_time(self.max_burst)?;
        if self.max_burst > self.min_burst {
            Ok(rng.random_range(self.min_burst..self.max_burst))
        } else {
            Ok(self.min_burst)
        }
    }
}

/// Produces arrivals from a set of owner profiles.
#[derive(Debug, Clone, Default)]
pub struct WorkloadGenerator {
    profiles: Vec<OwnerProfile>,
}

impl WorkloadGenerator {
    /// Creates a generator with no owners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an owner profile.
    pub fn with_profile(mut self, profile: OwnerProfile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Registered profiles.
    pub fn profiles(&self) -> &[OwnerProfile] {
        &self.profiles
    }

    /// Submits work to a live engine for one frame.
    ///
    /// An owner with a ready or running process submits nothing; otherwise
    /// it submits with its spawn probability. Returns the new process ids.
    pub fn step<R: Rng>(&self, engine: &mut SchedulingEngine, rng: &mut R) -> Vec<ProcessId> {
        let mut spawned = Vec::new();
        for profile in &self.profiles {
            if engine.has_pending(&profile.owner_tag) || !profile.wants_spawn(rng) {
                continue;
            }
            let added = profile.sample_burst(rng).and_then(|burst| {
                engine.add_process(profile.owner_tag.clone(), burst, profile.priority)
            });
            match added {
                Ok(id) => spawned.push(id),
                Err(e) => warn!(owner = %profile.owner_tag, "profile produced invalid work: {e}"),
            }
        }
        spawned
    }

    /// Scripts arrivals over `[0, horizon)` sampled every `dt`.
    ///
    /// Without an engine to ask, an owner counts as busy until its last
    /// submission's burst time has elapsed.
    pub fn script<R: Rng>(&self, horizon: SimTime, dt: SimTime, rng: &mut R) -> Workload {
        let mut workload = Workload::new();
        if !dt.is_finite() || dt <= 0.0 || !horizon.is_finite() {
            warn!(horizon, dt, "script needs a positive step and a finite horizon");
            return workload;
        }

        let mut busy_until = vec![0.0; self.profiles.len()];
        let frames = (horizon / dt).ceil().max(0.0) as u64;
        for frame in 0..frames {
            let t = frame as f64 * dt;
            for (profile, busy) in self.profiles.iter().zip(busy_until.iter_mut()) {
                if t < *busy || !profile.wants_spawn(rng) {
                    continue;
                }
                let burst = match profile.sample_burst(rng) {
                    Ok(burst) => burst,
                    Err(e) => {
                        warn!(owner = %profile.owner_tag, "profile produced invalid work: {e}");
                        continue;
                    }
                };
                *busy = t + burst;
                workload.push(Arrival::new(t, profile.owner_tag.clone(), burst, profile.priority));
            }
        }
        workload
    }
}
