//! Fixed-timestep scheduling engine.
//!
//! # Algorithm
//!
//! Each `tick(dt)`:
//! 1. Advance the clock by `dt`.
//! 2. If the execution slot is empty, ask the active policy for the next
//!    ready process and dispatch it.
//! 3. Charge `dt` to the running process and to the quantum counter.
//! 4. If the process is exhausted, finalize it and record metrics.
//! 5. Otherwise ask the policy whether to preempt; a preempted process
//!    goes back to the ready queue at the policy's requeue position.
//!
//! Every process is in exactly one of ready, running, or completed.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.3

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::{MetricsCollector, PolicyStats};
use crate::config::{SimulationConfig, DEFAULT_COMPLETION_EPSILON, DEFAULT_TIME_QUANTUM};
use crate::dispatching::{RequeuePosition, SchedulingPolicy};
use crate::models::{
    EngineSnapshot, ExecutionSlice, ProcessId, ProcessRecord, ProcessState, SimTime,
};
use crate::validation::{validate_burst_time, validate_time_step, ValidationError};

/// Single-slot process scheduler driven by an external clock.
///
/// The engine is the only mutator of `remaining_time`, `start_time`,
/// and the completion fields. External readers consume [`EngineSnapshot`]
/// copies.
///
/// # Example
///
/// ```
/// use u_cpusched::dispatching::SchedulingPolicy;
/// use u_cpusched::scheduler::SchedulingEngine;
///
/// let mut engine = SchedulingEngine::new().with_policy(SchedulingPolicy::PriorityPreemptive);
/// let enemy = engine.add_process("enemy", 2.0, 3).unwrap();
/// let player = engine.add_process("player", 0.5, 1).unwrap();
///
/// engine.tick(0.25);
/// assert_eq!(engine.snapshot().running.map(|p| p.id), Some(player));
///
/// while !engine.is_idle() {
///     engine.tick(0.25);
/// }
/// let order: Vec<_> = engine.snapshot().completed.iter().map(|p| p.id).collect();
/// assert_eq!(order, vec![player, enemy]);
/// ```
#[derive(Debug, Clone)]
pub struct SchedulingEngine {
    policy: SchedulingPolicy,
    ready: VecDeque<ProcessRecord>,
    running: Option<ProcessRecord>,
    completed: Vec<ProcessRecord>,
    now: SimTime,
    quantum_used: SimTime,
    slice_start: SimTime,
    context_switch_count: u64,
    next_id: ProcessId,
    time_quantum: SimTime,
    completion_epsilon: SimTime,
    timeline: Vec<ExecutionSlice>,
    metrics: MetricsCollector,
}

impl SchedulingEngine {
    /// Creates an empty engine running FCFS with default tunables.
    pub fn new() -> Self {
        Self {
            policy: SchedulingPolicy::Fcfs,
            ready: VecDeque::new(),
            running: None,
            completed: Vec::new(),
            now: 0.0,
            quantum_used: 0.0,
            slice_start: 0.0,
            context_switch_count: 0,
            next_id: 1,
            time_quantum: DEFAULT_TIME_QUANTUM,
            completion_epsilon: DEFAULT_COMPLETION_EPSILON,
            timeline: Vec::new(),
            metrics: MetricsCollector::new(),
        }
    }

    /// Creates an engine from a validated configuration.
    ///
    /// # Returns
    /// `Err(errors)` with every configuration problem found.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, Vec<ValidationError>> {
        config.validate()?;
        let policy = SchedulingPolicy::from_id(&config.initial_policy, config.time_quantum)
            .map_err(|e| vec![e])?;
        let mut engine = Self::new().with_policy(policy);
        engine.time_quantum = config.time_quantum;
        engine.completion_epsilon = config.completion_epsilon;
        Ok(engine)
    }

    /// Sets the active policy.
    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the tolerance below which remaining time counts as exhausted.
    pub fn with_completion_epsilon(mut self, epsilon: SimTime) -> Self {
        self.completion_epsilon = epsilon.max(0.0);
        self
    }

    // ======================== Boundary operations ========================

    /// Creates a ready process arriving now.
    ///
    /// # Errors
    /// `InvalidBurstTime` / `NonFiniteValue` when `burst_time` is not a
    /// positive finite number. The engine state is left untouched.
    pub fn add_process(
        &mut self,
        owner_tag: impl Into<String>,
        burst_time: SimTime,
        priority: i32,
    ) -> Result<ProcessId, ValidationError> {
        let owner_tag = owner_tag.into();
        if let Err(e) = validate_burst_time(burst_time) {
            warn!(owner = %owner_tag, burst_time, "rejected process: {}", e.message);
            return Err(e);
        }

        let id = self.next_id;
        self.next_id += 1;
        debug!(id, owner = %owner_tag, burst_time, priority, now = self.now, "process arrived");
        self.ready
            .push_back(ProcessRecord::new(id, owner_tag, self.now, burst_time, priority));
        Ok(id)
    }

    /// Advances the simulation by `dt`.
    ///
    /// Total: an invalid `dt` (negative or non-finite) is logged and
    /// ignored. Use [`SchedulingEngine::try_tick`] to observe the rejection.
    pub fn tick(&mut self, dt: SimTime) {
        if let Err(e) = self.try_tick(dt) {
            warn!(dt, "ignored tick: {}", e.message);
        }
    }

    /// Advances the simulation by `dt`, rejecting invalid deltas.
    pub fn try_tick(&mut self, dt: SimTime) -> Result<(), ValidationError> {
        validate_time_step(dt)?;
        self.advance(dt);
        Ok(())
    }

    /// Swaps the active policy.
    ///
    /// Resets policy-internal state (the quantum counter) but leaves the
    /// ready, running, and completed collections alone. Call
    /// [`SchedulingEngine::reset`] for a clean comparison.
    pub fn select_policy(&mut self, policy: SchedulingPolicy) {
        info!(from = self.policy.name(), to = policy.name(), now = self.now, "policy switched");
        self.policy = policy;
        self.quantum_used = 0.0;
    }

    /// Swaps the active policy by external identifier.
    ///
    /// Round-Robin uses the engine's configured quantum.
    pub fn select_policy_id(&mut self, policy_id: &str) -> Result<(), ValidationError> {
        let policy = SchedulingPolicy::from_id(policy_id, self.time_quantum)
            .inspect_err(|e| warn!(policy_id, "rejected policy switch: {}", e.message))?;
        self.select_policy(policy);
        Ok(())
    }

    /// Clears every collection, the clock, the context switch count, the
    /// timeline, policy-internal state, and the recorded metrics.
    ///
    /// The active policy and the known policy names are kept. Process ids
    /// keep increasing across resets.
    pub fn reset(&mut self) {
        info!(policy = self.policy.name(), now = self.now, "engine reset");
        self.ready.clear();
        self.running = None;
        self.completed.clear();
        self.timeline.clear();
        self.now = 0.0;
        self.quantum_used = 0.0;
        self.slice_start = 0.0;
        self.context_switch_count = 0;
        self.metrics.reset();
    }

    /// Point-in-time copy of the engine's collections.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            now: self.now,
            policy_name: self.policy.name().to_string(),
            context_switch_count: self.context_switch_count,
            running: self.running.clone(),
            ready: self.ready.iter().cloned().collect(),
            completed: self.completed.clone(),
        }
    }

    // ======================== Queries ========================

    /// Simulation clock.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Active policy.
    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    /// Context switches since the last reset.
    pub fn context_switch_count(&self) -> u64 {
        self.context_switch_count
    }

    /// Time the running process has used of its current dispatch.
    pub fn quantum_used(&self) -> SimTime {
        self.quantum_used
    }

    /// Per-policy metrics.
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Per-policy metrics, for clearing them without a full reset.
    pub fn metrics_mut(&mut self) -> &mut MetricsCollector {
        &mut self.metrics
    }

    /// Stats of the active policy over the elapsed simulation time.
    pub fn current_stats(&self) -> PolicyStats {
        self.metrics.stats_for(self.policy.name(), self.now)
    }

    /// Execution slices recorded since the last reset.
    pub fn timeline(&self) -> &[ExecutionSlice] {
        &self.timeline
    }

    /// Whether nothing is ready or running.
    pub fn is_idle(&self) -> bool {
        self.running.is_none() && self.ready.is_empty()
    }

    /// Where a process currently lives, if the engine knows it.
    pub fn state_of(&self, id: ProcessId) -> Option<ProcessState> {
        if self.running.as_ref().is_some_and(|p| p.id == id) {
            Some(ProcessState::Running)
        } else if self.ready.iter().any(|p| p.id == id) {
            Some(ProcessState::Ready)
        } else if self.completed.iter().any(|p| p.id == id) {
            Some(ProcessState::Completed)
        } else {
            None
        }
    }

    /// Whether the running process belongs to `owner_tag`.
    pub fn can_owner_execute(&self, owner_tag: &str) -> bool {
        self.running
            .as_ref()
            .is_some_and(|p| p.owner_tag == owner_tag)
    }

    /// Whether `owner_tag` has a ready or running process.
    pub fn has_pending(&self, owner_tag: &str) -> bool {
        self.can_owner_execute(owner_tag) || self.ready.iter().any(|p| p.owner_tag == owner_tag)
    }

    /// Ticks until idle or until `max_ticks` ticks have run.
    ///
    /// Returns `true` if the engine drained.
    pub fn run_until_idle(&mut self, dt: SimTime, max_ticks: u64) -> bool {
        if validate_time_step(dt).is_err() || dt == 0.0 {
            warn!(dt, "run_until_idle needs a positive finite step");
            return self.is_idle();
        }
        let mut ticks = 0;
        while !self.is_idle() && ticks < max_ticks {
            self.advance(dt);
            ticks += 1;
        }
        self.is_idle()
    }

    // ======================== Tick internals ========================

    fn advance(&mut self, dt: SimTime) {
        self.now += dt;

        if self.running.is_none() && !self.ready.is_empty() {
            self.dispatch(dt);
        }

        let (exhausted, preempt) = {
            let Some(running) = self.running.as_mut() else {
                return;
            };
            running.remaining_time -= dt;
            self.quantum_used += dt;

            let exhausted = running.remaining_time <= self.completion_epsilon;
            let preempt = !exhausted
                && self
                    .policy
                    .should_preempt(running, &self.ready, self.quantum_used, self.now);
            (exhausted, preempt)
        };

        if exhausted {
            self.complete_running();
        } else if preempt {
            self.preempt_running();
        }
    }

    fn dispatch(&mut self, dt: SimTime) {
        let Some(idx) = self.policy.select_next(&self.ready, self.now) else {
            return;
        };
        let Some(mut process) = self.ready.remove(idx) else {
            unreachable!(
                "{} selected index {idx} outside a ready queue of {}",
                self.policy.name(),
                self.ready.len()
            );
        };

        // The slice being charged began at the start of this tick.
        let slice_start = (self.now - dt).max(process.arrival_time);
        process.mark_started(slice_start);
        self.slice_start = slice_start;
        self.quantum_used = 0.0;
        // Dispatch only fills an empty slot, so every dispatch is a switch.
        self.context_switch_count += 1;

        debug!(
            id = process.id,
            owner = %process.owner_tag,
            remaining = process.remaining_time,
            now = self.now,
            policy = self.policy.name(),
            "dispatched"
        );
        self.running = Some(process);
    }

    fn complete_running(&mut self) {
        let Some(mut process) = self.running.take() else {
            unreachable!("completion requested with an empty execution slot");
        };

        process.finalize(self.now);
        self.record_slice(&process);
        self.metrics.record_completion(self.policy.name(), &process);
        self.quantum_used = 0.0;

        debug!(
            id = process.id,
            owner = %process.owner_tag,
            turnaround = process.turnaround_time,
            waiting = process.waiting_time,
            now = self.now,
            "completed"
        );
        self.completed.push(process);
    }

    fn preempt_running(&mut self) {
        let Some(process) = self.running.take() else {
            unreachable!("preemption requested with an empty execution slot");
        };

        self.record_slice(&process);
        self.quantum_used = 0.0;

        let position = self.policy.requeue_position();
        debug!(
            id = process.id,
            owner = %process.owner_tag,
            remaining = process.remaining_time,
            now = self.now,
            ?position,
            "preempted"
        );
        match position {
            RequeuePosition::Front => self.ready.push_front(process),
            RequeuePosition::Back => self.ready.push_back(process),
        }
    }

    fn record_slice(&mut self, process: &ProcessRecord) {
        self.timeline.push(ExecutionSlice {
            process_id: process.id,
            owner_tag: process.owner_tag.clone(),
            start: self.slice_start,
            end: self.now,
        });
    }
}

impl Default for SchedulingEngine {
    fn default() -> Self {
        Self::new()
    }
}
