//! Process (unit of simulated work) model.
//!
//! A process represents one unit of work competing for the single
//! execution slot: a player input handler, an enemy AI step, and so on.
//! The scheduler never interprets what the work *is*; the `owner_tag`
//! is threaded through for reporting only.
//!
//! # Time Representation
//! All times are simulated seconds (`f64`) relative to the engine epoch
//! (t=0 after construction or `reset`). They advance only through
//! `SchedulingEngine::tick`.

use serde::{Deserialize, Serialize};

/// Simulated time or duration, in seconds.
pub type SimTime = f64;

/// Unique process identifier. Monotonically increasing, never reused
/// within one engine lifetime.
pub type ProcessId = u64;

/// Lifecycle state of a process inside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessState {
    /// Waiting in the ready queue.
    Ready,
    /// Occupying the execution slot.
    Running,
    /// Finished; lives in the completed list forever.
    Completed,
}

impl ProcessState {
    /// Display label used by process-queue views.
    pub fn label(&self) -> &'static str {
        match self {
            ProcessState::Ready => "WAITING",
            ProcessState::Running => "RUNNING",
            ProcessState::Completed => "COMPLETED",
        }
    }
}

/// A unit of simulated work and its timing fields.
///
/// Timing fields split into three groups:
/// - fixed at creation: `arrival_time`, `burst_time`, `priority`
/// - advanced by the engine: `remaining_time`, `start_time`
/// - written once at completion: `completion_time`, `turnaround_time`, `waiting_time`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    /// Unique process identifier.
    pub id: ProcessId,
    /// Opaque identifier of the external owner (entity, task kind).
    pub owner_tag: String,
    /// Time at which the process became eligible to run.
    pub arrival_time: SimTime,
    /// Total execution time required (> 0).
    pub burst_time: SimTime,
    /// Execution time left.
    pub remaining_time: SimTime,
    /// Scheduling priority (lower = more important, 0 is highest).
    pub priority: i32,
    /// Time of first execution. `None` until first dispatch.
    pub start_time: Option<SimTime>,
    /// Time at which the process finished.
    pub completion_time: Option<SimTime>,
    /// `completion_time - arrival_time`.
    pub turnaround_time: Option<SimTime>,
    /// `turnaround_time - burst_time`, clamped at zero.
    pub waiting_time: Option<SimTime>,
}

impl ProcessRecord {
    /// Creates a ready process. Burst time is validated by the engine
    /// boundary, not here.
    pub fn new(
        id: ProcessId,
        owner_tag: impl Into<String>,
        arrival_time: SimTime,
        burst_time: SimTime,
        priority: i32,
    ) -> Self {
        Self {
            id,
            owner_tag: owner_tag.into(),
            arrival_time,
            burst_time,
            remaining_time: burst_time,
            priority,
            start_time: None,
            completion_time: None,
            turnaround_time: None,
            waiting_time: None,
        }
    }

    /// Whether the process may be selected at `now`.
    pub fn is_eligible(&self, now: SimTime) -> bool {
        self.arrival_time <= now && self.remaining_time > 0.0
    }

    /// Whether the completion fields have been written.
    pub fn is_completed(&self) -> bool {
        self.completion_time.is_some()
    }

    /// Time already executed.
    pub fn executed_time(&self) -> SimTime {
        (self.burst_time - self.remaining_time.max(0.0)).max(0.0)
    }

    /// Time from arrival to first dispatch. `None` before first dispatch.
    pub fn response_time(&self) -> Option<SimTime> {
        self.start_time.map(|s| (s - self.arrival_time).max(0.0))
    }

    /// Records the first dispatch. Later calls are ignored so the value
    /// survives preemption and resumption.
    pub(crate) fn mark_started(&mut self, at: SimTime) {
        if self.start_time.is_none() {
            self.start_time = Some(at.max(self.arrival_time));
        }
    }

    /// Writes the completion fields.
    pub(crate) fn finalize(&mut self, now: SimTime) {
        let completion = now.max(self.arrival_time);
        let turnaround = completion - self.arrival_time;
        self.remaining_time = 0.0;
        self.completion_time = Some(completion);
        self.turnaround_time = Some(turnaround);
        self.waiting_time = Some((turnaround - self.burst_time).max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_process() {
        let p = ProcessRecord::new(1, "player", 0.5, 2.0, 1);
        assert_eq!(p.id, 1);
        assert_eq!(p.owner_tag, "player");
        assert!((p.remaining_time - 2.0).abs() < 1e-12);
        assert!(p.start_time.is_none());
        assert!(!p.is_completed());
        assert!(p.response_time().is_none());
    }

    #[test]
    fn test_eligibility() {
        let mut p = ProcessRecord::new(1, "enemy", 1.0, 2.0, 3);
        assert!(!p.is_eligible(0.5));
        assert!(p.is_eligible(1.0));
        p.remaining_time = 0.0;
        assert!(!p.is_eligible(5.0));
    }

    #[test]
    fn test_start_time_set_once() {
        let mut p = ProcessRecord::new(1, "player", 1.0, 2.0, 1);
        p.mark_started(1.5);
        p.mark_started(3.0);
        assert_eq!(p.start_time, Some(1.5));
        assert!((p.response_time().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_start_time_not_before_arrival() {
        let mut p = ProcessRecord::new(1, "player", 1.0, 2.0, 1);
        p.mark_started(0.9);
        assert_eq!(p.start_time, Some(1.0));
    }

    #[test]
    fn test_finalize_clamps_waiting_time() {
        // Float accumulation: finished "before" arrival + burst
        let mut p = ProcessRecord::new(1, "player", 0.0, 1.0, 1);
        p.finalize(0.999_999_999_999_9);
        assert!(p.is_completed());
        assert_eq!(p.waiting_time, Some(0.0));
        assert!((p.turnaround_time.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_finalize_fields() {
        let mut p = ProcessRecord::new(7, "enemy", 2.0, 1.5, 3);
        p.remaining_time = -0.01;
        p.finalize(5.0);
        assert_eq!(p.completion_time, Some(5.0));
        assert_eq!(p.turnaround_time, Some(3.0));
        assert_eq!(p.waiting_time, Some(1.5));
        assert_eq!(p.remaining_time, 0.0);
        assert!((p.executed_time() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(ProcessState::Running.label(), "RUNNING");
        assert_eq!(ProcessState::Ready.label(), "WAITING");
        assert_eq!(ProcessState::Completed.label(), "COMPLETED");
    }
}
