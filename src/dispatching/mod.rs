//! Scheduling policies.
//!
//! A policy answers two questions for the engine: which ready process
//! should take the empty execution slot, and whether the running process
//! should give the slot back. Policies never own or mutate processes;
//! they inspect the engine's ready queue and return an index.
//!
//! # Usage
//!
//! ```
//! use std::collections::VecDeque;
//! use u_cpusched::dispatching::SchedulingPolicy;
//! use u_cpusched::models::ProcessRecord;
//!
//! let mut ready = VecDeque::new();
//! ready.push_back(ProcessRecord::new(1, "enemy", 0.0, 3.0, 3));
//! ready.push_back(ProcessRecord::new(2, "player", 0.0, 1.0, 1));
//!
//! assert_eq!(SchedulingPolicy::Fcfs.select_next(&ready, 0.0), Some(0));
//! assert_eq!(SchedulingPolicy::PriorityPreemptive.select_next(&ready, 0.0), Some(1));
//! ```
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

mod keys;

pub use keys::SelectionKey;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TIME_QUANTUM;
use crate::models::{ProcessRecord, SimTime};
use crate::validation::{validate_time_quantum, ValidationError, ValidationErrorKind};

/// Display name of First-Come-First-Served.
pub const FCFS_NAME: &str = "First Come First Serve";
/// Display name of Round-Robin.
pub const ROUND_ROBIN_NAME: &str = "Round Robin";
/// Display name of Shortest-Job-First.
pub const SJF_NAME: &str = "Shortest Job First";
/// Display name of non-preemptive priority.
pub const PRIORITY_NAME: &str = "Priority (Non-Preemptive)";
/// Display name of preemptive priority.
pub const PRIORITY_PREEMPTIVE_NAME: &str = "Priority (Preemptive)";

/// Display names of every policy, in canonical order.
pub const POLICY_NAMES: [&str; 5] = [
    FCFS_NAME,
    ROUND_ROBIN_NAME,
    SJF_NAME,
    PRIORITY_NAME,
    PRIORITY_PREEMPTIVE_NAME,
];

/// Tolerance when comparing accumulated quantum usage to the quantum.
pub const QUANTUM_EPSILON: SimTime = 1e-9;

/// Where a preempted process goes back into the ready queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequeuePosition {
    /// Head of the queue: keeps its place ahead of later arrivals.
    Front,
    /// Tail of the queue: waits a full round.
    Back,
}

/// The closed set of scheduling policies.
///
/// Adding a policy means adding a variant here; every `match` below
/// then fails to compile until the new variant is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// First-Come-First-Served. Non-preemptive.
    #[default]
    Fcfs,
    /// Round-Robin with a fixed time quantum. Preempts on quantum
    /// exhaustion only, never on arrival.
    RoundRobin {
        /// Time slice granted per dispatch.
        time_quantum: SimTime,
    },
    /// Shortest-Job / Remaining-Time-First. Re-picks the shortest
    /// remaining job whenever the slot is empty; never interrupts a
    /// running burst.
    Sjf,
    /// Priority, runs each dispatched process to completion.
    PriorityNonPreemptive,
    /// Priority, a strictly more important ready process takes the slot.
    PriorityPreemptive,
}

impl SchedulingPolicy {
    /// Round-Robin with the given quantum.
    pub fn round_robin(time_quantum: SimTime) -> Self {
        SchedulingPolicy::RoundRobin { time_quantum }
    }

    /// Every policy, in canonical order.
    pub fn all(time_quantum: SimTime) -> [SchedulingPolicy; 5] {
        [
            SchedulingPolicy::Fcfs,
            SchedulingPolicy::round_robin(time_quantum),
            SchedulingPolicy::Sjf,
            SchedulingPolicy::PriorityNonPreemptive,
            SchedulingPolicy::PriorityPreemptive,
        ]
    }

    /// Parses an external policy identifier.
    ///
    /// Accepts short ids (`fcfs`, `rr`, `sjf`, `srtf`, `priority`,
    /// `priority_p`), long ids, and display names, case-insensitively.
    /// `time_quantum` is only used for Round-Robin.
    pub fn from_id(id: &str, time_quantum: SimTime) -> Result<Self, ValidationError> {
        let normalized = id.trim().to_ascii_lowercase();
        let policy = match normalized.as_str() {
            "fcfs" | "fifo" | "first come first serve" => SchedulingPolicy::Fcfs,
            "rr" | "round_robin" | "round robin" => {
                validate_time_quantum(time_quantum)?;
                SchedulingPolicy::round_robin(time_quantum)
            }
            "sjf" | "srtf" | "shortest job first" | "shortest remaining time first" => {
                SchedulingPolicy::Sjf
            }
            "priority" | "priority_np" | "priority (non-preemptive)" => {
                SchedulingPolicy::PriorityNonPreemptive
            }
            "priority_p" | "priority_preemptive" | "priority (preemptive)" => {
                SchedulingPolicy::PriorityPreemptive
            }
            _ => {
                return Err(ValidationError::new(
                    ValidationErrorKind::UnknownPolicy,
                    format!("Unknown scheduling policy '{id}'"),
                ))
            }
        };
        Ok(policy)
    }

    /// Display name; also the key under which metrics are recorded.
    pub fn name(&self) -> &'static str {
        match self {
            SchedulingPolicy::Fcfs => FCFS_NAME,
            SchedulingPolicy::RoundRobin { .. } => ROUND_ROBIN_NAME,
            SchedulingPolicy::Sjf => SJF_NAME,
            SchedulingPolicy::PriorityNonPreemptive => PRIORITY_NAME,
            SchedulingPolicy::PriorityPreemptive => PRIORITY_PREEMPTIVE_NAME,
        }
    }

    /// Short identifier accepted by [`SchedulingPolicy::from_id`].
    pub fn id(&self) -> &'static str {
        match self {
            SchedulingPolicy::Fcfs => "fcfs",
            SchedulingPolicy::RoundRobin { .. } => "rr",
            SchedulingPolicy::Sjf => "sjf",
            SchedulingPolicy::PriorityNonPreemptive => "priority",
            SchedulingPolicy::PriorityPreemptive => "priority_p",
        }
    }

    /// Whether the policy can ever take the slot from a running process.
    pub fn is_preemptive(&self) -> bool {
        match self {
            SchedulingPolicy::RoundRobin { .. } | SchedulingPolicy::PriorityPreemptive => true,
            SchedulingPolicy::Fcfs
            | SchedulingPolicy::Sjf
            | SchedulingPolicy::PriorityNonPreemptive => false,
        }
    }

    /// Round-Robin quantum, if any.
    pub fn time_quantum(&self) -> Option<SimTime> {
        match self {
            SchedulingPolicy::RoundRobin { time_quantum } => Some(*time_quantum),
            _ => None,
        }
    }

    /// Ordering keys applied before the final id tie-break.
    ///
    /// Round-Robin has none: it serves the ready queue in queue order.
    pub fn selection_keys(&self) -> &'static [SelectionKey] {
        match self {
            SchedulingPolicy::Fcfs => &[SelectionKey::Arrival],
            SchedulingPolicy::RoundRobin { .. } => &[],
            SchedulingPolicy::Sjf => &[SelectionKey::RemainingTime],
            SchedulingPolicy::PriorityNonPreemptive | SchedulingPolicy::PriorityPreemptive => {
                &[SelectionKey::Priority, SelectionKey::Arrival]
            }
        }
    }

    /// Picks the process that should take the empty execution slot.
    ///
    /// Only processes with `arrival_time <= now` and `remaining_time > 0`
    /// are considered. Returns an index into `ready`, or `None` when no
    /// process is eligible (the slot stays idle).
    pub fn select_next(&self, ready: &VecDeque<ProcessRecord>, now: SimTime) -> Option<usize> {
        match self {
            SchedulingPolicy::RoundRobin { .. } => ready.iter().position(|p| p.is_eligible(now)),
            SchedulingPolicy::Fcfs
            | SchedulingPolicy::Sjf
            | SchedulingPolicy::PriorityNonPreemptive
            | SchedulingPolicy::PriorityPreemptive => {
                keys::select_best(self.selection_keys(), ready, now)
            }
        }
    }

    /// Whether `running` should give up the slot after this tick.
    ///
    /// - Round-Robin: `quantum_used >= time_quantum`, within
    ///   [`QUANTUM_EPSILON`] so accumulated float steps still cut on time.
    /// - Preemptive priority: some eligible ready process has a strictly
    ///   lower priority value than `running`.
    /// - Everything else: never.
    pub fn should_preempt(
        &self,
        running: &ProcessRecord,
        ready: &VecDeque<ProcessRecord>,
        quantum_used: SimTime,
        now: SimTime,
    ) -> bool {
        match self {
            SchedulingPolicy::Fcfs
            | SchedulingPolicy::Sjf
            | SchedulingPolicy::PriorityNonPreemptive => false,
            SchedulingPolicy::RoundRobin { time_quantum } => {
                quantum_used + QUANTUM_EPSILON >= *time_quantum
            }
            SchedulingPolicy::PriorityPreemptive => ready
                .iter()
                .filter(|p| p.is_eligible(now))
                .map(|p| p.priority)
                .min()
                .is_some_and(|best| best < running.priority),
        }
    }

    /// Placement of a preempted process in the ready queue.
    pub fn requeue_position(&self) -> RequeuePosition {
        match self {
            SchedulingPolicy::PriorityPreemptive => RequeuePosition::Front,
            SchedulingPolicy::Fcfs
            | SchedulingPolicy::RoundRobin { .. }
            | SchedulingPolicy::Sjf
            | SchedulingPolicy::PriorityNonPreemptive => RequeuePosition::Back,
        }
    }
}

impl std::fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulingPolicy::RoundRobin { time_quantum } => {
                write!(f, "{} (q={time_quantum})", self.name())
            }
            _ => f.write_str(self.name()),
        }
    }
}

impl std::str::FromStr for SchedulingPolicy {
    type Err = ValidationError;

    /// Parses with the default Round-Robin quantum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchedulingPolicy::from_id(s, DEFAULT_TIME_QUANTUM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(id: u64, arrival: f64, burst: f64, priority: i32) -> ProcessRecord {
        ProcessRecord::new(id, format!("P{id}"), arrival, burst, priority)
    }

    fn queue(processes: Vec<ProcessRecord>) -> VecDeque<ProcessRecord> {
        processes.into_iter().collect()
    }

    #[test]
    fn test_fcfs_earliest_arrival() {
        let ready = queue(vec![make(3, 0.2, 1.0, 0), make(1, 0.1, 5.0, 9), make(2, 0.1, 1.0, 0)]);
        // Arrival 0.1 ties between ids 1 and 2 → id 1
        assert_eq!(SchedulingPolicy::Fcfs.select_next(&ready, 1.0), Some(1));
    }

    #[test]
    fn test_fcfs_ignores_future_arrivals() {
        let ready = queue(vec![make(1, 2.0, 1.0, 0), make(2, 0.5, 1.0, 0)]);
        assert_eq!(SchedulingPolicy::Fcfs.select_next(&ready, 1.0), Some(1));
        let future_only = queue(vec![make(1, 2.0, 1.0, 0)]);
        assert_eq!(SchedulingPolicy::Fcfs.select_next(&future_only, 1.0), None);
    }

    #[test]
    fn test_round_robin_takes_queue_head() {
        // Queue order, not arrival order
        let ready = queue(vec![make(5, 3.0, 1.0, 0), make(1, 0.0, 1.0, 0)]);
        let rr = SchedulingPolicy::round_robin(1.0);
        assert_eq!(rr.select_next(&ready, 3.0), Some(0));
    }

    #[test]
    fn test_sjf_shortest_remaining() {
        let mut partially_run = make(1, 0.0, 5.0, 0);
        partially_run.remaining_time = 0.5;
        let ready = queue(vec![make(2, 0.0, 1.0, 0), partially_run, make(3, 0.0, 0.5, 0)]);
        // Remaining 0.5 ties between ids 1 and 3 → id 1
        assert_eq!(SchedulingPolicy::Sjf.select_next(&ready, 0.0), Some(1));
    }

    #[test]
    fn test_priority_tie_breaks() {
        let ready = queue(vec![
            make(4, 0.3, 1.0, 3),
            make(3, 0.2, 1.0, 1),
            make(2, 0.1, 1.0, 1),
            make(1, 0.1, 1.0, 1),
        ]);
        // Priority 1 → earliest arrival 0.1 → smallest id 1
        assert_eq!(
            SchedulingPolicy::PriorityNonPreemptive.select_next(&ready, 1.0),
            Some(3)
        );
        assert_eq!(
            SchedulingPolicy::PriorityPreemptive.select_next(&ready, 1.0),
            Some(3)
        );
    }

    #[test]
    fn test_empty_queue_selects_nothing() {
        let ready = VecDeque::new();
        for policy in SchedulingPolicy::all(1.0) {
            assert!(policy.select_next(&ready, 0.0).is_none(), "{policy}");
        }
    }

    #[test]
    fn test_non_preemptive_never_preempt() {
        let running = make(1, 0.0, 10.0, 5);
        let ready = queue(vec![make(2, 0.0, 0.1, 0)]);
        for policy in [
            SchedulingPolicy::Fcfs,
            SchedulingPolicy::Sjf,
            SchedulingPolicy::PriorityNonPreemptive,
        ] {
            assert!(!policy.should_preempt(&running, &ready, 100.0, 1.0), "{policy}");
            assert!(!policy.is_preemptive());
        }
    }

    #[test]
    fn test_round_robin_quantum_boundary() {
        let rr = SchedulingPolicy::round_robin(2.0);
        let running = make(1, 0.0, 10.0, 0);
        let ready = VecDeque::new();
        assert!(!rr.should_preempt(&running, &ready, 1.999, 2.0));
        assert!(rr.should_preempt(&running, &ready, 2.0, 2.0));
        assert!(rr.should_preempt(&running, &ready, 2.5, 2.5));
        assert_eq!(rr.requeue_position(), RequeuePosition::Back);
    }

    #[test]
    fn test_round_robin_quantum_absorbs_float_drift() {
        let rr = SchedulingPolicy::round_robin(1.0);
        let running = make(1, 0.0, 10.0, 0);
        let ready = VecDeque::new();
        let used: f64 = (0..10).map(|_| 0.1).sum();
        assert!(used < 1.0);
        assert!(rr.should_preempt(&running, &ready, used, used));
        let nine: f64 = (0..9).map(|_| 0.1).sum();
        assert!(!rr.should_preempt(&running, &ready, nine, nine));
    }

    #[test]
    fn test_round_robin_ignores_arrivals() {
        let rr = SchedulingPolicy::round_robin(2.0);
        let running = make(1, 0.0, 10.0, 5);
        let ready = queue(vec![make(2, 0.5, 1.0, 0)]);
        assert!(!rr.should_preempt(&running, &ready, 0.5, 0.5));
    }

    #[test]
    fn test_priority_preemptive_strictly_higher() {
        let p = SchedulingPolicy::PriorityPreemptive;
        let running = make(1, 0.0, 5.0, 3);
        let same = queue(vec![make(2, 0.0, 1.0, 3)]);
        let higher = queue(vec![make(2, 0.0, 1.0, 4), make(3, 1.0, 1.0, 1)]);
        assert!(!p.should_preempt(&running, &same, 0.0, 1.0));
        assert!(p.should_preempt(&running, &higher, 0.0, 1.0));
        assert!(!p.should_preempt(&running, &VecDeque::new(), 0.0, 1.0));
        assert_eq!(p.requeue_position(), RequeuePosition::Front);
    }

    #[test]
    fn test_priority_preemptive_ignores_future_arrivals() {
        let p = SchedulingPolicy::PriorityPreemptive;
        let running = make(1, 0.0, 5.0, 3);
        let ready = queue(vec![make(2, 2.0, 1.0, 0)]);
        assert!(!p.should_preempt(&running, &ready, 0.0, 1.0));
    }

    #[test]
    fn test_from_id() {
        assert_eq!(SchedulingPolicy::from_id("fcfs", 1.0).unwrap(), SchedulingPolicy::Fcfs);
        assert_eq!(
            SchedulingPolicy::from_id("RR", 1.5).unwrap(),
            SchedulingPolicy::round_robin(1.5)
        );
        assert_eq!(SchedulingPolicy::from_id("srtf", 1.0).unwrap(), SchedulingPolicy::Sjf);
        assert_eq!(
            SchedulingPolicy::from_id("Priority (Preemptive)", 1.0).unwrap(),
            SchedulingPolicy::PriorityPreemptive
        );
        assert_eq!(
            SchedulingPolicy::from_id(" priority ", 1.0).unwrap(),
            SchedulingPolicy::PriorityNonPreemptive
        );
    }

    #[test]
    fn test_from_id_errors() {
        let err = SchedulingPolicy::from_id("lottery", 1.0).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownPolicy);
        let err = SchedulingPolicy::from_id("rr", 0.0).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InvalidTimeQuantum);
    }

    #[test]
    fn test_ids_round_trip() {
        for policy in SchedulingPolicy::all(2.0) {
            let parsed: SchedulingPolicy = policy.id().parse().unwrap();
            assert_eq!(parsed, policy);
            assert_eq!(SchedulingPolicy::from_id(policy.name(), 2.0).unwrap(), policy);
        }
    }

    #[test]
    fn test_names_canonical_order() {
        let names: Vec<_> = SchedulingPolicy::all(1.0).iter().map(|p| p.name()).collect();
        assert_eq!(names, POLICY_NAMES);
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_value(SchedulingPolicy::round_robin(1.0)).unwrap();
        assert_eq!(json["type"], "round_robin");
        assert_eq!(json["time_quantum"], 1.0);
        let back: SchedulingPolicy =
            serde_json::from_str(r#"{ "type": "priority_preemptive" }"#).unwrap();
        assert_eq!(back, SchedulingPolicy::PriorityPreemptive);
    }
}
