//! Point-in-time views of engine state.
//!
//! Snapshots are owned copies. Presentation and transport layers poll
//! them every tick and may hand them to another thread; nothing in a
//! snapshot refers back into the engine.

use serde::{Deserialize, Serialize};

use super::{ProcessId, ProcessRecord, ProcessState, SimTime};

/// A contiguous interval during which one process held the execution slot.
///
/// Recorded whenever the slot is vacated (completion or preemption).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSlice {
    /// Process that ran.
    pub process_id: ProcessId,
    /// Owner tag of the process (denormalized for Gantt rendering).
    pub owner_tag: String,
    /// Slice start time.
    pub start: SimTime,
    /// Slice end time.
    pub end: SimTime,
}

impl ExecutionSlice {
    /// Slice length.
    #[inline]
    pub fn duration(&self) -> SimTime {
        self.end - self.start
    }
}

/// One row of the process-queue view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Lifecycle state (running or ready).
    pub state: ProcessState,
    /// Copy of the process.
    pub process: ProcessRecord,
}

/// Read-only copy of the engine's collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Simulation clock at capture time.
    pub now: SimTime,
    /// Display name of the active policy.
    pub policy_name: String,
    /// Context switches since the last reset.
    pub context_switch_count: u64,
    /// Process in the execution slot, if any.
    pub running: Option<ProcessRecord>,
    /// Ready queue, in queue order.
    pub ready: Vec<ProcessRecord>,
    /// Completed processes, in completion order.
    pub completed: Vec<ProcessRecord>,
}

impl EngineSnapshot {
    /// Running process first, then the ready queue in order.
    pub fn process_queue(&self) -> Vec<QueueEntry> {
        let running = self.running.iter().map(|p| QueueEntry {
            state: ProcessState::Running,
            process: p.clone(),
        });
        let ready = self.ready.iter().map(|p| QueueEntry {
            state: ProcessState::Ready,
            process: p.clone(),
        });
        running.chain(ready).collect()
    }

    /// The last `limit` completed processes, oldest first.
    pub fn recent_completed(&self, limit: usize) -> &[ProcessRecord] {
        let skip = self.completed.len().saturating_sub(limit);
        &self.completed[skip..]
    }

    /// Ready plus running.
    pub fn active_count(&self) -> usize {
        self.ready.len() + usize::from(self.running.is_some())
    }

    /// Number of completed processes.
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Every process the engine knows about.
    pub fn total_count(&self) -> usize {
        self.active_count() + self.completed_count()
    }

    /// Whether the engine held no processes at capture time.
    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}
