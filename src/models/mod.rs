//! Simulation domain models.
//!
//! Provides the data types the engine moves between its collections
//! and the read-only views it hands to external consumers.
//!
//! # Domain Mappings
//!
//! | u-cpusched | Operating System | Game Loop |
//! |------------|------------------|-----------|
//! | ProcessRecord | Process / PCB | Player input, enemy AI step |
//! | owner_tag | Owning program | Game entity |
//! | EngineSnapshot | `ps` output | Process panel, broadcast frame |
//! | ExecutionSlice | Gantt bar | Timeline row |

mod process;
mod snapshot;

pub use process::{ProcessId, ProcessRecord, ProcessState, SimTime};
pub use snapshot::{EngineSnapshot, ExecutionSlice, QueueEntry};
