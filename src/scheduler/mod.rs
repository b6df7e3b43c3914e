//! Tick-driven scheduling engine and performance metrics.
//!
//! The engine owns the ready queue, the single execution slot, and the
//! completed list. It advances on an externally supplied time delta and
//! delegates selection and preemption decisions to the active policy.
//!
//! # Metrics
//!
//! `MetricsCollector` aggregates waiting, turnaround, response, and
//! completion times per policy name. `compare_policies` replays one
//! workload under several policies for a side-by-side report.
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4

mod comparison;
mod engine;
mod metrics;

pub use comparison::{compare_policies, ComparisonReport, ComparisonRow};
pub use engine::SchedulingEngine;
pub use metrics::{MetricsCollector, PolicyStats};
