//! Deterministic CPU scheduling simulator.
//!
//! Models a single execution slot shared by processes submitted by game
//! entities, advanced by a fixed or variable time step. The active policy
//! can be swapped at run time and every completion is measured under the
//! policy that finished it.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ProcessRecord`, `ProcessState`,
//!   `EngineSnapshot`, `ExecutionSlice`
//! - **`dispatching`**: `SchedulingPolicy` (FCFS, Round-Robin, SJF,
//!   priority) and its selection keys
//! - **`scheduler`**: `SchedulingEngine`, `MetricsCollector`, and
//!   policy comparison over a replayed workload
//! - **`workload`**: Scripted arrivals and randomized owner profiles
//! - **`config`**: `SimulationConfig` tunables
//! - **`validation`**: Input checks for process, tick, and config values
//!
//! # Example
//!
//! ```
//! use u_cpusched::dispatching::SchedulingPolicy;
//! use u_cpusched::scheduler::SchedulingEngine;
//!
//! let mut engine = SchedulingEngine::new();
//! engine.add_process("player", 1.0, 1).unwrap();
//! engine.add_process("enemy", 1.0, 3).unwrap();
//!
//! assert!(engine.run_until_idle(0.1, 100));
//! let stats = engine.current_stats();
//! assert_eq!(stats.count, 2);
//! assert!((stats.avg_waiting - 0.5).abs() < 1e-9);
//!
//! engine.reset();
//! engine.select_policy(SchedulingPolicy::round_robin(0.5));
//! ```
//!
//! # References
//!
//! - Silberschatz et al. (2018), "Operating System Concepts", Ch. 5
//! - Tanenbaum & Bos (2014), "Modern Operating Systems", Ch. 2.4
//! - Arpaci-Dusseau (2018), "Operating Systems: Three Easy Pieces", Ch. 7-9

pub mod config;
pub mod dispatching;
pub mod models;
pub mod scheduler;
pub mod validation;
pub mod workload;
