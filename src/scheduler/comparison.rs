//! Side-by-side policy comparison.
//!
//! # Algorithm
//!
//! For each policy:
//! 1. Build a fresh engine (so every policy sees ids from 1 and t=0).
//! 2. Replay the workload: before each tick, submit every arrival whose
//!    time has been reached.
//! 3. Tick at the configured step until all arrivals have completed or
//!    the tick horizon is exhausted.
//! 4. Collect the policy's stats over the elapsed simulation time.
//!
//! Arrivals are quantized to tick boundaries, so a scripted arrival at
//! `t` enters the engine at the first tick boundary `>= t`.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{PolicyStats, SchedulingEngine};
use crate::config::SimulationConfig;
use crate::dispatching::SchedulingPolicy;
use crate::models::SimTime;
use crate::workload::Workload;

const ARRIVAL_TOLERANCE: SimTime = 1e-9;

/// Result of replaying a workload under one policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Policy that was active.
    pub policy: SchedulingPolicy,
    /// Display name of the policy.
    pub policy_name: String,
    /// Aggregated timings.
    pub stats: PolicyStats,
    /// Context switches over the run.
    pub context_switches: u64,
    /// Latest completion time.
    pub makespan: SimTime,
    /// Arrivals the engine refused (invalid burst time).
    pub rejected: usize,
    /// Whether every accepted arrival completed within the horizon.
    pub drained: bool,
}

/// Per-policy results for one workload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// One row per policy, in the order requested.
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonReport {
    /// Row for a policy display name.
    pub fn row(&self, policy_name: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.policy_name == policy_name)
    }

    /// Policy with the lowest average waiting time.
    pub fn best_by_waiting(&self) -> Option<&ComparisonRow> {
        self.best_by(|s| s.avg_waiting)
    }

    /// Policy with the lowest average turnaround time.
    pub fn best_by_turnaround(&self) -> Option<&ComparisonRow> {
        self.best_by(|s| s.avg_turnaround)
    }

    /// Policy with the lowest average response time.
    pub fn best_by_response(&self) -> Option<&ComparisonRow> {
        self.best_by(|s| s.avg_response)
    }

    fn best_by<F: Fn(&PolicyStats) -> f64>(&self, metric: F) -> Option<&ComparisonRow> {
        self.rows
            .iter()
            .filter(|r| r.stats.count > 0)
            .min_by(|a, b| {
                metric(&a.stats)
                    .partial_cmp(&metric(&b.stats))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Replays `workload` once per policy and reports the results.
///
/// # Example
/// ```
/// use u_cpusched::config::SimulationConfig;
/// use u_cpusched::dispatching::SchedulingPolicy;
/// use u_cpusched::scheduler::compare_policies;
/// use u_cpusched::workload::{Arrival, Workload};
///
/// let workload = Workload::new()
///     .with_arrival(Arrival::new(0.0, "enemy", 4.0, 3))
///     .with_arrival(Arrival::new(0.5, "player", 0.5, 1));
/// let config = SimulationConfig::default().with_time_step(0.25);
///
/// let report = compare_policies(&workload, &SchedulingPolicy::all(2.0), &config);
/// assert_eq!(report.rows.len(), 5);
/// assert!(report.rows.iter().all(|r| r.drained));
/// ```
pub fn compare_policies(
    workload: &Workload,
    policies: &[SchedulingPolicy],
    config: &SimulationConfig,
) -> ComparisonReport {
    let rows = policies
        .iter()
        .map(|policy| replay(workload, *policy, config))
        .collect();
    ComparisonReport { rows }
}

fn replay(
    workload: &Workload,
    policy: SchedulingPolicy,
    config: &SimulationConfig,
) -> ComparisonRow {
    let mut engine = SchedulingEngine::new()
        .with_policy(policy)
        .with_completion_epsilon(config.completion_epsilon);
    let dt = config.time_step;
    let mut next = 0;
    let mut rejected = 0;
    let mut ticks = 0;

    let step_ok = dt.is_finite() && dt > 0.0;
    if !step_ok {
        warn!(dt, "comparison needs a positive finite time step");
    }

    while step_ok && ticks < config.max_ticks {
        while let Some(arrival) = workload.arrivals.get(next) {
            if arrival.at > engine.now() + ARRIVAL_TOLERANCE {
                break;
            }
            if engine
                .add_process(arrival.owner_tag.clone(), arrival.burst_time, arrival.priority)
                .is_err()
            {
                rejected += 1;
            }
            next += 1;
        }
        if next >= workload.arrivals.len() && engine.is_idle() {
            break;
        }
        engine.tick(dt);
        ticks += 1;
    }

    let snapshot = engine.snapshot();
    let drained = next >= workload.arrivals.len() && engine.is_idle();
    let makespan = snapshot
        .completed
        .iter()
        .filter_map(|p| p.completion_time)
        .fold(0.0, f64::max);
    let stats = engine.metrics().stats_for(policy.name(), engine.now());

    info!(
        policy = policy.name(),
        completed = stats.count,
        avg_waiting = stats.avg_waiting,
        ticks,
        drained,
        "comparison run finished"
    );

    ComparisonRow {
        policy,
        policy_name: policy.name().to_string(),
        stats,
        context_switches: engine.context_switch_count(),
        makespan,
        rejected,
        drained,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::{FCFS_NAME, PRIORITY_PREEMPTIVE_NAME, ROUND_ROBIN_NAME};
    use crate::workload::{Arrival, OwnerProfile, WorkloadGenerator};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const EPS: f64 = 1e-9;

    /// A long enemy step followed by two short player inputs.
    fn convoy_workload() -> Workload {
        Workload::new()
            .with_arrival(Arrival::new(0.0, "enemy", 4.0, 3))
            .with_arrival(Arrival::new(0.5, "player", 0.5, 1))
            .with_arrival(Arrival::new(1.0, "player", 0.5, 1))
    }

    fn config() -> SimulationConfig {
        SimulationConfig::default().with_time_step(0.25)
    }

    #[test]
    fn test_convoy_effect_under_fcfs() {
        let report = compare_policies(&convoy_workload(), &[SchedulingPolicy::Fcfs], &config());
        let row = report.row(FCFS_NAME).unwrap();
        assert!(row.drained);
        assert_eq!(row.stats.count, 3);
        // Both player inputs wait behind the enemy: 0 + 3.5 + 3.5
        assert!((row.stats.avg_waiting - 7.0 / 3.0).abs() < EPS);
        assert!((row.makespan - 5.0).abs() < EPS);
        assert_eq!(row.context_switches, 3);
    }

    #[test]
    fn test_round_robin_breaks_convoy() {
        let report = compare_policies(
            &convoy_workload(),
            &[SchedulingPolicy::round_robin(2.0)],
            &config(),
        );
        let row = report.row(ROUND_ROBIN_NAME).unwrap();
        // Enemy cut at t=2.0: waits 1.0; inputs wait 1.5 each
        assert!((row.stats.avg_waiting - 4.0 / 3.0).abs() < EPS);
        assert_eq!(row.context_switches, 4);
    }

    #[test]
    fn test_preemptive_priority_best_for_inputs() {
        let report = compare_policies(&convoy_workload(), &SchedulingPolicy::all(2.0), &config());
        assert_eq!(report.rows.len(), 5);
        assert!(report.rows.iter().all(|r| r.drained && r.stats.count == 3));
        assert!(report
            .rows
            .iter()
            .all(|r| (r.makespan - 5.0).abs() < EPS));

        let best = report.best_by_waiting().unwrap();
        assert_eq!(best.policy_name, PRIORITY_PREEMPTIVE_NAME);
        assert!((best.stats.avg_waiting - 0.5).abs() < EPS);
        assert_eq!(
            report.best_by_response().unwrap().policy_name,
            PRIORITY_PREEMPTIVE_NAME
        );
    }

    #[test]
    fn test_rejected_arrivals_counted() {
        let workload = Workload::new()
            .with_arrival(Arrival::new(0.0, "ok", 0.5, 1))
            .with_arrival(Arrival::new(0.0, "bad", -1.0, 1));
        let report = compare_policies(&workload, &[SchedulingPolicy::Fcfs], &config());
        let row = &report.rows[0];
        assert_eq!(row.rejected, 1);
        assert_eq!(row.stats.count, 1);
        assert!(row.drained);
    }

    #[test]
    fn test_horizon_stops_run() {
        let workload = Workload::new().with_arrival(Arrival::new(0.0, "long", 100.0, 1));
        let config = config().with_max_ticks(10);
        let report = compare_policies(&workload, &[SchedulingPolicy::Fcfs], &config);
        assert!(!report.rows[0].drained);
        assert_eq!(report.rows[0].stats.count, 0);
    }

    #[test]
    fn test_empty_workload() {
        let report = compare_policies(&Workload::new(), &SchedulingPolicy::all(1.0), &config());
        assert!(report.rows.iter().all(|r| r.drained && r.stats.count == 0));
        assert!(report.best_by_waiting().is_none());
        assert!(report.best_by_turnaround().is_none());
    }

    #[test]
    fn test_generated_workload_drains_everywhere() {
        let generator = WorkloadGenerator::new()
            .with_profile(OwnerProfile::player("player"))
            .with_profile(OwnerProfile::enemy("enemy-1"))
            .with_profile(OwnerProfile::enemy("enemy-2"));
        let workload = generator.script(20.0, 1.0 / 30.0, &mut SmallRng::seed_from_u64(21));
        let report = compare_policies(
            &workload,
            &SchedulingPolicy::all(2.0),
            &SimulationConfig::default(),
        );
        for row in &report.rows {
            assert!(row.drained, "{}", row.policy_name);
            assert_eq!(row.stats.count, workload.len(), "{}", row.policy_name);
            assert!(row.stats.avg_waiting >= 0.0);
        }
    }
}
