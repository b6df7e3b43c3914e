//! Per-policy performance metrics.
//!
//! Aggregates the timings of completed processes under the name of the
//! policy that was active when they completed.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Avg Waiting | Mean of `turnaround - burst` (clamped at 0) |
//! | Avg Turnaround | Mean of `completion - arrival` |
//! | Avg Response | Mean of `first dispatch - arrival` |
//! | Avg Completion | Mean completion timestamp |
//! | Throughput | Completed processes per unit of elapsed time |
//!
//! The collector has no clock of its own: elapsed time for throughput
//! is supplied by the caller.
//!
//! # Reference
//! Silberschatz et al. (2018), "Operating System Concepts", Ch. 5.2: Scheduling Criteria

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dispatching::POLICY_NAMES;
use crate::models::{ProcessRecord, SimTime};

/// Summary statistics for one policy.
///
/// All time values are simulated seconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyStats {
    /// Mean waiting time.
    pub avg_waiting: f64,
    /// Mean turnaround time.
    pub avg_turnaround: f64,
    /// Mean response time.
    pub avg_response: f64,
    /// Mean completion timestamp.
    pub avg_completion: f64,
    /// Completed processes per second of elapsed time.
    pub throughput: f64,
    /// Completed process count.
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
struct PolicyAggregate {
    waiting_times: Vec<SimTime>,
    turnaround_times: Vec<SimTime>,
    response_times: Vec<SimTime>,
    total_completion: SimTime,
    count: usize,
}

impl PolicyAggregate {
    fn stats(&self, elapsed: SimTime) -> PolicyStats {
        if self.count == 0 {
            return PolicyStats::default();
        }
        let n = self.count as f64;
        let mean = |values: &[SimTime]| {
            if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            }
        };
        let throughput = if elapsed > 0.0 { n / elapsed } else { 0.0 };

        PolicyStats {
            avg_waiting: mean(&self.waiting_times),
            avg_turnaround: mean(&self.turnaround_times),
            avg_response: mean(&self.response_times),
            avg_completion: self.total_completion / n,
            throughput,
            count: self.count,
        }
    }
}

/// Aggregates completed-process timings keyed by policy name.
///
/// The five built-in policy names are known from construction, so
/// comparison views list them even before any process completes.
///
/// # Example
/// ```
/// use u_cpusched::models::ProcessRecord;
/// use u_cpusched::scheduler::MetricsCollector;
///
/// let mut done = ProcessRecord::new(1, "player", 0.0, 1.0, 1);
/// done.start_time = Some(0.0);
/// done.completion_time = Some(2.0);
/// done.turnaround_time = Some(2.0);
/// done.waiting_time = Some(1.0);
///
/// let mut metrics = MetricsCollector::new();
/// metrics.record_completion("Round Robin", &done);
/// let stats = metrics.stats_for("Round Robin", 4.0);
/// assert_eq!(stats.count, 1);
/// assert!((stats.throughput - 0.25).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    order: Vec<String>,
    aggregates: HashMap<String, PolicyAggregate>,
}

impl MetricsCollector {
    /// Creates a collector that knows every built-in policy.
    pub fn new() -> Self {
        let mut collector = Self {
            order: Vec::new(),
            aggregates: HashMap::new(),
        };
        for name in POLICY_NAMES {
            collector.register(name);
        }
        collector
    }

    /// Makes a policy name known without recording anything.
    pub fn register(&mut self, policy_name: &str) {
        self.aggregate_mut(policy_name);
    }

    fn aggregate_mut(&mut self, policy_name: &str) -> &mut PolicyAggregate {
        if !self.aggregates.contains_key(policy_name) {
            self.order.push(policy_name.to_string());
        }
        self.aggregates
            .entry(policy_name.to_string())
            .or_default()
    }

    /// Records one completed process under `policy_name`.
    ///
    /// Unknown names are registered on first use. Missing completion
    /// fields count as zero; the engine always writes them before calling.
    pub fn record_completion(&mut self, policy_name: &str, process: &ProcessRecord) {
        let aggregate = self.aggregate_mut(policy_name);

        aggregate
            .waiting_times
            .push(process.waiting_time.unwrap_or(0.0).max(0.0));
        aggregate
            .turnaround_times
            .push(process.turnaround_time.unwrap_or(0.0));
        aggregate
            .response_times
            .push(process.response_time().unwrap_or(0.0));
        aggregate.total_completion += process.completion_time.unwrap_or(0.0);
        aggregate.count += 1;
    }

    /// Summary for one policy. All zeros when nothing was recorded.
    ///
    /// # Arguments
    /// * `policy_name` - Display name the completions were recorded under.
    /// * `elapsed` - Time window for throughput; `<= 0` yields zero throughput.
    pub fn stats_for(&self, policy_name: &str, elapsed: SimTime) -> PolicyStats {
        self.aggregates
            .get(policy_name)
            .map(|a| a.stats(elapsed))
            .unwrap_or_default()
    }

    /// Summaries for every known policy, in registration order.
    pub fn comparison(&self, elapsed: SimTime) -> Vec<(String, PolicyStats)> {
        self.order
            .iter()
            .map(|name| (name.clone(), self.stats_for(name, elapsed)))
            .collect()
    }

    /// Known policy names, in registration order.
    pub fn known_policies(&self) -> &[String] {
        &self.order
    }

    /// Completions recorded across all policies.
    pub fn total_completed(&self) -> usize {
        self.aggregates.values().map(|a| a.count).sum()
    }

    /// Clears every aggregate; known policy names are kept.
    pub fn reset(&mut self) {
        for aggregate in self.aggregates.values_mut() {
            *aggregate = PolicyAggregate::default();
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
