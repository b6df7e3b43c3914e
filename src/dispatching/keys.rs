//! Selection keys and sequential comparison.
//!
//! Each selection policy orders eligible processes by a chain of keys:
//! the first key that separates two processes decides, and a final
//! comparison by process id makes every order total and deterministic.
//!
//! # Score Convention
//! All keys return lower scores for processes that should run first.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::models::{ProcessRecord, SimTime};

/// Scores closer than this are treated as tied.
pub(crate) const KEY_EPSILON: f64 = 1e-9;

/// A single ordering criterion over processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKey {
    /// Earliest arrival first.
    Arrival,
    /// Least remaining execution time first.
    RemainingTime,
    /// Lowest priority value (most important) first.
    Priority,
}

impl SelectionKey {
    /// Key name.
    pub fn name(&self) -> &'static str {
        match self {
            SelectionKey::Arrival => "ARRIVAL",
            SelectionKey::RemainingTime => "REMAINING",
            SelectionKey::Priority => "PRIORITY",
        }
    }

    /// Score for a process. Lower = selected earlier.
    pub fn score(&self, process: &ProcessRecord) -> f64 {
        match self {
            SelectionKey::Arrival => process.arrival_time,
            SelectionKey::RemainingTime => process.remaining_time,
            SelectionKey::Priority => process.priority as f64,
        }
    }
}

/// Compares two processes key by key, falling back to id.
pub(crate) fn compare_sequential(
    keys: &[SelectionKey],
    a: &ProcessRecord,
    b: &ProcessRecord,
) -> Ordering {
    for key in keys {
        let score_a = key.score(a);
        let score_b = key.score(b);

        if (score_a - score_b).abs() > KEY_EPSILON {
            return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
        }
    }

    a.id.cmp(&b.id)
}

/// Index of the best eligible process under `keys`, if any.
pub(crate) fn select_best(
    keys: &[SelectionKey],
    ready: &VecDeque<ProcessRecord>,
    now: SimTime,
) -> Option<usize> {
    ready
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_eligible(now))
        .min_by(|(_, a), (_, b)| compare_sequential(keys, a, b))
        .map(|(idx, _)| idx)
}
