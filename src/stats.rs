//! Search statistics.
//!
//! Passive counters attached to a solver run for diagnostics. They never
//! influence the search itself.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Aggregate counters for one search run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Search-tree nodes visited (recursive calls).
    pub nodes_visited: u64,
    /// Branches cut: bound exceeded, dead ends, and dependency-blocked jobs.
    pub branches_pruned: u64,
    /// Complete schedules reached.
    pub solutions_found: u64,
    /// Deepest recursion level reached (operations dispatched on one path).
    pub max_depth: usize,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
    /// Whether the run stopped early on its node budget.
    pub truncated: bool,
}

impl SearchStats {
    /// Fraction of visited nodes that ended in a prune (0.0 if none visited).
    pub fn prune_ratio(&self) -> f64 {
        if self.nodes_visited == 0 {
            0.0
        } else {
            self.branches_pruned as f64 / self.nodes_visited as f64
        }
    }
}

/// Live counter set used while a search runs.
#[derive(Debug, Clone)]
pub struct Tracker {
    stats: SearchStats,
    started: Instant,
}

impl Tracker {
    /// Starts tracking; the clock starts now.
    pub fn start() -> Self {
        Self {
            stats: SearchStats::default(),
            started: Instant::now(),
        }
    }

    /// Records a visited node at `depth`.
    #[inline]
    pub fn visit(&mut self, depth: usize) {
        self.stats.nodes_visited += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
    }

    /// Records a pruned branch.
    #[inline]
    pub fn prune(&mut self) {
        self.stats.branches_pruned += 1;
    }

    /// Records a complete schedule.
    #[inline]
    pub fn solution(&mut self) {
        self.stats.solutions_found += 1;
    }

    /// Marks the run as stopped by its budget.
    pub fn truncate(&mut self) {
        self.stats.truncated = true;
    }

    /// Nodes visited so far.
    pub fn nodes_visited(&self) -> u64 {
        self.stats.nodes_visited
    }

    /// Stops the clock and returns the final counters.
    pub fn finish(mut self) -> SearchStats {
        self.stats.elapsed = self.started.elapsed();
        self.stats
    }
}
