//! Job model.
//!
//! A job is an ordered chain of operations. Operation `k` may only be
//! dispatched after operations `0..k` of the same job, and the first
//! operation may only be dispatched once every prerequisite job is complete.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};

use super::Operation;

/// Raw job description supplied by an input-collection layer.
///
/// Turned into a [`Job`] by [`ProblemModel::new`](super::ProblemModel::new),
/// which validates it first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Operations as `(machine_id, duration)` pairs, in processing order.
    pub operations: Vec<(usize, i64)>,
    /// IDs of jobs that must be fully complete before this job starts.
    #[serde(default)]
    pub dependencies: Vec<usize>,
}

impl JobSpec {
    /// Creates an empty job spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation on `machine_id` lasting `duration`.
    pub fn with_operation(mut self, machine_id: usize, duration: i64) -> Self {
        self.operations.push((machine_id, duration));
        self
    }

    /// Adds a prerequisite job.
    pub fn with_dependency(mut self, job_id: usize) -> Self {
        self.dependencies.push(job_id);
        self
    }
}

/// A validated job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    /// Job identifier (its index in the problem).
    pub id: usize,
    /// Operations in processing order.
    pub operations: Vec<Operation>,
    /// Prerequisite job IDs.
    pub dependencies: Vec<usize>,
    /// Tie-break weight: the negated dependency count. Higher = more urgent.
    pub priority: i32,
    /// `remaining[k]` = total duration of operations `k..`, with a trailing
    /// zero so `remaining[len]` is valid.
    #[serde(skip)]
    remaining: Vec<i64>,
}

impl Job {
    pub(crate) fn from_spec(id: usize, spec: &JobSpec) -> Self {
        let operations: Vec<Operation> = spec
            .operations
            .iter()
            .enumerate()
            .map(|(index, &(machine_id, duration))| Operation::new(id, index, machine_id, duration))
            .collect();

        let mut remaining = vec![0; operations.len() + 1];
        for k in (0..operations.len()).rev() {
            remaining[k] = remaining[k + 1] + operations[k].duration;
        }

        Self {
            id,
            operations,
            dependencies: spec.dependencies.clone(),
            priority: -(spec.dependencies.len() as i32),
            remaining,
        }
    }

    /// Next pending operation given how many have been dispatched.
    #[inline]
    pub fn next_operation(&self, progress: usize) -> Option<&Operation> {
        self.operations.get(progress)
    }

    /// Whether all operations have been dispatched.
    #[inline]
    pub fn is_complete(&self, progress: usize) -> bool {
        progress >= self.operations.len()
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Total processing time across all operations.
    pub fn total_duration(&self) -> i64 {
        self.remaining[0]
    }

    /// Processing time of the operations not yet dispatched.
    #[inline]
    pub fn remaining_duration(&self, progress: usize) -> i64 {
        self.remaining
            .get(progress)
            .copied()
            .unwrap_or(0)
    }

    /// Whether this job has any prerequisite jobs.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}
