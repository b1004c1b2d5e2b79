//! Operation model.
//!
//! An operation is the smallest schedulable unit of work: one fixed
//! machine, one processing duration, one position inside its job.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2

use serde::{Deserialize, Serialize};

/// A single processing step of a job.
///
/// Immutable once the owning [`ProblemModel`](super::ProblemModel) is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Owning job.
    pub job_id: usize,
    /// Position within the job (0-indexed).
    pub index: usize,
    /// Machine that must process this operation.
    pub machine_id: usize,
    /// Processing time.
    pub duration: i64,
}

impl Operation {
    /// Creates a new operation.
    pub fn new(job_id: usize, index: usize, machine_id: usize, duration: i64) -> Self {
        Self {
            job_id,
            index,
            machine_id,
            duration,
        }
    }
}
