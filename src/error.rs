//! Crate error types.
//!
//! Three failure families, each surfaced at a different point:
//!
//! - [`ScheduleError::Validation`]: malformed instance, raised by
//!   [`ProblemModel::new`](crate::models::ProblemModel::new) before any search.
//! - [`ScheduleError::InvalidSequence`]: a caller handed the simulation
//!   engine an ordering that cannot be dispatched. A programming error.
//! - [`ScheduleError::NoSolution`]: branch-and-bound finished without a
//!   single complete schedule.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The problem instance failed validation.
    #[error("invalid problem instance: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// A dispatch ordering was rejected by the simulation engine.
    #[error("invalid sequence: {0}")]
    InvalidSequence(#[from] SequenceError),

    /// The exact search found no complete schedule.
    #[error("no feasible schedule found")]
    NoSolution,
}

/// Why a dispatch ordering could not be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The ordering does not contain exactly one entry per operation.
    #[error("ordering has {actual} entries, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    /// An entry names a job that is not part of the problem.
    #[error("position {position} references unknown job {job_id}")]
    UnknownJob { position: usize, job_id: usize },

    /// An entry names a job whose operations are all dispatched already.
    #[error("position {position} references job {job_id}, which has no pending operation")]
    ExhaustedJob { position: usize, job_id: usize },

    /// A whole-job machine assignment names a machine that doesn't exist.
    #[error("position {position} references unknown machine {machine_id}")]
    UnknownMachine { position: usize, machine_id: usize },

    /// An entry starts a job before all of its prerequisite jobs completed.
    #[error("position {position} starts job {job_id} before prerequisite job {dependency} completed")]
    DependencyPending {
        position: usize,
        job_id: usize,
        dependency: usize,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<ValidationError>> for ScheduleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Validation(errors)
    }
}
