//! Job-shop scheduling: an exact solver and a metaheuristic over one model.
//!
//! A job-shop instance is a set of machines and a set of jobs; each job is a
//! fixed chain of operations, every operation bound to one machine with a
//! fixed duration, and a job may require other jobs to finish before it
//! starts. The objective is the makespan: the completion time of the last
//! operation.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Operation`, `Job`, `ProblemModel`,
//!   `Assignment`, `Schedule`
//! - **`validation`**: Input integrity checks (machine refs, durations,
//!   dependency cycles)
//! - **`simulation`**: Dispatch order → timed schedule (the shared evaluator)
//! - **`dispatching`**: Branch ordering rules (LRPT, fewest dependencies)
//! - **`bnb`**: Exact depth-first branch-and-bound
//! - **`cultural`**: Cultural algorithm (GA + belief space)
//! - **`stats`**: Search counters
//! - **`report`**: Tables and KPIs for presenting a schedule
//!
//! # Example
//!
//! ```
//! use u_jobshop::{branch_and_bound_solve, build_problem, cultural_algorithm_solve, JobSpec};
//!
//! let problem = build_problem(
//!     2,
//!     vec![
//!         JobSpec::new().with_operation(0, 3).with_operation(1, 2),
//!         JobSpec::new().with_operation(1, 4).with_operation(0, 1),
//!     ],
//! )
//! .unwrap();
//!
//! let exact = branch_and_bound_solve(&problem);
//! assert_eq!(exact.makespan(), Some(6));
//!
//! let (_, makespan) = cultural_algorithm_solve(&problem, 20, 20, 0.1);
//! assert!(makespan >= 6);
//! ```
//!
//! # Logging
//!
//! Solvers emit `tracing` events (`info` at start and finish, `debug` on
//! improvements, `trace` per generation). No subscriber is installed here.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"
//! - Reynolds (1994), "An Introduction to Cultural Algorithms"

pub mod bnb;
pub mod cultural;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod report;
pub mod simulation;
pub mod stats;
pub mod validation;

pub use bnb::branch_and_bound_solve;
pub use cultural::cultural_algorithm_solve;
pub use error::{Result, ScheduleError, SequenceError};
pub use models::{JobSpec, ProblemModel, Schedule};
pub use simulation::simulate;
pub use stats::SearchStats;

/// Validates the input and builds a [`ProblemModel`].
///
/// # Errors
/// [`ScheduleError::Validation`] listing every problem found.
pub fn build_problem(machine_count: usize, jobs: Vec<JobSpec>) -> Result<ProblemModel> {
    ProblemModel::new(machine_count, jobs)
}
