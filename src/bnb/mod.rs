//! Exact branch-and-bound search.
//!
//! Builds schedules one operation at a time. At every node the dispatchable
//! set holds the next operation of each unfinished job whose prerequisite
//! jobs are complete; candidates are tried in [`BranchRule`] order. A child
//! is expanded only while its partial makespan stays strictly below the best
//! complete makespan found so far. Each dispatch is undone on every exit
//! path (including pruning) by a scoped guard around a
//! [`Timeline`](crate::simulation::Timeline) checkpoint.
//!
//! The search is exhaustive unless a node limit is configured, so with no
//! limit the result is optimal over semi-active schedules.
//!
//! # Reference
//! - Brucker (2007), "Scheduling Algorithms", Ch. 6
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7

mod config;
mod search;

pub use config::{BranchAndBoundConfig, BranchRule};
pub use search::{branch_and_bound_solve, BranchAndBound, BranchAndBoundResult};
