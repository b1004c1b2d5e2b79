//! Dispatch context for rule evaluation.

use crate::models::ProblemModel;
use crate::simulation::Timeline;

/// Search state visible to dispatching rules.
///
/// Borrowed from the live timeline, so building one is free.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// The problem being solved.
    pub problem: &'a ProblemModel,
    /// Operations dispatched per job.
    pub progress: &'a [usize],
}

impl<'a> DispatchContext<'a> {
    /// Creates a context from a progress vector.
    pub fn new(problem: &'a ProblemModel, progress: &'a [usize]) -> Self {
        Self { problem, progress }
    }

    /// Creates a context from a timeline.
    pub fn from_timeline(timeline: &'a Timeline<'_>) -> Self {
        Self {
            problem: timeline.problem(),
            progress: timeline.progress(),
        }
    }

    /// Processing time of a job's not-yet-dispatched operations.
    pub fn remaining_work(&self, job_id: usize) -> i64 {
        match (self.problem.job(job_id), self.progress.get(job_id)) {
            (Some(job), Some(&progress)) => job.remaining_duration(progress),
            _ => 0,
        }
    }
}
