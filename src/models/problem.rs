//! Problem model.
//!
//! An immutable, validated job-shop instance: a machine count and a list of
//! jobs, each a chain of operations bound to single machines, optionally
//! depending on other jobs. Both solvers and the simulation engine read it;
//! nothing mutates it after construction.

use serde::Serialize;

use super::{Job, JobSpec, Operation};
use crate::error::Result;
use crate::validation::validate_input;

/// A validated job-shop problem instance.
///
/// Job IDs are contiguous: job `i` is `jobs()[i]`.
///
/// # Example
/// ```
/// use u_jobshop::models::{JobSpec, ProblemModel};
///
/// let problem = ProblemModel::new(
///     2,
///     vec![
///         JobSpec::new().with_operation(0, 3).with_operation(1, 2),
///         JobSpec::new().with_operation(1, 4).with_operation(0, 1),
///     ],
/// )
/// .unwrap();
/// assert_eq!(problem.total_operation_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemModel {
    machine_count: usize,
    jobs: Vec<Job>,
    total_operations: usize,
}

impl ProblemModel {
    /// Validates the input and builds the model.
    ///
    /// # Errors
    /// [`ScheduleError::Validation`](crate::ScheduleError::Validation) with
    /// every detected issue when the instance is malformed.
    pub fn new(machine_count: usize, jobs: Vec<JobSpec>) -> Result<Self> {
        validate_input(machine_count, &jobs)?;
        Ok(Self::from_specs(machine_count, &jobs))
    }

    fn from_specs(machine_count: usize, specs: &[JobSpec]) -> Self {
        let jobs: Vec<Job> = specs
            .iter()
            .enumerate()
            .map(|(id, spec)| Job::from_spec(id, spec))
            .collect();
        let total_operations = jobs.iter().map(Job::operation_count).sum();
        Self {
            machine_count,
            jobs,
            total_operations,
        }
    }

    /// Builds a model without validation, for exercising the solvers on
    /// instances `new` would reject.
    #[cfg(test)]
    pub(crate) fn unchecked(machine_count: usize, jobs: Vec<JobSpec>) -> Self {
        Self::from_specs(machine_count, &jobs)
    }

    /// Number of machines.
    pub fn machine_count(&self) -> usize {
        self.machine_count
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// All jobs, indexed by ID.
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Looks up a job by ID.
    pub fn job(&self, job_id: usize) -> Option<&Job> {
        self.jobs.get(job_id)
    }

    /// Total number of operations across all jobs.
    pub fn total_operation_count(&self) -> usize {
        self.total_operations
    }

    /// A job's next pending operation given its progress counter.
    pub fn next_operation(&self, job_id: usize, progress: usize) -> Option<&Operation> {
        self.jobs.get(job_id)?.next_operation(progress)
    }

    /// Whether a job is complete given its progress counter.
    ///
    /// Unknown job IDs are reported as complete: they have nothing pending.
    pub fn is_job_complete(&self, job_id: usize, progress: usize) -> bool {
        self.jobs
            .get(job_id)
            .map_or(true, |job| job.is_complete(progress))
    }

    /// Whether every job is complete under the given progress vector.
    pub fn all_complete(&self, progress: &[usize]) -> bool {
        self.jobs
            .iter()
            .all(|job| job.is_complete(progress[job.id]))
    }

    /// First prerequisite of `job_id` that is still incomplete, if any.
    pub fn pending_dependency(&self, job_id: usize, progress: &[usize]) -> Option<usize> {
        self.jobs.get(job_id)?.dependencies.iter().copied().find(|&dep| {
            !self.is_job_complete(dep, progress.get(dep).copied().unwrap_or(0))
        })
    }

    /// Whether any job has prerequisites.
    pub fn has_dependencies(&self) -> bool {
        self.jobs.iter().any(Job::has_dependencies)
    }

    /// Sum of every operation's duration; an upper bound on any semi-active
    /// schedule's makespan.
    pub fn total_duration(&self) -> i64 {
        self.jobs.iter().map(Job::total_duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::validation::ValidationErrorKind;

    fn sample_problem() -> ProblemModel {
        ProblemModel::new(
            2,
            vec![
                JobSpec::new().with_operation(0, 3).with_operation(1, 2),
                JobSpec::new().with_operation(1, 4).with_operation(0, 1),
                JobSpec::new().with_operation(0, 2).with_dependency(0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_problem_queries() {
        let p = sample_problem();
        assert_eq!(p.machine_count(), 2);
        assert_eq!(p.job_count(), 3);
        assert_eq!(p.total_operation_count(), 5);
        assert_eq!(p.total_duration(), 12);
        assert!(p.has_dependencies());
        assert_eq!(p.job(1).map(|j| j.operation_count()), Some(2));
        assert!(p.job(3).is_none());
    }

    #[test]
    fn test_next_operation_and_completion() {
        let p = sample_problem();
        assert_eq!(p.next_operation(1, 0).map(|op| op.machine_id), Some(1));
        assert_eq!(p.next_operation(1, 1).map(|op| op.duration), Some(1));
        assert!(p.next_operation(1, 2).is_none());
        assert!(!p.is_job_complete(0, 1));
        assert!(p.is_job_complete(0, 2));
        assert!(p.all_complete(&[2, 2, 1]));
        assert!(!p.all_complete(&[2, 1, 1]));
    }

    #[test]
    fn test_pending_dependency() {
        let p = sample_problem();
        assert_eq!(p.pending_dependency(2, &[1, 0, 0]), Some(0));
        assert_eq!(p.pending_dependency(2, &[2, 0, 0]), None);
        assert_eq!(p.pending_dependency(0, &[0, 0, 0]), None);
    }

    #[test]
    fn test_cycle_rejected_before_search() {
        let result = ProblemModel::new(
            1,
            vec![
                JobSpec::new().with_operation(0, 1).with_dependency(1),
                JobSpec::new().with_operation(0, 1).with_dependency(0),
            ],
        );
        match result {
            Err(ScheduleError::Validation(errors)) => assert!(errors
                .iter()
                .any(|e| e.kind == ValidationErrorKind::CyclicDependency)),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_problem() {
        let p = ProblemModel::new(1, vec![]).unwrap();
        assert_eq!(p.total_operation_count(), 0);
        assert!(p.all_complete(&[]));
    }
}
