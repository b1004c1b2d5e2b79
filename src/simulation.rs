//! Simulation engine.
//!
//! Maps a dispatch ordering (a sequence of job IDs, where the k-th
//! occurrence of job J means J's k-th operation) to a concrete timed
//! schedule. This is the single source of truth for how good a candidate
//! is: both solvers score candidates here.
//!
//! # Timing Rule
//!
//! For each dispatched operation:
//! - `start = max(machine_free[machine], job_free[job])`
//! - `end = start + duration`
//! - both timers advance to `end`
//!
//! For a job's first operation, `job_free` also folds in the completion
//! time of every prerequisite job.
//!
//! # Incremental Use
//!
//! [`Timeline`] exposes the timer state step by step. Every dispatch returns
//! a [`Checkpoint`] holding the scalars it overwrote, and
//! [`Timeline::restore`] undoes it; the branch-and-bound search relies on
//! this to backtrack.
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to JSSP"

use rand::Rng;

use crate::error::{Result, SequenceError};
use crate::models::{Assignment, ProblemModel, Schedule};

/// Transient timer state for one simulation pass.
#[derive(Debug, Clone)]
pub struct Timeline<'p> {
    problem: &'p ProblemModel,
    machine_free: Vec<i64>,
    job_free: Vec<i64>,
    progress: Vec<usize>,
    makespan: i64,
    dispatched: usize,
}

/// Values overwritten by one dispatch, consumed by [`Timeline::restore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a dispatch that is never restored cannot be backtracked"]
pub struct Checkpoint {
    job_id: usize,
    machine_id: usize,
    machine_free: i64,
    job_free: i64,
    makespan: i64,
}

impl<'p> Timeline<'p> {
    /// Creates an idle timeline: every machine and job free at time 0.
    pub fn new(problem: &'p ProblemModel) -> Self {
        Self {
            problem,
            machine_free: vec![0; problem.machine_count()],
            job_free: vec![0; problem.job_count()],
            progress: vec![0; problem.job_count()],
            makespan: 0,
            dispatched: 0,
        }
    }

    /// The problem being simulated.
    pub fn problem(&self) -> &'p ProblemModel {
        self.problem
    }

    /// Operations dispatched per job.
    pub fn progress(&self) -> &[usize] {
        &self.progress
    }

    /// Next free time per machine.
    pub fn machine_free(&self) -> &[i64] {
        &self.machine_free
    }

    /// Completion time of each job's latest dispatched operation.
    pub fn job_free(&self) -> &[i64] {
        &self.job_free
    }

    /// Current partial makespan: `max(machine_free)`.
    #[inline]
    pub fn makespan(&self) -> i64 {
        self.makespan
    }

    /// Total operations dispatched so far.
    #[inline]
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Whether every operation has been dispatched.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.dispatched == self.problem.total_operation_count()
    }

    /// Whether the job is unfinished and all its prerequisites are complete.
    pub fn is_dispatchable(&self, job_id: usize) -> bool {
        !self.problem.is_job_complete(job_id, self.progress[job_id])
            && self
                .problem
                .pending_dependency(job_id, &self.progress)
                .is_none()
    }

    /// Dispatches the next operation of `job_id`, checking that it is legal.
    ///
    /// # Errors
    /// [`SequenceError::UnknownJob`], [`SequenceError::ExhaustedJob`] or
    /// [`SequenceError::DependencyPending`]; the timeline is left unchanged.
    pub fn try_dispatch(
        &mut self,
        job_id: usize,
    ) -> std::result::Result<(Assignment, Checkpoint), SequenceError> {
        let position = self.dispatched;
        if job_id >= self.problem.job_count() {
            return Err(SequenceError::UnknownJob { position, job_id });
        }
        if self.problem.is_job_complete(job_id, self.progress[job_id]) {
            return Err(SequenceError::ExhaustedJob { position, job_id });
        }
        if let Some(dependency) = self.problem.pending_dependency(job_id, &self.progress) {
            return Err(SequenceError::DependencyPending {
                position,
                job_id,
                dependency,
            });
        }
        Ok(self.dispatch(job_id))
    }

    /// Dispatches the next operation of `job_id`.
    ///
    /// The caller guarantees [`is_dispatchable`](Self::is_dispatchable).
    pub(crate) fn dispatch(&mut self, job_id: usize) -> (Assignment, Checkpoint) {
        let job = &self.problem.jobs()[job_id];
        let progress = self.progress[job_id];
        let op = &job.operations[progress];

        let mut job_ready = self.job_free[job_id];
        if progress == 0 {
            for &dep in &job.dependencies {
                job_ready = job_ready.max(self.job_free[dep]);
            }
        }

        let start = self.machine_free[op.machine_id].max(job_ready);
        let end = start + op.duration;

        let checkpoint = Checkpoint {
            job_id,
            machine_id: op.machine_id,
            machine_free: self.machine_free[op.machine_id],
            job_free: self.job_free[job_id],
            makespan: self.makespan,
        };

        self.machine_free[op.machine_id] = end;
        self.job_free[job_id] = end;
        self.progress[job_id] += 1;
        self.makespan = self.makespan.max(end);
        self.dispatched += 1;

        (
            Assignment::new(job_id, op.index, op.machine_id, start, end),
            checkpoint,
        )
    }

    /// Undoes the dispatch that produced `checkpoint`.
    ///
    /// Checkpoints must be restored in reverse dispatch order.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        debug_assert!(self.progress[checkpoint.job_id] > 0);
        self.machine_free[checkpoint.machine_id] = checkpoint.machine_free;
        self.job_free[checkpoint.job_id] = checkpoint.job_free;
        self.progress[checkpoint.job_id] -= 1;
        self.makespan = checkpoint.makespan;
        self.dispatched -= 1;
    }
}

/// Simulates a full dispatch ordering.
///
/// The ordering must contain each job ID exactly once per operation of
/// that job, and must not start a job before its prerequisites complete.
///
/// # Errors
/// [`ScheduleError::InvalidSequence`](crate::ScheduleError::InvalidSequence)
/// on a wrong length or an undispatchable entry.
///
/// # Example
/// ```
/// use u_jobshop::models::{JobSpec, ProblemModel};
/// use u_jobshop::simulation::simulate;
///
/// let problem = ProblemModel::new(
///     2,
///     vec![
///         JobSpec::new().with_operation(0, 3).with_operation(1, 2),
///         JobSpec::new().with_operation(1, 4).with_operation(0, 1),
///     ],
/// )
/// .unwrap();
/// let schedule = simulate(&problem, &[0, 1, 0, 1]).unwrap();
/// assert_eq!(schedule.makespan(), 6);
/// ```
pub fn simulate(problem: &ProblemModel, ordering: &[usize]) -> Result<Schedule> {
    check_length(problem, ordering)?;
    simulate_partial(problem, ordering)
}

/// Simulates a prefix of a dispatch ordering.
///
/// Same rules as [`simulate`] without the length requirement; an
/// over-long ordering still fails with `ExhaustedJob`.
pub fn simulate_partial(problem: &ProblemModel, ordering: &[usize]) -> Result<Schedule> {
    let mut timeline = Timeline::new(problem);
    let mut schedule = Schedule {
        assignments: Vec::with_capacity(ordering.len()),
    };
    for &job_id in ordering {
        let (assignment, _) = timeline.try_dispatch(job_id)?;
        schedule.add_assignment(assignment);
    }
    Ok(schedule)
}

/// Makespan of a full dispatch ordering, without materialising the schedule.
pub fn evaluate(problem: &ProblemModel, ordering: &[usize]) -> Result<i64> {
    check_length(problem, ordering)?;
    let mut timeline = Timeline::new(problem);
    for &job_id in ordering {
        let _ = timeline.try_dispatch(job_id)?;
    }
    Ok(timeline.makespan())
}

fn check_length(problem: &ProblemModel, ordering: &[usize]) -> Result<()> {
    let expected = problem.total_operation_count();
    if ordering.len() != expected {
        return Err(SequenceError::WrongLength {
            expected,
            actual: ordering.len(),
        }
        .into());
    }
    Ok(())
}

/// Makespan when each job runs whole on one machine.
///
/// The simpler fitness case: `assignment[j]` is the machine for job `j`,
/// whose work is `durations[j]`. Makespan is the heaviest machine load.
///
/// # Errors
/// `WrongLength` if the two slices differ in length, `UnknownMachine` if a
/// machine ID is out of range.
pub fn load_makespan(
    durations: &[i64],
    assignment: &[usize],
    machine_count: usize,
) -> std::result::Result<i64, SequenceError> {
    if assignment.len() != durations.len() {
        return Err(SequenceError::WrongLength {
            expected: durations.len(),
            actual: assignment.len(),
        });
    }
    let mut loads = vec![0i64; machine_count];
    for (position, (&machine_id, &duration)) in assignment.iter().zip(durations).enumerate() {
        let load = loads
            .get_mut(machine_id)
            .ok_or(SequenceError::UnknownMachine {
                position,
                machine_id,
            })?;
        *load += duration;
    }
    Ok(loads.into_iter().max().unwrap_or(0))
}

/// Random whole-job machine assignment for [`load_makespan`].
///
/// Public entry point for callers searching over per-job machine
/// assignments; the job-shop solvers do not use it.
pub fn random_assignment<R: Rng>(job_count: usize, machine_count: usize, rng: &mut R) -> Vec<usize> {
    if machine_count == 0 {
        return Vec::new();
    }
    (0..job_count)
        .map(|_| rng.random_range(0..machine_count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::models::JobSpec;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn two_by_two() -> ProblemModel {
        ProblemModel::new(
            2,
            vec![
                JobSpec::new().with_operation(0, 3).with_operation(1, 2),
                JobSpec::new().with_operation(1, 4).with_operation(0, 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_simulate_interleaved() {
        let s = simulate(&two_by_two(), &[0, 1, 0, 1]).unwrap();
        assert_eq!(s.assignments[0], Assignment::new(0, 0, 0, 0, 3));
        assert_eq!(s.assignments[1], Assignment::new(1, 0, 1, 0, 4));
        assert_eq!(s.assignments[2], Assignment::new(0, 1, 1, 4, 6));
        assert_eq!(s.assignments[3], Assignment::new(1, 1, 0, 4, 5));
        assert_eq!(s.makespan(), 6);
    }

    #[test]
    fn test_simulate_job_first() {
        // J1 op0 M1 [0,4), J0 op0 M0 [0,3), J0 op1 M1 [4,6), J1 op1 M0 [4,5)
        let s = simulate(&two_by_two(), &[1, 0, 0, 1]).unwrap();
        assert_eq!(s.makespan(), 6);
        // J0 fully, then J1: J1 op0 waits for M1 until 5
        let s = simulate(&two_by_two(), &[0, 0, 1, 1]).unwrap();
        assert_eq!(s.assignment_for(1, 0).map(|a| a.start), Some(5));
        assert_eq!(s.makespan(), 10);
    }

    #[test]
    fn test_simulate_wrong_length() {
        let err = simulate(&two_by_two(), &[0, 1, 0]).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidSequence(SequenceError::WrongLength {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_simulate_exhausted_job() {
        let err = simulate(&two_by_two(), &[0, 0, 0, 1]).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidSequence(SequenceError::ExhaustedJob {
                position: 2,
                job_id: 0
            })
        );
    }

    #[test]
    fn test_simulate_unknown_job() {
        let err = simulate(&two_by_two(), &[0, 5, 0, 1]).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::InvalidSequence(SequenceError::UnknownJob { position: 1, .. })
        ));
    }

    #[test]
    fn test_simulate_dependency_timing() {
        // J1 depends on J0; J1 runs on a different machine yet must wait.
        let problem = ProblemModel::new(
            2,
            vec![
                JobSpec::new().with_operation(0, 5),
                JobSpec::new().with_operation(1, 2).with_dependency(0),
            ],
        )
        .unwrap();
        let s = simulate(&problem, &[0, 1]).unwrap();
        assert_eq!(s.assignment_for(1, 0).map(|a| a.start), Some(5));
        assert!(s.check(&problem).is_empty());

        let err = simulate(&problem, &[1, 0]).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::InvalidSequence(SequenceError::DependencyPending {
                position: 0,
                job_id: 1,
                dependency: 0
            })
        );
    }

    #[test]
    fn test_simulate_partial() {
        let s = simulate_partial(&two_by_two(), &[1, 1]).unwrap();
        assert_eq!(s.assignment_count(), 2);
        assert_eq!(s.makespan(), 5);
    }

    #[test]
    fn test_evaluate_matches_simulate() {
        let p = two_by_two();
        for ordering in [[0, 1, 0, 1], [1, 1, 0, 0], [0, 0, 1, 1]] {
            assert_eq!(
                evaluate(&p, &ordering).unwrap(),
                simulate(&p, &ordering).unwrap().makespan()
            );
        }
    }

    #[test]
    fn test_timeline_restore() {
        let p = two_by_two();
        let mut t = Timeline::new(&p);
        let (_, c0) = t.try_dispatch(0).unwrap();
        let before = t.clone();
        let (a, c1) = t.try_dispatch(0).unwrap();
        assert_eq!(a, Assignment::new(0, 1, 1, 3, 5));
        assert_eq!(t.makespan(), 5);
        t.restore(c1);
        assert_eq!(t.machine_free(), before.machine_free());
        assert_eq!(t.job_free(), before.job_free());
        assert_eq!(t.progress(), before.progress());
        assert_eq!(t.makespan(), 3);
        t.restore(c0);
        assert_eq!(t.dispatched(), 0);
        assert_eq!(t.makespan(), 0);
    }

    #[test]
    fn test_timeline_dispatchable() {
        let p = ProblemModel::new(
            1,
            vec![
                JobSpec::new().with_operation(0, 1),
                JobSpec::new().with_operation(0, 1).with_dependency(0),
            ],
        )
        .unwrap();
        let mut t = Timeline::new(&p);
        assert!(t.is_dispatchable(0));
        assert!(!t.is_dispatchable(1));
        let _ = t.try_dispatch(0).unwrap();
        assert!(!t.is_dispatchable(0));
        assert!(t.is_dispatchable(1));
        let _ = t.try_dispatch(1).unwrap();
        assert!(t.is_complete());
    }

    #[test]
    fn test_load_makespan() {
        let durations = [3, 4, 2];
        assert_eq!(load_makespan(&durations, &[0, 1, 0], 2), Ok(5));
        assert_eq!(load_makespan(&durations, &[0, 0, 0], 2), Ok(9));
        assert_eq!(
            load_makespan(&durations, &[0, 1], 2),
            Err(SequenceError::WrongLength {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            load_makespan(&durations, &[0, 2, 0], 2),
            Err(SequenceError::UnknownMachine {
                position: 1,
                machine_id: 2
            })
        );
    }

    #[test]
    fn test_random_assignment_in_range() {
        let mut rng = SmallRng::seed_from_u64(42);
        let assignment = random_assignment(20, 3, &mut rng);
        assert_eq!(assignment.len(), 20);
        assert!(assignment.iter().all(|&m| m < 3));
        assert!(load_makespan(&[1; 20], &assignment, 3).is_ok());
    }
}
