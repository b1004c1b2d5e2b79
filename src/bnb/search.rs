//! Depth-first branch-and-bound over dispatch orders.

use std::ops::{Deref, DerefMut};
use std::time::Instant;

use tracing::{debug, info};

use super::BranchAndBoundConfig;
use crate::dispatching::{DispatchContext, RuleEngine};
use crate::error::{Result, ScheduleError};
use crate::models::{Assignment, ProblemModel, Schedule};
use crate::simulation::{Checkpoint, Timeline};
use crate::stats::{SearchStats, Tracker};

/// Exact solver enumerating every semi-active schedule, cutting any partial
/// schedule whose makespan already reaches the best complete one.
///
/// # Example
/// ```
/// use u_jobshop::bnb::BranchAndBound;
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
/// let result = BranchAndBound::new().solve(&problem);
/// assert_eq!(result.makespan(), Some(6));
/// ```
#[derive(Debug, Clone)]
pub struct BranchAndBound {
    config: BranchAndBoundConfig,
    engine: RuleEngine,
}

impl BranchAndBound {
    /// Creates a solver with the default configuration (LRPT, no node limit).
    pub fn new() -> Self {
        Self::with_config(BranchAndBoundConfig::default())
    }

    /// Creates a solver from a configuration.
    pub fn with_config(config: BranchAndBoundConfig) -> Self {
        Self {
            engine: config.rule.engine(),
            config,
        }
    }

    /// Replaces the branch ordering with a custom rule engine.
    pub fn with_engine(mut self, engine: RuleEngine) -> Self {
        self.engine = engine;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &BranchAndBoundConfig {
        &self.config
    }

    /// Runs the search to completion (or until the node limit).
    pub fn solve(&self, problem: &ProblemModel) -> BranchAndBoundResult {
        info!(
            jobs = problem.job_count(),
            machines = problem.machine_count(),
            operations = problem.total_operation_count(),
            rules = ?self.engine.rule_names(),
            "branch-and-bound started"
        );

        let mut search = Search {
            engine: &self.engine,
            node_limit: self.config.node_limit,
            tracker: Tracker::start(),
            best: None,
            improvements: Vec::new(),
            started: Instant::now(),
        };
        let mut state = SearchState {
            timeline: Timeline::new(problem),
            path: Vec::with_capacity(problem.total_operation_count()),
        };
        search.explore(&mut state, 0);

        let Search {
            tracker,
            best,
            improvements,
            ..
        } = search;
        let stats = tracker.finish();
        let best = best.map(|assignments| Schedule { assignments });

        info!(
            makespan = best.as_ref().map(Schedule::makespan),
            nodes = stats.nodes_visited,
            pruned = stats.branches_pruned,
            solutions = stats.solutions_found,
            truncated = stats.truncated,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "branch-and-bound finished"
        );

        BranchAndBoundResult {
            best,
            stats,
            improvements,
        }
    }
}

impl Default for BranchAndBound {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a branch-and-bound run.
#[derive(Debug, Clone)]
pub struct BranchAndBoundResult {
    /// Best complete schedule, in dispatch order; `None` if none exists.
    pub best: Option<Schedule>,
    /// Search counters.
    pub stats: SearchStats,
    /// Makespan of every improving solution, in discovery order.
    pub improvements: Vec<i64>,
}

impl BranchAndBoundResult {
    /// Makespan of the best schedule.
    pub fn makespan(&self) -> Option<i64> {
        self.best.as_ref().map(Schedule::makespan)
    }

    /// Whether the search proved optimality (exhaustive, not truncated).
    pub fn is_optimal(&self) -> bool {
        self.best.is_some() && !self.stats.truncated
    }

    /// Best schedule and its makespan.
    ///
    /// # Errors
    /// [`ScheduleError::NoSolution`] when no complete schedule was reached.
    pub fn solution(&self) -> Result<(&Schedule, i64)> {
        self.best
            .as_ref()
            .map(|s| (s, s.makespan()))
            .ok_or(ScheduleError::NoSolution)
    }

    /// Consumes the result, yielding the best schedule and its makespan.
    ///
    /// # Errors
    /// [`ScheduleError::NoSolution`] when no complete schedule was reached.
    pub fn into_solution(self) -> Result<(Schedule, i64)> {
        self.best
            .map(|s| {
                let makespan = s.makespan();
                (s, makespan)
            })
            .ok_or(ScheduleError::NoSolution)
    }
}

/// Timer state plus the assignments along the current path.
struct SearchState<'p> {
    timeline: Timeline<'p>,
    path: Vec<Assignment>,
}

impl<'p> SearchState<'p> {
    fn push(&mut self, job_id: usize) -> Step<'_, 'p> {
        let (assignment, checkpoint) = self.timeline.dispatch(job_id);
        self.path.push(assignment);
        Step {
            state: self,
            checkpoint: Some(checkpoint),
        }
    }
}

/// One dispatched operation; dropping it undoes the dispatch.
struct Step<'s, 'p> {
    state: &'s mut SearchState<'p>,
    checkpoint: Option<Checkpoint>,
}

impl<'p> Deref for Step<'_, 'p> {
    type Target = SearchState<'p>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for Step<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for Step<'_, '_> {
    fn drop(&mut self) {
        if let Some(checkpoint) = self.checkpoint.take() {
            self.state.path.pop();
            self.state.timeline.restore(checkpoint);
        }
    }
}

struct Search<'e> {
    engine: &'e RuleEngine,
    node_limit: Option<u64>,
    tracker: Tracker,
    best: Option<Vec<Assignment>>,
    improvements: Vec<i64>,
    started: Instant,
}

impl Search<'_> {
    fn bound(&self) -> i64 {
        self.improvements.last().copied().unwrap_or(i64::MAX)
    }

    fn budget_exhausted(&self) -> bool {
        self.node_limit
            .is_some_and(|limit| self.tracker.nodes_visited() >= limit)
    }

    fn explore(&mut self, state: &mut SearchState<'_>, depth: usize) {
        if self.budget_exhausted() {
            self.tracker.truncate();
            return;
        }
        self.tracker.visit(depth);

        if state.timeline.is_complete() {
            self.tracker.solution();
            let makespan = state.timeline.makespan();
            if makespan < self.bound() {
                debug!(
                    makespan,
                    nodes = self.tracker.nodes_visited(),
                    elapsed_us = self.started.elapsed().as_micros() as u64,
                    "improved bound"
                );
                self.improvements.push(makespan);
                self.best = Some(state.path.clone());
            }
            return;
        }

        let problem = state.timeline.problem();
        let mut candidates = Vec::with_capacity(problem.job_count());
        for job_id in 0..problem.job_count() {
            if problem.is_job_complete(job_id, state.timeline.progress()[job_id]) {
                continue;
            }
            if problem
                .pending_dependency(job_id, state.timeline.progress())
                .is_some()
            {
                self.tracker.prune();
                continue;
            }
            candidates.push(job_id);
        }

        if candidates.is_empty() {
            // Jobs remain but none can start.
            self.tracker.prune();
            return;
        }

        self.engine.sort_jobs(
            &mut candidates,
            &DispatchContext::from_timeline(&state.timeline),
        );

        for job_id in candidates {
            if self.budget_exhausted() {
                self.tracker.truncate();
                break;
            }
            let mut step = state.push(job_id);
            if step.timeline.makespan() < self.bound() {
                self.explore(&mut step, depth + 1);
            } else {
                self.tracker.prune();
            }
        }
    }
}

/// Solves `problem` exactly with the default configuration.
///
/// Equivalent to `BranchAndBound::new().solve(problem)`; use
/// [`BranchAndBoundResult::solution`] to turn "no schedule" into
/// [`ScheduleError::NoSolution`].
pub fn branch_and_bound_solve(problem: &ProblemModel) -> BranchAndBoundResult {
    BranchAndBound::new().solve(problem)
}
