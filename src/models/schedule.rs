//! Schedule (solution) model.
//!
//! A schedule is the ordered list of timed assignments the simulation
//! engine emits, one per operation. [`Schedule::check`] audits it against
//! the problem's hard constraints and reports any violations.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ProblemModel;

/// A complete or partial schedule, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Operation assignments, in the order they were dispatched.
    pub assignments: Vec<Assignment>,
}

/// An operation-machine-time assignment.
///
/// Records that a job's operation runs on its machine during `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Job ID.
    pub job_id: usize,
    /// Operation index within the job.
    pub operation_index: usize,
    /// Machine ID.
    pub machine_id: usize,
    /// Start time.
    pub start: i64,
    /// End time (`start + duration`).
    pub end: i64,
}

/// A hard-constraint violation found by [`Schedule::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Human-readable description.
    pub message: String,
}

/// Classification of constraint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// `end - start` differs from the operation duration, or `start < 0`.
    DurationMismatch,
    /// Two assignments overlap on one machine.
    MachineOverlap,
    /// An operation starts before its job predecessor finishes.
    OperationOrder,
    /// A job starts before a prerequisite job finishes.
    DependencyViolation,
    /// An operation is missing, duplicated, or unknown to the problem.
    Coverage,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(
        job_id: usize,
        operation_index: usize,
        machine_id: usize,
        start: i64,
        end: i64,
    ) -> Self {
        Self {
            job_id,
            operation_index,
            machine_id,
            start,
            end,
        }
    }

    /// Duration (end - start).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

impl Violation {
    fn new(violation_type: ViolationType, message: impl Into<String>) -> Self {
        Self {
            violation_type,
            message: message.into(),
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Makespan: latest end time across all assignments (0 if empty).
    pub fn makespan(&self) -> i64 {
        self.assignments.iter().map(|a| a.end).max().unwrap_or(0)
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether the schedule has no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Finds the assignment for a given operation.
    pub fn assignment_for(&self, job_id: usize, operation_index: usize) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.job_id == job_id && a.operation_index == operation_index)
    }

    /// All assignments of a job, sorted by operation index.
    pub fn assignments_for_job(&self, job_id: usize) -> Vec<&Assignment> {
        let mut result: Vec<&Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.job_id == job_id)
            .collect();
        result.sort_by_key(|a| a.operation_index);
        result
    }

    /// All assignments on a machine, sorted by start time.
    pub fn assignments_for_machine(&self, machine_id: usize) -> Vec<&Assignment> {
        let mut result: Vec<&Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.machine_id == machine_id)
            .collect();
        result.sort_by_key(|a| (a.start, a.end));
        result
    }

    /// Job start: earliest start among its assignments.
    pub fn job_start_time(&self, job_id: usize) -> Option<i64> {
        self.assignments
            .iter()
            .filter(|a| a.job_id == job_id)
            .map(|a| a.start)
            .min()
    }

    /// Job completion: latest end among its assignments.
    pub fn job_completion_time(&self, job_id: usize) -> Option<i64> {
        self.assignments
            .iter()
            .filter(|a| a.job_id == job_id)
            .map(|a| a.end)
            .max()
    }

    /// Machine utilization: busy time / horizon.
    ///
    /// Returns `None` if `horizon` is not positive.
    pub fn machine_utilization(&self, machine_id: usize, horizon: i64) -> Option<f64> {
        if horizon <= 0 {
            return None;
        }
        let busy: i64 = self
            .assignments
            .iter()
            .filter(|a| a.machine_id == machine_id)
            .map(Assignment::duration)
            .sum();
        Some(busy as f64 / horizon as f64)
    }

    /// Audits the schedule against `problem`'s hard constraints.
    ///
    /// Checks that every operation appears exactly once with its own
    /// machine and duration, that no machine runs two operations at once,
    /// that each job's operations run in index order, and that every job
    /// starts after its prerequisites finish. Returns all violations found.
    pub fn check(&self, problem: &ProblemModel) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen: HashMap<(usize, usize), usize> = HashMap::new();

        for a in &self.assignments {
            *seen.entry((a.job_id, a.operation_index)).or_insert(0) += 1;
            match problem.next_operation(a.job_id, a.operation_index) {
                None => violations.push(Violation::new(
                    ViolationType::Coverage,
                    format!("J{}O{} is not part of the problem", a.job_id, a.operation_index),
                )),
                Some(op) => {
                    if a.start < 0 || a.duration() != op.duration || a.machine_id != op.machine_id {
                        violations.push(Violation::new(
                            ViolationType::DurationMismatch,
                            format!(
                                "J{}O{} runs on M{} [{}, {}) but needs M{} for {}",
                                a.job_id,
                                a.operation_index,
                                a.machine_id,
                                a.start,
                                a.end,
                                op.machine_id,
                                op.duration
                            ),
                        ));
                    }
                }
            }
        }

        for job in problem.jobs() {
            for op in &job.operations {
                let count = seen.get(&(job.id, op.index)).copied().unwrap_or(0);
                if count != 1 {
                    violations.push(Violation::new(
                        ViolationType::Coverage,
                        format!("J{}O{} scheduled {count} times", job.id, op.index),
                    ));
                }
            }
        }

        for machine_id in 0..problem.machine_count() {
            let on_machine = self.assignments_for_machine(machine_id);
            for pair in on_machine.windows(2) {
                if pair[1].start < pair[0].end {
                    violations.push(Violation::new(
                        ViolationType::MachineOverlap,
                        format!(
                            "M{machine_id}: J{}O{} [{}, {}) overlaps J{}O{} [{}, {})",
                            pair[0].job_id,
                            pair[0].operation_index,
                            pair[0].start,
                            pair[0].end,
                            pair[1].job_id,
                            pair[1].operation_index,
                            pair[1].start,
                            pair[1].end
                        ),
                    ));
                }
            }
        }

        for job in problem.jobs() {
            let ops = self.assignments_for_job(job.id);
            for pair in ops.windows(2) {
                if pair[1].start < pair[0].end {
                    violations.push(Violation::new(
                        ViolationType::OperationOrder,
                        format!(
                            "J{}O{} starts at {} before O{} ends at {}",
                            job.id,
                            pair[1].operation_index,
                            pair[1].start,
                            pair[0].operation_index,
                            pair[0].end
                        ),
                    ));
                }
            }

            let Some(start) = self.job_start_time(job.id) else {
                continue;
            };
            for &dep in &job.dependencies {
                if let Some(dep_end) = self.job_completion_time(dep) {
                    if start < dep_end {
                        violations.push(Violation::new(
                            ViolationType::DependencyViolation,
                            format!(
                                "J{} starts at {start} before prerequisite J{dep} ends at {dep_end}",
                                job.id
                            ),
                        ));
                    }
                }
            }
        }

        violations
    }
}
