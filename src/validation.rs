//! Input validation for job-shop problems.
//!
//! Checks structural integrity of a problem instance before any search
//! starts. Detects:
//! - Missing machines
//! - Empty jobs
//! - Out-of-range machine references
//! - Negative durations
//! - Unknown dependency references
//! - Circular job dependencies (DAG validation)
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::fmt;

use crate::models::JobSpec;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The instance declares zero machines.
    NoMachines,
    /// A job has no operations.
    EmptyJob,
    /// An operation references a machine outside `0..machine_count`.
    InvalidMachineReference,
    /// An operation has a negative duration.
    NegativeDuration,
    /// A job depends on a job ID that doesn't exist.
    InvalidDependency,
    /// The job dependency graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates the input data for a job-shop problem.
///
/// Checks:
/// 1. At least one machine
/// 2. Every job has at least one operation
/// 3. Every operation's machine is in `0..machine_count`
/// 4. Every duration is non-negative
/// 5. Every dependency refers to an existing job
/// 6. No circular dependencies (a self-dependency counts as a cycle)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(machine_count: usize, jobs: &[JobSpec]) -> ValidationResult {
    let mut errors = Vec::new();

    if machine_count == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoMachines,
            "Problem must have at least one machine",
        ));
    }

    for (job_id, job) in jobs.iter().enumerate() {
        if job.operations.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyJob,
                format!("Job {job_id} has no operations"),
            ));
        }

        for (index, &(machine_id, duration)) in job.operations.iter().enumerate() {
            if machine_id >= machine_count {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidMachineReference,
                    format!(
                        "Job {job_id} operation {index} references machine {machine_id} \
                         (machine count {machine_count})"
                    ),
                ));
            }
            if duration < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeDuration,
                    format!("Job {job_id} operation {index} has negative duration {duration}"),
                ));
            }
        }

        for &dep in &job.dependencies {
            if dep >= jobs.len() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!("Job {job_id} depends on unknown job {dep}"),
                ));
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(jobs) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the job dependency graph using DFS.
///
/// Edges run from a prerequisite to its dependent. Unknown job references
/// are ignored here; they are reported separately.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(jobs: &[JobSpec]) -> Option<ValidationError> {
    let n = jobs.len();
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (job_id, job) in jobs.iter().enumerate() {
        for &dep in job.dependencies.iter().filter(|&&d| d < n) {
            adj[dep].push(job_id);
        }
    }

    let mut visited = vec![false; n];
    let mut in_stack = vec![false; n];

    for node in 0..n {
        if !visited[node] && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving job {node}"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: usize,
    adj: &[Vec<usize>],
    visited: &mut [bool],
    in_stack: &mut [bool],
) -> bool {
    visited[node] = true;
    in_stack[node] = true;

    for &next in &adj[node] {
        if in_stack[next] {
            return true; // Back edge → cycle
        }
        if !visited[next] && has_cycle_dfs(next, adj, visited, in_stack) {
            return true;
        }
    }

    in_stack[node] = false;
    false
}
