//! Built-in dispatching rules.
//!
//! # Score Convention
//! All rules return lower scores for higher priority jobs.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::models::Job;

/// Longest Remaining Processing Time.
///
/// Prioritizes jobs with the most work still to dispatch. Pushing long
/// jobs early tends to find a tight makespan bound quickly.
#[derive(Debug, Clone, Copy)]
pub struct Lrpt;

impl DispatchingRule for Lrpt {
    fn name(&self) -> &'static str {
        "LRPT"
    }

    fn evaluate(&self, job: &Job, context: &DispatchContext<'_>) -> RuleScore {
        -(context.remaining_work(job.id) as f64)
    }

    fn description(&self) -> &'static str {
        "Longest Remaining Processing Time"
    }
}

/// Static job priority: fewest prerequisite jobs first.
///
/// Uses [`Job::priority`] (the negated dependency count).
#[derive(Debug, Clone, Copy)]
pub struct FewestDependencies;

impl DispatchingRule for FewestDependencies {
    fn name(&self) -> &'static str {
        "FEWEST_DEPS"
    }

    fn evaluate(&self, job: &Job, _context: &DispatchContext<'_>) -> RuleScore {
        -(job.priority as f64)
    }

    fn description(&self) -> &'static str {
        "Fewest Dependencies (static priority)"
    }
}
