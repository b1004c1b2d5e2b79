//! Dispatching rules for branch ordering.
//!
//! The branch-and-bound search tries dispatchable operations in the order
//! given by a [`RuleEngine`]. Ordering never affects correctness (every
//! candidate is still explored unless pruned), only how quickly a tight
//! bound is found.
//!
//! # Usage
//!
//! ```
//! use u_jobshop::dispatching::{rules, RuleEngine};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::Lrpt)
//!     .with_rule(rules::FewestDependencies);
//! assert_eq!(engine.rule_names(), vec!["LRPT", "FEWEST_DEPS"]);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
pub mod rules;

pub use context::DispatchContext;
pub use engine::RuleEngine;

use crate::models::Job;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (tried first).
pub type RuleScore = f64;

/// A dispatching rule that scores a job's next operation.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "LRPT").
    fn name(&self) -> &'static str;

    /// Scores the job's next pending operation in the current search state.
    fn evaluate(&self, job: &Job, context: &DispatchContext<'_>) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
