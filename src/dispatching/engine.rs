//! Rule engine for branch ordering.
//!
//! Applies dispatching rules in sequence (the next rule only breaks ties of
//! the previous one) and falls back to ascending job ID, so the resulting
//! order is always total and deterministic.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchContext, DispatchingRule, RuleScore};

/// A composable rule engine for candidate ordering.
///
/// # Example
/// ```
/// use u_jobshop::dispatching::{rules, DispatchContext, RuleEngine};
/// use u_jobshop::models::{JobSpec, ProblemModel};
///
/// let problem = ProblemModel::new(
///     1,
///     vec![
///         JobSpec::new().with_operation(0, 2),
///         JobSpec::new().with_operation(0, 7),
///     ],
/// )
/// .unwrap();
/// let progress = [0, 0];
/// let ctx = DispatchContext::new(&problem, &progress);
///
/// let mut candidates = vec![0, 1];
/// RuleEngine::new().with_rule(rules::Lrpt).sort_jobs(&mut candidates, &ctx);
/// assert_eq!(candidates, vec![1, 0]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine (pure job-ID order).
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            epsilon: 1e-9,
        }
    }

    /// Appends a rule; earlier rules dominate later ones.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Sorts candidate job IDs, highest priority first.
    pub fn sort_jobs(&self, job_ids: &mut [usize], context: &DispatchContext<'_>) {
        job_ids.sort_by(|&a, &b| self.compare(a, b, context));
    }

    /// Scores a job under every rule.
    pub fn evaluate(&self, job_id: usize, context: &DispatchContext<'_>) -> Vec<RuleScore> {
        match context.problem.job(job_id) {
            Some(job) => self.rules.iter().map(|r| r.evaluate(job, context)).collect(),
            None => Vec::new(),
        }
    }

    fn compare(&self, a: usize, b: usize, context: &DispatchContext<'_>) -> Ordering {
        if let (Some(job_a), Some(job_b)) = (context.problem.job(a), context.problem.job(b)) {
            for rule in &self.rules {
                let score_a = rule.evaluate(job_a, context);
                let score_b = rule.evaluate(job_b, context);

                if (score_a - score_b).abs() > self.epsilon {
                    return score_a.total_cmp(&score_b);
                }
            }
        }

        // All rules tied → ascending job ID (lowest ID branched first)
        a.cmp(&b)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::{JobSpec, ProblemModel};

    fn sample_problem() -> ProblemModel {
        ProblemModel::new(
            2,
            vec![
                JobSpec::new().with_operation(0, 4),
                JobSpec::new().with_operation(1, 9).with_dependency(0),
                JobSpec::new().with_operation(0, 4),
                JobSpec::new().with_operation(1, 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lrpt_ordering_with_id_ties() {
        let p = sample_problem();
        let progress = [0; 4];
        let ctx = DispatchContext::new(&p, &progress);
        let mut jobs = vec![3, 2, 1, 0];
        RuleEngine::new()
            .with_rule(rules::Lrpt)
            .sort_jobs(&mut jobs, &ctx);
        // 9, then the two 4s by ascending ID, then 1
        assert_eq!(jobs, vec![1, 0, 2, 3]);
    }

    #[test]
    fn test_fewest_dependencies_ordering() {
        let p = sample_problem();
        let progress = [0; 4];
        let ctx = DispatchContext::new(&p, &progress);
        let mut jobs = vec![1, 3, 0];
        RuleEngine::new()
            .with_rule(rules::FewestDependencies)
            .sort_jobs(&mut jobs, &ctx);
        assert_eq!(jobs, vec![0, 3, 1]);
    }

    #[test]
    fn test_secondary_rule_breaks_ties() {
        let p = sample_problem();
        let progress = [0; 4];
        let ctx = DispatchContext::new(&p, &progress);
        let mut jobs = vec![0, 1, 2, 3];
        RuleEngine::new()
            .with_rule(rules::FewestDependencies)
            .with_rule(rules::Lrpt)
            .sort_jobs(&mut jobs, &ctx);
        // Job 1 has a dependency → last; others by LRPT then ID
        assert_eq!(jobs, vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_empty_engine_orders_by_id() {
        let p = sample_problem();
        let progress = [0; 4];
        let ctx = DispatchContext::new(&p, &progress);
        let mut jobs = vec![2, 0, 3];
        RuleEngine::new().sort_jobs(&mut jobs, &ctx);
        assert_eq!(jobs, vec![0, 2, 3]);
    }

    #[test]
    fn test_evaluate_scores() {
        let p = sample_problem();
        let progress = [0; 4];
        let ctx = DispatchContext::new(&p, &progress);
        let engine = RuleEngine::new()
            .with_rule(rules::Lrpt)
            .with_rule(rules::FewestDependencies);
        let scores = engine.evaluate(1, &ctx);
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - (-9.0)).abs() < 1e-10);
        assert!((scores[1] - 1.0).abs() < 1e-10);
        assert!(engine.evaluate(42, &ctx).is_empty());
    }

    #[test]
    fn test_debug_lists_rules() {
        let engine = RuleEngine::new().with_rule(rules::Lrpt);
        assert_eq!(format!("{engine:?}"), r#"RuleEngine { rules: ["LRPT"] }"#);
    }
}
