//! Branch-and-bound configuration.

use serde::{Deserialize, Serialize};

use crate::dispatching::{rules, RuleEngine};

/// Order in which dispatchable jobs are branched on.
///
/// Only affects how quickly good bounds are found, never the optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BranchRule {
    /// Longest remaining processing time first, then job ID.
    #[default]
    Lrpt,
    /// Fewest prerequisite jobs first, then job ID.
    FewestDependencies,
}

impl BranchRule {
    /// Builds the rule engine implementing this ordering.
    pub fn engine(self) -> RuleEngine {
        match self {
            Self::Lrpt => RuleEngine::new().with_rule(rules::Lrpt),
            Self::FewestDependencies => RuleEngine::new().with_rule(rules::FewestDependencies),
        }
    }
}

/// Branch-and-bound parameters.
///
/// # Example
/// ```
/// use u_jobshop::bnb::{BranchAndBoundConfig, BranchRule};
///
/// let config = BranchAndBoundConfig::default()
///     .with_rule(BranchRule::FewestDependencies)
///     .with_node_limit(10_000);
/// assert_eq!(config.node_limit, Some(10_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BranchAndBoundConfig {
    /// Branch ordering heuristic.
    #[serde(default)]
    pub rule: BranchRule,
    /// Maximum nodes to visit; `None` searches exhaustively.
    #[serde(default)]
    pub node_limit: Option<u64>,
}

impl BranchAndBoundConfig {
    /// Sets the branch ordering heuristic.
    pub fn with_rule(mut self, rule: BranchRule) -> Self {
        self.rule = rule;
        self
    }

    /// Caps the number of visited nodes.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }
}
