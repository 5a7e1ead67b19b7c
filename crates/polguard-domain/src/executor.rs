//! Rule executors: one per rule shape.
//!
//! An executor knows how to iterate the artifact collection for the arity of its rules.
//! Work is spread over the rayon pool at two levels: across rules, and across artifacts
//! (or artifact pairs) within a rule. Results are merged through rayon's collect/reduce,
//! never through a shared mutable list.

use crate::artifact::ArtifactRef;
use crate::error::{PolicyError, RuleError};
use crate::rule::{CompareArtifactRule, Rule, SingleArtifactRule};
use crate::violation::Violation;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutorKind {
    SingleArtifact,
    CompareArtifact,
}

pub trait RuleExecutor: Send + Sync + fmt::Debug {
    fn kind(&self) -> ExecutorKind;

    /// Ids of the rules owned by this executor, in configuration order.
    fn rule_ids(&self) -> Vec<&str>;

    /// Apply every owned rule to `artifacts` and return all violations found.
    ///
    /// Output order is unspecified; callers deduplicate by value equality.
    fn execute_rules(&self, artifacts: &[ArtifactRef]) -> Result<Vec<Violation>, PolicyError>;
}

fn rule_failed<R: Rule + ?Sized>(rule: &R, source: RuleError) -> PolicyError {
    PolicyError::RuleFailed {
        rule_id: rule.id().to_string(),
        ruleset: rule.ruleset().name.clone(),
        source,
    }
}

fn concat(mut acc: Vec<Violation>, more: Vec<Violation>) -> Result<Vec<Violation>, PolicyError> {
    acc.extend(more);
    Ok(acc)
}

/// Evaluates each rule against each artifact independently.
pub struct SingleArtifactExecutor {
    rules: Vec<Arc<dyn SingleArtifactRule>>,
}

impl SingleArtifactExecutor {
    pub fn new(rules: Vec<Arc<dyn SingleArtifactRule>>) -> Self {
        Self { rules }
    }

    fn run_rule(
        rule: &dyn SingleArtifactRule,
        artifacts: &[ArtifactRef],
    ) -> Result<Vec<Violation>, PolicyError> {
        artifacts
            .par_iter()
            .filter_map(|artifact| {
                rule.evaluate(artifact)
                    .map_err(|e| rule_failed(rule, e))
                    .transpose()
            })
            .collect()
    }
}

impl RuleExecutor for SingleArtifactExecutor {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::SingleArtifact
    }

    fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    fn execute_rules(&self, artifacts: &[ArtifactRef]) -> Result<Vec<Violation>, PolicyError> {
        self.rules
            .par_iter()
            .map(|rule| Self::run_rule(rule.as_ref(), artifacts))
            .try_reduce(Vec::new, concat)
    }
}

impl fmt::Debug for SingleArtifactExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleArtifactExecutor")
            .field("rules", &self.rule_ids())
            .finish()
    }
}

/// Evaluates each rule against the full ordered cross product of the artifacts.
///
/// Every ordered pair is visited, including `(a, a)`, so the cost is quadratic in the
/// number of artifacts per rule.
pub struct CompareArtifactExecutor {
    rules: Vec<Arc<dyn CompareArtifactRule>>,
}

impl CompareArtifactExecutor {
    pub fn new(rules: Vec<Arc<dyn CompareArtifactRule>>) -> Self {
        Self { rules }
    }

    fn run_rule(
        rule: &dyn CompareArtifactRule,
        artifacts: &[ArtifactRef],
    ) -> Result<Vec<Violation>, PolicyError> {
        artifacts
            .par_iter()
            .flat_map(|left| artifacts.par_iter().map(move |right| (left, right)))
            .filter_map(|(left, right)| {
                rule.evaluate(left, right)
                    .map_err(|e| rule_failed(rule, e))
                    .transpose()
            })
            .collect()
    }
}

impl RuleExecutor for CompareArtifactExecutor {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::CompareArtifact
    }

    fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    fn execute_rules(&self, artifacts: &[ArtifactRef]) -> Result<Vec<Violation>, PolicyError> {
        self.rules
            .par_iter()
            .map(|rule| Self::run_rule(rule.as_ref(), artifacts))
            .try_reduce(Vec::new, concat)
    }
}

impl fmt::Debug for CompareArtifactExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompareArtifactExecutor")
            .field("rules", &self.rule_ids())
            .finish()
    }
}
