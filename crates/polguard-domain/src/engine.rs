use crate::artifact::ArtifactRef;
use crate::error::PolicyError;
use crate::executor::RuleExecutor;
use crate::violation::{Violation, ViolationSet};
use polguard_types::RulesetMeta;
use rayon::prelude::*;
use tracing::debug;

/// Entry point for policy evaluations.
///
/// Holds a fixed set of executors for its whole lifetime. Build one with
/// [`crate::PolicyEngineConfigurator`].
#[derive(Debug)]
pub struct PolicyEngine {
    executors: Vec<Box<dyn RuleExecutor>>,
    rulesets: Vec<RulesetMeta>,
}

impl PolicyEngine {
    pub fn new(executors: Vec<Box<dyn RuleExecutor>>, rulesets: Vec<RulesetMeta>) -> Self {
        Self {
            executors,
            rulesets,
        }
    }

    pub fn executors(&self) -> &[Box<dyn RuleExecutor>] {
        &self.executors
    }

    /// Rule sets the engine was configured with, in configuration order.
    pub fn rulesets(&self) -> &[RulesetMeta] {
        &self.rulesets
    }

    pub fn rule_count(&self) -> usize {
        self.executors.iter().map(|e| e.rule_ids().len()).sum()
    }

    /// Run every executor against `artifacts` and collapse equal violations.
    ///
    /// Executors run in parallel on the current rayon pool. The first rule failure aborts
    /// the evaluation; no partial result is returned.
    pub fn evaluate(&self, artifacts: &[ArtifactRef]) -> Result<ViolationSet, PolicyError> {
        debug!(
            artifacts = artifacts.len(),
            executors = self.executors.len(),
            rules = self.rule_count(),
            "policy evaluation started"
        );

        let found: Vec<Violation> = self
            .executors
            .par_iter()
            .map(|executor| executor.execute_rules(artifacts))
            .try_reduce(Vec::new, |mut acc, more| {
                acc.extend(more);
                Ok(acc)
            })?;

        let raw = found.len();
        let violations: ViolationSet = found.into_iter().collect();

        debug!(
            raw,
            distinct = violations.len(),
            "policy evaluation finished"
        );

        Ok(violations)
    }

    /// Like [`PolicyEngine::evaluate`], but on a caller-owned thread pool.
    pub fn evaluate_in(
        &self,
        pool: &rayon::ThreadPool,
        artifacts: &[ArtifactRef],
    ) -> Result<ViolationSet, PolicyError> {
        pool.install(|| self.evaluate(artifacts))
    }
}
