//! Engine configuration: resolve rule set identifiers and bucket rules by shape.

use crate::engine::PolicyEngine;
use crate::error::{ConfigureError, ResolveError};
use crate::executor::{CompareArtifactExecutor, RuleExecutor, SingleArtifactExecutor};
use crate::rule::{CompareArtifactRule, RuleSet, RuleShape, SingleArtifactRule};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns a rule set identifier into a rule set instance.
pub trait RuleSetResolver: Send + Sync {
    fn resolve(&self, identifier: &str) -> Result<RuleSet, ResolveError>;
}

type RuleSetFactory = Box<dyn Fn() -> RuleSet + Send + Sync>;

/// Static name → factory catalog of rule sets.
///
/// Every resolution calls the factory, so each engine gets fresh rule instances.
#[derive(Default)]
pub struct RuleSetRegistry {
    factories: BTreeMap<String, RuleSetFactory>,
}

impl RuleSetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, identifier: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> RuleSet + Send + Sync + 'static,
    {
        self.factories.insert(identifier.into(), Box::new(factory));
        self
    }

    pub fn with<F>(mut self, identifier: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> RuleSet + Send + Sync + 'static,
    {
        self.register(identifier, factory);
        self
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.factories.contains_key(identifier)
    }

    /// Registered identifiers, sorted.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl RuleSetResolver for RuleSetRegistry {
    fn resolve(&self, identifier: &str) -> Result<RuleSet, ResolveError> {
        self.factories
            .get(identifier)
            .map(|factory| factory())
            .ok_or_else(|| ResolveError::Unknown(identifier.to_string()))
    }
}

impl fmt::Debug for RuleSetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSetRegistry")
            .field("identifiers", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builds [`PolicyEngine`]s from rule set identifiers.
pub struct PolicyEngineConfigurator<R> {
    resolver: R,
}

impl<R: RuleSetResolver> PolicyEngineConfigurator<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// Resolve every identifier, classify all rules, and build one executor per shape.
    ///
    /// Fails fast: the first blank or unresolvable identifier, or unclassifiable rule, aborts
    /// the whole configuration. Repeated identifiers are loaded once.
    pub fn configure<I, S>(&self, identifiers: I) -> Result<PolicyEngine, ConfigureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let mut ids: Vec<String> = Vec::new();
        for raw in identifiers {
            let id = raw.as_ref().trim();
            if id.is_empty() {
                return Err(ConfigureError::UnresolvedRuleSet {
                    identifier: raw.as_ref().to_string(),
                    source: ResolveError::Unknown(id.to_string()),
                });
            }
            if seen.insert(id.to_string()) {
                ids.push(id.to_string());
            } else {
                warn!(identifier = id, "rule set listed more than once; loading it once");
            }
        }
        if ids.is_empty() {
            return Err(ConfigureError::NoRuleSets);
        }

        debug!(rulesets = ?ids, "configuring policy engine");

        let rulesets = ids
            .iter()
            .map(|id| {
                self.resolver
                    .resolve(id)
                    .map_err(|source| ConfigureError::UnresolvedRuleSet {
                        identifier: id.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut single: Vec<Arc<dyn SingleArtifactRule>> = Vec::new();
        let mut compare: Vec<Arc<dyn CompareArtifactRule>> = Vec::new();

        for ruleset in &rulesets {
            for rule in ruleset.rules() {
                match rule.clone().shape() {
                    RuleShape::Single(r) => single.push(r),
                    RuleShape::Compare(r) => compare.push(r),
                    RuleShape::Unsupported => {
                        return Err(ConfigureError::UnsupportedRule {
                            rule_id: rule.id().to_string(),
                            ruleset: ruleset.name().to_string(),
                        });
                    }
                }
            }
        }

        let mut executors: Vec<Box<dyn RuleExecutor>> = Vec::new();
        if !single.is_empty() {
            executors.push(Box::new(SingleArtifactExecutor::new(single)));
        }
        if !compare.is_empty() {
            executors.push(Box::new(CompareArtifactExecutor::new(compare)));
        }

        let engine = PolicyEngine::new(
            executors,
            rulesets.iter().map(|rs| rs.meta().clone()).collect(),
        );
        debug!(
            executors = engine.executors().len(),
            rules = engine.rule_count(),
            "policy engine created"
        );
        Ok(engine)
    }
}
