//! Rule contracts and rule sets.

use crate::artifact::ArtifactRef;
use crate::error::RuleError;
use crate::violation::Violation;
use polguard_types::{RuleSeverity, RulesetMeta};
use std::fmt;
use std::sync::Arc;

/// Result of evaluating a rule: `Ok(None)` when the input passes.
pub type RuleOutcome = Result<Option<Violation>, RuleError>;

/// Identity and presentation data of a rule. Immutable after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleMeta {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: RuleSeverity,
    /// Back-reference to the owning rule set (name + version only).
    pub ruleset: RulesetMeta,
}

impl RuleMeta {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        severity: RuleSeverity,
        ruleset: &RulesetMeta,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            severity,
            ruleset: ruleset.clone(),
        })
    }
}

/// The shape a rule is executed with.
pub enum RuleShape {
    Single(Arc<dyn SingleArtifactRule>),
    Compare(Arc<dyn CompareArtifactRule>),
    /// The rule implements no evaluation capability the engine knows about.
    Unsupported,
}

/// Common contract of every rule.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &Arc<RuleMeta>;

    fn id(&self) -> &str {
        &self.meta().id
    }

    fn name(&self) -> &str {
        &self.meta().name
    }

    fn description(&self) -> &str {
        &self.meta().description
    }

    fn severity(&self) -> RuleSeverity {
        self.meta().severity
    }

    fn ruleset(&self) -> &RulesetMeta {
        &self.meta().ruleset
    }

    /// Classifies the rule for executor bucketing.
    ///
    /// Implementations of [`SingleArtifactRule`] return `RuleShape::Single(self)`,
    /// implementations of [`CompareArtifactRule`] return `RuleShape::Compare(self)`.
    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Unsupported
    }

    /// Builds a violation of this rule for the given artifacts.
    fn violation<I>(&self, failing: I) -> Violation
    where
        I: IntoIterator<Item = ArtifactRef>,
        Self: Sized,
    {
        Violation::new(self.meta().clone(), failing)
    }
}

/// A local predicate over one artifact.
///
/// Invoked concurrently across the whole artifact set; must be referentially transparent.
pub trait SingleArtifactRule: Rule {
    fn evaluate(&self, artifact: &ArtifactRef) -> RuleOutcome;
}

/// A predicate over an ordered pair of artifacts.
///
/// The engine evaluates *every* ordered pair, including `(a, a)`. Rules that must not
/// compare an artifact with itself have to check `left == right` themselves.
pub trait CompareArtifactRule: Rule {
    fn evaluate(&self, left: &ArtifactRef, right: &ArtifactRef) -> RuleOutcome;
}

/// A named, versioned catalog of rules.
#[derive(Clone)]
pub struct RuleSet {
    meta: RulesetMeta,
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleSet {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            meta: RulesetMeta {
                name: name.into(),
                version: version.into(),
            },
            rules: Vec::new(),
        }
    }

    pub fn meta(&self) -> &RulesetMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn version(&self) -> &str {
        &self.meta.version
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn push<R: Rule + 'static>(&mut self, rule: R) {
        self.rules.push(Arc::new(rule));
    }

    pub fn with_rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.push(rule);
        self
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.rules.iter().map(|r| r.id()).collect();
        f.debug_struct("RuleSet")
            .field("name", &self.meta.name)
            .field("version", &self.meta.version)
            .field("rules", &ids)
            .finish()
    }
}
