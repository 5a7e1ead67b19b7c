use crate::artifact::ArtifactRef;
use crate::fingerprint::violation_hash;
use crate::rule::RuleMeta;
use polguard_types::{RuleSeverity, RulesetMeta};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The result set of one evaluation: value-equal violations collapse into one entry.
pub type ViolationSet = HashSet<Violation>;

/// A rule bound to the artifacts that violate it.
///
/// Equality is structural: rule ids compared ignoring ASCII case, and the same set of
/// failing artifacts. [`Violation::violation_hash`] is a derived identifier and plays no
/// part in equality.
#[derive(Clone)]
pub struct Violation {
    rule: Arc<RuleMeta>,
    failing_artifacts: HashSet<ArtifactRef>,
}

impl Violation {
    pub fn new<I>(rule: Arc<RuleMeta>, failing: I) -> Self
    where
        I: IntoIterator<Item = ArtifactRef>,
    {
        Self {
            rule,
            failing_artifacts: failing.into_iter().collect(),
        }
    }

    pub fn rule(&self) -> &RuleMeta {
        &self.rule
    }

    pub fn id(&self) -> &str {
        &self.rule.id
    }

    pub fn name(&self) -> &str {
        &self.rule.name
    }

    pub fn description(&self) -> &str {
        &self.rule.description
    }

    pub fn severity(&self) -> RuleSeverity {
        self.rule.severity
    }

    pub fn ruleset(&self) -> &RulesetMeta {
        &self.rule.ruleset
    }

    pub fn failing_artifacts(&self) -> &HashSet<ArtifactRef> {
        &self.failing_artifacts
    }

    pub fn contains(&self, artifact: &ArtifactRef) -> bool {
        self.failing_artifacts.contains(artifact)
    }

    /// Canonical coordinates of every failing artifact, sorted.
    pub fn coordinates(&self) -> Vec<String> {
        let mut coords: Vec<String> = self
            .failing_artifacts
            .iter()
            .flat_map(|a| a.coordinates())
            .map(|p| p.canonicalize())
            .collect();
        coords.sort();
        coords
    }

    /// Hash that identifies "the same violation" across independent runs.
    pub fn violation_hash(&self) -> String {
        violation_hash(&self.rule.id, self.coordinates())
    }
}

impl PartialEq for Violation {
    fn eq(&self, other: &Self) -> bool {
        self.rule.id.eq_ignore_ascii_case(&other.rule.id)
            && self.failing_artifacts.len() == other.failing_artifacts.len()
            && self
                .failing_artifacts
                .iter()
                .all(|a| other.failing_artifacts.contains(a))
    }
}

impl Eq for Violation {}

impl Hash for Violation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rule.id.to_ascii_lowercase().hash(state);
        let mut addrs: Vec<usize> = self.failing_artifacts.iter().map(|a| a.addr()).collect();
        addrs.sort_unstable();
        addrs.hash(state);
    }
}

impl fmt::Debug for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .failing_artifacts
            .iter()
            .map(|a| a.display_name())
            .collect();
        names.sort();
        f.debug_struct("Violation")
            .field("rule", &self.rule.id)
            .field("severity", &self.rule.severity)
            .field("failing_artifacts", &names)
            .finish()
    }
}
