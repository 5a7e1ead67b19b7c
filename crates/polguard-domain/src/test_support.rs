use crate::artifact::{ArtifactRef, ThirdPartyArtifact};
use crate::configure::RuleSetRegistry;
use crate::error::RuleError;
use crate::policy::{EffectiveConfig, FailOn};
use crate::rule::{
    CompareArtifactRule, Rule, RuleMeta, RuleOutcome, RuleSet, RuleShape, SingleArtifactRule,
};
use polguard_types::{Purl, RuleSeverity, RulesetMeta};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Debug, Default)]
pub struct TestArtifact {
    coordinates: Vec<Purl>,
    licenses: Vec<String>,
    label: Option<String>,
}

impl TestArtifact {
    pub fn named(purl: &str) -> Self {
        Self::with_coordinates(&[purl])
    }

    pub fn unidentified() -> Self {
        Self::default()
    }

    /// No coordinates, but a display name of its own.
    pub fn unidentified_named(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Self::default()
        }
    }

    pub fn with_coordinates(purls: &[&str]) -> Self {
        Self {
            coordinates: purls
                .iter()
                .map(|p| Purl::parse(p).expect("test purl"))
                .collect(),
            licenses: Vec::new(),
            label: None,
        }
    }

    pub fn license(mut self, license: &str) -> Self {
        self.licenses.push(license.to_string());
        self
    }
}

impl ThirdPartyArtifact for TestArtifact {
    fn is_identified(&self) -> bool {
        !self.coordinates.is_empty()
    }

    fn has_licenses(&self, licenses: &[String]) -> Vec<String> {
        self.licenses
            .iter()
            .filter(|l| licenses.contains(l))
            .cloned()
            .collect()
    }

    fn purl(&self) -> Option<Purl> {
        self.coordinates.first().cloned()
    }

    fn coordinates(&self) -> Vec<Purl> {
        self.coordinates.clone()
    }

    fn display_name(&self) -> String {
        match (&self.label, self.purl()) {
            (Some(label), _) => label.clone(),
            (None, Some(purl)) => purl.canonicalize(),
            (None, None) => "<unidentified>".to_string(),
        }
    }
}

pub fn test_ruleset() -> RuleSet {
    RuleSet::new("test.rules", "1.0.0")
}

pub fn meta(id: &str) -> Arc<RuleMeta> {
    RuleMeta::new(
        id,
        id,
        "test rule",
        RuleSeverity::Warn,
        test_ruleset().meta(),
    )
}

pub fn meta_with(id: &str, severity: RuleSeverity) -> Arc<RuleMeta> {
    RuleMeta::new(id, id, "test rule", severity, test_ruleset().meta())
}

pub fn artifacts(purls: &[&str]) -> Vec<ArtifactRef> {
    purls
        .iter()
        .map(|p| ArtifactRef::new(TestArtifact::named(p)))
        .collect()
}

/// `"mixed"`: two license rules and one version comparison.
pub fn mixed_registry() -> RuleSetRegistry {
    RuleSetRegistry::new().with("mixed", || {
        let rs = test_ruleset();
        let meta = rs.meta().clone();
        rs.with_rule(ForbidLicenseRule::new(&meta, "GPL-2.0"))
            .with_rule(NewerThanRule::new(&meta))
            .with_rule(ForbidLicenseRule::new(&meta, "MIT"))
    })
}

pub fn config(fail_on: FailOn, max_violations: usize) -> EffectiveConfig {
    EffectiveConfig {
        profile: "test".to_string(),
        rulesets: vec!["mixed".to_string()],
        fail_on,
        max_violations,
        exclude: Vec::new(),
        suppress: BTreeSet::new(),
    }
}

/// Flags artifacts carrying one license.
pub struct ForbidLicenseRule {
    meta: Arc<RuleMeta>,
    license: Vec<String>,
}

impl ForbidLicenseRule {
    pub fn new(ruleset: &RulesetMeta, license: &str) -> Self {
        Self {
            meta: RuleMeta::new(
                format!("forbid-{license}"),
                format!("Forbidden license {license}"),
                format!("artifacts licensed under {license} are not allowed"),
                RuleSeverity::Fail,
                ruleset,
            ),
            license: vec![license.to_string()],
        }
    }
}

impl Rule for ForbidLicenseRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }

    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Single(self)
    }
}

impl SingleArtifactRule for ForbidLicenseRule {
    fn evaluate(&self, artifact: &ArtifactRef) -> RuleOutcome {
        if artifact.has_licenses(&self.license).is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.violation([artifact.clone()])))
        }
    }
}

/// Flags `{left, right}` when both name the same package and left has the greater version.
pub struct NewerThanRule {
    meta: Arc<RuleMeta>,
}

impl NewerThanRule {
    pub fn new(ruleset: &RulesetMeta) -> Self {
        Self {
            meta: RuleMeta::new(
                "newer-than",
                "Newer than",
                "same package in two versions",
                RuleSeverity::Warn,
                ruleset,
            ),
        }
    }
}

impl Rule for NewerThanRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }

    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Compare(self)
    }
}

impl CompareArtifactRule for NewerThanRule {
    fn evaluate(&self, left: &ArtifactRef, right: &ArtifactRef) -> RuleOutcome {
        let (Some(l), Some(r)) = (left.purl(), right.purl()) else {
            return Ok(None);
        };
        if l.package_key() == r.package_key() && l.version() > r.version() {
            Ok(Some(self.violation([left.clone(), right.clone()])))
        } else {
            Ok(None)
        }
    }
}

/// Implements only the common contract.
pub struct OpaqueRule {
    meta: Arc<RuleMeta>,
}

impl OpaqueRule {
    pub fn new(ruleset: &RulesetMeta) -> Self {
        Self {
            meta: RuleMeta::new("opaque", "Opaque", "no evaluation", RuleSeverity::Info, ruleset),
        }
    }
}

impl Rule for OpaqueRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }
}

pub struct CountingPairRule {
    meta: Arc<RuleMeta>,
    calls: AtomicUsize,
    self_calls: AtomicUsize,
}

impl CountingPairRule {
    pub fn new(ruleset: &RulesetMeta) -> Self {
        Self {
            meta: RuleMeta::new("count", "Count", "counts pairs", RuleSeverity::Info, ruleset),
            calls: AtomicUsize::new(0),
            self_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn self_calls(&self) -> usize {
        self.self_calls.load(Ordering::SeqCst)
    }
}

impl Rule for CountingPairRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }

    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Compare(self)
    }
}

impl CompareArtifactRule for CountingPairRule {
    fn evaluate(&self, left: &ArtifactRef, right: &ArtifactRef) -> RuleOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if left == right {
            self.self_calls.fetch_add(1, Ordering::SeqCst);
        }
        Ok(None)
    }
}

pub struct FailingRule {
    meta: Arc<RuleMeta>,
}

impl FailingRule {
    pub fn new(ruleset: &RulesetMeta) -> Self {
        Self {
            meta: RuleMeta::new(
                "always-crashes",
                "Always crashes",
                "fails on every input",
                RuleSeverity::Fail,
                ruleset,
            ),
        }
    }
}

impl Rule for FailingRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }

    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Single(self)
    }
}

impl SingleArtifactRule for FailingRule {
    fn evaluate(&self, _artifact: &ArtifactRef) -> RuleOutcome {
        Err(RuleError::new("rule crashed"))
    }
}

/// Compare rule that reports `{left}` under a borrowed rule id on self-pairs.
pub struct DuplicateEmittingRule {
    meta: Arc<RuleMeta>,
}

impl DuplicateEmittingRule {
    pub fn new(ruleset: &RulesetMeta, rule_id: &str) -> Self {
        Self {
            meta: RuleMeta::new(rule_id, rule_id, "duplicate", RuleSeverity::Fail, ruleset),
        }
    }
}

impl Rule for DuplicateEmittingRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }

    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Compare(self)
    }
}

impl CompareArtifactRule for DuplicateEmittingRule {
    fn evaluate(&self, left: &ArtifactRef, right: &ArtifactRef) -> RuleOutcome {
        if left == right {
            Ok(Some(self.violation([left.clone()])))
        } else {
            Ok(None)
        }
    }
}
