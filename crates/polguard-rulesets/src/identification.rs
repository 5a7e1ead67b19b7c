//! `polguard.identification`: can every artifact be traced to a known package?

use polguard_domain::{
    ArtifactRef, Rule, RuleMeta, RuleOutcome, RuleSet, RuleShape, SingleArtifactRule,
};
use polguard_types::{RuleSeverity, RulesetMeta, ids};
use std::sync::Arc;

pub const VERSION: &str = "1.0.0";

pub fn ruleset() -> RuleSet {
    let rs = RuleSet::new(ids::RULESET_IDENTIFICATION, VERSION);
    let meta = rs.meta().clone();
    rs.with_rule(UnidentifiedArtifactRule::new(&meta))
        .with_rule(NoCanonicalCoordinateRule::new(&meta))
}

/// `UA`: the artifact has no coordinate at all.
pub struct UnidentifiedArtifactRule {
    meta: Arc<RuleMeta>,
}

impl UnidentifiedArtifactRule {
    pub fn new(ruleset: &RulesetMeta) -> Self {
        Self {
            meta: RuleMeta::new(
                ids::RULE_UNIDENTIFIED_ARTIFACT,
                "Unidentified artifact",
                "The artifact could not be matched to any known package, so its licenses \
                 and origin cannot be verified.",
                RuleSeverity::Warn,
                ruleset,
            ),
        }
    }
}

impl Rule for UnidentifiedArtifactRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }

    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Single(self)
    }
}

impl SingleArtifactRule for UnidentifiedArtifactRule {
    fn evaluate(&self, artifact: &ArtifactRef) -> RuleOutcome {
        if artifact.is_identified() {
            Ok(None)
        } else {
            Ok(Some(self.violation([artifact.clone()])))
        }
    }
}

/// `NC`: identified, but none of the coordinates is a package URL.
pub struct NoCanonicalCoordinateRule {
    meta: Arc<RuleMeta>,
}

impl NoCanonicalCoordinateRule {
    pub fn new(ruleset: &RulesetMeta) -> Self {
        Self {
            meta: RuleMeta::new(
                ids::RULE_NO_COORDINATE,
                "No canonical coordinate",
                "The artifact is identified only by non-purl coordinates; its violations \
                 cannot be tracked across runs.",
                RuleSeverity::Info,
                ruleset,
            ),
        }
    }
}

impl Rule for NoCanonicalCoordinateRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }

    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Single(self)
    }
}

impl SingleArtifactRule for NoCanonicalCoordinateRule {
    fn evaluate(&self, artifact: &ArtifactRef) -> RuleOutcome {
        if artifact.is_identified() && artifact.purl().is_none() {
            Ok(Some(self.violation([artifact.clone()])))
        } else {
            Ok(None)
        }
    }
}
