//! `polguard.licenses`: license obligations of single artifacts and of combinations.

use crate::utils::{compare_versions, owned};
use polguard_domain::{
    ArtifactRef, CompareArtifactRule, Rule, RuleMeta, RuleOutcome, RuleSet, RuleShape,
    SingleArtifactRule,
};
use polguard_types::{RuleSeverity, RulesetMeta, ids};
use std::cmp::Ordering;
use std::sync::Arc;

pub const VERSION: &str = "1.0.0";

const STRONG_COPYLEFT: &[&str] = &[
    "AGPL-3.0",
    "AGPL-3.0-only",
    "AGPL-3.0-or-later",
    "GPL-2.0",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
];

const EPL: &[&str] = &["EPL-1.0", "EPL-2.0"];

const GPL: &[&str] = &[
    "GPL-2.0",
    "GPL-2.0-only",
    "GPL-2.0-or-later",
    "GPL-3.0",
    "GPL-3.0-only",
    "GPL-3.0-or-later",
];

pub fn ruleset() -> RuleSet {
    let rs = RuleSet::new(ids::RULESET_LICENSES, VERSION);
    let meta = rs.meta().clone();
    rs.with_rule(ForbiddenLicenseRule::new(&meta))
        .with_rule(EplVsGplRule::new(&meta))
        .with_rule(MultipleVersionsRule::new(&meta))
}

/// `FL`: a strong copyleft license is among the effective licenses.
pub struct ForbiddenLicenseRule {
    meta: Arc<RuleMeta>,
    forbidden: Vec<String>,
}

impl ForbiddenLicenseRule {
    pub fn new(ruleset: &RulesetMeta) -> Self {
        Self {
            meta: RuleMeta::new(
                ids::RULE_FORBIDDEN_LICENSE,
                "Forbidden license",
                "The artifact is licensed under a strong copyleft license that is not \
                 allowed in distributed products.",
                RuleSeverity::Fail,
                ruleset,
            ),
            forbidden: owned(STRONG_COPYLEFT),
        }
    }
}

impl Rule for ForbiddenLicenseRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }

    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Single(self)
    }
}

impl SingleArtifactRule for ForbiddenLicenseRule {
    fn evaluate(&self, artifact: &ArtifactRef) -> RuleOutcome {
        if artifact.has_licenses(&self.forbidden).is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.violation([artifact.clone()])))
        }
    }
}

/// `EPLvsGPL`: one artifact under EPL combined with another under GPL.
///
/// Only the `(EPL, GPL)` orientation reports, so each combination is found once. An
/// artifact offered under both licenses is not in conflict with itself.
pub struct EplVsGplRule {
    meta: Arc<RuleMeta>,
    epl: Vec<String>,
    gpl: Vec<String>,
}

impl EplVsGplRule {
    pub fn new(ruleset: &RulesetMeta) -> Self {
        Self {
            meta: RuleMeta::new(
                ids::RULE_EPL_VS_GPL,
                "EPL and GPL combined",
                "An EPL licensed artifact is distributed together with a GPL licensed \
                 artifact; the licenses are incompatible.",
                RuleSeverity::Fail,
                ruleset,
            ),
            epl: owned(EPL),
            gpl: owned(GPL),
        }
    }
}

impl Rule for EplVsGplRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }

    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Compare(self)
    }
}

impl CompareArtifactRule for EplVsGplRule {
    fn evaluate(&self, left: &ArtifactRef, right: &ArtifactRef) -> RuleOutcome {
        if left == right {
            return Ok(None);
        }
        if !left.has_licenses(&self.epl).is_empty() && !right.has_licenses(&self.gpl).is_empty()
        {
            Ok(Some(self.violation([left.clone(), right.clone()])))
        } else {
            Ok(None)
        }
    }
}

/// `MV`: the same package appears in two different versions.
pub struct MultipleVersionsRule {
    meta: Arc<RuleMeta>,
}

impl MultipleVersionsRule {
    pub fn new(ruleset: &RulesetMeta) -> Self {
        Self {
            meta: RuleMeta::new(
                ids::RULE_MULTIPLE_VERSIONS,
                "Multiple versions",
                "The same package is included in more than one version.",
                RuleSeverity::Warn,
                ruleset,
            ),
        }
    }
}

impl Rule for MultipleVersionsRule {
    fn meta(&self) -> &Arc<RuleMeta> {
        &self.meta
    }

    fn shape(self: Arc<Self>) -> RuleShape {
        RuleShape::Compare(self)
    }
}

impl CompareArtifactRule for MultipleVersionsRule {
    fn evaluate(&self, left: &ArtifactRef, right: &ArtifactRef) -> RuleOutcome {
        if left == right {
            return Ok(None);
        }
        let (Some(l), Some(r)) = (left.purl(), right.purl()) else {
            return Ok(None);
        };
        let (Some(lv), Some(rv)) = (l.version(), r.version()) else {
            return Ok(None);
        };
        // Report the lower/higher orientation only.
        if l.package_key() == r.package_key() && compare_versions(lv, rv) == Ordering::Less {
            Ok(Some(self.violation([left.clone(), right.clone()])))
        } else {
            Ok(None)
        }
    }
}
