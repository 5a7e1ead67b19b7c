use polguard_domain::policy::{EffectiveConfig, FailOn};
use polguard_types::ids;
use std::collections::BTreeSet;

pub const PROFILES: &[&str] = &["strict", "warn", "audit"];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> Option<EffectiveConfig> {
    match profile {
        "strict" => Some(strict_profile()),
        "warn" => Some(warn_profile()),
        "audit" => Some(audit_profile()),
        _ => None,
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        rulesets: default_rulesets(),
        fail_on: FailOn::Fail,
        max_violations: 200,
        exclude: Vec::new(),
        suppress: BTreeSet::new(),
    }
}

fn warn_profile() -> EffectiveConfig {
    // Same rules, but nothing breaks the build.
    EffectiveConfig {
        profile: "warn".to_string(),
        fail_on: FailOn::Never,
        ..strict_profile()
    }
}

fn audit_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "audit".to_string(),
        fail_on: FailOn::Never,
        max_violations: usize::MAX,
        ..strict_profile()
    }
}

fn default_rulesets() -> Vec<String> {
    vec![
        ids::RULESET_LICENSES.to_string(),
        ids::RULESET_IDENTIFICATION.to_string(),
    ]
}
