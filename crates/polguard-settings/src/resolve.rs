use crate::{model::PolguardConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use polguard_domain::policy::{EffectiveConfig, FailOn};

/// Command-line values; each one beats the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    /// Replaces every configured rule set when non-empty.
    pub rulesets: Vec<String>,
    pub fail_on: Option<String>,
    pub max_violations: Option<u32>,
    /// Added to the configured exclusions.
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: PolguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile).with_context(|| {
        format!(
            "unknown profile: {profile} (expected {})",
            presets::PROFILES.join("|")
        )
    })?;

    // Rule sets: overrides, else file (list + legacy comma string), else preset.
    let mut from_file = cfg.rulesets.clone();
    if let Some(classes) = cfg.ruleset_classes.as_deref() {
        from_file.extend(split_ruleset_classes(classes));
    }
    if !overrides.rulesets.is_empty() {
        effective.rulesets = overrides.rulesets.clone();
    } else if !from_file.is_empty() {
        effective.rulesets = from_file;
    }
    for id in &mut effective.rulesets {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            anyhow::bail!("invalid rulesets entry: empty rule set identifier");
        }
        *id = trimmed.to_string();
    }

    // max violations
    if let Some(mv) = overrides.max_violations.or(cfg.max_violations) {
        effective.max_violations = mv as usize;
    }

    // fail_on
    if let Some(fail_on_s) = overrides.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    let exclude: Vec<String> = cfg
        .exclude
        .iter()
        .chain(&overrides.exclude)
        .cloned()
        .collect();
    validate_globs("exclude", &exclude)?;
    effective.exclude = exclude;

    for hash in &cfg.suppress {
        let hash = hash.trim();
        if hash.is_empty() {
            anyhow::bail!("invalid suppress entry: empty violation hash");
        }
        effective.suppress.insert(hash.to_string());
    }

    Ok(ResolvedConfig { effective })
}

/// Split a comma-separated list of rule set identifiers.
///
/// Blank entries are kept so that `"a,,b"` is rejected rather than silently shortened.
pub fn split_ruleset_classes(v: &str) -> Vec<String> {
    if v.trim().is_empty() {
        return Vec::new();
    }
    v.split(',').map(|s| s.trim().to_string()).collect()
}

fn validate_globs(key: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid {key} glob: {pattern}"))?;
    }
    Ok(())
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "fail" | "error" => Ok(FailOn::Fail),
        "warn" | "warning" => Ok(FailOn::Warn),
        "never" => Ok(FailOn::Never),
        other => anyhow::bail!("unknown fail_on: {other} (expected fail|warn|never)"),
    }
}
