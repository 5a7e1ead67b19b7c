use crate::policy::{EffectiveConfig, FailOn};
use crate::violation::{Violation, ViolationSet};
use polguard_types::{
    ArtifactRecord, PolguardData, RuleSeverity, RulesetMeta, Verdict, VerdictCounts,
    ViolationRecord,
};
use tracing::warn;

#[derive(Clone, Copy, Debug, Default)]
pub struct ScanStats {
    pub artifacts_scanned: u32,
    pub artifacts_excluded: u32,
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub violations: Vec<ViolationRecord>,
    pub data: PolguardData,
    pub counts: VerdictCounts,
}

/// Flatten a violation into its report form.
pub fn to_record(violation: &Violation) -> ViolationRecord {
    let mut artifacts: Vec<ArtifactRecord> = violation
        .failing_artifacts()
        .iter()
        .map(|a| {
            let mut coordinates: Vec<String> =
                a.coordinates().iter().map(|p| p.canonicalize()).collect();
            coordinates.sort();
            ArtifactRecord {
                name: a.display_name(),
                coordinates,
            }
        })
        .collect();
    artifacts.sort_by(|a, b| a.name.cmp(&b.name).then(a.coordinates.cmp(&b.coordinates)));

    let rule = violation.rule();
    ViolationRecord {
        rule_id: rule.id.clone(),
        rule_name: rule.name.clone(),
        description: rule.description.clone(),
        severity: rule.severity,
        ruleset: rule.ruleset.clone(),
        hash: violation.violation_hash(),
        artifacts,
    }
}

/// Turn an evaluation result into a deterministic, policy-checked report body.
pub fn assess(
    violations: &ViolationSet,
    cfg: &EffectiveConfig,
    rulesets: &[RulesetMeta],
    stats: ScanStats,
) -> DomainReport {
    let mut suppressed = 0u32;
    let mut records: Vec<ViolationRecord> = Vec::with_capacity(violations.len());
    for v in violations {
        let record = to_record(v);
        if cfg.is_suppressed(&record.hash) {
            warn!(rule = %record.rule_id, hash = %record.hash, "violation suppressed");
            suppressed += 1;
            continue;
        }
        records.push(record);
    }

    // Deterministic ordering before truncation.
    records.sort_by(compare_records);

    // Gate on everything that survived suppression, not only what gets emitted.
    let verdict = compute_verdict(&records, cfg.fail_on);
    let mut counts = count_severities(&records);
    counts.suppressed = suppressed;

    let total = records.len() as u32;
    let mut truncated_reason: Option<String> = None;
    if records.len() > cfg.max_violations {
        records.truncate(cfg.max_violations);
        truncated_reason = Some(format!(
            "violations truncated to max_violations={}",
            cfg.max_violations
        ));
    }

    let data = PolguardData {
        profile: cfg.profile.clone(),
        rulesets: rulesets.to_vec(),
        artifacts_scanned: stats.artifacts_scanned,
        artifacts_excluded: stats.artifacts_excluded,
        violations_total: total,
        violations_emitted: records.len() as u32,
        truncated_reason,
    };

    DomainReport {
        verdict,
        violations: records,
        data,
        counts,
    }
}

fn count_severities(records: &[ViolationRecord]) -> VerdictCounts {
    let mut counts = VerdictCounts::default();
    for r in records {
        match r.severity {
            RuleSeverity::Info => counts.info += 1,
            RuleSeverity::Warn => counts.warn += 1,
            RuleSeverity::Fail => counts.fail += 1,
        }
    }
    counts
}

pub fn compute_verdict(records: &[ViolationRecord], fail_on: FailOn) -> Verdict {
    let worst = records.iter().map(|r| r.severity).max();
    match (worst, fail_on) {
        (None | Some(RuleSeverity::Info), _) => Verdict::Pass,
        (Some(_), FailOn::Never) => Verdict::Warn,
        (Some(RuleSeverity::Fail), _) => Verdict::Fail,
        (Some(RuleSeverity::Warn), FailOn::Warn) => Verdict::Fail,
        (Some(RuleSeverity::Warn), FailOn::Fail) => Verdict::Warn,
    }
}

fn compare_records(a: &ViolationRecord, b: &ViolationRecord) -> std::cmp::Ordering {
    // 1) severity, fail first
    // 2) rule id
    // 3) hash
    // 4) failing artifacts (artifacts without coordinates share a hash)
    b.severity
        .cmp(&a.severity)
        .then_with(|| a.rule_id.cmp(&b.rule_id))
        .then_with(|| a.hash.cmp(&b.hash))
        .then_with(|| artifact_keys(a).cmp(artifact_keys(b)))
}

fn artifact_keys(record: &ViolationRecord) -> impl Iterator<Item = (&String, &Vec<String>)> {
    record.artifacts.iter().map(|a| (&a.name, &a.coordinates))
}
