use polguard_types::{PolguardReport, RuleSeverity, Verdict};

pub fn render_markdown(report: &PolguardReport) -> String {
    let mut out = String::new();

    out.push_str("# Polguard report\n\n");
    let verdict = match report.verdict {
        Verdict::Pass => "PASS",
        Verdict::Warn => "WARN",
        Verdict::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Artifacts: {} scanned, {} excluded\n- Violations: {} (emitted) / {} (total), {} suppressed\n",
        verdict,
        report.data.artifacts_scanned,
        report.data.artifacts_excluded,
        report.data.violations_emitted,
        report.data.violations_total,
        report.counts.suppressed,
    ));
    if !report.data.rulesets.is_empty() {
        let names: Vec<String> = report
            .data
            .rulesets
            .iter()
            .map(|r| format!("`{}` {}", r.name, r.version))
            .collect();
        out.push_str(&format!("- Rule sets: {}\n", names.join(", ")));
    }
    out.push('\n');

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if report.violations.is_empty() {
        out.push_str("No violations.\n");
        return out;
    }

    out.push_str("## Violations\n\n");

    for v in &report.violations {
        let sev = match v.severity {
            RuleSeverity::Info => "INFO",
            RuleSeverity::Warn => "WARN",
            RuleSeverity::Fail => "FAIL",
        };
        out.push_str(&format!(
            "- [{}] `{}` {}: {}\n",
            sev, v.rule_id, v.rule_name, v.description
        ));
        for a in &v.artifacts {
            if a.coordinates.is_empty() || a.coordinates.iter().any(|c| c == &a.name) {
                out.push_str(&format!("  - {}\n", a.name));
            } else {
                out.push_str(&format!("  - {} ({})\n", a.name, a.coordinates.join(", ")));
            }
        }
        out.push_str(&format!("  - hash: `{}`\n", v.hash));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use polguard_types::{
        ArtifactRecord, PolguardData, ReportEnvelope, RulesetMeta, SCHEMA_REPORT_V1, ToolMeta,
        VerdictCounts, ViolationRecord,
    };
    use time::OffsetDateTime;

    fn report(verdict: Verdict, violations: Vec<ViolationRecord>, data: PolguardData) -> PolguardReport {
        ReportEnvelope {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "polguard".to_string(),
                version: "0.0.0".to_string(),
            },
            started_at: OffsetDateTime::UNIX_EPOCH,
            finished_at: OffsetDateTime::UNIX_EPOCH,
            verdict,
            counts: VerdictCounts::default(),
            violations,
            data,
        }
    }

    #[test]
    fn renders_empty_report() {
        let md = render_markdown(&report(Verdict::Pass, Vec::new(), PolguardData::default()));
        assert!(md.contains("Verdict: **PASS**"));
        assert!(md.contains("No violations"));
    }

    #[test]
    fn renders_violations_with_artifacts_and_truncation() {
        let ruleset = RulesetMeta {
            name: "polguard.licenses".to_string(),
            version: "1.0.0".to_string(),
        };
        let violation = ViolationRecord {
            rule_id: "EPLvsGPL".to_string(),
            rule_name: "EPL and GPL combined".to_string(),
            description: "incompatible".to_string(),
            severity: RuleSeverity::Fail,
            ruleset: ruleset.clone(),
            hash: "abc==".to_string(),
            artifacts: vec![
                ArtifactRecord {
                    name: "epl.jar".to_string(),
                    coordinates: vec!["pkg:maven/org.example/epl@1.0".to_string()],
                },
                ArtifactRecord {
                    name: "<unidentified>".to_string(),
                    coordinates: Vec::new(),
                },
            ],
        };
        let data = PolguardData {
            profile: "strict".to_string(),
            rulesets: vec![ruleset],
            artifacts_scanned: 3,
            artifacts_excluded: 1,
            violations_total: 2,
            violations_emitted: 1,
            truncated_reason: Some("truncated".to_string()),
        };

        let md = render_markdown(&report(Verdict::Fail, vec![violation], data));
        assert!(md.contains("Verdict: **FAIL**"));
        assert!(md.contains("3 scanned, 1 excluded"));
        assert!(md.contains("`polguard.licenses` 1.0.0"));
        assert!(md.contains("> Note: truncated"));
        assert!(md.contains("- [FAIL] `EPLvsGPL` EPL and GPL combined: incompatible"));
        assert!(md.contains("  - epl.jar (pkg:maven/org.example/epl@1.0)"));
        assert!(md.contains("  - <unidentified>\n"));
        assert!(md.contains("hash: `abc==`"));
    }
}
