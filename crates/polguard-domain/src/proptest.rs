//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - evaluation idempotence and deduplication
//! - violation hash stability across runs
//! - rule classification and compare-rule pairing
//! - report ordering and truncation

use crate::artifact::ArtifactRef;
use crate::configure::{PolicyEngineConfigurator, RuleSetRegistry};
use crate::error::ConfigureError;
use crate::executor::{CompareArtifactExecutor, ExecutorKind, RuleExecutor};
use crate::policy::FailOn;
use crate::report::{ScanStats, assess};
use crate::test_support::{
    CountingPairRule, DuplicateEmittingRule, ForbidLicenseRule, NewerThanRule, TestArtifact,
    config, meta, mixed_registry, test_ruleset,
};
use crate::violation::{Violation, ViolationSet};
use crate::PolicyEngine;
use polguard_types::Verdict;
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

/// Distinct generic purls, some sharing a package name with different versions.
fn arb_purls(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(
        ("[a-e]", 1u32..4, 0u32..3).prop_map(|(name, major, minor)| {
            format!("pkg:generic/{name}@{major}.{minor}")
        }),
        0..max,
    )
    .prop_map(|set| set.into_iter().collect())
}

fn arb_license() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("GPL-2.0"), Just("MIT"), Just("Apache-2.0")]
}

fn arb_inventory(max: usize) -> impl Strategy<Value = Vec<(String, &'static str)>> {
    arb_purls(max).prop_flat_map(|purls| {
        let n = purls.len();
        (Just(purls), prop::collection::vec(arb_license(), n))
            .prop_map(|(p, l)| p.into_iter().zip(l).collect())
    })
}

fn build(inventory: &[(String, &str)]) -> Vec<ArtifactRef> {
    inventory
        .iter()
        .map(|(purl, license)| ArtifactRef::new(TestArtifact::named(purl).license(license)))
        .collect()
}

fn mixed_engine() -> PolicyEngine {
    PolicyEngineConfigurator::new(mixed_registry())
        .configure(["mixed"])
        .expect("mixed registry configures")
}

fn hashes(violations: &ViolationSet) -> BTreeSet<String> {
    violations.iter().map(Violation::violation_hash).collect()
}

// ============================================================================
// Evaluation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn evaluation_is_idempotent(inventory in arb_inventory(8)) {
        let engine = mixed_engine();
        let artifacts = build(&inventory);
        let first = engine.evaluate(&artifacts).unwrap();
        let second = engine.evaluate(&artifacts).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn hashes_survive_fresh_instances_and_reordering(
        (inventory, shuffled) in arb_inventory(8).prop_flat_map(|inv| {
            let s = Just(inv.clone()).prop_shuffle();
            (Just(inv), s)
        })
    ) {
        let engine = mixed_engine();
        let run1 = engine.evaluate(&build(&inventory)).unwrap();
        let run2 = engine.evaluate(&build(&shuffled)).unwrap();
        prop_assert_eq!(run1.len(), run2.len());
        prop_assert_eq!(hashes(&run1), hashes(&run2));
    }

    #[test]
    fn violation_hash_ignores_insertion_order(
        purls in arb_purls(6).prop_flat_map(|p| Just(p).prop_shuffle()),
    ) {
        let artifacts: Vec<ArtifactRef> = purls
            .iter()
            .map(|p| ArtifactRef::new(TestArtifact::named(p)))
            .collect();
        let mut reversed = artifacts.clone();
        reversed.reverse();

        let a = Violation::new(meta("R"), artifacts);
        let b = Violation::new(meta("r"), reversed);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.violation_hash(), crate::fingerprint::violation_hash("R", a.coordinates()));
    }

    #[test]
    fn every_violation_names_a_configured_rule(inventory in arb_inventory(8)) {
        let engine = mixed_engine();
        let known: BTreeSet<&str> = engine.executors().iter().flat_map(|e| e.rule_ids()).collect();
        let out = engine.evaluate(&build(&inventory)).unwrap();
        for v in &out {
            prop_assert!(known.contains(v.id()));
            prop_assert!(!v.failing_artifacts().is_empty());
        }
    }
}

// ============================================================================
// Classification and pairing
// ============================================================================

proptest! {
    #[test]
    fn every_rule_has_exactly_one_executor(singles in 0usize..5, compares in 0usize..5) {
        prop_assume!(singles + compares > 0);
        let registry = RuleSetRegistry::new().with("generated", move || {
            let mut rs = test_ruleset();
            let m = rs.meta().clone();
            for i in 0..singles {
                rs.push(ForbidLicenseRule::new(&m, &format!("L{i}")));
            }
            for i in 0..compares {
                rs.push(DuplicateEmittingRule::new(&m, &format!("cmp-{i}")));
            }
            rs
        });
        let engine = PolicyEngineConfigurator::new(registry)
            .configure(["generated"])
            .unwrap();

        let mut seen = BTreeSet::new();
        for executor in engine.executors() {
            for id in executor.rule_ids() {
                prop_assert!(seen.insert(id.to_string()), "rule {} in two executors", id);
                let expected = if id.starts_with("cmp-") {
                    ExecutorKind::CompareArtifact
                } else {
                    ExecutorKind::SingleArtifact
                };
                prop_assert_eq!(executor.kind(), expected);
            }
        }
        prop_assert_eq!(seen.len(), singles + compares);
        prop_assert_eq!(
            engine.executors().len(),
            usize::from(singles > 0) + usize::from(compares > 0)
        );
    }

    #[test]
    fn compare_rules_see_every_ordered_pair(n in 0usize..7) {
        let rs = test_ruleset();
        let rule = Arc::new(CountingPairRule::new(rs.meta()));
        let artifacts: Vec<ArtifactRef> = (0..n)
            .map(|i| ArtifactRef::new(TestArtifact::named(&format!("pkg:generic/p{i}@1"))))
            .collect();
        CompareArtifactExecutor::new(vec![rule.clone()])
            .execute_rules(&artifacts)
            .unwrap();
        prop_assert_eq!(rule.calls(), n * n);
        prop_assert_eq!(rule.self_calls(), n);
    }

    #[test]
    fn unresolvable_identifier_is_named(id in "[a-z]{1,8}\\.[A-Z][a-z]{1,8}") {
        let err = PolicyEngineConfigurator::new(mixed_registry())
            .configure([id.as_str()])
            .unwrap_err();
        let is_unresolved = matches!(err, ConfigureError::UnresolvedRuleSet { .. });
        prop_assert!(is_unresolved);
        prop_assert!(err.to_string().contains(&id));
    }
}

// ============================================================================
// Report shaping
// ============================================================================

proptest! {
    #[test]
    fn report_is_sorted_and_bounded(inventory in arb_inventory(10), max in 0usize..6) {
        let engine = mixed_engine();
        let out = engine.evaluate(&build(&inventory)).unwrap();
        let report = assess(&out, &config(FailOn::Fail, max), engine.rulesets(), ScanStats::default());

        prop_assert!(report.violations.len() <= max);
        prop_assert_eq!(report.data.violations_total as usize, out.len());
        prop_assert_eq!(report.data.truncated_reason.is_some(), out.len() > max);
        for pair in report.violations.windows(2) {
            prop_assert!(pair[0].severity >= pair[1].severity);
            if pair[0].severity == pair[1].severity {
                prop_assert!(
                    (&pair[0].rule_id, &pair[0].hash) <= (&pair[1].rule_id, &pair[1].hash)
                );
            }
        }
    }
}

// ============================================================================
// Worked scenarios
// ============================================================================

#[test]
fn scenario_forbidden_license_flags_only_the_licensed_artifact() {
    let x = ArtifactRef::new(TestArtifact::named("pkg:generic/x@1").license("GPL-2.0"));
    let y = ArtifactRef::new(TestArtifact::named("pkg:generic/y@1").license("MIT"));
    let registry = RuleSetRegistry::new().with("gpl", || {
        let rs = test_ruleset();
        let m = rs.meta().clone();
        rs.with_rule(ForbidLicenseRule::new(&m, "GPL-2.0"))
    });
    let engine = PolicyEngineConfigurator::new(registry)
        .configure(["gpl"])
        .unwrap();

    let out = engine.evaluate(&[x.clone(), y]).unwrap();
    assert_eq!(out.len(), 1);
    let v = out.iter().next().unwrap();
    assert_eq!(v.failing_artifacts().len(), 1);
    assert!(v.contains(&x));
}

#[test]
fn scenario_newer_than_reports_only_the_ordered_pair() {
    let x = ArtifactRef::new(TestArtifact::named("pkg:generic/lib@2.0"));
    let y = ArtifactRef::new(TestArtifact::named("pkg:generic/lib@1.0"));
    let registry = RuleSetRegistry::new().with("newer", || {
        let rs = test_ruleset();
        let m = rs.meta().clone();
        rs.with_rule(NewerThanRule::new(&m))
    });
    let engine = PolicyEngineConfigurator::new(registry)
        .configure(["newer"])
        .unwrap();

    let out = engine.evaluate(&[x.clone(), y.clone()]).unwrap();
    assert_eq!(out.len(), 1);
    let v = out.iter().next().unwrap();
    assert!(v.contains(&x) && v.contains(&y));
    assert!(!out.contains(&Violation::new(meta("newer-than"), [x.clone()])));
    assert!(!out.contains(&Violation::new(meta("newer-than"), [y])));
}

#[test]
fn scenario_two_runs_agree_on_hashes() {
    let engine = mixed_engine();
    let forward = build(&[
        ("pkg:generic/lib@2.0".to_string(), "GPL-2.0"),
        ("pkg:generic/lib@1.0".to_string(), "MIT"),
        ("pkg:generic/other@1.0".to_string(), "Apache-2.0"),
    ]);
    let backward = build(&[
        ("pkg:generic/other@1.0".to_string(), "Apache-2.0"),
        ("pkg:generic/lib@1.0".to_string(), "MIT"),
        ("pkg:generic/lib@2.0".to_string(), "GPL-2.0"),
    ]);
    let a = engine.evaluate(&forward).unwrap();
    let b = engine.evaluate(&backward).unwrap();
    assert_eq!(a.len(), 3);
    assert_eq!(hashes(&a), hashes(&b));
}

#[test]
fn scenario_unknown_rule_set_returns_no_engine() {
    let result = PolicyEngineConfigurator::new(mixed_registry()).configure(["unknown.Class"]);
    match result {
        Err(err) => assert!(err.to_string().contains("unknown.Class")),
        Ok(_) => panic!("configuration must fail"),
    }
}

#[test]
fn gpl_and_newer_version_fail_the_mixed_catalog() {
    let engine = mixed_engine();
    let out = engine
        .evaluate(&build(&[
            ("pkg:generic/lib@2.0".to_string(), "GPL-2.0"),
            ("pkg:generic/lib@1.0".to_string(), "Apache-2.0"),
        ]))
        .unwrap();
    let report = assess(&out, &config(FailOn::Fail, 10), engine.rulesets(), ScanStats::default());
    assert_eq!(report.verdict, Verdict::Fail);
    assert_eq!(report.counts.fail, 1);
    assert_eq!(report.counts.warn, 1);
}
