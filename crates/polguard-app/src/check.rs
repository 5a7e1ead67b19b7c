//! The `check` use case: evaluate policy and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use polguard_domain::report::{DomainReport, ScanStats, assess};
use polguard_domain::{PolicyEngine, PolicyEngineConfigurator, RuleSetResolver};
use polguard_inventory::Exclusions;
use polguard_settings::{Overrides, ResolvedConfig};
use polguard_types::{PolguardReport, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict, ids};
use time::OffsetDateTime;
use tracing::info;

use crate::rulesets::describe_rulesets;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Inventory file, or a directory of inventory files.
    pub inventory: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// Worker threads for evaluation; `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: PolguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
    /// Human-readable list of the loaded rule sets.
    pub ruleset_description: String,
}

/// Run the check use case with the built-in rule sets.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    run_check_with(input, polguard_rulesets::builtin_registry())
}

/// Run the check use case: parse config, load inventory, evaluate policy, produce report.
pub fn run_check_with<R: RuleSetResolver>(
    input: CheckInput<'_>,
    resolver: R,
) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        polguard_settings::PolguardConfigV1::default()
    } else {
        polguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = polguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;
    let effective = &resolved.effective;

    // Configure before touching the inventory: a bad rule set list fails fast.
    let engine = PolicyEngineConfigurator::new(resolver)
        .configure(&effective.rulesets)
        .context("configure policy engine")?;
    let ruleset_description = describe_rulesets(engine.rulesets());
    info!(rulesets = engine.rulesets().len(), rules = engine.rule_count(), "policy engine ready");

    let artifacts = polguard_inventory::load_inventory(input.inventory)
        .with_context(|| format!("load inventory {}", input.inventory))?;
    let exclusions = Exclusions::new(&effective.exclude).context("compile exclusions")?;
    let (artifacts, excluded) = exclusions.apply(polguard_inventory::into_refs(artifacts));
    info!(artifacts = artifacts.len(), excluded, "inventory loaded");

    let violations = evaluate(&engine, &artifacts, input.threads)?;

    let stats = ScanStats {
        artifacts_scanned: artifacts.len() as u32,
        artifacts_excluded: excluded as u32,
    };
    let DomainReport {
        verdict,
        violations,
        data,
        counts,
    } = assess(&violations, effective, engine.rulesets(), stats);

    info!(
        verdict = ?verdict,
        emitted = data.violations_emitted,
        suppressed = counts.suppressed,
        "policy check finished"
    );

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        counts,
        violations,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
        ruleset_description,
    })
}

fn evaluate(
    engine: &PolicyEngine,
    artifacts: &[polguard_domain::ArtifactRef],
    threads: Option<usize>,
) -> anyhow::Result<polguard_domain::ViolationSet> {
    let result = match threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .context("build evaluation thread pool")?;
            engine.evaluate_in(&pool, artifacts)
        }
        None => engine.evaluate(artifacts),
    };
    result.context("evaluate policy")
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
