//! Developer tasks (schema generation, fixture conformance, catalog checks).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use polguard_app::{RuleKind, list_builtin_rulesets};
use polguard_types::SCHEMA_REPORT_V1;
use schemars::schema_for;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if !manifest_dir.ends_with("xtask") {
        return manifest_dir;
    }
    manifest_dir
        .parent()
        .map(PathBuf::from)
        .unwrap_or(manifest_dir.clone())
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(polguard_types::PolguardReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(polguard_settings::PolguardConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "polguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "polguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo run -p xtask -- emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate expected fixture reports against the report schema");
    eprintln!("  catalog-check     Validate the built-in rule sets");
}

/// Base64 of a 16 byte MD5 digest: 22 payload characters plus `==`.
fn is_violation_hash(s: &str) -> bool {
    s.len() == 24
        && s.ends_with("==")
        && s[..22]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/')
}

fn severity_rank(s: &str) -> u8 {
    match s {
        "fail" => 2,
        "warn" => 1,
        _ => 0,
    }
}

/// Report invariants the schema cannot express.
fn report_invariants(filename: &str, value: &serde_json::Value, errors: &mut Vec<String>) {
    if value.get("schema").and_then(|v| v.as_str()) != Some(SCHEMA_REPORT_V1) {
        errors.push(format!("{filename}: schema is not {SCHEMA_REPORT_V1}"));
    }

    let violations = value
        .get("violations")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();

    let mut counted = [0u64; 3];
    let mut previous: Option<(u8, String, String)> = None;
    for (i, v) in violations.iter().enumerate() {
        let hash = v.get("hash").and_then(|h| h.as_str()).unwrap_or_default();
        if !is_violation_hash(hash) {
            errors.push(format!("{filename}: violations[{i}].hash '{hash}' is not a base64 MD5"));
        }
        let severity = v.get("severity").and_then(|s| s.as_str()).unwrap_or_default();
        let rank = severity_rank(severity);
        counted[rank as usize] += 1;

        let rule_id = v.get("rule_id").and_then(|r| r.as_str()).unwrap_or_default();
        let key = (rank, rule_id.to_string(), hash.to_string());
        if let Some(prev) = &previous {
            // Equal hashes are legitimate: artifacts without coordinates all hash alike.
            let in_order =
                prev.0 > key.0 || (prev.0 == key.0 && (&prev.1, &prev.2) <= (&key.1, &key.2));
            if !in_order {
                errors.push(format!(
                    "{filename}: violations[{i}] is out of order (severity desc, rule id, hash)"
                ));
            }
        }
        previous = Some(key);
    }

    let counts = &value["counts"];
    let total = value["data"]["violations_total"].as_u64();
    let truncated = total.is_some_and(|t| t > violations.len() as u64);
    let mut counted_total = 0u64;
    for (name, rank) in [("info", 0usize), ("warn", 1), ("fail", 2)] {
        let count = counts[name].as_u64().unwrap_or_default();
        counted_total += count;
        // Counts cover truncated violations too, so only a complete list must match exactly.
        let consistent = if truncated {
            count >= counted[rank]
        } else {
            count == counted[rank]
        };
        if !consistent {
            errors.push(format!("{filename}: counts.{name} does not match violations"));
        }
    }
    if total != Some(counted_total) {
        errors.push(format!("{filename}: counts do not add up to data.violations_total"));
    }
    if value["data"]["violations_emitted"].as_u64() != Some(violations.len() as u64) {
        errors.push(format!("{filename}: data.violations_emitted does not match violations"));
    }
}

/// Validate every `expected.report.json` fixture against the generated report schema.
fn conform() -> anyhow::Result<()> {
    let schema_value =
        serde_json::to_value(generate_report_schema()).context("Failed to serialize schema")?;
    let compiled = jsonschema::draft202012::new(&schema_value)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {}", e))?;
    println!("✓ polguard.report.v1 schema compiles");

    let fixtures = fixtures_dir();
    let mut entries: Vec<PathBuf> = fs::read_dir(&fixtures)
        .with_context(|| format!("Failed to read {}", fixtures.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .map(|dir| dir.join("expected.report.json"))
        .filter(|p| p.exists())
        .collect();
    entries.sort();

    let mut errors = Vec::new();
    for path in &entries {
        let filename = path
            .strip_prefix(&fixtures)
            .unwrap_or(path)
            .display()
            .to_string();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", filename))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", filename))?;

        for err in compiled.iter_errors(&value) {
            errors.push(format!("{}: schema validation: {}", filename, err));
        }
        report_invariants(&filename, &value, &mut errors);
    }

    if errors.is_empty() {
        println!("✓ {} fixture reports conform", entries.len());
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Conformance failed with {} errors", errors.len())
    }
}

/// Every built-in rule must be executable and uniquely identified within its rule set.
fn catalog_check() -> anyhow::Result<()> {
    let listings = list_builtin_rulesets().context("resolve built-in rule sets")?;
    let mut errors = Vec::new();

    for listing in &listings {
        if listing.identifier != listing.meta.name {
            errors.push(format!(
                "rule set '{}' registered under identifier '{}'",
                listing.meta.name, listing.identifier
            ));
        }
        if listing.rules.is_empty() {
            errors.push(format!("rule set '{}' has no rules", listing.identifier));
        }
        let mut seen = BTreeSet::new();
        for rule in &listing.rules {
            if !seen.insert(rule.id.to_lowercase()) {
                errors.push(format!(
                    "rule set '{}' defines rule id '{}' twice",
                    listing.identifier, rule.id
                ));
            }
            if rule.kind == RuleKind::Unsupported {
                errors.push(format!(
                    "rule '{}' of rule set '{}' has no executor",
                    rule.id, listing.identifier
                ));
            }
            if rule.name.is_empty() {
                errors.push(format!("rule '{}' has an empty name", rule.id));
            }
        }
    }

    if errors.is_empty() {
        let rules: usize = listings.iter().map(|l| l.rules.len()).sum();
        println!("✓ {} rule sets, {} rules", listings.len(), rules);
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!("Catalog check failed with {} errors", errors.len())
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "catalog-check" => catalog_check(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo run -p xtask -- help` for usage."),
    }
    .context("xtask failed")
}
