//! Report (de)serialization and file output.

use anyhow::Context;
use camino::Utf8Path;
use polguard_types::{PolguardReport, SCHEMA_REPORT_V1};

/// Parse a `polguard.report.v1` JSON document.
pub fn parse_report_json(text: &str) -> anyhow::Result<PolguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse polguard report")
}

pub fn serialize_report(report: &PolguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// Write the report as pretty JSON, creating parent directories.
pub fn write_report(path: &Utf8Path, report: &PolguardReport) -> anyhow::Result<()> {
    let bytes = serialize_report(report)?;
    write_bytes(path, &bytes)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory {parent}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))
}
