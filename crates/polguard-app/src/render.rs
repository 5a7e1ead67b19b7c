//! Render use cases: markdown from in-memory or serialized reports.

use crate::report::parse_report_json;
use polguard_types::PolguardReport;

pub fn render_markdown(report: &PolguardReport) -> String {
    polguard_render::render_markdown(report)
}

/// Render a serialized `polguard.report.v1` document.
pub fn render_markdown_from_json(text: &str) -> anyhow::Result<String> {
    let report = parse_report_json(text)?;
    Ok(render_markdown(&report))
}
