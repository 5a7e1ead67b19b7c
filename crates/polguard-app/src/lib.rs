//! Use case orchestration for polguard.
//!
//! This crate provides the application layer: use cases that coordinate the domain, inventory,
//! settings and render layers. It is intentionally thin and delegates heavy lifting to the
//! appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod render;
mod report;
mod rulesets;

pub use check::{CheckInput, CheckOutput, run_check, run_check_with, verdict_exit_code};
pub use render::{render_markdown, render_markdown_from_json};
pub use report::{parse_report_json, serialize_report, write_report, write_text};
pub use rulesets::{
    RuleKind, RuleListing, RuleSetListing, describe_rulesets, format_ruleset_listing,
    list_builtin_rulesets, list_rulesets,
};
