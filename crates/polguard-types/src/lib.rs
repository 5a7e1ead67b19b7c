//! Stable DTOs and IDs used across the polguard workspace.
//!
//! This crate is intentionally boring:
//! - severities and verdicts
//! - stable string IDs for built-in rule sets and rules
//! - canonical package coordinates (purls)
//! - the emitted report envelope

#![forbid(unsafe_code)]

pub mod ids;
pub mod purl;
pub mod receipt;

pub use purl::{Purl, PurlError};
pub use receipt::{
    ArtifactRecord, PolguardData, PolguardReport, ReportEnvelope, RuleSeverity, RulesetMeta,
    SCHEMA_REPORT_V1, ToolMeta, Verdict, VerdictCounts, ViolationRecord,
};
