use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for polguard reports.
pub const SCHEMA_REPORT_V1: &str = "polguard.report.v1";

/// Configured severity of a rule. Ordered: `Info < Warn < Fail`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Info,
    Warn,
    Fail,
}

impl RuleSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleSeverity::Info => "info",
            RuleSeverity::Warn => "warn",
            RuleSeverity::Fail => "fail",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Name and version of a loaded rule set.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub struct RulesetMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactRecord {
    pub name: String,
    /// Canonical coordinates, sorted.
    #[serde(default)]
    pub coordinates: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViolationRecord {
    pub rule_id: String,
    pub rule_name: String,
    pub description: String,
    pub severity: RuleSeverity,
    pub ruleset: RulesetMeta,

    /// Stable identifier of the violation across runs (base64 MD5 over rule id and
    /// sorted canonical coordinates). Used for suppression and trending.
    pub hash: String,

    pub artifacts: Vec<ArtifactRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VerdictCounts {
    pub info: u32,
    pub warn: u32,
    pub fail: u32,
    #[serde(default)]
    pub suppressed: u32,
}

/// Polguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct PolguardData {
    pub profile: String,
    pub rulesets: Vec<RulesetMeta>,

    pub artifacts_scanned: u32,
    #[serde(default)]
    pub artifacts_excluded: u32,

    pub violations_total: u32,
    pub violations_emitted: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_reason: Option<String>,
}

/// A generic receipt/envelope.
///
/// Keeping this generic allows embedding tool-specific data while still enforcing a stable
/// outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = PolguardData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub counts: VerdictCounts,
    pub violations: Vec<ViolationRecord>,
    pub data: TData,
}

pub type PolguardReport = ReportEnvelope<PolguardData>;
