use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `polguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolguardConfigV1 {
    /// Optional schema string for tooling (`polguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Preset: `strict` (default), `warn` or `audit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Rule set identifiers to load, in order. Replaces the profile's list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rulesets: Vec<String>,

    /// Comma-separated rule set identifiers; merged after `rulesets`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruleset_classes: Option<String>,

    /// When to fail the check: `fail`, `warn` or `never`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many violations to emit before truncating the list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_violations: Option<u32>,

    /// Glob patterns over canonical purls of artifacts to leave out of evaluation.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Violation hashes that have been reviewed and accepted.
    #[serde(default)]
    pub suppress: Vec<String>,
}
