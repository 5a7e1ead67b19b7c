//! Stable identifiers for built-in rule sets and rules.
//!
//! Rule set identifiers are dotted names resolved by the rule set registry.
//! Rule ids are short and unique within their rule set.

// Rule sets
pub const RULESET_IDENTIFICATION: &str = "polguard.identification";
pub const RULESET_LICENSES: &str = "polguard.licenses";

// Rules: polguard.identification
pub const RULE_UNIDENTIFIED_ARTIFACT: &str = "UA";
pub const RULE_NO_COORDINATE: &str = "NC";

// Rules: polguard.licenses
pub const RULE_FORBIDDEN_LICENSE: &str = "FL";
pub const RULE_EPL_VS_GPL: &str = "EPLvsGPL";
pub const RULE_MULTIPLE_VERSIONS: &str = "MV";

// Tool-level
pub const TOOL_NAME: &str = "polguard";
