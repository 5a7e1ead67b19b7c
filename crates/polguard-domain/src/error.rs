use std::error::Error as StdError;

/// Failure raised by rule code while evaluating an artifact (or a pair of artifacts).
///
/// This is a defect in the rule catalog, never a way of saying "no violation": an expected,
/// data-driven outcome is returned as `Ok(Some(violation))` / `Ok(None)`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RuleError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl RuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that abort a `PolicyEngine::evaluate` call.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("rule '{rule_id}' of rule set '{ruleset}' failed during evaluation")]
    RuleFailed {
        rule_id: String,
        ruleset: String,
        #[source]
        source: RuleError,
    },
}

/// Failure of a [`crate::RuleSetResolver`] to produce a rule set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown rule set identifier: {0}")]
    Unknown(String),
}

/// Errors that abort engine configuration. No partial engine is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    #[error("configuration error: no rule set reference given")]
    NoRuleSets,

    #[error("configuration error: rule set could not be resolved: {identifier}")]
    UnresolvedRuleSet {
        identifier: String,
        #[source]
        source: ResolveError,
    },

    /// A rule that implements neither single-artifact nor compare-artifact evaluation.
    /// This is a programming error in the rule catalog.
    #[error("programming error: rule '{rule_id}' of rule set '{ruleset}' has no executor")]
    UnsupportedRule { rule_id: String, ruleset: String },
}
