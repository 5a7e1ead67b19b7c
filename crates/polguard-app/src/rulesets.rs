//! The `rulesets` use case: describe loaded rule sets and list the built-in catalog.

use polguard_domain::{ResolveError, RuleSetResolver, RuleShape};
use polguard_types::{RuleSeverity, RulesetMeta};

/// Human-readable summary of the rule sets a policy engine was built from.
pub fn describe_rulesets(rulesets: &[RulesetMeta]) -> String {
    let mut out = String::from("Policy Engine, with rule sets:\n");
    for rs in rulesets {
        out.push_str(&format!(
            " - Rule set {} in version {}\n",
            rs.name, rs.version
        ));
    }
    out
}

/// How the engine executes a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
    Single,
    Compare,
    Unsupported,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::Single => "single",
            RuleKind::Compare => "compare",
            RuleKind::Unsupported => "unsupported",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleListing {
    pub id: String,
    pub name: String,
    pub severity: RuleSeverity,
    pub kind: RuleKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleSetListing {
    /// Registry identifier the rule set is resolved by.
    pub identifier: String,
    pub meta: RulesetMeta,
    pub rules: Vec<RuleListing>,
}

/// Resolve every identifier and list its rules.
pub fn list_rulesets<R, I, S>(resolver: &R, identifiers: I) -> Result<Vec<RuleSetListing>, ResolveError>
where
    R: RuleSetResolver,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    identifiers
        .into_iter()
        .map(|identifier| {
            let identifier = identifier.as_ref();
            let ruleset = resolver.resolve(identifier)?;
            let rules = ruleset
                .rules()
                .iter()
                .map(|rule| RuleListing {
                    id: rule.id().to_string(),
                    name: rule.name().to_string(),
                    severity: rule.severity(),
                    kind: match rule.clone().shape() {
                        RuleShape::Single(_) => RuleKind::Single,
                        RuleShape::Compare(_) => RuleKind::Compare,
                        RuleShape::Unsupported => RuleKind::Unsupported,
                    },
                })
                .collect();
            Ok(RuleSetListing {
                identifier: identifier.to_string(),
                meta: ruleset.meta().clone(),
                rules,
            })
        })
        .collect()
}

/// List the rule sets compiled into this build.
pub fn list_builtin_rulesets() -> Result<Vec<RuleSetListing>, ResolveError> {
    list_rulesets(
        &polguard_rulesets::builtin_registry(),
        polguard_rulesets::builtin_identifiers(),
    )
}

/// Format a catalog listing for terminal display.
pub fn format_ruleset_listing(listings: &[RuleSetListing]) -> String {
    let mut out = String::new();
    for (i, listing) in listings.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!(
            "{} (version {})\n",
            listing.identifier, listing.meta.version
        ));
        for rule in &listing.rules {
            out.push_str(&format!(
                "  {:<10} {:<5} {:<8} {}\n",
                rule.id,
                rule.severity.as_str(),
                rule.kind.as_str(),
                rule.name
            ));
        }
    }
    out
}
