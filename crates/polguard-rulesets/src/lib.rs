//! Built-in rule sets.
//!
//! Each rule set is compiled in behind a cargo feature (all enabled by default) and
//! registered under its stable identifier from [`polguard_types::ids`].

#![forbid(unsafe_code)]

#[cfg(feature = "ruleset-identification")]
pub mod identification;
#[cfg(feature = "ruleset-licenses")]
pub mod licenses;
mod utils;


use polguard_domain::RuleSetRegistry;
use polguard_types::ids;

/// Identifiers compiled into this build, sorted.
pub fn builtin_identifiers() -> Vec<&'static str> {
    let mut out = Vec::new();
    if cfg!(feature = "ruleset-identification") {
        out.push(ids::RULESET_IDENTIFICATION);
    }
    if cfg!(feature = "ruleset-licenses") {
        out.push(ids::RULESET_LICENSES);
    }
    out.sort_unstable();
    out
}

/// Registry holding every built-in rule set.
pub fn builtin_registry() -> RuleSetRegistry {
    #[allow(unused_mut)]
    let mut registry = RuleSetRegistry::new();
    #[cfg(feature = "ruleset-identification")]
    registry.register(ids::RULESET_IDENTIFICATION, identification::ruleset);
    #[cfg(feature = "ruleset-licenses")]
    registry.register(ids::RULESET_LICENSES, licenses::ruleset);
    registry
}
