//! Pure policy evaluation (no IO).
//!
//! Input: rule set identifiers (resolved through a [`RuleSetResolver`]) and a collection of
//! third-party artifacts supplied by an external resolution pipeline.
//! Output: a deduplicated set of [`Violation`]s, plus verdict/summary data via [`report`].

#![forbid(unsafe_code)]

pub mod artifact;
pub mod configure;
pub mod error;
pub mod executor;
pub mod fingerprint;
pub mod policy;
pub mod report;
pub mod rule;
pub mod violation;

mod engine;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod proptest;

pub use artifact::{ArtifactRef, ThirdPartyArtifact};
pub use configure::{PolicyEngineConfigurator, RuleSetRegistry, RuleSetResolver};
pub use engine::PolicyEngine;
pub use error::{ConfigureError, PolicyError, ResolveError, RuleError};
pub use executor::{CompareArtifactExecutor, ExecutorKind, RuleExecutor, SingleArtifactExecutor};
pub use rule::{
    CompareArtifactRule, Rule, RuleMeta, RuleOutcome, RuleSet, RuleShape, SingleArtifactRule,
};
pub use violation::{Violation, ViolationSet};
