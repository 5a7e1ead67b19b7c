use std::collections::BTreeSet;

/// Lowest severity that turns the verdict into `Fail`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Fail,
    Warn,
    /// Report only; the verdict never fails.
    Never,
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    /// Rule set identifiers, in load order.
    pub rulesets: Vec<String>,
    pub fail_on: FailOn,
    pub max_violations: usize,
    /// Glob patterns over canonical purls; matching artifacts are not evaluated.
    pub exclude: Vec<String>,
    /// Acknowledged violation hashes.
    pub suppress: BTreeSet<String>,
}

impl EffectiveConfig {
    pub fn is_suppressed(&self, hash: &str) -> bool {
        self.suppress.contains(hash)
    }
}
