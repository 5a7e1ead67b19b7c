//! Inventory adapters: read resolved third-party artifacts from JSON files.
//!
//! This crate is allowed to do filesystem IO. It turns inventory documents into
//! [`ArtifactRef`]s for the policy engine and applies purl-based exclusion.

#![forbid(unsafe_code)]

mod discover;
mod license;
mod model;

use anyhow::Context;
use camino::Utf8Path;
use globset::{Glob, GlobSet, GlobSetBuilder};
use polguard_domain::{ArtifactRef, ThirdPartyArtifact};
use serde::Deserialize;
use tracing::{debug, warn};

pub use discover::discover_inventory_files;
pub use license::license_ids;
pub use model::{Artifact, LicenseFacts, ResolvedArtifact};

#[derive(Deserialize)]
#[serde(untagged)]
enum InventoryDocument {
    Wrapped { artifacts: Vec<Artifact> },
    Bare(Vec<Artifact>),
}

/// Parse one inventory document.
///
/// Accepts `{"artifacts": [...]}` or a bare array of artifacts.
pub fn parse_inventory(text: &str) -> anyhow::Result<Vec<Artifact>> {
    let doc: InventoryDocument = serde_json::from_str(text).context("parse inventory JSON")?;
    Ok(match doc {
        InventoryDocument::Wrapped { artifacts } => artifacts,
        InventoryDocument::Bare(artifacts) => artifacts,
    })
}

/// Load every artifact reachable from `path` (a file or a directory of `*.json` files).
pub fn load_inventory(path: &Utf8Path) -> anyhow::Result<Vec<Artifact>> {
    let files = discover_inventory_files(path).context("discover inventory files")?;

    let mut out = Vec::new();
    for file in &files {
        let text = std::fs::read_to_string(file).with_context(|| format!("read {file}"))?;
        let artifacts = parse_inventory(&text).with_context(|| format!("parse {file}"))?;
        debug!(file = %file, artifacts = artifacts.len(), "inventory file loaded");
        out.extend(artifacts);
    }
    Ok(out)
}

/// Wrap loaded artifacts into shared handles for evaluation.
pub fn into_refs(artifacts: Vec<Artifact>) -> Vec<ArtifactRef> {
    artifacts
        .into_iter()
        .map(|a| ArtifactRef::new(ResolvedArtifact::new(a)))
        .collect()
}

/// Compiled `exclude` patterns, matched against canonical purls.
#[derive(Clone, Debug)]
pub struct Exclusions {
    set: GlobSet,
    empty: bool,
}

impl Exclusions {
    pub fn new(patterns: &[String]) -> anyhow::Result<Self> {
        let mut b = GlobSetBuilder::new();
        for p in patterns {
            b.add(Glob::new(p).with_context(|| format!("invalid exclude pattern: {p}"))?);
        }
        Ok(Self {
            set: b.build().context("compile exclude globset")?,
            empty: patterns.is_empty(),
        })
    }

    /// An artifact is excluded when any of its coordinates matches.
    pub fn is_excluded(&self, artifact: &dyn ThirdPartyArtifact) -> bool {
        !self.empty
            && artifact
                .coordinates()
                .iter()
                .any(|p| self.set.is_match(p.canonicalize()))
    }

    /// Split `artifacts` into kept handles and the number of excluded ones.
    pub fn apply(&self, artifacts: Vec<ArtifactRef>) -> (Vec<ArtifactRef>, usize) {
        let before = artifacts.len();
        let kept: Vec<ArtifactRef> = artifacts
            .into_iter()
            .filter(|a| {
                let excluded = self.is_excluded(&**a);
                if excluded {
                    warn!(artifact = %a.display_name(), "artifact excluded from evaluation");
                }
                !excluded
            })
            .collect();
        let excluded = before - kept.len();
        (kept, excluded)
    }
}
