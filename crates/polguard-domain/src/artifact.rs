use polguard_types::Purl;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Read-only view of a resolved third-party artifact, as seen by rules.
///
/// The engine queries artifacts concurrently from many worker threads, so implementations
/// must be side-effect-free in-memory lookups.
pub trait ThirdPartyArtifact: Send + Sync {
    /// Whether the artifact could be matched to a known package.
    fn is_identified(&self) -> bool;

    /// Intersection of `licenses` with the artifact's effective licenses.
    fn has_licenses(&self, licenses: &[String]) -> Vec<String>;

    /// Canonical package coordinate, if one is known.
    fn purl(&self) -> Option<Purl>;

    /// Every known coordinate of the artifact. Feeds the violation hash.
    fn coordinates(&self) -> Vec<Purl> {
        self.purl().into_iter().collect()
    }

    /// Human-readable label for logs and reports.
    fn display_name(&self) -> String {
        self.purl()
            .map(|p| p.canonicalize())
            .unwrap_or_else(|| "<unidentified>".to_string())
    }
}

/// Shared handle to an artifact.
///
/// Equality and hashing use the identity of the shared artifact, not its contents: two
/// handles are equal iff they point at the same artifact instance.
#[derive(Clone)]
pub struct ArtifactRef(Arc<dyn ThirdPartyArtifact>);

impl ArtifactRef {
    pub fn new<A: ThirdPartyArtifact + 'static>(artifact: A) -> Self {
        Self(Arc::new(artifact))
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl Deref for ArtifactRef {
    type Target = dyn ThirdPartyArtifact;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for ArtifactRef {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for ArtifactRef {}

impl Hash for ArtifactRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArtifactRef")
            .field(&self.0.display_name())
            .finish()
    }
}
