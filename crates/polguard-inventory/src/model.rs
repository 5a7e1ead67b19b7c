use crate::license::license_ids;
use polguard_domain::ThirdPartyArtifact;
use polguard_types::Purl;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// License facts gathered for an artifact, by origin.
///
/// Each entry is a license expression; compound expressions are split on evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseFacts {
    pub declared: Vec<String>,
    pub observed: Vec<String>,
    pub overridden: Vec<String>,
    pub configured: Vec<String>,
}

impl LicenseFacts {
    /// Licenses that apply to the artifact.
    ///
    /// Precedence: `overridden`, then `configured`, then `declared` and `observed` combined.
    pub fn effective(&self) -> BTreeSet<String> {
        let source: Vec<&String> = if !self.overridden.is_empty() {
            self.overridden.iter().collect()
        } else if !self.configured.is_empty() {
            self.configured.iter().collect()
        } else {
            self.declared.iter().chain(&self.observed).collect()
        };
        source.into_iter().flat_map(|e| license_ids(e)).collect()
    }
}

/// A resolved third-party artifact as recorded in an inventory file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artifact {
    pub name: Option<String>,
    /// Raw coordinates. Entries that are not valid purls still count as identification.
    pub coordinates: Vec<String>,
    pub licenses: LicenseFacts,
}

impl Artifact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn coordinate(mut self, coordinate: impl Into<String>) -> Self {
        self.coordinates.push(coordinate.into());
        self
    }

    pub fn declared(mut self, expression: impl Into<String>) -> Self {
        self.licenses.declared.push(expression.into());
        self
    }

    pub fn observed(mut self, expression: impl Into<String>) -> Self {
        self.licenses.observed.push(expression.into());
        self
    }

    pub fn overridden(mut self, expression: impl Into<String>) -> Self {
        self.licenses.overridden.push(expression.into());
        self
    }

    pub fn configured(mut self, expression: impl Into<String>) -> Self {
        self.licenses.configured.push(expression.into());
        self
    }

    fn parsed_coordinates(&self) -> impl Iterator<Item = Purl> + '_ {
        self.coordinates.iter().filter_map(|c| Purl::parse(c).ok())
    }
}

/// An [`Artifact`] prepared for evaluation.
///
/// Effective licenses and parsed coordinates are computed once here; compare rules query
/// them for every ordered pair of artifacts.
#[derive(Clone, Debug)]
pub struct ResolvedArtifact {
    artifact: Artifact,
    licenses: BTreeSet<String>,
    coordinates: Vec<Purl>,
}

impl ResolvedArtifact {
    pub fn new(artifact: Artifact) -> Self {
        let licenses = artifact.licenses.effective();
        let coordinates = artifact.parsed_coordinates().collect();
        Self {
            artifact,
            licenses,
            coordinates,
        }
    }

    pub fn effective_licenses(&self) -> &BTreeSet<String> {
        &self.licenses
    }
}

impl ThirdPartyArtifact for ResolvedArtifact {
    fn is_identified(&self) -> bool {
        self.artifact.coordinates.iter().any(|c| !c.trim().is_empty())
    }

    fn has_licenses(&self, licenses: &[String]) -> Vec<String> {
        licenses
            .iter()
            .filter(|l| self.licenses.contains(*l))
            .cloned()
            .collect()
    }

    fn purl(&self) -> Option<Purl> {
        self.coordinates.first().cloned()
    }

    fn coordinates(&self) -> Vec<Purl> {
        self.coordinates.clone()
    }

    fn display_name(&self) -> String {
        match (&self.artifact.name, self.coordinates.first()) {
            (Some(name), _) if !name.is_empty() => name.clone(),
            (_, Some(purl)) => purl.canonicalize(),
            _ => "<unidentified>".to_string(),
        }
    }
}
