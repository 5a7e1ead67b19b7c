use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Canonical package coordinate (`pkg:type/namespace/name@version?qualifiers#subpath`).
///
/// Normalization rules are intentionally small and deterministic:
/// - the `pkg:` scheme and the type are lowercased
/// - empty namespace segments are dropped
/// - qualifier keys are lowercased and sorted, empty values are dropped
/// - `pypi` names are lowercased with `_` replaced by `-`
/// - surrounding whitespace is trimmed from every component, so the canonical form
///   parses back to itself
///
/// Percent-encoding is preserved as given; two coordinates that only differ in encoding
/// are treated as different.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Purl {
    ty: String,
    namespace: Option<String>,
    name: String,
    version: Option<String>,
    qualifiers: BTreeMap<String, String>,
    subpath: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PurlError {
    #[error("package coordinate must start with 'pkg:': {0}")]
    MissingScheme(String),
    #[error("package coordinate has no type: {0}")]
    MissingType(String),
    #[error("package coordinate has no name: {0}")]
    MissingName(String),
}

impl Purl {
    pub fn parse(input: &str) -> Result<Self, PurlError> {
        let trimmed = input.trim();
        let rest = match trimmed.get(..4) {
            Some(scheme) if scheme.eq_ignore_ascii_case("pkg:") => &trimmed[4..],
            _ => return Err(PurlError::MissingScheme(input.to_string())),
        };
        let rest = rest.trim_start_matches('/');

        let (rest, subpath) = match rest.split_once('#') {
            Some((head, sub)) => (
                head,
                non_empty(sub.trim_matches(|c: char| c == '/' || c.is_whitespace())),
            ),
            None => (rest, None),
        };

        let (rest, qualifiers) = match rest.split_once('?') {
            Some((head, q)) => (head, parse_qualifiers(q)),
            None => (rest, BTreeMap::new()),
        };

        let (ty, rest) = rest
            .split_once('/')
            .ok_or_else(|| PurlError::MissingType(input.to_string()))?;
        let ty = ty.trim();
        if ty.is_empty() {
            return Err(PurlError::MissingType(input.to_string()));
        }
        let ty = ty.to_ascii_lowercase();

        // A version separator only counts when it follows the last path segment,
        // so scoped names like `@angular/core` keep their leading `@`.
        let last_slash = rest.rfind('/');
        let (path, version) = match rest.rfind('@') {
            Some(at) if last_slash.is_none_or(|slash| at > slash) && at > 0 => {
                (&rest[..at], non_empty(rest[at + 1..].trim()))
            }
            _ => (rest, None),
        };

        let mut segments: Vec<&str> = path
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let Some(name) = segments.pop() else {
            return Err(PurlError::MissingName(input.to_string()));
        };
        let namespace = if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        };

        let name = if ty == "pypi" {
            name.to_ascii_lowercase().replace('_', "-")
        } else {
            name.to_string()
        };

        Ok(Self {
            ty,
            namespace,
            name,
            version,
            qualifiers,
            subpath,
        })
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn qualifiers(&self) -> &BTreeMap<String, String> {
        &self.qualifiers
    }

    /// The coordinate without version, qualifiers, or subpath.
    ///
    /// Two artifacts with the same package key are "the same package" in different versions.
    pub fn package_key(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("pkg:{}/{}/{}", self.ty, ns, self.name),
            None => format!("pkg:{}/{}", self.ty, self.name),
        }
    }

    pub fn canonicalize(&self) -> String {
        let mut out = self.package_key();
        if let Some(v) = &self.version {
            out.push('@');
            out.push_str(v);
        }
        if !self.qualifiers.is_empty() {
            let q: Vec<String> = self
                .qualifiers
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            out.push('?');
            out.push_str(&q.join("&"));
        }
        if let Some(s) = &self.subpath {
            out.push('#');
            out.push_str(s);
        }
        out
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_qualifiers(q: &str) -> BTreeMap<String, String> {
    q.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, v)| !k.is_empty() && !v.is_empty())
        .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
        .collect()
}

impl fmt::Display for Purl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonicalize())
    }
}

impl FromStr for Purl {
    type Err = PurlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Purl::parse(s)
    }
}

impl TryFrom<String> for Purl {
    type Error = PurlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Purl::parse(&value)
    }
}

impl From<Purl> for String {
    fn from(value: Purl) -> Self {
        value.canonicalize()
    }
}
