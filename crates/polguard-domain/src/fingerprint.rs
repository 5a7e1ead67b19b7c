use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

/// Separator between the rule id and each coordinate in the hash input.
pub const HASH_SEPARATOR: &str = " : ";

/// Compute the stable violation hash.
///
/// Identity fields:
/// - rule id
/// - canonical coordinates of every failing artifact, sorted lexicographically
///
/// The hash input is `"{rule_id} : {c1} : {c2} ..."`, digested with MD5 and base64
/// encoded. MD5 is a content fingerprint here, not a security boundary.
pub fn violation_hash<I, S>(rule_id: &str, coordinates: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut coords: Vec<String> = coordinates.into_iter().map(Into::into).collect();
    coords.sort();

    let mut canonical = String::with_capacity(rule_id.len() + HASH_SEPARATOR.len());
    canonical.push_str(rule_id);
    canonical.push_str(HASH_SEPARATOR);
    canonical.push_str(&coords.join(HASH_SEPARATOR));

    let digest = md5::compute(canonical.as_bytes());
    BASE64.encode(digest.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_independent_of_coordinate_order() {
        let a = violation_hash("R1", ["pkg:generic/b@1", "pkg:generic/a@1"]);
        let b = violation_hash("R1", ["pkg:generic/a@1", "pkg:generic/b@1"]);
        assert_eq!(a, b);
    }

    #[test]
    fn hash_depends_on_rule_id_and_coordinates() {
        let base = violation_hash("R1", ["pkg:generic/a@1"]);
        assert_ne!(base, violation_hash("R2", ["pkg:generic/a@1"]));
        assert_ne!(base, violation_hash("R1", ["pkg:generic/a@2"]));
    }

    #[test]
    fn hash_is_base64_md5() {
        let h = violation_hash("R1", Vec::<String>::new());
        // 16 digest bytes -> 24 base64 characters with padding.
        assert_eq!(h.len(), 24);
        assert!(h.ends_with("=="));
    }

    #[test]
    fn hash_matches_known_input() {
        // md5("UA : ") computed independently.
        let expected = BASE64.encode(md5::compute(b"UA : ").0);
        assert_eq!(violation_hash("UA", Vec::<String>::new()), expected);
    }
}
