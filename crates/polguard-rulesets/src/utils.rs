use std::cmp::Ordering;

pub fn owned(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Compare two version strings segment by segment.
///
/// Segments are split on `.`, `-` and `+`. Numeric segments compare as numbers, others
/// lexically; a numeric segment sorts before a textual one. Missing trailing segments
/// sort first, so `1.0 < 1.0.1`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let split = |v: &str| -> Vec<String> {
        v.split(['.', '-', '+'])
            .map(|s| s.to_string())
            .collect()
    };
    let (xs, ys) = (split(a), split(b));
    for (x, y) in xs.iter().zip(&ys) {
        let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
            (Ok(n), Ok(m)) => n.cmp(&m),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    xs.len().cmp(&ys.len())
}
