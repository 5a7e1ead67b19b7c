/// Split an SPDX-style license expression into plain license ids.
///
/// `"(EPL-2.0 OR GPL-2.0-or-later WITH Classpath-exception-2.0)"` yields `EPL-2.0` and
/// `GPL-2.0-or-later`. Exceptions following `WITH` are not licenses and are dropped.
pub fn license_ids(expression: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for token in expression.split_whitespace() {
        let token = token.trim_matches(|c| c == '(' || c == ')');
        if token.is_empty() {
            continue;
        }
        if skip_next {
            skip_next = false;
            continue;
        }
        match token {
            "OR" | "AND" | "or" | "and" => {}
            "WITH" | "with" => skip_next = true,
            id => out.push(id.to_string()),
        }
    }
    out
}
