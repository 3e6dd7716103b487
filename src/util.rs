//! Shared utility helpers.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapses runs of whitespace to a single space, lowercases, and strips one
/// level of redundant outer parentheses. Used to compare SQL expressions
/// (check clauses, index predicates) without tripping on formatting noise.
pub fn normalize_sql_expr(expr: &str) -> String {
    let collapsed = WHITESPACE.replace_all(expr.trim(), " ").to_lowercase();
    if collapsed.len() > 2 && collapsed.starts_with('(') && collapsed.ends_with(')') {
        collapsed[1..collapsed.len() - 1].trim().to_string()
    } else {
        collapsed
    }
}

/// Normalized equality for optional SQL expressions; `None` and an empty
/// expression compare equal.
pub fn eq_sql_expr(a: Option<&str>, b: Option<&str>) -> bool {
    normalize_sql_expr(a.unwrap_or("")) == normalize_sql_expr(b.unwrap_or(""))
}

/// Case-insensitive equality without allocating an uppercase copy.
#[inline]
pub fn eq_ci(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.as_bytes().eq_ignore_ascii_case(b.as_bytes())
}
