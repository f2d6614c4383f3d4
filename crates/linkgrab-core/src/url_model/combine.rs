//! Base URL + link join.

/// Joins `base` and `link` into the URL that is actually requested.
///
/// An empty base leaves the link as-is. Otherwise exactly one `/` ends up
/// between the two parts, whether zero, one or both of them supply it.
pub fn combine_base_url(base: &str, link: &str) -> String {
    let base = base.trim();
    let link = link.trim();
    if base.is_empty() {
        return link.to_string();
    }
    match (base.ends_with('/'), link.starts_with('/')) {
        (false, false) => format!("{}/{}", base, link),
        (true, true) => format!("{}{}", base, &link[1..]),
        _ => format!("{}{}", base, link),
    }
}
