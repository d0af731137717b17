//! Foreign-key resolution: upstream resource URL → bare numeric id.
//!
//! `https://swapi.info/api/people/1/` resolves to `"1"`. A bare id resolves to
//! itself. Anything whose last path segment is not a run of ASCII digits is
//! unresolvable and yields `None`.

use tracing::warn;

/// Resolve the trailing numeric id of an upstream resource URL.
pub fn resolve_reference(url: &str) -> Option<String> {
    let segment = url.trim().trim_matches('/').rsplit('/').next()?;
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        Some(segment.to_string())
    } else {
        None
    }
}

/// Resolve a list of references, dropping (and logging) unresolvable ones.
pub fn resolve_all(urls: &[String]) -> Vec<String> {
    urls.iter()
        .filter_map(|url| {
            let id = resolve_reference(url);
            if id.is_none() {
                warn!(%url, "dropping unresolvable reference");
            }
            id
        })
        .collect()
}

/// Resolve an optional single reference such as `homeworld`.
pub fn resolve_optional(url: Option<&str>) -> Option<String> {
    url.and_then(resolve_reference)
}
