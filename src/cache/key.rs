//! Deterministic cache keys for catalog requests

/// Builds the cache key for a catalog page request.
///
/// Components are namespaced and delimiter-separated:
/// `endpoint:<e>:page:<p>:limit:<l>[:term:<t>]`.
///
/// Endpoint names come from the closed catalog enum and page/limit are
/// integers, so no field before the optional term can contain the delimiter;
/// the term is the final component, which keeps embedded delimiters from
/// shifting field boundaries. Identical parameters always produce an
/// identical key.
pub fn cache_key(endpoint: &str, page: u32, limit: u32, search: Option<&str>) -> String {
    match search {
        Some(term) => format!("endpoint:{endpoint}:page:{page}:limit:{limit}:term:{term}"),
        None => format!("endpoint:{endpoint}:page:{page}:limit:{limit}"),
    }
}
