//! Leading/trailing slash helpers for URL paths
//!
//! Each helper touches at most one slash, so `"//a//"` keeps its inner
//! doubled separators.

/// Remove a single trailing `/`
pub fn untrailing_slash_it(path: &str) -> &str {
    path.strip_suffix('/').unwrap_or(path)
}

/// Ensure the path ends with exactly one added `/`
pub fn trailing_slash_it(path: &str) -> String {
    format!("{}/", untrailing_slash_it(path))
}

/// Remove a single leading `/`
pub fn unleading_slash_it(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Ensure the path starts with exactly one added `/`
pub fn leading_slash_it(path: &str) -> String {
    format!("/{}", unleading_slash_it(path))
}
