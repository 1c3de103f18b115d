//! Static path classification. Routes are protected unless listed here.

/// Reachable without a session.
pub const PUBLIC_PREFIXES: &[&str] = &["/login", "/auth"];

/// Served without running the gate at all.
const ASSET_PREFIXES: &[&str] = &["/assets", "/static"];
const ASSET_FILES: &[&str] = &["/favicon.ico", "/robots.txt"];
const ASSET_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp", ".ico"];

/// Segment-aware prefix match: `/login` matches `/login` and `/login/x`, not `/loginx`.
fn under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| under(path, prefix))
}

pub fn is_static_asset(path: &str) -> bool {
    if ASSET_FILES.contains(&path) || ASSET_PREFIXES.iter().any(|prefix| under(path, prefix)) {
        return true;
    }
    let lower = path.to_ascii_lowercase();
    ASSET_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
