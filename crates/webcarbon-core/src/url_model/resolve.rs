use url::Url;

/// Resolve a `src`/`href` value found in the page at `base` into a fetchable URL.
///
/// - `http://` and `https://` references are used as-is.
/// - `//host/path` takes the base's scheme.
/// - Anything else is treated as root-relative and joined to the base's
///   origin, so `img/a.png` on `https://x.org/blog/post` becomes
///   `https://x.org/img/a.png`, not `https://x.org/blog/img/a.png`.
///
/// Returns `None` for references that cannot be fetched over HTTP: empty
/// values, fragments, and other schemes (`data:`, `javascript:`, `mailto:`).
pub fn resolve_reference(base: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    let lower = reference.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(reference.to_string());
    }

    let base = Url::parse(base).ok()?;
    if let Some(rest) = reference.strip_prefix("//") {
        return Some(format!("{}://{}", base.scheme(), rest));
    }

    // Other absolute schemes parse on their own; relative paths do not.
    if Url::parse(reference).is_ok() {
        return None;
    }

    let origin = base.origin().ascii_serialization();
    if reference.starts_with('/') {
        Some(format!("{origin}{reference}"))
    } else {
        Some(format!("{origin}/{reference}"))
    }
}
