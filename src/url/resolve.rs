use url::Url;

/// Resolves `reference` against `base`, returning an absolute URL string
///
/// # Resolution Rules
///
/// 1. A reference that already carries a scheme is returned unchanged
/// 2. Otherwise the reference is joined onto the base following RFC 3986
///    (path-relative, protocol-relative `//host/...`, query-only `?q`,
///    fragment-only `#f`)
/// 3. If the base itself is not an absolute URL, the reference is returned
///    unchanged; resolution never fails
///
/// # Arguments
///
/// * `base` - The base URL of the document the reference was found in
/// * `reference` - The raw reference (usually an `href` or `src` value)
///
/// # Examples
///
/// ```
/// use htmlql::url::resolve_url;
///
/// assert_eq!(resolve_url("https://h/", "p"), "https://h/p");
/// assert_eq!(resolve_url("https://h", "https://other/p"), "https://other/p");
/// ```
pub fn resolve_url(base: &str, reference: &str) -> String {
    if is_absolute(reference) {
        return reference.to_string();
    }

    let base = match Url::parse(base.trim()) {
        Ok(base) => base,
        Err(e) => {
            tracing::trace!("Base {:?} is not absolute ({}), leaving {:?} as is", base, e, reference);
            return reference.to_string();
        }
    };

    match base.join(reference.trim()) {
        Ok(resolved) => resolved.to_string(),
        Err(e) => {
            tracing::trace!("Could not join {:?} onto {}: {}", reference, base, e);
            reference.to_string()
        }
    }
}

/// Returns true if the reference already has a scheme
pub fn is_absolute(reference: &str) -> bool {
    Url::parse(reference.trim()).is_ok()
}
