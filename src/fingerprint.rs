//! URL normalization and deduplication keys.
//!
//! Two article links are the same story when their paths agree after
//! discarding scheme, host, query and fragment, dropping trailing separators
//! and lower-casing. Percent-escapes are left as they appear in the link. The
//! fingerprint is the MD5 of that canonical path rendered as 32 lowercase hex
//! characters, which is what the `url_hash` column of the `news` table stores.

/// Canonical identity of a URL.
///
/// Never fails: anything that is not a `scheme://authority/path` link is
/// treated as a bare path, and the result may be the empty string. An empty
/// identity is still a valid (if degenerate) key. The path is taken verbatim,
/// so `normalize(normalize(u)) == normalize(u)` for every input.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize("https://example.com/news/2024/ABC/"), "/news/2024/abc");
/// assert_eq!(normalize("https://example.com/"), "");
/// ```
pub fn normalize(url: &str) -> String {
    let lowered = url.to_lowercase();
    path_of(&lowered).trim_end_matches('/').to_string()
}

/// Deduplication key for a URL: `md5(normalize(url))` as lowercase hex.
pub fn fingerprint(url: &str) -> String {
    format!("{:x}", md5::compute(normalize(url).as_bytes()))
}

/// Path component of `input`, without query or fragment.
///
/// The authority is only recognised after a `scheme://` prefix; a bare
/// `//host/path` is a path that happens to start with two separators.
fn path_of(input: &str) -> &str {
    let end = input.find(['?', '#']).unwrap_or(input.len());
    let rest = &input[..end];

    let Some(colon) = rest.find("://") else {
        return rest;
    };
    let scheme = &rest[..colon];
    let looks_like_scheme = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !looks_like_scheme {
        return rest;
    }

    let authority_and_path = &rest[colon + 3..];
    authority_and_path
        .find('/')
        .map_or("", |slash| &authority_and_path[slash..])
}
