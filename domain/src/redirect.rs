//! Validation of the local paths a login may resume at.
//!
//! A target reaches the callback through a state token, but it starts out as
//! the `redirect` query parameter of `/login`, so it is untrusted. Only plain
//! local paths are kept; anything that a browser could read as another origin
//! is dropped.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Where the guard resumes when the requested path is not a safe target.
pub const PROTECTED_ROOT: &str = "/private";

const MAX_TARGET_LEN: usize = 2048;

// Keep `/` readable in `/login?redirect=/private/...`.
const REDIRECT_PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Returns `target` if it is a safe local path.
///
/// Accepted: a single leading `/` followed by unreserved URL characters,
/// percent escapes, and a query string. Rejected: scheme-relative (`//host`)
/// paths, backslashes, whitespace and control characters.
pub fn validate(target: &str) -> Option<String> {
    let safe = target.starts_with('/')
        && !target.starts_with("//")
        && target.len() <= MAX_TARGET_LEN
        && target
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/-._~%?=&+".contains(c));

    safe.then(|| target.to_string())
}

/// Maps a path the guard intercepted to the target the login should resume at.
///
/// A trailing `/` is trimmed so `/private/` and `/private` resume at the same
/// place. Unsafe paths fall back to [`PROTECTED_ROOT`].
pub fn resume_target(requested_path: &str) -> String {
    let trimmed = match requested_path.trim_end_matches('/') {
        "" => "/",
        path => path,
    };
    validate(trimmed).unwrap_or_else(|| PROTECTED_ROOT.to_string())
}

/// The `/login` location that remembers `target`.
pub fn login_location(target: &str) -> String {
    format!("/login?redirect={}", utf8_percent_encode(target, REDIRECT_PARAM))
}
