//! Evidence file naming and URL layout.

/// Public prefix under which stored evidence is served.
pub const FILES_URL_PREFIX: &str = "/api/files/";

const UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];

/// Make `raw` safe to use as a single path segment.
///
/// Path-unsafe and control characters are dropped, whitespace runs collapse
/// into a single underscore and leading dots are stripped so the result can
/// never name a parent or hidden directory. An empty result becomes
/// `"unnamed"`.
#[must_use]
pub fn sanitize_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for c in raw.trim().chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() || UNSAFE_CHARS.contains(&c) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push('_');
        }
        pending_space = false;
        out.push(c);
    }

    let trimmed = out.trim_start_matches('.');
    if trimmed.is_empty() {
        "unnamed".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Lowercased extension of `filename`, if it has a usable one.
#[must_use]
pub fn extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Public URL for a blob stored at `relative_path`.
#[must_use]
pub fn evidence_url(relative_path: &str) -> String {
    format!("{FILES_URL_PREFIX}{relative_path}")
}

/// Whether `path` is a well-formed relative blob path: non-empty `/`
/// separated segments with no traversal, no absolute root and no
/// backslashes.
#[must_use]
pub fn is_safe_relative_path(path: &str) -> bool {
    !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && path
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != ".." && !seg.contains('\0'))
}
