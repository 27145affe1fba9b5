//! Line-level endpoint matching.

use std::path::Path;

use super::comments::FilteredLine;
use super::pattern::Endpoint;
use crate::scan::types::Reference;

/// Maximum number of characters kept in a reference preview.
pub const PREVIEW_MAX_CHARS: usize = 100;

/// Whether a comment-stripped line references `endpoint`.
///
/// The literal path is tried first; the parameter-stripped pattern is only
/// tried for paths with a `{...}` placeholder.
pub fn matches_line(endpoint: &Endpoint, code: &str) -> bool {
    if code.contains(endpoint.path.as_str()) {
        return true;
    }
    endpoint.has_params() && code.contains(endpoint.pattern.as_str())
}

/// Trim a raw line and cut it to [`PREVIEW_MAX_CHARS`] characters.
pub fn preview(raw: &str) -> String {
    raw.trim().chars().take(PREVIEW_MAX_CHARS).collect()
}

/// The reference one filtered line makes to `endpoint`, if any.
///
/// Lines reduced to nothing by the comment filter never match. A line yields
/// at most one reference per endpoint however often the path appears on it.
pub fn line_reference(endpoint: &Endpoint, file: &Path, line: &FilteredLine<'_>) -> Option<Reference> {
    if line.code.is_empty() || !matches_line(endpoint, &line.code) {
        return None;
    }
    Some(Reference::new(endpoint, file, line.number, line.raw))
}
