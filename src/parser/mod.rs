//! Source text analysis: language detection, comment stripping and
//! endpoint matching on individual lines.

pub mod comments;
pub mod language;
pub mod matcher;
pub mod pattern;

pub use comments::{CommentFilter, FilterState, FilteredLine};
pub use language::{CommentStyle, SourceLanguage};
pub use matcher::{line_reference, matches_line, preview, PREVIEW_MAX_CHARS};
pub use pattern::{path_to_pattern, Endpoint};
