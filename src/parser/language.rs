//! Language detection and comment syntax selection.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Comment syntax family of a source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStyle {
    /// `//` line comments and `/* ... */` block comments.
    Slash,
    /// `#` line comments, triple-quoted literals treated as blocks.
    Hash,
}

impl CommentStyle {
    /// Marker that starts a trailing line comment.
    pub fn line_marker(&self) -> &'static str {
        match self {
            CommentStyle::Slash => "//",
            CommentStyle::Hash => "#",
        }
    }

    /// Pairs of (start, end) markers for block comments.
    pub fn block_markers(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            CommentStyle::Slash => &[("/*", "*/")],
            CommentStyle::Hash => &[("\"\"\"", "\"\"\""), ("'''", "'''")],
        }
    }
}

/// Language tag of a scanned source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Python,
    Go,
    Java,
    Php,
    Ruby,
    Rust,
    Kotlin,
    CSharp,
    Cpp,
    Swift,
    Shell,
    Perl,
    R,
    Yaml,
    Toml,
    /// Any extension admitted by configuration but not recognised here.
    Other,
}

impl SourceLanguage {
    /// Detect language from file extension. Unknown extensions map to `Other`.
    pub fn from_path(path: &Path) -> Self {
        let ext = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_ascii_lowercase(),
            None => return SourceLanguage::Other,
        };
        match ext.as_str() {
            "js" | "mjs" | "cjs" | "jsx" => SourceLanguage::JavaScript,
            "ts" | "mts" | "cts" | "tsx" => SourceLanguage::TypeScript,
            "py" | "pyw" => SourceLanguage::Python,
            "go" => SourceLanguage::Go,
            "java" => SourceLanguage::Java,
            "php" => SourceLanguage::Php,
            "rb" => SourceLanguage::Ruby,
            "rs" => SourceLanguage::Rust,
            "kt" | "kts" => SourceLanguage::Kotlin,
            "cs" => SourceLanguage::CSharp,
            "cpp" | "cc" | "cxx" | "hpp" | "h" | "c" => SourceLanguage::Cpp,
            "swift" => SourceLanguage::Swift,
            "sh" | "bash" | "zsh" => SourceLanguage::Shell,
            "pl" | "pm" => SourceLanguage::Perl,
            "r" => SourceLanguage::R,
            "yaml" | "yml" => SourceLanguage::Yaml,
            "toml" => SourceLanguage::Toml,
            _ => SourceLanguage::Other,
        }
    }

    /// Comment syntax used when stripping comments from this language.
    pub fn comment_style(&self) -> CommentStyle {
        match self {
            SourceLanguage::Python
            | SourceLanguage::Ruby
            | SourceLanguage::Shell
            | SourceLanguage::Perl
            | SourceLanguage::R
            | SourceLanguage::Yaml
            | SourceLanguage::Toml => CommentStyle::Hash,
            _ => CommentStyle::Slash,
        }
    }

    /// Get the display name.
    pub fn name(&self) -> &'static str {
        match self {
            SourceLanguage::JavaScript => "JavaScript",
            SourceLanguage::TypeScript => "TypeScript",
            SourceLanguage::Python => "Python",
            SourceLanguage::Go => "Go",
            SourceLanguage::Java => "Java",
            SourceLanguage::Php => "PHP",
            SourceLanguage::Ruby => "Ruby",
            SourceLanguage::Rust => "Rust",
            SourceLanguage::Kotlin => "Kotlin",
            SourceLanguage::CSharp => "C#",
            SourceLanguage::Cpp => "C/C++",
            SourceLanguage::Swift => "Swift",
            SourceLanguage::Shell => "Shell",
            SourceLanguage::Perl => "Perl",
            SourceLanguage::R => "R",
            SourceLanguage::Yaml => "YAML",
            SourceLanguage::Toml => "TOML",
            SourceLanguage::Other => "Other",
        }
    }
}
