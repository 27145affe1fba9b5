//! Endpoint paths and their parameter-stripped match patterns.

use serde::{Deserialize, Serialize};

/// Collapse every `/{param}` segment of a templated path into a bare `/`.
///
/// `/products/{id}` becomes `/products/`, `/a/{x}/b/{y}` becomes `/a//b/`.
/// A `{` with no closing `}` (or an empty `{}`) is left untouched.
pub fn path_to_pattern(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(start) = rest.find("/{") {
        let after_open = &rest[start + 2..];
        match after_open.find('}') {
            Some(0) => {
                // `/{}` is not a parameter; keep the slash and keep scanning.
                result.push_str(&rest[..start + 1]);
                rest = &rest[start + 1..];
            }
            Some(close) => {
                result.push_str(&rest[..start]);
                result.push('/');
                rest = &after_open[close + 1..];
            }
            None => break,
        }
    }

    result.push_str(rest);
    result
}

/// One API endpoint declared under `paths` in an OpenAPI document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Raw path as declared, e.g. `/products/{id}`.
    pub path: String,
    /// Path with parameter segments collapsed, e.g. `/products/`.
    pub pattern: String,
}

impl Endpoint {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let pattern = path_to_pattern(&path);
        Self { path, pattern }
    }

    /// Whether the path carries a `{...}` placeholder, enabling the pattern match.
    pub fn has_params(&self) -> bool {
        self.path.contains('{')
    }
}
