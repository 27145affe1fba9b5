//! API specification loading.
//!
//! Only the key set of the top-level `paths` mapping is consumed; everything
//! else in the document is ignored. Declaration order is preserved.

use std::path::Path;
use tracing::{info, warn};

use crate::error::{Result, RippleError};
use crate::parser::Endpoint;

/// Load the endpoints declared under `paths` in an OpenAPI-style document.
///
/// `.json` files are parsed as JSON, anything else as YAML.
pub fn load_endpoints(path: &Path) -> Result<Vec<Endpoint>> {
    let content = std::fs::read_to_string(path).map_err(|e| spec_error(path, e.to_string()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let keys = if is_json {
        json_path_keys(&content).map_err(|reason| spec_error(path, reason))?
    } else {
        yaml_path_keys(&content).map_err(|reason| spec_error(path, reason))?
    };

    let endpoints: Vec<Endpoint> = keys.into_iter().map(Endpoint::new).collect();
    info!(spec = %path.display(), endpoints = endpoints.len(), "loaded API spec");
    Ok(endpoints)
}

fn spec_error(path: &Path, reason: String) -> RippleError {
    RippleError::SpecLoad {
        path: path.to_path_buf(),
        reason,
    }
}

/// Extract `paths` keys from a YAML document.
fn yaml_path_keys(content: &str) -> std::result::Result<Vec<String>, String> {
    let doc: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    let root = doc
        .as_mapping()
        .ok_or_else(|| "document is not a mapping".to_string())?;

    let paths = match root.get("paths") {
        None | Some(serde_yaml::Value::Null) => return Ok(Vec::new()),
        Some(value) => value
            .as_mapping()
            .ok_or_else(|| "`paths` is not a mapping".to_string())?,
    };

    let mut keys = Vec::with_capacity(paths.len());
    for key in paths.keys() {
        match key.as_str() {
            Some(k) => keys.push(k.to_string()),
            None => warn!(key = ?key, "skipping non-string path key"),
        }
    }
    Ok(keys)
}

/// Extract `paths` keys from a JSON document.
fn json_path_keys(content: &str) -> std::result::Result<Vec<String>, String> {
    let doc: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let root = doc
        .as_object()
        .ok_or_else(|| "document is not an object".to_string())?;

    match root.get("paths") {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(value) => value
            .as_object()
            .map(|paths| paths.keys().cloned().collect())
            .ok_or_else(|| "`paths` is not an object".to_string()),
    }
}
