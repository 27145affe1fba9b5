//! Scan configuration.
//!
//! Built once at startup and passed by reference into the scan. A config file
//! is optional; any missing, unreadable or invalid value falls back to its
//! default with a warning instead of failing the run.

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// File extensions scanned by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "ts", "py", "go", "java", "php"];

/// Directory names skipped by default.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "venv",
    ".venv",
    "env",
    "dist",
    "build",
    "__pycache__",
    ".idea",
    ".vscode",
    "target",
    "bin",
    "obj",
    "vendor",
    "third_party",
];

/// Default number of scan workers.
pub const DEFAULT_WORKERS: usize = 4;

/// Settings the scan honours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Allowed extensions, lowercase, without the leading dot.
    pub extensions: Vec<String>,
    /// Directory names pruned from the walk.
    pub skip_dirs: Vec<String>,
    /// Size of the worker pool.
    pub workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            workers: DEFAULT_WORKERS,
        }
    }
}

/// On-disk shape of a config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    extensions: Option<Vec<String>>,
    #[serde(default, alias = "skip_directories")]
    skip_dirs: Option<Vec<String>>,
    #[serde(default)]
    workers: Option<usize>,
}

impl ScanConfig {
    /// Load config from `path`, or return defaults if there is no usable file.
    ///
    /// The format follows the extension: `.toml`, `.json`, otherwise YAML.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config not readable, using defaults");
                return Self::default();
            }
        };

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let parsed: std::result::Result<RawConfig, String> = match ext.as_deref() {
            Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => serde_yaml::from_str::<Option<RawConfig>>(&content)
                .map(Option::unwrap_or_default)
                .map_err(|e| e.to_string()),
        };

        match parsed {
            Ok(raw) => {
                debug!(path = %path.display(), "loaded config");
                Self::default().with_overrides(raw.extensions, raw.skip_dirs, raw.workers)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Apply optional overrides. Empty lists and a zero worker count are
    /// rejected in favour of the current value.
    pub fn with_overrides(
        mut self,
        extensions: Option<Vec<String>>,
        skip_dirs: Option<Vec<String>>,
        workers: Option<usize>,
    ) -> Self {
        if let Some(extensions) = extensions {
            let normalized: Vec<String> = extensions
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            if normalized.is_empty() {
                warn!("empty extension list, keeping {:?}", self.extensions);
            } else {
                self.extensions = normalized;
            }
        }

        if let Some(skip_dirs) = skip_dirs {
            let normalized: Vec<String> = skip_dirs
                .iter()
                .map(|d| d.trim().trim_matches('/').to_string())
                .filter(|d| !d.is_empty())
                .collect();
            if normalized.is_empty() {
                warn!("empty skip list, keeping {:?}", self.skip_dirs);
            } else {
                self.skip_dirs = normalized;
            }
        }

        match workers {
            Some(0) => warn!(default = self.workers, "worker count must be positive, keeping current"),
            Some(n) => self.workers = n,
            None => {}
        }

        self
    }
}
