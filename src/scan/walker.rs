//! Source discovery — walks a directory and collects candidate files.
//!
//! Walks recursively, prunes skip-listed directories, and keeps files whose
//! extension is on the allow-list. `.gitignore` is not consulted: the
//! configured skip-list is the only filter.

use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Component, Path};
use tracing::{debug, warn};

use super::types::SourceFile;
use crate::config::ScanConfig;
use crate::error::{Result, RippleError};

/// Check that `root` exists and is a directory.
pub fn validate_root(root: &Path) -> Result<()> {
    let meta = std::fs::metadata(root).map_err(|e| RippleError::DirectoryInvalid {
        path: root.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !meta.is_dir() {
        return Err(RippleError::DirectoryInvalid {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    Ok(())
}

/// Collect all candidate source files under `root`, sorted by relative path.
pub fn discover_files(root: &Path, config: &ScanConfig) -> Result<Vec<SourceFile>> {
    validate_root(root)?;

    let prune_root = root.to_path_buf();
    let skip_dirs = config.skip_dirs.clone();

    let mut files: Vec<SourceFile> = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .parents(false)
        .filter_entry(move |entry| {
            // Never prune the root itself, even if its name is skip-listed.
            if entry.path() == prune_root {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            !(is_dir && skip_dirs.iter().any(|s| entry.file_name() == s.as_str()))
        })
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "walk error");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|entry| {
            let path = entry.into_path();
            let relative = path.strip_prefix(root).ok()?.to_path_buf();
            is_candidate(&relative, config).then(|| SourceFile::new(path, relative))
        })
        .collect();

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    debug!(root = %root.display(), files = files.len(), "discovered source files");
    Ok(files)
}

/// Whether a path relative to the scan root passes the extension allow-list
/// and contains no skip-listed component.
pub fn is_candidate(relative: &Path, config: &ScanConfig) -> bool {
    let ext_ok = relative
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            config.extensions.iter().any(|allowed| *allowed == ext)
        });
    if !ext_ok {
        return false;
    }

    !relative.components().any(|c| match c {
        Component::Normal(name) => config.skip_dirs.iter().any(|s| name == s.as_str()),
        _ => false,
    })
}

/// Per-language file counts for a discovered file set.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub total_files: usize,
    pub by_language: BTreeMap<&'static str, usize>,
}

impl ScanStats {
    pub fn from_files(files: &[SourceFile]) -> Self {
        let mut stats = ScanStats::default();
        for file in files {
            stats.total_files += 1;
            *stats.by_language.entry(file.language.name()).or_default() += 1;
        }
        stats
    }
}

impl std::fmt::Display for ScanStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Found {} source files", self.total_files)?;
        if !self.by_language.is_empty() {
            let parts: Vec<String> = self
                .by_language
                .iter()
                .map(|(lang, count)| format!("{}: {}", lang, count))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}
