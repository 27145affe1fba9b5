//! Core types for a reference scan.
//!
//! Defines the candidate files fed to workers, the references they produce,
//! and the aggregated per-endpoint result.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::parser::{preview, Endpoint, SourceLanguage};

/// A candidate source file discovered by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path used for reading.
    pub path: PathBuf,
    /// Path relative to the scan root, used for reporting.
    pub relative: PathBuf,
    /// Language tag derived from the extension.
    pub language: SourceLanguage,
}

impl SourceFile {
    pub fn new(path: PathBuf, relative: PathBuf) -> Self {
        let language = SourceLanguage::from_path(&path);
        Self {
            path,
            relative,
            language,
        }
    }
}

/// One located occurrence of an endpoint inside a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Path of the endpoint this reference belongs to.
    pub endpoint: String,
    /// File path relative to the scan root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Trimmed raw line, cut to a bounded length.
    pub preview: String,
}

impl Reference {
    pub fn new(endpoint: &Endpoint, file: &Path, line: usize, raw: &str) -> Self {
        Self {
            endpoint: endpoint.path.clone(),
            file: file.to_path_buf(),
            line,
            preview: preview(raw),
        }
    }
}

/// Everything one worker found in one file.
#[derive(Debug, Clone, Default)]
pub struct FileHits {
    /// File path relative to the scan root.
    pub file: PathBuf,
    /// References in line order.
    pub references: Vec<Reference>,
}

/// A file that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWarning {
    pub file: PathBuf,
    pub message: String,
}

/// References collected for a single endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointReferences {
    pub endpoint: Endpoint,
    pub references: Vec<Reference>,
}

/// The complete mapping from every declared endpoint to its references.
///
/// Every endpoint passed to [`ScanResult::new`] stays present, in declaration
/// order, even when nothing references it. Reference lists only ever grow.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    entries: Vec<EndpointReferences>,
    /// Index: endpoint path -> position in `entries`.
    index: HashMap<String, usize>,
    /// Files skipped because they could not be read or decoded.
    pub warnings: Vec<ScanWarning>,
    /// Files successfully read and matched.
    pub files_scanned: usize,
    /// Set when the scan was aborted before all files were merged.
    pub cancelled: bool,
}

impl ScanResult {
    /// Create an empty result holding every endpoint. Duplicate paths are kept once.
    pub fn new(endpoints: &[Endpoint]) -> Self {
        let mut result = Self::default();
        for endpoint in endpoints {
            if result.index.contains_key(&endpoint.path) {
                continue;
            }
            result
                .index
                .insert(endpoint.path.clone(), result.entries.len());
            result.entries.push(EndpointReferences {
                endpoint: endpoint.clone(),
                references: Vec::new(),
            });
        }
        result
    }

    /// Append one file's references to their endpoints.
    pub fn merge(&mut self, hits: FileHits) {
        self.files_scanned += 1;
        for reference in hits.references {
            match self.index.get(&reference.endpoint) {
                Some(&idx) => self.entries[idx].references.push(reference),
                None => {
                    warn!(endpoint = %reference.endpoint, file = %hits.file.display(), "reference to unknown endpoint dropped");
                }
            }
        }
    }

    /// Record a file that was skipped.
    pub fn record_warning(&mut self, warning: ScanWarning) {
        self.warnings.push(warning);
    }

    /// Sort each endpoint's references by (file path, line number), and the
    /// warnings by file path, making output independent of completion order.
    pub fn sort(&mut self) {
        for entry in &mut self.entries {
            entry
                .references
                .sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
        }
        self.warnings.sort_by(|a, b| a.file.cmp(&b.file));
    }

    /// All endpoints with their references, in declaration order.
    pub fn entries(&self) -> &[EndpointReferences] {
        &self.entries
    }

    /// References for one endpoint path, or `None` if it was never declared.
    pub fn references(&self, path: &str) -> Option<&[Reference]> {
        self.index
            .get(path)
            .map(|&idx| self.entries[idx].references.as_slice())
    }

    /// Number of references for one endpoint path (0 if unknown).
    pub fn count(&self, path: &str) -> usize {
        self.references(path).map_or(0, <[Reference]>::len)
    }

    /// Number of endpoints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of endpoints with at least one reference.
    pub fn referenced_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.references.is_empty())
            .count()
    }

    /// Endpoints nothing refers to, in declaration order.
    pub fn unreferenced(&self) -> impl Iterator<Item = &Endpoint> {
        self.entries
            .iter()
            .filter(|e| e.references.is_empty())
            .map(|e| &e.endpoint)
    }
}
