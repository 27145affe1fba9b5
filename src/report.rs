//! Report model and renderers.
//!
//! Turns a finished [`ScanResult`] into a serialisable report and renders it
//! as terminal text or JSON. Reports are only written after a successful scan.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::scan::{Reference, ScanResult, ScanStats, ScanWarning};

/// Per-endpoint section of a report.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointReport {
    pub path: String,
    pub referenced: bool,
    pub count: usize,
    pub references: Vec<Reference>,
}

/// Totals shown at the end of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub referenced: usize,
    pub unreferenced: usize,
    pub total: usize,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

/// Everything a renderer needs about one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub spec: PathBuf,
    pub root: PathBuf,
    pub files_found: usize,
    pub languages: BTreeMap<&'static str, usize>,
    pub cancelled: bool,
    pub endpoints: Vec<EndpointReport>,
    pub warnings: Vec<ScanWarning>,
    pub summary: Summary,
}

impl Report {
    pub fn new(spec: &Path, root: &Path, result: &ScanResult, stats: &ScanStats) -> Self {
        let endpoints: Vec<EndpointReport> = result
            .entries()
            .iter()
            .map(|entry| EndpointReport {
                path: entry.endpoint.path.clone(),
                referenced: !entry.references.is_empty(),
                count: entry.references.len(),
                references: entry.references.clone(),
            })
            .collect();

        let referenced = endpoints.iter().filter(|e| e.referenced).count();
        let summary = Summary {
            referenced,
            unreferenced: endpoints.len() - referenced,
            total: endpoints.len(),
            files_scanned: result.files_scanned,
            files_skipped: result.warnings.len(),
        };

        Self {
            generated_at: Utc::now(),
            spec: spec.to_path_buf(),
            root: root.to_path_buf(),
            files_found: stats.total_files,
            languages: stats.by_language.clone(),
            cancelled: result.cancelled,
            endpoints,
            warnings: result.warnings.clone(),
            summary,
        }
    }

    /// Whether any declared endpoint has no reference at all.
    pub fn has_unreferenced(&self) -> bool {
        self.summary.unreferenced > 0
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable listing for a terminal.
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(50);

        writeln!(f, "Ripple - API impact analysis")?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Spec:  {}", self.spec.display())?;
        writeln!(f, "Root:  {}", self.root.display())?;
        write!(f, "Files: {}", self.files_found)?;
        if !self.languages.is_empty() {
            let parts: Vec<String> = self
                .languages
                .iter()
                .map(|(lang, n)| format!("{}: {}", lang, n))
                .collect();
            write!(f, " ({})", parts.join(", "))?;
        }
        writeln!(f, "\n")?;

        writeln!(f, "Results:\n{}", rule)?;
        for endpoint in &self.endpoints {
            if !endpoint.referenced {
                writeln!(f, "[unreferenced] {}", endpoint.path)?;
                continue;
            }
            writeln!(
                f,
                "[referenced]   {} ({} references)",
                endpoint.path, endpoint.count
            )?;
            for r in &endpoint.references {
                writeln!(f, "    {}:{}  {}", r.file.display(), r.line, r.preview)?;
            }
        }
        writeln!(f, "{}", rule)?;

        if !self.warnings.is_empty() {
            writeln!(f, "\nSkipped files:")?;
            for w in &self.warnings {
                writeln!(f, "    {} - {}", w.file.display(), w.message)?;
            }
        }

        if self.cancelled {
            writeln!(f, "\nScan was cancelled; results are partial.")?;
        }

        let s = &self.summary;
        writeln!(f, "\nSummary:")?;
        writeln!(f, "  - referenced:    {}", s.referenced)?;
        writeln!(f, "  - unreferenced:  {}", s.unreferenced)?;
        writeln!(f, "  - total:         {} endpoints", s.total)?;
        writeln!(f, "  - files scanned: {}", s.files_scanned)?;
        if s.files_skipped > 0 {
            writeln!(f, "  - files skipped: {}", s.files_skipped)?;
        }
        Ok(())
    }
}

/// Write `contents` to `path` via a sibling temp file and a rename, so a
/// failed write never leaves a partial report behind.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    let mut tmp_os = path.as_os_str().to_os_string();
    tmp_os.push(".tmp");
    let tmp = PathBuf::from(tmp_os);

    let written = std::fs::write(&tmp, contents).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
