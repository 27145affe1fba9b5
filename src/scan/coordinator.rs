//! Concurrent reference scan.
//!
//! Files are fanned out to a fixed-size rayon pool. Each worker reads one file,
//! runs the comment filter once per line and matches every endpoint against
//! the result. Per-file outcomes travel over a bounded channel to a single
//! aggregator, the only owner of the mutable [`ScanResult`].

use crossbeam_channel as channel;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::types::{FileHits, Reference, ScanResult, ScanWarning, SourceFile};
use crate::config::DEFAULT_WORKERS;
use crate::error::{Result, RippleError};
use crate::parser::{line_reference, CommentFilter, Endpoint};

/// Cooperative cancellation flag shared between the caller and a running scan.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of scanning one file: hits, or the reason it was skipped.
pub type FileOutcome = std::result::Result<FileHits, (SourceFile, RippleError)>;

/// Called on the aggregator after each merged file with (completed, total).
pub type ProgressFn<'a> = Box<dyn Fn(usize, usize) + 'a>;

/// Runs one scan over a fixed endpoint list.
pub struct ScanCoordinator<'a> {
    /// Declared endpoints with duplicate paths removed, first declaration wins.
    endpoints: Vec<Endpoint>,
    workers: usize,
    cancel: Option<CancelToken>,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> ScanCoordinator<'a> {
    /// A zero worker count falls back to [`DEFAULT_WORKERS`].
    pub fn new(endpoints: &[Endpoint], workers: usize) -> Self {
        let mut seen = HashSet::new();
        let endpoints: Vec<Endpoint> = endpoints
            .iter()
            .filter(|e| seen.insert(e.path.as_str()))
            .cloned()
            .collect();

        Self {
            endpoints,
            workers: if workers == 0 { DEFAULT_WORKERS } else { workers },
            cancel: None,
            progress: None,
        }
    }

    /// Endpoints this coordinator matches, duplicates removed.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Attach a token that aborts the scan between file completions.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Report progress after every merged file.
    pub fn with_progress(mut self, progress: impl Fn(usize, usize) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Scan `files` and return references for every endpoint, each list sorted
    /// by (file path, line number).
    pub fn run(&self, files: &[SourceFile]) -> Result<ScanResult> {
        let start = Instant::now();
        let mut result = ScanResult::new(&self.endpoints);

        if files.is_empty() {
            warn!("no candidate source files found");
            return Ok(result);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()?;
        let (tx, rx) = channel::bounded::<FileOutcome>(self.workers * 2);
        let endpoints = self.endpoints.as_slice();
        let cancel = self.cancel.clone();
        let total = files.len();

        std::thread::scope(|s| {
            s.spawn(move || {
                pool.install(|| {
                    files.par_iter().for_each_with(tx, |tx, file| {
                        if cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                            return;
                        }
                        let outcome = scan_file(file, endpoints).map_err(|e| (file.clone(), e));
                        // The aggregator hung up after cancellation.
                        let _ = tx.send(outcome);
                    });
                });
            });

            let mut merged = 0;
            for outcome in rx.iter() {
                merge_outcome(&mut result, outcome);
                merged += 1;
                if let Some(progress) = &self.progress {
                    progress(merged, total);
                }
                if self.is_cancelled() {
                    break;
                }
            }
            // Dropping the receiver unblocks any worker still sending.
            drop(rx);
        });

        let completed = result.files_scanned + result.warnings.len();
        if self.is_cancelled() && completed < total {
            info!(completed, total, "scan cancelled");
            result.cancelled = true;
        }

        result.sort();
        info!(
            files = files.len(),
            scanned = result.files_scanned,
            skipped = result.warnings.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );
        Ok(result)
    }
}

/// Fold one worker outcome into the result. Failures become warnings.
pub fn merge_outcome(result: &mut ScanResult, outcome: FileOutcome) {
    match outcome {
        Ok(hits) => {
            debug!(file = %hits.file.display(), references = hits.references.len(), "merged file");
            result.merge(hits);
        }
        Err((file, error)) => {
            warn!(file = %file.relative.display(), error = %error, "skipping file");
            result.record_warning(ScanWarning {
                file: file.relative,
                message: error.to_string(),
            });
        }
    }
}

/// Read one file and collect its references to every endpoint, in line order.
pub fn scan_file(file: &SourceFile, endpoints: &[Endpoint]) -> Result<FileHits> {
    let bytes = std::fs::read(&file.path).map_err(|source| RippleError::FileRead {
        path: file.relative.clone(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|_| RippleError::FileDecode {
        path: file.relative.clone(),
    })?;

    Ok(FileHits {
        file: file.relative.clone(),
        references: scan_source(&content, file, endpoints),
    })
}

/// Match every endpoint against already-loaded source text.
pub fn scan_source(content: &str, file: &SourceFile, endpoints: &[Endpoint]) -> Vec<Reference> {
    let relative: &Path = &file.relative;
    let mut references = Vec::new();

    for line in CommentFilter::lines(file.language.comment_style(), content) {
        if line.code.is_empty() {
            continue;
        }
        references.extend(
            endpoints
                .iter()
                .filter_map(|endpoint| line_reference(endpoint, relative, &line)),
        );
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write(root: &Path, rel: &str, content: &[u8]) -> SourceFile {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        SourceFile::new(path, PathBuf::from(rel))
    }

    fn endpoints() -> Vec<Endpoint> {
        vec![Endpoint::new("/users"), Endpoint::new("/orders/{id}")]
    }

    fn fixture(root: &Path) -> Vec<SourceFile> {
        (0..10)
            .map(|i| {
                let body = format!(
                    "// header {i}\nfetch('/users');\n/*\n '/orders/1'\n*/\nget(`/orders/${{id}}`);\n"
                );
                write(root, &format!("src/f{i}.js"), body.as_bytes())
            })
            .collect()
    }

    fn snapshot(result: &ScanResult) -> Vec<(String, Vec<(PathBuf, usize)>)> {
        result
            .entries()
            .iter()
            .map(|e| {
                let refs = e.references.iter().map(|r| (r.file.clone(), r.line)).collect();
                (e.endpoint.path.clone(), refs)
            })
            .collect()
    }

    #[test]
    fn test_scan_source_matches_all_endpoints_in_line_order() {
        let file = SourceFile::new(PathBuf::from("/r/a.ts"), PathBuf::from("a.ts"));
        let src = "x('/orders/9');\ny('/users'); // '/orders/1'\nz('/users/1', '/orders/2');";
        let refs = scan_source(src, &file, &endpoints());

        let got: Vec<(&str, usize)> = refs.iter().map(|r| (r.endpoint.as_str(), r.line)).collect();
        assert_eq!(got, vec![("/orders/{id}", 1), ("/users", 2), ("/users", 3), ("/orders/{id}", 3)]);
    }

    #[test]
    fn test_run_counts() {
        let dir = tempfile::tempdir().unwrap();
        let files = fixture(dir.path());
        let eps = endpoints();

        let result = ScanCoordinator::new(&eps, 4).run(&files).unwrap();
        assert_eq!(result.files_scanned, 10);
        assert_eq!(result.count("/users"), 10);
        assert_eq!(result.count("/orders/{id}"), 10);
        assert!(result.references("/orders/{id}").unwrap().iter().all(|r| r.line == 6));
        assert!(!result.cancelled);
    }

    #[test]
    fn test_worker_count_invariance() {
        let dir = tempfile::tempdir().unwrap();
        let files = fixture(dir.path());
        let eps = endpoints();

        let baseline = snapshot(&ScanCoordinator::new(&eps, 1).run(&files).unwrap());
        for workers in [2, 8] {
            let result = ScanCoordinator::new(&eps, workers).run(&files).unwrap();
            assert_eq!(snapshot(&result), baseline, "workers = {}", workers);
        }
    }

    #[test]
    fn test_idempotent_runs() {
        let dir = tempfile::tempdir().unwrap();
        let files = fixture(dir.path());
        let eps = endpoints();
        let coordinator = ScanCoordinator::new(&eps, 3);

        let first = snapshot(&coordinator.run(&files).unwrap());
        let second = snapshot(&coordinator.run(&files).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_undecodable_file_is_skipped_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = fixture(dir.path());
        files.insert(4, write(dir.path(), "src/bad.js", b"fetch('/users')\xff\xfe\n"));
        let eps = endpoints();

        let result = ScanCoordinator::new(&eps, 4).run(&files).unwrap();
        assert_eq!(result.files_scanned, 10);
        assert_eq!(result.count("/users"), 10);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].file, PathBuf::from("src/bad.js"));
        assert!(result.warnings[0].message.contains("UTF-8"));
    }

    #[test]
    fn test_missing_file_is_skipped_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = fixture(dir.path());
        files.push(SourceFile::new(dir.path().join("gone.js"), PathBuf::from("gone.js")));
        let eps = endpoints();

        let result = ScanCoordinator::new(&eps, 2).run(&files).unwrap();
        assert_eq!(result.files_scanned, 10);
        assert_eq!(result.warnings[0].file, PathBuf::from("gone.js"));
    }

    #[test]
    fn test_empty_file_set() {
        let eps = endpoints();
        let result = ScanCoordinator::new(&eps, 4).run(&[]).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.referenced_count(), 0);
        assert_eq!(result.files_scanned, 0);
    }

    #[test]
    fn test_cancelled_before_start_merges_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = fixture(dir.path());
        let eps = endpoints();
        let token = CancelToken::new();
        token.cancel();

        let result = ScanCoordinator::new(&eps, 2)
            .with_cancel(token)
            .run(&files)
            .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.files_scanned, 0);
        assert_eq!(result.len(), 2);
        assert_eq!(result.count("/users"), 0);
    }

    #[test]
    fn test_cancel_mid_run_keeps_merged_results() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<SourceFile> = (0..40)
            .map(|i| {
                let body = format!("fetch('/users');\n// {i}\nget('/orders/{i}');\n");
                write(dir.path(), &format!("f{i:02}.ts"), body.as_bytes())
            })
            .collect();
        let eps = endpoints();
        let token = CancelToken::new();
        let trigger = token.clone();
        let seen = std::cell::Cell::new(0);

        let result = ScanCoordinator::new(&eps, 1)
            .with_cancel(token)
            .with_progress(|done, total| {
                assert_eq!(total, 40);
                seen.set(done);
                if done == 1 {
                    trigger.cancel();
                }
            })
            .run(&files)
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(seen.get(), 1);
        assert_eq!(result.files_scanned, 1);
        assert!(result.files_scanned < files.len());
        assert_eq!(result.len(), 2);

        let users = result.references("/users").unwrap();
        let orders = result.references("/orders/{id}").unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(orders.len(), 1);
        assert_eq!(users[0].file, orders[0].file);
        assert_eq!((users[0].line, orders[0].line), (1, 3));
        assert_eq!(users[0].preview, "fetch('/users');");
    }

    #[test]
    fn test_completed_run_is_not_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let files = fixture(dir.path());
        let eps = endpoints();
        let token = CancelToken::new();
        let trigger = token.clone();

        let result = ScanCoordinator::new(&eps, 2)
            .with_cancel(token)
            .with_progress(|done, total| {
                if done == total {
                    trigger.cancel();
                }
            })
            .run(&files)
            .unwrap();
        assert!(!result.cancelled);
        assert_eq!(result.files_scanned, 10);
    }

    #[test]
    fn test_duplicate_endpoints_match_once() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![write(dir.path(), "a.js", b"fetch('/users')\n")];
        let eps = vec![
            Endpoint::new("/users"),
            Endpoint::new("/orders/{id}"),
            Endpoint::new("/users"),
        ];

        let coordinator = ScanCoordinator::new(&eps, 2);
        assert_eq!(coordinator.endpoints().len(), 2);

        let result = coordinator.run(&files).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.count("/users"), 1);
    }

    #[test]
    fn test_zero_workers_uses_default() {
        let eps = endpoints();
        assert_eq!(ScanCoordinator::new(&eps, 0).workers(), DEFAULT_WORKERS);
        assert_eq!(ScanCoordinator::new(&eps, 3).workers(), 3);
    }

    #[test]
    fn test_merge_outcome_records_failure() {
        let eps = endpoints();
        let mut result = ScanResult::new(&eps);
        let file = SourceFile::new(PathBuf::from("/r/x.py"), PathBuf::from("x.py"));
        merge_outcome(
            &mut result,
            Err((file.clone(), RippleError::FileDecode { path: file.relative.clone() })),
        );
        merge_outcome(
            &mut result,
            Ok(FileHits {
                file: PathBuf::from("y.py"),
                references: vec![Reference::new(&eps[0], Path::new("y.py"), 2, "get('/users')")],
            }),
        );
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.files_scanned, 1);
        assert_eq!(result.count("/users"), 1);
    }
}
