//! End-to-end pipeline: spec -> file discovery -> concurrent scan.

use std::path::Path;
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::error::Result;
use crate::parser::Endpoint;
use crate::scan::{discover_files, CancelToken, ScanCoordinator, ScanResult, ScanStats};

/// Output of one analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub endpoints: Vec<Endpoint>,
    pub stats: ScanStats,
    pub result: ScanResult,
}

/// Load the spec, discover files under `root`, and scan them.
///
/// Spec and root problems are fatal and surface before any file is read.
pub fn analyze(
    spec: &Path,
    root: &Path,
    config: &ScanConfig,
    cancel: Option<CancelToken>,
) -> Result<Analysis> {
    let endpoints = crate::spec::load_endpoints(spec)?;
    let files = discover_files(root, config)?;
    let stats = ScanStats::from_files(&files);
    info!(root = %root.display(), "{}", stats);

    let mut coordinator = ScanCoordinator::new(&endpoints, config.workers)
        .with_progress(|done, total| debug!(done, total, "scan progress"));
    if let Some(token) = cancel {
        coordinator = coordinator.with_cancel(token);
    }
    let result = coordinator.run(&files)?;

    Ok(Analysis {
        endpoints,
        stats,
        result,
    })
}
