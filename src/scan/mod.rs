//! Reference scan: file discovery, the concurrent coordinator, and the
//! aggregated result model.

pub mod coordinator;
pub mod types;
pub mod walker;

pub use coordinator::{
    merge_outcome, scan_file, scan_source, CancelToken, FileOutcome, ProgressFn,
    ScanCoordinator,
};
pub use types::{EndpointReferences, FileHits, Reference, ScanResult, ScanWarning, SourceFile};
pub use walker::{discover_files, is_candidate, validate_root, ScanStats};
