//! # Ripple
//!
//! API impact analysis. For each endpoint declared in an OpenAPI spec, Ripple
//! finds whether and where that endpoint is referenced in a source tree.
//!
//! ## How it works
//!
//! - **spec**: reads the `paths` keys of a YAML or JSON spec
//! - **scan::walker**: collects candidate files (extension allow-list, skip-list)
//! - **parser::comments**: strips line and block comments, one line at a time
//! - **parser::matcher**: matches the literal path, or the parameter-stripped
//!   pattern for paths like `/products/{id}`
//! - **scan::coordinator**: fans files out to a worker pool and merges the
//!   results on a single aggregator
//! - **report**: text and JSON rendering of the result
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ripple::{analyze, ScanConfig};
//! use std::path::Path;
//!
//! let analysis = analyze(Path::new("api.yaml"), Path::new("src"), &ScanConfig::default(), None)?;
//! for entry in analysis.result.entries() {
//!     println!("{}: {} references", entry.endpoint.path, entry.references.len());
//! }
//! # Ok::<(), ripple::RippleError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod report;
pub mod scan;
pub mod spec;

// Re-exports for convenience
pub use analysis::{analyze, Analysis};
pub use config::ScanConfig;
pub use error::{Result, RippleError};
pub use parser::{path_to_pattern, CommentFilter, CommentStyle, Endpoint, SourceLanguage};
pub use report::Report;
pub use scan::{
    discover_files, CancelToken, Reference, ScanCoordinator, ScanResult, ScanStats, ScanWarning,
    SourceFile,
};
pub use spec::load_endpoints;
