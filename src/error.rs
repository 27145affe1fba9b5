//! Error types for Ripple.
//!
//! Fatal errors (`SpecLoad`, `DirectoryInvalid`) abort the run before any
//! report is produced. Per-file errors (`FileRead`, `FileDecode`) are recovered
//! by the scan coordinator and surface as warnings on the result.

use std::path::PathBuf;

/// All errors produced by the library.
#[derive(Debug, thiserror::Error)]
pub enum RippleError {
    /// The API specification is missing or cannot be parsed.
    #[error("failed to load API spec {}: {reason}", path.display())]
    SpecLoad { path: PathBuf, reason: String },

    /// The scan root is missing or is not a directory.
    #[error("invalid scan directory {}: {reason}", path.display())]
    DirectoryInvalid { path: PathBuf, reason: String },

    /// A source file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file is not valid UTF-8 text.
    #[error("{} is not valid UTF-8 text", path.display())]
    FileDecode { path: PathBuf },

    /// The worker pool could not be created.
    #[error("worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RippleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_file() {
        let err = RippleError::FileRead {
            path: PathBuf::from("src/app.ts"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("src/app.ts"));
        assert!(msg.contains("denied"));
    }
}
