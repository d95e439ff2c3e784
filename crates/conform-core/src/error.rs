//! Error taxonomy for conformance checking.

use std::path::PathBuf;

/// Errors produced while loading manifests or evaluating checks.
///
/// Inside a run, any of these returned by a check becomes that check's
/// `ERROR` outcome; they never abort the run itself.
#[derive(Debug, thiserror::Error)]
pub enum ConformError {
    #[error("precondition failed for {}: {reason}", path.display())]
    Precondition { path: PathBuf, reason: String },

    #[error("cannot decode {} as UTF-8", path.display())]
    Decode { path: PathBuf },

    #[error("duplicate check name: {0}")]
    DuplicateCheck(String),

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("failed to load manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },
}

/// Result type for conformance operations.
pub type Result<T> = std::result::Result<T, ConformError>;
