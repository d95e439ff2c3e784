//! Generic evaluators for the two check patterns.
//!
//! Matching is exact literal substring containment: no regex, no
//! tokenization, no whitespace normalization.

use crate::check::ContentTarget;
use crate::error::{ConformError, Result};
use crate::outcome::Verdict;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Report every path in `paths` that does not exist under `root`.
///
/// A path whose existence cannot be determined (e.g. permission denied on a
/// parent directory) is a precondition failure, not a missing path.
pub fn evaluate_existence(root: &Path, paths: &[String]) -> Result<Verdict> {
    let mut missing = Vec::new();

    for rel in paths {
        let full = root.join(rel);
        let exists = full
            .try_exists()
            .map_err(|e| ConformError::Precondition {
                path: full.clone(),
                reason: e.to_string(),
            })?;
        debug!(path = %rel, exists, "Checked path");
        if !exists {
            missing.push(rel.clone());
        }
    }

    Ok(Verdict::from_missing(missing))
}

/// Report every required token absent from its target file.
///
/// All target files are read before any token is tested, so a missing target
/// yields an error even when another target already lacks tokens.
pub fn evaluate_content(root: &Path, targets: &[ContentTarget]) -> Result<Verdict> {
    let mut contents = Vec::with_capacity(targets.len());
    for target in targets {
        contents.push(read_target(root, &target.path)?);
    }

    let mut missing = Vec::new();
    for (target, text) in targets.iter().zip(&contents) {
        for token in &target.required {
            if !text.contains(token.as_str()) {
                debug!(path = %target.path, token = %token, "Token not found");
                missing.push(token.clone());
            }
        }
    }

    Ok(Verdict::from_missing(missing))
}

/// Read `root/rel` as UTF-8 text.
///
/// The file handle is released before returning on every path.
pub fn read_target(root: &Path, rel: &str) -> Result<String> {
    let full = root.join(rel);
    let bytes = std::fs::read(&full).map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::NotFound => "file not found".to_string(),
            _ => e.to_string(),
        };
        ConformError::Precondition {
            path: full.clone(),
            reason,
        }
    })?;

    String::from_utf8(bytes).map_err(|_| ConformError::Decode { path: full })
}
