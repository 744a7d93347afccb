//! Content digests for artifact drift detection.

use crate::error::{Error, Result};
use std::path::Path;

/// Digest artifact bytes into a fixed-length lowercase hex string.
///
/// Equal digests mean byte-identical content. Used as a change marker only.
#[must_use]
pub fn digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Read a local artifact.
///
/// # Errors
///
/// Returns `Error::Artifact` if the file cannot be read.
pub fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::artifact(path, e))
}

/// Read a local artifact and digest it.
///
/// # Errors
///
/// Returns `Error::Artifact` if the file cannot be read.
pub fn digest_file(path: &Path) -> Result<String> {
    read_artifact(path).map(|bytes| digest(&bytes))
}
