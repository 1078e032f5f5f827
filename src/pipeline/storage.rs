//! Whole-file local storage used by `gather`, `load` and `save`.

use super::error::PipelineError;
use std::fs;
use std::path::Path;
use tracing::trace;

/// Read all bytes of `path`.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the file is missing or unreadable.
pub fn read_all(path: &Path) -> Result<Vec<u8>, PipelineError> {
    let bytes = fs::read(path).map_err(|e| PipelineError::io(path, &e))?;
    trace!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Write `bytes` to `path`, replacing any existing content.
///
/// Parent directories are not created.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the parent directory does not exist or
/// the file cannot be written.
pub fn write_all(path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
    fs::write(path, bytes).map_err(|e| PipelineError::io(path, &e))?;
    trace!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
