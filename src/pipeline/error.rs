//! Pipeline error types
//!
//! [`PipelineError`] is the sticky fault recorded by a
//! [`Sequencer`](super::Sequencer). It is `Clone` so the accessor can hand out
//! copies while the original stays in place.

use super::types::Operation;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenience alias used by the pipeline collaborators.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error type returned by caller-supplied functions.
///
/// `&str`, `String`, `std::io::Error` and any other `Error + Send + Sync`
/// convert into it with `?` or `.into()`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can be recorded as the fault of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Reading or writing a local file failed.
    #[error("I/O error at {}: {message}", path.display())]
    Io {
        /// The file path involved.
        path: PathBuf,
        /// Kind of the underlying I/O error.
        kind: io::ErrorKind,
        /// The underlying I/O error message.
        message: String,
    },

    /// Retrieving a remote resource failed.
    #[error("fetch of {url} failed: {message}")]
    Fetch {
        /// The URL that was requested.
        url: String,
        /// HTTP status code when the server answered with a non-success status.
        status: Option<u16>,
        /// Description of the failure.
        message: String,
    },

    /// A delimited-text source could not be parsed.
    #[error("delimited parse error in {}: {message}", path.display())]
    Delimited {
        /// The source file.
        path: PathBuf,
        /// 1-based line of the offending record, if known.
        line: Option<u64>,
        /// The underlying parser message.
        message: String,
    },

    /// The payload could not be encoded.
    #[error("serialization error: {message}")]
    Serialization {
        /// Underlying error message
        message: String,
    },

    /// Bytes could not be decoded into a payload.
    #[error("deserialization error: {message}")]
    Deserialization {
        /// Underlying error message
        message: String,
    },

    /// A caller-supplied function returned an error.
    ///
    /// Displays exactly the caller's message.
    #[error("{message}")]
    Step {
        /// The operation whose function failed.
        operation: Operation,
        /// The caller's error message.
        message: String,
    },

    /// The pipeline configuration is unusable.
    #[error("invalid pipeline configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// A thread panicked while holding the pipeline state lock.
    #[error("pipeline state mutex poisoned")]
    MutexPoisoned,
}

impl PipelineError {
    /// Wraps the error of a caller-supplied function.
    pub fn step(operation: Operation, message: impl std::fmt::Display) -> Self {
        PipelineError::Step {
            operation,
            message: message.to_string(),
        }
    }

    /// Converts the error returned by a caller-supplied function.
    ///
    /// A [`PipelineError`] (for example from [`PayloadCodec::decode`](super::PayloadCodec::decode))
    /// is kept as is; anything else becomes a [`PipelineError::Step`] carrying its message.
    pub fn from_callback(operation: Operation, err: BoxError) -> Self {
        match err.downcast::<PipelineError>() {
            Ok(err) => *err,
            Err(other) => PipelineError::step(operation, other),
        }
    }

    /// Builds an [`PipelineError::Io`] for `path`.
    #[cold]
    pub fn io(path: &Path, err: &io::Error) -> Self {
        PipelineError::Io {
            path: path.to_path_buf(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Returns `true` if this is an I/O error for a missing file or directory.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PipelineError::Io {
                kind: io::ErrorKind::NotFound,
                ..
            }
        )
    }

    /// The operation tag of a [`PipelineError::Step`] fault.
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            PipelineError::Step { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}
