//! Core types shared by the [`Sequencer`](super::Sequencer) and its
//! collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows of string fields produced by the delimited-text reader.
///
/// Rows may have different field counts.
pub type Records = Vec<Vec<String>>;

/// A chainable step of the pipeline.
///
/// Used to label log lines and to tag [`PipelineError::Step`](super::PipelineError::Step)
/// faults with the operation whose caller-supplied function failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Fetch bytes from a remote location and store them in a local file.
    Gather,
    /// Read a local file and decode it into a new payload.
    Load,
    /// Read a delimited-text file into rows and encode them into a new payload.
    Organize,
    /// Serialize the current payload and write it to a local file.
    Save,
    /// Replace the payload with the output of a caller-supplied function.
    Transform,
    /// Inspect the payload with an auxiliary input (e.g. model inference).
    Evaluate,
    /// Inspect the payload with an auxiliary input (e.g. quality metrics).
    Validate,
}

impl Operation {
    /// Returns `true` if a successful run of this operation replaces the payload.
    #[must_use]
    #[inline]
    pub fn replaces_payload(self) -> bool {
        matches!(
            self,
            Operation::Load | Operation::Organize | Operation::Transform
        )
    }

    /// Stable lowercase name used in log fields.
    #[must_use]
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Gather => "gather",
            Operation::Load => "load",
            Operation::Organize => "organize",
            Operation::Save => "save",
            Operation::Transform => "transform",
            Operation::Evaluate => "evaluate",
            Operation::Validate => "validate",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two states of a [`Sequencer`](super::Sequencer).
///
/// `Faulted` is absorbing: no operation leads back to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// No fault recorded; the next operation will run its effect.
    Running,
    /// A fault is recorded; every further operation is a no-op.
    Faulted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Running => write!(f, "running"),
            Status::Faulted => write!(f, "faulted"),
        }
    }
}
