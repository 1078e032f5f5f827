//! Prelude module that re-exports commonly used types and traits.
//!
//! ```rust
//! use pipeline_rs::prelude::*;
//! ```

// Core pipeline types
pub use crate::pipeline::{Operation, Sequencer, Status};

// Errors
pub use crate::pipeline::{BoxError, PipelineError};

// Configuration and collaborators
pub use crate::pipeline::{
    DelimitedReader, Fetcher, HttpFetcher, PayloadCodec, PipelineConfig, Records,
};
