//! Sticky-error data pipeline: the [`Sequencer`] and its I/O collaborators.

/// Binary and JSON payload codecs used by `save` and `load`.
pub mod codec;
pub mod config;
/// Delimited-text reader used by `organize`.
pub mod delimited;
pub mod error;
pub mod fetch;
pub mod sequencer;
/// Whole-file local storage helpers.
pub mod storage;
pub mod types;

pub use codec::PayloadCodec;
pub use config::PipelineConfig;
pub use delimited::DelimitedReader;
pub use error::{BoxError, PipelineError};
pub use fetch::{Fetcher, HttpFetcher};
pub use sequencer::Sequencer;
pub use types::{Operation, Records, Status};
