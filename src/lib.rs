//! # Sticky-Error Data Pipeline
//!
//! A small, thread-safe fluent builder that chains data loading,
//! transformation, and persistence steps for a structured dataset. Each step
//! either runs or, once an earlier step has failed, becomes a free no-op, so a
//! long pipeline reads as a flat chain without error checks between steps.
//!
//! ## Key Features
//!
//! - **Sticky Faults**: The first error recorded by any step is kept. It is
//!   never overwritten and every later step is skipped without running its
//!   effect.
//!
//! - **Frozen Payload**: Once a fault is recorded the payload keeps the value
//!   it had at the moment of failure.
//!
//! - **Bring Your Own Logic**: Decoding, encoding, transformation, and
//!   inspection are caller-supplied closures. The built-in collaborators only
//!   cover the I/O around them.
//!
//! - **Thread-Safe**: All operations take `&self`; a single sequencer can be
//!   shared through `Arc` and chained from several threads. Calls serialize on
//!   an internal mutex.
//!
//! ## Operations
//!
//! | Operation | Effect | Replaces payload |
//! |-----------|--------|------------------|
//! | `gather(url, path)` | HTTP GET `url`, write the body to `path` | no |
//! | `load(path, decode)` | read `path`, payload = `decode(bytes)` | yes |
//! | `organize(path, encode)` | read delimited rows, payload = `encode(rows)` | yes |
//! | `save(path)` | encode payload with the configured codec, write to `path` | no |
//! | `transform(f)` | payload = `f(payload)` | yes |
//! | `evaluate(input, f)` | `f(input, payload)` for inference | no |
//! | `validate(input, f)` | `f(input, payload)` for quality checks | no |
//!
//! After the chain, read the outcome with `data()` and `error()`, or consume
//! the sequencer with `into_result()`:
//!
//! - payload present, no error: success
//! - no payload, error: total failure
//! - no payload, no error: an empty pipeline
//!
//! ## Example
//!
//! ```rust
//! use pipeline_rs::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = std::env::temp_dir().join(format!("pipeline-doc-{}", std::process::id()));
//! std::fs::create_dir_all(&dir)?;
//! let source = dir.join("scores.csv");
//! std::fs::write(&source, "alice,90\nbob,75,late\ncarol,82\n")?;
//!
//! let pipeline: Sequencer<Vec<(String, u32)>> = Sequencer::new();
//! pipeline
//!     .organize(&source, |rows| {
//!         rows.into_iter()
//!             .map(|row| -> Result<(String, u32), BoxError> {
//!                 Ok((row[0].clone(), row[1].parse()?))
//!             })
//!             .collect()
//!     })
//!     .transform(|data| {
//!         let mut data = data.cloned().unwrap_or_default();
//!         data.sort_by(|a, b| b.1.cmp(&a.1));
//!         Ok(data)
//!     })
//!     .save(dir.join("scores.bin"));
//!
//! let ranked = pipeline.into_result()?.unwrap_or_default();
//! assert_eq!(ranked[0], ("alice".to_string(), 90));
//! # std::fs::remove_dir_all(&dir)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Steps emit `tracing` events tagged with the pipeline `run_id` and the
//! operation name: `trace` for skipped steps, `debug` for completed steps,
//! `warn` for the step that records the fault, `info` for bytes written by
//! `gather` and `save`. Install any subscriber to see them.
//!
//! ## Re-entrancy
//!
//! Caller-supplied closures run while the sequencer's lock is held. They must
//! not call back into the same sequencer.

pub mod pipeline;

pub mod prelude;

pub use pipeline::{
    BoxError, DelimitedReader, Fetcher, HttpFetcher, Operation, PayloadCodec, PipelineConfig,
    PipelineError, Records, Sequencer, Status,
};
