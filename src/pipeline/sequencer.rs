//! The chainable pipeline state holder.
//!
//! A [`Sequencer`] owns one payload slot and one sticky fault slot behind a
//! [`Mutex`]. Every chainable operation applies the same policy:
//!
//! 1. lock the state;
//! 2. if a fault is recorded, return immediately without running the effect;
//! 3. otherwise run the effect (I/O and/or a caller-supplied function);
//! 4. on success replace the payload (for `load`, `organize`, `transform`),
//!    on failure record the fault and leave the payload untouched;
//! 5. unlock and return `&self` for further chaining.
//!
//! The first fault is therefore never overwritten and the payload is frozen
//! from that point on.
//!
//! # Re-entrancy
//!
//! Caller-supplied functions run while the lock is held. They must not call
//! back into the same `Sequencer` (that deadlocks) and should not block for
//! long, since every other thread using the sequencer waits on the lock.

use super::codec::PayloadCodec;
use super::config::PipelineConfig;
use super::delimited::DelimitedReader;
use super::error::{BoxError, PipelineError};
use super::fetch::{Fetcher, HttpFetcher};
use super::storage;
use super::types::{Operation, Records, Status};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// Payload and fault, always read and written together under the lock.
struct SequencerState<P> {
    payload: Option<P>,
    fault: Option<PipelineError>,
}

impl<P> SequencerState<P> {
    /// Records `MutexPoisoned` unless an earlier fault is already present.
    fn mark_poisoned(&mut self) {
        if self.fault.is_none() {
            self.fault = Some(PipelineError::MutexPoisoned);
        }
    }
}

/// What a successful effect does to the payload.
enum Outcome<P> {
    Keep,
    Replace(P),
}

/// A fluent pipeline of load, transform and persist steps with sticky
/// first-error semantics.
///
/// The generic parameter `P` is the payload type. Operations that persist
/// it (`save`) require `P: Serialize`; everything else works with any `P`.
///
/// # Thread Safety
///
/// All operations take `&self`. Wrap the sequencer in an [`Arc`] to chain
/// from several threads; concurrent calls serialize on the internal lock.
///
/// # Example
///
/// ```rust
/// use pipeline_rs::{BoxError, Sequencer};
///
/// let pipeline: Sequencer<Vec<f64>> = Sequencer::new();
/// pipeline
///     .transform(|_| Ok(vec![1.0, 2.0, 3.0]))
///     .transform(|data| {
///         let values = data.ok_or("no data")?;
///         Ok(values.iter().map(|v| v * 10.0).collect())
///     })
///     .validate(3, |expected: usize, data| {
///         if data.map(Vec::len) == Some(expected) {
///             Ok(())
///         } else {
///             Err(BoxError::from("unexpected length"))
///         }
///     });
///
/// assert!(pipeline.error().is_none());
/// assert_eq!(pipeline.data(), Some(vec![10.0, 20.0, 30.0]));
/// ```
pub struct Sequencer<P> {
    /// Correlates the log lines of one pipeline run.
    run_id: Uuid,
    config: PipelineConfig,
    /// Injected fetcher, or the lazily built default HTTP fetcher.
    fetcher: OnceLock<Arc<dyn Fetcher>>,
    state: Mutex<SequencerState<P>>,
}

impl<P> Sequencer<P> {
    /// Create an empty sequencer with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create an empty sequencer with the given configuration.
    #[must_use]
    pub fn with_config(config: PipelineConfig) -> Self {
        let run_id = Uuid::new_v4();
        trace!(%run_id, "pipeline created");
        Self {
            run_id,
            config,
            fetcher: OnceLock::new(),
            state: Mutex::new(SequencerState {
                payload: None,
                fault: None,
            }),
        }
    }

    /// Use `fetcher` for [`gather`](Self::gather) instead of the default HTTP client.
    #[must_use]
    pub fn with_fetcher(self, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher: OnceLock::from(fetcher),
            ..self
        }
    }

    /// Identifier attached to every log line of this pipeline.
    #[must_use]
    #[inline]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The configuration this sequencer was built with.
    #[must_use]
    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    /// Returns a copy of the current payload, `None` if nothing was loaded yet.
    #[must_use]
    pub fn data(&self) -> Option<P>
    where
        P: Clone,
    {
        self.lock().payload.clone()
    }

    /// Runs `f` on the current payload under the lock, without cloning it.
    pub fn with_data<R>(&self, f: impl FnOnce(Option<&P>) -> R) -> R {
        let state = self.lock();
        f(state.payload.as_ref())
    }

    /// Returns the recorded fault, `None` while the pipeline is running.
    #[must_use]
    pub fn error(&self) -> Option<PipelineError> {
        self.lock().fault.clone()
    }

    /// Returns `true` once a fault has been recorded.
    #[must_use]
    pub fn is_faulted(&self) -> bool {
        self.lock().fault.is_some()
    }

    /// Current state of the pipeline.
    #[must_use]
    pub fn status(&self) -> Status {
        if self.is_faulted() {
            Status::Faulted
        } else {
            Status::Running
        }
    }

    /// Consumes the sequencer and returns the payload and the fault.
    #[must_use]
    pub fn into_parts(self) -> (Option<P>, Option<PipelineError>) {
        let mut state = self
            .state
            .into_inner()
            .unwrap_or_else(|poisoned| {
                let mut state = poisoned.into_inner();
                state.mark_poisoned();
                state
            });
        (state.payload.take(), state.fault.take())
    }

    /// Consumes the sequencer and returns the payload, or the first fault.
    ///
    /// # Errors
    ///
    /// Returns the recorded [`PipelineError`] if any step failed.
    pub fn into_result(self) -> Result<Option<P>, PipelineError> {
        match self.into_parts() {
            (_, Some(fault)) => Err(fault),
            (payload, None) => Ok(payload),
        }
    }

    // ─── Operations ─────────────────────────────────────────────────────

    /// Fetches `source_url` and writes the raw body to `target`.
    ///
    /// The payload is not changed.
    pub fn gather(&self, source_url: &str, target: impl AsRef<Path>) -> &Self {
        let target = target.as_ref();
        self.step(Operation::Gather, |_| {
            let bytes = self.fetcher()?.fetch(source_url)?;
            storage::write_all(target, &bytes)?;
            info!(
                run_id = %self.run_id,
                url = source_url,
                path = %target.display(),
                bytes = bytes.len(),
                "gathered remote resource"
            );
            Ok(Outcome::Keep)
        })
    }

    /// Reads all bytes of `path` and replaces the payload with `decode(bytes)`.
    ///
    /// `decode` is not called if the file cannot be read. Use
    /// [`PayloadCodec::decoder`] to read back what [`save`](Self::save) wrote.
    pub fn load<F>(&self, path: impl AsRef<Path>, decode: F) -> &Self
    where
        F: FnOnce(&[u8]) -> Result<P, BoxError>,
    {
        let path = path.as_ref();
        self.step(Operation::Load, |_| {
            let raw = storage::read_all(path)?;
            decode(&raw)
                .map(Outcome::Replace)
                .map_err(|e| PipelineError::from_callback(Operation::Load, e))
        })
    }

    /// Reads the delimited-text file at `path` into rows and replaces the
    /// payload with `encode(rows)`.
    ///
    /// Rows with differing field counts are passed through as they are.
    pub fn organize<F>(&self, path: impl AsRef<Path>, encode: F) -> &Self
    where
        F: FnOnce(Records) -> Result<P, BoxError>,
    {
        let path = path.as_ref();
        self.step(Operation::Organize, |_| {
            let records = DelimitedReader::from_config(&self.config)?.read_path(path)?;
            encode(records)
                .map(Outcome::Replace)
                .map_err(|e| PipelineError::from_callback(Operation::Organize, e))
        })
    }

    /// Encodes the payload with the configured [`PayloadCodec`] and writes it
    /// to `path`. An absent payload writes an empty file.
    pub fn save(&self, path: impl AsRef<Path>) -> &Self
    where
        P: Serialize,
    {
        let path = path.as_ref();
        let codec: PayloadCodec = self.config.codec;
        self.step(Operation::Save, |payload| {
            let bytes = codec.encode(payload)?;
            storage::write_all(path, &bytes)?;
            info!(
                run_id = %self.run_id,
                path = %path.display(),
                bytes = bytes.len(),
                content_type = codec.content_type(),
                "saved payload"
            );
            Ok(Outcome::Keep)
        })
    }

    /// Replaces the payload with `f(payload)`.
    pub fn transform<F>(&self, f: F) -> &Self
    where
        F: FnOnce(Option<&P>) -> Result<P, BoxError>,
    {
        self.step(Operation::Transform, |payload| {
            f(payload)
                .map(Outcome::Replace)
                .map_err(|e| PipelineError::from_callback(Operation::Transform, e))
        })
    }

    /// Inspects the payload together with `input`, e.g. to run inference.
    ///
    /// The payload is not changed; an error from `f` faults the pipeline.
    pub fn evaluate<I, F>(&self, input: I, f: F) -> &Self
    where
        F: FnOnce(I, Option<&P>) -> Result<(), BoxError>,
    {
        self.inspect(Operation::Evaluate, input, f)
    }

    /// Checks the payload together with `input`, e.g. to score model quality.
    ///
    /// Runs exactly like [`evaluate`](Self::evaluate).
    pub fn validate<I, F>(&self, input: I, f: F) -> &Self
    where
        F: FnOnce(I, Option<&P>) -> Result<(), BoxError>,
    {
        self.inspect(Operation::Validate, input, f)
    }

    fn inspect<I, F>(&self, operation: Operation, input: I, f: F) -> &Self
    where
        F: FnOnce(I, Option<&P>) -> Result<(), BoxError>,
    {
        self.step(operation, |payload| {
            f(input, payload)
                .map(|()| Outcome::Keep)
                .map_err(|e| PipelineError::from_callback(operation, e))
        })
    }

    // ─── Internals ──────────────────────────────────────────────────────

    /// Runs one step under the lock, skipping it if a fault is recorded.
    fn step<F>(&self, operation: Operation, effect: F) -> &Self
    where
        F: FnOnce(Option<&P>) -> Result<Outcome<P>, PipelineError>,
    {
        let mut state = self.lock();
        if let Some(fault) = &state.fault {
            trace!(
                run_id = %self.run_id,
                %operation,
                "step skipped, pipeline already faulted: {fault}"
            );
            return self;
        }

        match effect(state.payload.as_ref()) {
            Ok(Outcome::Keep) => {
                debug!(run_id = %self.run_id, %operation, "step completed");
            }
            Ok(Outcome::Replace(payload)) => {
                state.payload = Some(payload);
                debug!(run_id = %self.run_id, %operation, "step completed, payload replaced");
            }
            Err(fault) => {
                warn!(run_id = %self.run_id, %operation, "step failed: {fault}");
                state.fault = Some(fault);
            }
        }
        self
    }

    /// Locks the state. A poisoned lock faults the pipeline instead of
    /// propagating the panic.
    fn lock(&self) -> MutexGuard<'_, SequencerState<P>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned: PoisonError<_>| {
                let mut state = poisoned.into_inner();
                if state.fault.is_none() {
                    warn!(run_id = %self.run_id, "pipeline state lock poisoned");
                }
                state.mark_poisoned();
                state
            })
    }

    fn fetcher(&self) -> Result<&Arc<dyn Fetcher>, PipelineError> {
        if let Some(fetcher) = self.fetcher.get() {
            return Ok(fetcher);
        }
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::from_config(&self.config)?);
        Ok(self.fetcher.get_or_init(|| fetcher))
    }
}

impl<P> Default for Sequencer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Sequencer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("run_id", &self.run_id)
            .field("status", &self.status())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
