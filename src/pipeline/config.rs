//! Pipeline configuration.
//!
//! [`PipelineConfig`] tunes the built-in collaborators: the HTTP client used
//! by `gather`, the delimited-text reader used by `organize`, and the codec
//! used by `save`. It is plain serde data so it can be kept next to a
//! dataset as JSON.

use super::codec::PayloadCodec;
use super::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default TCP connect timeout for `gather` in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default whole-request timeout for `gather` in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

/// Settings for a [`Sequencer`](super::Sequencer) and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// TCP connect timeout for remote retrieval, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Timeout for a whole remote retrieval, in milliseconds.
    pub request_timeout_ms: u64,
    /// `User-Agent` header sent by the HTTP fetcher.
    pub user_agent: String,
    /// Field delimiter of delimited-text sources. Must be ASCII.
    pub delimiter: char,
    /// Skip the first row of delimited-text sources.
    pub has_headers: bool,
    /// Trim surrounding whitespace from every field.
    pub trim_fields: bool,
    /// Binary form written by `save`.
    pub codec: PayloadCodec,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: concat!("pipeline-rs/", env!("CARGO_PKG_VERSION")).to_string(),
            delimiter: ',',
            has_headers: false,
            trim_fields: false,
            codec: PayloadCodec::default(),
        }
    }
}

impl PipelineConfig {
    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Treats the first row of delimited sources as a header and skips it.
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Enables whitespace trimming of delimited fields.
    #[must_use]
    pub fn with_trim_fields(mut self, trim_fields: bool) -> Self {
        self.trim_fields = trim_fields;
        self
    }

    /// Sets the codec used by `save`.
    #[must_use]
    pub fn with_codec(mut self, codec: PayloadCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Sets both HTTP timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout_ms = u64::try_from(connect.as_millis()).unwrap_or(u64::MAX);
        self.request_timeout_ms = u64::try_from(request.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Connect timeout as a [`Duration`].
    #[must_use]
    #[inline]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    #[inline]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// The delimiter as the single byte expected by the reader.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the delimiter is not ASCII.
    pub fn delimiter_byte(&self) -> Result<u8, PipelineError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(PipelineError::InvalidConfig {
                message: format!("delimiter {:?} is not an ASCII character", self.delimiter),
            })
        }
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.delimiter_byte()?;
        if self.connect_timeout_ms == 0 || self.request_timeout_ms == 0 {
            return Err(PipelineError::InvalidConfig {
                message: "timeouts must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration. Missing fields take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the JSON is malformed or
    /// fails [`validate`](Self::validate).
    pub fn from_json(data: &str) -> Result<Self, PipelineError> {
        let config: Self =
            serde_json::from_str(data).map_err(|error| PipelineError::InvalidConfig {
                message: error.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> Result<String, PipelineError> {
        serde_json::to_string_pretty(self).map_err(|error| PipelineError::Serialization {
            message: error.to_string(),
        })
    }
}
