//! Binary structured-record codec for pipeline payloads.
//!
//! [`PayloadCodec`] selects the canonical encode/decode pair used when a
//! payload is persisted by `save` and read back by `load`:
//!
//! - [`PayloadCodec::Bincode`]: compact binary form (default)
//! - [`PayloadCodec::Json`]: human-readable JSON
//!
//! Both are serde based, so any `Serialize + DeserializeOwned` payload works.
//!
//! # Absent payloads
//!
//! Encoding `None` yields an empty byte vector for either codec. Decoding an
//! empty slice is a [`PipelineError::Deserialization`] error.

use super::error::{BoxError, PipelineError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Canonical byte encoding of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadCodec {
    /// Bincode with the standard configuration.
    #[default]
    Bincode,
    /// JSON via `serde_json`.
    Json,
}

impl PayloadCodec {
    /// Encode a payload into bytes. `None` encodes to an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Serialization`] if the payload cannot be
    /// represented in this format.
    pub fn encode<P: Serialize>(self, payload: Option<&P>) -> Result<Vec<u8>, PipelineError> {
        let Some(payload) = payload else {
            return Ok(Vec::new());
        };
        match self {
            PayloadCodec::Bincode => {
                bincode::serde::encode_to_vec(payload, bincode::config::standard()).map_err(|e| {
                    PipelineError::Serialization {
                        message: e.to_string(),
                    }
                })
            }
            PayloadCodec::Json => {
                serde_json::to_vec(payload).map_err(|e| PipelineError::Serialization {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Decode bytes produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Deserialization`] if the bytes are malformed,
    /// empty, or followed by trailing data.
    pub fn decode<P: DeserializeOwned>(self, data: &[u8]) -> Result<P, PipelineError> {
        match self {
            PayloadCodec::Bincode => {
                let (payload, consumed): (P, usize) =
                    bincode::serde::decode_from_slice(data, bincode::config::standard()).map_err(
                        |e| PipelineError::Deserialization {
                            message: e.to_string(),
                        },
                    )?;
                if consumed != data.len() {
                    return Err(PipelineError::Deserialization {
                        message: format!(
                            "{} trailing bytes after payload",
                            data.len().saturating_sub(consumed)
                        ),
                    });
                }
                Ok(payload)
            }
            PayloadCodec::Json => {
                serde_json::from_slice(data).map_err(|e| PipelineError::Deserialization {
                    message: e.to_string(),
                })
            }
        }
    }

    /// A decode function suitable for [`Sequencer::load`](super::Sequencer::load).
    ///
    /// ```rust
    /// use pipeline_rs::{PayloadCodec, Sequencer};
    ///
    /// let pipeline: Sequencer<Vec<u32>> = Sequencer::new();
    /// pipeline.load("missing.bin", PayloadCodec::Bincode.decoder());
    /// assert!(pipeline.error().is_some());
    /// ```
    ///
    /// Decode failures keep their [`PipelineError::Deserialization`] kind when
    /// recorded as the pipeline fault.
    pub fn decoder<P: DeserializeOwned>(self) -> impl FnOnce(&[u8]) -> Result<P, BoxError> {
        move |data: &[u8]| self.decode(data).map_err(BoxError::from)
    }

    /// Returns the MIME-like content type identifier for this format.
    #[must_use]
    #[inline]
    pub fn content_type(self) -> &'static str {
        match self {
            PayloadCodec::Bincode => "application/x-bincode",
            PayloadCodec::Json => "application/json",
        }
    }
}
