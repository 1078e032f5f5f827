//! Remote retrieval for `gather`.
//!
//! The [`Fetcher`] trait is the seam between the pipeline and the network.
//! [`HttpFetcher`] is the default implementation, a blocking `reqwest`
//! client. Tests and offline runs inject their own fetcher through
//! [`Sequencer::with_fetcher`](super::Sequencer::with_fetcher).

use super::config::PipelineConfig;
use super::error::PipelineError;
use reqwest::blocking::Client;
use std::fmt;
use tracing::trace;

/// Retrieves the full body of a remote resource.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a sequencer holding one can be
/// shared across threads via `Arc`.
pub trait Fetcher: Send + Sync + fmt::Debug {
    /// Retrieve all bytes at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Fetch`] on transport failures and non-success
    /// responses.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError>;
}

/// Blocking HTTP GET fetcher.
pub struct HttpFetcher {
    client: Client,
}

impl fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFetcher").finish_non_exhaustive()
    }
}

impl HttpFetcher {
    /// Build a fetcher using the timeouts and user agent of `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the HTTP client cannot be
    /// initialized.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|error| PipelineError::InvalidConfig {
                message: format!("cannot build HTTP client: {error}"),
            })?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|error| fetch_error(url, &error))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Fetch {
                url: url.to_string(),
                status: Some(status.as_u16()),
                message: format!("HTTP status {status}"),
            });
        }

        let body = response.bytes().map_err(|error| fetch_error(url, &error))?;
        trace!("fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

fn fetch_error(url: &str, error: &reqwest::Error) -> PipelineError {
    PipelineError::Fetch {
        url: url.to_string(),
        status: error.status().map(|s| s.as_u16()),
        message: error.to_string(),
    }
}
