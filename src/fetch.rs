//! Remote object fetching
//!
//! Opens streaming reads of stored objects over HTTP(S). The fetcher makes
//! exactly one attempt per call; skipping or retrying a failed object is the
//! export orchestrator's decision, not the fetcher's.

use crate::config::RemoteConfig;
use crate::error::{Error, ExportError, Result};
use bytes::Bytes;
use futures::Stream;

/// Result alias for fetch operations, which fail with pipeline errors
pub type FetchResult<T> = std::result::Result<T, ExportError>;

/// HTTP client for the remote object store
#[derive(Clone, Debug)]
pub struct RemoteFetcher {
    client: reqwest::Client,
}

/// An open remote object, positioned at the start of its body
///
/// The body has not been read yet; the caller is responsible for draining
/// the stream (or dropping it to release the connection).
#[derive(Debug)]
pub struct RemoteObject {
    response: reqwest::Response,
}

impl RemoteObject {
    /// Size of the object body, when the remote reported one
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Consume the object, yielding its body as a lazily-read byte stream
    pub fn into_stream(self) -> impl Stream<Item = reqwest::Result<Bytes>> + Unpin {
        Box::pin(self.response.bytes_stream())
    }
}

impl RemoteFetcher {
    /// Build a fetcher from remote-access configuration
    ///
    /// The configured fetch timeout covers each whole request, connect
    /// through body completion, bounding the latency one stalled remote
    /// response can add to a run.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| Error::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Open a streaming read of one remote object
    ///
    /// `url` must be an absolute HTTP or HTTPS URL. On a 2xx status the
    /// returned object's body is unread and ready to stream. Non-2xx
    /// statuses and transport failures are classified into
    /// [`ExportError::RemoteStatus`] and [`ExportError::Transport`]; no body
    /// is available in either case.
    pub async fn fetch(&self, url: &str) -> FetchResult<RemoteObject> {
        let parsed = url::Url::parse(url).map_err(|e| ExportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ExportError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        // One attempt only; a failure here is reported, never retried
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| ExportError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::RemoteStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(RemoteObject { response })
    }
}
