//! Request dispatcher
//!
//! Executes a single HTTP request under a cancellation token:
//! - attaches `Content-Type: application/json` for bodies
//! - attaches the API key header when configured
//! - maps transport failures and non-2xx statuses into [`Error`]
//!
//! The dispatcher never retries and never throttles; throttling is done by
//! the callers that own a [`RateLimit`](super::RateLimit).

use crate::config::{ClientConfig, API_KEY_HEADER};
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Executes HTTP requests against TronGrid
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections and is safe to use from many tasks.
pub struct Dispatcher {
    client: Client,
    api_key: Option<HeaderValue>,
    timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher from client configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Self::with_client(client, config)
    }

    /// Create a dispatcher over a caller-built `reqwest::Client`
    ///
    /// The client's own timeout and user agent apply. `config` supplies the
    /// API key and the timeout reported in [`Error::Timeout`].
    pub fn with_client(client: Client, config: &ClientConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(|key| {
                let mut value = HeaderValue::from_str(key)
                    .map_err(|e| Error::config(format!("invalid API key: {e}")))?;
                value.set_sensitive(true);
                Ok::<_, Error>(value)
            })
            .transpose()?;

        Ok(Self {
            client,
            api_key,
            timeout: config.timeout,
        })
    }

    /// Check if requests carry an API key
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Execute one request and return the raw response body
    ///
    /// Returns [`Error::Cancelled`] without touching the network when `ctx`
    /// is already cancelled. Cancelling `ctx` while the request is in flight
    /// drops the request future, which aborts the exchange and releases the
    /// connection.
    pub async fn execute(
        &self,
        ctx: &CancellationToken,
        method: Method,
        url: &str,
        body: Option<&JsonValue>,
    ) -> Result<Bytes> {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut req = self.client.request(method.into(), url);

        if let Some(body) = body {
            req = req
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(body)?);
        }

        if let Some(ref key) = self.api_key {
            req = req.header(API_KEY_HEADER, key.clone());
        }

        debug!("Dispatching {} {}", method, url);

        tokio::select! {
            biased;
            () = ctx.cancelled() => {
                debug!("Request cancelled: {} {}", method, url);
                Err(Error::Cancelled)
            }
            result = self.send(req) => result,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Bytes> {
        let response = req.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();

        // Reading the body consumes the response, handing the connection back.
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            warn!("Request failed with status {}", status.as_u16());
            return Err(Error::http_status(
                status.as_u16(),
                String::from_utf8_lossy(&body),
            ));
        }

        Ok(body)
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(err)
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("timeout", &self.timeout)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}
