//! Single-page fetch
//!
//! One rate-limited GET, decoded into a [`Page`] and checked for
//! `success: false`. No retries are attempted here.

use super::types::Page;
use crate::error::{Error, Result};
use crate::http::{admit, Dispatcher, RateLimit};
use crate::types::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Fetches pages of a listing through the shared dispatcher and limiter
#[derive(Clone)]
pub struct PageFetcher {
    dispatcher: Arc<Dispatcher>,
    limiter: Option<Arc<dyn RateLimit>>,
}

impl PageFetcher {
    /// Create a fetcher over shared collaborators
    pub fn new(dispatcher: Arc<Dispatcher>, limiter: Option<Arc<dyn RateLimit>>) -> Self {
        Self {
            dispatcher,
            limiter,
        }
    }

    /// Fetch and validate one page
    ///
    /// An empty `data` array is returned as-is; deciding that it ends the
    /// stream is up to the caller.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        ctx: &CancellationToken,
        url: &str,
    ) -> Result<Page<T>> {
        admit(self.limiter.as_deref(), ctx).await?;

        let body = self
            .dispatcher
            .execute(ctx, Method::GET, url, None)
            .await
            .map_err(rejection_from_status)?;
        let page: Page<T> = serde_json::from_slice(&body)?;

        if !page.success {
            return Err(rejected(page.error));
        }

        debug!(
            "Fetched page: {} items, has_next={}",
            page.data.len(),
            page.next_url().is_some()
        );

        Ok(page)
    }
}

/// Status fields of a `/v1` response body
#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Rejection for a `success: false` envelope
pub(crate) fn rejected(message: Option<String>) -> Error {
    let message = message.unwrap_or_else(|| "success false in response".to_string());
    warn!("Request rejected by service: {}", message);
    Error::rejected(message)
}

/// Turn a non-2xx status carrying a `success: false` envelope into a rejection
///
/// TronGrid reports bad input as 4xx with a regular envelope. Bodies that do
/// not decode as one keep the [`Error::HttpStatus`] they arrived with.
pub(crate) fn rejection_from_status(err: Error) -> Error {
    match err {
        Error::HttpStatus { status, body } => match serde_json::from_str::<Envelope>(&body) {
            Ok(Envelope {
                success: false,
                error,
            }) => rejected(error),
            _ => Error::HttpStatus { status, body },
        },
        other => other,
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("dispatcher", &self.dispatcher)
            .field("has_rate_limiter", &self.limiter.is_some())
            .finish()
    }
}
