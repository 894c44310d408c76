//! Forward-only cursor over a paginated listing
//!
//! A [`Cursor`] holds one page of items at a time and fetches the next page
//! only when the caller advances past the last buffered item.
//!
//! ```rust,ignore
//! let mut cursor = client.get_account_transactions("T...", &QueryOptions::new().limit(50))?;
//! while cursor.advance(&ctx).await {
//!     if let Ok(Some(tx)) = cursor.current() {
//!         println!("{}", tx.tx_id);
//!     }
//! }
//! // Ok(None) at end of stream, Err(..) if the walk failed
//! if let Err(err) = cursor.current() {
//!     eprintln!("listing failed: {err}");
//! }
//! ```
//!
//! A cursor is single-writer: `advance` takes `&mut self`, and sharing one
//! cursor between tasks requires the caller to serialize access.

use super::fetcher::PageFetcher;
use super::types::Page;
use crate::error::{Error, Result};
use futures::Stream;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Where a cursor stands relative to its buffer and the remote listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Unread items remain in the local buffer
    Buffered,
    /// Buffer drained, a continuation URL is pending
    ExhaustedHasMore,
    /// Buffer drained and nothing left to fetch, or an error was recorded
    ExhaustedTerminal,
}

/// Lazily-paginated, forward-only iterator over a TronGrid listing
pub struct Cursor<T> {
    fetcher: PageFetcher,
    buffer: Vec<T>,
    position: Option<usize>,
    next_url: Option<String>,
    error: Option<Error>,
    fetches: usize,
}

impl<T: DeserializeOwned> Cursor<T> {
    /// Create a cursor that will fetch `url` on its first advance
    pub fn new(fetcher: PageFetcher, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            buffer: Vec::new(),
            position: None,
            next_url: Some(url.into()),
            error: None,
            fetches: 0,
        }
    }

    /// Move to the next item, fetching a page if the buffer is drained
    ///
    /// Returns `false` at end of stream or on failure; [`current`](Self::current)
    /// tells the two apart. Once `false`, every later call is `false` too.
    pub async fn advance(&mut self, ctx: &CancellationToken) -> bool {
        if self.error.is_some() {
            return false;
        }

        if let Some(pos) = self.position {
            if pos + 1 < self.buffer.len() {
                self.position = Some(pos + 1);
                return true;
            }
        }

        let Some(url) = self.next_url.take() else {
            self.drain();
            return false;
        };

        self.fetches += 1;
        match self.fetcher.fetch_page::<T>(ctx, &url).await {
            Ok(page) if page.data.is_empty() => {
                debug!("Empty page ends stream after {} fetches", self.fetches);
                self.drain();
                false
            }
            Ok(page) => {
                self.next_url = page.next_url().map(str::to_owned);
                let Page { data, .. } = page;
                self.buffer = data;
                self.position = Some(0);
                true
            }
            Err(e) => {
                debug!("Cursor stopped on error: {}", e);
                self.drain();
                self.error = Some(e);
                false
            }
        }
    }
}

impl<T> Cursor<T> {
    /// Item at the read position
    ///
    /// `Ok(None)` before the first advance and after the stream ended.
    /// Once a fetch has failed, the same error is returned on every call.
    pub fn current(&self) -> std::result::Result<Option<&T>, &Error> {
        if let Some(ref err) = self.error {
            return Err(err);
        }

        Ok(self.position.and_then(|pos| self.buffer.get(pos)))
    }

    /// Current state of the cursor
    pub fn state(&self) -> CursorState {
        if self.error.is_some() {
            return CursorState::ExhaustedTerminal;
        }

        let unread = self
            .position
            .map_or(!self.buffer.is_empty(), |pos| pos + 1 < self.buffer.len());

        if unread {
            CursorState::Buffered
        } else if self.next_url.is_some() {
            CursorState::ExhaustedHasMore
        } else {
            CursorState::ExhaustedTerminal
        }
    }

    /// Continuation URL that the next fetch would use
    pub fn next_url(&self) -> Option<&str> {
        self.next_url.as_deref()
    }

    /// Number of page fetches attempted so far
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    fn drain(&mut self) {
        self.buffer.clear();
        self.position = None;
        self.next_url = None;
    }
}

impl<T: DeserializeOwned + Clone> Cursor<T> {
    /// Turn the cursor into a stream of owned items
    ///
    /// A failure is yielded once as the final element.
    pub fn into_stream(self, ctx: CancellationToken) -> impl Stream<Item = Result<T>> {
        futures::stream::unfold(Some(self), move |state| {
            let ctx = ctx.clone();
            async move {
                let mut cursor = state?;

                if cursor.advance(&ctx).await {
                    let item = cursor.current().ok().flatten().cloned()?;
                    Some((Ok(item), Some(cursor)))
                } else {
                    cursor.error.take().map(|err| (Err(err), None))
                }
            }
        })
    }
}

impl<T> std::fmt::Debug for Cursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("buffered", &self.buffer.len())
            .field("position", &self.position)
            .field("next_url", &self.next_url)
            .field("error", &self.error)
            .field("fetches", &self.fetches)
            .finish()
    }
}
