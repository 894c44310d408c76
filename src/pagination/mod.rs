//! Pagination module
//!
//! Lazy traversal of TronGrid's `/v1` listings.
//!
//! # Overview
//!
//! A [`Cursor`] owns one page of items and a continuation URL. When the
//! caller advances past the buffer, the cursor asks the [`PageFetcher`] for
//! the next page, which waits on the rate limiter, dispatches a GET and
//! decodes the [`Page`] envelope. The first failure is kept and reported on
//! every later read.

mod cursor;
mod fetcher;
mod types;

pub use cursor::{Cursor, CursorState};
pub use fetcher::PageFetcher;
pub(crate) use fetcher::{rejected, rejection_from_status};
pub use types::{Page, PageLinks, PageMeta, QueryOptions};
