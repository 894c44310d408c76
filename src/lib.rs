// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # TronGrid client
//!
//! Typed async client for the TronGrid REST API: accounts, blocks,
//! transactions, constant contract calls and transaction broadcast.
//!
//! ## Features
//!
//! - **Lazy Pagination**: transaction listings are exposed as a forward-only
//!   [`Cursor`] that fetches the next page only when needed
//! - **Rate Limiting**: optional token bucket, or plug in your own [`RateLimit`]
//! - **Cancellation**: every call takes a `CancellationToken`
//! - **API Keys**: `TRON-PRO-API-KEY` injected on every request when configured
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tokio_util::sync::CancellationToken;
//! use trongrid::{ClientConfig, QueryOptions, Result, TronGridClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = TronGridClient::new(ClientConfig::from_env()?)?;
//!     let ctx = CancellationToken::new();
//!
//!     let block = client.get_now_block(&ctx).await?;
//!     println!("head: {:?}", block.number());
//!
//!     let mut txs = client.get_account_transactions("T...", &QueryOptions::new().limit(50))?;
//!     while txs.advance(&ctx).await {
//!         if let Ok(Some(tx)) = txs.current() {
//!             println!("{}", tx.tx_id);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    TronGridClient                        │
//! │  get_now_block  get_account  broadcast_hex  ...          │
//! │  get_account_transactions → Cursor<Transaction>          │
//! └──────────────────────────────────────────────────────────┘
//!                │                         │
//!        ┌───────┴───────┐         ┌───────┴───────┐
//!        │  call (admit, │         │    Cursor     │
//!        │  dispatch,    │         │  PageFetcher  │
//!        │  decode)      │         │               │
//!        └───────┬───────┘         └───────┬───────┘
//!                └───────────┬─────────────┘
//!                   ┌────────┴────────┐
//!                   │ RateLimit port  │
//!                   │ Dispatcher      │
//!                   └─────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Client configuration
pub mod config;

/// HTTP dispatch and rate limiting
pub mod http;

/// Paginated listings
pub mod pagination;

/// Request and response records
pub mod models;

/// Client façade
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use client::TronGridClient;
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use http::{RateLimit, RateLimiter, RateLimiterConfig};
pub use pagination::{Cursor, CursorState, QueryOptions};
pub use types::{Method, Network};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
