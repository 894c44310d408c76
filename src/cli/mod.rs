//! CLI module
//!
//! Command-line interface over [`TronGridClient`](crate::TronGridClient).
//!
//! # Commands
//!
//! - `now-block`, `block` - Block lookups
//! - `account`, `balance` - Account lookups
//! - `tx-info` - Transaction execution info
//! - `txs`, `transfers` - Paginated listings, one JSON record per line

mod commands;
mod runner;

pub use commands::{Cli, Commands, ListFilters};
pub use runner::Runner;
