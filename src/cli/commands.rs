//! CLI commands and argument parsing

use crate::pagination::QueryOptions;
use crate::types::Network;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// TronGrid command-line client
#[derive(Parser, Debug)]
#[command(name = "trongrid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON); defaults to TRONGRID_* environment variables
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Network: mainnet, shasta or nile
    #[arg(short, long, global = true)]
    pub network: Option<Network>,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// TronGrid API key
    #[arg(long, global = true, env = "TRONGRID_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Client-side request rate limit (requests per second); defaults to the
    /// quota of the account tier
    #[arg(long, global = true)]
    pub rps: Option<u32>,

    /// Send requests without client-side throttling
    #[arg(long, global = true, conflicts_with = "rps")]
    pub no_rate_limit: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the latest block
    NowBlock,

    /// Show a block by height
    Block {
        /// Block height
        number: u64,
    },

    /// Show account details
    Account {
        /// Base58 account address
        address: String,
    },

    /// Show an account balance at a given block
    Balance {
        /// Base58 account address
        address: String,
        /// Block height
        block_number: u64,
        /// Block hash
        block_hash: String,
    },

    /// Show execution info of a transaction
    TxInfo {
        /// Transaction id
        tx_id: String,
    },

    /// List transactions of an account
    Txs {
        /// Base58 account address
        address: String,

        #[command(flatten)]
        filters: ListFilters,
    },

    /// List token transfers of an account
    Transfers {
        /// Base58 account address
        address: String,

        /// Contract type segment of the listing
        #[arg(long, default_value = "trc20")]
        contract_type: String,

        #[command(flatten)]
        filters: ListFilters,
    },
}

/// Filters shared by the listing commands
///
/// Boolean filters accept `--flag` or `--flag=false`; leaving them out sends
/// nothing.
#[derive(Args, Debug, Default, Clone)]
pub struct ListFilters {
    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Stop after this many records
    #[arg(long)]
    pub max_records: Option<usize>,

    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub only_confirmed: Option<bool>,

    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub only_unconfirmed: Option<bool>,

    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub only_from: Option<bool>,

    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub only_to: Option<bool>,

    /// Include internal transactions
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub search_internal: Option<bool>,

    /// Lower bound on block timestamp (ms)
    #[arg(long)]
    pub min_timestamp: Option<i64>,

    /// Upper bound on block timestamp (ms)
    #[arg(long)]
    pub max_timestamp: Option<i64>,

    /// Resume from a previous page's fingerprint
    #[arg(long)]
    pub fingerprint: Option<String>,

    /// e.g. block_timestamp,asc
    #[arg(long)]
    pub order_by: Option<String>,

    /// Restrict to one token contract
    #[arg(long)]
    pub contract_address: Option<String>,
}

impl ListFilters {
    /// Query options for the given flags; unset flags stay unset
    pub fn to_options(&self) -> QueryOptions {
        QueryOptions {
            only_confirmed: self.only_confirmed,
            only_unconfirmed: self.only_unconfirmed,
            only_to: self.only_to,
            only_from: self.only_from,
            limit: self.limit,
            fingerprint: self.fingerprint.clone(),
            min_timestamp: self.min_timestamp,
            max_timestamp: self.max_timestamp,
            search_internal: self.search_internal,
            order_by: self.order_by.clone(),
            contract_address: self.contract_address.clone(),
        }
    }
}
