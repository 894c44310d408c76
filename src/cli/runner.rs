//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, ListFilters};
use crate::client::TronGridClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::pagination::Cursor;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Client configuration: file or environment, then command-line overrides
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
                serde_json::from_str(&text)?
            }
            None => ClientConfig::from_env()?,
        };

        if let Some(network) = self.cli.network {
            config.network = network;
        }
        if let Some(ref base_url) = self.cli.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(ref api_key) = self.cli.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(rps) = self.cli.rps {
            config.rate_limit = Some(RateLimiterConfig::new(rps, rps));
        }

        // The CLI stays inside the service quota unless told otherwise
        if self.cli.no_rate_limit {
            config.rate_limit = None;
        } else if config.rate_limit.is_none() {
            config.rate_limit = Some(config.tier_rate_limit());
        }

        Ok(config)
    }

    /// Run the CLI command
    pub async fn run(&self, ctx: &CancellationToken) -> Result<()> {
        let client = TronGridClient::new(self.client_config()?)?;

        match &self.cli.command {
            Commands::NowBlock => emit(&client.get_now_block(ctx).await?),
            Commands::Block { number } => emit(&client.get_block_by_number(ctx, *number).await?),
            Commands::Account { address } => emit(&client.get_account(ctx, address).await?),
            Commands::Balance {
                address,
                block_number,
                block_hash,
            } => emit(
                &client
                    .get_account_balance(ctx, address, *block_number, block_hash)
                    .await?,
            ),
            Commands::TxInfo { tx_id } => {
                emit(&client.get_transaction_info_by_id(ctx, tx_id).await?)
            }
            Commands::Txs { address, filters } => {
                let cursor = client.get_account_transactions(address, &filters.to_options())?;
                let count = drain(cursor, ctx, filters).await?;
                info!("Listed {} transactions for {}", count, address);
                Ok(())
            }
            Commands::Transfers {
                address,
                contract_type,
                filters,
            } => {
                let cursor =
                    client.get_contract_transactions(address, contract_type, &filters.to_options())?;
                let count = drain(cursor, ctx, filters).await?;
                info!("Listed {} {} transfers for {}", count, contract_type, address);
                Ok(())
            }
        }
    }
}

/// Print one record as a JSON line
fn emit<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Print every record of a listing, up to `--max-records`
async fn drain<T>(cursor: Cursor<T>, ctx: &CancellationToken, filters: &ListFilters) -> Result<usize>
where
    T: DeserializeOwned + Serialize + Clone,
{
    let mut stream = std::pin::pin!(cursor.into_stream(ctx.clone()));
    let mut count = 0;

    while filters.max_records.map_or(true, |max| count < max) {
        let Some(item) = stream.next().await else {
            break;
        };
        emit(&item?)?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn runner(args: &[&str]) -> Runner {
        Runner::new(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn test_rate_limit_follows_api_key_tier() {
        let config = runner(&["trongrid", "--api-key", "key-1", "now-block"])
            .client_config()
            .unwrap();
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::with_api_key()));
    }

    #[test]
    fn test_rate_limit_overrides() {
        let config = runner(&["trongrid", "--rps", "3", "now-block"])
            .client_config()
            .unwrap();
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(3, 3)));

        let config = runner(&["trongrid", "--no-rate-limit", "now-block"])
            .client_config()
            .unwrap();
        assert_eq!(config.rate_limit, None);
    }

    async fn listing_server(ids: &[&str], expected_requests: u64) -> MockServer {
        let mock_server = MockServer::start().await;
        let data: Vec<_> = ids.iter().map(|id| json!({"txID": id})).collect();

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": data, "success": true})),
            )
            .expect(expected_requests)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn filters(max_records: Option<usize>) -> ListFilters {
        ListFilters {
            max_records,
            ..ListFilters::default()
        }
    }

    #[tokio::test]
    async fn test_drain_zero_max_records_fetches_nothing() {
        let mock_server = listing_server(&["tx1"], 0).await;
        let client = TronGridClient::new(
            ClientConfig::builder().base_url(mock_server.uri()).build(),
        )
        .unwrap();
        let cursor = client
            .get_account_transactions("TAddr", &Default::default())
            .unwrap();

        let count = drain(cursor, &CancellationToken::new(), &filters(Some(0)))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_drain_stops_at_max_records() {
        let mock_server = listing_server(&["tx1", "tx2", "tx3"], 2).await;
        let client = TronGridClient::new(
            ClientConfig::builder().base_url(mock_server.uri()).build(),
        )
        .unwrap();

        let cursor = client
            .get_account_transactions("TAddr", &Default::default())
            .unwrap();
        let count = drain(cursor, &CancellationToken::new(), &filters(Some(2)))
            .await
            .unwrap();
        assert_eq!(count, 2);

        let cursor = client
            .get_account_transactions("TAddr", &Default::default())
            .unwrap();
        let count = drain(cursor, &CancellationToken::new(), &filters(None))
            .await
            .unwrap();
        assert_eq!(count, 3);
    }
}
