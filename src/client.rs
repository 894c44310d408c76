//! TronGrid client
//!
//! Every endpoint goes through the same path: wait on the rate limiter,
//! dispatch through the shared [`Dispatcher`], decode the JSON body.
//! Listing endpoints return a [`Cursor`] instead and do no I/O up front.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{admit, Dispatcher, RateLimit, RateLimiter};
use crate::models::{
    Account, AccountBalance, Block, BroadcastHexRequest, BroadcastHexResponse,
    ContractTransaction, Transaction, TransactionInfo, TriggerConstantContractRequest,
    TriggerConstantContractResponse,
};
use crate::pagination::{rejected, rejection_from_status, Cursor, Page, PageFetcher, QueryOptions};
use crate::types::{JsonValue, Method};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

/// Async client for the TronGrid REST API
///
/// Cloning is cheap; clones share the connection pool and rate limiter.
#[derive(Clone)]
pub struct TronGridClient {
    config: Arc<ClientConfig>,
    dispatcher: Arc<Dispatcher>,
    limiter: Option<Arc<dyn RateLimit>>,
}

impl TronGridClient {
    /// Create a client from a validated configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let dispatcher = Dispatcher::new(&config)?;
        Ok(Self::from_parts(config, dispatcher))
    }

    /// Create a client that sends requests through a caller-built `reqwest::Client`
    ///
    /// Proxy, TLS, pool, timeout and user agent come from `http`; `config`
    /// still supplies the base URL, API key and rate limit.
    pub fn with_http_client(config: ClientConfig, http: reqwest::Client) -> Result<Self> {
        config.validate()?;
        let dispatcher = Dispatcher::with_client(http, &config)?;
        Ok(Self::from_parts(config, dispatcher))
    }

    fn from_parts(config: ClientConfig, dispatcher: Dispatcher) -> Self {
        let limiter = config
            .rate_limit
            .as_ref()
            .map(|c| Arc::new(RateLimiter::new(c)) as Arc<dyn RateLimit>);

        debug!(
            "TronGrid client for {} (api_key={}, rate_limited={})",
            config.resolved_base_url(),
            config.api_key.is_some(),
            limiter.is_some()
        );

        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
            limiter,
        }
    }

    /// Client for mainnet with default settings
    pub fn mainnet() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Replace the rate limiter with a caller-provided one
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimit>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL all requests are sent to
    pub fn base_url(&self) -> &str {
        self.config.resolved_base_url()
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.limiter.is_some()
    }

    // ========================================================================
    // Single-shot endpoints
    // ========================================================================

    /// Latest block
    pub async fn get_now_block(&self, ctx: &CancellationToken) -> Result<Block> {
        let block: Block = self
            .call(ctx, Method::POST, "/wallet/getnowblock", None)
            .await?;

        if block.number().is_none() {
            return Err(Error::no_data("block without header"));
        }

        Ok(block)
    }

    /// Block at `number`
    pub async fn get_block_by_number(&self, ctx: &CancellationToken, number: u64) -> Result<Block> {
        self.call(
            ctx,
            Method::POST,
            "/wallet/getblockbynum",
            Some(json!({ "num": number })),
        )
        .await
    }

    /// Account details
    pub async fn get_account(&self, ctx: &CancellationToken, address: &str) -> Result<Account> {
        let url = self.endpoint_url(&["v1", "accounts", address])?;
        let page: Page<Account> = self
            .call_url(ctx, Method::GET, url.as_str(), None)
            .await
            .map_err(rejection_from_status)?;

        if !page.success {
            return Err(rejected(page.error));
        }

        page.data
            .into_iter()
            .next()
            .ok_or_else(|| Error::no_data(format!("account {address}")))
    }

    /// Balance of `address` at a given block
    pub async fn get_account_balance(
        &self,
        ctx: &CancellationToken,
        address: &str,
        block_number: u64,
        block_hash: &str,
    ) -> Result<AccountBalance> {
        let body = json!({
            "account_identifier": { "address": address },
            "block_identifier": { "number": block_number, "hash": block_hash },
            "visible": true,
        });

        self.call(ctx, Method::POST, "/wallet/getaccountbalance", Some(body))
            .await
    }

    /// Execution info of a transaction
    pub async fn get_transaction_info_by_id(
        &self,
        ctx: &CancellationToken,
        tx_id: &str,
    ) -> Result<TransactionInfo> {
        self.call(
            ctx,
            Method::POST,
            "/wallet/gettransactioninfobyid",
            Some(json!({ "value": tx_id })),
        )
        .await
    }

    /// Run a read-only contract call
    pub async fn trigger_constant_contract(
        &self,
        ctx: &CancellationToken,
        req: &TriggerConstantContractRequest,
    ) -> Result<TriggerConstantContractResponse> {
        let body = serde_json::to_value(req)?;
        self.call(ctx, Method::POST, "/wallet/triggerconstantcontract", Some(body))
            .await
    }

    /// Broadcast a signed transaction
    pub async fn broadcast_hex(
        &self,
        ctx: &CancellationToken,
        req: &BroadcastHexRequest,
    ) -> Result<BroadcastHexResponse> {
        let body = serde_json::to_value(req)?;
        self.call(ctx, Method::POST, "/wallet/broadcasthex", Some(body))
            .await
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// Transactions of an account
    pub fn get_account_transactions(
        &self,
        address: &str,
        options: &QueryOptions,
    ) -> Result<Cursor<Transaction>> {
        let url = self.listing_url(&["v1", "accounts", address, "transactions"], options)?;
        Ok(Cursor::new(self.page_fetcher(), url))
    }

    /// Token transfers of an account, `contract_type` is e.g. `trc20`
    pub fn get_contract_transactions(
        &self,
        address: &str,
        contract_type: &str,
        options: &QueryOptions,
    ) -> Result<Cursor<ContractTransaction>> {
        let url = self.listing_url(
            &["v1", "accounts", address, "transactions", contract_type],
            options,
        )?;
        Ok(Cursor::new(self.page_fetcher(), url))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn call<R: DeserializeOwned>(
        &self,
        ctx: &CancellationToken,
        method: Method,
        path: &str,
        body: Option<JsonValue>,
    ) -> Result<R> {
        let url = format!("{}{}", self.base_url(), path);
        self.call_url(ctx, method, &url, body).await
    }

    async fn call_url<R: DeserializeOwned>(
        &self,
        ctx: &CancellationToken,
        method: Method,
        url: &str,
        body: Option<JsonValue>,
    ) -> Result<R> {
        admit(self.limiter.as_deref(), ctx).await?;

        let bytes = self
            .dispatcher
            .execute(ctx, method, url, body.as_ref())
            .await?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn page_fetcher(&self) -> PageFetcher {
        PageFetcher::new(self.dispatcher.clone(), self.limiter.clone())
    }

    /// Base URL extended with percent-encoded path segments
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(self.base_url())?;
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("base URL '{}' cannot carry a path", self.base_url())))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn listing_url(&self, segments: &[&str], options: &QueryOptions) -> Result<String> {
        let mut url = self.endpoint_url(segments)?;
        options.apply_to(&mut url);
        Ok(url.into())
    }
}

impl std::fmt::Debug for TronGridClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TronGridClient")
            .field("base_url", &self.base_url())
            .field("dispatcher", &self.dispatcher)
            .field("has_rate_limiter", &self.limiter.is_some())
            .finish()
    }
}
