//! TronGrid request and response records
//!
//! Records tolerate missing fields (they default) and ignore unknown ones,
//! since TronGrid omits zero values. Rarely used nested objects are kept as
//! raw JSON.

use crate::types::JsonValue;
use serde::{Deserialize, Serialize};

// ============================================================================
// Blocks
// ============================================================================

/// A block as returned by `/wallet/getnowblock` and `/wallet/getblockbynum`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    #[serde(rename = "blockID")]
    pub block_id: String,
    pub block_header: Option<BlockHeader>,
    pub transactions: Vec<JsonValue>,
}

impl Block {
    /// Block height, if the header was present
    pub fn number(&self) -> Option<u64> {
        self.block_header
            .as_ref()
            .and_then(|h| h.raw_data.as_ref())
            .map(|raw| raw.number)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockHeader {
    pub raw_data: Option<BlockHeaderRawData>,
    pub witness_signature: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockHeaderRawData {
    pub number: u64,
    #[serde(rename = "txTrieRoot")]
    pub tx_trie_root: String,
    pub witness_address: String,
    #[serde(rename = "parentHash")]
    pub parent_hash: String,
    pub version: i32,
    pub timestamp: i64,
}

// ============================================================================
// Accounts
// ============================================================================

/// An account from `/v1/accounts/{address}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub address: String,
    /// Balance in sun
    pub balance: i64,
    pub create_time: i64,
    /// Spelling follows the service
    pub latest_opration_time: i64,
    pub free_net_usage: i64,
    pub latest_consume_free_time: i64,
    pub net_window_size: i64,
    pub net_window_optimized: bool,
    pub account_resource: JsonValue,
    pub owner_permission: Option<Permission>,
    pub active_permission: Vec<Permission>,
    #[serde(rename = "frozenV2")]
    pub frozen_v2: Vec<JsonValue>,
    #[serde(rename = "unfrozenV2")]
    pub unfrozen_v2: Vec<JsonValue>,
    /// TRC-20 balances, one `{contract: amount}` map per token
    pub trc20: Vec<std::collections::HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permission {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<i64>,
    pub permission_name: String,
    pub threshold: i64,
    pub operations: Option<String>,
    pub keys: Vec<PermissionKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionKey {
    pub address: String,
    pub weight: i64,
}

/// Result of `/wallet/getaccountbalance`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountBalance {
    pub balance: u64,
    pub block_identifier: BlockIdentifier,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockIdentifier {
    pub hash: String,
    pub number: u64,
}

// ============================================================================
// Transactions
// ============================================================================

/// A transaction from `/v1/accounts/{address}/transactions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    #[serde(rename = "txID")]
    pub tx_id: String,
    #[serde(rename = "blockNumber")]
    pub block_number: u64,
    pub block_timestamp: i64,
    pub ret: Vec<JsonValue>,
    pub signature: Vec<String>,
    pub raw_data_hex: String,
    pub raw_data: JsonValue,
    pub energy_fee: i64,
    pub energy_usage: i64,
    pub energy_usage_total: i64,
    pub net_fee: i64,
    pub net_usage: i64,
    pub internal_transactions: Vec<JsonValue>,
}

/// A token transfer from `/v1/accounts/{address}/transactions/{type}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractTransaction {
    pub transaction_id: String,
    pub token_info: Option<TokenInfo>,
    pub block_timestamp: i64,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Raw integer amount, not scaled by `decimals`
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenInfo {
    pub symbol: String,
    pub address: String,
    pub decimals: u32,
    pub name: String,
}

/// Result of `/wallet/gettransactioninfobyid`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionInfo {
    pub id: String,
    pub fee: i64,
    #[serde(rename = "blockNumber")]
    pub block_number: u64,
    #[serde(rename = "blockTimeStamp")]
    pub block_timestamp: i64,
    #[serde(rename = "contractResult")]
    pub contract_result: Vec<String>,
    pub receipt: Receipt,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Receipt {
    pub energy_usage: i64,
    pub energy_fee: i64,
    pub origin_energy_usage: i64,
    pub energy_usage_total: i64,
    pub net_usage: i64,
    pub net_fee: i64,
    pub result: String,
    pub energy_penalty_total: i64,
}

// ============================================================================
// Contract calls and broadcast
// ============================================================================

/// Body of `/wallet/triggerconstantcontract`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerConstantContractRequest {
    pub owner_address: String,
    pub contract_address: String,
    /// e.g. `balanceOf(address)`
    pub function_selector: String,
    /// ABI-encoded arguments, hex
    pub parameter: String,
    /// Addresses are base58 when true, hex otherwise
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConstantContractResponse {
    pub result: TriggerResult,
    pub energy_used: i64,
    pub constant_result: Vec<String>,
    pub energy_penalty: i64,
    pub transaction: JsonValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerResult {
    pub result: bool,
    pub message: String,
}

/// Body of `/wallet/broadcasthex`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BroadcastHexRequest {
    /// Signed transaction, protobuf-encoded hex
    pub transaction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastHexResponse {
    pub result: bool,
    pub code: String,
    pub txid: String,
    pub message: String,
    pub transaction: String,
}
