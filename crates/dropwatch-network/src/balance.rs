// ERC-20 balance reads over JSON-RPC.
//
// Each read is a single `eth_call` of `balanceOf(address)` against the
// `latest` block. No retry: a failed read is reported once and the caller
// decides whether to refresh again.

use crate::error::ReadError;
use async_trait::async_trait;
use dropwatch_core::{Address, BalanceQuery, TokenAmount};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// `keccak256("balanceOf(address)")[..4]`
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

#[async_trait]
pub trait BalanceReader: Send + Sync {
    /// Current token balance for one query.
    async fn balance_of(&self, query: &BalanceQuery) -> Result<TokenAmount, ReadError>;
}

/// Call data for `balanceOf(holder)`: selector followed by one ABI word.
pub fn encode_balance_of(holder: &Address) -> String {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&BALANCE_OF_SELECTOR);
    data.extend_from_slice(&holder.to_abi_word());
    format!("0x{}", hex::encode(data))
}

/// Decode the first 32-byte word of an `eth_call` result as a `uint256`.
pub fn decode_uint256(result: &str) -> Result<TokenAmount, ReadError> {
    let body = result
        .strip_prefix("0x")
        .ok_or_else(|| ReadError::Malformed(format!("result '{}' is not 0x-prefixed", result)))?;
    if body.is_empty() {
        return Err(ReadError::EmptyResult);
    }
    let bytes = hex::decode(body)
        .map_err(|e| ReadError::Malformed(format!("result is not hex: {}", e)))?;
    if bytes.len() < 32 {
        return Err(ReadError::Malformed(format!(
            "result is {} bytes, expected 32",
            bytes.len()
        )));
    }

    let word = &bytes[..32];
    if word[..16].iter().any(|b| *b != 0) {
        return Err(ReadError::Overflow);
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(TokenAmount::from_units(u128::from_be_bytes(low)))
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Reads balances from any Ethereum-compatible JSON-RPC endpoint.
pub struct JsonRpcBalanceReader {
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcBalanceReader {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl BalanceReader for JsonRpcBalanceReader {
    async fn balance_of(&self, query: &BalanceQuery) -> Result<TokenAmount, ReadError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "eth_call",
            "params": [
                {
                    "to": query.token.to_string(),
                    "data": encode_balance_of(&query.holder),
                },
                "latest"
            ]
        });

        debug!(
            kind = %query.kind,
            network = %query.network,
            token = %query.token,
            holder = %query.holder,
            "eth_call balanceOf"
        );

        let response = self
            .client
            .post(&query.endpoint)
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ReadError::Status(response.status().as_u16()));
        }

        let text = response.text().await?;
        let parsed: RpcResponse = serde_json::from_str(&text)?;
        if let Some(err) = parsed.error {
            return Err(ReadError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        let result = parsed
            .result
            .ok_or_else(|| ReadError::MissingField("result".to_string()))?;
        decode_uint256(&result)
    }
}
