//! JSON-RPC wire types for Ethereum nodes

use crate::types::CallRequest;
use alloy_primitives::{Address, Bytes, U128, U256, U64};
use serde::{Deserialize, Serialize};

/// RPC request structure
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: serde_json::Value,
}

/// RPC response structure
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct RpcResponse<T> {
    pub jsonrpc: String,
    pub id: u64,
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
pub(crate) struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Execution reverted, as reported by geth-compatible nodes
const EXECUTION_REVERTED_CODE: i64 = 3;

impl RpcError {
    /// Revert reason when the node reports an execution revert.
    ///
    /// Prefers the decoded `Error(string)` payload from `data`, falling back to
    /// the node's message.
    pub fn revert_reason(&self) -> Option<String> {
        let reverted = self.code == EXECUTION_REVERTED_CODE
            || self.message.to_ascii_lowercase().contains("revert");
        if !reverted {
            return None;
        }

        let decoded = self
            .data
            .as_ref()
            .and_then(|data| data.as_str())
            .and_then(|data| hex::decode(data.trim_start_matches("0x")).ok())
            .and_then(|bytes| alloy_sol_types::decode_revert_reason(&bytes));

        Some(decoded.unwrap_or_else(|| self.message.clone()))
    }
}

/// Transaction object accepted by `eth_call`, `eth_estimateGas` and
/// `eth_sendTransaction`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RpcTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub to: Address,
    pub input: Bytes,
    pub value: U256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U64>,
}

impl From<&CallRequest> for RpcTransaction {
    fn from(request: &CallRequest) -> Self {
        Self {
            from: request.from,
            to: request.to,
            input: request.input.clone(),
            value: request.envelope.value,
            gas: request.envelope.gas_limit.map(U64::from),
            gas_price: request.envelope.gas_price.map(U128::from),
            nonce: request.envelope.nonce.map(U64::from),
        }
    }
}
