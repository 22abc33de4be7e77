//! Client implementations for connecting to EVM ledgers
use crate::error::{Error, Result};
use crate::rpc::{RpcRequest, RpcResponse, RpcTransaction};
use crate::types::CallRequest;
use alloy_primitives::{Address, Bytes, TxHash, U128, U256, U64};
use async_trait::async_trait;
use rand::random;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Capabilities the SDK consumes from the underlying ledger client.
///
/// Signing, nonce management and broadcasting are the implementor's concern.
/// Implementations must report execution reverts as [`Error::Reverted`] and
/// other node rejections as [`Error::Rpc`]; connection failures belong in
/// [`Error::Network`] so estimation can tell them apart.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Accounts the client can sign for
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Chain id of the connected network
    async fn chain_id(&self) -> Result<u64>;

    /// Native-coin balance of an account
    async fn get_balance(&self, address: Address) -> Result<U256>;

    /// Execute a read-only call and return its raw output
    async fn call(&self, request: CallRequest) -> Result<Bytes>;

    /// Simulate a call and return the gas it would use
    async fn estimate_gas(&self, request: CallRequest) -> Result<u64>;

    /// Submit a state-changing call
    async fn send_transaction(&self, request: CallRequest) -> Result<TxHash>;

    /// Current network gas price in wei
    async fn gas_price(&self) -> Result<u128>;
}

/// JSON-RPC client for Ethereum-compatible nodes.
///
/// Transactions are submitted with `eth_sendTransaction`, so the `from`
/// account must be managed (unlocked) by the node or by a signing proxy in
/// front of it.
pub struct RpcClient {
    endpoint: String,
    http: reqwest::Client,
    auth: Option<String>,
}

impl RpcClient {
    /// Create a new RPC client without authentication.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
            auth: None,
        }
    }

    /// Create a new RPC client with HTTP basic authentication.
    pub fn with_auth(endpoint: impl Into<String>, username: String, password: String) -> Self {
        use base64::Engine;
        let mut client = Self::new(endpoint);
        let credentials = format!("{}:{}", username, password);
        client.auth = Some(base64::engine::general_purpose::STANDARD.encode(credentials));
        client
    }

    /// Endpoint this client talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call a JSON-RPC method and deserialize the result into the requested type.
    ///
    /// Node errors that describe an execution revert are returned as
    /// [`Error::Reverted`]; all other node errors become [`Error::Rpc`].
    pub async fn request<T, P>(&self, method: &str, params: P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let params = serde_json::to_value(params)?;
        let request = RpcRequest {
            jsonrpc: "2.0".to_string(),
            id: random::<u64>(),
            method: method.to_string(),
            params,
        };

        debug!(method, "sending rpc request");

        let mut req = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .header("Content-Type", "application/json");

        if let Some(ref auth) = self.auth {
            req = req.header("Authorization", format!("Basic {}", auth));
        }

        // HTTP-level failures stay transport errors, distinct from node errors
        let response = req.send().await?.error_for_status()?;

        let rpc_response: RpcResponse<T> = response.json().await?;

        if let Some(error) = rpc_response.error {
            if let Some(reason) = error.revert_reason() {
                return Err(Error::Reverted(reason));
            }
            return Err(Error::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        rpc_response.result.ok_or_else(|| Error::Rpc {
            code: 0,
            message: "RPC response missing result".to_string(),
        })
    }
}

#[async_trait]
impl LedgerClient for RpcClient {
    async fn accounts(&self) -> Result<Vec<Address>> {
        self.request("eth_accounts", serde_json::json!([])).await
    }

    async fn chain_id(&self) -> Result<u64> {
        let id: U64 = self.request("eth_chainId", serde_json::json!([])).await?;
        Ok(id.to::<u64>())
    }

    async fn get_balance(&self, address: Address) -> Result<U256> {
        self.request("eth_getBalance", serde_json::json!([address, "latest"]))
            .await
    }

    async fn call(&self, request: CallRequest) -> Result<Bytes> {
        let tx = RpcTransaction::from(&request);
        self.request("eth_call", serde_json::json!([tx, "latest"]))
            .await
    }

    async fn estimate_gas(&self, request: CallRequest) -> Result<u64> {
        let tx = RpcTransaction::from(&request);
        let gas: U64 = self
            .request("eth_estimateGas", serde_json::json!([tx]))
            .await?;
        Ok(gas.to::<u64>())
    }

    async fn send_transaction(&self, request: CallRequest) -> Result<TxHash> {
        let tx = RpcTransaction::from(&request);
        self.request("eth_sendTransaction", serde_json::json!([tx]))
            .await
    }

    async fn gas_price(&self) -> Result<u128> {
        let price: U128 = self.request("eth_gasPrice", serde_json::json!([])).await?;
        Ok(price.to::<u128>())
    }
}
