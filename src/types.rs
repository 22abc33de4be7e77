//! Common types and data structures for the Multisend SDK

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// An amount in the asset's smallest unit, as supplied by the caller.
///
/// Amounts are kept in their input form until aggregation so that malformed
/// values surface as [`crate::Error::InvalidAmount`] at a single place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Units(u64),
    Text(String),
    Exact(U256),
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::Units(value)
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Amount::Exact(value)
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Amount::Text(value)
    }
}

/// A single recipient of a variable-amount batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub address: Address,
    pub amount: Amount,
}

impl Recipient {
    pub fn new(address: Address, amount: impl Into<Amount>) -> Self {
        Self {
            address,
            amount: amount.into(),
        }
    }
}

/// A recipient receiving both a token amount and a native-coin amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedRecipient {
    pub address: Address,
    pub token_amount: Amount,
    pub eth_amount: Amount,
}

impl MixedRecipient {
    pub fn new(
        address: Address,
        token_amount: impl Into<Amount>,
        eth_amount: impl Into<Amount>,
    ) -> Self {
        Self {
            address,
            token_amount: token_amount.into(),
            eth_amount: eth_amount.into(),
        }
    }
}

/// The six batch shapes understood by the multi-send contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchRequest {
    EthVariable {
        recipients: Vec<Recipient>,
    },
    EthEqual {
        addresses: Vec<Address>,
        amount: Amount,
    },
    TokenVariable {
        token: Address,
        recipients: Vec<Recipient>,
    },
    TokenEqual {
        token: Address,
        addresses: Vec<Address>,
        amount: Amount,
    },
    MixedVariable {
        token: Address,
        recipients: Vec<MixedRecipient>,
    },
    MixedEqual {
        token: Address,
        addresses: Vec<Address>,
        token_amount: Amount,
        eth_amount: Amount,
    },
}

impl BatchRequest {
    /// Short name of the batch shape, used in errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BatchRequest::EthVariable { .. } => "eth_variable",
            BatchRequest::EthEqual { .. } => "eth_equal",
            BatchRequest::TokenVariable { .. } => "token_variable",
            BatchRequest::TokenEqual { .. } => "token_equal",
            BatchRequest::MixedVariable { .. } => "mixed_variable",
            BatchRequest::MixedEqual { .. } => "mixed_equal",
        }
    }

    /// Number of recipients in the batch
    pub fn recipient_count(&self) -> usize {
        match self {
            BatchRequest::EthVariable { recipients }
            | BatchRequest::TokenVariable { recipients, .. } => recipients.len(),
            BatchRequest::MixedVariable { recipients, .. } => recipients.len(),
            BatchRequest::EthEqual { addresses, .. }
            | BatchRequest::TokenEqual { addresses, .. }
            | BatchRequest::MixedEqual { addresses, .. } => addresses.len(),
        }
    }

    /// The token moved by this batch, if any
    pub fn token(&self) -> Option<Address> {
        match self {
            BatchRequest::EthVariable { .. } | BatchRequest::EthEqual { .. } => None,
            BatchRequest::TokenVariable { token, .. }
            | BatchRequest::TokenEqual { token, .. }
            | BatchRequest::MixedVariable { token, .. }
            | BatchRequest::MixedEqual { token, .. } => Some(*token),
        }
    }
}

/// Per-call overrides accepted by every send and estimate operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOptions {
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    pub nonce: Option<u64>,
}

impl TxOptions {
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }
}

/// Value and gas parameters attached to a contract call.
///
/// `value` is always derived from the aggregated batch amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
    pub value: U256,
    pub nonce: Option<u64>,
}

/// A fully assembled call against the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub input: Bytes,
    pub envelope: TransactionEnvelope,
}

/// Gas cost estimate for a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasEstimation {
    pub gas_limit: u64,
    pub gas_price: u128,
    pub total_cost: U256,
}

impl GasEstimation {
    pub fn new(gas_limit: u64, gas_price: u128) -> Self {
        Self {
            gas_limit,
            gas_price,
            total_cost: U256::from(gas_limit) * U256::from(gas_price),
        }
    }
}

/// Advisory gas prices derived from the current network price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPriceTiers {
    pub slow: u128,
    pub average: u128,
    pub fast: u128,
}

/// Result of comparing an on-chain allowance with a batch requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceStatus {
    pub current: U256,
    pub required: U256,
    pub sufficient: bool,
}

/// Display metadata of a fungible token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}
