use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Error types for the Multisend SDK
#[derive(Error, Debug)]
pub enum Error {
    #[error("Recipient set for {variant} batch is empty")]
    EmptyRecipientSet { variant: &'static str },

    #[error("Operation requires a signing account but none is attached")]
    NoSignerAttached,

    #[error("Invalid amount {value:?}: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("Invalid address {0:?}")]
    InvalidAddress(String),

    #[error(
        "Insufficient allowance for token {token}: {spender} may spend {current} from {owner}, \
         but the batch requires {required}; approve at least {required} before sending"
    )]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        required: U256,
        current: U256,
    },

    #[error("Gas estimation for {method} failed: {reason}")]
    EstimationFailed { method: &'static str, reason: String },

    #[error("Execution reverted: {0}")]
    Reverted(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("ABI error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// Whether the error came from the ledger transport rather than local validation.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Rpc { .. })
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Error>;
