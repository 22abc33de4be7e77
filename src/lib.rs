//! # Multisend SDK
//!
//! A Rust SDK for batched native-coin and token transfers through a
//! multi-send contract.
//!
//! This SDK provides high-level abstractions for:
//! - Batch assembly for the six contract entry points
//! - Pre-flight validation (empty batches, malformed amounts, allowances)
//! - Gas estimation and advisory gas pricing
//! - Token approval and metadata helpers
//!
//! ## Features
//!
//! - **Batch Assembly**: One [`BatchRequest`] type covers ETH, token and mixed
//!   batches with variable or equal amounts
//! - **Allowance Checks**: Token batches are checked against the signer's
//!   allowance before anything is submitted
//! - **Gas Estimation**: Estimate any batch without a signer attached
//! - **RPC Client**: Talk to any Ethereum JSON-RPC node, or bring your own
//!   [`client::LedgerClient`]
//!
//! ## Example
//!
//! ```no_run
//! use multisend_sdk::transaction::MultiSend;
//! use multisend_sdk::{Recipient, SdkConfig, TxOptions};
//! use alloy_primitives::address;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SdkConfig::new(
//!     "http://localhost:8545",
//!     address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
//! );
//! let multisend = MultiSend::from_config(config)?;
//!
//! let recipients = vec![
//!     Recipient::new(address!("70997970C51812dc3A010C7d01b50e0d17dc79C8"), 100u64),
//!     Recipient::new(address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"), "200"),
//! ];
//!
//! // Estimate without a signer
//! let estimate = multisend
//!     .estimate_eth_variable(recipients.clone(), TxOptions::default())
//!     .await?;
//! println!("total cost: {} wei", estimate.total_cost);
//!
//! // Attach the node's first account and send
//! let connected = multisend.connect_default().await?;
//! let tx = connected
//!     .send_eth_variable(recipients, TxOptions::default())
//!     .await?;
//! println!("submitted {tx}");
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod allowance;
pub mod amounts;
pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod fees;
pub mod rpc;
pub mod token;
pub mod transaction;
pub mod types;

pub use error::{Error, Result};

/// Re-export commonly used types
pub use types::*;

pub use config::SdkConfig;

/// Re-export the batch handles
pub use transaction::{prepare_batch, ConnectedMultiSend, MultiSend, PreparedBatch};

/// Re-export fee helpers
pub use fees::{gas_price_tiers, GasEstimator};
