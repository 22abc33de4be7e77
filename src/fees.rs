//! Gas estimation and advisory gas pricing
//!
//! Estimates are point-in-time observations of the network and are never
//! cached. `total_cost` is always the exact product `gas_limit × gas_price`.
//!
//! Advisory tiers are derived from the current network price:
//! - slow: 90% of the network price
//! - average: the network price
//! - fast: 120% of the network price
//!
//! Tier arithmetic is integer-only with truncating division.

use crate::client::LedgerClient;
use crate::error::{Error, Result};
use crate::types::{CallRequest, GasEstimation, GasPriceTiers};
use alloy_primitives::U256;
use std::sync::Arc;
use tracing::debug;

/// Tier multipliers, in percent of the network price
const SLOW_PERCENT: u64 = 90;
const AVERAGE_PERCENT: u64 = 100;
const FAST_PERCENT: u64 = 120;

/// Scale a gas price by a percentage, truncating towards zero
fn scale_price(price: u128, percent: u64) -> u128 {
    let scaled = U256::from(price) * U256::from(percent) / U256::from(100u64);
    u128::try_from(scaled).unwrap_or(u128::MAX)
}

/// Derive slow/average/fast tiers from a network gas price
///
/// # Example
/// ```
/// use multisend_sdk::fees::gas_price_tiers;
///
/// let tiers = gas_price_tiers(1_000);
/// assert_eq!(tiers.slow, 900);
/// assert_eq!(tiers.average, 1_000);
/// assert_eq!(tiers.fast, 1_200);
/// ```
pub fn gas_price_tiers(network_price: u128) -> GasPriceTiers {
    GasPriceTiers {
        slow: scale_price(network_price, SLOW_PERCENT),
        average: scale_price(network_price, AVERAGE_PERCENT),
        fast: scale_price(network_price, FAST_PERCENT),
    }
}

/// Simulates calls against the ledger and prices them
pub struct GasEstimator<C: ?Sized> {
    ledger: Arc<C>,
}

impl<C: ?Sized> Clone for GasEstimator<C> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<C: LedgerClient + ?Sized> GasEstimator<C> {
    pub fn new(ledger: Arc<C>) -> Self {
        Self { ledger }
    }

    /// Estimate the cost of `request`, a call to the contract entry point `method`.
    ///
    /// The gas price attached to the request's envelope is used when present;
    /// otherwise the live network price is queried. A simulation the node
    /// rejects (a revert, or a node error such as insufficient funds) fails
    /// with [`Error::EstimationFailed`] carrying the node's reason. Connection
    /// failures pass through unchanged.
    pub async fn estimate(&self, method: &'static str, request: CallRequest) -> Result<GasEstimation> {
        let price_override = request.envelope.gas_price;

        let mut simulation = request;
        simulation.envelope.gas_limit = None;
        simulation.envelope.gas_price = None;

        let gas_limit = self
            .ledger
            .estimate_gas(simulation)
            .await
            .map_err(|e| match e {
                Error::Reverted(reason) => Error::EstimationFailed { method, reason },
                Error::Rpc { message, .. } => Error::EstimationFailed {
                    method,
                    reason: message,
                },
                other => other,
            })?;

        let gas_price = match price_override {
            Some(price) => price,
            None => self.ledger.gas_price().await?,
        };

        let estimation = GasEstimation::new(gas_limit, gas_price);
        debug!(
            method,
            gas_limit,
            gas_price,
            total_cost = %estimation.total_cost,
            "gas estimated"
        );
        Ok(estimation)
    }

    /// Advisory slow/average/fast prices from the current network price
    pub async fn price_tiers(&self) -> Result<GasPriceTiers> {
        let price = self.ledger.gas_price().await?;
        Ok(gas_price_tiers(price))
    }
}
