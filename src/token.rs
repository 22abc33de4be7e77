//! Fungible-token helper: allowance, approval and metadata queries
//!
//! Decimal formatting lives here rather than in the batch engine, which only
//! ever handles amounts in the token's minimal unit.

use crate::client::LedgerClient;
use crate::error::{Error, Result};
use crate::types::{CallRequest, TransactionEnvelope};
use alloy_primitives::utils::{format_units, parse_units, ParseUnits};
use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

sol! {
    #[derive(Debug)]
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

/// Token operations consumed by the batch engine
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenClient: Send + Sync {
    /// Amount `spender` may currently move on behalf of `owner`
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Submit an `approve(spender, amount)` transaction signed by `from`
    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        from: Address,
        envelope: TransactionEnvelope,
    ) -> Result<TxHash>;

    async fn balance_of(&self, token: Address, account: Address) -> Result<U256>;

    async fn decimals(&self, token: Address) -> Result<u8>;

    async fn symbol(&self, token: Address) -> Result<String>;
}

/// ERC-20 implementation of [`TokenClient`] on top of any ledger client
pub struct Erc20Client<C> {
    ledger: Arc<C>,
}

impl<C: LedgerClient> Erc20Client<C> {
    pub fn new(ledger: Arc<C>) -> Self {
        Self { ledger }
    }

    async fn view<T>(&self, token: Address, call: T) -> Result<T::Return>
    where
        T: SolCall + Send,
        T::Return: Send,
    {
        let request = CallRequest {
            from: None,
            to: token,
            input: call.abi_encode().into(),
            envelope: TransactionEnvelope::default(),
        };
        let output = self.ledger.call(request).await?;
        Ok(T::abi_decode_returns(&output)?)
    }
}

#[async_trait]
impl<C: LedgerClient> TokenClient for Erc20Client<C> {
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        self.view(token, IERC20::allowanceCall { owner, spender })
            .await
    }

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
        from: Address,
        envelope: TransactionEnvelope,
    ) -> Result<TxHash> {
        debug!(%token, %spender, %amount, "submitting token approval");
        let request = CallRequest {
            from: Some(from),
            to: token,
            input: IERC20::approveCall { spender, amount }.abi_encode().into(),
            envelope: TransactionEnvelope {
                value: U256::ZERO,
                ..envelope
            },
        };
        self.ledger.send_transaction(request).await
    }

    async fn balance_of(&self, token: Address, account: Address) -> Result<U256> {
        self.view(token, IERC20::balanceOfCall { account }).await
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        self.view(token, IERC20::decimalsCall {}).await
    }

    async fn symbol(&self, token: Address) -> Result<String> {
        self.view(token, IERC20::symbolCall {}).await
    }
}

/// Render a minimal-unit amount as a decimal string using `decimals` places
pub fn format_amount(value: U256, decimals: u8) -> Result<String> {
    format_units(value, decimals).map_err(|e| Error::InvalidAmount {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a decimal string into the token's minimal unit.
///
/// Negative input is rejected.
pub fn parse_amount(text: &str, decimals: u8) -> Result<U256> {
    let invalid = |reason: String| Error::InvalidAmount {
        value: text.to_string(),
        reason,
    };
    match parse_units(text, decimals).map_err(|e| invalid(e.to_string()))? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(invalid("amount must not be negative".to_string())),
    }
}
