//! Spending-allowance preconditions for token batches

use crate::error::{Error, Result};
use crate::token::TokenClient;
use crate::types::AllowanceStatus;
use alloy_primitives::{Address, U256};
use std::sync::Arc;
use tracing::{debug, warn};

/// Compares on-chain allowances against aggregated batch requirements.
///
/// The guard never approves on its own; an insufficient allowance is reported
/// with the exact amount the caller has to approve.
#[derive(Clone)]
pub struct AllowanceGuard {
    tokens: Arc<dyn TokenClient>,
}

impl AllowanceGuard {
    pub fn new(tokens: Arc<dyn TokenClient>) -> Self {
        Self { tokens }
    }

    /// Query the allowance and compare it with `required`
    pub async fn status(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        required: U256,
    ) -> Result<AllowanceStatus> {
        let current = self.tokens.allowance(token, owner, spender).await?;
        let sufficient = current >= required;
        debug!(%token, %owner, %current, %required, sufficient, "allowance checked");
        Ok(AllowanceStatus {
            current,
            required,
            sufficient,
        })
    }

    /// Whether `spender` may move at least `required` of `token` from `owner`
    pub async fn check_sufficient(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        required: U256,
    ) -> Result<bool> {
        Ok(self.status(token, owner, spender, required).await?.sufficient)
    }

    /// Fail with [`Error::InsufficientAllowance`] unless the allowance covers `required`
    pub async fn ensure(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        required: U256,
    ) -> Result<()> {
        let status = self.status(token, owner, spender, required).await?;
        if status.sufficient {
            return Ok(());
        }
        warn!(%token, %owner, current = %status.current, %required, "insufficient allowance");
        Err(Error::InsufficientAllowance {
            token,
            owner,
            spender,
            required,
            current: status.current,
        })
    }
}
