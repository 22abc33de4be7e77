//! Batch transaction assembly and submission
//!
//! Every operation follows the same pipeline: validate the batch shape,
//! aggregate amounts, check the token allowance where tokens are moved, build
//! the call envelope, then either submit the call or estimate its gas.
//!
//! Two handles split the capabilities:
//! - [`MultiSend`] is read-only and exposes estimation and query operations.
//! - [`ConnectedMultiSend`] carries a signing account and can submit batches.

use crate::allowance::AllowanceGuard;
use crate::amounts;
use crate::client::{LedgerClient, RpcClient};
use crate::config::SdkConfig;
use crate::contract::MultiSendCall;
use crate::error::{Error, Result};
use crate::fees::GasEstimator;
use crate::token::{Erc20Client, TokenClient};
use crate::types::{
    AllowanceStatus, Amount, BatchRequest, CallRequest, GasEstimation, GasPriceTiers,
    MixedRecipient, Recipient, TokenMetadata, TransactionEnvelope, TxOptions,
};
use alloy_primitives::{Address, TxHash, U256};
use std::sync::Arc;
use tracing::{debug, info};

/// Token amount a batch needs the contract to be allowed to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRequirement {
    pub token: Address,
    pub total: U256,
}

/// A validated batch ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBatch {
    pub call: MultiSendCall,
    /// Native coin attached to the call
    pub value: U256,
    pub token_requirement: Option<TokenRequirement>,
}

impl PreparedBatch {
    pub fn method(&self) -> &'static str {
        self.call.method()
    }
}

/// Validate a batch, aggregate its amounts and build the matching contract call.
///
/// Performs no I/O; every error raised here happens before any network access.
pub fn prepare_batch(request: &BatchRequest) -> Result<PreparedBatch> {
    if request.recipient_count() == 0 {
        return Err(Error::EmptyRecipientSet {
            variant: request.kind(),
        });
    }

    let prepared = match request {
        BatchRequest::EthVariable { recipients } => {
            let (addresses, values) = split_recipients(recipients)?;
            let total = amounts::sum(&values)?;
            PreparedBatch {
                call: MultiSendCall::MultiTransfer {
                    addresses,
                    amounts: values,
                },
                value: total,
                token_requirement: None,
            }
        }
        BatchRequest::EthEqual { addresses, amount } => {
            let amount = amounts::parse_amount(amount)?;
            let total = amounts::multiply(amount, addresses.len())?;
            PreparedBatch {
                call: MultiSendCall::MultiTransferEqual {
                    addresses: addresses.clone(),
                    amount,
                },
                value: total,
                token_requirement: None,
            }
        }
        BatchRequest::TokenVariable { token, recipients } => {
            let (addresses, values) = split_recipients(recipients)?;
            let total = amounts::sum(&values)?;
            PreparedBatch {
                call: MultiSendCall::MultiTransferToken {
                    token: *token,
                    addresses,
                    amounts: values,
                    total_amount: total,
                },
                value: U256::ZERO,
                token_requirement: Some(TokenRequirement {
                    token: *token,
                    total,
                }),
            }
        }
        BatchRequest::TokenEqual {
            token,
            addresses,
            amount,
        } => {
            let amount = amounts::parse_amount(amount)?;
            let total = amounts::multiply(amount, addresses.len())?;
            PreparedBatch {
                call: MultiSendCall::MultiTransferTokenEqual {
                    token: *token,
                    addresses: addresses.clone(),
                    amount,
                },
                value: U256::ZERO,
                token_requirement: Some(TokenRequirement {
                    token: *token,
                    total,
                }),
            }
        }
        BatchRequest::MixedVariable { token, recipients } => {
            let addresses = recipients.iter().map(|r| r.address).collect();
            let token_amounts = amounts::parse_amounts(recipients.iter().map(|r| &r.token_amount))?;
            let eth_amounts = amounts::parse_amounts(recipients.iter().map(|r| &r.eth_amount))?;
            let token_total = amounts::sum(&token_amounts)?;
            let eth_total = amounts::sum(&eth_amounts)?;
            PreparedBatch {
                call: MultiSendCall::MultiTransferTokenEther {
                    token: *token,
                    addresses,
                    token_amounts,
                    total_token_amount: token_total,
                    eth_amounts,
                },
                value: eth_total,
                token_requirement: Some(TokenRequirement {
                    token: *token,
                    total: token_total,
                }),
            }
        }
        BatchRequest::MixedEqual {
            token,
            addresses,
            token_amount,
            eth_amount,
        } => {
            let token_amount = amounts::parse_amount(token_amount)?;
            let eth_amount = amounts::parse_amount(eth_amount)?;
            let token_total = amounts::multiply(token_amount, addresses.len())?;
            let eth_total = amounts::multiply(eth_amount, addresses.len())?;
            PreparedBatch {
                call: MultiSendCall::MultiTransferTokenEtherEqual {
                    token: *token,
                    addresses: addresses.clone(),
                    token_amount,
                    eth_amount,
                },
                value: eth_total,
                token_requirement: Some(TokenRequirement {
                    token: *token,
                    total: token_total,
                }),
            }
        }
    };

    debug!(
        kind = request.kind(),
        method = prepared.method(),
        recipients = request.recipient_count(),
        value = %prepared.value,
        "batch prepared"
    );
    Ok(prepared)
}

/// Build the dedicated two-recipient native-coin transfer
pub fn prepare_send_to_two(
    recipient1: Address,
    amount1: &Amount,
    recipient2: Address,
    amount2: &Amount,
) -> Result<PreparedBatch> {
    let amount1 = amounts::parse_amount(amount1)?;
    let amount2 = amounts::parse_amount(amount2)?;
    let value = amount1
        .checked_add(amount2)
        .ok_or_else(|| Error::InvalidAmount {
            value: amount2.to_string(),
            reason: "transfer total overflows uint256".to_string(),
        })?;
    Ok(PreparedBatch {
        call: MultiSendCall::SendToTwo {
            recipient1,
            amount1,
            recipient2,
            amount2,
        },
        value,
        token_requirement: None,
    })
}

fn split_recipients(recipients: &[Recipient]) -> Result<(Vec<Address>, Vec<U256>)> {
    let addresses = recipients.iter().map(|r| r.address).collect();
    let values = amounts::parse_amounts(recipients.iter().map(|r| &r.amount))?;
    Ok((addresses, values))
}

/// Read-only handle on the multi-send contract.
///
/// Exposes estimation and query operations; call [`MultiSend::connect`] to
/// obtain a handle that can submit transactions.
pub struct MultiSend<C> {
    ledger: Arc<C>,
    tokens: Arc<dyn TokenClient>,
    allowances: AllowanceGuard,
    estimator: GasEstimator<C>,
    config: SdkConfig,
}

impl<C> Clone for MultiSend<C> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
            tokens: Arc::clone(&self.tokens),
            allowances: self.allowances.clone(),
            estimator: self.estimator.clone(),
            config: self.config.clone(),
        }
    }
}

impl MultiSend<RpcClient> {
    /// Build a handle backed by the bundled JSON-RPC client
    pub fn from_config(config: SdkConfig) -> Result<Self> {
        config.validate()?;
        let ledger = Arc::new(config.rpc_client());
        Ok(Self::new(ledger, config))
    }
}

impl<C: LedgerClient + 'static> MultiSend<C> {
    /// Build a handle around a pre-built ledger client.
    ///
    /// Token queries go through an [`Erc20Client`] on the same ledger unless
    /// replaced with [`MultiSend::with_token_client`].
    pub fn new(ledger: Arc<C>, config: SdkConfig) -> Self {
        let tokens: Arc<dyn TokenClient> = Arc::new(Erc20Client::new(Arc::clone(&ledger)));
        Self {
            allowances: AllowanceGuard::new(Arc::clone(&tokens)),
            estimator: GasEstimator::new(Arc::clone(&ledger)),
            ledger,
            tokens,
            config,
        }
    }
}

impl<C: LedgerClient> MultiSend<C> {
    /// Replace the token collaborator
    pub fn with_token_client(mut self, tokens: Arc<dyn TokenClient>) -> Self {
        self.allowances = AllowanceGuard::new(Arc::clone(&tokens));
        self.tokens = tokens;
        self
    }

    pub fn contract_address(&self) -> Address {
        self.config.contract_address
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Attach a signing account, producing a send-capable handle
    pub fn connect(&self, signer: Address) -> ConnectedMultiSend<C> {
        info!(%signer, contract = %self.config.contract_address, "signer attached");
        ConnectedMultiSend {
            inner: self.clone(),
            signer,
        }
    }

    /// Attach the first account managed by the ledger client.
    ///
    /// Fails with [`Error::NoSignerAttached`] when the client manages no accounts.
    pub async fn connect_default(&self) -> Result<ConnectedMultiSend<C>> {
        let accounts = self.ledger.accounts().await?;
        let signer = accounts.first().copied().ok_or(Error::NoSignerAttached)?;
        Ok(self.connect(signer))
    }

    /// Validate and assemble a batch without touching the network
    pub fn prepare(&self, request: &BatchRequest) -> Result<PreparedBatch> {
        prepare_batch(request)
    }

    /// Envelope for a call: caller options win over configuration defaults
    fn envelope(&self, value: U256, options: &TxOptions) -> TransactionEnvelope {
        TransactionEnvelope {
            gas_limit: options.gas_limit.or(self.config.default_gas_limit),
            gas_price: options.gas_price.or(self.config.default_gas_price),
            value,
            nonce: options.nonce,
        }
    }

    fn call_request(
        &self,
        from: Option<Address>,
        prepared: &PreparedBatch,
        options: &TxOptions,
    ) -> CallRequest {
        CallRequest {
            from,
            to: self.config.contract_address,
            input: prepared.call.abi_encode(),
            envelope: self.envelope(prepared.value, options),
        }
    }

    async fn estimate_prepared(
        &self,
        from: Option<Address>,
        prepared: &PreparedBatch,
        options: &TxOptions,
    ) -> Result<GasEstimation> {
        let request = self.call_request(from, prepared, options);
        self.estimator.estimate(prepared.method(), request).await
    }

    /// Estimate the gas cost of any batch shape.
    ///
    /// No signer is known, so the allowance precondition is left to the
    /// simulation itself.
    pub async fn estimate(&self, request: &BatchRequest, options: TxOptions) -> Result<GasEstimation> {
        let prepared = prepare_batch(request)?;
        self.estimate_prepared(None, &prepared, &options).await
    }

    pub async fn estimate_eth_variable(
        &self,
        recipients: Vec<Recipient>,
        options: TxOptions,
    ) -> Result<GasEstimation> {
        self.estimate(&BatchRequest::EthVariable { recipients }, options)
            .await
    }

    pub async fn estimate_eth_equal(
        &self,
        addresses: Vec<Address>,
        amount: impl Into<Amount>,
        options: TxOptions,
    ) -> Result<GasEstimation> {
        let request = BatchRequest::EthEqual {
            addresses,
            amount: amount.into(),
        };
        self.estimate(&request, options).await
    }

    pub async fn estimate_token_variable(
        &self,
        token: Address,
        recipients: Vec<Recipient>,
        options: TxOptions,
    ) -> Result<GasEstimation> {
        self.estimate(&BatchRequest::TokenVariable { token, recipients }, options)
            .await
    }

    pub async fn estimate_token_equal(
        &self,
        token: Address,
        addresses: Vec<Address>,
        amount: impl Into<Amount>,
        options: TxOptions,
    ) -> Result<GasEstimation> {
        let request = BatchRequest::TokenEqual {
            token,
            addresses,
            amount: amount.into(),
        };
        self.estimate(&request, options).await
    }

    pub async fn estimate_mixed_variable(
        &self,
        token: Address,
        recipients: Vec<MixedRecipient>,
        options: TxOptions,
    ) -> Result<GasEstimation> {
        self.estimate(&BatchRequest::MixedVariable { token, recipients }, options)
            .await
    }

    pub async fn estimate_mixed_equal(
        &self,
        token: Address,
        addresses: Vec<Address>,
        token_amount: impl Into<Amount>,
        eth_amount: impl Into<Amount>,
        options: TxOptions,
    ) -> Result<GasEstimation> {
        let request = BatchRequest::MixedEqual {
            token,
            addresses,
            token_amount: token_amount.into(),
            eth_amount: eth_amount.into(),
        };
        self.estimate(&request, options).await
    }

    /// Estimate the dedicated two-recipient transfer
    pub async fn estimate_send_to_two(
        &self,
        recipient1: Address,
        amount1: impl Into<Amount>,
        recipient2: Address,
        amount2: impl Into<Amount>,
        options: TxOptions,
    ) -> Result<GasEstimation> {
        let prepared =
            prepare_send_to_two(recipient1, &amount1.into(), recipient2, &amount2.into())?;
        self.estimate_prepared(None, &prepared, &options).await
    }

    /// Advisory slow/average/fast gas prices
    pub async fn gas_price_tiers(&self) -> Result<GasPriceTiers> {
        self.estimator.price_tiers().await
    }

    /// Compare `owner`'s allowance for this contract with `required`
    pub async fn check_allowance(
        &self,
        token: Address,
        owner: Address,
        required: U256,
    ) -> Result<AllowanceStatus> {
        self.allowances
            .status(token, owner, self.config.contract_address, required)
            .await
    }

    pub async fn native_balance(&self, address: Address) -> Result<U256> {
        self.ledger.get_balance(address).await
    }

    pub async fn token_balance(&self, token: Address, account: Address) -> Result<U256> {
        self.tokens.balance_of(token, account).await
    }

    pub async fn token_metadata(&self, token: Address) -> Result<TokenMetadata> {
        let symbol = self.tokens.symbol(token).await?;
        let decimals = self.tokens.decimals(token).await?;
        Ok(TokenMetadata {
            address: token,
            symbol,
            decimals,
        })
    }
}

/// Send-capable handle bound to a signing account
pub struct ConnectedMultiSend<C> {
    inner: MultiSend<C>,
    signer: Address,
}

impl<C> Clone for ConnectedMultiSend<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            signer: self.signer,
        }
    }
}

impl<C: LedgerClient> ConnectedMultiSend<C> {
    pub fn signer(&self) -> Address {
        self.signer
    }

    /// The read-only handle this one was connected from
    pub fn read_only(&self) -> &MultiSend<C> {
        &self.inner
    }

    /// Attach a different signing account
    pub fn connect(&self, signer: Address) -> ConnectedMultiSend<C> {
        self.inner.connect(signer)
    }

    async fn ensure_allowance(&self, prepared: &PreparedBatch) -> Result<()> {
        if let Some(requirement) = prepared.token_requirement {
            self.inner
                .allowances
                .ensure(
                    requirement.token,
                    self.signer,
                    self.inner.config.contract_address,
                    requirement.total,
                )
                .await?;
        }
        Ok(())
    }

    async fn submit(&self, prepared: &PreparedBatch, options: &TxOptions) -> Result<TxHash> {
        self.ensure_allowance(prepared).await?;
        let request = self.inner.call_request(Some(self.signer), prepared, options);
        info!(
            method = prepared.method(),
            signer = %self.signer,
            value = %prepared.value,
            "submitting multi-send transaction"
        );
        let hash = self.inner.ledger.send_transaction(request).await?;
        info!(method = prepared.method(), tx = %hash, "multi-send transaction submitted");
        Ok(hash)
    }

    /// Validate, check allowance and submit any batch shape
    pub async fn send(&self, request: &BatchRequest, options: TxOptions) -> Result<TxHash> {
        let prepared = prepare_batch(request)?;
        self.submit(&prepared, &options).await
    }

    /// Estimate a batch as this signer, failing early on insufficient allowance
    pub async fn estimate(&self, request: &BatchRequest, options: TxOptions) -> Result<GasEstimation> {
        let prepared = prepare_batch(request)?;
        self.ensure_allowance(&prepared).await?;
        self.inner
            .estimate_prepared(Some(self.signer), &prepared, &options)
            .await
    }

    pub async fn send_eth_variable(
        &self,
        recipients: Vec<Recipient>,
        options: TxOptions,
    ) -> Result<TxHash> {
        self.send(&BatchRequest::EthVariable { recipients }, options)
            .await
    }

    pub async fn send_eth_equal(
        &self,
        addresses: Vec<Address>,
        amount: impl Into<Amount>,
        options: TxOptions,
    ) -> Result<TxHash> {
        let request = BatchRequest::EthEqual {
            addresses,
            amount: amount.into(),
        };
        self.send(&request, options).await
    }

    pub async fn send_token_variable(
        &self,
        token: Address,
        recipients: Vec<Recipient>,
        options: TxOptions,
    ) -> Result<TxHash> {
        self.send(&BatchRequest::TokenVariable { token, recipients }, options)
            .await
    }

    pub async fn send_token_equal(
        &self,
        token: Address,
        addresses: Vec<Address>,
        amount: impl Into<Amount>,
        options: TxOptions,
    ) -> Result<TxHash> {
        let request = BatchRequest::TokenEqual {
            token,
            addresses,
            amount: amount.into(),
        };
        self.send(&request, options).await
    }

    pub async fn send_mixed_variable(
        &self,
        token: Address,
        recipients: Vec<MixedRecipient>,
        options: TxOptions,
    ) -> Result<TxHash> {
        self.send(&BatchRequest::MixedVariable { token, recipients }, options)
            .await
    }

    pub async fn send_mixed_equal(
        &self,
        token: Address,
        addresses: Vec<Address>,
        token_amount: impl Into<Amount>,
        eth_amount: impl Into<Amount>,
        options: TxOptions,
    ) -> Result<TxHash> {
        let request = BatchRequest::MixedEqual {
            token,
            addresses,
            token_amount: token_amount.into(),
            eth_amount: eth_amount.into(),
        };
        self.send(&request, options).await
    }

    /// Send native coin to exactly two recipients through the contract's
    /// dedicated two-party path
    pub async fn send_to_two(
        &self,
        recipient1: Address,
        amount1: impl Into<Amount>,
        recipient2: Address,
        amount2: impl Into<Amount>,
        options: TxOptions,
    ) -> Result<TxHash> {
        let prepared =
            prepare_send_to_two(recipient1, &amount1.into(), recipient2, &amount2.into())?;
        self.submit(&prepared, &options).await
    }

    /// Approve the multi-send contract to spend `amount` of `token` for the signer.
    ///
    /// Without a gas limit in `options`, the configured approval gas limit is used.
    pub async fn approve_spending(
        &self,
        token: Address,
        amount: impl Into<Amount>,
        options: TxOptions,
    ) -> Result<TxHash> {
        let amount = amounts::parse_amount(&amount.into())?;
        let config = &self.inner.config;
        let envelope = TransactionEnvelope {
            gas_limit: Some(options.gas_limit.unwrap_or(config.approval_gas_limit)),
            gas_price: options.gas_price.or(config.default_gas_price),
            value: U256::ZERO,
            nonce: options.nonce,
        };
        info!(%token, %amount, signer = %self.signer, "approving multi-send contract");
        self.inner
            .tokens
            .approve(token, config.contract_address, amount, self.signer, envelope)
            .await
    }

    /// Allowance status of the signer for `token` against `required`
    pub async fn check_allowance(&self, token: Address, required: U256) -> Result<AllowanceStatus> {
        self.inner.check_allowance(token, self.signer, required).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockLedgerClient;
    use crate::contract::IMultiSend;
    use crate::token::MockTokenClient;
    use alloy_primitives::address;
    use alloy_sol_types::SolCall;

    const A: Address = address!("000000000000000000000000000000000000000a");
    const B: Address = address!("000000000000000000000000000000000000000b");
    const C: Address = address!("000000000000000000000000000000000000000c");
    const T: Address = address!("00000000000000000000000000000000000000aa");
    const CONTRACT: Address = address!("00000000000000000000000000000000000000cc");
    const SIGNER: Address = address!("00000000000000000000000000000000000000ee");

    fn config() -> SdkConfig {
        SdkConfig::new("http://localhost:8545", CONTRACT)
    }

    fn handle(ledger: MockLedgerClient, tokens: MockTokenClient) -> MultiSend<MockLedgerClient> {
        MultiSend::new(Arc::new(ledger), config()).with_token_client(Arc::new(tokens))
    }

    fn allowance_of(amount: u64) -> MockTokenClient {
        let mut tokens = MockTokenClient::new();
        tokens
            .expect_allowance()
            .withf(|token, owner, spender| *token == T && *owner == SIGNER && *spender == CONTRACT)
            .times(1)
            .returning(move |_, _, _| Ok(U256::from(amount)));
        tokens
    }

    #[test]
    fn test_prepare_eth_variable() {
        let request = BatchRequest::EthVariable {
            recipients: vec![Recipient::new(A, 100u64), Recipient::new(B, "200")],
        };
        let prepared = prepare_batch(&request).unwrap();
        assert_eq!(prepared.method(), "multiTransfer");
        assert_eq!(prepared.value, U256::from(300));
        assert_eq!(
            prepared.call,
            MultiSendCall::MultiTransfer {
                addresses: vec![A, B],
                amounts: vec![U256::from(100), U256::from(200)],
            }
        );
        assert!(prepared.token_requirement.is_none());
    }

    #[test]
    fn test_prepare_mixed_equal() {
        let request = BatchRequest::MixedEqual {
            token: T,
            addresses: vec![A, B],
            token_amount: Amount::from(10u64),
            eth_amount: Amount::from(5u64),
        };
        let prepared = prepare_batch(&request).unwrap();
        assert_eq!(prepared.method(), "multiTransferTokenEtherEqual");
        assert_eq!(prepared.value, U256::from(10));
        assert_eq!(
            prepared.token_requirement,
            Some(TokenRequirement {
                token: T,
                total: U256::from(20),
            })
        );
        assert_eq!(
            prepared.call,
            MultiSendCall::MultiTransferTokenEtherEqual {
                token: T,
                addresses: vec![A, B],
                token_amount: U256::from(10),
                eth_amount: U256::from(5),
            }
        );
    }

    #[test]
    fn test_prepare_mixed_variable() {
        let request = BatchRequest::MixedVariable {
            token: T,
            recipients: vec![
                MixedRecipient::new(A, 10u64, 1u64),
                MixedRecipient::new(B, 20u64, 2u64),
            ],
        };
        let prepared = prepare_batch(&request).unwrap();
        assert_eq!(prepared.value, U256::from(3));
        assert_eq!(
            prepared.call,
            MultiSendCall::MultiTransferTokenEther {
                token: T,
                addresses: vec![A, B],
                token_amounts: vec![U256::from(10), U256::from(20)],
                total_token_amount: U256::from(30),
                eth_amounts: vec![U256::from(1), U256::from(2)],
            }
        );
    }

    #[test]
    fn test_equal_total_matches_uniform_variable_total() {
        let equal = prepare_batch(&BatchRequest::TokenEqual {
            token: T,
            addresses: vec![A, B, C],
            amount: Amount::from(50u64),
        })
        .unwrap();
        let variable = prepare_batch(&BatchRequest::TokenVariable {
            token: T,
            recipients: vec![
                Recipient::new(A, 50u64),
                Recipient::new(B, 50u64),
                Recipient::new(C, 50u64),
            ],
        })
        .unwrap();
        assert_eq!(equal.token_requirement, variable.token_requirement);
        assert_eq!(equal.token_requirement.unwrap().total, U256::from(150));
        assert_eq!(equal.value, U256::ZERO);
    }

    #[test]
    fn test_empty_batches_are_rejected() {
        let requests = vec![
            BatchRequest::EthVariable { recipients: vec![] },
            BatchRequest::EthEqual {
                addresses: vec![],
                amount: Amount::from(1u64),
            },
            BatchRequest::TokenVariable {
                token: T,
                recipients: vec![],
            },
            BatchRequest::TokenEqual {
                token: T,
                addresses: vec![],
                amount: Amount::from(1u64),
            },
            BatchRequest::MixedVariable {
                token: T,
                recipients: vec![],
            },
            BatchRequest::MixedEqual {
                token: T,
                addresses: vec![],
                token_amount: Amount::from(1u64),
                eth_amount: Amount::from(1u64),
            },
        ];
        for request in requests {
            let err = prepare_batch(&request).unwrap_err();
            assert!(
                matches!(err, Error::EmptyRecipientSet { variant } if variant == request.kind())
            );
        }
    }

    #[test]
    fn test_invalid_amount_is_rejected() {
        let request = BatchRequest::EthVariable {
            recipients: vec![Recipient::new(A, "12.5")],
        };
        assert!(matches!(
            prepare_batch(&request),
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[tokio::test]
    async fn test_send_eth_variable_never_checks_allowance() {
        let mut ledger = MockLedgerClient::new();
        ledger
            .expect_send_transaction()
            .withf(|request| {
                let call = IMultiSend::multiTransferCall::abi_decode(&request.input).unwrap();
                request.from == Some(SIGNER)
                    && request.to == CONTRACT
                    && request.envelope.value == U256::from(300)
                    && call.addresses == vec![A, B]
                    && call.amounts == vec![U256::from(100), U256::from(200)]
            })
            .times(1)
            .returning(|_| Ok(TxHash::repeat_byte(1)));
        let mut tokens = MockTokenClient::new();
        tokens.expect_allowance().never();

        let multisend = handle(ledger, tokens).connect(SIGNER);
        let hash = multisend
            .send_eth_variable(
                vec![Recipient::new(A, 100u64), Recipient::new(B, 200u64)],
                TxOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(hash, TxHash::repeat_byte(1));
    }

    #[tokio::test]
    async fn test_send_token_equal_with_sufficient_allowance() {
        let mut ledger = MockLedgerClient::new();
        ledger
            .expect_send_transaction()
            .withf(|request| {
                let call =
                    IMultiSend::multiTransferTokenEqualCall::abi_decode(&request.input).unwrap();
                request.envelope.value == U256::ZERO
                    && call.token == T
                    && call.addresses == vec![A, B, C]
                    && call.amount == U256::from(50)
            })
            .times(1)
            .returning(|_| Ok(TxHash::repeat_byte(2)));

        let multisend = handle(ledger, allowance_of(150)).connect(SIGNER);
        multisend
            .send_token_equal(T, vec![A, B, C], 50u64, TxOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_insufficient_allowance_blocks_dispatch() {
        let mut ledger = MockLedgerClient::new();
        ledger.expect_send_transaction().never();

        let multisend = handle(ledger, allowance_of(100)).connect(SIGNER);
        let err = multisend
            .send_token_equal(T, vec![A, B, C], 50u64, TxOptions::default())
            .await
            .unwrap_err();
        match err {
            Error::InsufficientAllowance {
                required, current, ..
            } => {
                assert_eq!(required, U256::from(150));
                assert_eq!(current, U256::from(100));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_envelope_prefers_options_over_config() {
        let mut ledger = MockLedgerClient::new();
        ledger
            .expect_send_transaction()
            .withf(|request| {
                request.envelope.gas_limit == Some(90_000)
                    && request.envelope.gas_price == Some(5)
                    && request.envelope.nonce == Some(3)
            })
            .times(1)
            .returning(|_| Ok(TxHash::ZERO));

        let config = config()
            .with_default_gas_limit(500_000)
            .with_default_gas_price(5);
        let multisend = MultiSend::new(Arc::new(ledger), config)
            .with_token_client(Arc::new(MockTokenClient::new()))
            .connect(SIGNER);
        multisend
            .send_eth_equal(
                vec![A],
                1u64,
                TxOptions::default().gas_limit(90_000).nonce(3),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_estimate_without_signer_skips_allowance() {
        let mut ledger = MockLedgerClient::new();
        ledger
            .expect_estimate_gas()
            .withf(|request| request.from.is_none() && request.envelope.value == U256::from(10))
            .times(1)
            .returning(|_| Ok(80_000));
        ledger.expect_gas_price().times(1).returning(|| Ok(2));
        let mut tokens = MockTokenClient::new();
        tokens.expect_allowance().never();

        let estimation = handle(ledger, tokens)
            .estimate_mixed_equal(T, vec![A, B], 10u64, 5u64, TxOptions::default())
            .await
            .unwrap();
        assert_eq!(estimation, GasEstimation::new(80_000, 2));
    }

    #[tokio::test]
    async fn test_connected_estimate_checks_allowance_first() {
        let mut ledger = MockLedgerClient::new();
        ledger.expect_estimate_gas().never();

        let request = BatchRequest::TokenVariable {
            token: T,
            recipients: vec![Recipient::new(A, 100u64), Recipient::new(B, 100u64)],
        };
        let err = handle(ledger, allowance_of(150))
            .connect(SIGNER)
            .estimate(&request, TxOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientAllowance { .. }));
    }

    #[tokio::test]
    async fn test_send_to_two() {
        let mut ledger = MockLedgerClient::new();
        ledger
            .expect_send_transaction()
            .withf(|request| {
                let call = IMultiSend::sendToTwoCall::abi_decode(&request.input).unwrap();
                request.envelope.value == U256::from(30)
                    && call.recipient1 == A
                    && call.amount1 == U256::from(10)
                    && call.recipient2 == B
                    && call.amount2 == U256::from(20)
            })
            .times(1)
            .returning(|_| Ok(TxHash::ZERO));

        handle(ledger, MockTokenClient::new())
            .connect(SIGNER)
            .send_to_two(A, 10u64, B, "20", TxOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_approve_spending_uses_configured_gas_limit() {
        let mut tokens = MockTokenClient::new();
        tokens
            .expect_approve()
            .withf(|token, spender, amount, from, envelope| {
                *token == T
                    && *spender == CONTRACT
                    && *amount == U256::from(150)
                    && *from == SIGNER
                    && envelope.gas_limit == Some(65_000)
            })
            .times(1)
            .returning(|_, _, _, _, _| Ok(TxHash::repeat_byte(9)));

        let config = config().with_approval_gas_limit(65_000);
        let multisend = MultiSend::new(Arc::new(MockLedgerClient::new()), config)
            .with_token_client(Arc::new(tokens))
            .connect(SIGNER);
        let hash = multisend
            .approve_spending(T, 150u64, TxOptions::default())
            .await
            .unwrap();
        assert_eq!(hash, TxHash::repeat_byte(9));
    }

    #[tokio::test]
    async fn test_connect_default_requires_an_account() {
        let mut ledger = MockLedgerClient::new();
        ledger.expect_accounts().times(1).returning(|| Ok(vec![]));

        let result = handle(ledger, MockTokenClient::new()).connect_default().await;
        assert!(matches!(result, Err(Error::NoSignerAttached)));
    }

    #[tokio::test]
    async fn test_connect_default_picks_first_account() {
        let mut ledger = MockLedgerClient::new();
        ledger
            .expect_accounts()
            .times(1)
            .returning(|| Ok(vec![SIGNER, A]));

        let connected = handle(ledger, MockTokenClient::new())
            .connect_default()
            .await
            .unwrap();
        assert_eq!(connected.signer(), SIGNER);
    }

    #[tokio::test]
    async fn test_token_metadata() {
        let mut tokens = MockTokenClient::new();
        tokens
            .expect_symbol()
            .returning(|_| Ok("USDC".to_string()));
        tokens.expect_decimals().returning(|_| Ok(6));

        let metadata = handle(MockLedgerClient::new(), tokens)
            .token_metadata(T)
            .await
            .unwrap();
        assert_eq!(metadata.symbol, "USDC");
        assert_eq!(metadata.decimals, 6);
    }
}
