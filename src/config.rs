//! SDK configuration

use crate::client::RpcClient;
use crate::error::{Error, Result};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Gas limit attached to token approvals when neither the caller nor the
/// configuration supplies one
pub const DEFAULT_APPROVAL_GAS_LIMIT: u64 = 100_000;

fn default_approval_gas_limit() -> u64 {
    DEFAULT_APPROVAL_GAS_LIMIT
}

/// Construction-time settings for a multi-send handle.
///
/// Default gas values apply to every call unless overridden per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// JSON-RPC endpoint of the ledger node
    pub rpc_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_password: Option<String>,
    /// Address of the deployed multi-send contract
    pub contract_address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_gas_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_gas_price: Option<u128>,
    #[serde(default = "default_approval_gas_limit")]
    pub approval_gas_limit: u64,
}

impl SdkConfig {
    pub fn new(rpc_url: impl Into<String>, contract_address: Address) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            rpc_user: None,
            rpc_password: None,
            contract_address,
            default_gas_limit: None,
            default_gas_price: None,
            approval_gas_limit: DEFAULT_APPROVAL_GAS_LIMIT,
        }
    }

    pub fn with_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.rpc_user = Some(user.into());
        self.rpc_password = Some(password.into());
        self
    }

    pub fn with_default_gas_limit(mut self, gas_limit: u64) -> Self {
        self.default_gas_limit = Some(gas_limit);
        self
    }

    pub fn with_default_gas_price(mut self, gas_price: u128) -> Self {
        self.default_gas_price = Some(gas_price);
        self
    }

    pub fn with_approval_gas_limit(mut self, gas_limit: u64) -> Self {
        self.approval_gas_limit = gas_limit;
        self
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: SdkConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            return Err(Error::InvalidParameter("rpc_url must not be empty".to_string()));
        }
        if self.rpc_user.is_some() != self.rpc_password.is_some() {
            return Err(Error::InvalidParameter(
                "rpc_user and rpc_password must be set together".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the bundled JSON-RPC client for this configuration
    pub fn rpc_client(&self) -> RpcClient {
        match (&self.rpc_user, &self.rpc_password) {
            (Some(user), Some(password)) => {
                RpcClient::with_auth(self.rpc_url.clone(), user.clone(), password.clone())
            }
            _ => RpcClient::new(self.rpc_url.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_config_defaults_from_json() {
        let config: SdkConfig = serde_json::from_str(
            r#"{
                "rpc_url": "http://localhost:8545",
                "contract_address": "0x1111111111111111111111111111111111111111"
            }"#,
        )
        .unwrap();
        assert_eq!(config.approval_gas_limit, DEFAULT_APPROVAL_GAS_LIMIT);
        assert_eq!(config.default_gas_limit, None);
        assert_eq!(config.default_gas_price, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_file() {
        let path = std::env::temp_dir().join("multisend_sdk_config_test.json");
        let config = SdkConfig::new(
            "http://localhost:8545",
            address!("1111111111111111111111111111111111111111"),
        )
        .with_default_gas_limit(500_000)
        .with_default_gas_price(2_000_000_000);
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = SdkConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_validate_rejects_empty_endpoint() {
        let config = SdkConfig::new("  ", Address::ZERO);
        assert!(matches!(config.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_validate_rejects_partial_credentials() {
        let mut config = SdkConfig::new("http://localhost:8545", Address::ZERO);
        config.rpc_user = Some("user".to_string());
        assert!(config.validate().is_err());
    }
}
