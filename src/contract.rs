//! Multi-send contract binding
//!
//! The argument order of every entry point is fixed by the deployed contract.
//! Changing any signature here is a breaking change for every caller.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IMultiSend {
        function multiTransfer(address[] addresses, uint256[] amounts) external payable;
        function multiTransferEqual(address[] addresses, uint256 amount) external payable;
        function multiTransferToken(address token, address[] addresses, uint256[] amounts, uint256 totalAmount) external;
        function multiTransferTokenEqual(address token, address[] addresses, uint256 amount) external;
        function multiTransferTokenEther(address token, address[] addresses, uint256[] tokenAmounts, uint256 totalTokenAmount, uint256[] ethAmounts) external payable;
        function multiTransferTokenEtherEqual(address token, address[] addresses, uint256 tokenAmount, uint256 ethAmount) external payable;
        function sendToTwo(address recipient1, uint256 amount1, address recipient2, uint256 amount2) external payable;
    }
}

/// A call to one multi-send entry point with its positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiSendCall {
    MultiTransfer {
        addresses: Vec<Address>,
        amounts: Vec<U256>,
    },
    MultiTransferEqual {
        addresses: Vec<Address>,
        amount: U256,
    },
    MultiTransferToken {
        token: Address,
        addresses: Vec<Address>,
        amounts: Vec<U256>,
        total_amount: U256,
    },
    MultiTransferTokenEqual {
        token: Address,
        addresses: Vec<Address>,
        amount: U256,
    },
    MultiTransferTokenEther {
        token: Address,
        addresses: Vec<Address>,
        token_amounts: Vec<U256>,
        total_token_amount: U256,
        eth_amounts: Vec<U256>,
    },
    MultiTransferTokenEtherEqual {
        token: Address,
        addresses: Vec<Address>,
        token_amount: U256,
        eth_amount: U256,
    },
    SendToTwo {
        recipient1: Address,
        amount1: U256,
        recipient2: Address,
        amount2: U256,
    },
}

impl MultiSendCall {
    /// Solidity name of the entry point
    pub fn method(&self) -> &'static str {
        match self {
            MultiSendCall::MultiTransfer { .. } => "multiTransfer",
            MultiSendCall::MultiTransferEqual { .. } => "multiTransferEqual",
            MultiSendCall::MultiTransferToken { .. } => "multiTransferToken",
            MultiSendCall::MultiTransferTokenEqual { .. } => "multiTransferTokenEqual",
            MultiSendCall::MultiTransferTokenEther { .. } => "multiTransferTokenEther",
            MultiSendCall::MultiTransferTokenEtherEqual { .. } => "multiTransferTokenEtherEqual",
            MultiSendCall::SendToTwo { .. } => "sendToTwo",
        }
    }

    /// ABI-encoded calldata, selector included
    pub fn abi_encode(&self) -> Bytes {
        let encoded = match self.clone() {
            MultiSendCall::MultiTransfer { addresses, amounts } => {
                IMultiSend::multiTransferCall { addresses, amounts }.abi_encode()
            }
            MultiSendCall::MultiTransferEqual { addresses, amount } => {
                IMultiSend::multiTransferEqualCall { addresses, amount }.abi_encode()
            }
            MultiSendCall::MultiTransferToken {
                token,
                addresses,
                amounts,
                total_amount,
            } => IMultiSend::multiTransferTokenCall {
                token,
                addresses,
                amounts,
                totalAmount: total_amount,
            }
            .abi_encode(),
            MultiSendCall::MultiTransferTokenEqual {
                token,
                addresses,
                amount,
            } => IMultiSend::multiTransferTokenEqualCall {
                token,
                addresses,
                amount,
            }
            .abi_encode(),
            MultiSendCall::MultiTransferTokenEther {
                token,
                addresses,
                token_amounts,
                total_token_amount,
                eth_amounts,
            } => IMultiSend::multiTransferTokenEtherCall {
                token,
                addresses,
                tokenAmounts: token_amounts,
                totalTokenAmount: total_token_amount,
                ethAmounts: eth_amounts,
            }
            .abi_encode(),
            MultiSendCall::MultiTransferTokenEtherEqual {
                token,
                addresses,
                token_amount,
                eth_amount,
            } => IMultiSend::multiTransferTokenEtherEqualCall {
                token,
                addresses,
                tokenAmount: token_amount,
                ethAmount: eth_amount,
            }
            .abi_encode(),
            MultiSendCall::SendToTwo {
                recipient1,
                amount1,
                recipient2,
                amount2,
            } => IMultiSend::sendToTwoCall {
                recipient1,
                amount1,
                recipient2,
                amount2,
            }
            .abi_encode(),
        };
        Bytes::from(encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const A: Address = address!("000000000000000000000000000000000000000a");
    const B: Address = address!("000000000000000000000000000000000000000b");
    const T: Address = address!("00000000000000000000000000000000000000aa");

    #[test]
    fn test_method_names() {
        let call = MultiSendCall::MultiTransferTokenEtherEqual {
            token: T,
            addresses: vec![A, B],
            token_amount: U256::from(10),
            eth_amount: U256::from(5),
        };
        assert_eq!(call.method(), "multiTransferTokenEtherEqual");

        let call = MultiSendCall::SendToTwo {
            recipient1: A,
            amount1: U256::from(1),
            recipient2: B,
            amount2: U256::from(2),
        };
        assert_eq!(call.method(), "sendToTwo");
    }

    #[test]
    fn test_calldata_preserves_argument_order() {
        let call = MultiSendCall::MultiTransferToken {
            token: T,
            addresses: vec![A, B],
            amounts: vec![U256::from(100), U256::from(200)],
            total_amount: U256::from(300),
        };
        let calldata = call.abi_encode();
        assert_eq!(
            &calldata[..4],
            IMultiSend::multiTransferTokenCall::SELECTOR.as_slice()
        );

        let decoded = IMultiSend::multiTransferTokenCall::abi_decode(&calldata).unwrap();
        assert_eq!(decoded.token, T);
        assert_eq!(decoded.addresses, vec![A, B]);
        assert_eq!(decoded.amounts, vec![U256::from(100), U256::from(200)]);
        assert_eq!(decoded.totalAmount, U256::from(300));
    }

    #[test]
    fn test_mixed_calldata_places_eth_amounts_last() {
        let call = MultiSendCall::MultiTransferTokenEther {
            token: T,
            addresses: vec![A],
            token_amounts: vec![U256::from(7)],
            total_token_amount: U256::from(7),
            eth_amounts: vec![U256::from(3)],
        };
        let decoded =
            IMultiSend::multiTransferTokenEtherCall::abi_decode(&call.abi_encode()).unwrap();
        assert_eq!(decoded.tokenAmounts, vec![U256::from(7)]);
        assert_eq!(decoded.totalTokenAmount, U256::from(7));
        assert_eq!(decoded.ethAmounts, vec![U256::from(3)]);
    }
}
