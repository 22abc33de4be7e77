//! Address parsing and validation for EVM accounts

use crate::error::{Error, Result};
use alloy_primitives::Address;

/// Parse and validate a hex-encoded EVM address.
///
/// Accepts the address with or without a `0x` or `0X` prefix. Mixed-case
/// input must carry a valid EIP-55 checksum; all-lowercase and all-uppercase
/// input is accepted as-is.
pub fn parse_address(address: &str) -> Result<Address> {
    let trimmed = address.trim();
    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let mixed_case = hex_part.chars().any(|c| c.is_ascii_lowercase())
        && hex_part.chars().any(|c| c.is_ascii_uppercase());

    if mixed_case {
        let prefixed = format!("0x{hex_part}");
        return Address::parse_checksummed(&prefixed, None)
            .map_err(|_| Error::InvalidAddress(address.to_string()));
    }

    hex_part
        .parse::<Address>()
        .map_err(|_| Error::InvalidAddress(address.to_string()))
}

/// Parse a list of addresses, failing on the first malformed entry
pub fn parse_addresses<S: AsRef<str>>(addresses: &[S]) -> Result<Vec<Address>> {
    addresses.iter().map(|a| parse_address(a.as_ref())).collect()
}

/// Validate an address format without returning it
pub fn is_valid_address(address: &str) -> bool {
    parse_address(address).is_ok()
}

/// Render an address with its EIP-55 checksum
pub fn to_checksum(address: &Address) -> String {
    address.to_checksum(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_validation() {
        assert!(is_valid_address("0x742d35cc6634c0532925a3b844bc9e7595f0bebb"));
        assert!(is_valid_address("742d35cc6634c0532925a3b844bc9e7595f0bebb"));
        assert!(!is_valid_address("0x742d35"));
        assert!(!is_valid_address("not-an-address"));
    }

    #[test]
    fn test_uppercase_prefix_accepted() {
        let lower = parse_address("0x742d35cc6634c0532925a3b844bc9e7595f0bebb").unwrap();
        assert_eq!(
            parse_address("0X742d35cc6634c0532925a3b844bc9e7595f0bebb").unwrap(),
            lower
        );
        assert_eq!(
            parse_address("0X742D35CC6634C0532925A3B844BC9E7595F0BEBB").unwrap(),
            lower
        );
        assert!(is_valid_address("0X5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn test_checksum_roundtrip() {
        let parsed = parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let checksummed = to_checksum(&parsed);
        assert_eq!(checksummed, "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(parse_address(&checksummed).unwrap(), parsed);
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let err = parse_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD").unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(_)));
    }
}
