//! The chain capability consumed by token queries: contract reads,
//! connectivity, and address normalisation.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use shared::{Error, Result};

/// Read-only access to an EVM node
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Whether the node answers requests at all
    async fn is_connected(&self) -> bool;

    /// Execute a read-only contract call (`eth_call`) and return the raw
    /// ABI-encoded return data
    async fn call_contract(&self, contract: Address, calldata: Bytes) -> Result<Bytes>;

    /// Parse a raw or checksum-cased address. Checksum casing is not enforced.
    fn normalize_address(&self, address: &str) -> Result<Address> {
        parse_address(address)
    }

    fn is_valid_address(&self, address: &str) -> bool {
        self.normalize_address(address).is_ok()
    }
}

/// Validate an Ethereum-compatible address (optional 0x + 40 hex chars)
pub fn parse_address(address: &str) -> Result<Address> {
    let hex = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);

    if hex.len() != 40 {
        return Err(Error::InvalidWalletAddress(format!(
            "'{}': address must be 40 hexadecimal characters",
            address
        )));
    }

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidWalletAddress(format!(
            "'{}': address must contain only hexadecimal characters",
            address
        )));
    }

    hex.parse::<Address>()
        .map_err(|e| Error::InvalidWalletAddress(format!("'{}': {}", address, e)))
}

/// EIP-55 mixed-case rendering
pub fn to_checksum(address: &Address) -> String {
    address.to_checksum(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_parse_checksummed_address() {
        let address = parse_address(CHECKSUMMED).unwrap();
        assert_eq!(to_checksum(&address), CHECKSUMMED);
    }

    #[test]
    fn test_parse_lowercase_normalizes_to_checksum() {
        let address = parse_address(&CHECKSUMMED.to_lowercase()).unwrap();
        assert_eq!(to_checksum(&address), CHECKSUMMED);
    }

    #[test]
    fn test_parse_without_prefix() {
        let address = parse_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(to_checksum(&address), CHECKSUMMED);
    }

    #[test]
    fn test_parse_wrong_checksum_casing_is_accepted() {
        let address = parse_address("0x5AAEB6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(to_checksum(&address), CHECKSUMMED);
    }

    #[test]
    fn test_parse_invalid_length() {
        assert!(matches!(
            parse_address("0x742d35Cc"),
            Err(Error::InvalidWalletAddress(_))
        ));
        assert!(parse_address("").is_err());
        assert!(parse_address("not-an-address").is_err());
    }

    #[test]
    fn test_parse_invalid_chars() {
        let result = parse_address("0x742d35Cc6634C0532925a3b844Bc9e7595f0bEbZ");
        assert!(matches!(result, Err(Error::InvalidWalletAddress(_))));
    }
}
