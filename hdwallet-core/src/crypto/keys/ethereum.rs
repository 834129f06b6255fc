//! Ethereum key and address encoding

use ethers_core::types::Address;
use ethers_core::utils::to_checksum;

use crate::crypto::hash::keccak256;
use super::derivation::KeyPair;

/// 20-byte account address: the last 20 bytes of keccak256(X || Y)
pub fn address_bytes(key_pair: &KeyPair) -> [u8; 20] {
    let public_key = key_pair.public_key_uncompressed();

    // Skip the first byte (0x04) and hash the rest
    let key_hash = keccak256(&public_key[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&key_hash[12..]);
    address
}

/// EIP-55 mixed-case checksummed address
pub fn public_key_to_address(key_pair: &KeyPair) -> String {
    checksum_address(&address_bytes(key_pair))
}

pub fn checksum_address(address: &[u8; 20]) -> String {
    to_checksum(&Address::from_slice(address), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_address() {
        // Private key 0x4646... from the EIP-155 example
        let key = KeyPair::from_secret_bytes(&[0x46; 32]).unwrap();
        assert_eq!(
            public_key_to_address(&key),
            "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F"
        );
    }

    #[test]
    fn test_checksum_casing() {
        let address = checksum_address(&[0xab; 20]);
        assert_eq!(address.len(), 42);
        assert!(address.starts_with("0x"));
        assert_eq!(address.to_lowercase(), format!("0x{}", "ab".repeat(20)));
    }
}
