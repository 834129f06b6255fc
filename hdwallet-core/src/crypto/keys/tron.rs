//! Tron key and address encoding

use super::derivation::KeyPair;
use super::ethereum::address_bytes;

/// Version byte prefixed to every mainnet Tron address
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Base58check address (`T...`) of `0x41 || keccak256(pubkey)[12..]`
pub fn public_key_to_address(key_pair: &KeyPair) -> String {
    encode_address(&address_bytes(key_pair))
}

pub fn encode_address(account: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(ADDRESS_PREFIX);
    payload.extend_from_slice(account);
    bs58::encode(payload).with_check().into_string()
}
