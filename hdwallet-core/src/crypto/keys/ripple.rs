//! XRP ledger key and address encoding

use bs58::Alphabet;

use crate::crypto::hash::hash160;
use super::derivation::KeyPair;

const ACCOUNT_ID_VERSION: u8 = 0x00;

/// 20-byte account id: RIPEMD160(SHA256(compressed pubkey))
pub fn account_id(key_pair: &KeyPair) -> [u8; 20] {
    hash160(&key_pair.public_key_compressed())
}

/// Classic address (`r...`) for an account id
pub fn encode_account_id(account: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(ACCOUNT_ID_VERSION);
    payload.extend_from_slice(account);
    bs58::encode(payload)
        .with_alphabet(Alphabet::RIPPLE)
        .with_check()
        .into_string()
}

pub fn public_key_to_address(key_pair: &KeyPair) -> String {
    encode_account_id(&account_id(key_pair))
}
