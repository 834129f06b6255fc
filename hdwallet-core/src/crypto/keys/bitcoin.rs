//! Bitcoin-family key and address encoding

use bitcoin::{Address, PrivateKey as BitcoinPrivateKey, PublicKey as BitcoinPublicKey, ScriptBuf};

use crate::crypto::hash::hash160;
use crate::network::Network;
use super::derivation::KeyPair;

/// Map the session network onto the bitcoin crate's network
pub fn bitcoin_network(network: Network) -> bitcoin::Network {
    match network {
        Network::Mainnet => bitcoin::Network::Bitcoin,
        Network::Testnet => bitcoin::Network::Testnet,
    }
}

/// Legacy P2PKH address (`1...` on mainnet, `m...`/`n...` on testnet)
pub fn p2pkh_address(key_pair: &KeyPair, network: Network) -> String {
    let public_key = BitcoinPublicKey::new(*key_pair.public_key());
    Address::p2pkh(&public_key, bitcoin_network(network)).to_string()
}

/// Compressed WIF encoding of the private key
pub fn private_key_to_wif(key_pair: &KeyPair, network: Network) -> String {
    BitcoinPrivateKey::new(*key_pair.secret_key(), bitcoin_network(network)).to_wif()
}

/// `OP_DUP OP_HASH160 <hash160(pubkey)> OP_EQUALVERIFY OP_CHECKSIG`
pub fn p2pkh_script(key_pair: &KeyPair) -> ScriptBuf {
    let mut script = Vec::with_capacity(25);
    script.extend_from_slice(&[0x76, 0xa9, 0x14]);
    script.extend_from_slice(&hash160(&key_pair.public_key_compressed()));
    script.extend_from_slice(&[0x88, 0xac]);
    ScriptBuf::from_bytes(script)
}

/// Extract the 20-byte key hash from a standard P2PKH script
pub fn p2pkh_hash(script: &[u8]) -> Option<[u8; 20]> {
    match script {
        [0x76, 0xa9, 0x14, hash @ .., 0x88, 0xac] if hash.len() == 20 => {
            let mut out = [0u8; 20];
            out.copy_from_slice(hash);
            Some(out)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p2pkh_script_shape() {
        let key = KeyPair::from_secret_bytes(&[0x22; 32]).unwrap();
        let script = p2pkh_script(&key);

        assert_eq!(script.len(), 25);
        assert!(script.is_p2pkh());
        assert_eq!(
            p2pkh_hash(script.as_bytes()).unwrap(),
            hash160(&key.public_key_compressed())
        );
    }

    #[test]
    fn test_address_prefixes() {
        let key = KeyPair::from_secret_bytes(&[0x22; 32]).unwrap();

        assert!(p2pkh_address(&key, Network::Mainnet).starts_with('1'));
        let testnet = p2pkh_address(&key, Network::Testnet);
        assert!(testnet.starts_with('m') || testnet.starts_with('n'));

        assert!(private_key_to_wif(&key, Network::Mainnet).starts_with(['K', 'L']));
        assert!(private_key_to_wif(&key, Network::Testnet).starts_with('c'));
    }

    #[test]
    fn test_non_p2pkh_hash_is_none() {
        assert!(p2pkh_hash(&[0x6a, 0x01, 0x00]).is_none());
    }
}
