//! Ethereum (ETH) and ERC20 tokens
//!
//! Every token shares the Ethereum key and address; the routing symbol only
//! changes how calldata is presented when decoding.

use zeroize::Zeroizing;

use crate::crypto::keys::{ethereum as keys, DerivationPath, KeyPair};
use crate::error::Result;
use crate::network::Network;
use crate::transaction::ethereum::{decode_transaction, sign_transaction};
use crate::transaction::to_json;
use super::{Coin, CoinContext};

pub const ETHEREUM_COIN_TYPE: u32 = 60;

/// Ether's own symbol; anything else routed here is a token
pub const NATIVE_SYMBOL: &str = "ETH";

/// Same path on every network
pub fn ethereum_path(_network: Network) -> DerivationPath {
    DerivationPath::bip44(ETHEREUM_COIN_TYPE)
}

/// Ethereum account wallet
#[derive(Debug)]
pub struct Ethereum<'a> {
    context: CoinContext<'a>,
}

impl Ethereum<'_> {
    fn token(&self) -> Option<&'static str> {
        Some(self.context.symbol).filter(|symbol| *symbol != NATIVE_SYMBOL)
    }
}

pub fn create_ethereum(context: CoinContext<'_>) -> Result<Box<dyn Coin + '_>> {
    Ok(Box::new(Ethereum { context }))
}

impl Coin for Ethereum<'_> {
    fn context(&self) -> &CoinContext<'_> {
        &self.context
    }

    fn derivation_path(&self) -> DerivationPath {
        ethereum_path(self.context.network)
    }

    fn derive_address(&self) -> Result<String> {
        Ok(keys::public_key_to_address(&self.key_pair()?))
    }

    fn derive_public_key(&self) -> Result<String> {
        Ok(hex::encode(self.key_pair()?.public_key_uncompressed()))
    }

    fn derive_private_key(&self) -> Result<Zeroizing<String>> {
        let key_pair = self.key_pair()?;
        Ok(Zeroizing::new(hex::encode(key_pair.secret_bytes().as_slice())))
    }

    fn decode_tx(&self, payload: &str) -> Result<String> {
        to_json(&decode_transaction(payload, self.token())?)
    }

    fn sign(&self, payload: &str, key_pair: &KeyPair) -> Result<String> {
        sign_transaction(payload, key_pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::mnemonic::seed_from_mnemonic;

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_first_account() {
        let seed = seed_from_mnemonic(MNEMONIC, "").unwrap();
        let coin = create_ethereum(CoinContext {
            symbol: "ETH",
            seed: &seed,
            network: Network::Testnet,
        })
        .unwrap();

        assert_eq!(coin.derive_address().unwrap(), "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_eq!(
            coin.derive_private_key().unwrap().as_str(),
            "1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
        );

        let public_key = coin.derive_public_key().unwrap();
        assert_eq!(public_key.len(), 130);
        assert!(public_key.starts_with("04"));
    }

    #[test]
    fn test_token_routing() {
        let seed = seed_from_mnemonic(MNEMONIC, "").unwrap();
        let native = Ethereum {
            context: CoinContext { symbol: "ETH", seed: &seed, network: Network::Mainnet },
        };
        let token = Ethereum {
            context: CoinContext { symbol: "XT", seed: &seed, network: Network::Mainnet },
        };

        assert_eq!(native.token(), None);
        assert_eq!(token.token(), Some("XT"));
        assert_eq!(native.derive_address().unwrap(), token.derive_address().unwrap());
    }
}
