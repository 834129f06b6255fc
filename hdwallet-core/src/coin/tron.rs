//! Tron (TRX) and TRC10 tokens

use zeroize::Zeroizing;

use crate::crypto::keys::{tron as keys, DerivationPath, KeyPair};
use crate::error::Result;
use crate::network::Network;
use crate::transaction::to_json;
use crate::transaction::tron::{decode_transaction, sign_transaction};
use super::{Coin, CoinContext};

pub const TRON_COIN_TYPE: u32 = 195;

/// Same path on every network
pub fn tron_path(_network: Network) -> DerivationPath {
    DerivationPath::bip44(TRON_COIN_TYPE)
}

/// Tron account wallet
#[derive(Debug)]
pub struct Tron<'a> {
    context: CoinContext<'a>,
}

pub fn create_tron(context: CoinContext<'_>) -> Result<Box<dyn Coin + '_>> {
    Ok(Box::new(Tron { context }))
}

impl Coin for Tron<'_> {
    fn context(&self) -> &CoinContext<'_> {
        &self.context
    }

    fn derivation_path(&self) -> DerivationPath {
        tron_path(self.context.network)
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
        to_json(&decode_transaction(payload, self.context.symbol)?)
    }

    fn sign(&self, payload: &str, key_pair: &KeyPair) -> Result<String> {
        sign_transaction(payload, key_pair)
    }
}
