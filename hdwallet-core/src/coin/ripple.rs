//! Ripple (XRP)

use zeroize::Zeroizing;

use crate::crypto::keys::{ripple as keys, DerivationPath, KeyPair};
use crate::error::Result;
use crate::network::Network;
use crate::transaction::ripple::{decode_transaction, sign_transaction};
use crate::transaction::to_json;
use super::{Coin, CoinContext};

pub const RIPPLE_COIN_TYPE: u32 = 144;

/// Same path on every network
pub fn ripple_path(_network: Network) -> DerivationPath {
    DerivationPath::bip44(RIPPLE_COIN_TYPE)
}

/// XRP Ledger account wallet
#[derive(Debug)]
pub struct Ripple<'a> {
    context: CoinContext<'a>,
}

pub fn create_ripple(context: CoinContext<'_>) -> Result<Box<dyn Coin + '_>> {
    Ok(Box::new(Ripple { context }))
}

impl Coin for Ripple<'_> {
    fn context(&self) -> &CoinContext<'_> {
        &self.context
    }

    fn derivation_path(&self) -> DerivationPath {
        ripple_path(self.context.network)
    }

    fn derive_address(&self) -> Result<String> {
        Ok(keys::public_key_to_address(&self.key_pair()?))
    }

    fn derive_public_key(&self) -> Result<String> {
        Ok(hex::encode_upper(self.key_pair()?.public_key_compressed()))
    }

    fn derive_private_key(&self) -> Result<Zeroizing<String>> {
        let key_pair = self.key_pair()?;
        Ok(Zeroizing::new(hex::encode_upper(key_pair.secret_bytes().as_slice())))
    }

    fn decode_tx(&self, payload: &str) -> Result<String> {
        to_json(&decode_transaction(payload)?)
    }

    fn sign(&self, payload: &str, key_pair: &KeyPair) -> Result<String> {
        sign_transaction(payload, key_pair)
    }
}
