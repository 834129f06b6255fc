//! Omni Layer tokens (USDT(Omni))
//!
//! Omni balances live on Bitcoin addresses, so keys, addresses and
//! signing are Bitcoin's. Decoding also reports the embedded simple send.

use serde::Serialize;
use zeroize::Zeroizing;

use crate::crypto::keys::{DerivationPath, KeyPair};
use crate::error::Result;
use crate::transaction::bitcoin::{DecodedUtxoTransaction, UtxoPayload};
use crate::transaction::omni::{find_simple_send, OmniSimpleSend};
use crate::transaction::to_json;
use super::{Bitcoin, Coin, CoinContext};

#[derive(Debug, Serialize)]
struct DecodedOmniTransaction {
    #[serde(flatten)]
    transaction: DecodedUtxoTransaction,
    omni: Option<OmniSimpleSend>,
}

/// Omni token wallet on top of Bitcoin keys
#[derive(Debug)]
pub struct Omni<'a> {
    bitcoin: Bitcoin<'a>,
}

pub fn create_omni(context: CoinContext<'_>) -> Result<Box<dyn Coin + '_>> {
    Ok(Box::new(Omni {
        bitcoin: Bitcoin::new(context),
    }))
}

impl Coin for Omni<'_> {
    fn context(&self) -> &CoinContext<'_> {
        self.bitcoin.context()
    }

    fn derivation_path(&self) -> DerivationPath {
        self.bitcoin.derivation_path()
    }

    fn derive_address(&self) -> Result<String> {
        self.bitcoin.derive_address()
    }

    fn derive_public_key(&self) -> Result<String> {
        self.bitcoin.derive_public_key()
    }

    fn derive_private_key(&self) -> Result<Zeroizing<String>> {
        self.bitcoin.derive_private_key()
    }

    fn decode_tx(&self, payload: &str) -> Result<String> {
        let payload = UtxoPayload::parse(payload)?;
        let omni = find_simple_send(&payload.transaction()?);

        to_json(&DecodedOmniTransaction {
            transaction: self.bitcoin.decode(&payload)?,
            omni,
        })
    }

    fn sign(&self, payload: &str, key_pair: &KeyPair) -> Result<String> {
        self.bitcoin.sign(payload, key_pair)
    }
}
