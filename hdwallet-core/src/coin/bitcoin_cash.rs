//! Bitcoin Cash (BCH)

use zeroize::Zeroizing;

use crate::crypto::hash::hash160;
use crate::crypto::keys::{bitcoin as keys, cashaddr, DerivationPath, KeyPair};
use crate::error::Result;
use crate::network::Network;
use crate::transaction::bitcoin::{
    decode_transaction, serialize_hex, sign_p2pkh_inputs, SighashAlgorithm, UtxoPayload,
};
use crate::transaction::to_json;
use super::{Coin, CoinContext, TESTNET_COIN_TYPE};

pub const BITCOIN_CASH_COIN_TYPE: u32 = 145;

pub fn bitcoin_cash_path(network: Network) -> DerivationPath {
    match network {
        Network::Mainnet => DerivationPath::bip44(BITCOIN_CASH_COIN_TYPE),
        Network::Testnet => DerivationPath::bip44(TESTNET_COIN_TYPE),
    }
}

/// Bitcoin Cash wallet with CashAddr addresses and FORKID signatures
#[derive(Debug)]
pub struct BitcoinCash<'a> {
    context: CoinContext<'a>,
}

pub fn create_bitcoin_cash(context: CoinContext<'_>) -> Result<Box<dyn Coin + '_>> {
    Ok(Box::new(BitcoinCash { context }))
}

impl Coin for BitcoinCash<'_> {
    fn context(&self) -> &CoinContext<'_> {
        &self.context
    }

    fn derivation_path(&self) -> DerivationPath {
        bitcoin_cash_path(self.context.network)
    }

    fn derive_address(&self) -> Result<String> {
        let key_pair = self.key_pair()?;
        Ok(cashaddr::encode_p2pkh(
            &hash160(&key_pair.public_key_compressed()),
            self.context.network,
        ))
    }

    fn derive_public_key(&self) -> Result<String> {
        Ok(hex::encode(self.key_pair()?.public_key_compressed()))
    }

    fn derive_private_key(&self) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(keys::private_key_to_wif(&self.key_pair()?, self.context.network)))
    }

    fn decode_tx(&self, payload: &str) -> Result<String> {
        let payload = UtxoPayload::parse(payload)?;
        let tx = payload.transaction()?;
        let network = self.context.network;

        to_json(&decode_transaction(&tx, &payload.input_amounts, |script| {
            keys::p2pkh_hash(script.as_bytes()).map(|hash| cashaddr::encode_p2pkh(&hash, network))
        }))
    }

    fn sign(&self, payload: &str, key_pair: &KeyPair) -> Result<String> {
        let payload = UtxoPayload::parse(payload)?;
        let mut tx = payload.transaction()?;
        sign_p2pkh_inputs(&mut tx, key_pair, &payload.input_amounts, SighashAlgorithm::ForkId)?;
        Ok(serialize_hex(&tx))
    }
}
