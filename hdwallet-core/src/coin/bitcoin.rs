//! Bitcoin (BTC)

use ::bitcoin::Address;
use zeroize::Zeroizing;

use crate::crypto::keys::{bitcoin as keys, DerivationPath, KeyPair};
use crate::error::Result;
use crate::network::Network;
use crate::transaction::bitcoin::{
    decode_transaction, serialize_hex, sign_p2pkh_inputs, DecodedUtxoTransaction, SighashAlgorithm, UtxoPayload,
};
use crate::transaction::to_json;
use super::{Coin, CoinContext, TESTNET_COIN_TYPE};

pub const BITCOIN_COIN_TYPE: u32 = 0;

pub fn bitcoin_path(network: Network) -> DerivationPath {
    match network {
        Network::Mainnet => DerivationPath::bip44(BITCOIN_COIN_TYPE),
        Network::Testnet => DerivationPath::bip44(TESTNET_COIN_TYPE),
    }
}

/// Legacy P2PKH Bitcoin wallet
#[derive(Debug)]
pub struct Bitcoin<'a> {
    context: CoinContext<'a>,
}

impl<'a> Bitcoin<'a> {
    pub fn new(context: CoinContext<'a>) -> Self {
        Self { context }
    }

    pub(crate) fn decode(&self, payload: &UtxoPayload) -> Result<DecodedUtxoTransaction> {
        let tx = payload.transaction()?;
        let network = keys::bitcoin_network(self.context.network);

        Ok(decode_transaction(&tx, &payload.input_amounts, |script| {
            Address::from_script(script, network).ok().map(|address| address.to_string())
        }))
    }
}

pub fn create_bitcoin(context: CoinContext<'_>) -> Result<Box<dyn Coin + '_>> {
    Ok(Box::new(Bitcoin::new(context)))
}

impl Coin for Bitcoin<'_> {
    fn context(&self) -> &CoinContext<'_> {
        &self.context
    }

    fn derivation_path(&self) -> DerivationPath {
        bitcoin_path(self.context.network)
    }

    fn derive_address(&self) -> Result<String> {
        Ok(keys::p2pkh_address(&self.key_pair()?, self.context.network))
    }

    fn derive_public_key(&self) -> Result<String> {
        Ok(hex::encode(self.key_pair()?.public_key_compressed()))
    }

    fn derive_private_key(&self) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(keys::private_key_to_wif(&self.key_pair()?, self.context.network)))
    }

    fn decode_tx(&self, payload: &str) -> Result<String> {
        to_json(&self.decode(&UtxoPayload::parse(payload)?)?)
    }

    fn sign(&self, payload: &str, key_pair: &KeyPair) -> Result<String> {
        let payload = UtxoPayload::parse(payload)?;
        let mut tx = payload.transaction()?;
        sign_p2pkh_inputs(&mut tx, key_pair, &payload.input_amounts, SighashAlgorithm::Legacy)?;
        Ok(serialize_hex(&tx))
    }
}
