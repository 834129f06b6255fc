//! Bitcoin-family transaction functionality
//!
//! Decoding and P2PKH signing of raw UTXO transactions. Every input of a
//! transaction handed to [`sign_p2pkh_inputs`] is taken to spend an output
//! locked to the wallet's own P2PKH script.

use bitcoin::consensus::encode::{deserialize, serialize};
use bitcoin::hashes::Hash;
use bitcoin::sighash::SighashCache;
use bitcoin::{Script, ScriptBuf, Transaction};
use serde::{Deserialize, Serialize};

use crate::crypto::hash::sha256d;
use crate::crypto::keys::{bitcoin::p2pkh_script, KeyPair};
use crate::error::{Error, Result};
use super::types::decode_hex_payload;

pub const SIGHASH_ALL: u32 = 0x01;
pub const SIGHASH_FORKID: u32 = 0x40;

/// Which signature digest a chain uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SighashAlgorithm {
    /// Original Bitcoin digest, SIGHASH_ALL
    Legacy,
    /// BIP143-style digest committing to input amounts, SIGHASH_ALL|FORKID
    ForkId,
}

impl SighashAlgorithm {
    pub fn hash_type(&self) -> u32 {
        match self {
            Self::Legacy => SIGHASH_ALL,
            Self::ForkId => SIGHASH_ALL | SIGHASH_FORKID,
        }
    }
}

/// Payload accepted by the Bitcoin-family chain modules: either a bare
/// transaction hex string or a JSON envelope carrying input amounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtxoPayload {
    pub raw_tx: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_amounts: Vec<u64>,
}

impl UtxoPayload {
    pub fn parse(payload: &str) -> Result<Self> {
        let trimmed = payload.trim();
        if trimmed.starts_with('{') {
            serde_json::from_str(trimmed)
                .map_err(|e| Error::MalformedPayload(format!("invalid transaction envelope: {}", e)))
        } else {
            Ok(Self {
                raw_tx: trimmed.to_string(),
                input_amounts: Vec::new(),
            })
        }
    }

    /// Deserialize the raw transaction
    pub fn transaction(&self) -> Result<Transaction> {
        let bytes = decode_hex_payload(&self.raw_tx)?;
        let tx: Transaction = deserialize(&bytes)
            .map_err(|e| Error::MalformedPayload(format!("invalid bitcoin transaction: {}", e)))?;

        if tx.input.is_empty() {
            return Err(Error::MalformedPayload("transaction has no inputs".to_string()));
        }
        if !self.input_amounts.is_empty() && self.input_amounts.len() != tx.input.len() {
            return Err(Error::MalformedPayload(format!(
                "{} input amounts given for {} inputs",
                self.input_amounts.len(),
                tx.input.len()
            )));
        }

        Ok(tx)
    }
}

/// Transaction input
#[derive(Debug, Clone, Serialize)]
pub struct DecodedInput {
    /// Previous transaction id
    pub txid: String,
    /// Previous output index
    pub vout: u32,
    pub sequence: u32,
    /// Value of the spent output, when the payload supplied it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    /// Whether a script_sig is already present
    pub signed: bool,
}

/// Transaction output
#[derive(Debug, Clone, Serialize)]
pub struct DecodedOutput {
    /// Value in satoshis
    pub value: u64,
    pub script_pubkey: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Bitcoin-family transaction in inspectable form
#[derive(Debug, Clone, Serialize)]
pub struct DecodedUtxoTransaction {
    pub txid: String,
    pub version: i32,
    pub lock_time: u32,
    pub inputs: Vec<DecodedInput>,
    pub outputs: Vec<DecodedOutput>,
    /// Inputs minus outputs, when every input amount is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
}

/// Sum of satoshi values, `None` on overflow
fn checked_total(mut values: impl Iterator<Item = u64>) -> Option<u64> {
    values.try_fold(0u64, |total, value| total.checked_add(value))
}

/// Describe a transaction; `address_of` renders standard output scripts
pub fn decode_transaction<F>(tx: &Transaction, input_amounts: &[u64], address_of: F) -> DecodedUtxoTransaction
where
    F: Fn(&Script) -> Option<String>,
{
    let inputs = tx
        .input
        .iter()
        .enumerate()
        .map(|(i, input)| DecodedInput {
            txid: input.previous_output.txid.to_string(),
            vout: input.previous_output.vout,
            sequence: input.sequence.0,
            amount: input_amounts.get(i).copied(),
            signed: !input.script_sig.is_empty(),
        })
        .collect();

    let outputs: Vec<DecodedOutput> = tx
        .output
        .iter()
        .map(|output| DecodedOutput {
            value: output.value.to_sat(),
            script_pubkey: hex::encode(output.script_pubkey.as_bytes()),
            address: address_of(&output.script_pubkey),
        })
        .collect();

    let fee = if !input_amounts.is_empty() && input_amounts.len() == tx.input.len() {
        let total_in = checked_total(input_amounts.iter().copied());
        let total_out = checked_total(outputs.iter().map(|output| output.value));
        total_in.zip(total_out).and_then(|(total_in, total_out)| total_in.checked_sub(total_out))
    } else {
        None
    };

    DecodedUtxoTransaction {
        txid: tx.txid().to_string(),
        version: tx.version.0,
        lock_time: tx.lock_time.to_consensus_u32(),
        inputs,
        outputs,
        fee,
    }
}

/// Sign every input as a spend of the key pair's P2PKH output
pub fn sign_p2pkh_inputs(
    tx: &mut Transaction,
    key_pair: &KeyPair,
    input_amounts: &[u64],
    algorithm: SighashAlgorithm,
) -> Result<()> {
    let script_code = p2pkh_script(key_pair);

    let digests = match algorithm {
        SighashAlgorithm::Legacy => {
            let cache = SighashCache::new(&*tx);
            (0..tx.input.len())
                .map(|i| {
                    cache
                        .legacy_signature_hash(i, &script_code, SIGHASH_ALL)
                        .map(|sighash| sighash.to_byte_array())
                        .map_err(|e| Error::SigningFailed(format!("sighash for input {}: {}", i, e)))
                })
                .collect::<Result<Vec<_>>>()?
        }
        SighashAlgorithm::ForkId => {
            if input_amounts.len() != tx.input.len() {
                return Err(Error::MalformedPayload(
                    "input_amounts must list the value of every input".to_string(),
                ));
            }
            (0..tx.input.len())
                .map(|i| forkid_signature_hash(tx, i, &script_code, input_amounts[i]))
                .collect()
        }
    };

    let public_key = key_pair.public_key_compressed();
    let hash_type = algorithm.hash_type() as u8;

    for (input, digest) in tx.input.iter_mut().zip(digests) {
        let mut signature = key_pair.sign_ecdsa(digest).serialize_der().to_vec();
        signature.push(hash_type);
        input.script_sig = p2pkh_script_sig(&signature, &public_key);
    }

    Ok(())
}

/// Consensus-serialized transaction as hex
pub fn serialize_hex(tx: &Transaction) -> String {
    hex::encode(serialize(tx))
}

fn p2pkh_script_sig(signature: &[u8], public_key: &[u8]) -> ScriptBuf {
    let mut script = Vec::with_capacity(2 + signature.len() + public_key.len());
    script.push(signature.len() as u8);
    script.extend_from_slice(signature);
    script.push(public_key.len() as u8);
    script.extend_from_slice(public_key);
    ScriptBuf::from_bytes(script)
}

/// Replay-protected digest used by Bitcoin Cash (BIP143 layout, FORKID flag)
pub fn forkid_signature_hash(tx: &Transaction, index: usize, script_code: &ScriptBuf, amount: u64) -> [u8; 32] {
    let mut prevouts = Vec::with_capacity(36 * tx.input.len());
    let mut sequences = Vec::with_capacity(4 * tx.input.len());
    for input in &tx.input {
        prevouts.extend_from_slice(&serialize(&input.previous_output));
        sequences.extend_from_slice(&input.sequence.0.to_le_bytes());
    }

    let mut outputs = Vec::new();
    for output in &tx.output {
        outputs.extend_from_slice(&serialize(output));
    }

    let input = &tx.input[index];
    let mut preimage = Vec::with_capacity(256);
    preimage.extend_from_slice(&tx.version.0.to_le_bytes());
    preimage.extend_from_slice(&sha256d(&prevouts));
    preimage.extend_from_slice(&sha256d(&sequences));
    preimage.extend_from_slice(&serialize(&input.previous_output));
    preimage.extend_from_slice(&serialize(script_code));
    preimage.extend_from_slice(&amount.to_le_bytes());
    preimage.extend_from_slice(&input.sequence.0.to_le_bytes());
    preimage.extend_from_slice(&sha256d(&outputs));
    preimage.extend_from_slice(&tx.lock_time.to_consensus_u32().to_le_bytes());
    preimage.extend_from_slice(&(SIGHASH_ALL | SIGHASH_FORKID).to_le_bytes());

    sha256d(&preimage)
}
