//! Tron transaction functionality
//!
//! Payloads are the JSON transaction objects returned by a Tron node's
//! `createtransaction` family of calls. The transaction id is the SHA-256 of
//! the protobuf-encoded `raw_data`, carried as `raw_data_hex`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::crypto::hash::sha256;
use crate::crypto::keys::KeyPair;
use crate::error::{Error, Result};
use super::types::decode_hex_payload;

/// Tron transaction
#[derive(Debug, Clone, Serialize)]
pub struct DecodedTronTransaction {
    /// SHA-256 of the raw data
    pub tx_id: String,
    pub raw_data_hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Value>,
    /// Symbol the transaction was routed under
    pub token: String,
    /// Number of signatures already attached
    pub signatures: usize,
}

struct TronPayload {
    object: Map<String, Value>,
    raw_data_hex: String,
    tx_id: [u8; 32],
}

fn parse_payload(payload: &str) -> Result<TronPayload> {
    let value: Value = serde_json::from_str(payload.trim())
        .map_err(|e| Error::MalformedPayload(format!("invalid Tron transaction JSON: {}", e)))?;

    let Value::Object(object) = value else {
        return Err(Error::MalformedPayload("Tron transaction must be a JSON object".to_string()));
    };

    let raw_data_hex = object
        .get("raw_data_hex")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedPayload("missing raw_data_hex".to_string()))?
        .to_string();

    let tx_id = sha256(&decode_hex_payload(&raw_data_hex)?);

    if let Some(claimed) = object.get("txID") {
        let claimed = claimed
            .as_str()
            .ok_or_else(|| Error::MalformedPayload("txID must be a string".to_string()))?;
        if !claimed.eq_ignore_ascii_case(&hex::encode(tx_id)) {
            return Err(Error::MalformedPayload(
                "txID does not match the hash of raw_data_hex".to_string(),
            ));
        }
    }

    Ok(TronPayload {
        object,
        raw_data_hex,
        tx_id,
    })
}

fn contract_type(raw_data: Option<&Value>) -> Option<String> {
    raw_data?
        .get("contract")?
        .get(0)?
        .get("type")?
        .as_str()
        .map(str::to_string)
}

/// Decode a Tron transaction object
pub fn decode_transaction(payload: &str, token: &str) -> Result<DecodedTronTransaction> {
    let parsed = parse_payload(payload)?;
    let raw_data = parsed.object.get("raw_data").cloned();

    Ok(DecodedTronTransaction {
        tx_id: hex::encode(parsed.tx_id),
        raw_data_hex: parsed.raw_data_hex,
        contract_type: contract_type(raw_data.as_ref()),
        raw_data,
        token: token.to_string(),
        signatures: parsed
            .object
            .get("signature")
            .and_then(Value::as_array)
            .map_or(0, Vec::len),
    })
}

/// 65-byte `r || s || v` signature over the transaction id
pub fn sign_tx_id(tx_id: &[u8; 32], key_pair: &KeyPair) -> [u8; 65] {
    let (recovery_id, compact) = key_pair.sign_recoverable(*tx_id).serialize_compact();

    let mut signature = [0u8; 65];
    signature[..64].copy_from_slice(&compact);
    signature[64] = 27 + recovery_id.to_i32() as u8;
    signature
}

/// Sign a Tron transaction object and return it with the signature attached
pub fn sign_transaction(payload: &str, key_pair: &KeyPair) -> Result<String> {
    let parsed = parse_payload(payload)?;
    let signature = sign_tx_id(&parsed.tx_id, key_pair);

    let mut object = parsed.object;
    object
        .entry("txID")
        .or_insert_with(|| Value::String(hex::encode(parsed.tx_id)));

    let signatures = object
        .entry("signature")
        .or_insert_with(|| Value::Array(Vec::new()));
    match signatures {
        Value::Array(list) => list.push(Value::String(hex::encode(signature))),
        _ => return Err(Error::MalformedPayload("signature must be an array".to_string())),
    }

    serde_json::to_string(&Value::Object(object))
        .map_err(|e| Error::SigningFailed(format!("failed to encode signed transaction: {}", e)))
}
