//! Omni Layer payload decoding
//!
//! Omni transactions are ordinary Bitcoin transactions with a class C
//! payload in an `OP_RETURN` output: the `omni` marker followed by the
//! big-endian simple send fields.

use bitcoin::{Script, Transaction};
use serde::Serialize;

/// Marker prefixed to every class C payload
pub const OMNI_MARKER: &[u8; 4] = b"omni";

/// Tether USD on the Omni Layer
pub const PROPERTY_USDT: u32 = 31;

pub const TX_TYPE_SIMPLE_SEND: u16 = 0;

const OP_RETURN: u8 = 0x6a;
const OP_PUSHDATA1: u8 = 0x4c;

/// Decoded Omni simple send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OmniSimpleSend {
    pub version: u16,
    pub tx_type: u16,
    pub property_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<&'static str>,
    /// Amount in indivisible units (willets for divisible properties)
    pub amount: u64,
    /// Index of the output receiving the tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_output: Option<usize>,
}

/// Known property names
pub fn property_name(property_id: u32) -> Option<&'static str> {
    match property_id {
        1 => Some("OMNI"),
        2 => Some("TOMNI"),
        PROPERTY_USDT => Some("USDT"),
        _ => None,
    }
}

/// Data pushed by an `OP_RETURN` script, if the script is one
pub fn op_return_data(script: &Script) -> Option<&[u8]> {
    match script.as_bytes() {
        [OP_RETURN, OP_PUSHDATA1, len, data @ ..] if data.len() == *len as usize => Some(data),
        [OP_RETURN, len, data @ ..] if *len < OP_PUSHDATA1 && data.len() == *len as usize => Some(data),
        _ => None,
    }
}

/// Parse the class C payload that follows the marker
pub fn parse_payload(data: &[u8]) -> Option<OmniSimpleSend> {
    let payload = data.strip_prefix(OMNI_MARKER.as_slice())?;
    if payload.len() < 16 {
        return None;
    }

    let version = u16::from_be_bytes([payload[0], payload[1]]);
    let tx_type = u16::from_be_bytes([payload[2], payload[3]]);
    if tx_type != TX_TYPE_SIMPLE_SEND {
        return None;
    }

    let mut property = [0u8; 4];
    property.copy_from_slice(&payload[4..8]);
    let mut amount = [0u8; 8];
    amount.copy_from_slice(&payload[8..16]);
    let property_id = u32::from_be_bytes(property);

    Some(OmniSimpleSend {
        version,
        tx_type,
        property_id,
        property: property_name(property_id),
        amount: u64::from_be_bytes(amount),
        reference_output: None,
    })
}

/// Locate and decode the simple send carried by a transaction
pub fn find_simple_send(tx: &Transaction) -> Option<OmniSimpleSend> {
    let (marker_index, mut send) = tx
        .output
        .iter()
        .enumerate()
        .find_map(|(i, output)| op_return_data(&output.script_pubkey).and_then(parse_payload).map(|send| (i, send)))?;

    // The reference is the last output other than the payload itself
    send.reference_output = (0..tx.output.len()).rev().find(|&i| i != marker_index);
    Some(send)
}

/// Build the `OP_RETURN` script for a simple send
pub fn simple_send_script(property_id: u32, amount: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(20);
    data.extend_from_slice(OMNI_MARKER);
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(&TX_TYPE_SIMPLE_SEND.to_be_bytes());
    data.extend_from_slice(&property_id.to_be_bytes());
    data.extend_from_slice(&amount.to_be_bytes());

    let mut script = Vec::with_capacity(2 + data.len());
    script.push(OP_RETURN);
    script.push(data.len() as u8);
    script.extend_from_slice(&data);
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::ScriptBuf;

    #[test]
    fn test_parse_usdt_send() {
        let script = ScriptBuf::from_bytes(simple_send_script(PROPERTY_USDT, 100_000_000));
        assert_eq!(
            hex::encode(script.as_bytes()),
            "6a146f6d6e69000000000000001f0000000005f5e100"
        );

        let send = parse_payload(op_return_data(&script).unwrap()).unwrap();
        assert_eq!(send.property_id, 31);
        assert_eq!(send.property, Some("USDT"));
        assert_eq!(send.amount, 100_000_000);
    }

    #[test]
    fn test_rejects_foreign_op_return() {
        let script = ScriptBuf::from_bytes(vec![0x6a, 0x04, 0xde, 0xad, 0xbe, 0xef]);
        assert!(op_return_data(&script).and_then(parse_payload).is_none());

        // Truncated payload
        assert!(parse_payload(b"omni\x00\x00\x00\x00").is_none());
    }
}
