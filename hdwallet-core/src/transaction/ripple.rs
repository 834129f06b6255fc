//! Ripple (XRP Ledger) transaction functionality
//!
//! A binary codec for the common transaction fields with native XRP
//! amounts. Fields are kept in canonical order (type code, then field code)
//! so re-encoding a decoded transaction reproduces the original bytes.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::crypto::hash::sha512_half;
use crate::crypto::keys::{ripple, KeyPair};
use crate::error::{Error, Result};
use super::types::decode_hex_payload;

/// Prefix of the single-signing hash ("STX\0")
pub const HASH_PREFIX_TX_SIGN: [u8; 4] = [0x53, 0x54, 0x58, 0x00];

/// Prefix of the transaction id hash ("TXN\0")
pub const HASH_PREFIX_TX_ID: [u8; 4] = [0x54, 0x58, 0x4e, 0x00];

const TYPE_UINT16: u8 = 1;
const TYPE_UINT32: u8 = 2;
const TYPE_AMOUNT: u8 = 6;
const TYPE_BLOB: u8 = 7;
const TYPE_ACCOUNT_ID: u8 = 8;

const AMOUNT_NOT_NATIVE: u64 = 0x8000_0000_0000_0000;
const AMOUNT_POSITIVE: u64 = 0x4000_0000_0000_0000;
const MAX_DROPS: u64 = 100_000_000_000_000_000;

/// Supported transaction fields, declared in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    TransactionType,
    Flags,
    SourceTag,
    Sequence,
    DestinationTag,
    LastLedgerSequence,
    Amount,
    Fee,
    SigningPubKey,
    TxnSignature,
    Account,
    Destination,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::TransactionType,
        Field::Flags,
        Field::SourceTag,
        Field::Sequence,
        Field::DestinationTag,
        Field::LastLedgerSequence,
        Field::Amount,
        Field::Fee,
        Field::SigningPubKey,
        Field::TxnSignature,
        Field::Account,
        Field::Destination,
    ];

    pub fn type_code(self) -> u8 {
        match self {
            Field::TransactionType => TYPE_UINT16,
            Field::Flags
            | Field::SourceTag
            | Field::Sequence
            | Field::DestinationTag
            | Field::LastLedgerSequence => TYPE_UINT32,
            Field::Amount | Field::Fee => TYPE_AMOUNT,
            Field::SigningPubKey | Field::TxnSignature => TYPE_BLOB,
            Field::Account | Field::Destination => TYPE_ACCOUNT_ID,
        }
    }

    pub fn field_code(self) -> u8 {
        match self {
            Field::TransactionType => 2,
            Field::Flags => 2,
            Field::SourceTag => 3,
            Field::Sequence => 4,
            Field::DestinationTag => 14,
            Field::LastLedgerSequence => 27,
            Field::Amount => 1,
            Field::Fee => 8,
            Field::SigningPubKey => 3,
            Field::TxnSignature => 4,
            Field::Account => 1,
            Field::Destination => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::TransactionType => "TransactionType",
            Field::Flags => "Flags",
            Field::SourceTag => "SourceTag",
            Field::Sequence => "Sequence",
            Field::DestinationTag => "DestinationTag",
            Field::LastLedgerSequence => "LastLedgerSequence",
            Field::Amount => "Amount",
            Field::Fee => "Fee",
            Field::SigningPubKey => "SigningPubKey",
            Field::TxnSignature => "TxnSignature",
            Field::Account => "Account",
            Field::Destination => "Destination",
        }
    }

    /// Whether the field is covered by the signature
    pub fn is_signing_field(self) -> bool {
        self != Field::TxnSignature
    }

    fn from_codes(type_code: u8, field_code: u8) -> Option<Field> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.type_code() == type_code && field.field_code() == field_code)
    }
}

/// Field value by serialized type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    UInt16(u16),
    UInt32(u32),
    /// Native amount in drops
    Amount(u64),
    Blob(Vec<u8>),
    AccountId([u8; 20]),
}

impl FieldValue {
    fn type_code(&self) -> u8 {
        match self {
            FieldValue::UInt16(_) => TYPE_UINT16,
            FieldValue::UInt32(_) => TYPE_UINT32,
            FieldValue::Amount(_) => TYPE_AMOUNT,
            FieldValue::Blob(_) => TYPE_BLOB,
            FieldValue::AccountId(_) => TYPE_ACCOUNT_ID,
        }
    }
}

/// Human-readable transaction type
pub fn transaction_type_name(code: u16) -> Option<&'static str> {
    match code {
        0 => Some("Payment"),
        3 => Some("AccountSet"),
        5 => Some("SetRegularKey"),
        7 => Some("OfferCreate"),
        8 => Some("OfferCancel"),
        20 => Some("TrustSet"),
        _ => None,
    }
}

/// XRPL transaction restricted to the supported field set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RippleTransaction {
    fields: BTreeMap<Field, FieldValue>,
}

impl RippleTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    pub fn insert(&mut self, field: Field, value: FieldValue) -> Result<()> {
        if value.type_code() != field.type_code() {
            return Err(Error::MalformedPayload(format!("wrong value type for {}", field.name())));
        }
        if let FieldValue::Amount(drops) = value {
            if drops > MAX_DROPS {
                return Err(Error::MalformedPayload(format!("{} exceeds the XRP supply", field.name())));
            }
        }
        self.fields.insert(field, value);
        Ok(())
    }

    pub fn remove(&mut self, field: Field) -> Option<FieldValue> {
        self.fields.remove(&field)
    }

    /// Decode the binary form
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader { data: bytes, pos: 0 };
        let mut tx = Self::new();
        let mut last: Option<Field> = None;

        while !reader.is_empty() {
            let (type_code, field_code) = reader.field_id()?;
            let field = Field::from_codes(type_code, field_code).ok_or_else(|| {
                Error::MalformedPayload(format!(
                    "unsupported field (type {}, code {})",
                    type_code, field_code
                ))
            })?;

            if last.is_some_and(|previous| previous >= field) {
                return Err(Error::MalformedPayload(format!(
                    "{} is duplicated or out of canonical order",
                    field.name()
                )));
            }
            last = Some(field);

            let value = match type_code {
                TYPE_UINT16 => FieldValue::UInt16(u16::from_be_bytes(reader.array()?)),
                TYPE_UINT32 => FieldValue::UInt32(u32::from_be_bytes(reader.array()?)),
                TYPE_AMOUNT => FieldValue::Amount(decode_amount(u64::from_be_bytes(reader.array()?))?),
                TYPE_BLOB => {
                    let len = reader.vl_length()?;
                    FieldValue::Blob(reader.take(len)?.to_vec())
                }
                _ => {
                    let len = reader.vl_length()?;
                    let account: [u8; 20] = reader
                        .take(len)?
                        .try_into()
                        .map_err(|_| Error::MalformedPayload("account id must be 20 bytes".to_string()))?;
                    FieldValue::AccountId(account)
                }
            };

            tx.insert(field, value)?;
        }

        Ok(tx)
    }

    /// Canonical binary form; `signing` leaves out non-signing fields
    pub fn encode(&self, signing: bool) -> Vec<u8> {
        let mut out = Vec::with_capacity(256);

        for (field, value) in &self.fields {
            if signing && !field.is_signing_field() {
                continue;
            }

            write_field_id(&mut out, field.type_code(), field.field_code());
            match value {
                FieldValue::UInt16(v) => out.extend_from_slice(&v.to_be_bytes()),
                FieldValue::UInt32(v) => out.extend_from_slice(&v.to_be_bytes()),
                FieldValue::Amount(drops) => out.extend_from_slice(&(AMOUNT_POSITIVE | drops).to_be_bytes()),
                FieldValue::Blob(bytes) => {
                    write_vl_length(&mut out, bytes.len());
                    out.extend_from_slice(bytes);
                }
                FieldValue::AccountId(account) => {
                    write_vl_length(&mut out, account.len());
                    out.extend_from_slice(account);
                }
            }
        }

        out
    }

    /// Hash that the single signature commits to
    pub fn signing_hash(&self) -> [u8; 32] {
        let mut data = HASH_PREFIX_TX_SIGN.to_vec();
        data.extend_from_slice(&self.encode(true));
        sha512_half(&data)
    }

    /// Transaction id of the fully serialized transaction
    pub fn id(&self) -> [u8; 32] {
        let mut data = HASH_PREFIX_TX_ID.to_vec();
        data.extend_from_slice(&self.encode(false));
        sha512_half(&data)
    }

    /// Fields rendered with their XRPL JSON names
    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();

        for (field, value) in &self.fields {
            let rendered = match (field, value) {
                (Field::TransactionType, FieldValue::UInt16(code)) => transaction_type_name(*code)
                    .map(|name| Value::String(name.to_string()))
                    .unwrap_or_else(|| Value::from(*code)),
                (_, FieldValue::UInt16(v)) => Value::from(*v),
                (_, FieldValue::UInt32(v)) => Value::from(*v),
                (_, FieldValue::Amount(drops)) => Value::String(drops.to_string()),
                (_, FieldValue::Blob(bytes)) => Value::String(hex::encode_upper(bytes)),
                (_, FieldValue::AccountId(account)) => Value::String(ripple::encode_account_id(account)),
            };
            map.insert(field.name().to_string(), rendered);
        }

        map
    }
}

fn decode_amount(raw: u64) -> Result<u64> {
    if raw & AMOUNT_NOT_NATIVE != 0 {
        return Err(Error::MalformedPayload("only native XRP amounts are supported".to_string()));
    }
    if raw & AMOUNT_POSITIVE == 0 {
        return Err(Error::MalformedPayload("negative XRP amount".to_string()));
    }
    Ok(raw & !AMOUNT_POSITIVE)
}

fn write_field_id(out: &mut Vec<u8>, type_code: u8, field_code: u8) {
    match (type_code < 16, field_code < 16) {
        (true, true) => out.push((type_code << 4) | field_code),
        (true, false) => out.extend_from_slice(&[type_code << 4, field_code]),
        (false, true) => out.extend_from_slice(&[field_code, type_code]),
        (false, false) => out.extend_from_slice(&[0, type_code, field_code]),
    }
}

fn write_vl_length(out: &mut Vec<u8>, len: usize) {
    if len <= 192 {
        out.push(len as u8);
    } else if len <= 12_480 {
        let len = len - 193;
        out.extend_from_slice(&[193 + (len >> 8) as u8, (len & 0xff) as u8]);
    } else {
        let len = len - 12_481;
        out.extend_from_slice(&[241 + (len >> 16) as u8, ((len >> 8) & 0xff) as u8, (len & 0xff) as u8]);
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| Error::MalformedPayload("unexpected end of transaction".to_string()))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn field_id(&mut self) -> Result<(u8, u8)> {
        let first = self.byte()?;
        let mut type_code = first >> 4;
        let mut field_code = first & 0x0f;

        if type_code == 0 {
            type_code = self.byte()?;
            if type_code < 16 {
                return Err(Error::MalformedPayload("non-canonical field id".to_string()));
            }
        }
        if field_code == 0 {
            field_code = self.byte()?;
            if field_code < 16 {
                return Err(Error::MalformedPayload("non-canonical field id".to_string()));
            }
        }

        Ok((type_code, field_code))
    }

    fn vl_length(&mut self) -> Result<usize> {
        let b1 = self.byte()? as usize;
        match b1 {
            0..=192 => Ok(b1),
            193..=240 => {
                let b2 = self.byte()? as usize;
                Ok(193 + (b1 - 193) * 256 + b2)
            }
            241..=254 => {
                let b2 = self.byte()? as usize;
                let b3 = self.byte()? as usize;
                Ok(12_481 + (b1 - 241) * 65_536 + b2 * 256 + b3)
            }
            _ => Err(Error::MalformedPayload("invalid length prefix".to_string())),
        }
    }
}

/// Ripple transaction
#[derive(Debug, Clone, Serialize)]
pub struct DecodedRippleTransaction {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Transaction id, present once signed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

/// Decode a hex-encoded binary transaction
pub fn decode_transaction(payload: &str) -> Result<DecodedRippleTransaction> {
    let tx = RippleTransaction::decode(&decode_hex_payload(payload)?)?;

    Ok(DecodedRippleTransaction {
        fields: tx.to_json_map(),
        hash: tx
            .get(Field::TxnSignature)
            .map(|_| hex::encode_upper(tx.id())),
    })
}

/// Sign a hex-encoded binary transaction and return the signed blob
pub fn sign_transaction(payload: &str, key_pair: &KeyPair) -> Result<String> {
    let mut tx = RippleTransaction::decode(&decode_hex_payload(payload)?)?;

    match tx.get(Field::Account) {
        Some(FieldValue::AccountId(account)) if *account == ripple::account_id(key_pair) => {}
        Some(_) => {
            return Err(Error::MalformedPayload(
                "transaction Account is not this wallet's account".to_string(),
            ))
        }
        None => return Err(Error::MalformedPayload("transaction has no Account".to_string())),
    }

    tx.remove(Field::TxnSignature);
    tx.insert(Field::SigningPubKey, FieldValue::Blob(key_pair.public_key_compressed().to_vec()))?;

    let signature = key_pair.sign_ecdsa(tx.signing_hash()).serialize_der();
    tx.insert(Field::TxnSignature, FieldValue::Blob(signature.to_vec()))?;

    Ok(hex::encode_upper(tx.encode(false)))
}
