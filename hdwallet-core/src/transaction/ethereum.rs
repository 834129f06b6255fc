//! Ethereum transaction functionality
//!
//! Payloads are unsigned RLP transactions, either legacy (EIP-155 style with
//! the chain id in the trailing fields) or EIP-1559 typed (`0x02` prefix).

use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Eip1559TransactionRequest, NameOrAddress, TransactionRequest, U256};
use ethers_core::utils::rlp::{Decodable, Rlp};
use ethers_core::utils::to_checksum;
use ethers_signers::{LocalWallet, Signer};
use serde::Serialize;

use crate::crypto::keys::KeyPair;
use crate::error::{Error, Result};
use super::types::decode_hex_payload;

/// Chain id used when the payload does not carry one
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// `transfer(address,uint256)`
pub const ERC20_TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

const EIP1559_TX_TYPE: u8 = 0x02;

/// ERC20 transfer carried in the calldata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenTransfer {
    /// Token symbol the transaction was routed under
    pub token: String,
    /// Recipient address
    pub recipient: String,
    /// Amount in the token's base units
    pub amount: String,
}

/// Ethereum transaction
#[derive(Debug, Clone, Serialize)]
pub struct DecodedEthereumTransaction {
    /// `legacy` or `eip1559`
    pub tx_type: &'static str,
    /// Nonce
    pub nonce: String,
    /// Gas price (legacy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    /// Max fee per gas (EIP-1559)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<String>,
    /// Max priority fee per gas (EIP-1559)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<String>,
    /// Gas limit
    pub gas_limit: String,
    /// To address, absent for contract creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Value in wei
    pub value: String,
    /// Calldata
    pub data: String,
    /// Chain ID
    pub chain_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_transfer: Option<TokenTransfer>,
}

const LEGACY_UNSIGNED_FIELDS: usize = 6;
const LEGACY_EIP155_FIELDS: usize = 9;
const EIP1559_UNSIGNED_FIELDS: usize = 9;

fn item_count(rlp: &Rlp) -> Result<usize> {
    if !rlp.is_list() {
        return Err(Error::MalformedPayload("payload is not an RLP list".to_string()));
    }
    rlp.item_count()
        .map_err(|e| Error::MalformedPayload(format!("invalid RLP list: {}", e)))
}

/// A legacy payload is either the six base fields or the EIP-155 form whose
/// trailing `r` and `s` are empty; anything else carries a signature
fn check_legacy_unsigned(rlp: &Rlp) -> Result<()> {
    match item_count(rlp)? {
        LEGACY_UNSIGNED_FIELDS => Ok(()),
        LEGACY_EIP155_FIELDS => {
            let empty = |index: usize| rlp.at(index).map(|item| item.is_empty()).unwrap_or(false);
            if empty(7) && empty(8) {
                Ok(())
            } else {
                Err(Error::MalformedPayload("legacy transaction is already signed".to_string()))
            }
        }
        count => Err(Error::MalformedPayload(format!(
            "legacy transaction has {} fields, expected {} or {}",
            count, LEGACY_UNSIGNED_FIELDS, LEGACY_EIP155_FIELDS
        ))),
    }
}

/// Parse an unsigned RLP payload
pub fn parse_unsigned(payload: &str) -> Result<TypedTransaction> {
    let bytes = decode_hex_payload(payload)?;

    match bytes[0] {
        EIP1559_TX_TYPE => {
            let rlp = Rlp::new(&bytes[1..]);
            let count = item_count(&rlp)?;
            if count != EIP1559_UNSIGNED_FIELDS {
                return Err(Error::MalformedPayload(format!(
                    "EIP-1559 transaction has {} fields, expected {}",
                    count, EIP1559_UNSIGNED_FIELDS
                )));
            }
            <Eip1559TransactionRequest as Decodable>::decode(&rlp)
                .map(TypedTransaction::Eip1559)
                .map_err(|e| Error::MalformedPayload(format!("invalid EIP-1559 transaction: {}", e)))
        }
        first if first >= 0xc0 => {
            let rlp = Rlp::new(&bytes);
            check_legacy_unsigned(&rlp)?;
            TransactionRequest::decode_unsigned_rlp(&rlp)
                .map(TypedTransaction::Legacy)
                .map_err(|e| Error::MalformedPayload(format!("invalid legacy transaction: {}", e)))
        }
        other => Err(Error::MalformedPayload(format!("unsupported transaction type 0x{:02x}", other))),
    }
}

/// Recognise an ERC20 `transfer` call
pub fn parse_erc20_transfer(data: &[u8], token: &str) -> Option<TokenTransfer> {
    if data.len() != 68 || data[..4] != ERC20_TRANSFER_SELECTOR {
        return None;
    }

    let recipient_word = &data[4..36];
    if recipient_word[..12].iter().any(|&b| b != 0) {
        return None;
    }

    let recipient = ethers_core::types::Address::from_slice(&recipient_word[12..]);
    let amount = U256::from_big_endian(&data[36..68]);

    Some(TokenTransfer {
        token: token.to_string(),
        recipient: to_checksum(&recipient, None),
        amount: amount.to_string(),
    })
}

fn render_to(to: Option<&NameOrAddress>) -> Option<String> {
    match to {
        Some(NameOrAddress::Address(address)) => Some(to_checksum(address, None)),
        Some(NameOrAddress::Name(name)) => Some(name.clone()),
        None => None,
    }
}

fn render_u256(value: Option<&U256>) -> String {
    value.copied().unwrap_or_default().to_string()
}

/// Decode a payload; `token` is set when routed under an ERC20 symbol
pub fn decode_transaction(payload: &str, token: Option<&str>) -> Result<DecodedEthereumTransaction> {
    let tx = parse_unsigned(payload)?;

    let data = tx.data().map(|data| data.to_vec()).unwrap_or_default();
    let token_transfer = token.and_then(|token| parse_erc20_transfer(&data, token));

    let (tx_type, gas_price, max_fee_per_gas, max_priority_fee_per_gas) = match &tx {
        TypedTransaction::Eip1559(inner) => (
            "eip1559",
            None,
            Some(render_u256(inner.max_fee_per_gas.as_ref())),
            Some(render_u256(inner.max_priority_fee_per_gas.as_ref())),
        ),
        _ => ("legacy", Some(render_u256(tx.gas_price().as_ref())), None, None),
    };

    Ok(DecodedEthereumTransaction {
        tx_type,
        nonce: render_u256(tx.nonce()),
        gas_price,
        max_fee_per_gas,
        max_priority_fee_per_gas,
        gas_limit: render_u256(tx.gas()),
        to: render_to(tx.to()),
        value: render_u256(tx.value()),
        data: format!("0x{}", hex::encode(&data)),
        chain_id: tx.chain_id().map(|id| id.as_u64()).unwrap_or(DEFAULT_CHAIN_ID),
        token_transfer,
    })
}

/// Sign a payload and return the `0x`-prefixed signed raw transaction
pub fn sign_transaction(payload: &str, key_pair: &KeyPair) -> Result<String> {
    let mut tx = parse_unsigned(payload)?;
    let chain_id = tx.chain_id().map(|id| id.as_u64()).unwrap_or(DEFAULT_CHAIN_ID);
    tx.set_chain_id(chain_id);

    let secret = key_pair.secret_bytes();
    let wallet = LocalWallet::from_bytes(secret.as_slice())
        .map_err(|e| Error::SigningFailed(format!("invalid signing key: {}", e)))?
        .with_chain_id(chain_id);

    let signature = wallet
        .sign_transaction_sync(&tx)
        .map_err(|e| Error::SigningFailed(e.to_string()))?;

    Ok(format!("0x{}", hex::encode(tx.rlp_signed(&signature))))
}
