//! Common transaction payload helpers

use serde::Serialize;

use crate::error::{Error, Result};

/// Decode a hex payload; surrounding whitespace and a `0x` prefix are accepted
pub fn decode_hex_payload(payload: &str) -> Result<Vec<u8>> {
    let trimmed = payload.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(Error::MalformedPayload("empty payload".to_string()));
    }

    hex::decode(digits).map_err(|e| Error::MalformedPayload(format!("invalid hex: {}", e)))
}

/// Render a decoded transaction for display
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::MalformedPayload(format!("failed to render transaction: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_payload() {
        assert_eq!(decode_hex_payload("0xdead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(decode_hex_payload("  BEEF\n").unwrap(), vec![0xbe, 0xef]);
        assert!(matches!(decode_hex_payload("0x"), Err(Error::MalformedPayload(_))));
        assert!(matches!(decode_hex_payload("xyz"), Err(Error::MalformedPayload(_))));
    }
}
