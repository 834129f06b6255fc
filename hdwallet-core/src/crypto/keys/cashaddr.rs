//! CashAddr encoding for Bitcoin Cash addresses

use crate::network::Network;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Version byte for a P2PKH address with a 160-bit hash
const P2PKH_VERSION: u8 = 0x00;

pub fn prefix(network: Network) -> &'static str {
    match network {
        Network::Mainnet => "bitcoincash",
        Network::Testnet => "bchtest",
    }
}

fn polymod(values: &[u8]) -> u64 {
    const GENERATORS: [u64; 5] = [
        0x98f2bc8e61,
        0x79b76d99e2,
        0xf33e5fb3c4,
        0xae2eabe2a8,
        0x1e4f43e470,
    ];

    let mut c: u64 = 1;
    for &d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(d);
        for (i, generator) in GENERATORS.iter().enumerate() {
            if c0 & (1 << i) != 0 {
                c ^= generator;
            }
        }
    }
    c ^ 1
}

/// Regroup 8-bit bytes into 5-bit groups, zero padded
fn to_base32(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity((data.len() * 8 + 4) / 5);
    let mut acc: u32 = 0;
    let mut bits = 0;

    for &byte in data {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(((acc >> bits) & 0x1f) as u8);
        }
    }
    if bits > 0 {
        out.push(((acc << (5 - bits)) & 0x1f) as u8);
    }
    out
}

/// Encode a P2PKH key hash as a CashAddr string with prefix
pub fn encode_p2pkh(hash: &[u8; 20], network: Network) -> String {
    let prefix = prefix(network);

    let mut payload = Vec::with_capacity(21);
    payload.push(P2PKH_VERSION);
    payload.extend_from_slice(hash);
    let payload = to_base32(&payload);

    let mut checksum_input: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    checksum_input.push(0);
    checksum_input.extend_from_slice(&payload);
    checksum_input.extend_from_slice(&[0u8; 8]);
    let checksum = polymod(&checksum_input);

    let mut address = String::with_capacity(prefix.len() + 1 + payload.len() + 8);
    address.push_str(prefix);
    address.push(':');
    for &d in &payload {
        address.push(CHARSET[d as usize] as char);
    }
    for i in 0..8 {
        let d = (checksum >> (5 * (7 - i))) & 0x1f;
        address.push(CHARSET[d as usize] as char);
    }
    address
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vector() {
        let hash: [u8; 20] = hex::decode("F5BF48B397DAE70BE82B3CCA4793F8EB2B6CDAC9")
            .unwrap()
            .try_into()
            .unwrap();

        assert_eq!(
            encode_p2pkh(&hash, Network::Mainnet),
            "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2"
        );
    }

    #[test]
    fn test_testnet_prefix() {
        let address = encode_p2pkh(&[0u8; 20], Network::Testnet);
        assert!(address.starts_with("bchtest:q"));
        assert_eq!(address.len(), "bchtest:".len() + 42);
    }
}
