//! BIP32 key derivation over secp256k1

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use secp256k1::ecdsa::{RecoverableSignature, Signature};
use secp256k1::{All, Message, PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::mnemonic::Seed;
use crate::error::{Error, Result};

/// Offset marking a hardened child index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// A parsed BIP32 derivation path such as `m/44'/0'/0'/0/0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// BIP44 path for the first external address of account 0
    pub fn bip44(coin_type: u32) -> Self {
        Self(vec![
            44 | HARDENED_OFFSET,
            coin_type | HARDENED_OFFSET,
            HARDENED_OFFSET,
            0,
            0,
        ])
    }

    /// Child indices, hardened ones carrying [`HARDENED_OFFSET`]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let rest = path
            .strip_prefix('m')
            .ok_or_else(|| Error::DerivationFailed(format!("Invalid derivation path: {}", path)))?;

        let mut result = Vec::new();
        if rest.is_empty() {
            return Ok(Self(result));
        }

        let rest = rest
            .strip_prefix('/')
            .ok_or_else(|| Error::DerivationFailed(format!("Invalid derivation path: {}", path)))?;

        for component in rest.split('/') {
            let (digits, hardened) = match component.strip_suffix('\'').or_else(|| component.strip_suffix('h')) {
                Some(digits) => (digits, true),
                None => (component, false),
            };

            let index = digits.parse::<u32>().map_err(|_| {
                Error::DerivationFailed(format!("Invalid derivation path component: {}", component))
            })?;
            if index >= HARDENED_OFFSET {
                return Err(Error::DerivationFailed(format!(
                    "Derivation path component out of range: {}",
                    component
                )));
            }

            result.push(if hardened { index | HARDENED_OFFSET } else { index });
        }

        Ok(Self(result))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for index in &self.0 {
            if index & HARDENED_OFFSET != 0 {
                write!(f, "/{}'", index & !HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

/// A secp256k1 key pair derived for one chain.
///
/// The secret scalar is erased when the pair is dropped.
pub struct KeyPair {
    secp: Secp256k1<All>,
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Build a key pair from a raw 32-byte secret
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secp = Secp256k1::new();
        let secret_key = SecretKey::from_slice(bytes)
            .map_err(|e| Error::DerivationFailed(format!("Invalid secret key: {}", e)))?;
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);

        Ok(Self {
            secp,
            secret_key,
            public_key,
        })
    }

    /// Raw secret bytes in a buffer that is wiped on drop
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.secret_key.secret_bytes())
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// SEC1 compressed public key (33 bytes)
    pub fn public_key_compressed(&self) -> [u8; 33] {
        self.public_key.serialize()
    }

    /// SEC1 uncompressed public key (65 bytes, leading 0x04)
    pub fn public_key_uncompressed(&self) -> [u8; 65] {
        self.public_key.serialize_uncompressed()
    }

    /// ECDSA signature (low-S normalized) over a 32-byte digest
    pub fn sign_ecdsa(&self, digest: [u8; 32]) -> Signature {
        let message = Message::from_digest(digest);
        self.secp.sign_ecdsa(&message, &self.secret_key)
    }

    /// Recoverable ECDSA signature over a 32-byte digest
    pub fn sign_recoverable(&self, digest: [u8; 32]) -> RecoverableSignature {
        let message = Message::from_digest(digest);
        self.secp.sign_ecdsa_recoverable(&message, &self.secret_key)
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.secret_key.non_secure_erase();
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &hex::encode(self.public_key_compressed()))
            .finish_non_exhaustive()
    }
}

/// Derive the key pair at `path` from a seed
pub fn derive_key_pair(seed: &Seed, path: &DerivationPath) -> Result<KeyPair> {
    if seed.is_empty() {
        return Err(Error::EmptySeed);
    }

    let secp = Secp256k1::new();

    // Derive the master key
    let (mut secret_key, mut chain_code) = derive_master_key(seed.as_bytes())?;

    // Derive the child keys
    for &index in path.as_slice() {
        (secret_key, chain_code) = derive_child_key(&secp, &secret_key, &chain_code, index)?;
    }

    let secret_key = SecretKey::from_slice(secret_key.as_slice())
        .map_err(|e| Error::DerivationFailed(format!("Invalid secret key: {}", e)))?;
    let public_key = PublicKey::from_secret_key(&secp, &secret_key);

    Ok(KeyPair {
        secp,
        secret_key,
        public_key,
    })
}

type KeyMaterial = (Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>);

fn split_hmac_output(output: &[u8]) -> KeyMaterial {
    let mut key = Zeroizing::new([0u8; 32]);
    let mut chain_code = Zeroizing::new([0u8; 32]);

    key.copy_from_slice(&output[0..32]);
    chain_code.copy_from_slice(&output[32..64]);

    (key, chain_code)
}

/// Derive the master key from a seed
fn derive_master_key(seed: &[u8]) -> Result<KeyMaterial> {
    let mut hmac = Hmac::<Sha512>::new_from_slice(b"Bitcoin seed")
        .map_err(|_| Error::DerivationFailed("HMAC error".to_string()))?;

    hmac.update(seed);
    let mut output = hmac.finalize().into_bytes();
    let (key, chain_code) = split_hmac_output(output.as_slice());
    output.as_mut_slice().zeroize();

    SecretKey::from_slice(key.as_slice())
        .map_err(|e| Error::DerivationFailed(format!("Invalid master key: {}", e)))?;

    Ok((key, chain_code))
}

/// Derive a child key from a parent key
fn derive_child_key(
    secp: &Secp256k1<All>,
    parent_key: &[u8; 32],
    parent_chain_code: &[u8; 32],
    index: u32,
) -> Result<KeyMaterial> {
    let parent_secret_key = SecretKey::from_slice(parent_key)
        .map_err(|e| Error::DerivationFailed(format!("Invalid parent key: {}", e)))?;

    let mut data = Zeroizing::new(Vec::with_capacity(37));

    if index >= HARDENED_OFFSET {
        data.push(0);
        data.extend_from_slice(parent_key);
    } else {
        let parent_public_key = PublicKey::from_secret_key(secp, &parent_secret_key);
        data.extend_from_slice(&parent_public_key.serialize());
    }
    data.extend_from_slice(&index.to_be_bytes());

    let mut hmac = Hmac::<Sha512>::new_from_slice(parent_chain_code)
        .map_err(|_| Error::DerivationFailed("HMAC error".to_string()))?;

    hmac.update(&data);
    let mut output = hmac.finalize().into_bytes();
    let (tweak, child_chain_code) = split_hmac_output(output.as_slice());
    output.as_mut_slice().zeroize();

    // child = parse256(IL) + parent (mod n); IL >= n or a zero child is invalid
    let child_secret_key = SecretKey::from_slice(tweak.as_slice())
        .map_err(|e| Error::DerivationFailed(format!("Invalid child key: {}", e)))?
        .add_tweak(&Scalar::from(parent_secret_key))
        .map_err(|e| Error::DerivationFailed(format!("Key addition error: {}", e)))?;

    Ok((Zeroizing::new(child_secret_key.secret_bytes()), child_chain_code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_derivation_path() {
        let path: DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
        assert_eq!(path, DerivationPath::bip44(60));
        assert_eq!(path.to_string(), "m/44'/60'/0'/0/0");

        let path: DerivationPath = "m/44h/0h/1".parse().unwrap();
        assert_eq!(path.as_slice(), &[44 | HARDENED_OFFSET, HARDENED_OFFSET, 1]);

        let root: DerivationPath = "m".parse().unwrap();
        assert!(root.as_slice().is_empty());
    }

    #[test]
    fn test_invalid_derivation_path() {
        for path in ["", "44'/0'", "m/", "m/x", "m/44'/-1", "m//0", "m/2147483648"] {
            assert!(
                matches!(path.parse::<DerivationPath>(), Err(Error::DerivationFailed(_))),
                "{} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_bip32_vector_1() {
        // BIP32 test vector 1, chain m/0'/1
        let seed = Seed::from_bytes(&hex::decode("000102030405060708090a0b0c0d0e0f").unwrap()).unwrap();

        let master = derive_key_pair(&seed, &"m".parse().unwrap()).unwrap();
        assert_eq!(
            hex::encode(master.secret_bytes().as_slice()),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );

        let child = derive_key_pair(&seed, &"m/0'/1".parse().unwrap()).unwrap();
        assert_eq!(
            hex::encode(child.secret_bytes().as_slice()),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
        assert_eq!(
            hex::encode(child.public_key_compressed()),
            "03501e454bf00751f24b1b489aa925215d66af2234e3891c3b21a52bedb3cd711c"
        );
    }

    #[test]
    fn test_signatures_verify() {
        let key = KeyPair::from_secret_bytes(&[0x11; 32]).unwrap();
        let digest = crate::crypto::hash::sha256(b"message");

        let signature = key.sign_ecdsa(digest);
        let secp = Secp256k1::verification_only();
        assert!(secp
            .verify_ecdsa(&Message::from_digest(digest), &signature, key.public_key())
            .is_ok());

        let recoverable = key.sign_recoverable(digest);
        let recovered = secp.recover_ecdsa(&Message::from_digest(digest), &recoverable).unwrap();
        assert_eq!(&recovered, key.public_key());
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = KeyPair::from_secret_bytes(&[0x11; 32]).unwrap();
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains(&hex::encode([0x11u8; 32])));
    }
}
