//! Mnemonic phrase generation and handling
//!
//! Entropy <-> mnemonic conversion and mnemonic -> seed stretching, following
//! BIP39 with the English wordlist. Every path that accepts a phrase performs
//! full checksum validation before any entropy or seed byte is produced.

use std::fmt;

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{Error, Result};

/// Byte length of a BIP39 seed (PBKDF2-HMAC-SHA512 output)
pub const SEED_LEN: usize = 64;

const MIN_ENTROPY_BITS: usize = 128;
const MAX_ENTROPY_BITS: usize = 256;

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bits
    pub fn entropy_bits(&self) -> usize {
        match self {
            Self::Words12 => 128,
            Self::Words24 => 256,
        }
    }
}

/// Binary seed derived from a mnemonic phrase.
///
/// Not `Clone`; the buffer is wiped when the value is dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed(Vec<u8>);

impl Seed {
    /// Wrap raw seed bytes. An empty slice is rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::EmptySeed);
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Raw seed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed([REDACTED; {} bytes])", self.0.len())
    }
}

fn check_entropy_bits(bits: usize) -> Result<()> {
    if bits % 32 != 0 || !(MIN_ENTROPY_BITS..=MAX_ENTROPY_BITS).contains(&bits) {
        return Err(Error::InvalidEntropy(format!(
            "entropy length must be a multiple of 32 bits in [{}, {}], got {}",
            MIN_ENTROPY_BITS, MAX_ENTROPY_BITS, bits
        )));
    }
    Ok(())
}

fn parse(phrase: &str) -> Result<Mnemonic> {
    Mnemonic::parse_normalized(phrase).map_err(|e| match e {
        bip39::Error::BadEntropyBitCount(bits) => {
            Error::InvalidEntropy(format!("bad entropy bit count: {}", bits))
        }
        other => Error::InvalidMnemonic(other.to_string()),
    })
}

/// Generate `bit_size / 8` bytes of entropy from the operating system CSPRNG
pub fn new_entropy(bit_size: usize) -> Result<Zeroizing<Vec<u8>>> {
    check_entropy_bits(bit_size)?;

    let mut entropy = Zeroizing::new(vec![0u8; bit_size / 8]);
    OsRng.fill_bytes(&mut entropy);
    Ok(entropy)
}

/// Encode entropy as a mnemonic phrase
pub fn mnemonic_from_entropy(entropy: &[u8]) -> Result<String> {
    check_entropy_bits(entropy.len() * 8)?;

    let mnemonic = Mnemonic::from_entropy(entropy)
        .map_err(|e| Error::InvalidEntropy(e.to_string()))?;

    Ok(mnemonic.to_string())
}

/// Recover the entropy a mnemonic phrase was generated from
pub fn entropy_from_mnemonic(phrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    let mnemonic = parse(phrase)?;
    Ok(Zeroizing::new(mnemonic.to_entropy()))
}

/// Generate a new random mnemonic phrase with the specified strength
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<String> {
    let entropy = new_entropy(strength.entropy_bits())?;
    mnemonic_from_entropy(&entropy)
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> Result<()> {
    parse(phrase).map(|_| ())
}

/// Derive the BIP39 seed from a mnemonic phrase and passphrase
pub fn seed_from_mnemonic(phrase: &str, passphrase: &str) -> Result<Seed> {
    let mnemonic = parse(phrase)?;

    let mut bytes = mnemonic.to_seed(passphrase);
    let seed = Seed(bytes.to_vec());
    bytes.zeroize();

    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_mnemonic() {
        let mnemonic = generate_mnemonic(MnemonicStrength::Words12).unwrap();
        assert!(validate_mnemonic(&mnemonic).is_ok());
        assert_eq!(mnemonic.split_whitespace().count(), 12);

        let mnemonic = generate_mnemonic(MnemonicStrength::Words24).unwrap();
        assert_eq!(mnemonic.split_whitespace().count(), 24);
    }

    #[test]
    fn test_new_entropy_lengths() {
        for bits in [128, 160, 192, 224, 256] {
            assert_eq!(new_entropy(bits).unwrap().len(), bits / 8);
        }
        for bits in [0, 96, 100, 129, 288] {
            assert!(matches!(new_entropy(bits), Err(Error::InvalidEntropy(_))));
        }
    }

    #[test]
    fn test_validate_mnemonic() {
        let invalid = "invalid mnemonic phrase test test test test test test test test test";

        assert!(validate_mnemonic(ABANDON_ABOUT).is_ok());
        assert!(matches!(validate_mnemonic(invalid), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_checksum_rejected() {
        // Every word is in the wordlist but the last word breaks the checksum
        let bad = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(matches!(validate_mnemonic(bad), Err(Error::InvalidMnemonic(_))));
        assert!(matches!(seed_from_mnemonic(bad, ""), Err(Error::InvalidMnemonic(_))));
        assert!(matches!(entropy_from_mnemonic(bad), Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_zero_entropy_vector() {
        let mnemonic = mnemonic_from_entropy(&[0u8; 16]).unwrap();
        assert_eq!(mnemonic, ABANDON_ABOUT);

        let entropy = entropy_from_mnemonic(&mnemonic).unwrap();
        assert_eq!(entropy.as_slice(), &[0u8; 16]);
    }

    #[test]
    fn test_invalid_entropy_length() {
        assert!(matches!(mnemonic_from_entropy(&[0u8; 15]), Err(Error::InvalidEntropy(_))));
        assert!(matches!(mnemonic_from_entropy(&[]), Err(Error::InvalidEntropy(_))));
        assert!(matches!(mnemonic_from_entropy(&[0u8; 36]), Err(Error::InvalidEntropy(_))));
    }

    #[test]
    fn test_seed_from_mnemonic() {
        let seed = seed_from_mnemonic(ABANDON_ABOUT, "").unwrap();

        assert_eq!(seed.len(), SEED_LEN);
        assert_eq!(hex::encode(&seed.as_bytes()[0..8]), "5eb00bbddcf06908");
    }

    #[test]
    fn test_seed_with_passphrase() {
        let seed = seed_from_mnemonic(ABANDON_ABOUT, "TREZOR").unwrap();
        assert_eq!(
            hex::encode(seed.as_bytes()),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_seed_debug_is_redacted() {
        let seed = seed_from_mnemonic(ABANDON_ABOUT, "").unwrap();
        let rendered = format!("{:?}", seed);
        assert!(!rendered.contains("5eb00bbd"));
    }

    #[test]
    fn test_secret_types_wipe_on_drop() {
        fn assert_wiped<T: ZeroizeOnDrop>() {}
        assert_wiped::<Mnemonic>();
        assert_wiped::<Seed>();
    }

    #[test]
    fn test_empty_seed_rejected() {
        assert!(matches!(Seed::from_bytes(&[]), Err(Error::EmptySeed)));
    }
}
