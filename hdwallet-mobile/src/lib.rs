//! HD Wallet Mobile - host-neutral binding surface
//!
//! Every function takes and returns printable strings: entropy as hex,
//! keys and signatures in each chain's customary text encoding. Host
//! bindings wrap these functions one to one.

use hdwallet_core::{HdWallet, MnemonicStrength, Network, WalletOptions};
use zeroize::Zeroizing;

pub use hdwallet_core::{Error, Result};

/// Generate a new 12-word mnemonic from 128 bits of OS entropy
pub fn new_mnemonic() -> Result<String> {
    hdwallet_core::generate_mnemonic(MnemonicStrength::Words12)
}

/// Encode hex entropy as a mnemonic phrase
pub fn mnemonic_from_entropy(entropy_hex: &str) -> Result<String> {
    let entropy = Zeroizing::new(
        hex::decode(entropy_hex.trim())
            .map_err(|e| Error::InvalidEntropy(format!("entropy is not hex: {}", e)))?,
    );
    hdwallet_core::mnemonic_from_entropy(&entropy)
}

/// Recover the hex entropy behind a mnemonic phrase
pub fn entropy_from_mnemonic(mnemonic: &str) -> Result<String> {
    let entropy = hdwallet_core::entropy_from_mnemonic(mnemonic)?;
    Ok(hex::encode(entropy.as_slice()))
}

/// Check a mnemonic phrase, including its checksum
pub fn validate_mnemonic(mnemonic: &str) -> Result<()> {
    hdwallet_core::validate_mnemonic(mnemonic)
}

/// Open a wallet session from a mnemonic phrase
pub fn new_hd_wallet_from_mnemonic(mnemonic: &str, test_net: bool) -> Result<Wallet> {
    Ok(Wallet {
        inner: HdWallet::from_mnemonic(mnemonic, Network::from_test_net(test_net))?,
    })
}

/// Open a wallet session from a mnemonic phrase protected by a passphrase
pub fn new_hd_wallet_with_passphrase(mnemonic: &str, passphrase: &str, test_net: bool) -> Result<Wallet> {
    let options = WalletOptions::new(Network::from_test_net(test_net)).with_passphrase(passphrase);
    Ok(Wallet {
        inner: HdWallet::with_options(mnemonic, options)?,
    })
}

/// Space-separated list of supported coin symbols
pub fn get_available_coin_list() -> String {
    hdwallet_core::available_coin_list()
}

/// A wallet session as seen by host code
#[derive(Debug)]
pub struct Wallet {
    inner: HdWallet,
}

impl Wallet {
    pub fn is_test_net(&self) -> bool {
        self.inner.network().is_testnet()
    }

    pub fn derive_address(&self, symbol: &str) -> Result<String> {
        self.inner.derive_address(symbol)
    }

    pub fn derive_public_key(&self, symbol: &str) -> Result<String> {
        self.inner.derive_public_key(symbol)
    }

    /// The host takes ownership of the returned copy; the internal buffer is wiped
    pub fn derive_private_key(&self, symbol: &str) -> Result<String> {
        let private_key = self.inner.derive_private_key(symbol)?;
        Ok(private_key.as_str().to_owned())
    }

    pub fn decode_tx(&self, symbol: &str, payload: &str) -> Result<String> {
        self.inner.decode_tx(symbol, payload)
    }

    pub fn sign(&self, symbol: &str, payload: &str) -> Result<String> {
        self.inner.sign(symbol, payload)
    }
}
