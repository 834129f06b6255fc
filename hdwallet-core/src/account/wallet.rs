//! Wallet session implementation

use std::fmt;

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::coin::{create_coin, supported_symbols, Coin};
use crate::crypto::mnemonic::{seed_from_mnemonic, Seed};
use crate::error::{Error, Result};
use crate::network::Network;

/// Options for opening a wallet session
#[derive(Clone, Default)]
pub struct WalletOptions {
    /// Network every derivation targets
    pub network: Network,
    /// Optional BIP39 passphrase
    pub passphrase: Zeroizing<String>,
}

impl WalletOptions {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            passphrase: Zeroizing::default(),
        }
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Zeroizing::new(passphrase.into());
        self
    }
}

impl fmt::Debug for WalletOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletOptions")
            .field("network", &self.network)
            .field("passphrase", &if self.passphrase.is_empty() { "" } else { "[REDACTED]" })
            .finish()
    }
}

/// An HD wallet session: one seed and one network for its whole lifetime.
///
/// The session never changes after construction and caches nothing; every
/// call derives fresh key material from the seed through the chain module
/// registered for the requested symbol.
pub struct HdWallet {
    seed: Seed,
    network: Network,
}

impl HdWallet {
    /// Open a session from a mnemonic phrase with no passphrase
    pub fn from_mnemonic(mnemonic: &str, network: Network) -> Result<Self> {
        Self::with_options(mnemonic, WalletOptions::new(network))
    }

    /// Open a session from a mnemonic phrase
    pub fn with_options(mnemonic: &str, options: WalletOptions) -> Result<Self> {
        let seed = seed_from_mnemonic(mnemonic, &options.passphrase).map_err(|e| {
            warn!(error = %e, "rejected mnemonic");
            e
        })?;

        Self::from_seed(seed, options.network)
    }

    /// Open a session from an existing seed
    pub fn from_seed(seed: Seed, network: Network) -> Result<Self> {
        if seed.is_empty() {
            warn!("rejected empty seed");
            return Err(Error::EmptySeed);
        }

        debug!(%network, "wallet session ready");
        Ok(Self { seed, network })
    }

    /// Network of this session
    pub fn network(&self) -> Network {
        self.network
    }

    /// Symbols this session can serve
    pub fn supported_symbols(&self) -> Vec<&'static str> {
        supported_symbols()
    }

    fn coin(&self, symbol: &str, operation: &'static str) -> Result<Box<dyn Coin + '_>> {
        debug!(symbol, network = %self.network, operation, "dispatching");
        create_coin(symbol, &self.seed, self.network)
    }

    pub fn derive_address(&self, symbol: &str) -> Result<String> {
        self.coin(symbol, "derive_address")?.derive_address()
    }

    pub fn derive_public_key(&self, symbol: &str) -> Result<String> {
        self.coin(symbol, "derive_public_key")?.derive_public_key()
    }

    /// Private key for `symbol`, derived on every call and wiped on drop
    pub fn derive_private_key(&self, symbol: &str) -> Result<Zeroizing<String>> {
        self.coin(symbol, "derive_private_key")?.derive_private_key()
    }

    /// Inspectable JSON form of a chain-specific payload
    pub fn decode_tx(&self, symbol: &str, payload: &str) -> Result<String> {
        self.coin(symbol, "decode_tx")?.decode_tx(payload)
    }

    /// Sign a payload with the key of `symbol`.
    ///
    /// The key is derived for this call only and wiped when it returns.
    /// Either the complete signed output or an error comes back.
    pub fn sign(&self, symbol: &str, payload: &str) -> Result<String> {
        let coin = self.coin(symbol, "sign")?;
        let key_pair = coin.key_pair()?;

        coin.sign(payload, &key_pair).map_err(|e| {
            warn!(symbol, error = %e.kind(), "signing rejected");
            e
        })
    }
}

impl fmt::Debug for HdWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdWallet")
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_wallet_from_mnemonic() {
        let wallet = HdWallet::from_mnemonic(MNEMONIC, Network::Mainnet).unwrap();

        assert_eq!(wallet.network(), Network::Mainnet);
        assert_eq!(
            wallet.derive_address("BTC").unwrap(),
            "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA"
        );
    }

    #[test]
    fn test_invalid_mnemonic_rejected() {
        let result = HdWallet::from_mnemonic("abandon abandon abandon", Network::Mainnet);
        assert!(matches!(result, Err(Error::InvalidMnemonic(_))));
    }

    #[test]
    fn test_passphrase_changes_keys() {
        let plain = HdWallet::from_mnemonic(MNEMONIC, Network::Mainnet).unwrap();
        let protected = HdWallet::with_options(
            MNEMONIC,
            WalletOptions::new(Network::Mainnet).with_passphrase("TREZOR"),
        )
        .unwrap();

        assert_ne!(
            plain.derive_address("ETH").unwrap(),
            protected.derive_address("ETH").unwrap()
        );
    }

    #[test]
    fn test_unknown_coin() {
        let wallet = HdWallet::from_mnemonic(MNEMONIC, Network::Mainnet).unwrap();

        assert_eq!(
            wallet.derive_address("NOT_A_COIN").unwrap_err(),
            Error::UnknownCoin("NOT_A_COIN".to_string())
        );
        assert!(matches!(wallet.sign("NOT_A_COIN", "00"), Err(Error::UnknownCoin(_))));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let wallet = HdWallet::from_mnemonic(MNEMONIC, Network::Testnet).unwrap();
        let rendered = format!("{:?}", wallet);
        assert_eq!(rendered, "HdWallet { network: Testnet, .. }");

        let options = WalletOptions::new(Network::Mainnet).with_passphrase("hunter2");
        assert!(!format!("{:?}", options).contains("hunter2"));
    }
}
