//! Chain modules
//!
//! Every supported asset is served by a chain module implementing [`Coin`].
//! Modules are short-lived values built per request from the session's seed
//! and network; they hold no state of their own and never outlive the call
//! that created them.

use std::fmt;

use zeroize::Zeroizing;

use crate::crypto::keys::{derive_key_pair, DerivationPath, KeyPair};
use crate::crypto::mnemonic::Seed;
use crate::error::Result;
use crate::network::Network;

pub mod registry;
mod bitcoin;
mod bitcoin_cash;
mod omni;
mod ethereum;
mod tron;
mod ripple;

pub use registry::*;
pub use self::bitcoin::{bitcoin_path, create_bitcoin, Bitcoin};
pub use self::bitcoin_cash::{bitcoin_cash_path, create_bitcoin_cash, BitcoinCash};
pub use self::omni::{create_omni, Omni};
pub use self::ethereum::{create_ethereum, ethereum_path, Ethereum};
pub use self::tron::{create_tron, tron_path, Tron};
pub use self::ripple::{create_ripple, ripple_path, Ripple};

/// BIP44 coin type shared by every test network
pub const TESTNET_COIN_TYPE: u32 = 1;

/// Chain family a symbol belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainFamily {
    Bitcoin,
    BitcoinCash,
    Omni,
    Ethereum,
    Tron,
    Ripple,
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bitcoin => "bitcoin",
            Self::BitcoinCash => "bitcoin-cash",
            Self::Omni => "omni",
            Self::Ethereum => "ethereum",
            Self::Tron => "tron",
            Self::Ripple => "ripple",
        };
        f.write_str(name)
    }
}

/// What a chain module is built from
#[derive(Clone, Copy)]
pub struct CoinContext<'a> {
    /// Symbol the request was routed under
    pub symbol: &'static str,
    pub seed: &'a Seed,
    pub network: Network,
}

impl CoinContext<'_> {
    /// Derive the key pair at `path` from the session seed
    pub fn derive(&self, path: &DerivationPath) -> Result<KeyPair> {
        derive_key_pair(self.seed, path)
    }
}

impl fmt::Debug for CoinContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinContext")
            .field("symbol", &self.symbol)
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

/// Builds a chain module for one request
pub type CoinFactory = for<'a> fn(CoinContext<'a>) -> Result<Box<dyn Coin + 'a>>;

/// Capability set of a chain module
pub trait Coin: Send + Sync {
    /// Context the module was built from
    fn context(&self) -> &CoinContext<'_>;

    /// Derivation path for the context's network
    fn derivation_path(&self) -> DerivationPath;

    /// Address in the chain's native encoding
    fn derive_address(&self) -> Result<String>;

    /// Public key in the chain's customary encoding
    fn derive_public_key(&self) -> Result<String>;

    /// Private key in the chain's customary encoding, freshly derived
    fn derive_private_key(&self) -> Result<Zeroizing<String>>;

    /// Render an opaque payload as JSON for inspection
    fn decode_tx(&self, payload: &str) -> Result<String>;

    /// Sign a payload with a key pair derived by [`Coin::key_pair`]
    fn sign(&self, payload: &str, key_pair: &KeyPair) -> Result<String>;

    fn symbol(&self) -> &'static str {
        self.context().symbol
    }

    fn network(&self) -> Network {
        self.context().network
    }

    /// Key pair at this module's derivation path
    fn key_pair(&self) -> Result<KeyPair> {
        self.context().derive(&self.derivation_path())
    }
}
