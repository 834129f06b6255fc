//! HD Wallet Core - Multi-chain hierarchical deterministic wallet
//!
//! This library derives per-chain keys and addresses from a single BIP39
//! mnemonic and signs chain-specific transaction payloads. Supported chains
//! are Bitcoin, Bitcoin Cash, Omni, Ethereum (with ERC20 tokens), Tron and
//! Ripple. Nothing here performs I/O.

pub mod error;
pub mod network;
pub mod crypto;
pub mod transaction;
pub mod coin;
pub mod account;

// Re-export commonly used types for convenience
pub use account::{HdWallet, WalletOptions};
pub use coin::{available_coin_list, supported_symbols, ChainFamily, Coin};
pub use crypto::mnemonic::{
    entropy_from_mnemonic, generate_mnemonic, mnemonic_from_entropy, new_entropy, seed_from_mnemonic,
    validate_mnemonic, MnemonicStrength, Seed,
};
pub use error::{Error, Result};
pub use network::Network;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
