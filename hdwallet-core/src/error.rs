//! Error types for the hdwallet-core library

use thiserror::Error;

/// Custom error type for hdwallet-core operations
///
/// Messages never carry seed, mnemonic or private key material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid entropy: {0}")]
    InvalidEntropy(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Seed is empty")]
    EmptySeed,

    #[error("No entry for coin ({0}) was found")]
    UnknownCoin(String),

    #[error("Key derivation error: {0}")]
    DerivationFailed(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Signing error: {0}")]
    SigningFailed(String),
}

impl Error {
    /// Stable, machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEntropy(_) => "InvalidEntropy",
            Self::InvalidMnemonic(_) => "InvalidMnemonic",
            Self::EmptySeed => "EmptySeed",
            Self::UnknownCoin(_) => "UnknownCoin",
            Self::DerivationFailed(_) => "DerivationFailed",
            Self::MalformedPayload(_) => "MalformedPayload",
            Self::SigningFailed(_) => "SigningFailed",
        }
    }
}

/// Result type for hdwallet-core operations
pub type Result<T> = std::result::Result<T, Error>;
