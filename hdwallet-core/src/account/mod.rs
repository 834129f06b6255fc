//! Wallet sessions
//!
//! An [`HdWallet`] owns one seed and one network flag and routes every
//! derivation and signing request through the coin registry.

mod wallet;

pub use wallet::*;
