//! Cryptographic primitives and operations
//!
//! This module provides functionality for mnemonic generation, seed
//! stretching, key derivation, and the hash functions the chain modules share.

pub mod hash;
pub mod keys;
pub mod mnemonic;

pub use keys::*;
pub use mnemonic::*;
