//! Key derivation and management
//!
//! This module provides BIP32 derivation plus the key and address encodings
//! of each supported blockchain.

pub mod bitcoin;
pub mod cashaddr;
pub mod ethereum;
pub mod ripple;
pub mod tron;
mod derivation;

pub use derivation::*;
