//! Transaction functionality
//!
//! Per-chain decoding of opaque transaction payloads into inspectable form
//! and signing with a derived key pair. Nothing here touches the network.

pub mod types;
pub mod bitcoin;
pub mod omni;
pub mod ethereum;
pub mod tron;
pub mod ripple;

pub use types::*;
