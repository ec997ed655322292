//! BIP32 key derivation
//!
//! This module provides the secp256k1 key tree: master key generation,
//! child derivation and path parsing.

mod derivation;
mod hd_key;

pub use derivation::*;
pub use hd_key::*;
