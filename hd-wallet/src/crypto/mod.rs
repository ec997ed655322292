//! Cryptographic primitives and operations
//!
//! This module provides functionality for mnemonic generation, seed
//! stretching and BIP32 key derivation.

pub mod digest;
pub mod keys;
pub mod mnemonic;
pub mod wordlist;

pub use keys::*;
pub use mnemonic::*;
