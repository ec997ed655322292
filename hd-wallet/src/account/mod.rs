//! Account path construction
//!
//! This module builds the standard multi-account paths (BIP44, BIP49,
//! BIP84) for a registered network and drives the key derivation engine
//! with them.

mod path;

pub use path::*;
