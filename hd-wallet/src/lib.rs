//! HD Wallet Core - BIP39 / BIP32 / BIP44 key derivation
//!
//! This library turns entropy into BIP39 mnemonics, mnemonics into seeds,
//! and seeds into a BIP32 secp256k1 key tree addressed by plain paths or by
//! the BIP44, BIP49 and BIP84 account layouts.
//!
//! ```
//! use hd_wallet::{generate_mnemonic, mnemonic_to_seed, derive_bip44_path};
//!
//! let mnemonic = generate_mnemonic(&[0u8; 16]).unwrap();
//! let seed = mnemonic_to_seed(mnemonic.as_str(), "").unwrap();
//! let key = derive_bip44_path(seed.as_bytes(), "bitcoin", 0, 0, 0).unwrap();
//! assert_eq!(key.depth(), 5);
//! ```
//!
//! Every operation is a pure function of its inputs; keys are immutable
//! values and may be shared across threads freely.

pub mod account;
pub mod crypto;
pub mod error;
pub mod network;

// Re-export commonly used types for convenience
pub use account::{
    derive_account_path, derive_bip44_path, derive_bip49_path, derive_bip84_path, AccountPath,
    Purpose,
};
pub use crypto::keys::{
    derive_batch, derive_child_key, derive_indices, derive_path, generate_master_key, ChainCode,
    ChildNumber, DerivationPath, Fingerprint, HdKey, HdKeyInfo, HARDENED_BIT,
};
pub use crypto::mnemonic::{
    generate_mnemonic, generate_random_mnemonic, mnemonic_to_entropy, mnemonic_to_seed,
    parse_mnemonic, validate_mnemonic, Mnemonic, MnemonicStrength, Seed, DEFAULT_WORD_COUNT,
};
pub use error::{Error, MnemonicError, Result};
pub use network::{Network, NetworkConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_types_are_thread_safe() {
        assert_send_sync::<HdKey>();
        assert_send_sync::<Mnemonic>();
        assert_send_sync::<Seed>();
        assert_send_sync::<DerivationPath>();
        assert_send_sync::<Network>();
    }

    #[test]
    fn test_parallel_derivation_matches_sequential() {
        let seed = mnemonic_to_seed(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
            "",
        )
        .unwrap();
        let seed = std::sync::Arc::new(seed);

        let handles: Vec<_> = (0..4u32)
            .map(|account| {
                let seed = seed.clone();
                std::thread::spawn(move || {
                    derive_bip84_path(seed.as_bytes(), "bitcoin", account, 0, 0).unwrap()
                })
            })
            .collect();

        for (account, handle) in handles.into_iter().enumerate() {
            let parallel = handle.join().unwrap();
            let sequential = derive_bip84_path(seed.as_bytes(), "bitcoin", account as u32, 0, 0).unwrap();
            assert_eq!(parallel, sequential);
        }
    }
}
