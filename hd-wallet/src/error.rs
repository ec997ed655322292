//! Error types for the hd-wallet library

use thiserror::Error;

/// Reasons a mnemonic phrase is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("invalid word count {0}, expected 12, 15, 18, 21 or 24 words")]
    InvalidWordCount(usize),

    #[error("word '{0}' is not in the BIP39 word list")]
    UnknownWord(String),

    #[error("checksum mismatch")]
    InvalidChecksum,
}

/// Custom error type for hd-wallet operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid entropy length: {0} bytes, expected 16-32 bytes in steps of 4")]
    InvalidEntropyLength(usize),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(#[from] MnemonicError),

    #[error("Invalid seed length: {0} bytes, expected 64")]
    InvalidSeedLength(usize),

    #[error("Malformed derivation path: {0}")]
    MalformedPath(String),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    /// The derived scalar is zero or not below the curve order; retry with the next index
    #[error("Invalid child key at index {index:#010x}")]
    InvalidChildKey { index: u32 },

    #[error("Derivation depth would exceed 255")]
    DepthOverflow,

    #[error("Crypto backend error: {0}")]
    Crypto(String),
}

/// Result type for hd-wallet operations
pub type Result<T> = std::result::Result<T, Error>;
