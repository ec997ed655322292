//! BIP39 mnemonic generation, validation and seed stretching
//!
//! Entropy and word indices are converted with explicit bit arithmetic:
//! the bit stream is `entropy ∥ SHA-256(entropy)[..len/4 bits]`, read
//! most-significant bit first, and cut into 11-bit word indices.
//!
//! Reference: <https://github.com/bitcoin/bips/blob/master/bip-0039.mediawiki>

use std::fmt;
use std::str::FromStr;

use rand::{rngs::OsRng, RngCore};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::digest::{pbkdf2_sha512, sha256};
use crate::crypto::wordlist::{word_index, wordlist};
use crate::error::{Error, MnemonicError, Result};

/// Word count used when the caller does not ask for one
pub const DEFAULT_WORD_COUNT: usize = 12;

/// PBKDF2 rounds for mnemonic-to-seed stretching
const PBKDF2_ROUNDS: u32 = 2048;

/// Salt prefix for mnemonic-to-seed stretching
const SALT_PREFIX: &str = "mnemonic";

const BITS_PER_WORD: usize = 11;

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 15 words (160 bits)
    Words15,
    /// 18 words (192 bits)
    Words18,
    /// 21 words (224 bits)
    Words21,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Number of words in a phrase of this strength
    pub fn word_count(&self) -> usize {
        match self {
            Self::Words12 => 12,
            Self::Words15 => 15,
            Self::Words18 => 18,
            Self::Words21 => 21,
            Self::Words24 => 24,
        }
    }

    /// Get entropy length in bytes
    pub fn entropy_bytes(&self) -> usize {
        let words = self.word_count();
        (words * BITS_PER_WORD - words / 3) / 8
    }

    /// Number of checksum bits appended to the entropy
    pub fn checksum_bits(&self) -> usize {
        self.word_count() / 3
    }
}

impl Default for MnemonicStrength {
    fn default() -> Self {
        Self::Words12
    }
}

impl TryFrom<usize> for MnemonicStrength {
    type Error = Error;

    fn try_from(words: usize) -> Result<Self> {
        match words {
            12 => Ok(Self::Words12),
            15 => Ok(Self::Words15),
            18 => Ok(Self::Words18),
            21 => Ok(Self::Words21),
            24 => Ok(Self::Words24),
            n => Err(MnemonicError::InvalidWordCount(n).into()),
        }
    }
}

/// A checksum-verified BIP39 phrase, words separated by single spaces
///
/// The phrase is wiped from memory on drop and never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic(String);

impl Mnemonic {
    /// The phrase as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The individual words
    pub fn words(&self) -> Vec<&str> {
        self.0.split(' ').collect()
    }

    /// Number of words in the phrase
    pub fn word_count(&self) -> usize {
        self.0.split(' ').count()
    }

    /// Recover the entropy the phrase encodes
    pub fn to_entropy(&self) -> Vec<u8> {
        // The phrase was verified on construction, so every word resolves
        let indices: Vec<u16> = self.0.split(' ').filter_map(word_index).collect();
        let (entropy, _) = split_indices(&indices);
        entropy
    }

    /// Stretch the phrase into a 64-byte seed
    pub fn to_seed(&self, passphrase: &str) -> Result<Seed> {
        let mut salt = format!("{}{}", SALT_PREFIX, passphrase);
        let seed = pbkdf2_sha512(self.0.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS);
        salt.zeroize();
        Ok(Seed(seed?))
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words)", self.word_count())
    }
}

impl FromStr for Mnemonic {
    type Err = Error;

    fn from_str(phrase: &str) -> Result<Self> {
        parse_mnemonic(phrase)
    }
}

/// A 64-byte BIP39 seed
///
/// Wiped on drop. Deliberately neither `Clone` nor `Debug`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 64]);

impl Seed {
    /// Byte length of a BIP39 seed
    pub const LEN: usize = 64;

    /// Wrap raw seed bytes, e.g. a stored seed or a test vector
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// The raw seed bytes
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Encode entropy as a mnemonic phrase
pub fn generate_mnemonic(entropy: &[u8]) -> Result<Mnemonic> {
    let len = entropy.len();
    if !(16..=32).contains(&len) || len % 4 != 0 {
        return Err(Error::InvalidEntropyLength(len));
    }

    let checksum = sha256(entropy);
    let entropy_bits = len * 8;
    let total_bits = entropy_bits + len / 4;

    let bit_at = |i: usize| -> u16 {
        // Checksum bits never exceed 8, so they all live in the first digest byte
        let byte = if i < entropy_bits {
            entropy[i / 8]
        } else {
            checksum[(i - entropy_bits) / 8]
        };
        ((byte >> (7 - i % 8)) & 1) as u16
    };

    let words = wordlist();
    let phrase = (0..total_bits / BITS_PER_WORD)
        .map(|w| {
            let index = (0..BITS_PER_WORD)
                .fold(0u16, |acc, b| (acc << 1) | bit_at(w * BITS_PER_WORD + b));
            words[index as usize]
        })
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Mnemonic(phrase))
}

/// Generate a new random mnemonic phrase with the given number of words
pub fn generate_random_mnemonic(word_count: usize) -> Result<Mnemonic> {
    let strength = MnemonicStrength::try_from(word_count)?;
    let mut entropy = vec![0u8; strength.entropy_bytes()];
    OsRng.fill_bytes(&mut entropy);

    let mnemonic = generate_mnemonic(&entropy);
    entropy.zeroize();

    debug!(word_count, "generated random mnemonic");
    mnemonic
}

/// Parse and verify a phrase, reporting why it was rejected
pub fn parse_mnemonic(phrase: &str) -> Result<Mnemonic> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    MnemonicStrength::try_from(words.len())?;

    let indices = words
        .iter()
        .map(|word| word_index(word).ok_or_else(|| MnemonicError::UnknownWord(word.to_string())))
        .collect::<std::result::Result<Vec<u16>, _>>()?;

    let (mut entropy, checksum) = split_indices(&indices);
    let checksum_bits = words.len() / 3;
    let expected = sha256(&entropy)[0] >> (8 - checksum_bits);
    entropy.zeroize();

    if checksum != expected {
        return Err(MnemonicError::InvalidChecksum.into());
    }

    Ok(Mnemonic(words.join(" ")))
}

/// Check a phrase: word count, word list membership and checksum
///
/// Never fails; any defect yields `false`.
pub fn validate_mnemonic(phrase: &str) -> bool {
    parse_mnemonic(phrase).is_ok()
}

/// Decode a phrase back to the entropy it encodes
pub fn mnemonic_to_entropy(phrase: &str) -> Result<Vec<u8>> {
    Ok(parse_mnemonic(phrase)?.to_entropy())
}

/// Generate a seed from a mnemonic phrase and passphrase (`""` for none)
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Result<Seed> {
    parse_mnemonic(phrase)?.to_seed(passphrase)
}

/// Unpack 11-bit word indices into entropy bytes and the trailing checksum bits
fn split_indices(indices: &[u16]) -> (Vec<u8>, u8) {
    let total_bits = indices.len() * BITS_PER_WORD;
    let checksum_bits = indices.len() / 3;
    let entropy_bits = total_bits - checksum_bits;

    let bit_at = |i: usize| -> u8 {
        ((indices[i / BITS_PER_WORD] >> (BITS_PER_WORD - 1 - i % BITS_PER_WORD)) & 1) as u8
    };

    let entropy = (0..entropy_bits / 8)
        .map(|byte| (0..8).fold(0u8, |acc, b| (acc << 1) | bit_at(byte * 8 + b)))
        .collect();
    let checksum = (entropy_bits..total_bits).fold(0u8, |acc, i| (acc << 1) | bit_at(i));

    (entropy, checksum)
}
