//! BIP32 extended private keys over secp256k1
//!
//! Every node carries its private scalar, chain code and the metadata BIP32
//! records for it (depth, child number, parent fingerprint). Derivation
//! never mutates a node; each step returns a new owned key.
//!
//! Reference: <https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki>

use std::fmt;
use std::ops::Range;

use secp256k1::{PublicKey, Scalar, SecretKey};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use zeroize::Zeroize;

use super::derivation::{ChildNumber, DerivationPath};
use crate::crypto::digest::{hash160, hmac_sha512};
use crate::error::{Error, Result};

/// HMAC key for master key generation
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Seed length accepted by [`HdKey::master`]
pub const SEED_LEN: usize = 64;

/// 32 bytes of extra entropy carried alongside a key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainCode([u8; 32]);

impl ChainCode {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ChainCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ChainCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainCode({})", self)
    }
}

/// First 4 bytes of hash160 of a compressed public key
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint([u8; 4]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    fn of(public_key: &PublicKey) -> Self {
        let id = hash160(&public_key.serialize());
        Self([id[0], id[1], id[2], id[3]])
    }
}

impl From<[u8; 4]> for Fingerprint {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

/// A node of the BIP32 key tree
#[derive(Clone, PartialEq, Eq)]
pub struct HdKey {
    private_key: SecretKey,
    chain_code: ChainCode,
    depth: u8,
    child_number: ChildNumber,
    parent_fingerprint: Fingerprint,
}

impl HdKey {
    /// Generate the master key from a 64-byte seed
    pub fn master(seed: &[u8]) -> Result<Self> {
        if seed.len() != SEED_LEN {
            return Err(Error::InvalidSeedLength(seed.len()));
        }

        let mut i = hmac_sha512(MASTER_HMAC_KEY, &[seed])?;
        // A zero or out-of-range IL makes the seed unusable as a master
        let private_key = SecretKey::from_slice(&i[..32])
            .map_err(|_| Error::InvalidChildKey { index: 0 });
        let chain_code = ChainCode(split_chain_code(&i));
        i.zeroize();

        Ok(Self {
            private_key: private_key?,
            chain_code,
            depth: 0,
            child_number: ChildNumber::default(),
            parent_fingerprint: Fingerprint::default(),
        })
    }

    /// Derive a single child key
    ///
    /// Hardened children hash `0x00 ∥ private key ∥ index`, normal children hash
    /// `compressed public key ∥ index`. Fails with [`Error::InvalidChildKey`]
    /// when the tweak is not below the curve order or the child scalar is zero;
    /// BIP32 then prescribes moving on to the next index, which is up to the caller.
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self> {
        let depth = self.depth.checked_add(1).ok_or(Error::DepthOverflow)?;
        let index = child.to_be_bytes();
        let parent_public = self.public_key();

        let mut i = if child.is_hardened() {
            let mut secret = self.private_key.secret_bytes();
            let i = hmac_sha512(self.chain_code.as_bytes(), &[&[0u8], &secret, &index]);
            secret.zeroize();
            i?
        } else {
            hmac_sha512(self.chain_code.as_bytes(), &[&parent_public.serialize(), &index])?
        };

        let mut il = [0u8; 32];
        il.copy_from_slice(&i[..32]);
        let chain_code = ChainCode(split_chain_code(&i));
        i.zeroize();

        let tweak = Scalar::from_be_bytes(il);
        il.zeroize();
        let private_key = tweak
            .ok()
            .and_then(|tweak| self.private_key.add_tweak(&tweak).ok())
            .ok_or(Error::InvalidChildKey { index: child.to_u32() })?;

        trace!(depth, child = %child, "derived child key");

        Ok(Self {
            private_key,
            chain_code,
            depth,
            child_number: child,
            parent_fingerprint: Fingerprint::of(&parent_public),
        })
    }

    /// Walk `path` from this key; the first failing step aborts the walk
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.iter()
            .try_fold(self.clone(), |key, child| key.derive_child(*child))
    }

    /// The private scalar
    pub fn private_key(&self) -> &SecretKey {
        &self.private_key
    }

    /// The private scalar as big-endian bytes
    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.private_key.secret_bytes()
    }

    /// The public point `private_key · G`
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_secret_key_global(&self.private_key)
    }

    /// The compressed SEC1 encoding of the public key
    pub fn public_key_bytes(&self) -> [u8; 33] {
        self.public_key().serialize()
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    /// 0 for the master key, +1 per derivation step
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// The child number this key was derived with; 0 for the master key
    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }

    /// Fingerprint of the parent key; all zero for the master key
    pub fn parent_fingerprint(&self) -> Fingerprint {
        self.parent_fingerprint
    }

    /// hash160 of the compressed public key
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.public_key_bytes())
    }

    /// First 4 bytes of [`HdKey::identifier`]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.public_key())
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.private_key.secret_bytes())
    }

    pub fn chain_code_hex(&self) -> String {
        self.chain_code.to_string()
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    /// Public view of the key, safe to log or display
    pub fn to_info(&self, path: Option<&DerivationPath>) -> HdKeyInfo {
        HdKeyInfo {
            path: path.map(ToString::to_string),
            depth: self.depth,
            child_index: self.child_number.to_u32(),
            hardened: self.child_number.is_hardened(),
            parent_fingerprint: self.parent_fingerprint.to_string(),
            fingerprint: self.fingerprint().to_string(),
            chain_code: self.chain_code_hex(),
            public_key: self.public_key_hex(),
            private_key: None,
        }
    }

    /// Like [`HdKey::to_info`] but including the private key hex
    pub fn to_info_with_secret(&self, path: Option<&DerivationPath>) -> HdKeyInfo {
        HdKeyInfo {
            private_key: Some(self.private_key_hex()),
            ..self.to_info(path)
        }
    }
}

impl fmt::Debug for HdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HdKey")
            .field("private_key", &"<redacted>")
            .field("chain_code", &self.chain_code)
            .field("depth", &self.depth)
            .field("child_number", &self.child_number)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .finish()
    }
}

/// Hex-encoded view of an [`HdKey`] for display and JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HdKeyInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub depth: u8,
    pub child_index: u32,
    pub hardened: bool,
    pub parent_fingerprint: String,
    pub fingerprint: String,
    pub chain_code: String,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
}

fn split_chain_code(i: &[u8; 64]) -> [u8; 32] {
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&i[32..]);
    chain_code
}

/// Generate the BIP32 master key from a 64-byte seed
pub fn generate_master_key(seed: &[u8]) -> Result<HdKey> {
    HdKey::master(seed)
}

/// Derive the child of `parent` at raw index `index` (bit 31 set means hardened)
pub fn derive_child_key(parent: &HdKey, index: u32) -> Result<HdKey> {
    parent.derive_child(ChildNumber::from(index))
}

/// Derive the key at `path` (e.g. `m/44'/0'/0'/0/0`) from a seed
pub fn derive_path(seed: &[u8], path: &str) -> Result<HdKey> {
    let path: DerivationPath = path.parse()?;
    debug!(%path, "deriving path");
    HdKey::master(seed)?.derive_path(&path)
}

/// Derive the key at an explicit list of raw indices from a seed
pub fn derive_indices(seed: &[u8], indices: &[u32]) -> Result<HdKey> {
    let path = DerivationPath::from_indices(indices);
    debug!(%path, "deriving indices");
    HdKey::master(seed)?.derive_path(&path)
}

/// Derive `base_path` once, then one normal child per index in `indices`
pub fn derive_batch(seed: &[u8], base_path: &str, indices: Range<u32>) -> Result<Vec<HdKey>> {
    let path: DerivationPath = base_path.parse()?;
    debug!(%path, start = indices.start, end = indices.end, "deriving batch");
    let base = HdKey::master(seed)?.derive_path(&path)?;

    indices
        .map(|index| base.derive_child(ChildNumber::normal(index)?))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::derivation::HARDENED_BIT;

    fn seed() -> Vec<u8> {
        (0u8..64).collect()
    }

    #[test]
    fn test_master_key_shape() {
        let master = HdKey::master(&seed()).unwrap();
        assert_eq!(master.depth(), 0);
        assert_eq!(master.child_number().to_u32(), 0);
        assert_eq!(master.parent_fingerprint().as_bytes(), &[0u8; 4]);
        assert_eq!(master.public_key_bytes().len(), 33);
        assert!(matches!(master.public_key_bytes()[0], 0x02 | 0x03));
    }

    #[test]
    fn test_master_rejects_seed_length() {
        for len in [0, 16, 32, 63, 65] {
            assert_eq!(HdKey::master(&vec![1u8; len]), Err(Error::InvalidSeedLength(len)));
        }
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = HdKey::master(&seed()).unwrap();
        let b = HdKey::master(&seed()).unwrap();
        assert_eq!(a, b);
        assert_eq!(derive_child_key(&a, 7).unwrap(), derive_child_key(&b, 7).unwrap());
    }

    #[test]
    fn test_hardened_differs_from_normal() {
        let master = HdKey::master(&seed()).unwrap();
        let normal = derive_child_key(&master, 1).unwrap();
        let hardened = derive_child_key(&master, 1 | HARDENED_BIT).unwrap();
        assert_ne!(normal.private_key_bytes(), hardened.private_key_bytes());
        assert_eq!(normal.parent_fingerprint(), hardened.parent_fingerprint());
    }

    #[test]
    fn test_child_metadata() {
        let master = HdKey::master(&seed()).unwrap();
        let child = derive_child_key(&master, 3 | HARDENED_BIT).unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.child_number().to_u32(), 3 | HARDENED_BIT);
        assert_eq!(child.parent_fingerprint(), master.fingerprint());
        assert_eq!(&child.identifier()[..4], child.fingerprint().as_bytes());
    }

    #[test]
    fn test_parent_is_unchanged() {
        let master = HdKey::master(&seed()).unwrap();
        let before = master.clone();
        let _ = master.derive_child(ChildNumber::from(0)).unwrap();
        assert_eq!(master, before);
    }

    #[test]
    fn test_depth_limit() {
        let mut key = HdKey::master(&seed()).unwrap();
        for _ in 0..255 {
            key = key.derive_child(ChildNumber::from(0)).unwrap();
        }
        assert_eq!(key.depth(), 255);
        assert_eq!(key.derive_child(ChildNumber::from(0)), Err(Error::DepthOverflow));
    }

    #[test]
    fn test_derive_path_matches_indices() {
        let by_path = derive_path(&seed(), "m/44'/0'/0'/0/0").unwrap();
        let by_indices = derive_indices(
            &seed(),
            &[44 | HARDENED_BIT, HARDENED_BIT, HARDENED_BIT, 0, 0],
        )
        .unwrap();
        assert_eq!(by_path, by_indices);
        assert_eq!(by_path.depth(), 5);
    }

    #[test]
    fn test_derive_path_master() {
        assert_eq!(derive_path(&seed(), "m").unwrap(), HdKey::master(&seed()).unwrap());
    }

    #[test]
    fn test_derive_path_errors() {
        assert!(matches!(
            derive_path(&seed(), "m/2147483648"),
            Err(Error::MalformedPath(_))
        ));
        assert!(matches!(
            derive_path(&seed(), "44'/0'"),
            Err(Error::MalformedPath(_))
        ));
        assert_eq!(derive_path(&seed()[..32], "m/0"), Err(Error::InvalidSeedLength(32)));
    }

    #[test]
    fn test_derive_batch() {
        let batch = derive_batch(&seed(), "m/84'/0'/0'/0", 0..5).unwrap();
        assert_eq!(batch.len(), 5);
        for (i, key) in batch.iter().enumerate() {
            let single = derive_path(&seed(), &format!("m/84'/0'/0'/0/{}", i)).unwrap();
            assert_eq!(key, &single);
        }
        assert!(derive_batch(&seed(), "m/0", 5..5).unwrap().is_empty());
    }

    #[test]
    fn test_info_hides_private_key() {
        let key = derive_path(&seed(), "m/0'").unwrap();
        let path: DerivationPath = "m/0'".parse().unwrap();

        let info = key.to_info(Some(&path));
        assert_eq!(info.private_key, None);
        assert_eq!(info.path.as_deref(), Some("m/0'"));
        assert!(info.hardened);
        assert_eq!(info.public_key, key.public_key_hex());

        let secret = key.to_info_with_secret(None);
        assert_eq!(secret.private_key, Some(key.private_key_hex()));
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let key = HdKey::master(&seed()).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(&key.private_key_hex()));
    }
}
