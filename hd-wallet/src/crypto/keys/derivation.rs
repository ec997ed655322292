//! Child numbers and derivation paths

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Bit 31 of a child index marks hardened derivation
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// Largest index magnitude, before the hardened flag is applied
pub const MAX_INDEX: u32 = HARDENED_BIT - 1;

/// A BIP32 child index; bit 31 set means hardened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChildNumber(u32);

impl ChildNumber {
    /// Non-hardened child `index`
    pub fn normal(index: u32) -> Result<Self> {
        check_index(index)?;
        Ok(Self(index))
    }

    /// Hardened child `index`
    pub fn hardened(index: u32) -> Result<Self> {
        check_index(index)?;
        Ok(Self(index | HARDENED_BIT))
    }

    /// Whether the hardened bit is set
    pub fn is_hardened(&self) -> bool {
        self.0 & HARDENED_BIT != 0
    }

    /// The index without the hardened flag
    pub fn index(&self) -> u32 {
        self.0 & MAX_INDEX
    }

    /// The raw 32-bit value, hardened flag included
    pub fn to_u32(self) -> u32 {
        self.0
    }

    /// Big-endian serialization used in the HMAC input
    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl From<u32> for ChildNumber {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<ChildNumber> for u32 {
    fn from(child: ChildNumber) -> Self {
        child.0
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

impl FromStr for ChildNumber {
    type Err = Error;

    /// Parse one path segment: decimal digits, optionally followed by `'`, `h` or `H`
    fn from_str(segment: &str) -> Result<Self> {
        let (digits, hardened) = match segment.strip_suffix(['\'', 'h', 'H']) {
            Some(digits) => (digits, true),
            None => (segment, false),
        };

        // u32::from_str would also accept a leading '+'
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedPath(format!("invalid segment '{}'", segment)));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| Error::MalformedPath(format!("index out of range '{}'", segment)))?;

        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }
}

fn check_index(index: u32) -> Result<()> {
    if index > MAX_INDEX {
        return Err(Error::MalformedPath(format!(
            "index {} exceeds {}",
            index, MAX_INDEX
        )));
    }
    Ok(())
}

/// An ordered list of child numbers starting at the master key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The empty path, addressing the master key itself
    pub fn master() -> Self {
        Self(Vec::new())
    }

    /// A path from raw 32-bit indices; bit 31 marks hardened steps
    pub fn from_indices(indices: &[u32]) -> Self {
        Self(indices.iter().copied().map(ChildNumber::from).collect())
    }

    /// A copy of this path extended by one step
    pub fn child(&self, child: ChildNumber) -> Self {
        let mut path = self.0.clone();
        path.push(child);
        Self(path)
    }

    /// Iterate over the steps
    pub fn iter(&self) -> std::slice::Iter<'_, ChildNumber> {
        self.0.iter()
    }

    /// Number of steps, i.e. the depth of the addressed key
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the master path `m`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(path: Vec<ChildNumber>) -> Self {
        Self(path)
    }
}

impl AsRef<[ChildNumber]> for DerivationPath {
    fn as_ref(&self) -> &[ChildNumber] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a ChildNumber;
    type IntoIter = std::slice::Iter<'a, ChildNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for child in &self.0 {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    /// Parse `m/44'/0'/0'/0/0`; empty segments are skipped so a trailing slash is accepted
    fn from_str(path: &str) -> Result<Self> {
        let rest = path
            .strip_prefix('m')
            .ok_or_else(|| Error::MalformedPath(format!("'{}' must start with 'm'", path)))?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return Err(Error::MalformedPath(format!("'{}' must continue with '/'", path)));
        }

        rest.split('/')
            .filter(|segment| !segment.is_empty())
            .map(ChildNumber::from_str)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}
