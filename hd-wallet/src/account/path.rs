//! BIP44 / BIP49 / BIP84 account paths
//!
//! All three standards share the layout
//! `m / purpose' / coin_type' / account' / change / address_index`
//! and differ only in the purpose constant.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::keys::{derive_indices, ChildNumber, DerivationPath, HdKey};
use crate::error::{Error, Result};
use crate::network::Network;

/// First path level, selecting the derivation standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purpose {
    /// Legacy P2PKH accounts
    Bip44,
    /// P2WPKH nested in P2SH
    Bip49,
    /// Native P2WPKH
    Bip84,
}

impl Purpose {
    pub fn value(&self) -> u32 {
        match self {
            Purpose::Bip44 => 44,
            Purpose::Bip49 => 49,
            Purpose::Bip84 => 84,
        }
    }
}

impl TryFrom<u32> for Purpose {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            44 => Ok(Purpose::Bip44),
            49 => Ok(Purpose::Bip49),
            84 => Ok(Purpose::Bip84),
            other => Err(Error::MalformedPath(format!("unsupported purpose {}", other))),
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BIP{}", self.value())
    }
}

/// The five coordinates of a standard account path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountPath {
    pub purpose: Purpose,
    pub coin_type: u32,
    pub account: u32,
    /// 0 for receiving addresses, 1 for change
    pub change: u32,
    pub address_index: u32,
}

impl AccountPath {
    /// Account path for `network`
    pub fn new(purpose: Purpose, network: Network, account: u32, change: u32, address_index: u32) -> Self {
        Self {
            purpose,
            coin_type: network.coin_type(),
            account,
            change,
            address_index,
        }
    }

    /// `[purpose', coin_type', account', change, address_index]`
    pub fn to_derivation_path(&self) -> Result<DerivationPath> {
        Ok(DerivationPath::from(vec![
            ChildNumber::hardened(self.purpose.value())?,
            ChildNumber::hardened(self.coin_type)?,
            ChildNumber::hardened(self.account)?,
            ChildNumber::normal(self.change)?,
            ChildNumber::normal(self.address_index)?,
        ]))
    }
}

impl fmt::Display for AccountPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/{}'/{}'/{}'/{}/{}",
            self.purpose.value(),
            self.coin_type,
            self.account,
            self.change,
            self.address_index
        )
    }
}

/// Derive the key at `m/purpose'/coin_type'/account'/change/address_index` for a named network
pub fn derive_account_path(
    seed: &[u8],
    purpose: Purpose,
    network: &str,
    account: u32,
    change: u32,
    address_index: u32,
) -> Result<HdKey> {
    let network = Network::lookup(network)?;
    let path = AccountPath::new(purpose, network, account, change, address_index);
    let indices: Vec<u32> = path
        .to_derivation_path()?
        .iter()
        .map(|child| child.to_u32())
        .collect();

    debug!(%purpose, %network, %path, "deriving account path");
    derive_indices(seed, &indices)
}

/// BIP44: `m/44'/coin_type'/account'/change/address_index`
pub fn derive_bip44_path(seed: &[u8], network: &str, account: u32, change: u32, address_index: u32) -> Result<HdKey> {
    derive_account_path(seed, Purpose::Bip44, network, account, change, address_index)
}

/// BIP49: `m/49'/coin_type'/account'/change/address_index`
pub fn derive_bip49_path(seed: &[u8], network: &str, account: u32, change: u32, address_index: u32) -> Result<HdKey> {
    derive_account_path(seed, Purpose::Bip49, network, account, change, address_index)
}

/// BIP84: `m/84'/coin_type'/account'/change/address_index`
pub fn derive_bip84_path(seed: &[u8], network: &str, account: u32, change: u32, address_index: u32) -> Result<HdKey> {
    derive_account_path(seed, Purpose::Bip84, network, account, change, address_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::derive_path;

    fn seed() -> Vec<u8> {
        (0u8..64).rev().collect()
    }

    #[test]
    fn test_account_path_layout() {
        let path = AccountPath::new(Purpose::Bip84, Network::Litecoin, 3, 1, 7);
        assert_eq!(path.to_string(), "m/84'/2'/3'/1/7");
        assert_eq!(path.to_derivation_path().unwrap().to_string(), path.to_string());
    }

    #[test]
    fn test_account_path_rejects_large_indices() {
        let path = AccountPath::new(Purpose::Bip44, Network::Bitcoin, 0x8000_0000, 0, 0);
        assert!(matches!(path.to_derivation_path(), Err(Error::MalformedPath(_))));

        let path = AccountPath::new(Purpose::Bip44, Network::Bitcoin, 0, 0, u32::MAX);
        assert!(matches!(path.to_derivation_path(), Err(Error::MalformedPath(_))));
    }

    #[test]
    fn test_bip44_matches_path_string() {
        let by_path = derive_path(&seed(), "m/44'/0'/0'/0/0").unwrap();
        assert_eq!(derive_bip44_path(&seed(), "bitcoin", 0, 0, 0).unwrap(), by_path);
    }

    #[test]
    fn test_purposes_match_path_strings() {
        let cases: [(fn(&[u8], &str, u32, u32, u32) -> Result<HdKey>, &str); 3] = [
            (derive_bip44_path, "m/44'/60'/2'/1/9"),
            (derive_bip49_path, "m/49'/60'/2'/1/9"),
            (derive_bip84_path, "m/84'/60'/2'/1/9"),
        ];
        for (derive, path) in cases {
            assert_eq!(derive(&seed(), "Ethereum", 2, 1, 9).unwrap(), derive_path(&seed(), path).unwrap());
        }
    }

    #[test]
    fn test_unknown_network() {
        assert_eq!(
            derive_bip84_path(&seed(), "monero", 0, 0, 0),
            Err(Error::UnknownNetwork("monero".to_string()))
        );
    }

    #[test]
    fn test_purpose_values() {
        assert_eq!(Purpose::try_from(49u32).unwrap(), Purpose::Bip49);
        assert!(Purpose::try_from(86u32).is_err());
        assert_eq!(Purpose::Bip84.to_string(), "BIP84");
    }
}
