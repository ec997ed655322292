//! Coin networks and their SLIP-44 coin types
//!
//! The registry is a fixed table; adding a network means adding a variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Static description of a coin network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkConfig {
    /// Lower-case lookup key, e.g. `bitcoin-cash`
    pub key: &'static str,
    /// SLIP-44 coin type used at the second level of BIP44 paths
    pub coin_type: u32,
    /// Display name
    pub name: &'static str,
    /// Ticker symbol
    pub symbol: &'static str,
}

/// Supported coin networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Bitcoin,
    Ethereum,
    Litecoin,
    Dogecoin,
    Dash,
    Zcash,
    BitcoinCash,
    Ripple,
    Cardano,
    Polkadot,
}

const NETWORKS: [Network; 10] = [
    Network::Bitcoin,
    Network::Ethereum,
    Network::Litecoin,
    Network::Dogecoin,
    Network::Dash,
    Network::Zcash,
    Network::BitcoinCash,
    Network::Ripple,
    Network::Cardano,
    Network::Polkadot,
];

impl Network {
    /// Every registered network, in table order
    pub fn all() -> &'static [Network] {
        &NETWORKS
    }

    /// Resolve a network by name, ignoring ASCII case
    pub fn lookup(name: &str) -> Result<Self> {
        NETWORKS
            .iter()
            .copied()
            .find(|network| network.config().key.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownNetwork(name.to_string()))
    }

    pub fn config(&self) -> &'static NetworkConfig {
        match self {
            Network::Bitcoin => &NetworkConfig { key: "bitcoin", coin_type: 0, name: "Bitcoin", symbol: "BTC" },
            Network::Ethereum => &NetworkConfig { key: "ethereum", coin_type: 60, name: "Ethereum", symbol: "ETH" },
            Network::Litecoin => &NetworkConfig { key: "litecoin", coin_type: 2, name: "Litecoin", symbol: "LTC" },
            Network::Dogecoin => &NetworkConfig { key: "dogecoin", coin_type: 3, name: "Dogecoin", symbol: "DOGE" },
            Network::Dash => &NetworkConfig { key: "dash", coin_type: 5, name: "Dash", symbol: "DASH" },
            Network::Zcash => &NetworkConfig { key: "zcash", coin_type: 133, name: "Zcash", symbol: "ZEC" },
            Network::BitcoinCash => &NetworkConfig { key: "bitcoin-cash", coin_type: 145, name: "Bitcoin Cash", symbol: "BCH" },
            Network::Ripple => &NetworkConfig { key: "ripple", coin_type: 144, name: "Ripple", symbol: "XRP" },
            Network::Cardano => &NetworkConfig { key: "cardano", coin_type: 1815, name: "Cardano", symbol: "ADA" },
            Network::Polkadot => &NetworkConfig { key: "polkadot", coin_type: 354, name: "Polkadot", symbol: "DOT" },
        }
    }

    pub fn coin_type(&self) -> u32 {
        self.config().coin_type
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn symbol(&self) -> &'static str {
        self.config().symbol
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().key)
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::lookup(name)
    }
}
