//! CLI configuration
//!
//! Defaults come from `HD_WALLET_*` environment variables. Values that do
//! not parse are ignored and the built-in default is used instead.

use std::str::FromStr;

use clap::ValueEnum;
use hd_wallet::{MnemonicStrength, Network, DEFAULT_WORD_COUNT};
use tracing::Level;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Settings shared by every subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: Level,
    /// Network used by `account` when `--network` is omitted
    pub network: Network,
    /// Phrase length used by `generate` when `--words` is omitted
    pub word_count: usize,
    pub format: OutputFormat,
}

impl CliConfig {
    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_level: lookup("HD_WALLET_LOG")
                .and_then(|value| value.parse().ok())
                .unwrap_or(Level::WARN),
            network: lookup("HD_WALLET_NETWORK")
                .and_then(|value| Network::lookup(&value).ok())
                .unwrap_or(Network::Bitcoin),
            word_count: lookup("HD_WALLET_WORDS")
                .and_then(|value| value.parse::<usize>().ok())
                .and_then(|words| MnemonicStrength::try_from(words).ok())
                .map(|strength| strength.word_count())
                .unwrap_or(DEFAULT_WORD_COUNT),
            format: lookup("HD_WALLET_FORMAT")
                .and_then(|value| value.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Apply command-line overrides on top of the environment defaults
    pub fn with_overrides(mut self, verbose: bool, format: Option<OutputFormat>) -> Self {
        if verbose {
            self.log_level = Level::DEBUG;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}
