//! HD Wallet CLI
//!
//! Command-line front end for the hd-wallet library: mnemonic generation and
//! validation, seed stretching, and key derivation by path or account.

mod config;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hd_wallet::{
    derive_batch, derive_path, generate_mnemonic, generate_random_mnemonic, mnemonic_to_seed,
    parse_mnemonic, validate_mnemonic, AccountPath, DerivationPath, HdKeyInfo, Network, Purpose,
    Seed,
};

use crate::config::{CliConfig, OutputFormat};

#[derive(Parser)]
#[command(name = "hd-wallet")]
#[command(about = "BIP39 mnemonics and BIP32/44/49/84 key derivation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random mnemonic
    Generate {
        /// Number of words (12, 15, 18, 21 or 24)
        #[arg(short, long)]
        words: Option<usize>,
    },
    /// Encode hex entropy as a mnemonic
    FromEntropy { entropy: String },
    /// Check a mnemonic's words and checksum
    Validate { phrase: String },
    /// Stretch a mnemonic into its 64-byte seed
    Seed {
        phrase: String,
        #[arg(short, long, default_value = "")]
        passphrase: String,
    },
    /// Derive the key at an explicit path
    Derive {
        phrase: String,
        /// Derivation path, e.g. m/44'/0'/0'/0/0
        #[arg(long)]
        path: String,
        #[arg(short, long, default_value = "")]
        passphrase: String,
        /// Include the private key in the output
        #[arg(long)]
        show_private: bool,
    },
    /// Derive keys on a BIP44/49/84 account path
    Account {
        phrase: String,
        /// 44, 49 or 84
        #[arg(long, default_value_t = 44)]
        purpose: u32,
        /// Network name; defaults to HD_WALLET_NETWORK or bitcoin
        #[arg(short, long)]
        network: Option<String>,
        #[arg(long, default_value_t = 0)]
        account: u32,
        #[arg(long, default_value_t = 0)]
        change: u32,
        #[arg(long, default_value_t = 0)]
        index: u32,
        /// Number of consecutive addresses
        #[arg(long, default_value_t = 1)]
        count: u32,
        #[arg(short, long, default_value = "")]
        passphrase: String,
        #[arg(long)]
        show_private: bool,
    },
    /// List supported networks
    Networks,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = CliConfig::default().with_overrides(cli.verbose, cli.format);

    // Initialize logging
    let level = config.log_level.as_str().to_ascii_lowercase();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("hd_wallet={0},hd_wallet_cli={0}", level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Generate { words } => {
            let words = words.unwrap_or(config.word_count);
            let mnemonic = generate_random_mnemonic(words)
                .with_context(|| format!("failed to generate a {}-word mnemonic", words))?;
            info!(words, "generated mnemonic");
            print_mnemonic(&config, mnemonic.as_str(), mnemonic.word_count());
        }
        Commands::FromEntropy { entropy } => {
            let entropy = hex::decode(entropy.trim()).context("entropy is not valid hex")?;
            let mnemonic = generate_mnemonic(&entropy).context("failed to encode entropy")?;
            print_mnemonic(&config, mnemonic.as_str(), mnemonic.word_count());
        }
        Commands::Validate { phrase } => {
            let valid = validate_mnemonic(&phrase);
            match config.format {
                OutputFormat::Text => println!("{}", if valid { "valid" } else { "invalid" }),
                OutputFormat::Json => println!("{}", json!({ "valid": valid })),
            }
            if !valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Seed { phrase, passphrase } => {
            let seed = seed_from_phrase(&phrase, &passphrase)?;
            let seed = hex::encode(seed.as_bytes());
            match config.format {
                OutputFormat::Text => println!("{}", seed),
                OutputFormat::Json => println!("{}", json!({ "seed": seed })),
            }
        }
        Commands::Derive { phrase, path, passphrase, show_private } => {
            let seed = seed_from_phrase(&phrase, &passphrase)?;
            let parsed: DerivationPath = path
                .parse()
                .with_context(|| format!("invalid derivation path {}", path))?;
            let key = derive_path(seed.as_bytes(), &path)
                .with_context(|| format!("failed to derive {}", parsed))?;

            let info = if show_private {
                key.to_info_with_secret(Some(&parsed))
            } else {
                key.to_info(Some(&parsed))
            };
            print_keys(&config, &[info])?;
        }
        Commands::Account {
            phrase,
            purpose,
            network,
            account,
            change,
            index,
            count,
            passphrase,
            show_private,
        } => {
            let purpose = Purpose::try_from(purpose)?;
            let network = match network {
                Some(name) => Network::lookup(&name)?,
                None => config.network,
            };
            let end = index
                .checked_add(count)
                .context("address index range overflows")?;
            let seed = seed_from_phrase(&phrase, &passphrase)?;

            let base = format!("m/{}'/{}'/{}'/{}", purpose.value(), network.coin_type(), account, change);
            let keys = derive_batch(seed.as_bytes(), &base, index..end)
                .with_context(|| format!("failed to derive {} {} addresses", purpose, network))?;

            let infos = keys
                .iter()
                .zip(index..end)
                .map(|(key, address_index)| {
                    let path = AccountPath::new(purpose, network, account, change, address_index)
                        .to_derivation_path()?;
                    Ok(if show_private {
                        key.to_info_with_secret(Some(&path))
                    } else {
                        key.to_info(Some(&path))
                    })
                })
                .collect::<hd_wallet::Result<Vec<_>>>()?;
            print_keys(&config, &infos)?;
        }
        Commands::Networks => match config.format {
            OutputFormat::Text => {
                for network in Network::all() {
                    let entry = network.config();
                    println!("{:<14} {:>5}  {:<6} {}", entry.key, entry.coin_type, entry.symbol, entry.name);
                }
            }
            OutputFormat::Json => {
                let entries: Vec<_> = Network::all().iter().map(|network| network.config()).collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn seed_from_phrase(phrase: &str, passphrase: &str) -> Result<Seed> {
    let mnemonic = parse_mnemonic(phrase).context("invalid mnemonic")?;
    debug!(words = mnemonic.word_count(), "deriving seed");
    mnemonic_to_seed(mnemonic.as_str(), passphrase).context("failed to derive seed")
}

fn print_mnemonic(config: &CliConfig, phrase: &str, words: usize) {
    match config.format {
        OutputFormat::Text => println!("{}", phrase),
        OutputFormat::Json => println!("{}", json!({ "mnemonic": phrase, "words": words })),
    }
}

fn print_keys(config: &CliConfig, keys: &[HdKeyInfo]) -> Result<()> {
    match config.format {
        OutputFormat::Json if keys.len() == 1 => println!("{}", serde_json::to_string_pretty(&keys[0])?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(keys)?),
        OutputFormat::Text => {
            for (n, key) in keys.iter().enumerate() {
                if n > 0 {
                    println!();
                }
                if let Some(path) = &key.path {
                    println!("path:               {}", path);
                }
                println!("depth:              {}", key.depth);
                println!(
                    "child index:        {}{}",
                    key.child_index & !hd_wallet::HARDENED_BIT,
                    if key.hardened { "'" } else { "" }
                );
                println!("fingerprint:        {}", key.fingerprint);
                println!("parent fingerprint: {}", key.parent_fingerprint);
                println!("chain code:         {}", key.chain_code);
                println!("public key:         {}", key.public_key);
                if let Some(private_key) = &key.private_key {
                    println!("private key:        {}", private_key);
                }
            }
        }
    }
    Ok(())
}
