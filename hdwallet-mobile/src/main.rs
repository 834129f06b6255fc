//! HD Wallet command line tool
//!
//! Thin front end over the binding surface. Logs go to stderr, controlled by
//! `RUST_LOG` (default `warn`); stdout carries only command output.

use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use hdwallet_mobile::{
    entropy_from_mnemonic, get_available_coin_list, mnemonic_from_entropy, new_hd_wallet_from_mnemonic,
    new_hd_wallet_with_passphrase, new_mnemonic, validate_mnemonic, Wallet,
};

#[derive(Parser)]
#[command(name = "hdwallet")]
#[command(about = "Multi-chain HD wallet: derive keys and sign transactions from a mnemonic")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Derive for test networks
    #[arg(long, global = true, env = "HDWALLET_TESTNET")]
    testnet: bool,

    /// Mnemonic phrase of the wallet
    #[arg(long, global = true, env = "HDWALLET_MNEMONIC", hide_env_values = true)]
    mnemonic: Option<String>,

    /// Optional BIP39 passphrase
    #[arg(long, global = true, env = "HDWALLET_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new 12-word mnemonic
    NewMnemonic,
    /// Encode hex entropy as a mnemonic
    FromEntropy {
        /// Entropy as hex (16 to 32 bytes)
        entropy: String,
    },
    /// Print the hex entropy behind the wallet mnemonic
    ToEntropy,
    /// Check the wallet mnemonic
    Validate,
    /// List supported coin symbols
    Coins,
    /// Derive the address of a coin
    Address { symbol: String },
    /// Derive the addresses of every supported coin
    Addresses,
    /// Derive the public key of a coin
    PublicKey { symbol: String },
    /// Derive the private key of a coin
    PrivateKey { symbol: String },
    /// Decode a transaction payload (`-` reads stdin)
    Decode { symbol: String, payload: String },
    /// Sign a transaction payload (`-` reads stdin)
    Sign { symbol: String, payload: String },
}

#[derive(Serialize)]
struct CoinAddress {
    symbol: &'static str,
    address: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_payload(payload: String) -> Result<String> {
    if payload != "-" {
        return Ok(payload);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read payload from stdin")?;
    Ok(buffer.trim().to_string())
}

fn mnemonic(cli: &Cli) -> Result<Zeroizing<String>> {
    match &cli.mnemonic {
        Some(mnemonic) => Ok(Zeroizing::new(mnemonic.clone())),
        None => bail!("a mnemonic is required: pass --mnemonic or set HDWALLET_MNEMONIC"),
    }
}

fn open_wallet(cli: &Cli) -> Result<Wallet> {
    let mnemonic = mnemonic(cli)?;
    let wallet = match &cli.passphrase {
        Some(passphrase) => new_hd_wallet_with_passphrase(&mnemonic, passphrase, cli.testnet),
        None => new_hd_wallet_from_mnemonic(&mnemonic, cli.testnet),
    };
    wallet.context("failed to open wallet")
}

fn print_value(json: bool, key: &str, value: &str) {
    if json {
        println!("{}", serde_json::json!({ key: value }));
    } else {
        println!("{}", value);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::NewMnemonic => {
            let mnemonic = Zeroizing::new(new_mnemonic()?);
            print_value(cli.json, "mnemonic", &mnemonic);
        }
        Commands::FromEntropy { entropy } => {
            let mnemonic = Zeroizing::new(mnemonic_from_entropy(entropy)?);
            print_value(cli.json, "mnemonic", &mnemonic);
        }
        Commands::ToEntropy => {
            let entropy = Zeroizing::new(entropy_from_mnemonic(&mnemonic(cli)?)?);
            print_value(cli.json, "entropy", &entropy);
        }
        Commands::Validate => {
            validate_mnemonic(&mnemonic(cli)?)?;
            print_value(cli.json, "valid", "true");
        }
        Commands::Coins => {
            let list = get_available_coin_list();
            if cli.json {
                println!("{}", serde_json::to_string(&list.split(' ').collect::<Vec<_>>())?);
            } else {
                println!("{}", list);
            }
        }
        Commands::Address { symbol } => {
            print_value(cli.json, "address", &open_wallet(cli)?.derive_address(symbol)?);
        }
        Commands::Addresses => {
            let wallet = open_wallet(cli)?;
            let rows = hdwallet_core::supported_symbols()
                .into_iter()
                .map(|symbol| {
                    Ok(CoinAddress {
                        symbol,
                        address: wallet.derive_address(symbol)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    println!("{:<16}{}", row.symbol, row.address);
                }
            }
        }
        Commands::PublicKey { symbol } => {
            print_value(cli.json, "public_key", &open_wallet(cli)?.derive_public_key(symbol)?);
        }
        Commands::PrivateKey { symbol } => {
            let private_key = Zeroizing::new(open_wallet(cli)?.derive_private_key(symbol)?);
            print_value(cli.json, "private_key", &private_key);
        }
        Commands::Decode { symbol, payload } => {
            let payload = read_payload(payload.clone())?;
            println!("{}", open_wallet(cli)?.decode_tx(symbol, &payload)?);
        }
        Commands::Sign { symbol, payload } => {
            let payload = read_payload(payload.clone())?;
            print_value(cli.json, "signed", &open_wallet(cli)?.sign(symbol, &payload)?);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    debug!(testnet = cli.testnet, json = cli.json, "starting hdwallet");

    run(&cli)
}
