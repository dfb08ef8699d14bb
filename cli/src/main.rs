//! dexpool CLI - Liquidity pool accounting for operators
//!
//! One-shot commands that turn ledger balance exports into LP share figures:
//! integer square roots, initial share issuance, ownership, pair keys, and
//! share rows ready for the backfill table.

use clap::{Parser, Subcommand};
use colored::Colorize;
use num_bigint::BigInt;
use std::path::PathBuf;

mod backfill;
mod config;
mod ledger;
mod shares;

use backfill::RowFormat;
use config::NetworkConfig;
use shares::parse_integer;

#[derive(Parser)]
#[command(name = "dexpool")]
#[command(about = "Constant-product pool accounting - shares, reserves and pair keys", long_about = None)]
#[command(version)]
struct Cli {
    /// Network the balances come from (local, test, main)
    #[arg(short, long, default_value = "test")]
    network: String,

    /// Ledger API URL (overrides network default)
    #[arg(short, long)]
    url: Option<String>,

    /// Path to a TOML file listing pools
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integer square root of an arbitrary-size integer
    Sqrt {
        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        n: BigInt,
    },

    /// Share calculations
    Shares {
        #[command(subcommand)]
        command: SharesCommands,
    },

    /// Order-independent key for a token pair
    PairKey {
        token_a: String,
        token_b: String,
    },

    /// Pool operations against a ledger balance export
    Pool {
        #[command(subcommand)]
        command: PoolCommands,
    },

    /// Generate an LP share row for the backfill table
    Backfill {
        /// Balance export of the pool account (JSON, `-` for stdin)
        #[arg(long)]
        balances: PathBuf,

        /// Pool account address
        #[arg(long)]
        pool: String,

        /// Liquidity provider address
        #[arg(long)]
        user: String,

        /// First token (defaults to the pool's config entry)
        #[arg(long)]
        token_a: Option<String>,

        /// Second token (defaults to the pool's config entry)
        #[arg(long)]
        token_b: Option<String>,

        /// Row encoding
        #[arg(long, value_enum, default_value = "sql")]
        format: RowFormat,

        /// Write the row to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SharesCommands {
    /// Shares for the first deposit: floor(sqrt(a·b))
    Initial {
        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        reserve_a: BigInt,

        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        reserve_b: BigInt,
    },

    /// Fraction of the pool held by `shares`
    Ownership {
        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        shares: BigInt,

        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        total_supply: BigInt,
    },

    /// Shares minted for a deposit into an existing pool
    Deposit {
        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        reserve_a: BigInt,

        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        reserve_b: BigInt,

        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        amount_a: BigInt,

        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        amount_b: BigInt,

        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        total_supply: BigInt,
    },

    /// Reserves returned for burning shares
    Redeem {
        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        reserve_a: BigInt,

        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        reserve_b: BigInt,

        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        shares: BigInt,

        #[arg(value_parser = parse_integer, allow_hyphen_values = true)]
        total_supply: BigInt,
    },
}

#[derive(Subcommand)]
enum PoolCommands {
    /// Show reserves, k and share figures for a pool
    Inspect {
        /// Balance export of the pool account (JSON, `-` for stdin)
        #[arg(long)]
        balances: PathBuf,

        /// Pool account address (tokens are taken from config)
        #[arg(long)]
        pool: Option<String>,

        /// First token
        #[arg(long)]
        token_a: Option<String>,

        /// Second token
        #[arg(long)]
        token_b: Option<String>,

        /// Decimal places used when printing amounts
        #[arg(long, default_value = "0")]
        decimals: u32,

        /// LP shares held, for an ownership figure
        #[arg(long, value_parser = parse_integer)]
        shares: Option<BigInt>,

        /// LP token total supply, for an ownership figure
        #[arg(long, value_parser = parse_integer)]
        total_supply: Option<BigInt>,
    },

    /// List pools from the config file
    List,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = NetworkConfig::new(&cli.network, cli.url.clone(), cli.config.clone())?;

    if cli.verbose {
        println!("{} {}", "Network:".bright_cyan(), config.network);
        println!("{} {}", "Ledger URL:".bright_cyan(), config.ledger_url);
        if let Some(path) = &config.config_path {
            println!("{} {}", "Config:".bright_cyan(), path.display());
        }
    }

    match cli.command {
        Commands::Sqrt { n } => {
            shares::show_sqrt(n)?;
        }
        Commands::Shares { command } => match command {
            SharesCommands::Initial { reserve_a, reserve_b } => {
                shares::show_initial_shares(reserve_a, reserve_b)?;
            }
            SharesCommands::Ownership { shares, total_supply } => {
                shares::show_ownership(shares, total_supply)?;
            }
            SharesCommands::Deposit { reserve_a, reserve_b, amount_a, amount_b, total_supply } => {
                shares::show_deposit(reserve_a, reserve_b, amount_a, amount_b, total_supply)?;
            }
            SharesCommands::Redeem { reserve_a, reserve_b, shares, total_supply } => {
                shares::show_redemption(reserve_a, reserve_b, shares, total_supply)?;
            }
        },
        Commands::PairKey { token_a, token_b } => {
            shares::show_pair_key(token_a, token_b)?;
        }
        Commands::Pool { command } => match command {
            PoolCommands::Inspect { balances, pool, token_a, token_b, decimals, shares, total_supply } => {
                shares::inspect_pool(&config, balances, pool, token_a, token_b, decimals, shares, total_supply)?;
            }
            PoolCommands::List => {
                list_pools(&config)?;
            }
        },
        Commands::Backfill { balances, pool, user, token_a, token_b, format, out } => {
            backfill::generate_share_row(&config, balances, pool, user, token_a, token_b, format, out)?;
        }
    }

    Ok(())
}

fn list_pools(config: &NetworkConfig) -> anyhow::Result<()> {
    println!("{}", "=== Configured Pools ===".bright_green().bold());
    if config.pools.is_empty() {
        println!("{}", "No pools configured (use --config)".dimmed());
        return Ok(());
    }
    for pool in &config.pools {
        println!("{} {}", ledger::format_address(&pool.address), pool.pair_key()?);
    }
    Ok(())
}
