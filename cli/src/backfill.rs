//! LP share rows for the `(pool_address, user_address, shares, updated_at)` table
//!
//! Rows are rendered as JSON or as an SQL upsert for an operator to apply.
//! Nothing here opens a database connection.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use log::info;
use num_bigint::BigInt;
use pool_math::Reserves;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::PathBuf;

use crate::config::NetworkConfig;
use crate::ledger::{self, format_address};

pub const SHARES_TABLE: &str = "lp_shares";

/// Output encoding for generated rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RowFormat {
    Json,
    Sql,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareRecord {
    pub pool_address: String,
    pub user_address: String,
    /// Decimal string so consumers never round through a float
    #[serde(serialize_with = "serialize_decimal")]
    pub shares: BigInt,
    pub updated_at: DateTime<Utc>,
}

fn serialize_decimal<S: Serializer>(value: &BigInt, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl ShareRecord {
    /// Row for the sole depositor of a pool: shares = floor(sqrt(a·b))
    pub fn from_reserves(
        pool_address: &str,
        user_address: &str,
        reserves: &Reserves,
        updated_at: DateTime<Utc>,
    ) -> Result<Self> {
        let shares = reserves.initial_shares()?;
        Ok(Self {
            pool_address: pool_address.to_string(),
            user_address: user_address.to_string(),
            shares,
            updated_at,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("Failed to serialize share record")
    }

    /// Upsert keyed on `(pool_address, user_address)`
    pub fn to_sql(&self) -> String {
        format!(
            "INSERT INTO {table} (pool_address, user_address, shares, updated_at) \
             VALUES ({pool}, {user}, {shares}, {ts}) \
             ON CONFLICT (pool_address, user_address) \
             DO UPDATE SET shares = EXCLUDED.shares, updated_at = EXCLUDED.updated_at;",
            table = SHARES_TABLE,
            pool = sql_quote(&self.pool_address),
            user = sql_quote(&self.user_address),
            shares = self.shares,
            ts = sql_quote(&self.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        )
    }

    pub fn render(&self, format: RowFormat) -> Result<String> {
        match format {
            RowFormat::Json => self.to_json(),
            RowFormat::Sql => Ok(self.to_sql()),
        }
    }
}

/// Single-quoted SQL literal
fn sql_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Resolve the pool's tokens from config unless both were given explicitly
fn resolve_tokens(
    config: &NetworkConfig,
    pool: &str,
    token_a: Option<String>,
    token_b: Option<String>,
) -> Result<(String, String)> {
    match (token_a, token_b) {
        (Some(a), Some(b)) => Ok((a, b)),
        (None, None) => {
            let entry = config.find_pool_by_address(pool).with_context(|| {
                format!("Pool {} is not in the config; pass --token-a and --token-b", pool)
            })?;
            Ok((entry.token_a.clone(), entry.token_b.clone()))
        }
        _ => anyhow::bail!("--token-a and --token-b must be given together"),
    }
}

/// Compute a share row from a pool's balance export and emit it
pub fn generate_share_row(
    config: &NetworkConfig,
    balances: PathBuf,
    pool: String,
    user: String,
    token_a: Option<String>,
    token_b: Option<String>,
    format: RowFormat,
    out: Option<PathBuf>,
) -> Result<()> {
    let (token_a, token_b) = resolve_tokens(config, &pool, token_a, token_b)?;
    let records = ledger::load_balances(&balances)?;
    let reserves = ledger::reserves_for(&records, &token_a, &token_b)?;

    if reserves.is_empty() {
        println!("{}", "Pool is empty; the row will carry zero shares".yellow());
    }

    let record = ShareRecord::from_reserves(&pool, &user, &reserves, Utc::now())?;
    let row = record.render(format)?;
    info!("share row pool={} user={} shares={}", pool, user, record.shares);

    match out {
        Some(path) => {
            fs::write(&path, format!("{}\n", row))
                .with_context(|| format!("Failed to write row to {}", path.display()))?;
            println!("{}", "=== Share Row Written ===".bright_green().bold());
            println!("{} {}", "Pool:".bright_cyan(), format_address(&pool));
            println!("{} {}", "User:".bright_cyan(), format_address(&user));
            println!("{} {}", "Shares:".bright_cyan(), record.shares);
            println!("{} {}", "File:".bright_cyan(), path.display());
        }
        None => println!("{}", row),
    }

    Ok(())
}
