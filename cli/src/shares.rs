//! Share and reserve reports

use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use num_bigint::BigInt;
use pool_math::{
    compute_deposit_shares, compute_initial_shares,
    compute_redemption, integer_sqrt, ownership_percent, PairKey, PoolMathError, Reserves,
};
use std::path::PathBuf;

use crate::config::NetworkConfig;
use crate::ledger::{self, format_address, format_amount};

/// clap parser for integer arguments (decimal or 0x hex, arbitrary width)
pub fn parse_integer(s: &str) -> std::result::Result<BigInt, String> {
    ledger::parse_amount(s).ok_or_else(|| format!("not an integer: {}", s))
}

pub fn show_sqrt(n: BigInt) -> Result<()> {
    println!("{}", "=== Integer Square Root ===".bright_green().bold());
    println!("{} {}", "n:".bright_cyan(), n);

    let root = integer_sqrt(&n)?;
    println!("{} {}", "floor(sqrt(n)):".bright_cyan(), root);
    Ok(())
}

pub fn show_initial_shares(reserve_a: BigInt, reserve_b: BigInt) -> Result<()> {
    println!("{}", "=== Initial LP Shares ===".bright_green().bold());
    println!("{} {}", "Reserve A:".bright_cyan(), reserve_a);
    println!("{} {}", "Reserve B:".bright_cyan(), reserve_b);

    let shares = compute_initial_shares(&reserve_a, &reserve_b)?;
    debug!("initial shares {} for reserves {}/{}", shares, reserve_a, reserve_b);

    println!("\n{} {}", "Shares:".bright_yellow(), shares);
    Ok(())
}

pub fn show_ownership(shares: BigInt, total_supply: BigInt) -> Result<()> {
    println!("{}", "=== Ownership ===".bright_green().bold());
    println!("{} {}", "Shares:".bright_cyan(), shares);
    println!("{} {}", "Total Supply:".bright_cyan(), total_supply);

    print_ownership(&shares, &total_supply)
}

pub fn show_deposit(
    reserve_a: BigInt,
    reserve_b: BigInt,
    amount_a: BigInt,
    amount_b: BigInt,
    total_supply: BigInt,
) -> Result<()> {
    println!("{}", "=== Deposit Quote ===".bright_green().bold());
    let reserves = Reserves::new(reserve_a, reserve_b)?;
    println!("{} {} / {}", "Reserves:".bright_cyan(), reserves.reserve_a(), reserves.reserve_b());
    println!("{} {} / {}", "Deposit:".bright_cyan(), amount_a, amount_b);
    println!("{} {}", "Total Supply:".bright_cyan(), total_supply);

    let minted = compute_deposit_shares(&reserves, &amount_a, &amount_b, &total_supply)?;
    println!("\n{} {}", "Shares minted:".bright_yellow(), minted);

    let new_supply = &total_supply + &minted;
    print_ownership(&minted, &new_supply)
}

pub fn show_redemption(
    reserve_a: BigInt,
    reserve_b: BigInt,
    shares: BigInt,
    total_supply: BigInt,
) -> Result<()> {
    println!("{}", "=== Redemption Quote ===".bright_green().bold());
    let reserves = Reserves::new(reserve_a, reserve_b)?;
    println!("{} {} / {}", "Reserves:".bright_cyan(), reserves.reserve_a(), reserves.reserve_b());
    println!("{} {}", "Burn:".bright_cyan(), shares);
    println!("{} {}", "Total Supply:".bright_cyan(), total_supply);

    let (out_a, out_b) = compute_redemption(&reserves, &shares, &total_supply)?;
    println!("\n{}", "Returned:".bright_yellow());
    println!("  {} {}", "Token A:".bright_cyan(), out_a);
    println!("  {} {}", "Token B:".bright_cyan(), out_b);
    Ok(())
}

pub fn show_pair_key(token_a: String, token_b: String) -> Result<()> {
    let key = PairKey::new(&token_a, &token_b)?;
    println!("{}", key);
    Ok(())
}

/// Report reserves and share figures for one pool from a balance export
pub fn inspect_pool(
    config: &NetworkConfig,
    balances: PathBuf,
    pool: Option<String>,
    token_a: Option<String>,
    token_b: Option<String>,
    decimals: u32,
    shares: Option<BigInt>,
    total_supply: Option<BigInt>,
) -> Result<()> {
    let (address, token_a, token_b) = match (pool, token_a, token_b) {
        (pool, Some(a), Some(b)) => {
            let address = match pool {
                Some(pool) => Some(pool),
                None => config.find_pool(&a, &b)?.map(|p| p.address.clone()),
            };
            (address, a, b)
        }
        (Some(pool), None, None) => {
            let entry = config
                .find_pool_by_address(&pool)
                .with_context(|| format!("Pool {} is not in the config; pass --token-a and --token-b", pool))?;
            (Some(pool), entry.token_a.clone(), entry.token_b.clone())
        }
        _ => anyhow::bail!("Pass --pool, or both --token-a and --token-b"),
    };

    let key = PairKey::new(&token_a, &token_b)?;
    let records = ledger::load_balances(&balances)?;
    let reserves = ledger::reserves_for(&records, &token_a, &token_b)?;

    println!("{}", "=== Pool Inspection ===".bright_green().bold());
    println!("{} {}", "Network:".bright_cyan(), config.network);
    if let Some(address) = &address {
        println!("{} {}", "Pool:".bright_cyan(), format_address(address));
    }
    println!("{} {}", "Pair:".bright_cyan(), key);

    println!("\n{}", "Reserves:".bright_yellow());
    println!("  {} {} {}", "├─".dimmed(), token_a, format_amount(reserves.reserve_a(), decimals));
    println!("  {} {} {}", "└─".dimmed(), token_b, format_amount(reserves.reserve_b(), decimals));

    if reserves.is_empty() {
        println!("\n{}", "Pool is empty (a reserve is zero)".yellow());
        return Ok(());
    }

    println!("\n{} {}", "k = x·y:".bright_cyan(), reserves.invariant());
    println!("{} {}", "Initial shares:".bright_cyan(), reserves.initial_shares()?);

    match (shares, total_supply) {
        (Some(shares), Some(total)) => {
            print_ownership(&shares, &total)?;
            if total > BigInt::from(0u8) && shares <= total {
                let (out_a, out_b) = compute_redemption(&reserves, &shares, &total)?;
                println!("  {} {} {}", "├─".dimmed(), token_a, format_amount(&out_a, decimals));
                println!("  {} {} {}", "└─".dimmed(), token_b, format_amount(&out_b, decimals));
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            println!("\n{}", "Ownership needs both --shares and --total-supply".yellow());
        }
        (None, None) => {}
    }

    Ok(())
}

fn print_ownership(shares: &BigInt, total_supply: &BigInt) -> Result<()> {
    match ownership_percent(shares, total_supply) {
        Ok(percent) => {
            println!("{} {:.6}%", "Ownership:".bright_yellow(), percent);
            Ok(())
        }
        Err(PoolMathError::ZeroSupply) => {
            println!("{} {}", "Ownership:".bright_yellow(), "undefined (total supply is zero)".yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config() -> NetworkConfig {
        NetworkConfig::new("local", None, None).unwrap()
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("0x10").unwrap(), BigInt::from(16));
        assert_eq!(parse_integer("-7").unwrap(), BigInt::from(-7));
        assert!(parse_integer("ten").is_err());
    }

    #[test]
    fn test_negative_sqrt_is_an_error() {
        let err = show_sqrt(BigInt::from(-1)).unwrap_err();
        assert!(err.to_string().contains("invalid argument"));
    }

    #[test]
    fn test_zero_supply_is_reported_not_failed() {
        assert!(show_ownership(BigInt::from(5), BigInt::from(0)).is_ok());
        assert!(show_ownership(BigInt::from(6), BigInt::from(5)).is_err());
    }

    #[test]
    fn test_pair_key_rejects_separator() {
        assert!(show_pair_key("KTA".into(), "USDC".into()).is_ok());
        let err = show_pair_key("a:b".into(), "c".into()).unwrap_err();
        assert!(err.to_string().contains("invalid pair key"));
    }

    #[test]
    fn test_inspect_rejects_separator_in_token() {
        let err = inspect_pool(&config(), PathBuf::from("-"), None, Some("KTA:".into()), Some("USDC".into()), 0, None, None)
            .unwrap_err();
        assert!(err.to_string().contains("invalid pair key"));
    }

    #[test]
    fn test_inspect_requires_pool_or_tokens() {
        let err = inspect_pool(&config(), PathBuf::from("-"), None, Some("A".into()), None, 0, None, None)
            .unwrap_err();
        assert!(err.to_string().contains("--pool"));
    }

    #[test]
    fn test_inspect_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        fs::write(
            &path,
            r#"{"balances":[{"token":"KTA","balance":"5123628000000"},{"token":"USDC","balance":"14638065058588"}]}"#,
        )
        .unwrap();

        inspect_pool(
            &config(),
            path,
            None,
            Some("USDC".into()),
            Some("KTA".into()),
            6,
            Some(BigInt::from(1_000)),
            Some(BigInt::from(8_660_254_037_844u64)),
        )
        .unwrap();
    }
}
