//! Ledger balance exports and display helpers
//!
//! The ledger client hands back account balances in a few loosely-typed
//! shapes. They are mapped into [`Balance`] here, once, so the rest of the
//! CLI never looks at optional fields again.

use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use pool_math::{PoolMathError, Reserves};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

pub type TokenId = String;

/// One token holding of a ledger account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub token: TokenId,
    pub amount: BigInt,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("expected a JSON array of balances or an object with a `balances` array")]
    UnexpectedShape,
    #[error("balance record {index}: missing token")]
    MissingToken { index: usize },
    #[error("balance record {index}: missing amount")]
    MissingAmount { index: usize },
    #[error("balance record {index}: invalid amount {value}")]
    InvalidAmount { index: usize, value: String },
    #[error("balance record {index}: negative amount {value}")]
    NegativeAmount { index: usize, value: BigInt },
}

/// Map a balance export into typed records
pub fn parse_balances(value: &Value) -> std::result::Result<Vec<Balance>, LedgerError> {
    let records = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("balances") {
            Some(Value::Array(items)) => items,
            _ => return Err(LedgerError::UnexpectedShape),
        },
        _ => return Err(LedgerError::UnexpectedShape),
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| parse_record(index, record))
        .collect()
}

fn parse_record(index: usize, record: &Value) -> std::result::Result<Balance, LedgerError> {
    let token = match record.get("token") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(obj)) => obj
            .get("publicKeyString")
            .or_else(|| obj.get("address"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
    .filter(|t| !t.is_empty())
    .ok_or(LedgerError::MissingToken { index })?;

    let raw = record
        .get("balance")
        .or_else(|| record.get("amount"))
        .ok_or(LedgerError::MissingAmount { index })?;

    let amount = match raw {
        Value::String(s) => parse_amount(s),
        Value::Number(n) => n
            .as_u64()
            .map(BigInt::from)
            .or_else(|| n.as_i64().map(BigInt::from)),
        _ => None,
    }
    .ok_or_else(|| LedgerError::InvalidAmount {
        index,
        value: raw.to_string(),
    })?;

    if amount.is_negative() {
        return Err(LedgerError::NegativeAmount { index, value: amount });
    }

    Ok(Balance { token, amount })
}

/// Parse a decimal or `0x`-prefixed hex integer, with at most one leading `-`.
/// Only digits of the radix are accepted: no `+`, no `_` separators.
pub fn parse_amount(text: &str) -> Option<BigInt> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (digits, radix) = match unsigned.strip_prefix("0x").or_else(|| unsigned.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (unsigned, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), radix)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Read a balance export from a file, or stdin when `path` is `-`
pub fn load_balances(path: &Path) -> Result<Vec<Balance>> {
    let data = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read balances from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read balances file: {}", path.display()))?
    };

    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse balances JSON: {}", path.display()))?;

    let balances = parse_balances(&value)?;
    debug!("loaded {} balance records from {}", balances.len(), path.display());

    Ok(balances)
}

/// Total held of `token`; zero when the account has none
pub fn balance_of(balances: &[Balance], token: &str) -> BigInt {
    balances
        .iter()
        .filter(|b| b.token == token)
        .fold(BigInt::zero(), |acc, b| acc + &b.amount)
}

/// Pool reserves ordered as `(token_a, token_b)`
pub fn reserves_for(
    balances: &[Balance],
    token_a: &str,
    token_b: &str,
) -> std::result::Result<Reserves, PoolMathError> {
    Reserves::new(balance_of(balances, token_a), balance_of(balances, token_b))
}

/// Render a raw integer amount with `decimals` fractional digits
pub fn format_amount(amount: &BigInt, decimals: u32) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let digits = amount.abs().to_string();
    if decimals == 0 {
        return format!("{}{}", sign, digits);
    }

    let decimals = decimals as usize;
    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');

    if frac.is_empty() {
        format!("{}{}", sign, whole)
    } else {
        format!("{}{}.{}", sign, whole, frac)
    }
}

/// Shorten a long account address to `head...tail`
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 19 {
        return address.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn format_address(address: &str) -> String {
    short_address(address).bright_yellow().to_string()
}
