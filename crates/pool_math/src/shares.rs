//! LP share issuance and ownership (x·y=k)

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::{integer_sqrt, PoolMathError, Reserves, Result, FRACTION_SCALE};

fn ensure_non_negative(value: &BigInt, name: &'static str) -> Result<()> {
    if value.is_negative() {
        return Err(PoolMathError::NegativeInput(name));
    }
    Ok(())
}

/// Shares minted to the first depositor of an empty pool
///
/// Geometric mean of the deposit:
/// - shares = floor(sqrt(reserve_a · reserve_b))
///
/// The result does not depend on the price ratio the first depositor picks.
pub fn compute_initial_shares(reserve_a: &BigInt, reserve_b: &BigInt) -> Result<BigInt> {
    ensure_non_negative(reserve_a, "reserve_a")?;
    ensure_non_negative(reserve_b, "reserve_b")?;

    integer_sqrt(&(reserve_a * reserve_b))
}

/// Holder's fraction of the pool, for display only
///
/// The ratio is taken exactly as `shares · 1e18 / total_supply` before the
/// float conversion, so supplies beyond f64 range still produce a value.
///
/// # Returns
/// * fraction in `[0, 1]`
/// * `PoolMathError::ZeroSupply` if `total_supply == 0`
/// * `PoolMathError::SharesExceedSupply` if `shares > total_supply`
pub fn compute_ownership_fraction(shares: &BigInt, total_supply: &BigInt) -> Result<f64> {
    ensure_non_negative(shares, "shares")?;
    ensure_non_negative(total_supply, "total_supply")?;
    if total_supply.is_zero() {
        return Err(PoolMathError::ZeroSupply);
    }
    if shares > total_supply {
        return Err(PoolMathError::SharesExceedSupply);
    }

    let scaled = shares * BigInt::from(FRACTION_SCALE) / total_supply;
    let scaled = scaled.to_u64().ok_or(PoolMathError::SharesExceedSupply)?;

    Ok(scaled as f64 / FRACTION_SCALE as f64)
}

/// Ownership as a percentage (0..=100)
pub fn ownership_percent(shares: &BigInt, total_supply: &BigInt) -> Result<f64> {
    Ok(compute_ownership_fraction(shares, total_supply)? * 100.0)
}

/// Shares minted for a deposit into an existing pool
///
/// Proportional to the scarcer side:
/// - shares = floor(min(Δa · S / a, Δb · S / b))
///
/// An empty pool (no supply or a zero reserve) falls back to the initial
/// geometric-mean rule on the deposit itself.
pub fn compute_deposit_shares(
    reserves: &Reserves,
    amount_a: &BigInt,
    amount_b: &BigInt,
    total_supply: &BigInt,
) -> Result<BigInt> {
    ensure_non_negative(amount_a, "amount_a")?;
    ensure_non_negative(amount_b, "amount_b")?;
    ensure_non_negative(total_supply, "total_supply")?;

    if total_supply.is_zero() || reserves.is_empty() {
        return compute_initial_shares(amount_a, amount_b);
    }

    let from_a = amount_a * total_supply / reserves.reserve_a();
    let from_b = amount_b * total_supply / reserves.reserve_b();

    Ok(from_a.min(from_b))
}

/// Reserve amounts returned when burning `shares`
///
/// - out_a = floor(a · shares / S)
/// - out_b = floor(b · shares / S)
pub fn compute_redemption(
    reserves: &Reserves,
    shares: &BigInt,
    total_supply: &BigInt,
) -> Result<(BigInt, BigInt)> {
    ensure_non_negative(shares, "shares")?;
    ensure_non_negative(total_supply, "total_supply")?;
    if total_supply.is_zero() {
        return Err(PoolMathError::ZeroSupply);
    }
    if shares > total_supply {
        return Err(PoolMathError::SharesExceedSupply);
    }

    let out_a = reserves.reserve_a() * shares / total_supply;
    let out_b = reserves.reserve_b() * shares / total_supply;

    Ok((out_a, out_b))
}
