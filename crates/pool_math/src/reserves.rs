//! Reserve pair held by a pool account

use num_bigint::BigInt;
use num_traits::{Signed, Zero};

use crate::{shares::compute_initial_shares, PoolMathError, Result};

/// Token quantities held by a pool, ordered to match the pair key.
/// Both sides are non-negative; `new` is the only constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reserves {
    reserve_a: BigInt,
    reserve_b: BigInt,
}

impl Reserves {
    pub fn new(reserve_a: BigInt, reserve_b: BigInt) -> Result<Self> {
        if reserve_a.is_negative() {
            return Err(PoolMathError::NegativeInput("reserve_a"));
        }
        if reserve_b.is_negative() {
            return Err(PoolMathError::NegativeInput("reserve_b"));
        }
        Ok(Self { reserve_a, reserve_b })
    }

    pub fn reserve_a(&self) -> &BigInt {
        &self.reserve_a
    }

    pub fn reserve_b(&self) -> &BigInt {
        &self.reserve_b
    }

    /// A pool with either side at zero has no meaningful price
    pub fn is_empty(&self) -> bool {
        self.reserve_a.is_zero() || self.reserve_b.is_zero()
    }

    /// k = x·y
    pub fn invariant(&self) -> BigInt {
        &self.reserve_a * &self.reserve_b
    }

    pub fn initial_shares(&self) -> Result<BigInt> {
        compute_initial_shares(&self.reserve_a, &self.reserve_b)
    }
}
