//! Integer square root (Newton's method)

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::{PoolMathError, Result};

/// Compute `floor(sqrt(n))` exactly.
///
/// Token amounts exceed what an `f64` can hold without rounding, so the root
/// is taken over integers:
/// - x0 = n
/// - x1 = (x0 + n / x0) / 2   (floor division)
/// - stop once the iterate no longer decreases
///
/// # Returns
/// * `r` with `r*r <= n < (r+1)*(r+1)`
/// * `PoolMathError::NegativeInput` if `n < 0`
pub fn integer_sqrt(n: &BigInt) -> Result<BigInt> {
    if n.is_negative() {
        return Err(PoolMathError::NegativeInput("sqrt operand"));
    }
    if n.is_zero() || n.is_one() {
        return Ok(n.clone());
    }

    let two = BigInt::from(2u8);
    let mut x0 = n.clone();
    loop {
        let x1 = (&x0 + n / &x0) / &two;
        if x1 >= x0 {
            return Ok(x0);
        }
        x0 = x1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn test_small_values() {
        assert_eq!(integer_sqrt(&big(0)).unwrap(), big(0));
        assert_eq!(integer_sqrt(&big(1)).unwrap(), big(1));
        assert_eq!(integer_sqrt(&big(2)).unwrap(), big(1));
        assert_eq!(integer_sqrt(&big(3)).unwrap(), big(1));
        assert_eq!(integer_sqrt(&big(4)).unwrap(), big(2));
        assert_eq!(integer_sqrt(&big(99)).unwrap(), big(9));
        assert_eq!(integer_sqrt(&big(100)).unwrap(), big(10));
    }

    #[test]
    fn test_negative_rejected() {
        let result = integer_sqrt(&big(-1));
        assert!(matches!(result, Err(PoolMathError::NegativeInput(_))));
    }

    #[test]
    fn test_wide_value() {
        // 10^40 has an exact root of 10^20, well past u64
        let n: BigInt = "10000000000000000000000000000000000000000".parse().unwrap();
        let expected: BigInt = "100000000000000000000".parse().unwrap();
        assert_eq!(integer_sqrt(&n).unwrap(), expected);

        let below = &n - big(1);
        assert_eq!(integer_sqrt(&below).unwrap(), expected - big(1));
    }
}
