//! Order-independent identifiers for two-token pools

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{PoolMathError, Result};

/// Joins the two sorted token identifiers
pub const PAIR_KEY_SEPARATOR: &str = ":";

/// Normalized token pair; `PairKey::new(a, b) == PairKey::new(b, a)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    /// Token identifiers must be non-empty and free of the separator, so
    /// distinct pairs never share a key and `Display` parses back.
    pub fn new(token_a: &str, token_b: &str) -> Result<Self> {
        for token in [token_a, token_b] {
            if token.is_empty() || token.contains(PAIR_KEY_SEPARATOR) {
                return Err(PoolMathError::InvalidPairKey(token.to_string()));
            }
        }
        let (first, second) = if token_a <= token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Ok(Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    /// Tokens in sorted order
    pub fn tokens(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }
}

/// String form of [`PairKey::new`]
pub fn pair_key(token_a: &str, token_b: &str) -> Result<String> {
    Ok(PairKey::new(token_a, token_b)?.to_string())
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.first, PAIR_KEY_SEPARATOR, self.second)
    }
}

impl FromStr for PairKey {
    type Err = PoolMathError;

    fn from_str(s: &str) -> Result<Self> {
        let (a, b) = s
            .split_once(PAIR_KEY_SEPARATOR)
            .ok_or_else(|| PoolMathError::InvalidPairKey(s.to_string()))?;
        PairKey::new(a, b).map_err(|_| PoolMathError::InvalidPairKey(s.to_string()))
    }
}

impl Serialize for PairKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PairKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
