//! Typed Amounts
//!
//! A reward is a set of coins across one or more denominations.
//! Stored as a sorted map so iteration, display and encoding are
//! deterministic. Zero entries are never kept.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Multi-denomination amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coins(BTreeMap<String, u128>);

/// Errors parsing a textual amount such as `100token,5stake`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoinsParseError {
    /// Entry has no leading digits.
    #[error("missing amount in {0:?}")]
    MissingAmount(String),

    /// Amount does not fit in u128.
    #[error("amount out of range in {0:?}")]
    AmountOutOfRange(String),

    /// Denomination is not `[a-z][a-z0-9]{2,15}`.
    #[error("invalid denom {0:?}")]
    InvalidDenom(String),

    /// Same denom listed twice.
    #[error("duplicate denom {0:?}")]
    DuplicateDenom(String),
}

/// Check a denomination name.
pub fn is_valid_denom(denom: &str) -> bool {
    let bytes = denom.as_bytes();
    (3..=16).contains(&bytes.len())
        && bytes[0].is_ascii_lowercase()
        && bytes[1..].iter().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

impl Coins {
    /// Empty amount.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Single-denom amount. A zero amount yields an empty set.
    pub fn single(denom: impl Into<String>, amount: u128) -> Self {
        let mut coins = Self::new();
        if amount > 0 {
            coins.0.insert(denom.into(), amount);
        }
        coins
    }

    /// Amount held in one denom.
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0.get(denom).copied().unwrap_or(0)
    }

    /// True when no denom has a balance.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// True when at least one denom has a balance.
    ///
    /// Zero entries are never stored, so a non-empty set is strictly positive.
    pub fn is_positive(&self) -> bool {
        !self.0.is_empty()
    }

    /// True when every denom name is well-formed.
    pub fn has_valid_denoms(&self) -> bool {
        self.0.keys().all(|d| is_valid_denom(d))
    }

    /// Iterate `(denom, amount)` in denom order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u128)> {
        self.0.iter().map(|(d, a)| (d.as_str(), *a))
    }

    /// Sum, or None on overflow.
    pub fn checked_add(&self, other: &Coins) -> Option<Coins> {
        let mut out = self.0.clone();
        for (denom, amount) in &other.0 {
            let entry = out.entry(denom.clone()).or_insert(0);
            *entry = entry.checked_add(*amount)?;
        }
        Some(Coins(out))
    }

    /// Difference, or None if any denom would go negative.
    pub fn checked_sub(&self, other: &Coins) -> Option<Coins> {
        let mut out = self.0.clone();
        for (denom, amount) in &other.0 {
            let held = out.get(denom).copied().unwrap_or(0);
            let left = held.checked_sub(*amount)?;
            if left == 0 {
                out.remove(denom);
            } else {
                out.insert(denom.clone(), left);
            }
        }
        Some(Coins(out))
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (denom, amount) in &self.0 {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{}{}", amount, denom)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Coins {
    type Err = CoinsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut coins = BTreeMap::new();
        let s = s.trim();
        if s.is_empty() {
            return Ok(Coins::new());
        }

        for part in s.split(',') {
            let part = part.trim();
            let split = part.find(|c: char| !c.is_ascii_digit()).unwrap_or(part.len());
            let (digits, denom) = part.split_at(split);
            if digits.is_empty() {
                return Err(CoinsParseError::MissingAmount(part.to_string()));
            }
            let amount: u128 = digits
                .parse()
                .map_err(|_| CoinsParseError::AmountOutOfRange(part.to_string()))?;
            if !is_valid_denom(denom) {
                return Err(CoinsParseError::InvalidDenom(denom.to_string()));
            }
            if coins.contains_key(denom) {
                return Err(CoinsParseError::DuplicateDenom(denom.to_string()));
            }
            if amount > 0 {
                coins.insert(denom.to_string(), amount);
            }
        }

        Ok(Coins(coins))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let coins: Coins = "5stake,100token".parse().unwrap();
        assert_eq!(coins.amount_of("token"), 100);
        assert_eq!(coins.amount_of("stake"), 5);
        // Sorted by denom
        assert_eq!(coins.to_string(), "5stake,100token");
    }

    #[test]
    fn test_parse_drops_zero() {
        let coins: Coins = "0token".parse().unwrap();
        assert!(coins.is_zero());
        assert!(!coins.is_positive());
        assert!(Coins::single("token", 0).is_zero());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!("token".parse::<Coins>(), Err(CoinsParseError::MissingAmount(_))));
        assert!(matches!("10T".parse::<Coins>(), Err(CoinsParseError::InvalidDenom(_))));
        assert!(matches!("10ab".parse::<Coins>(), Err(CoinsParseError::InvalidDenom(_))));
        assert!(matches!(
            "1token,2token".parse::<Coins>(),
            Err(CoinsParseError::DuplicateDenom(_))
        ));
        assert!(matches!(
            "999999999999999999999999999999999999999999token".parse::<Coins>(),
            Err(CoinsParseError::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn test_checked_arithmetic() {
        let a: Coins = "100token,5stake".parse().unwrap();
        let b: Coins = "40token".parse().unwrap();

        let diff = a.checked_sub(&b).unwrap();
        assert_eq!(diff.amount_of("token"), 60);
        assert_eq!(diff.amount_of("stake"), 5);

        let sum = diff.checked_add(&b).unwrap();
        assert_eq!(sum, a);

        // Missing denom cannot be subtracted
        assert!(b.checked_sub(&a).is_none());
    }

    #[test]
    fn test_sub_to_zero_removes_entry() {
        let a = Coins::single("token", 10);
        let left = a.checked_sub(&a).unwrap();
        assert!(left.is_zero());
        assert_eq!(left, Coins::new());
    }

    #[test]
    fn test_add_overflow() {
        let max = Coins::single("token", u128::MAX);
        assert!(max.checked_add(&Coins::single("token", 1)).is_none());
    }
}
