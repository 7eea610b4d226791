//! Fixed-point order keys.
//!
//! Order keys are decimals with two fractional digits. They are stored as a
//! count of hundredths so that comparisons and midpoints are exact.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A sortable decimal key with two-digit precision.
///
/// # Examples
///
/// ```
/// use u_sequence::models::OrderKey;
///
/// let key: OrderKey = "2.5".parse().unwrap();
/// assert_eq!(key.hundredths(), 250);
/// assert_eq!(key.to_string(), "2.50");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct OrderKey(i64);

impl OrderKey {
    /// `0.00`
    pub const ZERO: Self = Self(0);
    /// `1.00`, the gap used at either end of a list.
    pub const ONE: Self = Self(100);

    /// Creates a key from a count of hundredths.
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Creates a key from a whole number.
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Key value in hundredths.
    #[inline]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Adds two keys, `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Subtracts two keys, `None` on overflow.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Multiplies a key by a whole factor, `None` on overflow.
    pub fn checked_mul(self, factor: i64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    /// Midpoint of two keys rounded half-up to two decimals.
    pub fn midpoint(self, other: Self) -> Self {
        let sum = self.0 as i128 + other.0 as i128;
        Self(sum.div_euclid(2) as i64 + sum.rem_euclid(2) as i64)
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Error parsing or converting an order key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid order key: {0}")]
pub struct ParseOrderKeyError(String);

impl FromStr for OrderKey {
    type Err = ParseOrderKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let (negative, digits) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if (whole.is_empty() && frac.is_empty())
            || frac.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ParseOrderKeyError(s.to_string()));
        }
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| ParseOrderKeyError(s.to_string()))?
        };
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| ParseOrderKeyError(s.to_string()))? * 10,
            _ => frac.parse().map_err(|_| ParseOrderKeyError(s.to_string()))?,
        };
        let value = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(|| ParseOrderKeyError(s.to_string()))?;
        Ok(Self(if negative { -value } else { value }))
    }
}

impl From<OrderKey> for f64 {
    fn from(key: OrderKey) -> Self {
        key.0 as f64 / 100.0
    }
}

impl TryFrom<f64> for OrderKey {
    type Error = ParseOrderKeyError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let scaled = (value * 100.0).round();
        if !scaled.is_finite() || scaled.abs() > i64::MAX as f64 {
            return Err(ParseOrderKeyError(value.to_string()));
        }
        Ok(Self(scaled as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(OrderKey::from_hundredths(150).to_string(), "1.50");
        assert_eq!(OrderKey::from_hundredths(5).to_string(), "0.05");
        assert_eq!(OrderKey::from_hundredths(-25).to_string(), "-0.25");
        assert_eq!(OrderKey::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("3".parse::<OrderKey>().unwrap(), OrderKey::from_units(3));
        assert_eq!("1.5".parse::<OrderKey>().unwrap().hundredths(), 150);
        assert_eq!("0.05".parse::<OrderKey>().unwrap().hundredths(), 5);
        assert_eq!(".75".parse::<OrderKey>().unwrap().hundredths(), 75);
        assert_eq!("-1.25".parse::<OrderKey>().unwrap().hundredths(), -125);
        assert!("1.234".parse::<OrderKey>().is_err());
        assert!("abc".parse::<OrderKey>().is_err());
        assert!("".parse::<OrderKey>().is_err());
    }

    #[test]
    fn test_midpoint_rounds_half_up() {
        let a = OrderKey::from_hundredths(100);
        assert_eq!(a.midpoint(OrderKey::from_hundredths(200)).hundredths(), 150);
        assert_eq!(a.midpoint(OrderKey::from_hundredths(101)).hundredths(), 101);
        assert_eq!(a.midpoint(OrderKey::from_hundredths(103)).hundredths(), 102);
    }

    #[test]
    fn test_f64_conversion() {
        assert_eq!(OrderKey::try_from(2.347).unwrap().hundredths(), 235);
        assert_eq!(f64::from(OrderKey::from_hundredths(275)), 2.75);
        assert!(OrderKey::try_from(f64::NAN).is_err());
    }

    #[test]
    fn test_serde_as_number() {
        let key = OrderKey::from_hundredths(1050);
        assert_eq!(serde_json::to_string(&key).unwrap(), "10.5");
        let back: OrderKey = serde_json::from_str("10.5").unwrap();
        assert_eq!(back, key);
    }
}
