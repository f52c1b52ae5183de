//! Precision-safe decimal types for position and order data.
//!
//! Uses `rust_decimal` for exact decimal arithmetic. Exchange payloads carry
//! prices and quantities as decimal strings, so they are parsed straight into
//! `Decimal` without passing through floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Price with exact decimal precision.
///
/// Wraps `Decimal` to provide type safety and prevent mixing
/// prices with sizes in calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

impl Price {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Absolute distance from `entry` as a percentage of `entry`.
    ///
    /// `|entry - self| / entry * 100`. Returns `None` when `entry` is zero.
    #[inline]
    pub fn distance_pct_from(&self, entry: Price) -> Option<Decimal> {
        if entry.is_zero() {
            return None;
        }
        Some((entry.0 - self.0).abs() / entry.0 * Decimal::ONE_HUNDRED)
    }

    /// Whether two prices differ by more than `tolerance`.
    #[inline]
    pub fn differs_from(&self, other: Price, tolerance: Decimal) -> bool {
        (self.0 - other.0).abs() > tolerance
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

/// Signed position quantity with exact decimal precision.
///
/// Positive for long exposure, negative for short. On one-way accounts the
/// sign is the only indication of direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Size(pub Decimal);

impl Size {
    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Contract quantity regardless of direction.
    #[inline]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Whether the magnitude is strictly below `epsilon`.
    #[inline]
    pub fn is_negligible(&self, epsilon: Decimal) -> bool {
        self.0.abs() < epsilon
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Size {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Size {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_distance_pct_below_entry() {
        let entry = Price::new(dec!(50000));
        let stop = Price::new(dec!(49000));

        assert_eq!(stop.distance_pct_from(entry), Some(dec!(2)));
    }

    #[test]
    fn test_distance_pct_above_entry_is_absolute() {
        // Short position with stop above entry
        let entry = Price::new(dec!(2000));
        let stop = Price::new(dec!(2050));

        assert_eq!(stop.distance_pct_from(entry), Some(dec!(2.5)));
    }

    #[test]
    fn test_distance_pct_zero_entry() {
        let stop = Price::new(dec!(100));
        assert_eq!(stop.distance_pct_from(Price::ZERO), None);
    }

    #[test]
    fn test_differs_from_tolerance() {
        let a = Price::new(dec!(49000.0000001));
        let b = Price::new(dec!(49000));

        assert!(!a.differs_from(b, dec!(0.000001)));
        assert!(Price::new(dec!(48500)).differs_from(b, dec!(0.000001)));
    }

    #[test]
    fn test_size_negligible() {
        assert!(Size::new(dec!(0.000000001)).is_negligible(dec!(0.00000001)));
        assert!(Size::new(dec!(-0.000000001)).is_negligible(dec!(0.00000001)));
        assert!(!Size::new(dec!(-0.1)).is_negligible(dec!(0.00000001)));
    }

    #[test]
    fn test_display_normalizes_trailing_zeros() {
        let size: Size = "0.100".parse().unwrap();
        assert_eq!(size.to_string(), "0.1");
        assert_eq!(size.abs(), Size::new(dec!(0.1)));
    }
}
