//! Position identity and snapshot types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CoreError, Price, Size};

/// Magnitude below which a position size counts as zero (1e-8).
pub const FLAT_SIZE_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 8);

/// Position side as reported by the exchange.
///
/// Hedge-mode accounts report `LONG` and `SHORT` legs separately;
/// one-way accounts report a single `BOTH` leg with a signed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Both,
    Long,
    Short,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Both => write!(f, "BOTH"),
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

impl FromStr for PositionSide {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BOTH" => Ok(Self::Both),
            "LONG" => Ok(Self::Long),
            "SHORT" => Ok(Self::Short),
            _ => Err(CoreError::InvalidSide(s.to_string())),
        }
    }
}

/// Identity of one open position: (symbol, side).
///
/// Ordering is by symbol, then side, which gives the deterministic
/// processing order used by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub symbol: String,
    pub side: PositionSide,
}

impl PositionKey {
    pub fn new(symbol: impl Into<String>, side: PositionSide) -> Self {
        Self {
            symbol: symbol.into(),
            side,
        }
    }

    /// Build a key from exchange-reported strings, rejecting blank symbols.
    pub fn parse(symbol: &str, side: &str) -> crate::Result<Self> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(CoreError::InvalidSymbol(symbol.to_string()));
        }
        Ok(Self::new(symbol, side.parse()?))
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.symbol, self.side)
    }
}

/// One position as reported by the exchange in a position-risk snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub key: PositionKey,
    /// Average entry price. Zero when no position is held.
    pub entry_price: Price,
    /// Signed position size.
    pub size: Size,
}

impl PositionSnapshot {
    pub fn new(key: PositionKey, entry_price: Price, size: Size) -> Self {
        Self {
            key,
            entry_price,
            size,
        }
    }

    /// A position is flat (closed) when `|size| < 1e-8` or the entry price is zero.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.size.is_negligible(FLAT_SIZE_EPSILON) || self.entry_price.is_zero()
    }
}
