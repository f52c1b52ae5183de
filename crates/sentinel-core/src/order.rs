//! Resting order types.
//!
//! The exchange reports every open order with a string `type` tag. The tag is
//! mapped onto [`OrderKind`] at the boundary; tags this crate does not know
//! about become [`OrderKind::Unknown`] and are ignored rather than rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Price;

/// Order type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    Limit,
    Market,
    Stop,
    StopMarket,
    TakeProfit,
    TakeProfitMarket,
    TrailingStopMarket,
    #[serde(other)]
    Unknown,
}

impl OrderKind {
    /// Only plain stop and stop-market orders count as protective stop-losses.
    pub fn is_stop_loss(&self) -> bool {
        matches!(self, Self::Stop | Self::StopMarket)
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
            Self::Stop => "STOP",
            Self::StopMarket => "STOP_MARKET",
            Self::TakeProfit => "TAKE_PROFIT",
            Self::TakeProfitMarket => "TAKE_PROFIT_MARKET",
            Self::TrailingStopMarket => "TRAILING_STOP_MARKET",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// An open order resting on the book for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrder {
    pub symbol: String,
    pub order_id: u64,
    pub kind: OrderKind,
    /// Trigger price for conditional orders.
    pub stop_price: Option<Price>,
    /// Limit price.
    pub price: Option<Price>,
}

impl RestingOrder {
    /// Trigger price: the stop price, falling back to the limit price.
    ///
    /// The exchange reports unset prices as `"0"`, so zero counts as absent.
    pub fn trigger_price(&self) -> Option<Price> {
        self.stop_price
            .filter(Price::is_positive)
            .or_else(|| self.price.filter(Price::is_positive))
    }

    /// View this order as a stop-loss, if it is one and has a usable trigger.
    pub fn as_stop_loss(&self) -> Option<StopLossOrder> {
        if !self.kind.is_stop_loss() {
            return None;
        }
        self.trigger_price().map(|trigger_price| StopLossOrder {
            order_id: self.order_id,
            trigger_price,
        })
    }
}

/// A protective stop-loss resolved from a [`RestingOrder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopLossOrder {
    pub order_id: u64,
    pub trigger_price: Price,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(kind: OrderKind, stop: Option<Price>, price: Option<Price>) -> RestingOrder {
        RestingOrder {
            symbol: "BTCUSDT".to_string(),
            order_id: 7,
            kind,
            stop_price: stop,
            price,
        }
    }

    #[test]
    fn test_order_kind_from_exchange_tag() {
        let kind: OrderKind = serde_json::from_str("\"STOP_MARKET\"").unwrap();
        assert_eq!(kind, OrderKind::StopMarket);

        let kind: OrderKind = serde_json::from_str("\"LIQUIDATION\"").unwrap();
        assert_eq!(kind, OrderKind::Unknown);
    }

    #[test]
    fn test_is_stop_loss() {
        assert!(OrderKind::Stop.is_stop_loss());
        assert!(OrderKind::StopMarket.is_stop_loss());
        assert!(!OrderKind::TakeProfitMarket.is_stop_loss());
        assert!(!OrderKind::TrailingStopMarket.is_stop_loss());
        assert!(!OrderKind::Unknown.is_stop_loss());
    }

    #[test]
    fn test_trigger_price_prefers_stop_price() {
        let o = order(
            OrderKind::Stop,
            Some(Price::new(dec!(49000))),
            Some(Price::new(dec!(48900))),
        );
        assert_eq!(o.trigger_price(), Some(Price::new(dec!(49000))));
    }

    #[test]
    fn test_trigger_price_falls_back_to_limit_price() {
        let o = order(OrderKind::Stop, Some(Price::ZERO), Some(Price::new(dec!(48900))));
        assert_eq!(o.trigger_price(), Some(Price::new(dec!(48900))));

        let o = order(OrderKind::Stop, None, Some(Price::new(dec!(48900))));
        assert_eq!(o.trigger_price(), Some(Price::new(dec!(48900))));
    }

    #[test]
    fn test_as_stop_loss() {
        let o = order(OrderKind::StopMarket, Some(Price::new(dec!(49000))), None);
        let sl = o.as_stop_loss().unwrap();
        assert_eq!(sl.trigger_price, Price::new(dec!(49000)));
        assert_eq!(sl.order_id, 7);

        let tp = order(OrderKind::TakeProfit, Some(Price::new(dec!(55000))), None);
        assert!(tp.as_stop_loss().is_none());

        let no_trigger = order(OrderKind::Stop, None, None);
        assert!(no_trigger.as_stop_loss().is_none());
    }
}
