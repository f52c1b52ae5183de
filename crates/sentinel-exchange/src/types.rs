//! Wire types for the futures position-risk and open-order endpoints.
//!
//! Numeric fields arrive as decimal strings (`"50000.00"`) and are kept as
//! strings here; conversion to core types happens in `into_*` so a bad number
//! surfaces as [`SourceError::Malformed`] with the offending field named.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use sentinel_core::{OrderKind, PositionKey, PositionSnapshot, Price, RestingOrder, Size};

use crate::error::{SourceError, SourceResult};

/// One entry of `GET /fapi/v2/positionRisk`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPositionRisk {
    pub symbol: String,
    /// Signed position amount, e.g. `"-0.010"`.
    pub position_amt: String,
    pub entry_price: String,
    /// `BOTH` in one-way mode, `LONG`/`SHORT` in hedge mode.
    #[serde(default = "default_position_side")]
    pub position_side: String,
}

fn default_position_side() -> String {
    "BOTH".to_string()
}

impl RawPositionRisk {
    pub fn into_snapshot(self) -> SourceResult<PositionSnapshot> {
        let key = PositionKey::parse(&self.symbol, &self.position_side)?;
        let entry_price = parse_decimal("entryPrice", &self.entry_price)?;
        let size = parse_decimal("positionAmt", &self.position_amt)?;
        Ok(PositionSnapshot::new(key, Price::new(entry_price), Size::new(size)))
    }
}

/// One entry of `GET /fapi/v1/openOrders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOpenOrder {
    pub order_id: u64,
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: OrderKind,
    #[serde(default)]
    pub stop_price: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

impl RawOpenOrder {
    pub fn into_resting(self) -> SourceResult<RestingOrder> {
        Ok(RestingOrder {
            stop_price: parse_optional_price("stopPrice", self.stop_price.as_deref())?,
            price: parse_optional_price("price", self.price.as_deref())?,
            symbol: self.symbol,
            order_id: self.order_id,
            kind: self.kind,
        })
    }
}

fn parse_decimal(field: &str, raw: &str) -> SourceResult<Decimal> {
    raw.trim()
        .parse()
        .map_err(|e| SourceError::Malformed(format!("{field}={raw:?}: {e}")))
}

fn parse_optional_price(field: &str, raw: Option<&str>) -> SourceResult<Option<Price>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_decimal(field, s).map(|d| Some(Price::new(d))),
    }
}

/// Classify a response body that is expected to be a JSON list.
///
/// - array: every element is decoded as `T`
/// - object: the exchange's error envelope (`{"code": .., "msg": ..}`)
/// - anything else: malformed, or an HTTP error when `status` is not 2xx
pub fn decode_list<T: DeserializeOwned>(status: u16, body: &str) -> SourceResult<Vec<T>> {
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) if (200..300).contains(&status) => {
            return Err(SourceError::Malformed(format!("invalid JSON: {e}")));
        }
        Err(_) => {
            return Err(SourceError::Http {
                status,
                body: body.to_string(),
            });
        }
    };

    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| {
                serde_json::from_value(item)
                    .map_err(|e| SourceError::Malformed(format!("entry {idx}: {e}")))
            })
            .collect(),
        Value::Object(map) => Err(SourceError::Business {
            code: map.get("code").and_then(Value::as_i64),
            msg: map.get("msg").and_then(Value::as_str).map(str::to_string),
            raw: body.to_string(),
        }),
        other if (200..300).contains(&status) => Err(SourceError::Malformed(format!(
            "expected a list, got {other}"
        ))),
        _ => Err(SourceError::Http {
            status,
            body: body.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sentinel_core::PositionSide;

    const POSITION_RISK: &str = r#"[
        {"symbol":"BTCUSDT","positionAmt":"0.100","entryPrice":"50000.0","markPrice":"50123.4",
         "unRealizedProfit":"12.34","liquidationPrice":"0","leverage":"20","positionSide":"LONG"},
        {"symbol":"ETHUSDT","positionAmt":"0.000","entryPrice":"0.0","markPrice":"2001.1",
         "leverage":"10","positionSide":"BOTH"}
    ]"#;

    const OPEN_ORDERS: &str = r#"[
        {"orderId":101,"symbol":"BTCUSDT","type":"TAKE_PROFIT_MARKET","stopPrice":"55000",
         "price":"0","side":"SELL","positionSide":"LONG","closePosition":true},
        {"orderId":102,"symbol":"BTCUSDT","type":"STOP_MARKET","stopPrice":"49000",
         "price":"0","side":"SELL","positionSide":"LONG","closePosition":true},
        {"orderId":103,"symbol":"BTCUSDT","type":"SOMETHING_NEW","price":"1"}
    ]"#;

    #[test]
    fn test_decode_position_risk() {
        let raw: Vec<RawPositionRisk> = decode_list(200, POSITION_RISK).unwrap();
        let snapshots: Vec<PositionSnapshot> = raw
            .into_iter()
            .map(RawPositionRisk::into_snapshot)
            .collect::<SourceResult<_>>()
            .unwrap();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].key, PositionKey::new("BTCUSDT", PositionSide::Long));
        assert_eq!(snapshots[0].entry_price, Price::new(dec!(50000)));
        assert_eq!(snapshots[0].size, Size::new(dec!(0.1)));
        assert!(!snapshots[0].is_flat());
        assert!(snapshots[1].is_flat());
    }

    #[test]
    fn test_decode_open_orders() {
        let raw: Vec<RawOpenOrder> = decode_list(200, OPEN_ORDERS).unwrap();
        let orders: Vec<RestingOrder> = raw
            .into_iter()
            .map(RawOpenOrder::into_resting)
            .collect::<SourceResult<_>>()
            .unwrap();

        assert_eq!(orders[0].kind, OrderKind::TakeProfitMarket);
        assert_eq!(orders[1].kind, OrderKind::StopMarket);
        assert_eq!(orders[1].trigger_price(), Some(Price::new(dec!(49000))));
        assert_eq!(orders[2].kind, OrderKind::Unknown);
        assert_eq!(orders[2].stop_price, None);
    }

    #[test]
    fn test_error_object_is_business_error() {
        let body = r#"{"code": -2015, "msg": "Invalid API-key, IP, or permissions for action."}"#;
        let err = decode_list::<RawPositionRisk>(401, body).unwrap_err();
        match err {
            SourceError::Business { code, msg, raw } => {
                assert_eq!(code, Some(-2015));
                assert!(msg.unwrap().starts_with("Invalid API-key"));
                assert_eq!(raw, body);
            }
            other => panic!("unexpected {other:?}"),
        }

        // Same envelope on a 200 is still an error
        let err = decode_list::<RawPositionRisk>(200, r#"{"code":-1021,"msg":"Timestamp"}"#)
            .unwrap_err();
        assert!(err.is_business());
    }

    #[test]
    fn test_non_json_body() {
        let err = decode_list::<RawOpenOrder>(200, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));

        let err = decode_list::<RawOpenOrder>(502, "Bad Gateway").unwrap_err();
        assert!(matches!(err, SourceError::Http { status: 502, .. }));
    }

    #[test]
    fn test_scalar_body_is_malformed() {
        let err = decode_list::<RawOpenOrder>(200, "42").unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn test_bad_number_names_field() {
        let raw = RawPositionRisk {
            symbol: "BTCUSDT".to_string(),
            position_amt: "abc".to_string(),
            entry_price: "1".to_string(),
            position_side: "BOTH".to_string(),
        };
        let err = raw.into_snapshot().unwrap_err();
        assert!(err.to_string().contains("positionAmt"));
    }
}
