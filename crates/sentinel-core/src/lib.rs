//! Core domain types for the stop-loss sentinel.
//!
//! This crate provides the vocabulary shared by every other crate:
//! - `PositionKey`, `PositionSnapshot`: what the exchange reports per position
//! - `RestingOrder`, `OrderKind`, `StopLossOrder`: open orders and stop-loss detection
//! - `AlertKind`, `AlertIntent`: what the tracker asks to be delivered
//! - `Price`, `Size`: precision-safe numeric types

pub mod alert;
pub mod decimal;
pub mod error;
pub mod order;
pub mod position;

pub use alert::{AlertIntent, AlertKind};
pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use order::{OrderKind, RestingOrder, StopLossOrder};
pub use position::{PositionKey, PositionSide, PositionSnapshot, FLAT_SIZE_EPSILON};
