//! Read-only exchange access for the stop-loss sentinel.
//!
//! Provides:
//! - [`ExchangeClient`]: position snapshot and per-symbol open orders
//! - [`BinanceClient`]: signed REST implementation
//! - [`MockExchange`]: scriptable in-memory implementation

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod signer;
pub mod types;

pub use client::{BinanceClient, BoxFuture, ExchangeClient};
pub use config::ExchangeConfig;
pub use error::{SourceError, SourceResult};
pub use mock::MockExchange;
pub use signer::{Credentials, RequestSigner};
pub use types::{decode_list, RawOpenOrder, RawPositionRisk};
