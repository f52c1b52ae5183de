//! Position state tracking for the stop-loss sentinel.
//!
//! Given a snapshot of open positions and their resting orders, decides what
//! changed since the previous cycle and which alerts to raise.
//!
//! # Key Components
//!
//! - [`PositionTracker`]: Owns per-position state and produces alert intents
//! - [`PositionState`]: What is remembered about one open position
//! - [`OrderLookup`]: Already-fetched open orders, keyed by symbol
//! - [`TrackerConfig`]: Grace period and reminder spacing

mod alerts;
pub mod config;
pub mod error;
pub mod lookup;
pub mod tracker;

pub use config::{TrackerConfig, MISSING_REMINDER_SECS, SL_GRACE_SECS, SL_PRICE_TOLERANCE};
pub use error::{TrackerError, TrackerResult};
pub use lookup::{NoOrders, OrderLookup};
pub use tracker::{PositionState, PositionTracker, SlStatus};
