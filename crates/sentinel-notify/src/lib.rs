//! Alert delivery for the stop-loss sentinel.
//!
//! Delivery is best-effort: a failed send is reported to the caller, which
//! logs it and moves on. Tracker state never depends on delivery.

pub mod config;
pub mod error;
pub mod pushbullet;
pub mod sink;

pub use config::NotifyConfig;
pub use error::{NotifyError, NotifyResult};
pub use pushbullet::PushbulletSink;
pub use sink::{AlertSink, BoxFuture, LogSink, RecordingSink, SentAlert};
