//! Prometheus metrics and structured logging for the stop-loss sentinel.
//!
//! - Structured logging with tracing (JSON in production, pretty otherwise)
//! - Process-wide Prometheus metrics behind the [`Metrics`] facade

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, init_logging_with};
pub use metrics::Metrics;
