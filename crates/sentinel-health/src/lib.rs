//! sentinel-health - liveness endpoint for the stop-loss sentinel.
//!
//! Hosting platforms that expect a listening port get one; it carries no
//! control surface.
//!
//! ```text
//! GET /         → static running message
//! GET /health   → {"status":"ok"}
//! GET /metrics  → Prometheus text exposition
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use sentinel_health::{run_server, HealthConfig};
//!
//! let config = HealthConfig::default();
//! tokio::spawn(async move {
//!     if let Err(e) = run_server(config).await {
//!         tracing::error!(error = %e, "Health server failed");
//!     }
//! });
//! ```

mod config;
mod error;
mod server;

pub use config::HealthConfig;
pub use error::{HealthError, HealthResult};
pub use server::{create_router, run_server};
