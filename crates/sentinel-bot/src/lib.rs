//! Stop-loss sentinel.
//!
//! Orchestrates the components:
//! - Exchange reads (positions, open orders)
//! - Position tracking and stop-loss alert decisions
//! - Alert delivery
//! - Liveness endpoint

pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod scheduler;

pub use app::{spawn_shutdown_listener, Application, RunOptions};
pub use clock::{Clock, ManualClock, RecordingSleeper, Sleeper, SystemClock, TokioSleeper};
pub use config::{AppConfig, SchedulerConfig, Secrets, TelemetryConfig};
pub use error::{AppError, AppResult};
pub use scheduler::{CycleOutcome, CycleReport, PollingScheduler};
