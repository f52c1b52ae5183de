//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("Tracker error: {0}")]
    Tracker(#[from] sentinel_tracker::TrackerError),

    #[error("Exchange error: {0}")]
    Exchange(#[from] sentinel_exchange::SourceError),

    #[error("Notify error: {0}")]
    Notify(#[from] sentinel_notify::NotifyError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] sentinel_telemetry::TelemetryError),
}

pub type AppResult<T> = Result<T, AppError>;
