//! Tracker error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid tracker configuration: {0}")]
    InvalidConfig(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
