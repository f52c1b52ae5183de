//! Health server error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HealthError {
    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

pub type HealthResult<T> = Result<T, HealthError>;
