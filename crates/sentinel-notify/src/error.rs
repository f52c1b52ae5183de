//! Notification error types.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// Push service could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Push service answered with something other than 200.
    #[error("Push rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid HTTP client configuration: {0}")]
    Client(String),
}

pub type NotifyResult<T> = Result<T, NotifyError>;
