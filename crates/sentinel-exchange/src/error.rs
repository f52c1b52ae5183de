//! Exchange read error types.
//!
//! Every variant is non-fatal: the caller turns it into a single source-error
//! alert for the cycle and tries again on the next one.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Connection, TLS or timeout failure reaching the exchange.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Body could not be parsed as the expected structure.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Exchange answered with an error object instead of a list.
    #[error("Exchange error {}: {raw}", fmt_code(.code))]
    Business {
        code: Option<i64>,
        msg: Option<String>,
        /// Raw payload, kept verbatim for diagnosing credential problems.
        raw: String,
    },

    /// Non-success HTTP status with a body that is not an exchange error object.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("Invalid HTTP client configuration: {0}")]
    Client(String),
}

fn fmt_code(code: &Option<i64>) -> String {
    code.map_or_else(|| "?".to_string(), |c| c.to_string())
}

impl SourceError {
    /// Whether the exchange itself rejected the request (credentials, permissions, limits).
    pub fn is_business(&self) -> bool {
        matches!(self, Self::Business { .. })
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Malformed(_) => "malformed",
            Self::Business { .. } => "business",
            Self::Http { .. } => "http",
            Self::Signing(_) => "signing",
            Self::Client(_) => "client",
        }
    }
}

impl From<sentinel_core::CoreError> for SourceError {
    fn from(e: sentinel_core::CoreError) -> Self {
        Self::Malformed(e.to_string())
    }
}

pub type SourceResult<T> = Result<T, SourceError>;
