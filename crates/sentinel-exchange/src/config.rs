//! Exchange client configuration.

use serde::{Deserialize, Serialize};

/// REST endpoint and request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Futures REST base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// `recvWindow` sent with signed requests (ms). 0 omits the parameter.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,
    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://fapi.binance.com".to_string()
}

fn default_recv_window_ms() -> u64 {
    5_000
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            recv_window_ms: default_recv_window_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
