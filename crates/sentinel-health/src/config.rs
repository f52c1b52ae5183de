//! Health server configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Start the server.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Port to listen on (all interfaces).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Body returned by `GET /`.
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_enabled() -> bool {
    true
}

fn default_port() -> u16 {
    8080
}

fn default_message() -> String {
    "Stop-loss sentinel is running".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            port: default_port(),
            message: default_message(),
        }
    }
}
