//! Notification configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Push endpoint.
    #[serde(default = "default_pushbullet_url")]
    pub pushbullet_url: String,
    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log alerts instead of sending them.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_pushbullet_url() -> String {
    "https://api.pushbullet.com/v2/pushes".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            pushbullet_url: default_pushbullet_url(),
            timeout_secs: default_timeout_secs(),
            dry_run: false,
        }
    }
}
