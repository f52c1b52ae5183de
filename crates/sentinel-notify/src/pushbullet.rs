//! Pushbullet push delivery.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::NotifyConfig;
use crate::error::{NotifyError, NotifyResult};
use crate::sink::{AlertSink, BoxFuture};

const ACCESS_TOKEN_HEADER: &str = "Access-Token";

#[derive(Debug, Serialize)]
struct NotePush<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    title: &'a str,
    body: &'a str,
}

/// Sends alerts as Pushbullet notes.
pub struct PushbulletSink {
    client: Client,
    url: String,
    token: Zeroizing<String>,
}

impl PushbulletSink {
    pub fn new(config: &NotifyConfig, token: impl Into<String>) -> NotifyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::Client(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.pushbullet_url.clone(),
            token: Zeroizing::new(token.into()),
        })
    }

    async fn push(&self, title: &str, body: &str) -> NotifyResult<()> {
        let payload = NotePush {
            kind: "note",
            title,
            body,
        };

        let response = self
            .client
            .post(&self.url)
            .header(ACCESS_TOKEN_HEADER, self.token.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::OK {
            debug!(title, "Push delivered");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl AlertSink for PushbulletSink {
    fn send<'a>(&'a self, title: &'a str, body: &'a str) -> BoxFuture<'a, NotifyResult<()>> {
        Box::pin(self.push(title, body))
    }
}
