//! Alert sink abstraction.

use std::future::Future;
use std::pin::Pin;

use parking_lot::Mutex;
use tracing::info;

use crate::error::{NotifyError, NotifyResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Delivers a human-readable notification.
pub trait AlertSink: Send + Sync {
    fn send<'a>(&'a self, title: &'a str, body: &'a str) -> BoxFuture<'a, NotifyResult<()>>;
}

/// Logs alerts instead of sending them (dry run).
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn send<'a>(&'a self, title: &'a str, body: &'a str) -> BoxFuture<'a, NotifyResult<()>> {
        Box::pin(async move {
            info!(title, body, "Alert (dry run, not sent)");
            Ok(())
        })
    }
}

/// One alert captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentAlert {
    pub title: String,
    pub body: String,
}

/// Sink that records every alert, for tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<SentAlert>>,
    fail_next: Mutex<Option<NotifyError>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next send with `error`. The failed alert is still recorded.
    pub fn fail_next(&self, error: NotifyError) {
        *self.fail_next.lock() = Some(error);
    }

    pub fn sent(&self) -> Vec<SentAlert> {
        self.sent.lock().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.sent.lock().iter().map(|a| a.title.clone()).collect()
    }

    /// Drain recorded alerts.
    pub fn take(&self) -> Vec<SentAlert> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl AlertSink for RecordingSink {
    fn send<'a>(&'a self, title: &'a str, body: &'a str) -> BoxFuture<'a, NotifyResult<()>> {
        Box::pin(async move {
            self.sent.lock().push(SentAlert {
                title: title.to_string(),
                body: body.to_string(),
            });
            match self.fail_next.lock().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        })
    }
}
