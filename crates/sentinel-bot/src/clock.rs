//! Time and sleep seams for the polling loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use sentinel_exchange::BoxFuture;

/// Source of the current time, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Waits between cycles.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// Real sleep on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Records requested sleeps and returns immediately.
///
/// When linked to a [`ManualClock`], each sleep advances it by the slept
/// duration.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
    clock: Option<ManualClock>,
}

impl RecordingSleeper {
    pub fn advancing(clock: ManualClock) -> Self {
        Self {
            slept: Mutex::new(Vec::new()),
            clock: Some(clock),
        }
    }

    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.slept.lock().len()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        // Recorded on first poll so sleeps dropped unpolled do not count
        Box::pin(async move {
            self.slept.lock().push(duration);
            if let Some(clock) = &self.clock {
                let by = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX);
                clock.advance(by);
            }
        })
    }
}
