//! Tracker timing configuration.

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

/// Default grace period before a position without a stop-loss is flagged: 5 minutes.
pub const SL_GRACE_SECS: u64 = 300;

/// Default minimum spacing between repeated "SL missing" alerts: 1 hour.
pub const MISSING_REMINDER_SECS: u64 = 3_600;

/// Stop-loss price movements at or below this are treated as unchanged (1e-6).
pub const SL_PRICE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Configuration for the stop-loss decision rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Seconds a position may stay open without a stop-loss before it is
    /// flagged. Also splits "set on time" from "set late". Default: 300.
    #[serde(default = "default_sl_grace_secs")]
    pub sl_grace_secs: u64,
    /// Seconds between repeated "SL missing" alerts for one position. Default: 3600.
    #[serde(default = "default_missing_reminder_secs")]
    pub missing_reminder_secs: u64,
}

fn default_sl_grace_secs() -> u64 {
    SL_GRACE_SECS
}

fn default_missing_reminder_secs() -> u64 {
    MISSING_REMINDER_SECS
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sl_grace_secs: default_sl_grace_secs(),
            missing_reminder_secs: default_missing_reminder_secs(),
        }
    }
}

impl TrackerConfig {
    /// Reject configurations that would make the decision rules meaningless.
    pub fn validate(&self) -> TrackerResult<()> {
        if self.missing_reminder_secs == 0 {
            return Err(TrackerError::InvalidConfig(
                "missing_reminder_secs must be greater than zero".to_string(),
            ));
        }
        if checked_secs(self.sl_grace_secs).is_none()
            || checked_secs(self.missing_reminder_secs).is_none()
        {
            return Err(TrackerError::InvalidConfig(
                "durations exceed the representable time range".to_string(),
            ));
        }
        Ok(())
    }

    /// Grace period as a chrono duration.
    ///
    /// Saturates for values `validate` rejects.
    #[must_use]
    pub fn sl_grace(&self) -> Duration {
        checked_secs(self.sl_grace_secs).unwrap_or(Duration::MAX)
    }

    /// Reminder spacing as a chrono duration.
    ///
    /// Saturates for values `validate` rejects.
    #[must_use]
    pub fn missing_reminder(&self) -> Duration {
        checked_secs(self.missing_reminder_secs).unwrap_or(Duration::MAX)
    }
}

fn checked_secs(secs: u64) -> Option<Duration> {
    i64::try_from(secs).ok().and_then(Duration::try_seconds)
}
