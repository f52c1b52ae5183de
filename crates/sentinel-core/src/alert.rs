//! Alert intents produced by the tracker.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PositionKey;

/// Kind of alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// A position key went from flat to open.
    NewTrade,
    /// Position has been open past the grace period with no stop-loss.
    SlMissing,
    /// Stop-loss detected within the grace period.
    SlSetOnTime,
    /// Stop-loss detected after the grace period.
    SlSetLate,
    /// A previously present stop-loss disappeared.
    SlRemoved,
    /// Stop-loss trigger price moved.
    SlUpdated,
    /// Upstream data could not be read this cycle.
    SourceError,
}

impl AlertKind {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewTrade => "new_trade",
            Self::SlMissing => "sl_missing",
            Self::SlSetOnTime => "sl_set_on_time",
            Self::SlSetLate => "sl_set_late",
            Self::SlRemoved => "sl_removed",
            Self::SlUpdated => "sl_updated",
            Self::SourceError => "source_error",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification the operator should receive.
///
/// Intents are plain data; delivering them is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertIntent {
    pub kind: AlertKind,
    /// Position the alert is about. `None` for source errors.
    pub key: Option<PositionKey>,
    pub title: String,
    pub body: String,
}

impl AlertIntent {
    pub fn new(
        kind: AlertKind,
        key: Option<PositionKey>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            key,
            title: title.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels_are_unique() {
        let kinds = [
            AlertKind::NewTrade,
            AlertKind::SlMissing,
            AlertKind::SlSetOnTime,
            AlertKind::SlSetLate,
            AlertKind::SlRemoved,
            AlertKind::SlUpdated,
            AlertKind::SourceError,
        ];
        let labels: std::collections::HashSet<_> = kinds.iter().map(|k| k.as_str()).collect();
        assert_eq!(labels.len(), kinds.len());
    }

    #[test]
    fn test_kind_serde_matches_label() {
        let json = serde_json::to_string(&AlertKind::SlSetLate).unwrap();
        assert_eq!(json, "\"sl_set_late\"");
    }
}
