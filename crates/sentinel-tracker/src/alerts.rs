//! Human-readable rendering of alert intents.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use sentinel_core::{AlertIntent, AlertKind, PositionKey, PositionSide, PositionSnapshot};

/// Symbol, plus the leg when the account runs in hedge mode.
fn label(key: &PositionKey) -> String {
    match key.side {
        PositionSide::Both => key.symbol.clone(),
        side => format!("{} {side}", key.symbol),
    }
}

fn pct(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

fn clock(at: DateTime<Utc>) -> String {
    at.format("%H:%M:%S UTC").to_string()
}

fn minutes(grace: chrono::Duration) -> i64 {
    grace.num_minutes()
}

pub(crate) fn new_trade(snapshot: &PositionSnapshot) -> AlertIntent {
    AlertIntent::new(
        AlertKind::NewTrade,
        Some(snapshot.key.clone()),
        format!("🚀 New trade opened: {}", label(&snapshot.key)),
        format!(
            "Entry Price: {}, Size: {}, Side: {}",
            snapshot.entry_price, snapshot.size, snapshot.key.side
        ),
    )
}

pub(crate) fn sl_missing(
    key: &PositionKey,
    entry_time: DateTime<Utc>,
    grace: chrono::Duration,
) -> AlertIntent {
    AlertIntent::new(
        AlertKind::SlMissing,
        Some(key.clone()),
        format!("⚠️ SL MISSING: {}", label(key)),
        format!(
            "No SL set {} mins after entry. Opened at: {}",
            minutes(grace),
            clock(entry_time)
        ),
    )
}

pub(crate) fn sl_set(
    key: &PositionKey,
    late: bool,
    distance_pct: Decimal,
    grace: chrono::Duration,
) -> AlertIntent {
    let (kind, title, when) = if late {
        (AlertKind::SlSetLate, "✅ SL SET LATE", "after")
    } else {
        (AlertKind::SlSetOnTime, "✅ SL SET ON TIME", "within")
    };
    AlertIntent::new(
        kind,
        Some(key.clone()),
        format!("{title}: {}", label(key)),
        format!(
            "SL set {when} {} mins. Distance: {}",
            minutes(grace),
            pct(distance_pct)
        ),
    )
}

pub(crate) fn sl_removed(key: &PositionKey, entry_time: DateTime<Utc>) -> AlertIntent {
    AlertIntent::new(
        AlertKind::SlRemoved,
        Some(key.clone()),
        format!("❌ SL REMOVED: {}", label(key)),
        format!("SL removed for trade opened at {}", clock(entry_time)),
    )
}

pub(crate) fn sl_updated(key: &PositionKey, previous_pct: Decimal, new_pct: Decimal) -> AlertIntent {
    AlertIntent::new(
        AlertKind::SlUpdated,
        Some(key.clone()),
        format!("🔁 SL UPDATED: {}", label(key)),
        format!("Previous: {}, New: {}", pct(previous_pct), pct(new_pct)),
    )
}

pub(crate) fn source_error(detail: &str) -> AlertIntent {
    AlertIntent::new(
        AlertKind::SourceError,
        None,
        "❌ Exchange Error",
        detail.to_string(),
    )
}
