//! Position state tracking and stop-loss alert decisions.
//!
//! [`PositionTracker`] owns one [`PositionState`] per open position key and is
//! fed a full position snapshot once per cycle. Each call to
//! [`PositionTracker::observe`] diffs the snapshot against the previous cycle
//! and returns the alerts that should go out.
//!
//! # Per-key state machine
//!
//! ```text
//!            non-flat                 stop found
//! Absent ───────────────▶ OpenNoSl ───────────────▶ OpenWithSl ──┐
//!   ▲       NewTrade       │   ▲      SlSetOnTime/Late    │   ▲   │ price moved
//!   │                      │   │                          │   └───┘ SlUpdated
//!   │   flat (no alert)    │   └──────────────────────────┘
//!   └──────────────────────┘          stop gone: SlRemoved
//! ```
//!
//! While in `OpenNoSl` past the grace period, `SlMissing` is emitted at most
//! once per reminder window.
//!
//! The tracker does no I/O. Orders are fetched by the caller and handed in
//! through an [`OrderLookup`]; the current time is passed explicitly.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use sentinel_core::{AlertIntent, PositionKey, PositionSnapshot, Price, RestingOrder};

use crate::alerts;
use crate::config::{TrackerConfig, SL_PRICE_TOLERANCE};
use crate::lookup::OrderLookup;

// ============================================================================
// PositionState
// ============================================================================

/// Stop-loss status of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlStatus {
    OpenNoSl,
    OpenWithSl,
}

/// Tracker-owned state for one open position key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionState {
    entry_time: DateTime<Utc>,
    sl_set: bool,
    last_sl_price: Option<Price>,
    last_missing_alert_at: Option<DateTime<Utc>>,
}

impl PositionState {
    fn opened_at(now: DateTime<Utc>) -> Self {
        Self {
            entry_time: now,
            sl_set: false,
            last_sl_price: None,
            last_missing_alert_at: None,
        }
    }

    /// When the key was first observed open.
    #[must_use]
    pub fn entry_time(&self) -> DateTime<Utc> {
        self.entry_time
    }

    /// Whether a stop-loss was present as of the last cycle.
    #[must_use]
    pub fn sl_set(&self) -> bool {
        self.sl_set
    }

    /// Last observed stop-loss trigger price. Only set while `sl_set`.
    #[must_use]
    pub fn last_sl_price(&self) -> Option<Price> {
        self.last_sl_price
    }

    /// When the last "SL missing" alert went out.
    #[must_use]
    pub fn last_missing_alert_at(&self) -> Option<DateTime<Utc>> {
        self.last_missing_alert_at
    }

    #[must_use]
    pub fn status(&self) -> SlStatus {
        if self.sl_set {
            SlStatus::OpenWithSl
        } else {
            SlStatus::OpenNoSl
        }
    }
}

// ============================================================================
// PositionTracker
// ============================================================================

/// Owns per-position state across cycles and decides which alerts to emit.
#[derive(Debug, Default)]
pub struct PositionTracker {
    config: TrackerConfig,
    positions: HashMap<PositionKey, PositionState>,
}

impl PositionTracker {
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            positions: HashMap::new(),
        }
    }

    /// State for `key`, present only while the position is open.
    #[must_use]
    pub fn state(&self, key: &PositionKey) -> Option<&PositionState> {
        self.positions.get(key)
    }

    /// Number of open positions currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Distinct symbols with at least one open position in `snapshots`, sorted.
    ///
    /// These are the symbols whose open orders the caller needs to fetch
    /// before calling [`observe`](Self::observe).
    #[must_use]
    pub fn symbols_to_query(snapshots: &[PositionSnapshot]) -> Vec<String> {
        let mut symbols: Vec<String> = snapshots
            .iter()
            .filter(|s| !s.is_flat())
            .map(|s| s.key.symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }

    /// Build the alert for a cycle whose position snapshot could not be read.
    ///
    /// Tracker state is left untouched.
    #[must_use]
    pub fn source_error(&self, detail: &str) -> AlertIntent {
        alerts::source_error(detail)
    }

    /// Process one full position snapshot taken at `now`.
    ///
    /// Keys are processed in (symbol, side) order. Keys missing from the
    /// snapshot are treated as flat.
    pub fn observe<L: OrderLookup + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        snapshots: &[PositionSnapshot],
        orders: &L,
    ) -> Vec<AlertIntent> {
        let mut sorted: Vec<&PositionSnapshot> = snapshots.iter().collect();
        sorted.sort_by(|a, b| a.key.cmp(&b.key));

        let mut out = Vec::new();
        let mut open_keys: HashSet<&PositionKey> = HashSet::new();

        for snapshot in sorted {
            if snapshot.is_flat() {
                if self.positions.remove(&snapshot.key).is_some() {
                    debug!(key = %snapshot.key, "Position closed, state dropped");
                }
                continue;
            }
            open_keys.insert(&snapshot.key);
            self.observe_open(now, snapshot, orders.orders_for(&snapshot.key.symbol), &mut out);
        }

        let before = self.positions.len();
        self.positions.retain(|key, _| open_keys.contains(key));
        if self.positions.len() != before {
            debug!(
                dropped = before - self.positions.len(),
                "Dropped state for positions absent from snapshot"
            );
        }

        out
    }

    fn observe_open(
        &mut self,
        now: DateTime<Utc>,
        snapshot: &PositionSnapshot,
        orders: Option<&[RestingOrder]>,
        out: &mut Vec<AlertIntent>,
    ) {
        let config = &self.config;
        let key = &snapshot.key;

        let state = self.positions.entry(key.clone()).or_insert_with(|| {
            debug!(key = %key, entry = %snapshot.entry_price, size = %snapshot.size, "New position");
            out.push(alerts::new_trade(snapshot));
            PositionState::opened_at(now)
        });

        let Some(orders) = orders else {
            warn!(key = %key, "Open orders unavailable, skipping stop-loss check this cycle");
            return;
        };

        let time_open = now - state.entry_time;
        let past_grace = time_open > config.sl_grace();

        // First stop order in exchange order wins
        let stop_loss = orders.iter().find_map(RestingOrder::as_stop_loss);

        match stop_loss {
            None => {
                if state.sl_set {
                    out.push(alerts::sl_removed(key, state.entry_time));
                    state.sl_set = false;
                    state.last_sl_price = None;
                } else if past_grace {
                    let reminder_due = state
                        .last_missing_alert_at
                        .map_or(true, |at| now - at > config.missing_reminder());
                    if reminder_due {
                        out.push(alerts::sl_missing(key, state.entry_time, config.sl_grace()));
                        state.last_missing_alert_at = Some(now);
                    } else {
                        trace!(key = %key, "SL missing, reminder suppressed");
                    }
                }
            }
            Some(sl) => {
                let sl_price = sl.trigger_price;
                let entry = snapshot.entry_price;

                if !state.sl_set {
                    out.push(alerts::sl_set(
                        key,
                        past_grace,
                        distance_pct(sl_price, entry),
                        config.sl_grace(),
                    ));
                    state.sl_set = true;
                }

                if let Some(previous) = state.last_sl_price {
                    if sl_price.differs_from(previous, SL_PRICE_TOLERANCE) {
                        out.push(alerts::sl_updated(
                            key,
                            distance_pct(previous, entry),
                            distance_pct(sl_price, entry),
                        ));
                    }
                }
                state.last_sl_price = Some(sl_price);
            }
        }
    }
}

fn distance_pct(sl_price: Price, entry: Price) -> Decimal {
    sl_price.distance_pct_from(entry).unwrap_or(Decimal::ZERO)
}

// ============================================================================
// Tests
// ============================================================================
