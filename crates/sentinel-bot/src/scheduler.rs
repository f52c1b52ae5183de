//! Fixed-interval polling loop.
//!
//! One cycle at a time: fetch positions, fetch open orders per symbol, let the
//! tracker decide, deliver the resulting alerts. The next cycle starts a full
//! interval after the previous one finished, so a slow cycle delays the next
//! instead of overlapping it.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use sentinel_core::{AlertIntent, RestingOrder};
use sentinel_exchange::ExchangeClient;
use sentinel_notify::AlertSink;
use sentinel_telemetry::Metrics;
use sentinel_tracker::PositionTracker;

use crate::clock::{Clock, Sleeper};

/// How a cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Position snapshot was read and processed.
    Ok,
    /// Position snapshot could not be read; a source-error alert was raised.
    SourceError,
}

impl CycleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::SourceError => "source_error",
        }
    }
}

/// Summary of one cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    /// Alerts produced, in emission order.
    pub alerts: Vec<AlertIntent>,
    /// Symbols whose open orders could not be read.
    pub failed_symbols: Vec<String>,
    /// Alerts the sink failed to deliver.
    pub delivery_failures: usize,
}

/// Drives the [`PositionTracker`] at a fixed cadence.
///
/// Owns the tracker exclusively; nothing else touches position state.
pub struct PollingScheduler {
    tracker: PositionTracker,
    exchange: Arc<dyn ExchangeClient>,
    sink: Arc<dyn AlertSink>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
    interval: Duration,
}

impl PollingScheduler {
    pub fn new(
        tracker: PositionTracker,
        exchange: Arc<dyn ExchangeClient>,
        sink: Arc<dyn AlertSink>,
        clock: Arc<dyn Clock>,
        sleeper: Arc<dyn Sleeper>,
        interval: Duration,
    ) -> Self {
        Self {
            tracker,
            exchange,
            sink,
            clock,
            sleeper,
            interval,
        }
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one poll-and-decide pass. Never fails; upstream errors become alerts.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let started = Instant::now();
        let now = self.clock.now();

        let (outcome, alerts, failed_symbols) = match self.exchange.positions().await {
            Err(e) => {
                error!(error = %e, kind = e.label(), "Failed to read positions");
                let alert = self.tracker.source_error(&e.to_string());
                (CycleOutcome::SourceError, vec![alert], Vec::new())
            }
            Ok(snapshots) => {
                let symbols = PositionTracker::symbols_to_query(&snapshots);
                let mut orders: HashMap<String, Vec<RestingOrder>> =
                    HashMap::with_capacity(symbols.len());
                let mut failed = Vec::new();

                for symbol in symbols {
                    match self.exchange.open_orders(&symbol).await {
                        Ok(list) => {
                            orders.insert(symbol, list);
                        }
                        Err(e) => {
                            warn!(
                                symbol = %symbol,
                                error = %e,
                                "Failed to read open orders, skipping stop-loss checks"
                            );
                            Metrics::order_fetch_failed();
                            failed.push(symbol);
                        }
                    }
                }

                let alerts = self.tracker.observe(now, &snapshots, &orders);
                debug!(
                    positions = snapshots.len(),
                    tracked = self.tracker.len(),
                    alerts = alerts.len(),
                    "Snapshot processed"
                );
                (CycleOutcome::Ok, alerts, failed)
            }
        };

        let delivery_failures = self.deliver(&alerts).await;

        Metrics::tracked_positions(self.tracker.len());
        Metrics::cycle_completed(outcome.as_str(), started.elapsed().as_secs_f64() * 1000.0);

        CycleReport {
            outcome,
            alerts,
            failed_symbols,
            delivery_failures,
        }
    }

    async fn deliver(&self, alerts: &[AlertIntent]) -> usize {
        let mut failures = 0;
        for alert in alerts {
            Metrics::alert_emitted(alert.kind);
            info!(kind = %alert.kind, title = %alert.title, body = %alert.body, "Alert");

            if let Err(e) = self.sink.send(&alert.title, &alert.body).await {
                warn!(kind = %alert.kind, error = %e, "Alert delivery failed");
                Metrics::alert_delivery_failed();
                failures += 1;
            }
        }
        failures
    }

    /// Run cycles until `shutdown` resolves.
    ///
    /// Shutdown is checked between cycles; a cycle in progress always
    /// completes. Returns the number of cycles run.
    pub async fn run<F>(&mut self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!(interval_secs = self.interval.as_secs(), "Starting polling loop");

        let mut cycles = 0u64;
        loop {
            let report = self.run_cycle().await;
            cycles += 1;
            debug!(
                cycle = cycles,
                outcome = report.outcome.as_str(),
                alerts = report.alerts.len(),
                "Cycle complete"
            );

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
                _ = self.sleeper.sleep(self.interval) => {}
            }
        }

        info!(cycles, "Polling loop stopped");
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, RecordingSleeper};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use sentinel_core::{
        AlertKind, OrderKind, PositionKey, PositionSide, PositionSnapshot, Price,
    };
    use sentinel_exchange::{MockExchange, SourceError};
    use sentinel_notify::{NotifyError, RecordingSink};
    use sentinel_tracker::TrackerConfig;

    struct Harness {
        scheduler: PollingScheduler,
        exchange: MockExchange,
        sink: Arc<RecordingSink>,
        clock: ManualClock,
        sleeper: Arc<RecordingSleeper>,
    }

    fn harness() -> Harness {
        let exchange = MockExchange::new();
        let sink = Arc::new(RecordingSink::new());
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
        let sleeper = Arc::new(RecordingSleeper::advancing(clock.clone()));
        let scheduler = PollingScheduler::new(
            PositionTracker::new(TrackerConfig::default()),
            Arc::new(exchange.clone()),
            sink.clone(),
            Arc::new(clock.clone()),
            sleeper.clone(),
            Duration::from_secs(60),
        );
        Harness {
            scheduler,
            exchange,
            sink,
            clock,
            sleeper,
        }
    }

    fn position(symbol: &str, side: PositionSide, entry: &str, size: &str) -> PositionSnapshot {
        PositionSnapshot::new(
            PositionKey::new(symbol, side),
            entry.parse().unwrap(),
            size.parse().unwrap(),
        )
    }

    fn stop(symbol: &str, id: u64, price: rust_decimal::Decimal) -> RestingOrder {
        RestingOrder {
            symbol: symbol.to_string(),
            order_id: id,
            kind: OrderKind::StopMarket,
            stop_price: Some(Price::new(price)),
            price: None,
        }
    }

    #[tokio::test]
    async fn test_position_failure_yields_single_source_error() {
        let mut h = harness();
        h.exchange.fail_positions(SourceError::Transport("timeout".into()));

        let report = h.scheduler.run_cycle().await;

        assert_eq!(report.outcome, CycleOutcome::SourceError);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].kind, AlertKind::SourceError);
        assert!(h.exchange.order_calls().is_empty());
        assert!(h.scheduler.tracker().is_empty());
        assert_eq!(h.sink.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_orders_fetched_once_per_symbol() {
        let mut h = harness();
        h.exchange.set_positions(vec![
            position("ETHUSDT", PositionSide::Long, "2000", "1"),
            position("ETHUSDT", PositionSide::Short, "2100", "-1"),
            position("BTCUSDT", PositionSide::Both, "50000", "0"),
        ]);

        let report = h.scheduler.run_cycle().await;

        assert_eq!(h.exchange.order_calls(), vec!["ETHUSDT"]);
        assert_eq!(report.alerts.len(), 2);
        assert!(report.alerts.iter().all(|a| a.kind == AlertKind::NewTrade));
        assert_eq!(h.scheduler.tracker().len(), 2);
    }

    #[tokio::test]
    async fn test_order_failure_skips_only_that_symbol() {
        let mut h = harness();
        h.exchange.set_positions(vec![
            position("BTCUSDT", PositionSide::Both, "50000", "0.1"),
            position("ETHUSDT", PositionSide::Both, "2000", "1"),
        ]);
        h.scheduler.run_cycle().await;

        h.clock.advance(chrono::Duration::minutes(6));
        h.exchange
            .fail_orders("BTCUSDT", SourceError::Http { status: 503, body: String::new() });
        let report = h.scheduler.run_cycle().await;

        assert_eq!(report.outcome, CycleOutcome::Ok);
        assert_eq!(report.failed_symbols, vec!["BTCUSDT"]);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].kind, AlertKind::SlMissing);
        assert_eq!(report.alerts[0].key.as_ref().unwrap().symbol, "ETHUSDT");
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_affect_state() {
        let mut h = harness();
        h.exchange
            .set_positions(vec![position("BTCUSDT", PositionSide::Both, "50000", "0.1")]);
        h.exchange.set_orders("BTCUSDT", vec![stop("BTCUSDT", 1, dec!(49000))]);
        h.sink.fail_next(NotifyError::Rejected {
            status: 401,
            body: "invalid token".into(),
        });

        let report = h.scheduler.run_cycle().await;

        assert_eq!(report.delivery_failures, 1);
        let state = h
            .scheduler
            .tracker()
            .state(&PositionKey::new("BTCUSDT", PositionSide::Both))
            .unwrap();
        assert!(state.sl_set());
    }

    #[tokio::test]
    async fn test_run_sleeps_full_interval_between_cycles() {
        let mut h = harness();
        h.exchange.fail_positions(SourceError::Malformed("bad".into()));
        let sleeper = h.sleeper.clone();

        let cycles = h
            .scheduler
            .run(async move {
                while sleeper.count() < 3 {
                    tokio::task::yield_now().await;
                }
            })
            .await;

        assert_eq!(cycles, 4);
        assert_eq!(h.exchange.position_calls(), 4);
        assert_eq!(h.sleeper.slept(), vec![Duration::from_secs(60); 3]);
        assert_eq!(h.sink.sent().len(), 4);
    }

    #[tokio::test]
    async fn test_pending_shutdown_stops_after_current_cycle() {
        let mut h = harness();

        let cycles = h.scheduler.run(async {}).await;

        assert_eq!(cycles, 1);
        assert_eq!(h.exchange.position_calls(), 1);
        assert!(h.sleeper.slept().is_empty());
    }
}
