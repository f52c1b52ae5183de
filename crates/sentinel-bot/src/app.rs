//! Main application orchestration.
//!
//! Wires the exchange client, alert sink and tracker into a
//! [`PollingScheduler`], and runs the liveness server beside it.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{error, info};

use sentinel_exchange::{BinanceClient, ExchangeClient, RequestSigner};
use sentinel_health::run_server;
use sentinel_notify::{AlertSink, LogSink, PushbulletSink};
use sentinel_tracker::PositionTracker;

use crate::clock::{SystemClock, TokioSleeper};
use crate::config::{AppConfig, Secrets};
use crate::error::{AppError, AppResult};
use crate::scheduler::{CycleReport, PollingScheduler};

/// Command-line overrides.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Log alerts instead of pushing them.
    pub dry_run: bool,
}

/// Main application.
pub struct Application {
    config: AppConfig,
    scheduler: PollingScheduler,
    dry_run: bool,
}

impl Application {
    /// Build the application from config and environment credentials.
    pub fn new(config: AppConfig, options: RunOptions) -> AppResult<Self> {
        let dry_run = options.dry_run || config.notify.dry_run;
        let secrets = Secrets::from_env(dry_run)?;
        Self::with_secrets(config, secrets, dry_run)
    }

    pub fn with_secrets(config: AppConfig, secrets: Secrets, dry_run: bool) -> AppResult<Self> {
        config.validate()?;

        let exchange: Arc<dyn ExchangeClient> = Arc::new(BinanceClient::new(
            &config.exchange,
            RequestSigner::new(secrets.exchange),
        )?);

        let sink: Arc<dyn AlertSink> = match (dry_run, secrets.push_token) {
            (false, Some(token)) => Arc::new(PushbulletSink::new(&config.notify, token.as_str())?),
            (false, None) => {
                return Err(AppError::Config(
                    "push token required unless dry_run is set".to_string(),
                ))
            }
            (true, _) => Arc::new(LogSink),
        };

        let scheduler = PollingScheduler::new(
            PositionTracker::new(config.tracker),
            exchange,
            sink,
            Arc::new(SystemClock),
            Arc::new(TokioSleeper),
            config.scheduler.interval(),
        );

        Ok(Self {
            config,
            scheduler,
            dry_run,
        })
    }

    /// Run a single cycle, for smoke testing.
    pub async fn run_once(mut self) -> AppResult<CycleReport> {
        info!(dry_run = self.dry_run, "Running single cycle");
        Ok(self.scheduler.run_cycle().await)
    }

    /// Run until Ctrl-C.
    pub async fn run(mut self) -> AppResult<()> {
        info!(
            dry_run = self.dry_run,
            base_url = %self.config.exchange.base_url,
            interval_secs = self.config.scheduler.interval_secs,
            "Starting application"
        );

        if self.config.health.enabled {
            let health = self.config.health.clone();
            tokio::spawn(async move {
                if let Err(e) = run_server(health).await {
                    error!(error = %e, "Health server failed");
                }
            });
        }

        let shutdown = spawn_shutdown_listener(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        });

        let cycles = self.scheduler.run(shutdown).await;

        info!(cycles, "Shutting down");
        Ok(())
    }
}

/// Start listening for `signal` on its own task right away.
///
/// The returned future resolves once the signal has fired, even if it is
/// first awaited later. A signal that fails to install never resolves.
pub fn spawn_shutdown_listener<S>(signal: S) -> impl Future<Output = ()> + Send
where
    S: Future<Output = ()> + Send + 'static,
{
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        signal.await;
        let _ = tx.send(());
    });

    async move {
        if rx.await.is_err() {
            // Listener task ended without firing
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_exchange::Credentials;
    use zeroize::Zeroizing;

    fn secrets(push: Option<&str>) -> Secrets {
        Secrets {
            exchange: Credentials::new("key", "secret"),
            push_token: push.map(|t| Zeroizing::new(t.to_string())),
        }
    }

    #[test]
    fn test_builds_with_push_token() {
        assert!(Application::with_secrets(AppConfig::default(), secrets(Some("tok")), false).is_ok());
    }

    #[test]
    fn test_dry_run_needs_no_push_token() {
        let app = Application::with_secrets(AppConfig::default(), secrets(None), true).unwrap();
        assert!(app.dry_run);
    }

    #[test]
    fn test_live_without_token_rejected() {
        let result = Application::with_secrets(AppConfig::default(), secrets(None), false);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_shutdown_listener_installed_before_awaited() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let installed = Arc::new(AtomicBool::new(false));
        let (fire_tx, fire_rx) = oneshot::channel::<()>();
        let flag = installed.clone();
        let shutdown = spawn_shutdown_listener(async move {
            flag.store(true, Ordering::SeqCst);
            let _ = fire_rx.await;
        });

        // Listener runs on its own task without the returned future being polled
        tokio::task::yield_now().await;
        assert!(installed.load(Ordering::SeqCst));

        // Signal fires while nobody waits on it, then is observed later
        fire_tx.send(()).unwrap();
        tokio::task::yield_now().await;
        tokio::time::timeout(std::time::Duration::from_secs(1), shutdown)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_completed_signal_resolves_shutdown() {
        let shutdown = spawn_shutdown_listener(async {});
        tokio::time::timeout(std::time::Duration::from_secs(1), shutdown)
            .await
            .unwrap();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.scheduler.interval_secs = 0;
        let result = Application::with_secrets(config, secrets(Some("tok")), false);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
