//! Poll-driven reconciliation engine
//!
//! The Poller owns one tick of work and the loop around it:
//!
//! ```text
//!  ┌──────────┐   current IP   ┌──────────────┐
//!  │ IpSource │──────────────▶│    Poller    │◀── sleep(interval / backoff)
//!  └──────────┘                └──────────────┘
//!                                     │
//!        ┌────────────────┬───────────┴────┬─────────────────┐
//!        ▼                ▼                ▼                 ▼
//!  ┌────────────┐  ┌─────────────┐  ┌────────────┐  ┌────────────────┐
//!  │ StateStore │  │ DnsProvider │  │  Notifier  │  │   StateStore   │
//!  │  (load)    │  │ (update)    │  │  (notify)  │  │ (save, last)   │
//!  └────────────┘  └─────────────┘  └────────────┘  └────────────────┘
//! ```
//!
//! ## Tick State Machine
//!
//! - **No state** → save the fetched IP as the baseline. No DNS call, no
//!   notification.
//! - **Same IP** → nothing to do.
//! - **Different IP** → update DNS, then notify, then save. Any failure ends
//!   the tick with the old IP still stored, so the next tick retries the
//!   whole reconciliation. A dry-run update also stops there: the records
//!   were never touched, so neither the notification nor the save happen.
//!
//! Errors never stop the loop. They are logged and the loop sleeps until the
//! next tick.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::traits::{DnsProvider, DnsUpdate, IpSource, Notifier, StateStore};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

/// What a successful tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No prior state existed; the fetched IP was stored as the baseline
    Baseline {
        /// The stored IP
        ip: String,
    },

    /// The fetched IP matches the stored one
    Unchanged {
        /// The current IP
        ip: String,
    },

    /// DNS was updated, the notification sent, and the new IP stored
    Reconciled {
        /// The IP stored before this tick
        previous: String,
        /// The IP now in DNS and on disk
        current: String,
    },

    /// The provider only logged the change; nothing was notified or stored
    DryRun {
        /// The IP still stored (and still in DNS)
        previous: String,
        /// The IP that would have been applied
        current: String,
    },
}

/// Poll loop driving IP discovery, DNS reconciliation and persistence
///
/// ## Lifecycle
///
/// 1. Create with [`Poller::new()`]
/// 2. Start with [`Poller::run()`]
/// 3. Runs until Ctrl-C / SIGTERM
///
/// ## Threading
///
/// Single logical thread of control: one tick runs to completion before the
/// loop sleeps, and the shutdown signal is only observed while sleeping, so
/// a tick is never abandoned halfway.
pub struct Poller {
    ip_source: Box<dyn IpSource>,
    provider: Box<dyn DnsProvider>,
    notifier: Box<dyn Notifier>,
    state_store: Box<dyn StateStore>,

    /// Delay between ticks
    interval: Duration,

    /// Backoff cap after consecutive failures (None = fixed interval)
    max_backoff: Option<Duration>,
}

impl Poller {
    /// Create a new poller
    ///
    /// # Parameters
    ///
    /// - `ip_source`: Where the current IP comes from
    /// - `provider`: DNS provider to reconcile
    /// - `notifier`: Push notification target
    /// - `state_store`: Holder of the last reconciled IP
    /// - `config`: Loop timing
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        notifier: Box<dyn Notifier>,
        state_store: Box<dyn StateStore>,
        config: &EngineConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            provider,
            notifier,
            state_store,
            interval: Duration::from_secs(config.interval_secs),
            max_backoff: config.max_backoff_secs.map(Duration::from_secs),
        })
    }

    /// Run one poll tick
    ///
    /// # Returns
    ///
    /// - `Ok(TickOutcome)`: What the tick did
    /// - `Err(Error)`: The first failing step; nothing was persisted
    pub async fn tick(&self) -> Result<TickOutcome> {
        let ip = self.ip_source.current().await?;
        info!("Fetched current IP {} from {}", ip, self.ip_source.source_name());

        let previous = match self.state_store.load().await? {
            None => {
                self.state_store.save(&ip).await?;
                info!("No prior state, recorded {} as baseline", ip);
                return Ok(TickOutcome::Baseline { ip });
            }
            Some(previous) => previous,
        };

        if previous == ip {
            debug!("IP unchanged ({}), nothing to do", ip);
            return Ok(TickOutcome::Unchanged { ip });
        }

        info!("IP changed: {} -> {}", previous, ip);

        if self.provider.update_dns(&ip).await? == DnsUpdate::DryRun {
            info!("Dry-run: keeping {} stored, no notification sent", previous);
            return Ok(TickOutcome::DryRun {
                previous,
                current: ip,
            });
        }
        info!("DNS updated via {}", self.provider.provider_name());

        self.notifier.notify(&ip).await?;
        info!("Notification sent via {}", self.notifier.notifier_name());

        self.state_store.save(&ip).await?;

        Ok(TickOutcome::Reconciled {
            previous,
            current: ip,
        })
    }

    /// Delay before the next tick given the number of consecutive failed ticks
    ///
    /// Without a backoff cap this is always the poll interval. With one, each
    /// consecutive failure doubles the interval up to the cap.
    pub fn next_delay(&self, consecutive_failures: u32) -> Duration {
        match self.max_backoff {
            Some(cap) if consecutive_failures > 0 => {
                let factor = 2u32
                    .checked_pow(consecutive_failures.min(31))
                    .unwrap_or(u32::MAX);
                self.interval.saturating_mul(factor).min(cap)
            }
            _ => self.interval,
        }
    }

    /// Run the poll loop until Ctrl-C or SIGTERM
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run the poll loop until `shutdown_rx` fires (or its sender is dropped)
    ///
    /// Production code should use [`Poller::run()`]; this exists so tests
    /// can stop the loop deterministically.
    pub async fn run_with_shutdown(&self, shutdown_rx: oneshot::Receiver<()>) -> Result<()> {
        self.run_internal(Some(shutdown_rx)).await
    }

    async fn run_internal(&self, shutdown_rx: Option<oneshot::Receiver<()>>) -> Result<()> {
        info!(
            "Poller started (interval={:?}, max_backoff={:?})",
            self.interval, self.max_backoff
        );

        let shutdown = async move {
            match shutdown_rx {
                Some(rx) => {
                    let _ = rx.await;
                }
                None => wait_for_signal().await,
            }
        };
        tokio::pin!(shutdown);

        let mut consecutive_failures: u32 = 0;

        loop {
            match self.tick().await {
                Ok(outcome) => {
                    consecutive_failures = 0;
                    debug!("Tick finished: {:?}", outcome);
                }
                Err(e) => {
                    consecutive_failures = consecutive_failures.saturating_add(1);
                    error!(
                        "Tick failed ({} consecutive): {}",
                        consecutive_failures, e
                    );
                }
            }

            let delay = self.next_delay(consecutive_failures);
            debug!("Sleeping {:?} until next tick", delay);

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("Poller stopped");
        Ok(())
    }
}

/// Wait for SIGINT or SIGTERM
#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to set up SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
}

/// Wait for Ctrl-C
#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
