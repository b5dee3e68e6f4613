//! Settlement scheduling
//!
//! A periodic loop that drives [`InvestmentService::run_maturity_settlement`]:
//! one pass immediately at startup (catching up on anything that matured
//! while the worker was down), then one pass per tick. An atomic flag
//! skips a tick if the previous pass is still running, so passes never
//! overlap within one process; across processes the storage layer's
//! conditional update keeps concurrent passes safe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use domain_investment::{InvestmentPort, Notifier};

use crate::service::{InvestmentService, SettlementSummary};

/// Periodic driver for the settlement pass
pub struct SettlementScheduler<P, N> {
    service: Arc<InvestmentService<P, N>>,
    interval: Duration,
    running: AtomicBool,
}

impl<P, N> SettlementScheduler<P, N>
where
    P: InvestmentPort,
    N: Notifier,
{
    pub fn new(service: Arc<InvestmentService<P, N>>, interval: Duration) -> Self {
        Self {
            service,
            interval,
            running: AtomicBool::new(false),
        }
    }

    /// Runs the scheduling loop until `shutdown` resolves
    ///
    /// The first pass runs immediately; subsequent passes run once per
    /// interval tick.
    pub async fn run(self: Arc<Self>, shutdown: impl std::future::Future<Output = ()>) {
        info!(interval_secs = self.interval.as_secs(), "settlement scheduler started");

        let mut ticker = tokio::time::interval(self.interval);
        // First tick completes immediately, giving us the startup pass
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.trigger_now().await;
                }
                _ = &mut shutdown => {
                    info!("settlement scheduler stopping");
                    break;
                }
            }
        }
    }

    /// Runs one settlement pass now, unless one is already in flight
    ///
    /// Returns the pass summary, or `None` if the pass was skipped.
    pub async fn trigger_now(&self) -> Option<SettlementSummary> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("settlement pass still running, skipping this tick");
            return None;
        }

        let result = self.service.run_maturity_settlement(Utc::now()).await;
        self.running.store(false, Ordering::SeqCst);

        match result {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(error = %e, "settlement pass aborted, will retry next tick");
                None
            }
        }
    }
}
