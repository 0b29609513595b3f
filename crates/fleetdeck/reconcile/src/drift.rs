//! Drift corrector: periodic resynchronization of cached statuses.
//!
//! On a fixed period (and once eagerly at startup) every registered
//! instance's observed state is fetched in parallel; records whose
//! conclusive observation disagrees with the cached belief are updated in
//! one atomic registry write. One unreachable instance never blocks the
//! others. An in-flight guard keeps a slow sweep from overlapping the next
//! tick.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future;
use fleetdeck_provider::ProviderApi;
use fleetdeck_registry::RegistryManager;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::DriftConfig;
use crate::error::ReconcileResult;

/// Summary of one completed sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    /// Records whose status was fetched (or attempted).
    pub checked: usize,
    /// Records whose cached status was corrected.
    pub updated: usize,
    /// Records whose status fetch failed and was skipped.
    pub failed: usize,
}

/// Periodically reconciles every record's cached status with the
/// provider's observed state.
pub struct DriftCorrector {
    provider: Arc<dyn ProviderApi>,
    registry: Arc<RegistryManager>,
    config: DriftConfig,
    sweeping: AtomicBool,
}

impl DriftCorrector {
    pub fn new(
        provider: Arc<dyn ProviderApi>,
        registry: Arc<RegistryManager>,
        config: DriftConfig,
    ) -> Self {
        Self {
            provider,
            registry,
            config,
            sweeping: AtomicBool::new(false),
        }
    }

    /// Run one sweep. Returns `None` when a sweep is already in progress
    /// (the new one is skipped, not queued).
    pub async fn sweep(&self) -> ReconcileResult<Option<SweepReport>> {
        if self
            .sweeping
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("drift sweep already in progress; skipping");
            return Ok(None);
        }

        let result = self.sweep_inner().await;
        self.sweeping.store(false, Ordering::Release);
        result.map(Some)
    }

    async fn sweep_inner(&self) -> ReconcileResult<SweepReport> {
        let records = self.registry.list().await?;
        if records.is_empty() {
            return Ok(SweepReport {
                checked: 0,
                updated: 0,
                failed: 0,
            });
        }

        // All fetches go out together; completion order does not matter
        // because the result is applied as one write.
        let fetches = records.iter().map(|record| {
            let provider = Arc::clone(&self.provider);
            let remote_id = record.remote_id.clone();
            async move {
                let result = provider.fetch_status(&remote_id).await;
                (remote_id, result)
            }
        });
        let results = future::join_all(fetches).await;

        let mut observed = HashMap::new();
        let mut failed = 0;
        for (remote_id, result) in results {
            match result {
                Ok(state) => {
                    observed.insert(remote_id, state);
                }
                Err(err) => {
                    failed += 1;
                    warn!(
                        remote_id = %remote_id,
                        error = %err,
                        "status fetch failed during drift sweep; skipping"
                    );
                }
            }
        }

        // Applied against the freshest snapshot under the registry's write
        // lock, so a transition confirmed mid-sweep is not overwritten.
        let updated = self.registry.apply_observations(&observed).await?;
        if updated > 0 {
            info!(updated, checked = records.len(), "drift sweep corrected cached statuses");
        }

        Ok(SweepReport {
            checked: records.len(),
            updated,
            failed,
        })
    }

    /// Sweep loop: one eager sweep, then one per period until shutdown.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        if let Err(err) = self.sweep().await {
            warn!(error = %err, "initial drift sweep failed");
        }

        let mut ticker = tokio::time::interval(self.config.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a fresh interval completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.sweep().await {
                        warn!(error = %err, "drift sweep failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("drift corrector stopping");
                        return;
                    }
                }
            }
        }
    }
}
