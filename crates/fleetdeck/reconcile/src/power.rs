//! Power reconciler: drive one instance to a requested power state and
//! confirm the remote system actually reached it.
//!
//! Per invocation the state machine is strictly ordered: AuthCheck →
//! Requesting → Polling → Confirmed | Unconfirmed. Auth and request
//! failures are terminal before any polling. The cached status is written
//! only on a confirmed transition; a timed-out window leaves the registry
//! untouched.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fleetdeck_provider::ProviderApi;
use fleetdeck_registry::RegistryManager;
use fleetdeck_types::{InstanceId, ObservedState, PowerTarget, RemoteInstanceId};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ReconcileConfig;
use crate::error::{ReconcileError, ReconcileResult};

/// Terminal outcome of a toggle that got past the request stage.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ToggleOutcome {
    /// The observed state matched the target within the confirmation
    /// window; the registry now reflects it.
    Confirmed { running: bool },

    /// The window elapsed without a matching observation. The cached
    /// status is unchanged and must not be assumed to have flipped in
    /// either direction.
    Unconfirmed {
        target: PowerTarget,
        last_observed: ObservedState,
    },
}

/// Drives user-requested power transitions, one at a time per instance.
pub struct PowerReconciler {
    provider: Arc<dyn ProviderApi>,
    registry: Arc<RegistryManager>,
    config: ReconcileConfig,
    busy: DashMap<RemoteInstanceId, ()>,
}

impl PowerReconciler {
    pub fn new(
        provider: Arc<dyn ProviderApi>,
        registry: Arc<RegistryManager>,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            provider,
            registry,
            config,
            busy: DashMap::new(),
        }
    }

    /// Whether a reconciliation is currently in flight for this remote id.
    pub fn is_busy(&self, remote_id: &RemoteInstanceId) -> bool {
        self.busy.contains_key(remote_id)
    }

    /// Toggle the instance's power; the target is the inverse of its
    /// current cached status.
    ///
    /// Returns `Busy` if a reconciliation for the same remote instance is
    /// already polling: two concurrent writers racing to confirm opposite
    /// targets against one record would corrupt the belief.
    pub async fn toggle(&self, id: &InstanceId) -> ReconcileResult<ToggleOutcome> {
        let record = self.registry.get(id).await?;
        let guard = self.acquire(record.remote_id.clone())?;

        // Re-read under the guard so two back-to-back toggles cannot both
        // compute a target from the same pre-transition status.
        let record = self.registry.get(id).await?;
        let target = PowerTarget::from_current(record.status);

        debug!(id = %id, remote_id = %record.remote_id, %target, "starting power reconciliation");

        // AuthCheck: fail before any remote mutation.
        self.provider.test_auth().await.map_err(ReconcileError::Auth)?;

        // Requesting: the provider acknowledges the request only.
        match target {
            PowerTarget::On => self.provider.start(&record.remote_id).await,
            PowerTarget::Off => self.provider.stop(&record.remote_id).await,
        }
        .map_err(ReconcileError::Request)?;

        // Polling: bounded confirmation window. Transient fetch errors are
        // absorbed; each iteration consumes one attempt either way.
        let mut last_observed = ObservedState::Unknown;
        for attempt in 1..=self.config.max_poll_attempts {
            tokio::time::sleep(self.config.poll_interval).await;

            match self.provider.fetch_status(&record.remote_id).await {
                Ok(observed) => {
                    last_observed = observed;
                    if observed.matches(target) {
                        self.registry.confirm_status(id, target.as_running()).await?;
                        info!(
                            id = %id,
                            remote_id = %record.remote_id,
                            %target,
                            attempt,
                            "power transition confirmed"
                        );
                        drop(guard);
                        return Ok(ToggleOutcome::Confirmed {
                            running: target.as_running(),
                        });
                    }
                    debug!(
                        remote_id = %record.remote_id,
                        attempt,
                        %observed,
                        "observed state does not match target yet"
                    );
                }
                Err(err) => {
                    debug!(
                        remote_id = %record.remote_id,
                        attempt,
                        error = %err,
                        "status poll failed; continuing"
                    );
                }
            }
        }

        warn!(
            id = %id,
            remote_id = %record.remote_id,
            %target,
            attempts = self.config.max_poll_attempts,
            "could not confirm power transition within the window"
        );
        Ok(ToggleOutcome::Unconfirmed {
            target,
            last_observed,
        })
    }

    fn acquire(&self, remote_id: RemoteInstanceId) -> ReconcileResult<BusyGuard<'_>> {
        match self.busy.entry(remote_id.clone()) {
            Entry::Occupied(_) => Err(ReconcileError::Busy(remote_id)),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(BusyGuard {
                    set: &self.busy,
                    remote_id,
                })
            }
        }
    }
}

/// Releases the per-instance exclusion slot on every exit path.
struct BusyGuard<'a> {
    set: &'a DashMap<RemoteInstanceId, ()>,
    remote_id: RemoteInstanceId,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.remote_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{fixture, ScriptedProvider};
    use fleetdeck_provider::ProviderError;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_after_delayed_flip() {
        // Provider reports stopped for 3 polls, then running.
        let provider = ScriptedProvider::new().script(
            "gpu-1",
            vec![
                Ok(ObservedState::Stopped),
                Ok(ObservedState::Stopped),
                Ok(ObservedState::Stopped),
                Ok(ObservedState::Running),
            ],
        );
        let (registry, reconciler, id) = fixture(provider, "gpu-1", false).await;

        let outcome = reconciler.toggle(&id).await.unwrap();
        assert!(matches!(outcome, ToggleOutcome::Confirmed { running: true }));
        assert!(registry.get(&id).await.unwrap().status);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_leaves_status_unchanged() {
        let provider = ScriptedProvider::new().script("gpu-1", vec![Ok(ObservedState::Stopped)]);
        let (registry, reconciler, id) = fixture(provider.clone(), "gpu-1", false).await;

        let outcome = reconciler.toggle(&id).await.unwrap();
        match outcome {
            ToggleOutcome::Unconfirmed { target, last_observed } => {
                assert_eq!(target, PowerTarget::On);
                assert_eq!(last_observed, ObservedState::Stopped);
            }
            other => panic!("expected unconfirmed outcome, got {:?}", other),
        }

        // All 12 attempts were spent and the belief did not move.
        assert_eq!(provider.fetch_calls(), 12);
        assert!(!registry.get(&id).await.unwrap().status);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_failure_aborts_before_mutation() {
        let provider = ScriptedProvider::new().with_auth_failure();
        let (registry, reconciler, id) = fixture(provider.clone(), "gpu-1", false).await;

        let err = reconciler.toggle(&id).await.unwrap_err();
        assert!(matches!(err, ReconcileError::Auth(_)));
        assert_eq!(provider.power_calls(), 0, "no start/stop after failed auth");
        assert!(!registry.get(&id).await.unwrap().status);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_failure_is_terminal() {
        let provider = ScriptedProvider::new().with_request_failure();
        let (registry, reconciler, id) = fixture(provider.clone(), "gpu-1", false).await;

        let err = reconciler.toggle(&id).await.unwrap_err();
        assert!(matches!(err, ReconcileError::Request(_)));
        assert_eq!(provider.fetch_calls(), 0, "no polling after failed request");
        assert!(!registry.get(&id).await.unwrap().status);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_errors_do_not_abort_the_window() {
        let provider = ScriptedProvider::new().script(
            "gpu-1",
            vec![
                Err(ProviderError::RemoteUnavailable("blip".to_string())),
                Err(ProviderError::RemoteUnavailable("blip".to_string())),
                Ok(ObservedState::Running),
            ],
        );
        let (registry, reconciler, id) = fixture(provider, "gpu-1", false).await;

        let outcome = reconciler.toggle(&id).await.unwrap();
        assert!(matches!(outcome, ToggleOutcome::Confirmed { running: true }));
        assert!(registry.get(&id).await.unwrap().status);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_toggle_is_rejected() {
        let provider = ScriptedProvider::new().script("gpu-1", vec![Ok(ObservedState::Stopped)]);
        let (_registry, reconciler, id) = fixture(provider, "gpu-1", false).await;
        let reconciler = Arc::new(reconciler);

        let first = {
            let reconciler = Arc::clone(&reconciler);
            let id = id.clone();
            tokio::spawn(async move { reconciler.toggle(&id).await })
        };

        // Let the first toggle reach its poll sleep so it holds the slot.
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(reconciler.is_busy(&RemoteInstanceId::new("gpu-1")));

        let second = reconciler.toggle(&id).await;
        assert!(matches!(second, Err(ReconcileError::Busy(_))));

        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, ToggleOutcome::Unconfirmed { .. }));
        assert!(!reconciler.is_busy(&RemoteInstanceId::new("gpu-1")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_off_confirms_stopped() {
        let provider = ScriptedProvider::new().script(
            "gpu-1",
            vec![Ok(ObservedState::Running), Ok(ObservedState::Stopped)],
        );
        let (registry, reconciler, id) = fixture(provider, "gpu-1", true).await;

        let outcome = reconciler.toggle(&id).await.unwrap();
        assert!(matches!(outcome, ToggleOutcome::Confirmed { running: false }));
        assert!(!registry.get(&id).await.unwrap().status);
    }
}
