//! Scripted provider double shared by the engine tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fleetdeck_provider::{Ack, AuthInfo, ProviderApi, ProviderError, ProviderResult};
use fleetdeck_registry::{InMemoryRegistryStore, RegistryManager};
use fleetdeck_types::{InstanceId, InstanceRecord, ObservedState, RemoteInstanceId};

use crate::config::ReconcileConfig;
use crate::power::PowerReconciler;

/// Provider double that replays a per-instance script of `fetch_status`
/// results; the last entry repeats once the script is exhausted.
#[derive(Clone)]
pub(crate) struct ScriptedProvider {
    inner: Arc<Inner>,
}

struct Inner {
    auth_ok: bool,
    request_ok: bool,
    fetch_delay: Option<Duration>,
    scripts: Mutex<HashMap<String, Script>>,
    fetch_calls: AtomicUsize,
    power_calls: AtomicUsize,
}

struct Script {
    steps: Vec<ProviderResult<ObservedState>>,
    next: usize,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                auth_ok: true,
                request_ok: true,
                fetch_delay: None,
                scripts: Mutex::new(HashMap::new()),
                fetch_calls: AtomicUsize::new(0),
                power_calls: AtomicUsize::new(0),
            }),
        }
    }

    pub(crate) fn with_auth_failure(self) -> Self {
        self.rebuild(|inner| inner.auth_ok = false)
    }

    pub(crate) fn with_request_failure(self) -> Self {
        self.rebuild(|inner| inner.request_ok = false)
    }

    /// Every `fetch_status` call waits this long before answering.
    pub(crate) fn with_fetch_delay(self, delay: Duration) -> Self {
        self.rebuild(|inner| inner.fetch_delay = Some(delay))
    }

    pub(crate) fn script(
        self,
        remote_id: &str,
        steps: Vec<ProviderResult<ObservedState>>,
    ) -> Self {
        self.inner.scripts.lock().unwrap().insert(
            remote_id.to_string(),
            Script { steps, next: 0 },
        );
        self
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.inner.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn power_calls(&self) -> usize {
        self.inner.power_calls.load(Ordering::SeqCst)
    }

    fn rebuild(self, apply: impl FnOnce(&mut Inner)) -> Self {
        let mut inner = Arc::try_unwrap(self.inner)
            .unwrap_or_else(|_| panic!("configure the scripted provider before sharing it"));
        apply(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }
}

#[async_trait]
impl ProviderApi for ScriptedProvider {
    async fn start(&self, remote_id: &RemoteInstanceId) -> ProviderResult<Ack> {
        self.inner.power_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.request_ok {
            Ok(Ack::now(remote_id.clone()))
        } else {
            Err(ProviderError::RemoteUnavailable("scripted request failure".to_string()))
        }
    }

    async fn stop(&self, remote_id: &RemoteInstanceId) -> ProviderResult<Ack> {
        self.start(remote_id).await
    }

    async fn fetch_status(&self, remote_id: &RemoteInstanceId) -> ProviderResult<ObservedState> {
        if let Some(delay) = self.inner.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let mut scripts = self.inner.scripts.lock().unwrap();
        let Some(script) = scripts.get_mut(remote_id.as_str()) else {
            return Ok(ObservedState::Unknown);
        };
        let step = script
            .steps
            .get(script.next)
            .or_else(|| script.steps.last())
            .cloned()
            .unwrap_or(Ok(ObservedState::Unknown));
        if script.next < script.steps.len() {
            script.next += 1;
        }
        step
    }

    async fn test_auth(&self) -> ProviderResult<AuthInfo> {
        if self.inner.auth_ok {
            Ok(AuthInfo { organization: None })
        } else {
            Err(ProviderError::Auth("scripted auth failure".to_string()))
        }
    }
}

/// Registry + reconciler wired against the scripted provider, seeded with
/// one record.
pub(crate) async fn fixture(
    provider: ScriptedProvider,
    remote_id: &str,
    status: bool,
) -> (Arc<RegistryManager>, PowerReconciler, InstanceId) {
    let record = InstanceRecord::new("test instance", RemoteInstanceId::new(remote_id), status);
    let id = record.id.clone();

    let store = Arc::new(InMemoryRegistryStore::with_records(vec![record]));
    let provider: Arc<dyn ProviderApi> = Arc::new(provider);
    let registry = Arc::new(RegistryManager::new(store, Arc::clone(&provider)));
    let reconciler =
        PowerReconciler::new(provider, Arc::clone(&registry), ReconcileConfig::default());

    (registry, reconciler, id)
}
