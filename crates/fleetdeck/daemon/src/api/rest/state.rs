//! Shared application state for the REST API.

use std::sync::Arc;

use fleetdeck_provider::ProviderApi;
use fleetdeck_reconcile::{DriftCorrector, PowerReconciler};
use fleetdeck_registry::RegistryManager;
use fleetdeck_scanner::ApplianceScanner;
use tokio::sync::watch;

use crate::pages::PageStore;

/// Handles shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ProviderApi>,
    pub registry: Arc<RegistryManager>,
    pub reconciler: Arc<PowerReconciler>,
    pub drift: Arc<DriftCorrector>,
    /// Absent when no vision credential is configured.
    pub scanner: Option<Arc<ApplianceScanner>>,
    pub pages: Arc<PageStore>,
    /// Shared admin token gating page edits; editing disabled when unset.
    pub admin_token: Option<String>,
    pub shutdown_tx: watch::Sender<bool>,
}
