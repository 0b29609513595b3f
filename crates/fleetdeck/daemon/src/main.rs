//! Fleetdeck orchestration daemon.
//!
//! Wires the registry, provider client, reconciliation engine, scanner,
//! and page store together behind the REST API, and runs the drift
//! corrector in the background.

mod api;
mod config;
mod error;
mod pages;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleetdeck_provider::{HttpProviderClient, ProviderApi};
use fleetdeck_reconcile::{DriftConfig, DriftCorrector, PowerReconciler, ReconcileConfig};
use fleetdeck_registry::{FileRegistryStore, RegistryManager};
use fleetdeck_scanner::{ApplianceScanner, OpenAiVisionTransport, ScanLog};

use crate::api::rest::router::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::pages::PageStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DaemonConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        provider_url = %config.provider_url,
        registry = %config.registry_path.display(),
        "starting fleetdeckd"
    );

    let provider: Arc<dyn ProviderApi> = Arc::new(
        HttpProviderClient::new(&config.provider_url, config.api_token.clone())
            .context("building provider client")?,
    );
    let store = Arc::new(FileRegistryStore::new(&config.registry_path));
    let registry = Arc::new(RegistryManager::new(store, Arc::clone(&provider)));
    let reconciler = Arc::new(PowerReconciler::new(
        Arc::clone(&provider),
        Arc::clone(&registry),
        ReconcileConfig::default(),
    ));
    let drift = Arc::new(DriftCorrector::new(
        Arc::clone(&provider),
        Arc::clone(&registry),
        DriftConfig::default(),
    ));

    let scanner = match &config.vision_api_key {
        Some(key) => {
            let transport = OpenAiVisionTransport::new(key.clone(), config.vision_model.clone())
                .context("building vision transport")?;
            Some(Arc::new(ApplianceScanner::new(
                Arc::new(transport),
                ScanLog::new(&config.scan_log_path),
            )))
        }
        None => {
            info!("no vision credential configured; appliance scanning disabled");
            None
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Eager sweep on load, then one per period, until shutdown.
    tokio::spawn(Arc::clone(&drift).run(shutdown_rx.clone()));

    let state = AppState {
        provider,
        registry,
        reconciler,
        drift,
        scanner,
        pages: Arc::new(PageStore::new(&config.content_dir)),
        admin_token: config.admin_token.clone(),
        shutdown_tx: shutdown_tx.clone(),
    };

    let router = create_router(state);
    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "fleetdeckd listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await
        .context("serving API")?;

    // Stop the drift loop if the server exited on its own.
    let _ = shutdown_tx.send(true);
    info!("fleetdeckd stopped");
    Ok(())
}

async fn shutdown_signal(mut shutdown_rx: watch::Receiver<bool>) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("received ctrl-c; shutting down");
        }
        _ = shutdown_rx.changed() => {
            info!("received shutdown request; shutting down");
        }
    }
}
