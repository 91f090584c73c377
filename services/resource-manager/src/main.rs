//! Resource manager entry point.

use std::sync::Arc;

use anyhow::Result;
use netres_netcfg::NetworkConfigStore;
use netres_resource::{InMemoryResourceStore, ResourceAdmin};
use netres_resource_manager::{logging, run_sync_loop, Config, ResourceManager};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_level)?;

    info!(
        dispatch_workers = config.dispatch_workers,
        failure_policy = ?config.failure_policy,
        network_config = ?config.network_config,
        sync_interval_secs = config.sync_interval_secs,
        "Starting resource manager"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let store = Arc::new(NetworkConfigStore::with_default_classes());
    let registry = Arc::new(InMemoryResourceStore::new());
    let manager = Arc::new(ResourceManager::new(
        Arc::clone(&store),
        Arc::clone(&registry) as Arc<dyn ResourceAdmin>,
        Handle::current(),
        config.dispatch(),
    ));

    let sync_handle = match config.network_config.clone() {
        Some(path) => {
            let interval = config.sync_interval();
            let manager = Arc::clone(&manager);
            let registry = Arc::clone(&registry);
            let shutdown_rx = shutdown_rx.clone();
            Some(tokio::spawn(async move {
                run_sync_loop(&path, interval, manager, registry, shutdown_rx).await
            }))
        }
        None => {
            warn!("NETRES_NETWORK_CONFIG not set, waiting for configuration changes");
            None
        }
    };

    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal");

    let _ = shutdown_tx.send(true);
    if let Some(handle) = sync_handle {
        let _ = handle.await;
    }
    manager.shutdown().await;

    for spec in registry.snapshot() {
        info!(resource = %spec.key, capacity_bps = spec.capacity, "Registered resource");
    }

    Ok(())
}
