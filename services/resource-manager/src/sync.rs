//! Loading network configuration files into the store.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use netres_events::{ConfigClass, ConfigSubject};
use netres_netcfg::{read_network_config, ConfigSource, NetworkConfigStore, SyncSummary};
use netres_reconcile::ConvergenceStatus;
use netres_resource::{InMemoryResourceStore, ResourceKey};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::manager::ResourceManager;

/// Declared versus registered bandwidth across all configured ports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvergenceReport {
    pub converged: usize,
    pub diverged: usize,
    pub missing: usize,
    /// Registered entries with no declared capacity.
    pub undeclared: usize,
}

impl ConvergenceReport {
    /// Returns true if every declared capacity is registered as declared.
    pub fn is_converged(&self) -> bool {
        self.diverged == 0 && self.missing == 0
    }
}

/// Compare each declared bandwidth capacity with the registry.
pub fn report_convergence(
    store: &NetworkConfigStore,
    registry: &InMemoryResourceStore,
) -> ConvergenceReport {
    let mut report = ConvergenceReport::default();

    for spec in registry.snapshot() {
        let declared = declared_capacity(store, &spec.key);
        if declared.is_none() {
            report.undeclared += 1;
        }
    }

    for (subject, class) in store.keys() {
        if class != ConfigClass::BANDWIDTH_CAPACITY {
            continue;
        }
        let ConfigSubject::ConnectPoint(cp) = subject else {
            continue;
        };

        let key = ResourceKey::bandwidth(&cp);
        let status =
            ConvergenceStatus::evaluate(declared_capacity(store, &key), registry.capacity(&key));
        match status {
            ConvergenceStatus::Converged => report.converged += 1,
            ConvergenceStatus::Diverged => report.diverged += 1,
            ConvergenceStatus::Missing => report.missing += 1,
            ConvergenceStatus::Undeclared => {}
        }
    }

    report
}

fn declared_capacity(store: &NetworkConfigStore, key: &ResourceKey) -> Option<u64> {
    store
        .bandwidth_capacity(&key.connect_point())
        .ok()
        .flatten()
        .and_then(|config| config.capacity())
        .map(|bandwidth| bandwidth.as_bps())
}

/// Apply a network configuration file and wait for reconciliation.
pub async fn sync_file(path: &Path, manager: &ResourceManager) -> Result<SyncSummary> {
    let entries = read_network_config(path)
        .with_context(|| format!("failed to load network configuration {}", path.display()))?;

    let summary = manager.store().sync(entries);
    manager.wait_idle().await;

    info!(
        path = %path.display(),
        added = summary.added,
        updated = summary.updated,
        removed = summary.removed,
        unchanged = summary.unchanged,
        rejected = summary.rejected,
        "Network configuration synced"
    );

    Ok(summary)
}

/// Sync the file once, then again every `interval` until shutdown.
pub async fn run_sync_loop(
    path: &Path,
    interval: Option<Duration>,
    manager: Arc<ResourceManager>,
    registry: Arc<InMemoryResourceStore>,
    mut shutdown: watch::Receiver<bool>,
) {
    let Some(interval) = interval else {
        sync_and_report(path, &manager, &registry).await;
        return;
    };

    info!(
        interval_secs = interval.as_secs(),
        "Starting network configuration sync loop"
    );
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sync_and_report(path, &manager, &registry).await;
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("Sync loop shutting down");
                    break;
                }
            }
        }
    }
}

async fn sync_and_report(path: &Path, manager: &ResourceManager, registry: &InMemoryResourceStore) {
    if let Err(e) = sync_file(path, manager).await {
        error!(error = ?e, "Network configuration sync failed");
        return;
    }

    for spec in registry.snapshot() {
        info!(resource = %spec.key, capacity_bps = spec.capacity, "Registered resource");
    }

    let report = report_convergence(manager.store(), registry);
    if report.is_converged() {
        info!(
            converged = report.converged,
            undeclared = report.undeclared,
            "Registry converged"
        );
    } else {
        warn!(
            converged = report.converged,
            diverged = report.diverged,
            missing = report.missing,
            undeclared = report.undeclared,
            "Registry diverges from configuration"
        );
    }
}
