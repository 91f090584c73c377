//! Wiring between the configuration store and the resource registry.

use std::sync::Arc;

use netres_netcfg::{ConfigListener, ConfigSource, NetworkConfigStore};
use netres_resource::ResourceAdmin;
use tokio::runtime::Handle;
use tracing::{info, info_span};

use crate::dispatch::{DispatchConfig, DispatchPool};
use crate::handler::BandwidthCapacityHandler;
use crate::listener::ResourceConfigListener;

/// Keeps a resource registry in line with bandwidth capacity configuration.
///
/// Created listening; [`shutdown`](Self::shutdown) detaches it from the
/// store and drains outstanding work. Dropping the manager also detaches it.
pub struct ResourceManager {
    store: Arc<NetworkConfigStore>,
    pool: Arc<DispatchPool>,
    listener: Arc<dyn ConfigListener>,
}

impl ResourceManager {
    /// Create a manager and attach it to `store`.
    pub fn new(
        store: Arc<NetworkConfigStore>,
        admin: Arc<dyn ResourceAdmin>,
        runtime: Handle,
        dispatch: DispatchConfig,
    ) -> Self {
        let span = info_span!("resource_manager");
        let workers = dispatch.workers;

        let pool = Arc::new(DispatchPool::new(
            runtime,
            dispatch,
            info_span!(parent: &span, "dispatch"),
        ));
        let handler = Arc::new(BandwidthCapacityHandler::new(
            admin,
            Arc::clone(&store) as Arc<dyn ConfigSource>,
            info_span!(parent: &span, "bandwidth_capacity"),
        ));
        let listener: Arc<dyn ConfigListener> = Arc::new(ResourceConfigListener::new(
            handler,
            Arc::clone(&pool),
        ));

        store.add_listener(Arc::clone(&listener));
        span.in_scope(|| info!(workers, "Resource manager listening for configuration"));

        Self {
            store,
            pool,
            listener,
        }
    }

    /// The store this manager listens to.
    pub fn store(&self) -> &Arc<NetworkConfigStore> {
        &self.store
    }

    /// The pool running reconciliation work.
    pub fn pool(&self) -> &DispatchPool {
        &self.pool
    }

    /// Wait until all submitted reconciliation work has finished.
    pub async fn wait_idle(&self) {
        self.pool.wait_idle().await;
    }

    /// Stop listening and wait for outstanding work.
    pub async fn shutdown(&self) {
        self.store.remove_listener(&self.listener);
        self.pool.wait_idle().await;
        info!("Resource manager stopped");
    }
}

impl Drop for ResourceManager {
    fn drop(&mut self) {
        self.store.remove_listener(&self.listener);
    }
}
