//! Configuration listener that hands bandwidth changes to the dispatch pool.

use std::sync::Arc;

use netres_events::{ConfigChangeEvent, ConfigClass};
use netres_netcfg::ConfigListener;

use crate::dispatch::DispatchPool;
use crate::handler::BandwidthCapacityHandler;

/// Configuration classes this listener reacts to.
pub const RELEVANT_CLASSES: &[ConfigClass] = &[ConfigClass::BANDWIDTH_CAPACITY];

/// Returns true if the event's class is one this listener reconciles.
pub fn is_relevant(event: &ConfigChangeEvent) -> bool {
    RELEVANT_CLASSES.contains(&event.config_class)
}

/// Listener that reconciles bandwidth capacity asynchronously.
///
/// `event` only enqueues work, so the configuration source's delivery
/// thread is never held up by registry calls.
pub struct ResourceConfigListener {
    handler: Arc<BandwidthCapacityHandler>,
    pool: Arc<DispatchPool>,
}

impl ResourceConfigListener {
    pub fn new(handler: Arc<BandwidthCapacityHandler>, pool: Arc<DispatchPool>) -> Self {
        Self { handler, pool }
    }
}

impl ConfigListener for ResourceConfigListener {
    fn is_relevant(&self, event: &ConfigChangeEvent) -> bool {
        is_relevant(event)
    }

    fn event(&self, event: ConfigChangeEvent) {
        if event.config_class != ConfigClass::BANDWIDTH_CAPACITY {
            return;
        }

        let handler = Arc::clone(&self.handler);
        self.pool.submit("bandwidth_capacity", move || {
            handler.handle(&event).map_err(anyhow::Error::from)
        });
    }
}
