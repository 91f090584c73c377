//! Configuration source and listener contracts.

use netres_events::{ConfigChangeEvent, ConfigClass, ConfigSubject};
use netres_id::ConnectPoint;
use serde_json::Value;

use crate::{BandwidthCapacityConfig, ConfigError, NetworkConfig};

/// Synchronous lookup of current configuration documents.
pub trait ConfigSource: Send + Sync {
    /// Returns the current document for (subject, class), if any.
    fn get_config(&self, subject: &ConfigSubject, class: &ConfigClass) -> Option<Value>;

    /// Returns the bandwidth capacity document for a connect point.
    fn bandwidth_capacity(
        &self,
        cp: &ConnectPoint,
    ) -> Result<Option<BandwidthCapacityConfig>, ConfigError> {
        typed_config(self, &ConfigSubject::ConnectPoint(cp.clone()))
    }
}

/// Reads a typed document from any source.
pub fn typed_config<C, S>(source: &S, subject: &ConfigSubject) -> Result<Option<C>, ConfigError>
where
    C: NetworkConfig,
    S: ConfigSource + ?Sized,
{
    source
        .get_config(subject, &C::CLASS)
        .map(|node| C::from_node(subject, node))
        .transpose()
}

/// Receives configuration change events.
///
/// Both methods run on the source's delivery thread and must not block.
pub trait ConfigListener: Send + Sync {
    /// Cheap filter evaluated for every event before [`event`](Self::event).
    fn is_relevant(&self, _event: &ConfigChangeEvent) -> bool {
        true
    }

    /// Called for each relevant event.
    fn event(&self, event: ConfigChangeEvent);
}
