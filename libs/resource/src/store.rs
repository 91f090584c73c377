//! In-memory resource registry.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::{ContinuousResourceSpec, ResourceAdmin, ResourceKey};

/// Registry holding at most one continuous resource per key.
///
/// `register` fails if the key is taken and `unregister` fails if it is
/// empty. Replace uses the default unregister-then-register sequence.
#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    resources: RwLock<BTreeMap<ResourceKey, u64>>,
}

impl InMemoryResourceStore {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with default capacities, such as
    /// those derived from port speed at device discovery.
    pub fn with_resources(resources: impl IntoIterator<Item = ContinuousResourceSpec>) -> Self {
        let resources = resources
            .into_iter()
            .map(|spec| (spec.key, spec.capacity))
            .collect();
        Self {
            resources: RwLock::new(resources),
        }
    }

    /// Returns the capacity registered at a key.
    pub fn capacity(&self, key: &ResourceKey) -> Option<u64> {
        self.resources.read().get(key).copied()
    }

    /// Returns a copy of every registered resource, ordered by key.
    pub fn snapshot(&self) -> Vec<ContinuousResourceSpec> {
        self.resources
            .read()
            .iter()
            .map(|(key, capacity)| ContinuousResourceSpec::new(key.clone(), *capacity))
            .collect()
    }

    /// Returns the number of registered resources.
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }
}

impl ResourceAdmin for InMemoryResourceStore {
    fn register_resources(&self, spec: &ContinuousResourceSpec) -> bool {
        let mut resources = self.resources.write();
        if resources.contains_key(&spec.key) {
            debug!(key = %spec.key, "Resource already registered");
            return false;
        }
        resources.insert(spec.key.clone(), spec.capacity);
        true
    }

    fn unregister_resources(&self, spec: &ContinuousResourceSpec) -> bool {
        let removed = self.resources.write().remove(&spec.key);
        if removed.is_none() {
            debug!(key = %spec.key, "No resource registered");
        }
        removed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bandwidth, ReplaceOutcome};
    use netres_id::ConnectPoint;

    fn spec(cp: &str, mbps: u64) -> ContinuousResourceSpec {
        let cp: ConnectPoint = cp.parse().unwrap();
        ContinuousResourceSpec::bandwidth(&cp, Bandwidth::mbps(mbps))
    }

    #[test]
    fn test_register_rejects_occupied_key() {
        let store = InMemoryResourceStore::new();
        assert!(store.register_resources(&spec("of:1/1", 1)));
        assert!(!store.register_resources(&spec("of:1/1", 2)));
        assert_eq!(store.capacity(&spec("of:1/1", 0).key), Some(1_000_000));
    }

    #[test]
    fn test_unregister_ignores_capacity() {
        let store = InMemoryResourceStore::with_resources([spec("of:1/1", 10)]);
        let placeholder = ContinuousResourceSpec::placeholder(spec("of:1/1", 0).key);
        assert!(store.unregister_resources(&placeholder));
        assert!(store.is_empty());
        assert!(!store.unregister_resources(&placeholder));
    }

    #[test]
    fn test_default_replace() {
        let store = InMemoryResourceStore::with_resources([spec("of:1/1", 1)]);
        let outcome = store.replace_resources(&spec("of:1/1", 2));
        assert_eq!(outcome, ReplaceOutcome::REPLACED);
        assert_eq!(store.capacity(&spec("of:1/1", 0).key), Some(2_000_000));

        // Replacing an empty key still registers; only the unregister fails.
        let outcome = store.replace_resources(&spec("of:1/2", 3));
        assert!(!outcome.unregistered);
        assert!(outcome.is_registered());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let store = InMemoryResourceStore::with_resources([spec("of:2/1", 1), spec("of:1/1", 1)]);
        let keys: Vec<_> = store
            .snapshot()
            .into_iter()
            .map(|s| s.key.connect_point().to_string())
            .collect();
        assert_eq!(keys, vec!["of:1/1", "of:2/1"]);
    }
}
