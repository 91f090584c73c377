//! In-memory configuration store with change notification.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use netres_events::{ConfigChangeEvent, ConfigChangeType, ConfigClass, ConfigSubject, SubjectKind};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    BandwidthCapacityConfig, ConfigEntry, ConfigError, ConfigListener, ConfigSource,
    NetworkConfig, SegmentRoutingAppConfig,
};

type ConfigKey = (ConfigSubject, ConfigClass);

/// Counts from a [`NetworkConfigStore::sync`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub rejected: usize,
}

/// Stores validated documents and notifies listeners of changes.
///
/// Events are delivered synchronously on the thread that made the change,
/// after the store's locks are released.
pub struct NetworkConfigStore {
    classes: RwLock<BTreeMap<ConfigClass, SubjectKind>>,
    configs: RwLock<BTreeMap<ConfigKey, Value>>,
    listeners: RwLock<Vec<Arc<dyn ConfigListener>>>,
}

impl NetworkConfigStore {
    /// Creates a store with no registered classes.
    pub fn new() -> Self {
        Self {
            classes: RwLock::new(BTreeMap::new()),
            configs: RwLock::new(BTreeMap::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Creates a store with the bandwidth capacity and segment routing
    /// classes registered.
    pub fn with_default_classes() -> Self {
        let store = Self::new();
        store.register_class(BandwidthCapacityConfig::CLASS, SubjectKind::Port);
        store.register_class(SegmentRoutingAppConfig::CLASS, SubjectKind::App);
        store
    }

    /// Adds a listener.
    pub fn add_listener(&self, listener: Arc<dyn ConfigListener>) {
        self.listeners.write().push(listener);
    }

    /// Removes a previously added listener.
    pub fn remove_listener(&self, listener: &Arc<dyn ConfigListener>) {
        self.listeners.write().retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Registers a configuration class for subjects of `kind`.
    ///
    /// Returns false if the class was already registered.
    pub fn register_class(&self, class: ConfigClass, kind: SubjectKind) -> bool {
        let inserted = {
            let mut classes = self.classes.write();
            if classes.contains_key(&class) {
                false
            } else {
                classes.insert(class.clone(), kind);
                true
            }
        };

        if inserted {
            debug!(class = %class, "Registered configuration class");
            self.post(ConfigChangeEvent::class_lifecycle(
                ConfigChangeType::ConfigRegistered,
                class,
            ));
        }
        inserted
    }

    /// Unregisters a configuration class. Stored documents are kept.
    pub fn unregister_class(&self, class: &ConfigClass) -> bool {
        let removed = self.classes.write().remove(class).is_some();
        if removed {
            debug!(class = %class, "Unregistered configuration class");
            self.post(ConfigChangeEvent::class_lifecycle(
                ConfigChangeType::ConfigUnregistered,
                class.clone(),
            ));
        }
        removed
    }

    /// Returns the subject kind a class is registered for.
    pub fn subject_kind(&self, class: &ConfigClass) -> Option<SubjectKind> {
        self.classes.read().get(class).copied()
    }

    /// Validates and stores a document, then notifies listeners.
    ///
    /// Returns `ConfigAdded` for a new (subject, class) pair and
    /// `ConfigUpdated` otherwise.
    pub fn apply_config(
        &self,
        subject: ConfigSubject,
        class: ConfigClass,
        node: Value,
    ) -> Result<ConfigChangeType, ConfigError> {
        self.validate(&subject, &class, &node)?;

        let previous = self
            .configs
            .write()
            .insert((subject.clone(), class.clone()), node);

        let change_type = if previous.is_some() {
            ConfigChangeType::ConfigUpdated
        } else {
            ConfigChangeType::ConfigAdded
        };

        info!(subject = %subject, class = %class, change_type = %change_type, "Configuration applied");
        self.post(ConfigChangeEvent::new(change_type, subject, class));
        Ok(change_type)
    }

    /// Removes a document, notifying listeners if one existed.
    pub fn remove_config(&self, subject: &ConfigSubject, class: &ConfigClass) -> bool {
        let removed = self
            .configs
            .write()
            .remove(&(subject.clone(), class.clone()))
            .is_some();

        if removed {
            info!(subject = %subject, class = %class, "Configuration removed");
            self.post(ConfigChangeEvent::new(
                ConfigChangeType::ConfigRemoved,
                subject.clone(),
                class.clone(),
            ));
        }
        removed
    }

    /// Makes the store hold exactly `entries`.
    ///
    /// New and changed documents are applied, identical ones are skipped, and
    /// stored documents missing from `entries` are removed. Invalid entries
    /// are logged and counted; they do not stop the pass.
    pub fn sync(&self, entries: Vec<ConfigEntry>) -> SyncSummary {
        let mut summary = SyncSummary::default();
        let mut wanted = BTreeSet::new();

        for entry in entries {
            wanted.insert((entry.subject.clone(), entry.class.clone()));

            let current = self.get_config(&entry.subject, &entry.class);
            if current.as_ref() == Some(&entry.node) {
                summary.unchanged += 1;
                continue;
            }

            let subject = entry.subject.to_string();
            match self.apply_config(entry.subject, entry.class, entry.node) {
                Ok(ConfigChangeType::ConfigAdded) => summary.added += 1,
                Ok(_) => summary.updated += 1,
                Err(e) => {
                    warn!(subject = %subject, error = %e, "Rejected configuration entry");
                    summary.rejected += 1;
                }
            }
        }

        let stale: Vec<ConfigKey> = self
            .configs
            .read()
            .keys()
            .filter(|key| !wanted.contains(*key))
            .cloned()
            .collect();

        for (subject, class) in stale {
            if self.remove_config(&subject, &class) {
                summary.removed += 1;
            }
        }

        summary
    }

    /// Returns every stored (subject, class) pair.
    pub fn keys(&self) -> Vec<(ConfigSubject, ConfigClass)> {
        self.configs.read().keys().cloned().collect()
    }

    fn validate(
        &self,
        subject: &ConfigSubject,
        class: &ConfigClass,
        node: &Value,
    ) -> Result<(), ConfigError> {
        let Some(kind) = self.subject_kind(class) else {
            return Err(ConfigError::UnknownClass(class.to_string()));
        };
        if subject.kind() != kind {
            return Err(ConfigError::WrongSubject {
                class: class.clone(),
                subject: subject.to_string(),
            });
        }

        let valid = if *class == BandwidthCapacityConfig::CLASS {
            BandwidthCapacityConfig::from_node(subject, node.clone())?.is_valid()
        } else if *class == SegmentRoutingAppConfig::CLASS {
            SegmentRoutingAppConfig::from_node(subject, node.clone())?.is_valid()
        } else {
            node.is_object()
        };

        if !valid {
            return Err(ConfigError::Invalid {
                class: class.clone(),
                subject: subject.to_string(),
            });
        }
        Ok(())
    }

    fn post(&self, event: ConfigChangeEvent) {
        let listeners: Vec<_> = self.listeners.read().clone();
        for listener in listeners {
            if listener.is_relevant(&event) {
                listener.event(event.clone());
            }
        }
    }
}

impl Default for NetworkConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for NetworkConfigStore {
    fn get_config(&self, subject: &ConfigSubject, class: &ConfigClass) -> Option<Value> {
        self.configs
            .read()
            .get(&(subject.clone(), class.clone()))
            .cloned()
    }
}
