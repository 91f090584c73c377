//! The configuration change event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConfigChangeType, ConfigClass, ConfigSubject};

/// Notification that configuration for a subject changed.
///
/// Transient: created by a configuration source and consumed once by each
/// interested listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigChangeEvent {
    /// What happened.
    pub change_type: ConfigChangeType,

    /// The entity whose configuration changed.
    pub subject: ConfigSubject,

    /// The configuration class of the changed document.
    pub config_class: ConfigClass,

    /// When the source observed the change.
    pub occurred_at: DateTime<Utc>,
}

impl ConfigChangeEvent {
    /// Creates an event stamped with the current time.
    pub fn new(
        change_type: ConfigChangeType,
        subject: impl Into<ConfigSubject>,
        config_class: ConfigClass,
    ) -> Self {
        Self {
            change_type,
            subject: subject.into(),
            config_class,
            occurred_at: Utc::now(),
        }
    }

    /// Creates a class lifecycle event (`ConfigRegistered`/`ConfigUnregistered`).
    pub fn class_lifecycle(change_type: ConfigChangeType, config_class: ConfigClass) -> Self {
        let subject = ConfigSubject::ConfigKey(config_class.key().to_string());
        Self::new(change_type, subject, config_class)
    }
}

impl std::fmt::Display for ConfigChangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} for {}",
            self.change_type, self.config_class, self.subject
        )
    }
}
