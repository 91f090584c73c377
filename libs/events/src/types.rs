//! Change types, configuration classes and subjects.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use netres_id::{ApplicationId, ConnectPoint, DeviceId};
use serde::{Deserialize, Serialize};

use crate::EventError;

// =============================================================================
// Change Types
// =============================================================================

/// Kind of change a configuration event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigChangeType {
    /// A document was added for a subject.
    ConfigAdded,
    /// An existing document was replaced.
    ConfigUpdated,
    /// A document was removed.
    ConfigRemoved,
    /// A configuration class was registered with the source.
    ConfigRegistered,
    /// A configuration class was unregistered from the source.
    ConfigUnregistered,
}

impl ConfigChangeType {
    /// Returns true for changes to a subject's document.
    ///
    /// `ConfigRegistered` and `ConfigUnregistered` describe the schema, not
    /// any subject's data.
    pub fn is_document_change(&self) -> bool {
        matches!(
            self,
            Self::ConfigAdded | Self::ConfigUpdated | Self::ConfigRemoved
        )
    }

    /// Returns the wire name (e.g. `CONFIG_ADDED`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigAdded => "CONFIG_ADDED",
            Self::ConfigUpdated => "CONFIG_UPDATED",
            Self::ConfigRemoved => "CONFIG_REMOVED",
            Self::ConfigRegistered => "CONFIG_REGISTERED",
            Self::ConfigUnregistered => "CONFIG_UNREGISTERED",
        }
    }
}

impl fmt::Display for ConfigChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigChangeType {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFIG_ADDED" => Ok(Self::ConfigAdded),
            "CONFIG_UPDATED" => Ok(Self::ConfigUpdated),
            "CONFIG_REMOVED" => Ok(Self::ConfigRemoved),
            "CONFIG_REGISTERED" => Ok(Self::ConfigRegistered),
            "CONFIG_UNREGISTERED" => Ok(Self::ConfigUnregistered),
            other => Err(EventError::UnknownChangeType(other.to_string())),
        }
    }
}

// =============================================================================
// Configuration Classes
// =============================================================================

/// Tag naming a configuration class, equal to its key in network-config
/// documents.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigClass(Cow<'static, str>);

impl ConfigClass {
    /// Per-port bandwidth capacity.
    pub const BANDWIDTH_CAPACITY: ConfigClass = ConfigClass::from_static("bandwidthCapacity");

    /// Segment routing application settings.
    pub const SEGMENT_ROUTING_APP: ConfigClass = ConfigClass::from_static("segmentrouting");

    /// Creates a class tag from a static string.
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// Creates a class tag from an owned key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    /// Returns the configuration key.
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Subjects
// =============================================================================

/// The entity a configuration document is attached to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ConfigSubject {
    /// A device port.
    ConnectPoint(ConnectPoint),
    /// A whole device.
    Device(DeviceId),
    /// An application.
    Application(ApplicationId),
    /// A configuration key; subject of class registration notifications.
    ConfigKey(String),
}

impl ConfigSubject {
    /// Returns the connect point if this subject is one.
    pub fn connect_point(&self) -> Option<&ConnectPoint> {
        match self {
            Self::ConnectPoint(cp) => Some(cp),
            _ => None,
        }
    }

    /// Returns the subject kind.
    pub fn kind(&self) -> SubjectKind {
        match self {
            Self::ConnectPoint(_) => SubjectKind::Port,
            Self::Device(_) => SubjectKind::Device,
            Self::Application(_) => SubjectKind::App,
            Self::ConfigKey(_) => SubjectKind::ConfigKey,
        }
    }
}

impl fmt::Display for ConfigSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectPoint(cp) => write!(f, "{cp}"),
            Self::Device(id) => write!(f, "{id}"),
            Self::Application(id) => write!(f, "{id}"),
            Self::ConfigKey(key) => write!(f, "{key}"),
        }
    }
}

impl From<ConnectPoint> for ConfigSubject {
    fn from(cp: ConnectPoint) -> Self {
        Self::ConnectPoint(cp)
    }
}

impl From<DeviceId> for ConfigSubject {
    fn from(id: DeviceId) -> Self {
        Self::Device(id)
    }
}

impl From<ApplicationId> for ConfigSubject {
    fn from(id: ApplicationId) -> Self {
        Self::Application(id)
    }
}

/// Subject families, matching the top-level sections of a network-config
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    /// `ports`
    Port,
    /// `devices`
    Device,
    /// `apps`
    App,
    /// Not addressable from documents.
    ConfigKey,
}

impl SubjectKind {
    /// Returns the document section holding subjects of this kind.
    pub fn section(&self) -> Option<&'static str> {
        match self {
            Self::Port => Some("ports"),
            Self::Device => Some("devices"),
            Self::App => Some("apps"),
            Self::ConfigKey => None,
        }
    }

    /// Parses a subject key of this kind.
    pub fn parse_subject(&self, s: &str) -> Result<ConfigSubject, EventError> {
        let invalid = |reason: String| EventError::InvalidSubject {
            subject: s.to_string(),
            reason,
        };

        match self {
            Self::Port => s
                .parse()
                .map(ConfigSubject::ConnectPoint)
                .map_err(|e| invalid(e.to_string())),
            Self::Device => s
                .parse()
                .map(ConfigSubject::Device)
                .map_err(|e| invalid(e.to_string())),
            Self::App => s
                .parse()
                .map(ConfigSubject::Application)
                .map_err(|e| invalid(e.to_string())),
            Self::ConfigKey => Ok(ConfigSubject::ConfigKey(s.to_string())),
        }
    }
}
