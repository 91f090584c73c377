//! Resource keys, quantities and specs.

use std::fmt;

use netres_id::{ConnectPoint, DeviceId, PortNumber};
use serde::{Deserialize, Serialize};

/// Kind of continuous resource tracked at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// Link bandwidth, measured in bits per second.
    Bandwidth,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bandwidth => f.write_str("Bandwidth"),
        }
    }
}

/// Identifies a resource kind at a device port.
///
/// Used both as the registry key and to correlate with the connect point a
/// configuration document is attached to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub device_id: DeviceId,
    pub port: PortNumber,
    pub resource_type: ResourceType,
}

impl ResourceKey {
    /// Creates a key.
    pub fn new(device_id: DeviceId, port: PortNumber, resource_type: ResourceType) -> Self {
        Self {
            device_id,
            port,
            resource_type,
        }
    }

    /// The bandwidth key for a connect point.
    pub fn bandwidth(cp: &ConnectPoint) -> Self {
        Self::new(cp.device_id().clone(), cp.port(), ResourceType::Bandwidth)
    }

    /// Returns the connect point this key lives on.
    pub fn connect_point(&self) -> ConnectPoint {
        ConnectPoint::new(self.device_id.clone(), self.port)
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.device_id, self.port, self.resource_type)
    }
}

/// Bandwidth quantity in bits per second.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Bandwidth(u64);

impl Bandwidth {
    /// Zero bandwidth.
    pub const ZERO: Bandwidth = Bandwidth(0);

    /// Creates a bandwidth from bits per second.
    pub const fn bps(bps: u64) -> Self {
        Self(bps)
    }

    /// Creates a bandwidth from megabits per second, saturating on overflow.
    pub const fn mbps(mbps: u64) -> Self {
        Self(mbps.saturating_mul(1_000_000))
    }

    /// Creates a bandwidth from fractional megabits per second.
    ///
    /// Returns `None` for negative or non-finite input.
    pub fn from_mbps_f64(mbps: f64) -> Option<Self> {
        if !mbps.is_finite() || mbps < 0.0 {
            return None;
        }
        Some(Self((mbps * 1_000_000.0).round() as u64))
    }

    /// Returns the value in bits per second.
    pub const fn as_bps(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.0)
    }
}

/// A request to register or unregister capacity at a key.
///
/// Two specs with the same key and different capacities are distinct
/// requests; the registry has no notion of the same resource across
/// capacity changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContinuousResourceSpec {
    pub key: ResourceKey,
    pub capacity: u64,
}

impl ContinuousResourceSpec {
    /// Creates a spec with the given capacity.
    pub fn new(key: ResourceKey, capacity: u64) -> Self {
        Self { key, capacity }
    }

    /// Bandwidth spec for a connect point.
    pub fn bandwidth(cp: &ConnectPoint, capacity: Bandwidth) -> Self {
        Self::new(ResourceKey::bandwidth(cp), capacity.as_bps())
    }

    /// Zero-capacity spec for unregistering; registries key unregister on
    /// identity and ignore the capacity.
    pub fn placeholder(key: ResourceKey) -> Self {
        Self::new(key, 0)
    }
}

impl fmt::Display for ContinuousResourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.capacity)
    }
}
