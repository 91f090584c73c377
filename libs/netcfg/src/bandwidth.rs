//! Per-port bandwidth capacity configuration.

use netres_events::{ConfigClass, ConfigSubject};
use netres_id::ConnectPoint;
use netres_resource::Bandwidth;
use serde_json::{json, Value};

use crate::document::ConfigNode;
use crate::{ConfigError, NetworkConfig};

const CAPACITY: &str = "capacityMbps";

/// Declared bandwidth capacity of a connect point.
///
/// ```json
/// { "capacityMbps": 1000 }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthCapacityConfig {
    subject: ConnectPoint,
    node: ConfigNode,
}

impl BandwidthCapacityConfig {
    /// Creates a document declaring `capacity` for `subject`.
    pub fn new(subject: ConnectPoint, capacity: Bandwidth) -> Self {
        let mut config = Self {
            subject,
            node: ConfigNode::default(),
        };
        config.set_capacity(capacity);
        config
    }

    /// The connect point this document configures.
    pub fn subject(&self) -> &ConnectPoint {
        &self.subject
    }

    /// Declared capacity, or `None` if absent, negative or not a number.
    pub fn capacity(&self) -> Option<Bandwidth> {
        self.node
            .get(CAPACITY)
            .and_then(Value::as_f64)
            .and_then(Bandwidth::from_mbps_f64)
    }

    /// Sets the declared capacity.
    pub fn set_capacity(&mut self, capacity: Bandwidth) -> &mut Self {
        let bps = capacity.as_bps();
        let value = if bps % 1_000_000 == 0 {
            json!(bps / 1_000_000)
        } else {
            json!(bps as f64 / 1_000_000.0)
        };
        self.node.set(CAPACITY, value);
        self
    }
}

impl NetworkConfig for BandwidthCapacityConfig {
    const CLASS: ConfigClass = ConfigClass::BANDWIDTH_CAPACITY;

    fn from_node(subject: &ConfigSubject, node: Value) -> Result<Self, ConfigError> {
        let Some(cp) = subject.connect_point() else {
            return Err(ConfigError::WrongSubject {
                class: Self::CLASS,
                subject: subject.to_string(),
            });
        };

        Ok(Self {
            subject: cp.clone(),
            node: ConfigNode::from_value(&Self::CLASS, node)?,
        })
    }

    fn node(&self) -> Value {
        self.node.to_value()
    }

    fn is_valid(&self) -> bool {
        self.node.has_only_fields(&[CAPACITY]) && self.capacity().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netres_id::ApplicationId;

    fn subject() -> ConfigSubject {
        ConfigSubject::ConnectPoint("of:1/1".parse().unwrap())
    }

    #[test]
    fn test_capacity_in_mbps() {
        let config =
            BandwidthCapacityConfig::from_node(&subject(), json!({"capacityMbps": 1})).unwrap();
        assert_eq!(config.capacity(), Some(Bandwidth::bps(1_000_000)));
        assert!(config.is_valid());
    }

    #[test]
    fn test_fractional_capacity() {
        let config =
            BandwidthCapacityConfig::from_node(&subject(), json!({"capacityMbps": 0.5})).unwrap();
        assert_eq!(config.capacity(), Some(Bandwidth::bps(500_000)));
    }

    #[test]
    fn test_set_capacity_roundtrips_through_node() {
        let cp: ConnectPoint = "of:1/1".parse().unwrap();
        let mut config = BandwidthCapacityConfig::new(cp, Bandwidth::mbps(2));
        assert_eq!(config.node(), json!({"capacityMbps": 2}));

        config.set_capacity(Bandwidth::bps(1_500_000));
        assert_eq!(config.capacity(), Some(Bandwidth::bps(1_500_000)));
    }

    #[test]
    fn test_invalid_documents() {
        for node in [
            json!({}),
            json!({"capacityMbps": -5}),
            json!({"capacityMbps": "fast"}),
            json!({"capacityMbps": 10, "extra": true}),
        ] {
            let config = BandwidthCapacityConfig::from_node(&subject(), node.clone()).unwrap();
            assert!(!config.is_valid(), "{node} should be invalid");
        }
    }

    #[test]
    fn test_wrong_subject() {
        let app: ApplicationId = "org.example.app".parse().unwrap();
        let result =
            BandwidthCapacityConfig::from_node(&ConfigSubject::Application(app), json!({}));
        assert!(matches!(result, Err(ConfigError::WrongSubject { .. })));
    }
}
