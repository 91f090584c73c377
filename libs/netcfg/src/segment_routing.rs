//! Segment routing application configuration.

use std::collections::BTreeSet;

use netres_events::{ConfigClass, ConfigSubject};
use netres_id::{ApplicationId, ConnectPoint, DeviceId, MacAddress};
use serde_json::Value;

use crate::document::ConfigNode;
use crate::{ConfigError, NetworkConfig};

const VROUTER_MACS: &str = "vRouterMacs";
const VROUTER_ID: &str = "vRouterId";
const SUPPRESS_SUBNET: &str = "suppressSubnet";
const SUPPRESS_HOST: &str = "suppressHost";

const FIELDS: &[&str] = &[VROUTER_MACS, VROUTER_ID, SUPPRESS_SUBNET, SUPPRESS_HOST];

/// Application-level settings for segment routing.
///
/// ```json
/// {
///   "vRouterMacs": ["00:00:00:00:00:01", "00:00:00:00:00:02"],
///   "vRouterId": "of:1",
///   "suppressSubnet": ["of:1/1", "of:1/2"],
///   "suppressHost": ["of:1/1", "of:1/2"]
/// }
/// ```
///
/// Getters return `None` when the field is absent or malformed.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRoutingAppConfig {
    subject: ApplicationId,
    node: ConfigNode,
}

impl SegmentRoutingAppConfig {
    /// The application this document configures.
    pub fn subject(&self) -> &ApplicationId {
        &self.subject
    }

    /// MAC addresses of the virtual router.
    pub fn v_router_macs(&self) -> Option<BTreeSet<MacAddress>> {
        self.node.parsed_set(VROUTER_MACS).into_option()
    }

    /// Replaces the virtual router MAC addresses.
    pub fn set_v_router_macs(&mut self, macs: &BTreeSet<MacAddress>) -> &mut Self {
        self.node.set_strings(VROUTER_MACS, macs);
        self
    }

    /// Device hosting the virtual router.
    pub fn v_router_id(&self) -> Option<DeviceId> {
        self.node.parsed(VROUTER_ID).into_option()
    }

    /// Sets or clears the virtual router device.
    pub fn set_v_router_id(&mut self, device_id: Option<&DeviceId>) -> &mut Self {
        match device_id {
            Some(id) => self.node.set(VROUTER_ID, Value::String(id.to_string())),
            None => self.node.remove(VROUTER_ID),
        }
        self
    }

    /// Connect points whose subnets are not programmed.
    pub fn suppress_subnet(&self) -> Option<BTreeSet<ConnectPoint>> {
        self.node.parsed_set(SUPPRESS_SUBNET).into_option()
    }

    /// Replaces the suppressed-subnet connect points.
    pub fn set_suppress_subnet(&mut self, points: &BTreeSet<ConnectPoint>) -> &mut Self {
        self.node.set_strings(SUPPRESS_SUBNET, points);
        self
    }

    /// Connect points on which hosts are not learned.
    pub fn suppress_host(&self) -> Option<BTreeSet<ConnectPoint>> {
        self.node.parsed_set(SUPPRESS_HOST).into_option()
    }

    /// Replaces the suppressed-host connect points.
    pub fn set_suppress_host(&mut self, points: &BTreeSet<ConnectPoint>) -> &mut Self {
        self.node.set_strings(SUPPRESS_HOST, points);
        self
    }
}

impl NetworkConfig for SegmentRoutingAppConfig {
    const CLASS: ConfigClass = ConfigClass::SEGMENT_ROUTING_APP;

    fn from_node(subject: &ConfigSubject, node: Value) -> Result<Self, ConfigError> {
        let ConfigSubject::Application(app) = subject else {
            return Err(ConfigError::WrongSubject {
                class: Self::CLASS,
                subject: subject.to_string(),
            });
        };

        Ok(Self {
            subject: app.clone(),
            node: ConfigNode::from_value(&Self::CLASS, node)?,
        })
    }

    fn node(&self) -> Value {
        self.node.to_value()
    }

    fn is_valid(&self) -> bool {
        self.node.has_only_fields(FIELDS)
            && !self.node.parsed_set::<MacAddress>(VROUTER_MACS).is_malformed()
            && !self.node.parsed::<DeviceId>(VROUTER_ID).is_malformed()
            && !self
                .node
                .parsed_set::<ConnectPoint>(SUPPRESS_SUBNET)
                .is_malformed()
            && !self
                .node
                .parsed_set::<ConnectPoint>(SUPPRESS_HOST)
                .is_malformed()
    }
}
