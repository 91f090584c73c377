//! Identifier definitions for network locations and applications.

use std::fmt;
use std::str::FromStr;

use crate::{define_name_id, impl_serde_via_str, IdError};

// =============================================================================
// Devices and Applications
// =============================================================================

fn validate_device(s: &str) -> Result<(), IdError> {
    let Some((scheme, rest)) = s.split_once(':') else {
        return Err(IdError::MissingSeparator {
            separator: ':',
            input: s.to_string(),
        });
    };

    if scheme.is_empty() || rest.is_empty() || s.contains('/') || s.contains(char::is_whitespace)
    {
        return Err(IdError::InvalidDevice(s.to_string()));
    }

    Ok(())
}

fn validate_application(s: &str) -> Result<(), IdError> {
    let well_formed = s
        .split('.')
        .all(|segment| !segment.is_empty() && !segment.contains(char::is_whitespace));

    if !well_formed {
        return Err(IdError::InvalidFormat {
            message: format!("application id '{s}' must be a dotted name"),
        });
    }

    Ok(())
}

define_name_id!(
    /// Identifies an infrastructure device, e.g. `of:0000000000000001`.
    DeviceId,
    validate_device
);

define_name_id!(
    /// Identifies an application that owns configuration, e.g.
    /// `org.onosproject.segmentrouting`.
    ApplicationId,
    validate_application
);

impl DeviceId {
    /// Returns the URI scheme portion (`of` in `of:1`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.split_once(':').map(|(scheme, _)| scheme).unwrap_or("")
    }
}

// =============================================================================
// Ports and Connect Points
// =============================================================================

/// Port number on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortNumber(u64);

impl PortNumber {
    /// Creates a port number from a raw value.
    #[must_use]
    pub const fn new(port: u64) -> Self {
        Self(port)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PortNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PortNumber {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| IdError::InvalidPort(s.to_string()))
    }
}

impl From<u64> for PortNumber {
    fn from(port: u64) -> Self {
        Self(port)
    }
}

impl_serde_via_str!(PortNumber);

/// A (device, port) pair identifying a network attachment location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectPoint {
    device_id: DeviceId,
    port: PortNumber,
}

impl ConnectPoint {
    /// Creates a connect point.
    #[must_use]
    pub fn new(device_id: DeviceId, port: PortNumber) -> Self {
        Self { device_id, port }
    }

    /// Returns the device this connect point belongs to.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the port number.
    #[must_use]
    pub fn port(&self) -> PortNumber {
        self.port
    }
}

impl fmt::Display for ConnectPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_id, self.port)
    }
}

impl FromStr for ConnectPoint {
    type Err = IdError;

    /// Parses `device/port`, splitting on the last `/`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        let Some((device, port)) = s.rsplit_once('/') else {
            return Err(IdError::MissingSeparator {
                separator: '/',
                input: s.to_string(),
            });
        };

        Ok(Self {
            device_id: device.parse()?,
            port: port.parse()?,
        })
    }
}

impl_serde_via_str!(ConnectPoint);

// =============================================================================
// MAC Addresses
// =============================================================================

/// A 48-bit Ethernet MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Creates a MAC address from raw octets.
    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Returns the raw octets.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts
                .next()
                .filter(|p| p.len() == 2)
                .ok_or_else(|| IdError::InvalidMac(s.to_string()))?;
            *octet =
                u8::from_str_radix(part, 16).map_err(|_| IdError::InvalidMac(s.to_string()))?;
        }

        if parts.next().is_some() {
            return Err(IdError::InvalidMac(s.to_string()));
        }

        Ok(Self(octets))
    }
}

impl_serde_via_str!(MacAddress);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_device_id_parse() {
        let id: DeviceId = "of:0000000000000001".parse().unwrap();
        assert_eq!(id.scheme(), "of");
        assert_eq!(id.as_str(), "of:0000000000000001");
    }

    #[test]
    fn test_device_id_missing_scheme() {
        let result: Result<DeviceId, _> = "switch1".parse();
        assert!(matches!(
            result.unwrap_err(),
            IdError::MissingSeparator { separator: ':', .. }
        ));
    }

    #[test]
    fn test_device_id_empty_halves() {
        assert!(matches!(
            "of:".parse::<DeviceId>().unwrap_err(),
            IdError::InvalidDevice(_)
        ));
        assert!(matches!(
            ":1".parse::<DeviceId>().unwrap_err(),
            IdError::InvalidDevice(_)
        ));
    }

    #[test]
    fn test_device_id_empty() {
        let result: Result<DeviceId, _> = "".parse();
        assert!(result.unwrap_err().is_empty());
    }

    #[test]
    fn test_connect_point_parse() {
        let cp: ConnectPoint = "of:1/1".parse().unwrap();
        assert_eq!(cp.device_id().as_str(), "of:1");
        assert_eq!(cp.port(), PortNumber::new(1));
        assert_eq!(cp.to_string(), "of:1/1");
    }

    #[test]
    fn test_connect_point_invalid_port() {
        let result: Result<ConnectPoint, _> = "of:1/eth0".parse();
        assert!(matches!(result.unwrap_err(), IdError::InvalidPort(_)));
    }

    #[test]
    fn test_connect_point_missing_port() {
        let result: Result<ConnectPoint, _> = "of:1".parse();
        assert!(matches!(
            result.unwrap_err(),
            IdError::MissingSeparator { separator: '/', .. }
        ));
    }

    #[test]
    fn test_connect_point_json() {
        let cp: ConnectPoint = "of:1/2".parse().unwrap();
        let json = serde_json::to_string(&cp).unwrap();
        assert_eq!(json, "\"of:1/2\"");
        let parsed: ConnectPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(cp, parsed);
    }

    #[test]
    fn test_mac_address_parse() {
        let mac: MacAddress = "00:00:00:00:00:01".parse().unwrap();
        assert_eq!(mac.octets(), [0, 0, 0, 0, 0, 1]);
        assert_eq!(mac.to_string(), "00:00:00:00:00:01");

        let upper: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert_eq!(upper.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn test_mac_address_invalid() {
        for input in [
            "00:00:00:00:00",
            "00:00:00:00:00:01:02",
            "0:00:00:00:00:01",
            "zz:00:00:00:00:01",
            "00-00-00-00-00-01",
        ] {
            assert!(
                matches!(input.parse::<MacAddress>(), Err(IdError::InvalidMac(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_application_id() {
        let app: ApplicationId = "org.onosproject.segmentrouting".parse().unwrap();
        assert_eq!(app.to_string(), "org.onosproject.segmentrouting");

        assert!("org..segmentrouting".parse::<ApplicationId>().is_err());
        assert!("org.onos project".parse::<ApplicationId>().is_err());
    }

    proptest! {
        #[test]
        fn prop_connect_point_parse_is_canonical(
            scheme in "[a-z]{1,6}",
            ident in "[0-9a-f]{1,16}",
            port in any::<u64>(),
        ) {
            let text = format!("{scheme}:{ident}/{port}");
            let cp: ConnectPoint = text.parse().unwrap();
            prop_assert_eq!(cp.to_string(), text);
        }

        #[test]
        fn prop_mac_parse_never_panics(input in "\\PC{0,24}") {
            let _ = input.parse::<MacAddress>();
        }
    }
}
