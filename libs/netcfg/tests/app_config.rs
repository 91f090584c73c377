//! Tests for the segment routing application document and file loading.

use std::collections::BTreeSet;
use std::path::PathBuf;

use netres_events::{ConfigClass, ConfigSubject};
use netres_id::{ConnectPoint, DeviceId, MacAddress};
use netres_netcfg::{
    read_network_config, typed_config, BandwidthCapacityConfig, ConfigSource, NetworkConfig,
    NetworkConfigStore, SegmentRoutingAppConfig,
};
use rstest::{fixture, rstest};

const APP_ID: &str = "org.onosproject.segmentrouting";

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load(name: &str) -> SegmentRoutingAppConfig {
    let raw = std::fs::read_to_string(fixture_path(name)).unwrap();
    let node = serde_json::from_str(&raw).unwrap();
    let subject = ConfigSubject::Application(APP_ID.parse().unwrap());
    SegmentRoutingAppConfig::from_node(&subject, node).unwrap()
}

fn mac(s: &str) -> MacAddress {
    s.parse().unwrap()
}

fn cp(s: &str) -> ConnectPoint {
    s.parse().unwrap()
}

#[fixture]
fn config() -> SegmentRoutingAppConfig {
    load("sr-app-config.json")
}

#[rstest]
fn test_is_valid(config: SegmentRoutingAppConfig) {
    assert!(config.is_valid());
    assert!(!load("sr-app-config-invalid.json").is_valid());
}

#[rstest]
fn test_v_router_macs(config: SegmentRoutingAppConfig) {
    let macs = config.v_router_macs().expect("vRouterMacs should be present");
    assert_eq!(macs.len(), 2);
    assert!(macs.contains(&mac("00:00:00:00:00:01")));
    assert!(macs.contains(&mac("00:00:00:00:00:02")));
}

#[rstest]
fn test_set_v_router_macs(mut config: SegmentRoutingAppConfig) {
    config.set_v_router_macs(&BTreeSet::from([mac("00:00:00:00:00:03")]));

    let macs = config.v_router_macs().unwrap();
    assert_eq!(macs.len(), 1);
    assert!(macs.contains(&mac("00:00:00:00:00:03")));
}

#[rstest]
fn test_v_router_id(mut config: SegmentRoutingAppConfig) {
    let of1: DeviceId = "of:1".parse().unwrap();
    assert_eq!(config.v_router_id(), Some(of1));

    let of2: DeviceId = "of:2".parse().unwrap();
    config.set_v_router_id(Some(&of2));
    assert_eq!(config.v_router_id(), Some(of2));
}

#[rstest]
fn test_suppress_subnet(mut config: SegmentRoutingAppConfig) {
    let points = config.suppress_subnet().unwrap();
    assert_eq!(points, BTreeSet::from([cp("of:1/1"), cp("of:1/2")]));

    config.set_suppress_subnet(&BTreeSet::from([cp("of:1/3")]));
    assert_eq!(
        config.suppress_subnet().unwrap(),
        BTreeSet::from([cp("of:1/3")])
    );
}

#[rstest]
fn test_suppress_host(mut config: SegmentRoutingAppConfig) {
    let points = config.suppress_host().unwrap();
    assert_eq!(points, BTreeSet::from([cp("of:1/1"), cp("of:1/2")]));

    config.set_suppress_host(&BTreeSet::from([cp("of:1/3")]));
    assert_eq!(config.suppress_host().unwrap(), BTreeSet::from([cp("of:1/3")]));
}

#[test]
fn test_invalid_fields_read_as_none() {
    let invalid = load("sr-app-config-invalid.json");
    assert!(invalid.suppress_subnet().is_none());
    assert!(invalid.suppress_host().is_none());
    assert_eq!(invalid.v_router_macs().map(|m| m.len()), Some(2));
}

#[test]
fn test_store_rejects_invalid_app_config() {
    let store = NetworkConfigStore::with_default_classes();
    let subject = ConfigSubject::Application(APP_ID.parse().unwrap());

    let invalid = load("sr-app-config-invalid.json").node();
    assert!(store
        .apply_config(subject.clone(), ConfigClass::SEGMENT_ROUTING_APP, invalid)
        .is_err());

    let valid = load("sr-app-config.json").node();
    store
        .apply_config(subject.clone(), ConfigClass::SEGMENT_ROUTING_APP, valid.clone())
        .unwrap();
    assert_eq!(
        store.get_config(&subject, &ConfigClass::SEGMENT_ROUTING_APP),
        Some(valid)
    );
}

#[test]
fn test_typed_config_from_store() {
    let store = NetworkConfigStore::with_default_classes();
    let subject = ConfigSubject::Application(APP_ID.parse().unwrap());
    assert!(typed_config::<SegmentRoutingAppConfig, _>(&store, &subject)
        .unwrap()
        .is_none());

    let node = load("sr-app-config.json").node();
    store
        .apply_config(subject.clone(), ConfigClass::SEGMENT_ROUTING_APP, node)
        .unwrap();

    let config: SegmentRoutingAppConfig = typed_config(&store, &subject).unwrap().unwrap();
    assert_eq!(config.v_router_id(), Some("of:1".parse().unwrap()));

    // Lookup through a trait object sees only the stored class.
    let source: &dyn ConfigSource = &store;
    assert!(typed_config::<BandwidthCapacityConfig, _>(source, &subject)
        .unwrap()
        .is_none());
}

#[test]
fn test_read_network_config_file() {
    let entries = read_network_config(&fixture_path("netcfg.json")).unwrap();
    assert_eq!(entries.len(), 3);

    let store = NetworkConfigStore::with_default_classes();
    let summary = store.sync(entries);
    assert_eq!(summary.added, 3);
    assert_eq!(summary.rejected, 0);

    let capacity = store
        .bandwidth_capacity(&cp("of:1/2"))
        .unwrap()
        .and_then(|c| c.capacity())
        .unwrap();
    assert_eq!(capacity.as_bps(), 2_000_000);
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_network_config(&dir.path().join("absent.json"));
    assert!(matches!(result, Err(netres_netcfg::ConfigError::Io(_))));
}
