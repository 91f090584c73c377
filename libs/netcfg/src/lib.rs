//! # netres-netcfg
//!
//! Network configuration: typed documents, the source/listener contracts
//! consumed by reconciliation, and an in-memory store that emits change
//! events.
//!
//! ## Documents
//!
//! Documents are JSON objects keyed by (subject, configuration class).
//! Typed views ([`BandwidthCapacityConfig`], [`SegmentRoutingAppConfig`])
//! read and rewrite the underlying object and expose an `is_valid` check.
//!
//! ## Network-config files
//!
//! ```json
//! {
//!   "ports": { "of:1/1": { "bandwidthCapacity": { "capacityMbps": 1000 } } },
//!   "apps": { "org.onosproject.segmentrouting": { "segmentrouting": { "vRouterId": "of:1" } } }
//! }
//! ```

mod bandwidth;
mod document;
mod error;
mod loader;
mod segment_routing;
mod source;
mod store;

pub use bandwidth::BandwidthCapacityConfig;
pub use document::NetworkConfig;
pub use error::ConfigError;
pub use loader::{parse_network_config, read_network_config, ConfigEntry};
pub use segment_routing::SegmentRoutingAppConfig;
pub use source::{typed_config, ConfigListener, ConfigSource};
pub use store::{NetworkConfigStore, SyncSummary};
