//! Bandwidth capacity reconciliation service.
//!
//! Listens to a [`NetworkConfigStore`](netres_netcfg::NetworkConfigStore)
//! for `bandwidthCapacity` documents on ports and keeps a resource registry
//! holding the declared capacity for each port. Work is handed off to a
//! bounded [`DispatchPool`] so configuration delivery never waits on the
//! registry.

pub mod config;
pub mod dispatch;
pub mod handler;
pub mod listener;
pub mod logging;
pub mod manager;
pub mod sync;

pub use config::Config;
pub use dispatch::{DispatchConfig, DispatchPool, DispatchStats};
pub use handler::BandwidthCapacityHandler;
pub use listener::{is_relevant, ResourceConfigListener, RELEVANT_CLASSES};
pub use manager::ResourceManager;
pub use sync::{report_convergence, run_sync_loop, sync_file, ConvergenceReport};
