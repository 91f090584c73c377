//! # netres-id
//!
//! Typed identifiers for network locations and applications.
//!
//! ## Design Principles
//!
//! - Identifiers have one canonical string form with strict parsing
//! - Parse → format → parse is lossless
//! - Distinct types keep devices, connect points and applications apart
//!
//! ## Formats
//!
//! - `DeviceId`: `{scheme}:{identifier}`, e.g. `of:0000000000000001`
//! - `PortNumber`: unsigned decimal, e.g. `1`
//! - `ConnectPoint`: `{device}/{port}`, e.g. `of:1/1`
//! - `MacAddress`: six hex octets, e.g. `00:00:00:00:00:01`
//! - `ApplicationId`: dotted name, e.g. `org.onosproject.segmentrouting`

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;
