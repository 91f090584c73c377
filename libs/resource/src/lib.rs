//! # netres-resource
//!
//! The continuous resource model and the registry contract consumed by
//! reconciliation.
//!
//! A registry only offers `register` and `unregister`, each answering with a
//! success flag. It has no atomic replace; [`ResourceAdmin::replace_resources`]
//! emulates one with an unregister followed by a register.

mod model;
mod registry;
mod store;

pub use model::{Bandwidth, ContinuousResourceSpec, ResourceKey, ResourceType};
pub use registry::{ReplaceOutcome, ResourceAdmin};
pub use store::InMemoryResourceStore;
