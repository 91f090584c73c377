//! # netres-events
//!
//! Configuration change notifications.
//!
//! A configuration source emits a [`ConfigChangeEvent`] whenever a document
//! keyed by (subject, configuration class) is added, updated or removed, and
//! when a configuration class itself is registered or unregistered.
//!
//! Events carry no document payload. Consumers re-read the current document
//! from the source when they handle the event, so a burst of events for one
//! subject converges on the latest document.

mod error;
mod event;
mod types;

pub use error::EventError;
pub use event::ConfigChangeEvent;
pub use types::*;
