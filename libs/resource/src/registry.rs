//! The resource registry contract.

use std::sync::Arc;

use crate::ContinuousResourceSpec;

/// Administrative interface to a resource registry.
///
/// Calls are synchronous and may block on the registry's own storage or
/// consensus. Implementations provide their own concurrency control.
pub trait ResourceAdmin: Send + Sync {
    /// Registers capacity at the spec's key. Returns false on failure,
    /// including when the key already holds a resource.
    fn register_resources(&self, spec: &ContinuousResourceSpec) -> bool;

    /// Unregisters whatever is registered at the spec's key. The spec's
    /// capacity is ignored. Returns false on failure.
    fn unregister_resources(&self, spec: &ContinuousResourceSpec) -> bool;

    /// Replaces the capacity registered at the spec's key.
    ///
    /// The default is not atomic: it unregisters, then registers, and always
    /// attempts both. Between the two calls the key is unregistered, and a
    /// failed register leaves it that way. Registries that support an atomic
    /// replace should override this.
    fn replace_resources(&self, spec: &ContinuousResourceSpec) -> ReplaceOutcome {
        let placeholder = ContinuousResourceSpec::placeholder(spec.key.clone());
        let unregistered = self.unregister_resources(&placeholder);
        let registered = self.register_resources(spec);
        ReplaceOutcome {
            unregistered,
            registered,
        }
    }
}

impl<T: ResourceAdmin + ?Sized> ResourceAdmin for Arc<T> {
    fn register_resources(&self, spec: &ContinuousResourceSpec) -> bool {
        (**self).register_resources(spec)
    }

    fn unregister_resources(&self, spec: &ContinuousResourceSpec) -> bool {
        (**self).unregister_resources(spec)
    }

    fn replace_resources(&self, spec: &ContinuousResourceSpec) -> ReplaceOutcome {
        (**self).replace_resources(spec)
    }
}

/// Result of each step of a replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Whether the unregister step succeeded.
    pub unregistered: bool,

    /// Whether the register step succeeded.
    pub registered: bool,
}

impl ReplaceOutcome {
    /// Outcome of an atomic replace that succeeded.
    pub const REPLACED: ReplaceOutcome = ReplaceOutcome {
        unregistered: true,
        registered: true,
    };

    /// Returns true if the new capacity ended up registered.
    pub fn is_registered(&self) -> bool {
        self.registered
    }
}
