//! Test doubles for resource registries.
//!
//! - [`RecordingAdmin`] wraps another registry and logs every call.
//! - [`ScriptedAdmin`] answers from a script of failures, succeeding
//!   otherwise, without holding any state.

use std::collections::VecDeque;

use netres_resource::{ContinuousResourceSpec, ResourceAdmin};
use parking_lot::Mutex;

/// A registry call observed by [`RecordingAdmin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Register(ContinuousResourceSpec),
    Unregister(ContinuousResourceSpec),
}

impl RegistryCall {
    /// Returns true for a register call.
    pub fn is_register(&self) -> bool {
        matches!(self, Self::Register(_))
    }

    /// Returns the spec passed to the call.
    pub fn spec(&self) -> &ContinuousResourceSpec {
        match self {
            Self::Register(spec) | Self::Unregister(spec) => spec,
        }
    }
}

/// Registry decorator that records calls before forwarding them.
///
/// Replace is not forwarded as a unit: the default unregister-then-register
/// sequence runs through this wrapper so both steps are recorded.
#[derive(Debug)]
pub struct RecordingAdmin<A> {
    inner: A,
    calls: Mutex<Vec<RegistryCall>>,
}

impl<A: ResourceAdmin> RecordingAdmin<A> {
    /// Wraps a registry.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the wrapped registry.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Returns the calls made so far, in order.
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().clone()
    }

    /// Returns the number of register calls.
    pub fn register_count(&self) -> usize {
        self.calls.lock().iter().filter(|c| c.is_register()).count()
    }

    /// Returns the number of unregister calls.
    pub fn unregister_count(&self) -> usize {
        self.calls.lock().iter().filter(|c| !c.is_register()).count()
    }

    /// Forgets recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl<A: ResourceAdmin> ResourceAdmin for RecordingAdmin<A> {
    fn register_resources(&self, spec: &ContinuousResourceSpec) -> bool {
        self.calls.lock().push(RegistryCall::Register(spec.clone()));
        self.inner.register_resources(spec)
    }

    fn unregister_resources(&self, spec: &ContinuousResourceSpec) -> bool {
        self.calls.lock().push(RegistryCall::Unregister(spec.clone()));
        self.inner.unregister_resources(spec)
    }
}

/// Stateless registry that fails the next scripted calls.
#[derive(Debug, Default)]
pub struct ScriptedAdmin {
    registers: Mutex<VecDeque<bool>>,
    unregisters: Mutex<VecDeque<bool>>,
}

impl ScriptedAdmin {
    /// Creates a registry where every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues results for upcoming register calls.
    pub fn with_registers(self, results: impl IntoIterator<Item = bool>) -> Self {
        self.registers.lock().extend(results);
        self
    }

    /// Queues results for upcoming unregister calls.
    pub fn with_unregisters(self, results: impl IntoIterator<Item = bool>) -> Self {
        self.unregisters.lock().extend(results);
        self
    }
}

impl ResourceAdmin for ScriptedAdmin {
    fn register_resources(&self, _spec: &ContinuousResourceSpec) -> bool {
        self.registers.lock().pop_front().unwrap_or(true)
    }

    fn unregister_resources(&self, _spec: &ContinuousResourceSpec) -> bool {
        self.unregisters.lock().pop_front().unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netres_id::ConnectPoint;
    use netres_resource::Bandwidth;

    fn spec() -> ContinuousResourceSpec {
        let cp: ConnectPoint = "of:1/1".parse().unwrap();
        ContinuousResourceSpec::bandwidth(&cp, Bandwidth::mbps(1))
    }

    #[test]
    fn test_scripted_results() {
        let admin = ScriptedAdmin::new()
            .with_registers([false])
            .with_unregisters([false, true]);

        assert!(!admin.register_resources(&spec()));
        assert!(admin.register_resources(&spec()));
        assert!(!admin.unregister_resources(&spec()));
        assert!(admin.unregister_resources(&spec()));
    }

    #[test]
    fn test_recording_replace_records_both_steps() {
        let admin = RecordingAdmin::new(ScriptedAdmin::new().with_unregisters([false]));
        let outcome = admin.replace_resources(&spec());

        assert!(!outcome.unregistered);
        assert!(outcome.registered);

        let calls = admin.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls[0].is_register());
        assert_eq!(calls[0].spec().capacity, 0);
        assert_eq!(calls[1], RegistryCall::Register(spec()));
    }
}
