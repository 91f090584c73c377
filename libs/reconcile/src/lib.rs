//! Reconciliation primitives.
//!
//! This library provides helpers for bringing a resource registry into
//! agreement with declared configuration. Key concepts:
//!
//! - **Declared state**: the capacity in the latest configuration document.
//! - **Registered state**: the capacity the registry currently holds.
//! - **Convergence**: the process of making registered match declared.
//!
//! # Invariants
//!
//! - Multi-step sequences are never aborted partway; every step is attempted
//! - Registry failures are reported, never rolled back
//! - Agreement between declared and registered capacity is best-effort

use std::time::Duration;

use netres_events::ConfigClass;
use netres_resource::{ContinuousResourceSpec, ReplaceOutcome, ResourceAdmin};
use thiserror::Error;

/// Reconciliation errors.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// No document exists for the subject at handling time.
    #[error("no {class} configuration for {subject}")]
    MissingConfig { subject: String, class: ConfigClass },

    /// The document exists but does not carry a usable value.
    #[error("invalid {class} configuration for {subject}: {reason}")]
    InvalidConfig {
        subject: String,
        class: ConfigClass,
        reason: String,
    },

    /// The event subject is not the kind this handler reconciles.
    #[error("unexpected subject: {0}")]
    UnexpectedSubject(String),

    /// The event's configuration class is not handled here.
    #[error("unexpected configuration class: {0}")]
    UnexpectedConfigClass(ConfigClass),
}

/// Convergence status for a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStatus {
    /// Registered capacity matches the declared capacity.
    Converged,

    /// Registered capacity differs from the declared capacity.
    Diverged,

    /// Capacity is declared but nothing is registered.
    Missing,

    /// Nothing is declared; the registry holds whatever it was given
    /// elsewhere (e.g. a port-speed default).
    Undeclared,
}

impl ConvergenceStatus {
    /// Compares declared and registered capacity for one key.
    pub fn evaluate(declared: Option<u64>, registered: Option<u64>) -> Self {
        match (declared, registered) {
            (None, _) => Self::Undeclared,
            (Some(_), None) => Self::Missing,
            (Some(d), Some(r)) if d == r => Self::Converged,
            (Some(_), Some(_)) => Self::Diverged,
        }
    }

    /// Returns true if the resource has converged.
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged)
    }
}

/// Brings the registry's capacity at `spec.key` to `spec.capacity`.
///
/// This is the single boundary operation for capacity changes. Unless the
/// registry overrides [`ResourceAdmin::replace_resources`] with an atomic
/// replace, the key is briefly unregistered, and stays so if the register
/// step fails.
pub fn reconcile_capacity<A>(admin: &A, spec: &ContinuousResourceSpec) -> ReplaceOutcome
where
    A: ResourceAdmin + ?Sized,
{
    admin.replace_resources(spec)
}

/// Exponential backoff schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    /// Delay before the first retry.
    pub initial: Duration,

    /// Upper bound for any single delay.
    pub max: Duration,

    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            initial: DEFAULT_RETRY_INITIAL,
            max: DEFAULT_RETRY_MAX_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Backoff {
    /// Delay before retry number `retry` (1-based), or `None` once retries
    /// are exhausted.
    pub fn delay(&self, retry: u32) -> Option<Duration> {
        if retry == 0 || retry > self.max_retries {
            return None;
        }
        let factor = 1u32.checked_shl(retry - 1).unwrap_or(u32::MAX);
        Some(self.initial.saturating_mul(factor).min(self.max))
    }
}

/// What to do when a reconciliation work item fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the failure and discard the work item.
    #[default]
    LogAndDrop,

    /// Re-run the work item on a backoff schedule, then drop it.
    RetryWithBackoff(Backoff),
}

impl FailurePolicy {
    /// Delay before retry number `retry` (1-based), or `None` to drop.
    pub fn retry_delay(&self, retry: u32) -> Option<Duration> {
        match self {
            Self::LogAndDrop => None,
            Self::RetryWithBackoff(backoff) => backoff.delay(retry),
        }
    }
}

/// Default retry limit per work item.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_RETRY_INITIAL: Duration = Duration::from_millis(100);

/// Default upper bound on retry delay.
pub const DEFAULT_RETRY_MAX_DELAY: Duration = Duration::from_secs(10);
