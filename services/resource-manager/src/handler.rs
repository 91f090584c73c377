//! Bandwidth capacity reconciliation.
//!
//! Turns one configuration change into registry calls:
//!
//! | Change       | Registry calls                                         |
//! |--------------|--------------------------------------------------------|
//! | ADDED        | register; on failure, unregister then register again   |
//! | UPDATED      | unregister then register                               |
//! | REMOVED      | unregister                                             |
//! | REGISTERED   | none                                                   |
//! | UNREGISTERED | none                                                   |
//!
//! The capacity is read from the configuration source when the event is
//! handled, not when it was raised. Unregister calls carry a zero-capacity
//! placeholder since only the key is significant.

use std::sync::Arc;

use netres_events::{ConfigChangeEvent, ConfigChangeType};
use netres_id::ConnectPoint;
use netres_netcfg::{BandwidthCapacityConfig, ConfigSource, NetworkConfig};
use netres_reconcile::{reconcile_capacity, ReconcileError};
use netres_resource::{ContinuousResourceSpec, ResourceAdmin, ResourceKey};
use tracing::{debug, info, warn, Span};

/// Applies bandwidth capacity changes to a resource registry.
pub struct BandwidthCapacityHandler {
    admin: Arc<dyn ResourceAdmin>,
    source: Arc<dyn ConfigSource>,
    span: Span,
}

impl BandwidthCapacityHandler {
    /// Create a handler that logs inside `span`.
    pub fn new(admin: Arc<dyn ResourceAdmin>, source: Arc<dyn ConfigSource>, span: Span) -> Self {
        Self {
            admin,
            source,
            span,
        }
    }

    /// Reconcile the registry with one configuration change.
    ///
    /// Registry refusals are logged and do not make this fail; an `Err` means
    /// the event could not be acted on at all.
    pub fn handle(&self, event: &ConfigChangeEvent) -> Result<(), ReconcileError> {
        let _entered = self.span.enter();

        if event.config_class != BandwidthCapacityConfig::CLASS {
            return Err(ReconcileError::UnexpectedConfigClass(
                event.config_class.clone(),
            ));
        }

        match event.change_type {
            ConfigChangeType::ConfigAdded => {
                let cp = connect_point(event)?;
                let spec = self.declared_spec(cp)?;

                if self.admin.register_resources(&spec) {
                    info!(connect_point = %cp, capacity_bps = spec.capacity, "Registered bandwidth");
                } else {
                    info!(connect_point = %cp, "Failed to register bandwidth, attempting update");
                    self.update_registration(cp, &spec);
                }
            }
            ConfigChangeType::ConfigUpdated => {
                let cp = connect_point(event)?;
                let spec = self.declared_spec(cp)?;
                self.update_registration(cp, &spec);
            }
            ConfigChangeType::ConfigRemoved => {
                let cp = connect_point(event)?;
                let placeholder = ContinuousResourceSpec::placeholder(ResourceKey::bandwidth(cp));

                if self.admin.unregister_resources(&placeholder) {
                    info!(connect_point = %cp, "Unregistered bandwidth");
                } else {
                    warn!(connect_point = %cp, "Failed to unregister bandwidth");
                }
            }
            ConfigChangeType::ConfigRegistered | ConfigChangeType::ConfigUnregistered => {
                debug!(event = %event, "Ignoring configuration class lifecycle event");
            }
        }

        Ok(())
    }

    /// Builds the spec to register from the document currently stored.
    fn declared_spec(&self, cp: &ConnectPoint) -> Result<ContinuousResourceSpec, ReconcileError> {
        let config = self
            .source
            .bandwidth_capacity(cp)
            .map_err(|e| ReconcileError::InvalidConfig {
                subject: cp.to_string(),
                class: BandwidthCapacityConfig::CLASS,
                reason: e.to_string(),
            })?
            .ok_or_else(|| ReconcileError::MissingConfig {
                subject: cp.to_string(),
                class: BandwidthCapacityConfig::CLASS,
            })?;

        let capacity = config
            .capacity()
            .ok_or_else(|| ReconcileError::InvalidConfig {
                subject: cp.to_string(),
                class: BandwidthCapacityConfig::CLASS,
                reason: "capacityMbps is missing or not a non-negative number".to_string(),
            })?;

        Ok(ContinuousResourceSpec::bandwidth(cp, capacity))
    }

    /// Replaces the registered capacity, attempting both steps regardless.
    fn update_registration(&self, cp: &ConnectPoint, spec: &ContinuousResourceSpec) {
        let outcome = reconcile_capacity(self.admin.as_ref(), spec);

        if !outcome.unregistered {
            warn!(connect_point = %cp, "Unregistering bandwidth failed during update");
        }

        if outcome.registered {
            info!(connect_point = %cp, capacity_bps = spec.capacity, "Updated bandwidth");
        } else {
            warn!(connect_point = %cp, capacity_bps = spec.capacity, "Failed to update bandwidth");
        }
    }
}

fn connect_point(event: &ConfigChangeEvent) -> Result<&ConnectPoint, ReconcileError> {
    event
        .subject
        .connect_point()
        .ok_or_else(|| ReconcileError::UnexpectedSubject(event.subject.to_string()))
}
