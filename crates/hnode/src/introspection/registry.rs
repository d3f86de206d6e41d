// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registry keeping endpoint introspection behavior in sync with the
//! node's parameters.

use super::endpoint::IntrospectionEndpoint;
use crate::error::{Error, Result};
use crate::params::{ParameterCallbackHandle, ParameterChange, ParameterStore, ParameterValue};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// The four node parameters governing service/client introspection.
///
/// Unknown parameter names arriving in a change batch are not an error at
/// this layer; the store carries plenty of parameters the registry does
/// not own. Recognition is by exact name via [`from_name`](Self::from_name).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrospectionSetting {
    /// Publish introspection events for service endpoints
    ServicePublishEnabled,
    /// Include payload content in service introspection events
    ServicePayloadEnabled,
    /// Publish introspection events for client endpoints
    ClientPublishEnabled,
    /// Include payload content in client introspection events
    ClientPayloadEnabled,
}

impl IntrospectionSetting {
    /// All settings, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::ServicePublishEnabled,
        Self::ServicePayloadEnabled,
        Self::ClientPublishEnabled,
        Self::ClientPayloadEnabled,
    ];

    /// Default declared for every setting at registry construction.
    pub const DEFAULT: bool = true;

    /// Parameter name in the node's store.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ServicePublishEnabled => "introspection.service.publish_events",
            Self::ServicePayloadEnabled => "introspection.service.publish_payload",
            Self::ClientPublishEnabled => "introspection.client.publish_events",
            Self::ClientPayloadEnabled => "introspection.client.publish_payload",
        }
    }

    /// Resolve a parameter name; `None` for names this registry does not own.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Whether this setting targets the service collection (else clients).
    fn targets_services(self) -> bool {
        matches!(self, Self::ServicePublishEnabled | Self::ServicePayloadEnabled)
    }

    /// Whether this setting toggles payload inclusion (else publication).
    fn is_payload(self) -> bool {
        matches!(self, Self::ServicePayloadEnabled | Self::ClientPayloadEnabled)
    }
}

/// Non-owning registry of service and client endpoints whose introspection
/// behavior follows the node's parameters.
///
/// Endpoints are recorded as `Weak` references: registration never extends
/// an endpoint's lifetime, and entries whose endpoint has been destroyed
/// are pruned lazily while a parameter change is being applied, never
/// eagerly.
///
/// One registry instance subscribes to its store exactly once, at
/// construction, and the subscription stays active for the registry's
/// lifetime. The change callback holds only a `Weak` back-reference, so
/// the store never keeps a dropped registry alive.
pub struct IntrospectionRegistry {
    services: Mutex<Vec<Weak<dyn IntrospectionEndpoint>>>,
    clients: Mutex<Vec<Weak<dyn IntrospectionEndpoint>>>,
    callback_handle: ParameterCallbackHandle,
}

impl IntrospectionRegistry {
    /// Create a registry wired to the given parameter store.
    ///
    /// Declares the four introspection settings with default `true` where
    /// absent (a value already present in the store is kept) and
    /// registers the change callback.
    pub fn new(store: &Arc<dyn ParameterStore>) -> Arc<Self> {
        for setting in IntrospectionSetting::ALL {
            if !store.has(setting.name()) {
                store.declare(setting.name(), ParameterValue::Bool(IntrospectionSetting::DEFAULT));
            }
        }

        let registry = Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let callback_handle =
                store.subscribe_changes(Arc::new(move |changes: &[ParameterChange]| {
                    match weak.upgrade() {
                        Some(registry) => registry.on_parameters_changed(changes),
                        None => Ok(()),
                    }
                }));

            Self {
                services: Mutex::new(Vec::new()),
                clients: Mutex::new(Vec::new()),
                callback_handle,
            }
        });

        log::debug!("[introspection] registry initialized, 4 settings declared");
        registry
    }

    /// Record a service endpoint.
    ///
    /// The owning handle is downgraded immediately; even an endpoint about
    /// to be destroyed is accepted and will simply be pruned on the next
    /// parameter change. Duplicate registrations are kept as-is.
    pub fn register_service<E>(&self, endpoint: &Arc<E>)
    where
        E: IntrospectionEndpoint + 'static,
    {
        let endpoint: Arc<dyn IntrospectionEndpoint> = endpoint.clone();
        let weak: Weak<dyn IntrospectionEndpoint> = Arc::downgrade(&endpoint);
        self.services.lock().push(weak);
    }

    /// Record a client endpoint. Same contract as [`register_service`](Self::register_service).
    pub fn register_client<E>(&self, endpoint: &Arc<E>)
    where
        E: IntrospectionEndpoint + 'static,
    {
        let endpoint: Arc<dyn IntrospectionEndpoint> = endpoint.clone();
        let weak: Weak<dyn IntrospectionEndpoint> = Arc::downgrade(&endpoint);
        self.clients.lock().push(weak);
    }

    /// Apply one batch of changed parameters to the registered endpoints.
    ///
    /// Changes are processed strictly in input order; within a change,
    /// endpoints are visited in registration order. Expired references are
    /// removed here and only here. Contradictory changes in one batch are
    /// not coalesced; the last one in input order wins.
    ///
    /// # Errors
    /// `ConfigurationApplyFailed` as soon as one endpoint rejects a
    /// publication toggle; endpoints already processed keep the new value.
    /// `ParameterTypeMismatch` when a recognized setting carries a
    /// non-boolean value.
    pub fn on_parameters_changed(&self, changes: &[ParameterChange]) -> Result<()> {
        for change in changes {
            let Some(setting) = IntrospectionSetting::from_name(&change.name) else {
                continue;
            };
            let Some(enabled) = change.value.as_bool() else {
                return Err(Error::ParameterTypeMismatch {
                    name: change.name.to_string(),
                    expected: "bool",
                });
            };

            let collection = if setting.targets_services() {
                &self.services
            } else {
                &self.clients
            };
            self.apply_to_collection(collection, setting, enabled)?;
        }
        Ok(())
    }

    fn apply_to_collection(
        &self,
        collection: &Mutex<Vec<Weak<dyn IntrospectionEndpoint>>>,
        setting: IntrospectionSetting,
        enabled: bool,
    ) -> Result<()> {
        let mut endpoints = collection.lock();
        let mut applied = 0usize;
        let mut pruned = 0usize;

        let mut idx = 0;
        while idx < endpoints.len() {
            // remove() keeps registration order for the survivors
            let Some(endpoint) = endpoints[idx].upgrade() else {
                endpoints.remove(idx);
                pruned += 1;
                continue;
            };

            if setting.is_payload() {
                endpoint.set_event_payload_enabled(enabled);
            } else {
                endpoint
                    .set_event_publication_enabled(enabled)
                    .map_err(|e| Error::ConfigurationApplyFailed {
                        setting: setting.name(),
                        reason: e.to_string(),
                    })?;
            }
            applied += 1;
            idx += 1;
        }

        log::debug!(
            "[introspection] {}={} applied to {} endpoints ({} expired entries pruned)",
            setting.name(),
            enabled,
            applied,
            pruned
        );
        Ok(())
    }

    /// Number of service entries currently recorded (including not-yet-pruned
    /// expired ones).
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.services.lock().len()
    }

    /// Number of client entries currently recorded.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    /// Handle of the change callback registered at construction.
    #[must_use]
    pub fn callback_handle(&self) -> ParameterCallbackHandle {
        self.callback_handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_name_round_trip() {
        for setting in IntrospectionSetting::ALL {
            assert_eq!(IntrospectionSetting::from_name(setting.name()), Some(setting));
        }
        assert_eq!(IntrospectionSetting::from_name("introspection.unknown"), None);
        assert_eq!(IntrospectionSetting::from_name(""), None);
    }

    #[test]
    fn test_setting_scope_and_kind() {
        assert!(IntrospectionSetting::ServicePublishEnabled.targets_services());
        assert!(IntrospectionSetting::ServicePayloadEnabled.targets_services());
        assert!(!IntrospectionSetting::ClientPublishEnabled.targets_services());
        assert!(!IntrospectionSetting::ClientPayloadEnabled.targets_services());

        assert!(!IntrospectionSetting::ServicePublishEnabled.is_payload());
        assert!(IntrospectionSetting::ServicePayloadEnabled.is_payload());
        assert!(!IntrospectionSetting::ClientPublishEnabled.is_payload());
        assert!(IntrospectionSetting::ClientPayloadEnabled.is_payload());
    }
}
