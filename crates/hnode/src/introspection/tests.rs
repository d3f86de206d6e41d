// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Integration tests for the introspection registry.

use super::*;
use crate::error::{Error, Result};
use crate::params::{MemoryParameterStore, ParameterChange, ParameterStore, ParameterValue};
use parking_lot::Mutex;
use std::sync::Arc;

/// Endpoint fake that records every applied toggle, in order.
struct RecordingEndpoint {
    publication: Mutex<Vec<bool>>,
    payload: Mutex<Vec<bool>>,
    fail_publication: bool,
}

impl RecordingEndpoint {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            publication: Mutex::new(Vec::new()),
            payload: Mutex::new(Vec::new()),
            fail_publication: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            publication: Mutex::new(Vec::new()),
            payload: Mutex::new(Vec::new()),
            fail_publication: true,
        })
    }

    fn publication_history(&self) -> Vec<bool> {
        self.publication.lock().clone()
    }

    fn payload_history(&self) -> Vec<bool> {
        self.payload.lock().clone()
    }
}

impl IntrospectionEndpoint for RecordingEndpoint {
    fn set_event_publication_enabled(&self, enabled: bool) -> Result<()> {
        if self.fail_publication {
            return Err(Error::InvalidState("event writer gone".to_string()));
        }
        self.publication.lock().push(enabled);
        Ok(())
    }

    fn set_event_payload_enabled(&self, enabled: bool) {
        self.payload.lock().push(enabled);
    }
}

fn new_store() -> (Arc<MemoryParameterStore>, Arc<dyn ParameterStore>) {
    let store = Arc::new(MemoryParameterStore::new());
    let store_dyn: Arc<dyn ParameterStore> = store.clone();
    (store, store_dyn)
}

fn change(setting: IntrospectionSetting, enabled: bool) -> ParameterChange {
    ParameterChange {
        name: Arc::from(setting.name()),
        value: ParameterValue::Bool(enabled),
    }
}

#[test]
fn test_defaults_declared_at_construction() {
    let (store, store_dyn) = new_store();
    let _registry = IntrospectionRegistry::new(&store_dyn);

    for setting in IntrospectionSetting::ALL {
        assert_eq!(
            store.get(setting.name()),
            Some(ParameterValue::Bool(true)),
            "{} should default to true",
            setting.name()
        );
    }
}

#[test]
fn test_existing_value_survives_construction() {
    let (store, store_dyn) = new_store();
    store.declare(
        IntrospectionSetting::ServicePublishEnabled.name(),
        ParameterValue::Bool(false),
    );

    let _registry = IntrospectionRegistry::new(&store_dyn);

    assert_eq!(
        store.get(IntrospectionSetting::ServicePublishEnabled.name()),
        Some(ParameterValue::Bool(false)),
        "construction must not overwrite an externally-set value"
    );
}

#[test]
fn test_service_setting_targets_services_only() {
    let (_store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);

    let service_a = RecordingEndpoint::new();
    let service_b = RecordingEndpoint::new();
    let client = RecordingEndpoint::new();
    registry.register_service(&service_a);
    registry.register_service(&service_b);
    registry.register_client(&client);

    for enabled in [false, true] {
        registry
            .on_parameters_changed(&[change(IntrospectionSetting::ServicePublishEnabled, enabled)])
            .unwrap();
    }

    assert_eq!(service_a.publication_history(), vec![false, true]);
    assert_eq!(service_b.publication_history(), vec![false, true]);
    assert!(client.publication_history().is_empty());
    assert!(client.payload_history().is_empty());
}

#[test]
fn test_expired_endpoint_pruned_during_payload_change() {
    let (_store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);

    let first = RecordingEndpoint::new();
    let second = RecordingEndpoint::new();
    let third = RecordingEndpoint::new();
    registry.register_service(&first);
    registry.register_service(&second);
    registry.register_service(&third);
    assert_eq!(registry.service_count(), 3);

    drop(second);

    registry
        .on_parameters_changed(&[change(IntrospectionSetting::ServicePayloadEnabled, false)])
        .unwrap();

    assert_eq!(registry.service_count(), 2);
    assert_eq!(first.payload_history(), vec![false]);
    assert_eq!(third.payload_history(), vec![false]);
}

#[test]
fn test_apply_failure_aborts_batch_without_rollback() {
    let (_store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);

    let before = RecordingEndpoint::new();
    let failing = RecordingEndpoint::failing();
    let after = RecordingEndpoint::new();
    registry.register_service(&before);
    registry.register_service(&failing);
    registry.register_service(&after);

    let result =
        registry.on_parameters_changed(&[change(IntrospectionSetting::ServicePublishEnabled, false)]);

    assert!(matches!(
        result,
        Err(Error::ConfigurationApplyFailed { .. })
    ));
    // The endpoint processed before the failure keeps its new value.
    assert_eq!(before.publication_history(), vec![false]);
    // The endpoint after the failing one was never reached.
    assert!(after.publication_history().is_empty());
}

#[test]
fn test_unknown_parameter_names_ignored() {
    let (_store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);

    let service = RecordingEndpoint::new();
    registry.register_service(&service);

    registry
        .on_parameters_changed(&[ParameterChange {
            name: Arc::from("qos.reliability.kind"),
            value: ParameterValue::Str(Arc::from("RELIABLE")),
        }])
        .unwrap();

    assert!(service.publication_history().is_empty());
    assert!(service.payload_history().is_empty());
}

#[test]
fn test_non_bool_value_rejected() {
    let (_store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);

    let result = registry.on_parameters_changed(&[ParameterChange {
        name: Arc::from(IntrospectionSetting::ClientPublishEnabled.name()),
        value: ParameterValue::Int(1),
    }]);

    assert!(matches!(result, Err(Error::ParameterTypeMismatch { .. })));
}

#[test]
fn test_contradictory_changes_applied_in_order() {
    let (_store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);

    let client = RecordingEndpoint::new();
    registry.register_client(&client);

    registry
        .on_parameters_changed(&[
            change(IntrospectionSetting::ClientPublishEnabled, false),
            change(IntrospectionSetting::ClientPublishEnabled, true),
        ])
        .unwrap();

    // No coalescing: both applied, last one in input order wins.
    assert_eq!(client.publication_history(), vec![false, true]);
}

#[test]
fn test_duplicate_registration_applied_twice() {
    let (_store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);

    let service = RecordingEndpoint::new();
    registry.register_service(&service);
    registry.register_service(&service);
    assert_eq!(registry.service_count(), 2);

    registry
        .on_parameters_changed(&[change(IntrospectionSetting::ServicePublishEnabled, false)])
        .unwrap();

    assert_eq!(service.publication_history(), vec![false, false]);
}

#[test]
fn test_immediately_expired_registration_accepted() {
    let (_store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);

    registry.register_client(&RecordingEndpoint::new());
    assert_eq!(registry.client_count(), 1);

    registry
        .on_parameters_changed(&[change(IntrospectionSetting::ClientPayloadEnabled, false)])
        .unwrap();

    assert_eq!(registry.client_count(), 0);
}

#[test]
fn test_store_mutation_reaches_endpoints() {
    let (store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);

    let service = RecordingEndpoint::new();
    let client = RecordingEndpoint::new();
    registry.register_service(&service);
    registry.register_client(&client);

    store
        .set(
            IntrospectionSetting::ClientPublishEnabled.name(),
            ParameterValue::Bool(false),
        )
        .unwrap();

    assert_eq!(client.publication_history(), vec![false]);
    assert!(service.publication_history().is_empty());
}

#[test]
fn test_endpoint_failure_surfaces_to_store_caller() {
    let (store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);
    let failing = RecordingEndpoint::failing();
    registry.register_service(&failing);

    let result = store.set(
        IntrospectionSetting::ServicePublishEnabled.name(),
        ParameterValue::Bool(false),
    );

    assert!(matches!(
        result,
        Err(Error::ConfigurationApplyFailed { .. })
    ));
}

#[test]
fn test_dropped_registry_does_not_block_store() {
    let (store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);
    drop(registry);

    // The weak back-reference is gone; mutation still succeeds.
    store
        .set(
            IntrospectionSetting::ServicePublishEnabled.name(),
            ParameterValue::Bool(false),
        )
        .unwrap();
}

#[test]
fn test_unsubscribed_callback_stops_applying() {
    let (store, store_dyn) = new_store();
    let registry = IntrospectionRegistry::new(&store_dyn);

    let service = RecordingEndpoint::new();
    registry.register_service(&service);

    store.unsubscribe_changes(registry.callback_handle());
    store
        .set(
            IntrospectionSetting::ServicePublishEnabled.name(),
            ParameterValue::Bool(false),
        )
        .unwrap();

    assert!(service.publication_history().is_empty());
}
