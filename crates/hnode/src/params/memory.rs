// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process parameter store backed by a lock-free map.

use super::{
    ParameterCallbackHandle, ParameterChange, ParameterChangeCallback, ParameterStore,
    ParameterValue,
};
use crate::error::{Error, Result};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// In-process [`ParameterStore`] implementation.
///
/// Values live in a `DashMap` keyed by `Arc<str>` (no lock contention on
/// reads); the subscriber list is a small mutex-guarded vector. Change
/// callbacks are invoked on the mutating thread, outside the subscriber
/// lock, in subscription order.
pub struct MemoryParameterStore {
    values: DashMap<Arc<str>, ParameterValue>,
    subscribers: Mutex<Vec<(ParameterCallbackHandle, ParameterChangeCallback)>>,
    next_handle: AtomicU64,
}

impl MemoryParameterStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
            subscribers: Mutex::new(Vec::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    /// Mutate a single declared parameter and notify subscribers.
    ///
    /// # Errors
    /// `ParameterNotDeclared` if `name` was never declared, or the first
    /// error returned by a change callback. The stored value is kept even
    /// when a callback fails.
    pub fn set(&self, name: &str, value: ParameterValue) -> Result<()> {
        self.set_batch(vec![(name.to_string(), value)])
    }

    /// Mutate several parameters as one batch.
    ///
    /// All values are stored first, then subscribers receive a single
    /// notification carrying the changes in input order.
    ///
    /// # Errors
    /// `ParameterNotDeclared` on the first undeclared name (no values are
    /// stored in that case), or the first error returned by a callback.
    pub fn set_batch(&self, changes: Vec<(String, ParameterValue)>) -> Result<()> {
        for (name, _) in &changes {
            if !self.has(name) {
                return Err(Error::ParameterNotDeclared(name.clone()));
            }
        }

        let mut applied = Vec::with_capacity(changes.len());
        for (name, value) in changes {
            let name: Arc<str> = Arc::from(name.as_str());
            self.values.insert(Arc::clone(&name), value.clone());
            applied.push(ParameterChange { name, value });
        }

        self.notify(&applied)
    }

    fn notify(&self, changes: &[ParameterChange]) -> Result<()> {
        // Snapshot under the lock, invoke outside it: a callback may read
        // the store or register endpoints without deadlocking.
        let callbacks: Vec<ParameterChangeCallback> = {
            let subscribers = self.subscribers.lock();
            subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        for callback in callbacks {
            callback(changes)?;
        }
        Ok(())
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter has been declared yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for MemoryParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore for MemoryParameterStore {
    fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn declare(&self, name: &str, default: ParameterValue) {
        if self.values.contains_key(name) {
            log::debug!("[params] '{}' already declared, keeping stored value", name);
            return;
        }
        self.values.insert(Arc::from(name), default);
    }

    fn get(&self, name: &str) -> Option<ParameterValue> {
        self.values.get(name).map(|v| v.value().clone())
    }

    fn subscribe_changes(&self, callback: ParameterChangeCallback) -> ParameterCallbackHandle {
        let handle = ParameterCallbackHandle::new(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((handle, callback));
        handle
    }

    fn unsubscribe_changes(&self, handle: ParameterCallbackHandle) {
        self.subscribers.lock().retain(|(h, _)| *h != handle);
    }
}
