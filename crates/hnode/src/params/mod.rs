// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Node parameter store contract.
//!
//! Parameters are the node-scoped runtime configuration surface: named,
//! typed values that can be declared with defaults, read at any time, and
//! mutated externally (deployment tooling, remote operators, tests).
//! Consumers that must react to mutations register a change callback and
//! receive every applied batch in order.
//!
//! The store is an **injected dependency**: components take an
//! `Arc<dyn ParameterStore>` and never assume a process-wide singleton.
//! [`MemoryParameterStore`] is the bundled in-process implementation; hosts
//! with their own configuration subsystem implement the trait instead.
//!
//! # Change notification
//!
//! A batch of mutations produces exactly one callback invocation carrying
//! the `(name, value)` pairs in application order. Callbacks run on the
//! mutating thread, after the values are stored, and return a `Result` so
//! that a consumer which cannot honor a new value surfaces the failure to
//! whoever triggered the mutation. Values already stored are not rolled
//! back on callback failure.

mod memory;

pub use memory::MemoryParameterStore;

use crate::error::Result;
use std::sync::Arc;

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// UTF-8 string
    Str(Arc<str>),
}

impl ParameterValue {
    /// Boolean content, if this value is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Name of the contained type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

/// One applied parameter mutation inside a change batch.
#[derive(Debug, Clone)]
pub struct ParameterChange {
    /// Parameter name
    pub name: Arc<str>,
    /// Newly stored value
    pub value: ParameterValue,
}

/// Callback invoked with every applied change batch, in order.
pub type ParameterChangeCallback = Arc<dyn Fn(&[ParameterChange]) -> Result<()> + Send + Sync>;

/// Opaque handle identifying a registered change callback.
///
/// Returned by [`ParameterStore::subscribe_changes`]; pass it back to
/// [`ParameterStore::unsubscribe_changes`] to stop delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterCallbackHandle(u64);

impl ParameterCallbackHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Contract between the node's components and its parameter subsystem.
///
/// Implementations must be thread-safe: declaration, reads and mutation
/// may race from different threads.
pub trait ParameterStore: Send + Sync {
    /// Whether a parameter with this name has been declared.
    fn has(&self, name: &str) -> bool;

    /// Declare a parameter with a default value.
    ///
    /// A value already present for `name` is kept; the default only fills
    /// the gap.
    fn declare(&self, name: &str, default: ParameterValue);

    /// Current value of a declared parameter.
    fn get(&self, name: &str) -> Option<ParameterValue>;

    /// Register a callback for future change batches.
    fn subscribe_changes(&self, callback: ParameterChangeCallback) -> ParameterCallbackHandle;

    /// Remove a previously registered callback. Unknown handles are a no-op.
    fn unsubscribe_changes(&self, handle: ParameterCallbackHandle);
}
