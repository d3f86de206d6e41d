// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for node coordination operations.

use std::fmt;

/// Result type for node coordination operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the node coordination layer
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Introspection Errors
    // ========================================================================
    /// Applying a changed introspection setting to an endpoint failed.
    ///
    /// Fatal to the current notification batch. Endpoints processed before
    /// the failing one keep their newly applied value (no rollback).
    ConfigurationApplyFailed {
        /// Parameter name of the setting being applied.
        setting: &'static str,
        /// Failure reported by the endpoint.
        reason: String,
    },

    // ========================================================================
    // Parameter Errors
    // ========================================================================
    /// A recognized setting carried a value of the wrong type.
    ParameterTypeMismatch {
        /// Parameter name as delivered by the store.
        name: String,
        /// Expected value type.
        expected: &'static str,
    },
    /// Mutation of a parameter that was never declared.
    ParameterNotDeclared(String),

    // ========================================================================
    // Dispatch Errors
    // ========================================================================
    /// Operation requires compile-time type knowledge the endpoint lacks.
    UnsupportedOperation(&'static str),
    /// Buffer reservation could not be satisfied (requested capacity).
    AllocationFailed(usize),

    // ========================================================================
    // Misc
    // ========================================================================
    /// Invalid state for the requested operation.
    InvalidState(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigurationApplyFailed { setting, reason } => {
                write!(f, "could not apply '{}' to endpoint: {}", setting, reason)
            }
            Self::ParameterTypeMismatch { name, expected } => {
                write!(f, "parameter '{}' is not a {}", name, expected)
            }
            Self::ParameterNotDeclared(name) => {
                write!(f, "parameter '{}' has not been declared", name)
            }
            Self::UnsupportedOperation(what) => write!(f, "unsupported operation: {}", what),
            Self::AllocationFailed(capacity) => {
                write!(f, "failed to allocate buffer of {} bytes", capacity)
            }
            Self::InvalidState(msg) => write!(f, "invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
