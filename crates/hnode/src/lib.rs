// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HNODE - Client Node Coordination Layer
//!
//! Node-level plumbing for an HDDS-style middleware client: keeps the
//! introspection behavior of service/client endpoints synchronized with
//! live parameter changes, and dispatches messages for subscriptions whose
//! payload type is unknown at compile time.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hnode::{
//!     IntrospectionRegistry, MemoryParameterStore, MessageInfo, ParameterStore,
//!     RawSubscription, SubscriptionDispatch,
//! };
//! use std::sync::Arc;
//!
//! fn main() -> hnode::Result<()> {
//!     // Parameter-driven introspection control
//!     let store: Arc<dyn ParameterStore> = Arc::new(MemoryParameterStore::new());
//!     let _registry = IntrospectionRegistry::new(&store);
//!     // ... register_service / register_client as endpoints are created ...
//!
//!     // Type-erased subscription dispatch
//!     let subscription = RawSubscription::new("sensor/raw", "RawBytes", |msg| {
//!         println!("received {} opaque bytes", msg.len());
//!     });
//!     let mut buffer = subscription.allocate_serialized_message()?;
//!     buffer.payload_mut().extend_from_slice(&[0xCA, 0xFE]);
//!     subscription.dispatch_serialized(Arc::new(buffer), &MessageInfo::default())?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------------+
//! |                        Parameter Store                             |
//! |     has / declare / get  |  change batches -> subscribers          |
//! +--------------------------------------------------------------------+
//! |                    IntrospectionRegistry                           |
//! |  Weak endpoint bookkeeping | lazy pruning | per-batch fail-fast    |
//! +--------------------------------------------------------------------+
//! |                    Subscription Dispatch                           |
//! |  serialized path (always) | typed / loaned paths (capability)     |
//! +--------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`IntrospectionRegistry`] | Pushes introspection settings to live endpoints |
//! | [`IntrospectionEndpoint`] | Narrow reconfiguration capability of an endpoint |
//! | [`ParameterStore`] | Injected node parameter subsystem contract |
//! | [`MemoryParameterStore`] | Bundled in-process store implementation |
//! | [`RawSubscription`] | Runtime-typed subscription (opaque payloads only) |
//! | [`SerializedMessage`] | One message instance in wire form |
//!
//! ## Threading
//!
//! No internal threads. Both components run entirely on the threads that
//! call into them: the store's mutating thread for parameter application,
//! the transport/executor thread for dispatch.

/// Error types for node coordination operations.
pub mod error;
/// Service introspection control (registry + endpoint capability).
pub mod introspection;
/// Node parameter store contract and in-process implementation.
pub mod params;
/// Subscription-side message dispatch (runtime-typed path).
pub mod subscription;

pub use error::{Error, Result};
pub use introspection::{IntrospectionEndpoint, IntrospectionRegistry, IntrospectionSetting};
pub use params::{
    MemoryParameterStore, ParameterCallbackHandle, ParameterChange, ParameterChangeCallback,
    ParameterStore, ParameterValue,
};
pub use subscription::{
    MessageInfo, RawMessageCallback, RawSubscription, SerializedMessage, SubscriptionDispatch,
};

/// HNODE version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
