// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Subscription-side message dispatch.
//!
//! The transport hands every ready message to a subscription through the
//! [`SubscriptionDispatch`] contract: allocate a buffer, fill it, dispatch
//! it, release it. [`RawSubscription`] implements the runtime-typed subset
//! of that contract: payloads stay opaque [`SerializedMessage`] bytes and
//! the typed/loaned operations are rejected outright, because a payload
//! cannot be safely reinterpreted without its type.
//!
//! Per-message flow:
//!
//! ```text
//! allocate_serialized_message() -> fill -> dispatch_serialized() -> release
//! ```
//!
//! Dispatch is synchronous and reentrant-free per buffer: the handler runs
//! on the delivering thread and `dispatch_serialized` returns only after
//! it does.

mod message;
mod raw;

pub use message::{MessageInfo, SerializedMessage};
pub use raw::{RawMessageCallback, RawSubscription, SubscriptionDispatch};
