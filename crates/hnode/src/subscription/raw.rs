// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime-typed subscription: serialized dispatch without compile-time
//! type knowledge.

use super::message::{MessageInfo, SerializedMessage};
use crate::error::{Error, Result};
use std::any::Any;
use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::Arc;

/// Callback receiving each dispatched serialized message.
pub type RawMessageCallback = Arc<dyn Fn(Arc<SerializedMessage>) + Send + Sync>;

/// Contract the transport/executor drives to deliver messages to a
/// subscription.
///
/// A fully typed subscription supports every operation. A runtime-typed
/// one is a strict subset: only the serialized path is available, and the
/// typed/loaned operations fail with [`Error::UnsupportedOperation`]
/// instead of guessing at memory it cannot interpret. Callers check
/// [`supports_typed_dispatch`](Self::supports_typed_dispatch) /
/// [`supports_loaned_dispatch`](Self::supports_loaned_dispatch) before
/// taking a typed-only path.
///
/// All operations are synchronous and run to completion on the calling
/// thread; the transport owns ordering across messages.
pub trait SubscriptionDispatch: Send + Sync {
    /// Topic this subscription is bound to.
    fn topic_name(&self) -> &str;

    /// Wire-type name announced for discovery (runtime-supplied).
    fn type_name(&self) -> &str;

    /// Allocate a buffer through the type-erased path.
    ///
    /// # Errors
    /// `AllocationFailed` when backing storage cannot be reserved.
    fn allocate_message(&self) -> Result<Box<dyn Any + Send>>;

    /// Allocate an empty serialized buffer for the transport to fill.
    ///
    /// # Errors
    /// `AllocationFailed` when backing storage cannot be reserved.
    fn allocate_serialized_message(&self) -> Result<SerializedMessage>;

    /// Whether [`dispatch_typed`](Self::dispatch_typed) is available.
    fn supports_typed_dispatch(&self) -> bool;

    /// Whether [`dispatch_loaned`](Self::dispatch_loaned) is available.
    fn supports_loaned_dispatch(&self) -> bool;

    /// Deliver a decoded, typed message.
    ///
    /// # Errors
    /// `UnsupportedOperation` on endpoints without compile-time type
    /// knowledge.
    fn dispatch_typed(&self, message: Box<dyn Any + Send>, info: &MessageInfo) -> Result<()>;

    /// Deliver a filled serialized buffer to the bound handler.
    ///
    /// Invokes the handler exactly once, synchronously, with the buffer
    /// untouched; returns once the handler returns.
    ///
    /// # Errors
    /// None on the raw path today; typed implementations may fail decode.
    fn dispatch_serialized(&self, message: Arc<SerializedMessage>, info: &MessageInfo)
        -> Result<()>;

    /// Deliver a loaned, middleware-owned buffer by reference.
    ///
    /// # Errors
    /// `UnsupportedOperation` on endpoints without compile-time type
    /// knowledge, since a loan cannot be interpreted without it. The pointer is
    /// never dereferenced in that case.
    fn dispatch_loaned(&self, message: NonNull<c_void>, info: &MessageInfo) -> Result<()>;

    /// Return a buffer obtained from [`allocate_message`](Self::allocate_message).
    ///
    /// # Errors
    /// `InvalidState` when the payload did not come from this
    /// subscription's allocator.
    fn release_message(&self, message: Box<dyn Any + Send>) -> Result<()>;

    /// Drop this component's hold on a serialized buffer.
    ///
    /// Outstanding references held elsewhere keep the buffer alive; the
    /// storage is freed when the last one goes.
    fn release_serialized_message(&self, message: Arc<SerializedMessage>);
}

/// Subscription endpoint for topics whose message type is unknown at
/// compile time.
///
/// Payloads travel as opaque [`SerializedMessage`] buffers end-to-end;
/// the single handler bound at construction receives every dispatched
/// buffer and is never replaced. Everything the typed dispatch path would
/// need is rejected explicitly; see [`SubscriptionDispatch`].
pub struct RawSubscription {
    topic: String,
    type_name: String,
    callback: RawMessageCallback,
}

impl RawSubscription {
    /// Create a subscription bound to `topic` with a runtime-supplied
    /// wire-type name and a fixed message handler.
    pub fn new<F>(topic: impl Into<String>, type_name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(Arc<SerializedMessage>) + Send + Sync + 'static,
    {
        Self {
            topic: topic.into(),
            type_name: type_name.into(),
            callback: Arc::new(callback),
        }
    }
}

impl SubscriptionDispatch for RawSubscription {
    fn topic_name(&self) -> &str {
        &self.topic
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn allocate_message(&self) -> Result<Box<dyn Any + Send>> {
        // Type-erased allocation aliases the serialized path.
        Ok(Box::new(self.allocate_serialized_message()?))
    }

    fn allocate_serialized_message(&self) -> Result<SerializedMessage> {
        Ok(SerializedMessage::new())
    }

    fn supports_typed_dispatch(&self) -> bool {
        false
    }

    fn supports_loaned_dispatch(&self) -> bool {
        false
    }

    fn dispatch_typed(&self, _message: Box<dyn Any + Send>, _info: &MessageInfo) -> Result<()> {
        Err(Error::UnsupportedOperation(
            "typed dispatch on a runtime-typed subscription",
        ))
    }

    fn dispatch_serialized(
        &self,
        message: Arc<SerializedMessage>,
        _info: &MessageInfo,
    ) -> Result<()> {
        log::trace!(
            "[subscription] dispatching {} bytes on '{}'",
            message.len(),
            self.topic
        );
        (self.callback)(message);
        Ok(())
    }

    fn dispatch_loaned(&self, _message: NonNull<c_void>, _info: &MessageInfo) -> Result<()> {
        Err(Error::UnsupportedOperation(
            "loaned dispatch on a runtime-typed subscription",
        ))
    }

    fn release_message(&self, message: Box<dyn Any + Send>) -> Result<()> {
        match message.downcast::<SerializedMessage>() {
            Ok(serialized) => {
                drop(serialized);
                Ok(())
            }
            Err(_) => Err(Error::InvalidState(
                "release_message expects a serialized buffer".to_string(),
            )),
        }
    }

    fn release_serialized_message(&self, message: Arc<SerializedMessage>) {
        drop(message);
    }
}
