// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Opaque serialized message buffer and delivery metadata.

use crate::error::{Error, Result};
use std::time::SystemTime;

/// One message instance in wire form.
///
/// The payload is opaque to this layer: no encapsulation header parsing,
/// no decoding, no endianness handling. A freshly allocated buffer has
/// length zero and is filled by the transport before dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializedMessage {
    payload: Vec<u8>,
}

impl SerializedMessage {
    /// Create an empty buffer (length zero, no backing allocation).
    #[must_use]
    pub fn new() -> Self {
        Self { payload: Vec::new() }
    }

    /// Create an empty buffer with reserved backing storage.
    ///
    /// # Errors
    /// `AllocationFailed` when the reservation cannot be satisfied. Fatal
    /// to the current dispatch attempt; never retried here.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut payload = Vec::new();
        payload
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailed(capacity))?;
        Ok(Self { payload })
    }

    /// Payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Mutable payload, for the transport filling the buffer.
    pub fn payload_mut(&mut self) -> &mut Vec<u8> {
        &mut self.payload
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the buffer holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Reset to the empty state, keeping the backing storage.
    pub fn clear(&mut self) {
        self.payload.clear();
    }
}

impl From<Vec<u8>> for SerializedMessage {
    fn from(payload: Vec<u8>) -> Self {
        Self { payload }
    }
}

impl From<&[u8]> for SerializedMessage {
    fn from(payload: &[u8]) -> Self {
        Self {
            payload: payload.to_vec(),
        }
    }
}

/// Delivery metadata accompanying one dispatched message.
///
/// Opaque to the dispatch path: carried through to the handler unread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInfo {
    /// Timestamp stamped by the sending writer
    pub source_timestamp: SystemTime,
    /// Local reception timestamp
    pub reception_timestamp: SystemTime,
    /// Sample sequence number, when the transport provides one
    pub sequence_number: Option<u64>,
    /// GUID of the source writer
    pub writer_guid: [u8; 16],
}

impl Default for MessageInfo {
    fn default() -> Self {
        Self {
            source_timestamp: SystemTime::UNIX_EPOCH,
            reception_timestamp: SystemTime::UNIX_EPOCH,
            sequence_number: None,
            writer_guid: [0u8; 16],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_message_is_empty() {
        let msg = SerializedMessage::new();
        assert_eq!(msg.len(), 0);
        assert!(msg.is_empty());
        assert_eq!(msg.payload(), &[] as &[u8]);
    }

    #[test]
    fn test_with_capacity_is_still_empty() {
        let msg = SerializedMessage::with_capacity(256).unwrap();
        assert_eq!(msg.len(), 0);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut msg = SerializedMessage::new();
        msg.payload_mut().extend_from_slice(&[0xCA, 0xFE]);
        assert_eq!(msg.len(), 2);

        msg.clear();
        assert!(msg.is_empty());
    }

    #[test]
    fn test_from_bytes() {
        let msg = SerializedMessage::from(vec![1, 2, 3]);
        assert_eq!(msg.payload(), &[1, 2, 3]);

        let msg = SerializedMessage::from(&[4u8, 5][..]);
        assert_eq!(msg.payload(), &[4, 5]);
    }
}
