// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transport trait definitions
//!
//! These traits define the common interface for all transport implementations.
//! The typed sender/receiver layer only ever sees these traits, which is also
//! what lets tests swap in in-memory doubles.

use crate::common::TransportResult;

/// Base transport trait - implemented by all transports
pub trait Transport: Send + Sync {
    /// Start the transport
    fn start(&mut self) -> TransportResult<()>;

    /// Stop the transport
    fn stop(&mut self) -> TransportResult<()>;

    /// Check if transport is running
    fn is_running(&self) -> bool;

    /// Get transport name/type
    fn transport_type(&self) -> &str;
}

/// Publish-Subscribe pattern (Publisher side)
///
/// Used for one-to-many broadcast communication. Publishing never waits for
/// subscribers; messages nobody listens to are dropped by the transport.
pub trait Publisher: Transport {
    /// Publish a single frame made of `topic` directly followed by `data`
    fn publish(&self, topic: &[u8], data: &[u8]) -> TransportResult<()> {
        let mut frame = Vec::with_capacity(topic.len() + data.len());
        frame.extend_from_slice(topic);
        frame.extend_from_slice(data);
        self.publish_simple(&frame)
    }

    /// Publish a frame that already carries its topic prefix
    fn publish_simple(&self, data: &[u8]) -> TransportResult<()>;
}

/// Publish-Subscribe pattern (Subscriber side)
///
/// Subscriptions are byte-prefix filters on the whole frame.
pub trait Subscriber: Transport {
    /// Subscribe to every frame starting with `topic`
    fn subscribe(&self, topic: &[u8]) -> TransportResult<()>;

    /// Unsubscribe from a topic prefix
    fn unsubscribe(&self, topic: &[u8]) -> TransportResult<()>;

    /// Receive one frame, blocking until it arrives
    fn receive(&self) -> TransportResult<Vec<u8>>;

    /// Receive one frame, giving up with [`TransportError::Timeout`] after `timeout_ms`
    ///
    /// [`TransportError::Timeout`]: crate::common::TransportError::Timeout
    fn receive_timeout(&self, timeout_ms: u64) -> TransportResult<Vec<u8>>;
}
