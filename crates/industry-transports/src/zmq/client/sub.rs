// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ZMQ SUB pattern (subscribing side of publish-subscribe)
//!
//! SUB sockets connect to a PUB endpoint and only deliver frames whose leading
//! bytes match one of the subscribed prefixes.

use crate::common::{ClientConfig, TransportError, TransportResult};
use crate::traits::{Subscriber, Transport};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// ZMQ SUB socket implementation (subscriber)
pub struct ZmqSub {
    context: Arc<zmq::Context>,
    config: ClientConfig,
    socket: Arc<Mutex<Option<zmq::Socket>>>,
    running: Arc<Mutex<bool>>,
}

impl ZmqSub {
    /// Create a new SUB socket
    pub fn new(context: Arc<zmq::Context>, config: ClientConfig) -> TransportResult<Self> {
        config.base.validate()?;

        Ok(Self {
            context,
            config,
            socket: Arc::new(Mutex::new(None)),
            running: Arc::new(Mutex::new(false)),
        })
    }

    /// Create with default context
    pub fn with_address(address: impl Into<String>) -> TransportResult<Self> {
        let context = Arc::new(zmq::Context::new());
        let config = ClientConfig::new(address);
        Self::new(context, config)
    }
}

impl Transport for ZmqSub {
    fn start(&mut self) -> TransportResult<()> {
        if *self.running.lock() {
            return Err(TransportError::AlreadyRunning);
        }

        let socket = self.context.socket(zmq::SUB)?;

        socket.set_linger(0)?;
        socket.set_rcvhwm(self.config.base.recv_hwm as i32)?;
        socket.set_conflate(self.config.conflate)?;
        if let Some(max_size) = self.config.base.max_message_size {
            socket.set_maxmsgsize(max_size as i64)?;
        }

        socket
            .connect(&self.config.base.address)
            .map_err(|e| TransportError::ConnectFailed(format!("{}: {}", self.config.base.address, e)))?;

        *self.socket.lock() = Some(socket);
        *self.running.lock() = true;

        info!("[ZMQ-SUB] Connected to {}", self.config.base.address);

        Ok(())
    }

    fn stop(&mut self) -> TransportResult<()> {
        *self.running.lock() = false;
        *self.socket.lock() = None;
        Ok(())
    }

    fn is_running(&self) -> bool {
        *self.running.lock()
    }

    fn transport_type(&self) -> &str {
        "zmq-sub"
    }
}

impl Subscriber for ZmqSub {
    fn subscribe(&self, topic: &[u8]) -> TransportResult<()> {
        let sock_guard = self.socket.lock();
        let sock = sock_guard.as_ref().ok_or(TransportError::NotRunning)?;

        sock.set_subscribe(topic)?;
        debug!("[ZMQ-SUB] Subscribed to {}", String::from_utf8_lossy(topic));

        Ok(())
    }

    fn unsubscribe(&self, topic: &[u8]) -> TransportResult<()> {
        let sock_guard = self.socket.lock();
        let sock = sock_guard.as_ref().ok_or(TransportError::NotRunning)?;

        sock.set_unsubscribe(topic)?;

        Ok(())
    }

    fn receive(&self) -> TransportResult<Vec<u8>> {
        self.receive_timeout(0) // 0 = blocking
    }

    fn receive_timeout(&self, timeout_ms: u64) -> TransportResult<Vec<u8>> {
        let sock_guard = self.socket.lock();
        let sock = sock_guard.as_ref().ok_or(TransportError::NotRunning)?;

        // Poll for messages if timeout specified
        if timeout_ms > 0 {
            let poll_items = &mut [sock.as_poll_item(zmq::POLLIN)];
            zmq::poll(poll_items, timeout_ms as i64)?;

            if !poll_items[0].is_readable() {
                return Err(TransportError::Timeout);
            }
        }

        let mut frame = sock
            .recv_bytes(0)
            .map_err(|e| TransportError::ReceiveFailed(e.to_string()))?;

        // Peers that send multipart messages get their parts joined back together
        while sock.get_rcvmore()? {
            let part = sock
                .recv_bytes(0)
                .map_err(|e| TransportError::ReceiveFailed(e.to_string()))?;
            frame.extend_from_slice(&part);
        }

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_creation() {
        let context = Arc::new(zmq::Context::new());
        let config = ClientConfig::new("tcp://127.0.0.1:30020");
        let sub = ZmqSub::new(context, config);
        assert!(sub.is_ok());
    }

    #[test]
    fn test_sub_start_stop() {
        let mut sub = ZmqSub::with_address("tcp://127.0.0.1:30021").unwrap();
        assert!(!sub.is_running());

        sub.start().unwrap();
        assert!(sub.is_running());

        sub.stop().unwrap();
        assert!(!sub.is_running());
    }

    #[test]
    fn test_subscribe_before_start_fails() {
        let sub = ZmqSub::with_address("tcp://127.0.0.1:30022").unwrap();
        assert!(matches!(sub.subscribe(b"topic"), Err(TransportError::NotRunning)));
    }

    #[test]
    fn test_receive_times_out_without_publisher() {
        let mut sub = ZmqSub::with_address("tcp://127.0.0.1:30023").unwrap();
        sub.start().unwrap();
        sub.subscribe(b"").unwrap();

        let result = sub.receive_timeout(50);
        assert!(matches!(result, Err(TransportError::Timeout)));
    }
}
