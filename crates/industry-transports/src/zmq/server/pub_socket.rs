// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ZMQ PUB pattern (publishing side of publish-subscribe)
//!
//! PUB sockets broadcast every frame to all connected subscribers. Subscribers
//! filter by topic prefix on their side; the publisher never waits for them.

use crate::common::{ServerConfig, TransportError, TransportResult};
use crate::traits::{Publisher, Transport};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// ZMQ PUB socket implementation (publisher)
pub struct ZmqPub {
    context: Arc<zmq::Context>,
    config: ServerConfig,
    socket: Arc<Mutex<Option<zmq::Socket>>>,
    running: Arc<Mutex<bool>>,
}

impl ZmqPub {
    /// Create a new PUB socket
    pub fn new(context: Arc<zmq::Context>, config: ServerConfig) -> TransportResult<Self> {
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
        let config = ServerConfig::new(address);
        Self::new(context, config)
    }

    /// Address this socket binds to
    pub fn address(&self) -> &str {
        &self.config.base.address
    }
}

impl Transport for ZmqPub {
    fn start(&mut self) -> TransportResult<()> {
        if *self.running.lock() {
            return Err(TransportError::AlreadyRunning);
        }

        let socket = self.context.socket(zmq::PUB)?;

        let linger = self
            .config
            .base
            .linger
            .map(|l| l.as_millis() as i32)
            .unwrap_or(0);
        socket.set_linger(linger)?;
        socket.set_sndhwm(self.config.base.send_hwm as i32)?;
        socket.set_conflate(self.config.conflate)?;

        if let Some(timeout) = self.config.base.timeout {
            socket.set_sndtimeo(timeout.as_millis() as i32)?;
        } else {
            socket.set_sndtimeo(-1)?; // Blocking
        }

        socket
            .bind(&self.config.base.address)
            .map_err(|e| TransportError::BindFailed(format!("{}: {}", self.config.base.address, e)))?;

        *self.socket.lock() = Some(socket);
        *self.running.lock() = true;

        info!("[ZMQ-PUB] Listening on {}", self.config.base.address);

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
        "zmq-pub"
    }
}

impl Publisher for ZmqPub {
    fn publish_simple(&self, data: &[u8]) -> TransportResult<()> {
        let sock_guard = self.socket.lock();
        let sock = sock_guard.as_ref().ok_or(TransportError::NotRunning)?;

        self.config.base.check_message_size(data.len())?;

        sock.send(data, 0)
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;

        debug!("[ZMQ-PUB] Sent {} bytes", data.len());
        Ok(())
    }
}
