// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-process publish-subscribe transport
//!
//! A [`MemoryBus`] plays the role of the PUB endpoint: every [`MemoryPub`]
//! attached to it fans frames out to every [`MemorySub`] whose subscribed
//! prefixes match, exactly like ZeroMQ prefix filtering. A bus built with
//! [`MemoryBus::recording`] also keeps a log of published frames so callers
//! can inspect what went over the wire.

use crate::common::{TransportError, TransportResult};
use crate::traits::{Publisher, Subscriber, Transport};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;

#[derive(Default)]
struct SubscriberState {
    prefixes: Vec<Vec<u8>>,
    queue: VecDeque<Vec<u8>>,
}

#[derive(Default)]
struct SubscriberSlot {
    state: Mutex<SubscriberState>,
    ready: Condvar,
}

impl SubscriberSlot {
    fn offer(&self, frame: &[u8]) {
        let mut state = self.state.lock();
        if state.prefixes.iter().any(|p| frame.starts_with(p)) {
            state.queue.push_back(frame.to_vec());
            self.ready.notify_one();
        }
    }
}

#[derive(Default)]
struct BusInner {
    subscribers: Vec<Weak<SubscriberSlot>>,
    published: Option<Vec<Vec<u8>>>,
}

/// Shared in-process endpoint
#[derive(Clone, Default)]
pub struct MemoryBus {
    inner: Arc<Mutex<BusInner>>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus that logs every published frame
    pub fn recording() -> Self {
        let bus = Self::default();
        bus.inner.lock().published = Some(Vec::new());
        bus
    }

    /// Frames published so far, in order; always empty unless recording
    pub fn published(&self) -> Vec<Vec<u8>> {
        self.inner.lock().published.clone().unwrap_or_default()
    }

    fn attach(&self, slot: &Arc<SubscriberSlot>) {
        self.inner.lock().subscribers.push(Arc::downgrade(slot));
    }

    fn broadcast(&self, frame: &[u8]) {
        let mut inner = self.inner.lock();
        if let Some(log) = inner.published.as_mut() {
            log.push(frame.to_vec());
        }
        inner.subscribers.retain(|weak| match weak.upgrade() {
            Some(slot) => {
                slot.offer(frame);
                true
            }
            None => false,
        });
    }
}

/// Publisher half of the in-process transport
pub struct MemoryPub {
    bus: MemoryBus,
    running: bool,
}

impl MemoryPub {
    pub fn new(bus: MemoryBus) -> Self {
        Self { bus, running: false }
    }
}

impl Transport for MemoryPub {
    fn start(&mut self) -> TransportResult<()> {
        if self.running {
            return Err(TransportError::AlreadyRunning);
        }
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> TransportResult<()> {
        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn transport_type(&self) -> &str {
        "memory-pub"
    }
}

impl Publisher for MemoryPub {
    fn publish_simple(&self, data: &[u8]) -> TransportResult<()> {
        if !self.running {
            return Err(TransportError::NotRunning);
        }
        self.bus.broadcast(data);
        Ok(())
    }
}

/// Subscriber half of the in-process transport
pub struct MemorySub {
    bus: MemoryBus,
    slot: Arc<SubscriberSlot>,
    running: bool,
}

impl MemorySub {
    pub fn new(bus: MemoryBus) -> Self {
        Self {
            bus,
            slot: Arc::new(SubscriberSlot::default()),
            running: false,
        }
    }

    /// Prefixes currently subscribed
    pub fn subscriptions(&self) -> Vec<Vec<u8>> {
        self.slot.state.lock().prefixes.clone()
    }
}

impl Transport for MemorySub {
    fn start(&mut self) -> TransportResult<()> {
        if self.running {
            return Err(TransportError::AlreadyRunning);
        }
        self.bus.attach(&self.slot);
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) -> TransportResult<()> {
        self.running = false;
        // Detach by replacing the slot; the bus drops dead weak references lazily
        self.slot = Arc::new(SubscriberSlot::default());
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn transport_type(&self) -> &str {
        "memory-sub"
    }
}

impl Subscriber for MemorySub {
    fn subscribe(&self, topic: &[u8]) -> TransportResult<()> {
        if !self.running {
            return Err(TransportError::NotRunning);
        }
        self.slot.state.lock().prefixes.push(topic.to_vec());
        Ok(())
    }

    fn unsubscribe(&self, topic: &[u8]) -> TransportResult<()> {
        if !self.running {
            return Err(TransportError::NotRunning);
        }
        let mut state = self.slot.state.lock();
        if let Some(index) = state.prefixes.iter().position(|p| p == topic) {
            state.prefixes.remove(index);
        }
        Ok(())
    }

    fn receive(&self) -> TransportResult<Vec<u8>> {
        if !self.running {
            return Err(TransportError::NotRunning);
        }
        let mut state = self.slot.state.lock();
        loop {
            if let Some(frame) = state.queue.pop_front() {
                return Ok(frame);
            }
            self.slot.ready.wait(&mut state);
        }
    }

    fn receive_timeout(&self, timeout_ms: u64) -> TransportResult<Vec<u8>> {
        if timeout_ms == 0 {
            return self.receive();
        }
        if !self.running {
            return Err(TransportError::NotRunning);
        }
        let mut state = self.slot.state.lock();
        if state.queue.is_empty() {
            self.slot
                .ready
                .wait_for(&mut state, Duration::from_millis(timeout_ms));
        }
        state.queue.pop_front().ok_or(TransportError::Timeout)
    }
}
