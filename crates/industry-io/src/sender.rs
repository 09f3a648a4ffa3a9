// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Typed publishing endpoint

use crate::codec::{Payload, ValueCodec};
use crate::context::ApplicationContext;
use crate::error::{ContextError, IoError};
use industry_transports::Publisher;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Publishes `T` values on `<type>.<app>/<instance>.<name>`
///
/// Creating a sender records its topic under `_senders` and schedules a
/// topology write. Every sender in a process shares the context's publisher.
pub struct Sender<T: Payload> {
    context: Arc<ApplicationContext>,
    topic: String,
    publisher: Arc<dyn Publisher>,
    state: Mutex<T>,
}

impl<T: Payload> Sender<T> {
    pub fn new(context: Arc<ApplicationContext>, name: &str) -> Result<Self, ContextError> {
        let publisher = context.publisher()?;
        Ok(Self::with_publisher(context, name, publisher))
    }

    /// Sender publishing through a caller-supplied transport
    pub fn with_publisher(context: Arc<ApplicationContext>, name: &str, publisher: Arc<dyn Publisher>) -> Self {
        let topic = context.identity().qualify(T::KIND, name);
        context.register_sender(&topic);
        debug!("Sender ready on {}", topic);

        Self {
            context,
            topic,
            publisher,
            state: Mutex::new(T::default()),
        }
    }

    /// Record `value` as the current state and publish it
    pub fn send(&self, value: T) -> Result<(), IoError> {
        let envelope = {
            let mut state = self.state.lock();
            *state = value;
            ValueCodec::<T>::encode(&state)?
        };
        self.publisher.publish(self.topic.as_bytes(), envelope.as_bytes())?;
        debug!("{} <- {}", self.topic, envelope);
        Ok(())
    }

    /// Last value passed to [`Self::send`], or the zero value
    pub fn state(&self) -> T {
        self.state.lock().clone()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn context(&self) -> &Arc<ApplicationContext> {
        &self.context
    }
}
