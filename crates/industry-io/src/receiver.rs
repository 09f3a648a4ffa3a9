// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Typed subscribing endpoint
//!
//! A receiver named `feed` in `svc/default` carrying `bool` values has the
//! address `bool.svc/default.feed`. On creation the topology file is
//! consulted under that address: a recorded subscription is applied at once,
//! an unknown address gets an empty placeholder entry to be wired later.
//!
//! Frames arrive as `<topic><envelope>`. The receiver strips as many leading
//! bytes as its subscribed prefix is long and decodes the rest.
//!
//! Waiting happens on the blocking pool. If a `receive_next` future is dropped
//! before a frame arrives (a timeout, a lost `select!` branch, an aborted
//! callback), its wait is parked on the receiver and the next `receive_next`
//! picks it up, so the frame it takes is still delivered.

use crate::codec::{Payload, ValueCodec};
use crate::context::ApplicationContext;
use crate::error::{ContextError, IoError};
use industry_transports::{Subscriber, TransportError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use tokio::task::JoinHandle;
use tracing::{debug, error};

type FrameTask = JoinHandle<Result<Vec<u8>, IoError>>;

struct ReceiverShared<T> {
    context: Arc<ApplicationContext>,
    name: String,
    address: String,
    subscriber: Arc<dyn Subscriber>,
    subscription: Mutex<Option<String>>,
    state: Mutex<T>,
    parked: Mutex<VecDeque<FrameTask>>,
}

/// Receives `T` values from one subscribed topic
///
/// Cloning yields another handle to the same endpoint.
pub struct Receiver<T: Payload> {
    shared: Arc<ReceiverShared<T>>,
}

impl<T: Payload> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Payload> Receiver<T> {
    pub fn new(context: Arc<ApplicationContext>, name: &str) -> Result<Self, ContextError> {
        let subscriber = context.subscriber()?;
        Self::with_subscriber(context, name, subscriber)
    }

    /// Receiver listening through a caller-supplied, started transport
    pub fn with_subscriber(
        context: Arc<ApplicationContext>,
        name: &str,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<Self, ContextError> {
        let address = context.identity().qualify(T::KIND, name);
        let recorded = context.register_receiver(&address);

        let receiver = Self {
            shared: Arc::new(ReceiverShared {
                context,
                name: name.to_string(),
                address,
                subscriber,
                subscription: Mutex::new(None),
                state: Mutex::new(T::default()),
                parked: Mutex::new(VecDeque::new()),
            }),
        };

        match recorded {
            Some(topic) => receiver.subscribe_to(&topic)?,
            None => debug!("Receiver {} has no recorded subscription", receiver.address()),
        }

        Ok(receiver)
    }

    /// Subscribe to `topic`, replacing any previous subscription
    ///
    /// Subscriptions are prefix matches; everything published under a topic
    /// starting with `topic` is delivered.
    pub fn subscribe_to(&self, topic: &str) -> Result<(), TransportError> {
        let mut subscription = self.shared.subscription.lock();
        if let Some(previous) = subscription.as_deref() {
            if previous == topic {
                return Ok(());
            }
            self.shared.subscriber.unsubscribe(previous.as_bytes())?;
        }
        self.shared.subscriber.subscribe(topic.as_bytes())?;
        *subscription = Some(topic.to_string());
        debug!("Receiver {} subscribed to {}", self.shared.address, topic);
        Ok(())
    }

    /// Wait for the next message, decode it and make it the current state
    ///
    /// Ends with [`IoError::Cancelled`] once the context is stopped. Dropping
    /// the future does not lose a message.
    pub async fn receive_next(&self) -> Result<T, IoError> {
        let prefix_len = self
            .shared
            .subscription
            .lock()
            .as_ref()
            .map(String::len)
            .ok_or_else(|| IoError::NotSubscribed(self.shared.address.clone()))?;

        let parked = self.shared.parked.lock().pop_front();
        let task = match parked {
            Some(task) => task,
            None => {
                let subscriber = Arc::clone(&self.shared.subscriber);
                let context = Arc::clone(&self.shared.context);
                tokio::task::spawn_blocking(move || wait_for_frame(subscriber.as_ref(), &context))
            }
        };
        let frame = PendingFrame {
            parked: &self.shared.parked,
            task: Some(task),
        }
        .await?;

        let value = decode_frame::<T>(&frame, prefix_len)?;
        *self.shared.state.lock() = value.clone();
        Ok(value)
    }

    /// Deliver the next message to `callback`, once
    ///
    /// Failures are logged and the callback is not invoked. To keep receiving,
    /// arm a new callback after each delivery.
    pub fn set_callback<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(T) + Send + 'static,
    {
        let receiver = self.clone();
        self.shared.context.runtime().spawn(async move {
            match receiver.receive_next().await {
                Ok(value) => callback(value),
                Err(IoError::Cancelled) => debug!("Receive on {} cancelled", receiver.address()),
                Err(e) => error!("Receive on {} failed: {}", receiver.address(), e),
            }
        })
    }

    /// Most recently received value, or the zero value
    pub fn state(&self) -> T {
        self.shared.state.lock().clone()
    }

    /// Local name given at construction
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Fully-qualified address, the key under `_receivers`
    pub fn address(&self) -> &str {
        &self.shared.address
    }

    pub fn subscription(&self) -> Option<String> {
        self.shared.subscription.lock().clone()
    }
}

/// A frame wait that parks itself on the receiver when dropped unfinished
struct PendingFrame<'a> {
    parked: &'a Mutex<VecDeque<FrameTask>>,
    task: Option<FrameTask>,
}

impl Future for PendingFrame<'_> {
    type Output = Result<Vec<u8>, IoError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(task) = self.task.as_mut() else {
            return Poll::Ready(Err(IoError::Cancelled));
        };
        let joined = ready!(Pin::new(task).poll(cx));
        self.task = None;
        Poll::Ready(joined.map_err(IoError::from).and_then(|frame| frame))
    }
}

impl Drop for PendingFrame<'_> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            self.parked.lock().push_back(task);
        }
    }
}

// Blocks in poll-sized slices so a stopped context is noticed promptly
fn wait_for_frame(subscriber: &dyn Subscriber, context: &ApplicationContext) -> Result<Vec<u8>, IoError> {
    let poll_ms = context.settings().transport.receive_poll_ms.max(1);
    loop {
        if !context.is_running() {
            return Err(IoError::Cancelled);
        }
        match subscriber.receive_timeout(poll_ms) {
            Ok(frame) => return Ok(frame),
            Err(TransportError::Timeout) => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

fn decode_frame<T: Payload>(frame: &[u8], prefix_len: usize) -> Result<T, IoError> {
    let body = frame.get(prefix_len..).ok_or(IoError::Truncated {
        len: frame.len(),
        prefix_len,
    })?;
    Ok(ValueCodec::<T>::decode(body)?)
}
