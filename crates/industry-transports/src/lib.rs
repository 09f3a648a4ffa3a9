// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # industry-transports
//!
//! Transport abstraction layer for Industry. Senders and receivers talk to the
//! traits in [`traits`]; the ZeroMQ implementations in [`zmq`] are the only
//! concrete transport today.
//!
//! ## Wire format
//!
//! Every message is a single frame: the fully-qualified topic immediately
//! followed by the payload, with no delimiter. ZeroMQ SUB sockets filter on the
//! leading bytes of that frame, so subscribing to a topic is a prefix match.
//!
//! ## Feature Flags
//!
//! - `zmq-server`: ZMQ PUB socket (binds)
//! - `zmq-client`: ZMQ SUB socket (connects)
//! - `zmq` (default): both
//!
//! The in-process [`memory`] transport is always available.
//!
//! ## Example: ZMQ Publish-Subscribe
//!
//! ### Publisher
//!
//! ```no_run
//! use industry_transports::zmq::server::ZmqPub;
//! use industry_transports::traits::{Transport, Publisher};
//!
//! let mut publisher = ZmqPub::with_address("tcp://127.0.0.1:7721")?;
//! publisher.start()?;
//!
//! loop {
//!     publisher.publish(b"bool.readme/default.NASDAQ", br#"{"val":true}"#)?;
//!     std::thread::sleep(std::time::Duration::from_millis(100));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Subscriber
//!
//! ```no_run
//! use industry_transports::zmq::client::ZmqSub;
//! use industry_transports::traits::{Transport, Subscriber};
//!
//! let mut subscriber = ZmqSub::with_address("tcp://127.0.0.1:7721")?;
//! subscriber.start()?;
//! subscriber.subscribe(b"bool.readme/default.NASDAQ")?;
//!
//! loop {
//!     let frame = subscriber.receive()?;
//!     println!("Received: {:?}", frame);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod common;
pub mod memory;
pub mod traits;

#[cfg(any(feature = "zmq-server", feature = "zmq-client"))]
pub mod zmq;

// Re-export commonly used types
pub use common::{
    endpoint, ClientConfig, ServerConfig, TransportConfig, TransportError, TransportResult,
};

pub use traits::{Publisher, Subscriber, Transport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::common::*;
    pub use crate::memory::*;
    pub use crate::traits::*;

    #[cfg(feature = "zmq-server")]
    pub use crate::zmq::server::*;

    #[cfg(feature = "zmq-client")]
    pub use crate::zmq::client::*;
}
