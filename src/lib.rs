//! # Industry - typed publish/subscribe with persisted topology
//!
//! Industry lets a process publish and receive typed values (`bool`, `int`,
//! `double`, `string`) over ZeroMQ, and remembers which receiver listens to
//! which topic in a small per-instance JSON file.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! industry = "0.1"
//! ```
//!
//! ```rust,no_run
//! use industry::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = load_settings(None, None)?;
//! let ctx = ApplicationContext::initialize("svc", "default", settings)?;
//!
//! let price = Sender::<i32>::new(ctx.clone(), "price")?;   // int.svc/default.price
//! price.send(42)?;                                         // int.svc/default.price{"val":42}
//!
//! let feed = Receiver::<i32>::new(ctx.clone(), "feed")?;    // int.svc/default.feed
//! feed.subscribe_to(price.topic())?;
//! println!("received {}", feed.receive_next().await?);
//!
//! ctx.stop();
//! ctx.flush().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: industry-config                            │
//! │  (TOML settings, JSON topology document)                │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Transport: industry-transports                         │
//! │  (ZMQ PUB/SUB, in-process bus)                          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  I/O: industry-io                                       │
//! │  (ApplicationContext, Sender<T>, Receiver<T>, codec)    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! `industry-observability` sets up logging for binaries.
//!
//! ## License
//!
//! Apache-2.0

pub use industry_config as config;
pub use industry_io as io;
pub use industry_observability as observability;
pub use industry_transports as transports;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{load_settings, IndustrySettings};
    pub use crate::io::{
        ApplicationContext, CodecError, ContextError, IoError, Payload, Receiver, Sender,
        ValueCodec, ValueKind,
    };
    pub use crate::transports::{Publisher, Subscriber, Transport};
}
