// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # industry-io
//!
//! Typed publish/subscribe endpoints for Industry applications.
//!
//! An [`ApplicationContext`] identifies the running process as
//! `<app>/<instance>` and keeps its topology in
//! `<config_root>/<app>/<instance>.json`:
//!
//! ```json
//! {
//!   "_created": "2025-01-01T12:00:00+00:00",
//!   "_senders": ["bool.readme/default.NASDAQ"],
//!   "_receivers": { "bool.readme/default.feed": "bool.readme/default.NASDAQ" }
//! }
//! ```
//!
//! [`Sender`]s publish `{"val":...}` envelopes under
//! `<type>.<app>/<instance>.<name>`; [`Receiver`]s subscribe to whatever topic
//! the topology file assigns them.
//!
//! ## Example
//!
//! ```no_run
//! use industry_config::IndustrySettings;
//! use industry_io::{ApplicationContext, Receiver, Sender};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = ApplicationContext::initialize("readme", "default", IndustrySettings::default())?;
//! let sender = Sender::<bool>::new(ctx.clone(), "NASDAQ")?;
//! let receiver = Receiver::<bool>::new(ctx.clone(), "feed")?;
//! if receiver.subscription().is_none() {
//!     receiver.subscribe_to(sender.topic())?;
//! }
//!
//! receiver.set_callback(|up| println!("market up: {}", up));
//! sender.send(true)?;
//! # Ok(())
//! # }
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod codec;
pub mod context;
pub mod error;
pub mod receiver;
pub mod sender;
pub mod topic;

pub use codec::{Payload, ValueCodec, ValueKind};
pub use context::ApplicationContext;
pub use error::{CodecError, ContextError, IoError};
pub use receiver::Receiver;
pub use sender::Sender;
pub use topic::{qualified_name, Identity};
