// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ZMQ transport implementations
//!
//! - **Publish-Subscribe**: PUB (binds) ↔ SUB (connects)
//!
//! ## Feature Flags
//!
//! - `zmq-server`: Enable the PUB socket
//! - `zmq-client`: Enable the SUB socket
//! - `zmq`: Enable both

#[cfg(feature = "zmq-server")]
pub mod server;

#[cfg(feature = "zmq-client")]
pub mod client;

#[cfg(feature = "zmq-server")]
pub use server::ZmqPub;

#[cfg(feature = "zmq-client")]
pub use client::ZmqSub;
