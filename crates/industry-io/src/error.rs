// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the typed I/O layer
//!
//! - [`CodecError`]: value <-> envelope conversion
//! - [`ContextError`]: setup (config load, socket bind/connect, config writes)
//! - [`IoError`]: steady-state send/receive

use industry_config::ConfigError;
use industry_transports::TransportError;
use thiserror::Error;

/// Envelope encoding and decoding failures
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported value type '{0}' (expected one of bool, int, double, string)")]
    UnsupportedType(String),

    #[error("cannot encode value: {0}")]
    Encode(String),

    #[error("cannot decode envelope: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures while setting up or persisting the application context
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),

    #[error("no tokio runtime: the application context must be initialized inside one")]
    NoRuntime,

    #[error("invalid {kind} name '{name}': must be non-empty and contain no path separators")]
    InvalidName { kind: &'static str, name: String },

    #[error("config write task failed: {0}")]
    WriteTask(#[from] tokio::task::JoinError),
}

/// Failures while sending or receiving a value
#[derive(Debug, Error)]
pub enum IoError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("message of {len} bytes is shorter than the subscribed prefix ({prefix_len} bytes)")]
    Truncated { len: usize, prefix_len: usize },

    #[error("receiver {0} is not subscribed to any topic")]
    NotSubscribed(String),

    #[error("receive abandoned: application context stopped")]
    Cancelled,

    #[error("receive task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
