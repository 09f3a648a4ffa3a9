//! Common types and utilities for all transports

pub mod config;
pub mod error;

pub use config::{endpoint, ClientConfig, ServerConfig, TransportConfig};
pub use error::{TransportError, TransportResult};
