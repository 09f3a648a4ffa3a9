//! Common configuration types for transports

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::{TransportError, TransportResult};

/// Build a TCP endpoint string (`tcp://host:port`)
pub fn endpoint(host: &str, port: u16) -> String {
    format!("tcp://{}:{}", host, port)
}

/// Generic transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Address to bind (publisher) or connect (subscriber)
    pub address: String,

    /// Timeout for blocking sends (None = infinite)
    pub timeout: Option<Duration>,

    /// High water mark for send buffer (0 = unlimited)
    pub send_hwm: usize,

    /// High water mark for receive buffer (0 = unlimited)
    pub recv_hwm: usize,

    /// Linger time on close (None = immediate)
    pub linger: Option<Duration>,

    /// Maximum message size (None = unlimited)
    pub max_message_size: Option<usize>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            address: endpoint("127.0.0.1", 7721),
            timeout: Some(Duration::from_secs(1)),
            send_hwm: 1000,
            recv_hwm: 1000,
            linger: None,
            max_message_size: Some(1024 * 1024), // 1 MB default
        }
    }
}

impl TransportConfig {
    /// Create a new config with the given address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Set send high water mark
    pub fn with_send_hwm(mut self, hwm: usize) -> Self {
        self.send_hwm = hwm;
        self
    }

    /// Set receive high water mark
    pub fn with_recv_hwm(mut self, hwm: usize) -> Self {
        self.recv_hwm = hwm;
        self
    }

    /// Set maximum message size
    pub fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = Some(size);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> TransportResult<()> {
        if self.address.is_empty() {
            return Err(TransportError::InvalidConfig(
                "Address cannot be empty".to_string(),
            ));
        }

        if let Some(max_size) = self.max_message_size {
            if max_size == 0 {
                return Err(TransportError::InvalidConfig(
                    "Maximum message size must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Reject frames larger than the configured maximum
    pub fn check_message_size(&self, size: usize) -> TransportResult<()> {
        match self.max_message_size {
            Some(max_size) if size > max_size => {
                Err(TransportError::MessageTooLarge { size, max_size })
            }
            _ => Ok(()),
        }
    }
}

/// Publisher-side configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base transport config
    #[serde(flatten)]
    pub base: TransportConfig,

    /// Keep only the latest outgoing message per peer
    pub conflate: bool,
}

impl ServerConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            base: TransportConfig::new(address),
            ..Default::default()
        }
    }
}

/// Subscriber-side configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base transport config
    #[serde(flatten)]
    pub base: TransportConfig,

    /// Keep only the latest incoming message
    pub conflate: bool,
}

impl ClientConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            base: TransportConfig::new(address),
            ..Default::default()
        }
    }
}
