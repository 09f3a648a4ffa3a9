//! Common error types for all transports

use thiserror::Error;

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport-agnostic error type
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind publisher socket
    #[error("Bind failed: {0}")]
    BindFailed(String),

    /// Failed to connect subscriber socket
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    /// Failed to send message
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Failed to receive message
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    /// Timeout occurred
    #[error("Operation timed out")]
    Timeout,

    /// Transport is not running
    #[error("Transport is not running")]
    NotRunning,

    /// Transport is already running
    #[error("Transport is already running")]
    AlreadyRunning,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Message too large
    #[error("Message too large: {size} bytes (max: {max_size})")]
    MessageTooLarge { size: usize, max_size: usize },

    /// Transport-specific error
    #[cfg(any(feature = "zmq-server", feature = "zmq-client"))]
    #[error("ZMQ error: {0}")]
    Zmq(zmq::Error),
}

#[cfg(any(feature = "zmq-server", feature = "zmq-client"))]
impl From<zmq::Error> for TransportError {
    fn from(err: zmq::Error) -> Self {
        match err {
            zmq::Error::EAGAIN => Self::Timeout,
            _ => Self::Zmq(err),
        }
    }
}
