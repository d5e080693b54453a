// Common types for the telemetry streaming core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for streaming operations
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur during streaming operations
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Client already running")]
    AlreadyRunning,
}

/// Connection lifecycle of a stream client
///
/// Transitions are one-directional per connection attempt:
/// `Connecting -> Open -> Closed`. A client starts out `Closed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConnectionState {
    /// Attempting to reach the endpoint
    Connecting,

    /// Transport established, frames may arrive
    Open,

    /// Connection ended (by either party, failure, or teardown)
    Closed,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::Closed
    }
}

/// One accepted scalar reading paired with its position in the accepted
/// sequence
///
/// `sequence` increases by exactly 1 per accepted sample, regardless of how
/// many frames were rejected in between, and is never renumbered when the
/// sample is evicted from the window. It is the horizontal axis coordinate,
/// not a wall-clock timestamp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub sequence: u64,
}

/// Statistics about a streaming session
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StreamStats {
    pub samples_accepted: u64,
    pub frames_rejected: u64,
    pub current_window_len: usize,
}
