// Pluggable transport layer for the telemetry stream
//
// This module defines the `StreamSource` trait which enables extension with
// new transport types without modifying existing code. New transports can be
// added by:
// 1. Implementing the StreamSource trait
// 2. Adding a variant to SourceConfig
// 3. Registering in the factory function
//
// Sources deliver raw text frames; decoding the scalar payload is the
// client's job, so a source never decides what counts as a valid reading.
//
// Current implementations:
// - WebSocket: persistent connection, one reading per text frame
// - TCP: newline-delimited text frames
// - File: replays a recorded file, one reading per line

mod file;
mod tcp;
mod websocket;

pub use file::FileStreamSource;
pub use tcp::TcpStreamSource;
pub use websocket::WebSocketStreamSource;

use crate::types::{StreamError, StreamResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Configuration for different stream source types
///
/// Uses serde's tag attribute so a source can be described as clean JSON
/// (e.g. via the `VIEWER_SOURCE` environment variable) and extended with new
/// types later.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SourceConfig {
    /// WebSocket connection; each text frame carries one reading
    #[serde(rename = "websocket")]
    WebSocket {
        url: String,
        #[serde(default)]
        reconnect: bool,
    },

    /// TCP socket connection; readings are newline-delimited
    #[serde(rename = "tcp")]
    Tcp {
        host: String,
        port: u16,
        #[serde(default)]
        reconnect: bool,
    },

    /// File-based replay (simulates real-time by reading one line at a time)
    #[serde(rename = "file")]
    File {
        path: String,
        /// Delay between lines in milliseconds (simulates real-time)
        #[serde(default)]
        rate_limit_ms: Option<u64>,
        /// Restart from the top when EOF is reached
        #[serde(default)]
        loop_playback: bool,
    },
}

/// Trait for all streaming transports
///
/// Implementers provide a unified interface for connecting to an endpoint
/// and forwarding raw text frames through an async channel. `start` runs
/// until the connection ends or the receiver is dropped.
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Establish the transport channel to the endpoint
    async fn connect(&mut self) -> StreamResult<()>;

    /// Forward inbound frames to the provided channel until the stream ends
    async fn start(&mut self, sender: mpsc::Sender<String>) -> StreamResult<()>;

    /// Stop streaming and release the channel handle
    async fn stop(&mut self) -> StreamResult<()>;

    /// Check if currently connected
    fn is_connected(&self) -> bool;

    /// Human-readable endpoint address, for logging
    fn endpoint(&self) -> String;
}

/// Validate a source configuration without constructing the source
///
/// Malformed endpoint addresses are fatal at construction time, before any
/// connection attempt is made.
pub fn validate_config(config: &SourceConfig) -> StreamResult<()> {
    match config {
        SourceConfig::WebSocket { url, .. } => {
            if !url.starts_with("ws://") && !url.starts_with("wss://") {
                return Err(StreamError::InvalidConfig(format!(
                    "websocket url must start with ws:// or wss://, got {:?}",
                    url
                )));
            }
        }
        SourceConfig::Tcp { host, .. } => {
            if host.is_empty() {
                return Err(StreamError::InvalidConfig(
                    "tcp host must not be empty".to_string(),
                ));
            }
        }
        SourceConfig::File { path, .. } => {
            if path.is_empty() {
                return Err(StreamError::InvalidConfig(
                    "file path must not be empty".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Factory function to create a StreamSource from configuration
///
/// This is where new source types are registered.
pub fn create_source(config: SourceConfig) -> StreamResult<Box<dyn StreamSource>> {
    validate_config(&config)?;

    match config {
        SourceConfig::WebSocket { url, reconnect } => {
            Ok(Box::new(WebSocketStreamSource::new(url, reconnect)))
        }

        SourceConfig::Tcp {
            host,
            port,
            reconnect,
        } => Ok(Box::new(TcpStreamSource::new(host, port, reconnect))),

        SourceConfig::File {
            path,
            rate_limit_ms,
            loop_playback,
        } => Ok(Box::new(FileStreamSource::new(
            path,
            rate_limit_ms,
            loop_playback,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_url_scheme_required() {
        let config = SourceConfig::WebSocket {
            url: "http://example.com:8765".to_string(),
            reconnect: false,
        };
        assert!(matches!(
            validate_config(&config),
            Err(StreamError::InvalidConfig(_))
        ));
        assert!(create_source(config).is_err());
    }

    #[test]
    fn test_valid_websocket_config() {
        let config = SourceConfig::WebSocket {
            url: "ws://127.0.0.1:8765".to_string(),
            reconnect: false,
        };
        assert!(create_source(config).is_ok());
    }

    #[test]
    fn test_empty_tcp_host_rejected() {
        let config = SourceConfig::Tcp {
            host: String::new(),
            port: 9000,
            reconnect: false,
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_config_from_tagged_json() {
        let config: SourceConfig =
            serde_json::from_str(r#"{"type": "websocket", "url": "wss://sensors.local/eeg"}"#)
                .unwrap();
        match config {
            SourceConfig::WebSocket { url, reconnect } => {
                assert_eq!(url, "wss://sensors.local/eeg");
                assert!(!reconnect);
            }
            other => panic!("unexpected config: {:?}", other),
        }
    }
}
