// Viewer configuration
//
// Loaded from the environment:
// - VIEWER_ENDPOINT: WebSocket endpoint address (replace the placeholder
//   default with the real data source before use)
// - VIEWER_CAPACITY: sliding window capacity (default 200)
// - VIEWER_SOURCE: full JSON source config, overrides VIEWER_ENDPOINT
//   (e.g. {"type": "tcp", "host": "10.0.0.5", "port": 9000})

use crate::source::{validate_config, SourceConfig};
use crate::types::{StreamError, StreamResult};
use crate::window::DEFAULT_WINDOW_CAPACITY;
use serde::{Deserialize, Serialize};
use std::env;

/// Placeholder endpoint; the operator must point this at the real source
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8765";

fn default_window_capacity() -> usize {
    DEFAULT_WINDOW_CAPACITY
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub source: SourceConfig,

    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::WebSocket {
                url: DEFAULT_ENDPOINT.to_string(),
                reconnect: false,
            },
            window_capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> StreamResult<Self> {
        let source = match env::var("VIEWER_SOURCE") {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| StreamError::InvalidConfig(format!("VIEWER_SOURCE: {}", e)))?,
            Err(_) => SourceConfig::WebSocket {
                url: env::var("VIEWER_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
                reconnect: false,
            },
        };

        let window_capacity = match env::var("VIEWER_CAPACITY") {
            Ok(raw) => raw.parse().map_err(|_| {
                StreamError::InvalidConfig(format!("VIEWER_CAPACITY: not a count: {:?}", raw))
            })?,
            Err(_) => DEFAULT_WINDOW_CAPACITY,
        };

        let config = Self {
            source,
            window_capacity,
        };
        config.validate()?;

        Ok(config)
    }

    /// Check capacity and endpoint shape; fatal before any connection attempt
    pub fn validate(&self) -> StreamResult<()> {
        if self.window_capacity < 1 {
            return Err(StreamError::InvalidConfig(
                "window capacity must be at least 1".to_string(),
            ));
        }
        validate_config(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_capacity, 200);
    }

    #[test]
    fn test_zero_capacity_invalid() {
        let config = ViewerConfig {
            window_capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(StreamError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config: ViewerConfig = serde_json::from_str(
            r#"{"source": {"type": "websocket", "url": "ws://10.0.0.5:8765"}}"#,
        )
        .unwrap();
        assert_eq!(config.window_capacity, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_endpoint_invalid() {
        let config = ViewerConfig {
            source: SourceConfig::WebSocket {
                url: "ftp://10.0.0.5".to_string(),
                reconnect: false,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
