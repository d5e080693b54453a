// Real-time scalar telemetry viewer core
//
// Receives a continuous stream of scalar sensor readings over a persistent
// connection and maintains a bounded sliding window of the most recent
// samples for a renderer to draw.
//
// Architecture:
// - `source`: trait-based system for pluggable transports (WebSocket, TCP, file replay)
// - `client`: connection lifecycle, per-frame parsing, sequence numbering
// - `window`: fixed-capacity FIFO sliding window with snapshot reads
// - `render`: thin console sink used by the binary

pub mod client;
pub mod config;
pub mod render;
pub mod source;
pub mod types;
pub mod window;

pub use client::{StreamClient, StreamEvent};
pub use config::ViewerConfig;
pub use source::{create_source, SourceConfig, StreamSource};
pub use types::{ConnectionState, Sample, StreamError, StreamResult, StreamStats};
pub use window::{SlidingWindow, DEFAULT_WINDOW_CAPACITY};
