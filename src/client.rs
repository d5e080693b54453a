// Stream client - owns the connection and feeds the sliding window
//
// The client manages:
// - Transport lifecycle (connect, drain, disconnect)
// - Per-frame payload parsing and validation
// - Sequence numbering of accepted samples
// - Event emission to the renderer
// - Task cancellation via CancellationToken for graceful teardown
//
// The transport pushes raw frames into a single-consumer channel that the
// drain task processes one at a time (parse -> push -> notify), so the
// window has exactly one writer.

use crate::config::ViewerConfig;
use crate::source::{create_source, StreamSource};
use crate::types::{ConnectionState, Sample, StreamError, StreamResult, StreamStats};
use crate::window::SlidingWindow;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::RwLock as TokioRwLock;
use tokio_util::sync::CancellationToken;

/// Inbound frames buffered between the transport and the drain task
const FRAME_CHANNEL_CAPACITY: usize = 256;

/// Events emitted by the stream client
///
/// `ViewUpdated` fires once per accepted sample; it is the single
/// notification point for renderers.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    StateChanged { state: ConnectionState },
    ViewUpdated { samples: Vec<Sample> },
}

type EventCallback = Arc<RwLock<Option<Box<dyn Fn(StreamEvent) + Send + Sync>>>>;

/// Client for one scalar telemetry stream
///
/// An explicitly constructed, owned value; whoever owns the renderer owns
/// the client.
pub struct StreamClient {
    source: Arc<TokioRwLock<Box<dyn StreamSource>>>,
    window: SlidingWindow,

    state: Arc<RwLock<ConnectionState>>,
    is_running: Arc<AtomicBool>,
    cancel_token: CancellationToken,

    next_sequence: Arc<AtomicU64>,
    samples_accepted: Arc<AtomicU64>,
    frames_rejected: Arc<AtomicU64>,

    event_callback: EventCallback,
}

impl StreamClient {
    /// Create a new client from configuration
    ///
    /// Fails on invalid window capacity or a malformed endpoint address; no
    /// connection is attempted yet.
    pub fn new(config: ViewerConfig) -> StreamResult<Self> {
        config.validate()?;

        let source = create_source(config.source)?;
        let window = SlidingWindow::new(config.window_capacity)?;

        Ok(Self {
            source: Arc::new(TokioRwLock::new(source)),
            window,
            state: Arc::new(RwLock::new(ConnectionState::Closed)),
            is_running: Arc::new(AtomicBool::new(false)),
            cancel_token: CancellationToken::new(),
            next_sequence: Arc::new(AtomicU64::new(0)),
            samples_accepted: Arc::new(AtomicU64::new(0)),
            frames_rejected: Arc::new(AtomicU64::new(0)),
            event_callback: Arc::new(RwLock::new(None)),
        })
    }

    /// Set event callback function
    pub fn set_event_callback<F>(&self, callback: F)
    where
        F: Fn(StreamEvent) + Send + Sync + 'static,
    {
        *self.event_callback.write() = Some(Box::new(callback));
    }

    /// Connect to the endpoint and start draining frames
    ///
    /// On transport failure the state transitions to `Closed` and the error
    /// is returned; there is no automatic retry unless the source was
    /// configured with `reconnect`.
    pub async fn connect(&mut self) -> StreamResult<()> {
        if self.is_running.load(Ordering::Relaxed) {
            return Err(StreamError::AlreadyRunning);
        }

        // Fresh token for this connection attempt
        self.cancel_token = CancellationToken::new();

        self.set_state(ConnectionState::Connecting);

        let endpoint = {
            let mut source = self.source.write().await;
            if let Err(e) = source.connect().await {
                drop(source);
                self.set_state(ConnectionState::Closed);
                return Err(e);
            }
            source.endpoint()
        };

        self.set_state(ConnectionState::Open);

        let (tx, rx) = mpsc::channel::<String>(FRAME_CHANNEL_CAPACITY);
        self.spawn_source_task(tx);
        self.spawn_drain_task(rx);

        self.is_running.store(true, Ordering::Relaxed);
        log::info!("Stream client connected to {}", endpoint);

        Ok(())
    }

    /// Tear down the connection
    ///
    /// Safe to call at any time; calling it again when already closed is a
    /// no-op.
    pub async fn disconnect(&self) -> StreamResult<()> {
        if !self.is_running.load(Ordering::Relaxed)
            && *self.state.read() == ConnectionState::Closed
        {
            return Ok(());
        }

        log::info!("Disconnecting stream client");

        // Cancelling first lets the source task release its lock on the
        // source before stop() takes it
        self.cancel_token.cancel();

        {
            let mut source = self.source.write().await;
            source.stop().await?;
        }

        self.is_running.store(false, Ordering::Relaxed);
        self.set_state(ConnectionState::Closed);

        Ok(())
    }

    /// Spawn the transport task feeding raw frames into the channel
    fn spawn_source_task(&self, tx: mpsc::Sender<String>) {
        let source = Arc::clone(&self.source);
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            let mut source = source.write().await;
            tokio::select! {
                result = source.start(tx) => {
                    if let Err(e) = result {
                        log::error!("Source streaming error: {}", e);
                    }
                }
                _ = cancel_token.cancelled() => {
                    log::info!("Source streaming cancelled");
                }
            }
        });
    }

    /// Spawn the single-consumer drain task: parse -> push -> notify
    fn spawn_drain_task(&self, mut rx: mpsc::Receiver<String>) {
        let window = self.window.clone();
        let state = Arc::clone(&self.state);
        let is_running = Arc::clone(&self.is_running);
        let next_sequence = Arc::clone(&self.next_sequence);
        let samples_accepted = Arc::clone(&self.samples_accepted);
        let frames_rejected = Arc::clone(&self.frames_rejected);
        let event_callback = Arc::clone(&self.event_callback);
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = cancel_token.cancelled() => {
                        log::info!("Frame drain task cancelled");
                        break;
                    }

                    frame = rx.recv() => {
                        match frame {
                            Some(payload) => match parse_payload(&payload) {
                                Ok(value) => {
                                    let sequence =
                                        next_sequence.fetch_add(1, Ordering::Relaxed) + 1;
                                    window.push(Sample { value, sequence });
                                    samples_accepted.fetch_add(1, Ordering::Relaxed);

                                    if let Some(callback) = event_callback.read().as_ref() {
                                        callback(StreamEvent::ViewUpdated {
                                            samples: window.snapshot(),
                                        });
                                    }
                                }
                                Err(e) => {
                                    // Drop the frame, keep the pipeline going
                                    frames_rejected.fetch_add(1, Ordering::Relaxed);
                                    log::debug!("Dropping frame: {}", e);
                                }
                            },
                            None => {
                                log::info!("Stream ended, no more frames");
                                *state.write() = ConnectionState::Closed;
                                is_running.store(false, Ordering::Relaxed);
                                if let Some(callback) = event_callback.read().as_ref() {
                                    callback(StreamEvent::StateChanged {
                                        state: ConnectionState::Closed,
                                    });
                                }
                                break;
                            }
                        }
                    }
                }
            }
        });
    }

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    /// Check if the pipeline is currently running
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// The sliding window this client feeds
    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }

    /// Current statistics
    pub fn stats(&self) -> StreamStats {
        StreamStats {
            samples_accepted: self.samples_accepted.load(Ordering::Relaxed),
            frames_rejected: self.frames_rejected.load(Ordering::Relaxed),
            current_window_len: self.window.len(),
        }
    }

    /// Set state and emit event
    fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
        if let Some(callback) = self.event_callback.read().as_ref() {
            callback(StreamEvent::StateChanged { state });
        }
    }
}

impl Drop for StreamClient {
    fn drop(&mut self) {
        // Ensure the tasks are stopped on drop
        self.cancel_token.cancel();
    }
}

/// Parse a raw frame payload as a decimal floating-point reading
///
/// Accepts optionally signed decimal notation with optional fractional part
/// and exponent. Empty payloads, non-numeric strings, and `NaN`/`Infinity`
/// tokens are rejected.
fn parse_payload(payload: &str) -> StreamResult<f64> {
    let trimmed = payload.trim();

    if trimmed.is_empty() {
        return Err(StreamError::Parse("empty payload".to_string()));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| StreamError::Parse(format!("not a decimal number: {:?}", trimmed)))?;

    if !value.is_finite() {
        return Err(StreamError::Parse(format!(
            "non-finite value rejected: {}",
            trimmed
        )));
    }

    Ok(value)
}
