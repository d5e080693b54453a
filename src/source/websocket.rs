// WebSocket streaming source
//
// Connects to a WebSocket server and forwards text frames. Each frame is
// expected to contain a single decimal number as its entire payload, e.g.
// "10.5" or "-3.2e-1"; validation happens downstream in the client.

use super::StreamSource;
use crate::types::{StreamError, StreamResult};
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub struct WebSocketStreamSource {
    url: String,
    reconnect: bool,
    is_connected: bool,
    stream: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

impl WebSocketStreamSource {
    pub fn new(url: String, reconnect: bool) -> Self {
        Self {
            url,
            reconnect,
            is_connected: false,
            stream: None,
        }
    }
}

#[async_trait]
impl StreamSource for WebSocketStreamSource {
    async fn connect(&mut self) -> StreamResult<()> {
        if self.is_connected {
            return Ok(());
        }

        log::info!("Connecting to WebSocket: {}", self.url);

        let (stream, _) = connect_async(&self.url)
            .await
            .map_err(|e| StreamError::WebSocket(format!("connection failed: {}", e)))?;

        log::info!("WebSocket connected");

        self.stream = Some(stream);
        self.is_connected = true;

        Ok(())
    }

    async fn start(&mut self, sender: mpsc::Sender<String>) -> StreamResult<()> {
        loop {
            // Use the channel opened by connect(), or open one now
            let mut stream = match self.stream.take() {
                Some(stream) => stream,
                None => match connect_async(&self.url).await {
                    Ok((stream, _)) => {
                        log::info!("WebSocket connected");
                        self.is_connected = true;
                        stream
                    }
                    Err(e) => {
                        if !self.reconnect {
                            return Err(StreamError::WebSocket(format!(
                                "connection failed: {}",
                                e
                            )));
                        }
                        log::warn!("WebSocket connection failed: {}, retrying in 2 seconds", e);
                        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
                        continue;
                    }
                },
            };

            log::info!("WebSocket stream started");

            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if sender.send(text.to_string()).await.is_err() {
                            log::warn!("Frame receiver closed");
                            return Ok(());
                        }
                    }
                    Ok(Message::Binary(_)) => {
                        log::warn!("Ignoring binary WebSocket frame (text frames expected)");
                    }
                    Ok(Message::Close(_)) => {
                        log::info!("WebSocket closed by server");
                        break;
                    }
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                        // Handled automatically by the library
                    }
                    Ok(Message::Frame(_)) => {
                        // Raw frames, typically not used
                    }
                    Err(e) => {
                        log::error!("WebSocket error: {}", e);
                        break;
                    }
                }
            }

            // Connection ended
            self.is_connected = false;

            if !self.reconnect {
                log::info!("WebSocket disconnected, reconnect disabled");
                return Ok(());
            }

            log::info!("WebSocket disconnected, reconnecting in 2 seconds...");
            tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
        }
    }

    async fn stop(&mut self) -> StreamResult<()> {
        log::info!("Stopping WebSocket stream");
        self.stream = None;
        self.is_connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.is_connected
    }

    fn endpoint(&self) -> String {
        self.url.clone()
    }
}
