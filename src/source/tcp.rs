// TCP socket streaming source
//
// Connects to a TCP server and forwards newline-delimited text frames, one
// reading per line.

use super::StreamSource;
use crate::types::{StreamError, StreamResult};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

pub struct TcpStreamSource {
    host: String,
    port: u16,
    reconnect: bool,
    is_connected: bool,
    stream: Option<TcpStream>,
}

impl TcpStreamSource {
    pub fn new(host: String, port: u16, reconnect: bool) -> Self {
        Self {
            host,
            port,
            reconnect,
            is_connected: false,
            stream: None,
        }
    }

    fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[async_trait]
impl StreamSource for TcpStreamSource {
    async fn connect(&mut self) -> StreamResult<()> {
        if self.is_connected {
            return Ok(());
        }

        log::info!("Connecting to TCP: {}", self.addr());

        let stream = TcpStream::connect(self.addr())
            .await
            .map_err(|e| StreamError::Network(format!("TCP connection failed: {}", e)))?;

        log::info!("TCP connected");

        self.stream = Some(stream);
        self.is_connected = true;

        Ok(())
    }

    async fn start(&mut self, sender: mpsc::Sender<String>) -> StreamResult<()> {
        loop {
            // Use the channel opened by connect(), or open one now
            let stream = match self.stream.take() {
                Some(stream) => stream,
                None => match TcpStream::connect(self.addr()).await {
                    Ok(stream) => {
                        log::info!("TCP connected");
                        self.is_connected = true;
                        stream
                    }
                    Err(e) => {
                        if !self.reconnect {
                            return Err(StreamError::Network(format!(
                                "connection failed: {}",
                                e
                            )));
                        }
                        log::warn!("TCP connection failed: {}, retrying in 2 seconds", e);
                        tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
                        continue;
                    }
                },
            };

            log::info!("TCP stream started");

            let mut reader = BufReader::new(stream);
            let mut line = String::new();

            loop {
                line.clear();

                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        log::info!("TCP connection closed by server");
                        break;
                    }
                    Ok(_) => {
                        let payload = line.trim_end_matches(['\r', '\n']).to_string();
                        if sender.send(payload).await.is_err() {
                            log::warn!("Frame receiver closed");
                            return Ok(());
                        }
                    }
                    Err(e) => {
                        log::error!("TCP read error: {}", e);
                        break;
                    }
                }
            }

            // Connection ended
            self.is_connected = false;

            if !self.reconnect {
                log::info!("TCP disconnected, reconnect disabled");
                return Ok(());
            }

            log::info!("TCP disconnected, reconnecting in 2 seconds...");
            tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
        }
    }

    async fn stop(&mut self) -> StreamResult<()> {
        log::info!("Stopping TCP stream");
        self.stream = None;
        self.is_connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.is_connected
    }

    fn endpoint(&self) -> String {
        self.addr()
    }
}
