// File-based streaming source that simulates real-time data
//
// Replays a recorded text file one line at a time at a configurable rate,
// useful for:
// - Testing the pipeline without external hardware
// - Replaying recorded sessions
// - Demo and development

use super::StreamSource;
use crate::types::{StreamError, StreamResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

pub struct FileStreamSource {
    path: PathBuf,
    rate_limit_ms: Option<u64>,
    loop_playback: bool,
    is_connected: bool,
}

impl FileStreamSource {
    pub fn new(path: String, rate_limit_ms: Option<u64>, loop_playback: bool) -> Self {
        Self {
            path: PathBuf::from(path),
            rate_limit_ms,
            loop_playback,
            is_connected: false,
        }
    }
}

#[async_trait]
impl StreamSource for FileStreamSource {
    async fn connect(&mut self) -> StreamResult<()> {
        if self.is_connected {
            return Ok(());
        }

        tokio::fs::metadata(&self.path).await.map_err(|e| {
            StreamError::Connection(format!("cannot open {}: {}", self.path.display(), e))
        })?;

        self.is_connected = true;
        log::info!("Connected to file stream: {}", self.path.display());

        Ok(())
    }

    async fn start(&mut self, sender: mpsc::Sender<String>) -> StreamResult<()> {
        if !self.is_connected {
            self.connect().await?;
        }

        log::info!("Starting file stream playback");

        loop {
            let file = tokio::fs::File::open(&self.path).await?;
            let mut lines = BufReader::new(file).lines();

            while let Some(line) = lines.next_line().await? {
                if sender.send(line).await.is_err() {
                    log::warn!("Frame receiver closed, stopping file replay");
                    return Ok(());
                }

                // Rate limiting (simulate real-time)
                if let Some(delay_ms) = self.rate_limit_ms {
                    sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            if !self.loop_playback {
                log::info!("File stream reached EOF");
                return Ok(());
            }
        }
    }

    async fn stop(&mut self) -> StreamResult<()> {
        log::info!("Stopping file stream");
        self.is_connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.is_connected
    }

    fn endpoint(&self) -> String {
        self.path.display().to_string()
    }
}
