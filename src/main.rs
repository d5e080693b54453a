// Telemetry viewer binary
//
// Connects to the configured endpoint and draws the live sliding window as
// a terminal sparkline until interrupted.

use parking_lot::Mutex;
use telemetry_viewer::render::{Renderer, SparklineRenderer};
use telemetry_viewer::{ConnectionState, StreamClient, StreamEvent, ViewerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env()?;
    log::info!("Window capacity: {}", config.window_capacity);

    let mut client = StreamClient::new(config)?;

    let renderer = Mutex::new(SparklineRenderer::new(80));
    client.set_event_callback(move |event| match event {
        StreamEvent::ViewUpdated { samples } => renderer.lock().render(&samples),
        StreamEvent::StateChanged { state } => {
            if state == ConnectionState::Closed {
                log::info!("Stream closed, view will no longer update");
            }
        }
    });

    client.connect().await?;

    tokio::signal::ctrl_c().await?;
    println!();

    client.disconnect().await?;

    Ok(())
}
