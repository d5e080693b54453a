// End-to-end pipeline tests over real local transports

use std::io::Write as _;
use std::time::Duration;
use telemetry_viewer::{ConnectionState, SourceConfig, StreamClient, ViewerConfig};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

async fn wait_for_samples(client: &StreamClient, accepted: u64) {
    for _ in 0..200 {
        if client.stats().samples_accepted >= accepted {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "timed out waiting for {} samples, stats: {:?}",
        accepted,
        client.stats()
    );
}

async fn wait_for_state(client: &StreamClient, state: ConnectionState) {
    for _ in 0..200 {
        if client.state() == state {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for state {:?}", state);
}

#[tokio::test]
async fn tcp_stream_feeds_window() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(b"10.5\n\nbad\n11.0\n").await.unwrap();
        // Keep the connection open while the client drains
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let config = ViewerConfig {
        source: SourceConfig::Tcp {
            host: addr.ip().to_string(),
            port: addr.port(),
            reconnect: false,
        },
        window_capacity: 200,
    };

    let mut client = StreamClient::new(config).unwrap();
    client.connect().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Open);

    wait_for_samples(&client, 2).await;

    // Only the two numeric payloads were accepted; rejected frames did not
    // consume sequence numbers
    let view = client.window().snapshot();
    assert_eq!(view.len(), 2);
    assert_eq!(view[0].value, 10.5);
    assert_eq!(view[0].sequence, 1);
    assert_eq!(view[1].value, 11.0);
    assert_eq!(view[1].sequence, 2);
    assert_eq!(client.stats().frames_rejected, 2);

    // Teardown is idempotent
    client.disconnect().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Closed);
    client.disconnect().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn websocket_stream_feeds_window() {
    use futures_util::SinkExt;
    use tokio_tungstenite::tungstenite::Message;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(socket).await.unwrap();
        for payload in ["3.25", "abc", "4.5"] {
            ws.send(Message::Text(payload.into())).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        ws.close(None).await.ok();
    });

    let config = ViewerConfig {
        source: SourceConfig::WebSocket {
            url: format!("ws://{}", addr),
            reconnect: false,
        },
        window_capacity: 200,
    };

    let mut client = StreamClient::new(config).unwrap();
    client.connect().await.unwrap();

    wait_for_samples(&client, 2).await;

    let view = client.window().snapshot();
    assert_eq!(view.len(), 2);
    assert_eq!(view[0].value, 3.25);
    assert_eq!(view[0].sequence, 1);
    assert_eq!(view[1].value, 4.5);
    assert_eq!(view[1].sequence, 2);
    assert_eq!(client.stats().frames_rejected, 1);

    client.disconnect().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn websocket_connect_failure_closes_client() {
    // Nothing is listening here
    let config = ViewerConfig {
        source: SourceConfig::WebSocket {
            url: "ws://127.0.0.1:1".to_string(),
            reconnect: false,
        },
        window_capacity: 10,
    };

    let mut client = StreamClient::new(config).unwrap();
    assert!(client.connect().await.is_err());
    assert_eq!(client.state(), ConnectionState::Closed);
    assert!(!client.is_running());
}

#[tokio::test]
async fn file_replay_evicts_oldest() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    for line in ["1.0", "2.0", "3.0", "4.0"] {
        writeln!(tmp, "{}", line).unwrap();
    }

    let config = ViewerConfig {
        source: SourceConfig::File {
            path: tmp.path().display().to_string(),
            rate_limit_ms: None,
            loop_playback: false,
        },
        window_capacity: 3,
    };

    let mut client = StreamClient::new(config).unwrap();
    client.connect().await.unwrap();

    wait_for_samples(&client, 4).await;

    // Capacity 3: sample 1 evicted, indices retain their insertion values
    let view = client.window().snapshot();
    assert_eq!(
        view.iter().map(|s| s.value).collect::<Vec<_>>(),
        vec![2.0, 3.0, 4.0]
    );
    assert_eq!(
        view.iter().map(|s| s.sequence).collect::<Vec<_>>(),
        vec![2, 3, 4]
    );

    // The stream closes on its own once the file is exhausted
    wait_for_state(&client, ConnectionState::Closed).await;
    client.disconnect().await.unwrap();
}
