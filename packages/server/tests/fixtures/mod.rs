//! Shared fixtures for integration tests.
//!
//! `TestServer` runs the real `coderoom-server` binary on a fixed port and
//! kills it on drop. `TestClient` is a thin JSON-over-WebSocket peer.

#![allow(dead_code)]

use std::{
    net::TcpStream as StdTcpStream,
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestServer {
    child: Child,
    port: u16,
}

impl TestServer {
    /// Start the server with default settings
    pub fn start(port: u16) -> Self {
        Self::start_with_args(port, &[])
    }

    /// Start the server with extra command line arguments
    pub fn start_with_args(port: u16, extra_args: &[&str]) -> Self {
        let child = Command::new(env!("CARGO_BIN_EXE_coderoom-server"))
            .args(["--host", "127.0.0.1", "--port", &port.to_string()])
            .args(["--log-level", "warn"])
            .args(extra_args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to spawn coderoom-server");

        let server = Self { child, port };
        server.wait_until_ready();
        server
    }

    fn wait_until_ready(&self) {
        let deadline = Instant::now() + STARTUP_TIMEOUT;
        while Instant::now() < deadline {
            if StdTcpStream::connect(("127.0.0.1", self.port)).is_ok() {
                return;
            }
            thread::sleep(Duration::from_millis(50));
        }
        panic!("Server did not start on port {}", self.port);
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub connection_id: String,
}

impl TestClient {
    /// Connect and consume the initial `connected` event
    pub async fn connect(url: &str) -> Self {
        let (ws, _) = connect_async(url).await.expect("Failed to connect");
        let mut client = Self {
            ws,
            connection_id: String::new(),
        };
        let connected = client.recv().await;
        assert_eq!(connected["type"], "connected");
        client.connection_id = connected["connection_id"]
            .as_str()
            .expect("connection_id should be a string")
            .to_string();
        client
    }

    pub async fn send(&mut self, event: Value) {
        self.ws
            .send(Message::text(event.to_string()))
            .await
            .expect("Failed to send");
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::text(text.to_string()))
            .await
            .expect("Failed to send");
    }

    pub async fn join(&mut self, room_id: &str, username: &str) {
        self.send(serde_json::json!({
            "type": "join",
            "room_id": room_id,
            "username": username,
        }))
        .await;
    }

    /// Next JSON event, skipping control frames
    pub async fn recv(&mut self) -> Value {
        self.try_recv(RECV_TIMEOUT)
            .await
            .expect("Timed out waiting for an event")
    }

    /// Next JSON event within `timeout`, or None
    pub async fn try_recv(&mut self, timeout: Duration) -> Option<Value> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let frame = tokio::time::timeout_at(deadline, self.ws.next()).await.ok()??;
            match frame.expect("WebSocket error") {
                Message::Text(text) => {
                    return Some(serde_json::from_str(text.as_str()).expect("Invalid JSON"));
                }
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}
