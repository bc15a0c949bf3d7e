//! Test helpers for relay end-to-end tests.
//!
//! Provides a running server on a random port and a WebSocket test client
//! speaking the JSON frame protocol.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use chatrelay::config::{ChatConfig, ServerConfig, WebConfig};
use chatrelay::{ChatRelay, ChatServer};

/// Default timeout for test operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait before concluding nothing else will arrive.
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Start a server on a random port with the given chat configuration.
pub async fn start_server_with(chat: ChatConfig) -> (SocketAddr, Arc<ChatRelay>) {
    let server_config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let web_config = WebConfig {
        serve_static: false,
        ..WebConfig::default()
    };
    let relay = Arc::new(ChatRelay::from_config(&chat));
    let server = ChatServer::new(&server_config, &web_config, Arc::clone(&relay))
        .expect("Failed to create server");
    let addr = server
        .run_with_addr()
        .await
        .expect("Failed to start server");
    (addr, relay)
}

/// Start a server with the default chat configuration.
pub async fn start_server() -> (SocketAddr, Arc<ChatRelay>) {
    start_server_with(ChatConfig::default()).await
}

/// WebSocket test client.
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    next_ack: u64,
}

impl TestClient {
    /// Connect to the relay at the given address.
    pub async fn connect(addr: SocketAddr) -> Self {
        let (stream, _) = connect_async(format!("ws://{addr}/ws"))
            .await
            .expect("Failed to connect");
        Self {
            stream,
            next_ack: 1,
        }
    }

    /// Send a raw text frame.
    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string()))
            .await
            .expect("Failed to send");
    }

    /// Emit an event without asking for an acknowledgment.
    pub async fn emit(&mut self, event: &str, data: Value) {
        let frame = json!({"event": event, "data": data});
        self.send_raw(&frame.to_string()).await;
    }

    /// Emit an event and wait for its acknowledgment.
    ///
    /// Returns the ack error (null on success) and the frames that arrived
    /// before the ack.
    pub async fn call(&mut self, event: &str, data: Value) -> (Value, Vec<Value>) {
        let id = self.next_ack;
        self.next_ack += 1;

        let frame = json!({"event": event, "data": data, "ack": id});
        self.send_raw(&frame.to_string()).await;

        let mut before = Vec::new();
        loop {
            let frame = self.recv().await;
            if frame["event"] == "ack" && frame["data"]["id"] == id {
                return (frame["data"]["error"].clone(), before);
            }
            before.push(frame);
        }
    }

    /// Join a room, asserting success.
    pub async fn join(&mut self, username: &str, room: &str) -> Vec<Value> {
        let (error, frames) = self
            .call("join", json!({"username": username, "room": room}))
            .await;
        assert!(error.is_null(), "join failed: {error}");
        frames
    }

    /// Receive the next JSON frame.
    pub async fn recv(&mut self) -> Value {
        self.try_recv(DEFAULT_TIMEOUT)
            .await
            .expect("Timed out waiting for frame")
    }

    /// Receive the next JSON frame, or None if nothing arrives in time.
    pub async fn try_recv(&mut self, wait: Duration) -> Option<Value> {
        loop {
            let msg = timeout(wait, self.stream.next()).await.ok()??;
            match msg.expect("WebSocket error") {
                Message::Text(text) => {
                    return Some(serde_json::from_str(&text).expect("Invalid JSON frame"));
                }
                Message::Close(_) => return None,
                _ => continue,
            }
        }
    }

    /// Receive every frame that arrives before the connection goes quiet.
    pub async fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Some(frame) = self.try_recv(QUIET_PERIOD).await {
            frames.push(frame);
        }
        frames
    }

    /// Close the connection.
    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

/// Texts of the `message` frames in order.
pub fn message_texts(frames: &[Value]) -> Vec<String> {
    frames
        .iter()
        .filter(|f| f["event"] == "message")
        .map(|f| f["data"]["text"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Usernames of the last `roomData` frame.
pub fn last_roster(frames: &[Value]) -> Vec<String> {
    let data = frames
        .iter()
        .rev()
        .find(|f| f["event"] == "roomData")
        .expect("No roomData frame");
    data["data"]["users"]
        .as_array()
        .expect("users is not an array")
        .iter()
        .map(|u| u["username"].as_str().unwrap_or_default().to_string())
        .collect()
}
