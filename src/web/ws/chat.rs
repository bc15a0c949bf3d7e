//! Chat WebSocket handler.
//!
//! This module bridges WebSocket connections to the relay: inbound text
//! frames become client events, queued server frames are written back.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;

use crate::chat::ConnectionId;

use super::messages::{ClientFrame, ServerFrame};
use super::relay::ChatRelay;

/// WebSocket chat handler.
///
/// GET /ws
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(relay): State<Arc<ChatRelay>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

/// Handle a WebSocket connection until either side closes it.
async fn handle_socket(socket: WebSocket, relay: Arc<ChatRelay>) {
    let (id, mut outbox) = relay.connect().await;
    tracing::info!(connection = %id, "New WebSocket connection");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Writer: drain the connection's queue into the socket
    let mut writer = tokio::spawn(async move {
        while let Some(frame) = outbox.recv().await {
            let json = match frame.to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!("Failed to serialize frame: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        handle_text(&relay, id, &text).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(connection = %id, "WebSocket closed by client");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(connection = %id, "WebSocket error: {}", e);
                        break;
                    }
                }
            }
            _ = &mut writer => {
                tracing::debug!(connection = %id, "WebSocket writer stopped");
                break;
            }
        }
    }

    relay.disconnect(id).await;
    writer.abort();
    tracing::info!(connection = %id, "WebSocket connection closed");
}

/// Decode a text frame, run it through the relay and acknowledge it.
async fn handle_text(relay: &ChatRelay, id: ConnectionId, text: &str) {
    let frame = match ClientFrame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(connection = %id, "Failed to parse client frame: {}", e);
            relay.send_to(id, ServerFrame::error(e.to_string())).await;
            return;
        }
    };

    let event = match frame.to_event() {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(connection = %id, "Rejected client frame: {}", e);
            let message = e.to_string();
            relay.send_to(id, ServerFrame::error(message.clone())).await;
            if let Some(ack_id) = frame.ack {
                relay.send_to(id, ServerFrame::ack_error(ack_id, message)).await;
            }
            return;
        }
    };

    tracing::trace!(connection = %id, event = event.name(), "Client event");
    let result = relay.handle(id, event).await;

    if let Some(ack_id) = frame.ack {
        relay.send_to(id, ServerFrame::ack(ack_id, &result)).await;
    }
}
