//! WebSocket frame types for chat communication.
//!
//! Every frame is a JSON object `{"event": ..., "data": ..., "ack": ...}`.
//! A client frame carrying an `ack` ID gets exactly one `ack` frame back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::{
    event_names, ChatError, ClientEvent, Coordinates, JoinRequest, LocationMessage, Message, RoomData,
    ServerEvent,
};

/// Errors decoding a client frame.
#[derive(Error, Debug)]
pub enum FrameError {
    /// The frame is not a JSON envelope.
    #[error("invalid frame: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The event name is not known.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// The payload does not match the event.
    #[error("invalid payload for {event}: {source}")]
    InvalidPayload {
        /// Event name.
        event: String,
        /// Decoding error.
        source: serde_json::Error,
    },
}

/// Frame sent from client to server.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientFrame {
    /// Event name.
    pub event: String,
    /// Event payload.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Acknowledgment ID, if the client wants one.
    #[serde(default)]
    pub ack: Option<u64>,
}

impl ClientFrame {
    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decode the payload according to the event name.
    pub fn to_event(&self) -> Result<ClientEvent, FrameError> {
        let data = self.data.clone();
        let invalid = |source: serde_json::Error| FrameError::InvalidPayload {
            event: self.event.clone(),
            source,
        };

        match self.event.as_str() {
            event_names::JOIN => serde_json::from_value::<JoinRequest>(data)
                .map(ClientEvent::Join)
                .map_err(invalid),
            event_names::SEND_MESSAGE => serde_json::from_value::<String>(data)
                .map(ClientEvent::SendMessage)
                .map_err(invalid),
            event_names::SEND_LOCATION => serde_json::from_value::<Coordinates>(data)
                .map(ClientEvent::SendLocation)
                .map_err(invalid),
            other => Err(FrameError::UnknownEvent(other.to_string())),
        }
    }
}

/// Payload of an `ack` frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AckPayload {
    /// ID from the client frame.
    pub id: u64,
    /// Error message, or null on success.
    pub error: Option<String>,
}

/// Payload of an `error` frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    /// Human-readable description.
    pub message: String,
}

/// Frame sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerFrame {
    /// Text message.
    Message(Message),
    /// Shared location.
    LocationMessage(LocationMessage),
    /// Room roster.
    RoomData(RoomData),
    /// Acknowledgment of a client frame.
    Ack(AckPayload),
    /// Frame could not be handled.
    Error(ErrorPayload),
}

impl ServerFrame {
    /// Create an acknowledgment frame from a handler result.
    pub fn ack(id: u64, result: &Result<(), ChatError>) -> Self {
        Self::Ack(AckPayload {
            id,
            error: result.as_ref().err().map(ToString::to_string),
        })
    }

    /// Create an acknowledgment carrying an error message.
    pub fn ack_error(id: u64, message: impl Into<String>) -> Self {
        Self::Ack(AckPayload {
            id,
            error: Some(message.into()),
        })
    }

    /// Create an error frame.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            message: message.into(),
        })
    }

    /// Serialize to JSON text.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<ServerEvent> for ServerFrame {
    fn from(event: ServerEvent) -> Self {
        match event {
            ServerEvent::Message(msg) => ServerFrame::Message(msg),
            ServerEvent::LocationMessage(loc) => ServerFrame::LocationMessage(loc),
            ServerEvent::RoomData(data) => ServerFrame::RoomData(data),
        }
    }
}
