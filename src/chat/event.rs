//! Events exchanged between clients and the dispatcher.

use serde::Deserialize;

use super::message::{LocationMessage, Message, RoomData};

/// Wire names of client events.
pub mod names {
    /// Join a room.
    pub const JOIN: &str = "join";
    /// Send a text message.
    pub const SEND_MESSAGE: &str = "sendMessage";
    /// Share a location.
    pub const SEND_LOCATION: &str = "sendLocation";
}

/// Payload of a `join` event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JoinRequest {
    /// Requested username.
    #[serde(default)]
    pub username: String,
    /// Requested room.
    #[serde(default)]
    pub room: String,
}

/// Payload of a `sendLocation` event.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// An event sent by a client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Join a room under a username.
    Join(JoinRequest),
    /// Send a text message to the current room.
    SendMessage(String),
    /// Share a location with the current room.
    SendLocation(Coordinates),
}

impl ClientEvent {
    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Join(_) => names::JOIN,
            ClientEvent::SendMessage(_) => names::SEND_MESSAGE,
            ClientEvent::SendLocation(_) => names::SEND_LOCATION,
        }
    }
}

/// An event delivered to clients.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Text message, including system notices.
    Message(Message),
    /// Shared location.
    LocationMessage(LocationMessage),
    /// Room roster.
    RoomData(RoomData),
}
