//! Outbound chat payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::registry::User;

/// A text message delivered to a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Sender's username.
    pub username: String,
    /// Message text.
    pub text: String,
    /// Creation time, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// A shared location delivered to a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMessage {
    /// Sender's username.
    pub username: String,
    /// Link to the location on a map.
    #[serde(rename = "locationURL")]
    pub location_url: String,
    /// Creation time, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Roster snapshot of a room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomData {
    /// Room name.
    pub room: String,
    /// Users currently in the room.
    pub users: Vec<User>,
}

/// Build a message stamped with the current time.
pub fn generate_message(username: impl Into<String>, text: impl Into<String>) -> Message {
    Message {
        username: username.into(),
        text: text.into(),
        created_at: Utc::now(),
    }
}

/// Build a location message stamped with the current time.
pub fn generate_location_message(
    username: impl Into<String>,
    url: impl Into<String>,
) -> LocationMessage {
    LocationMessage {
        username: username.into(),
        location_url: url.into(),
        created_at: Utc::now(),
    }
}

/// Map link for a coordinate pair: `https://<host>/maps?q=<lat>,<lon>`.
pub fn map_url(maps_host: &str, latitude: f64, longitude: f64) -> String {
    format!("https://{maps_host}/maps?q={latitude},{longitude}")
}
