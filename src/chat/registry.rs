//! In-memory registry of joined connections.
//!
//! The registry maps each live connection to the user it joined as and
//! answers roster queries. Usernames and rooms are trimmed and lowercased
//! on admission, so both uniqueness and room matching are case-insensitive.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::ChatError;

/// Opaque identifier of a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Create a new random connection ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user that has joined a room.
///
/// Serializes as `{username, room}`; the connection ID stays server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Connection this user belongs to.
    #[serde(skip)]
    pub connection_id: ConnectionId,
    /// Normalized username.
    pub username: String,
    /// Normalized room name.
    pub room: String,
}

/// Normalize a username or room name for storage and comparison.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Registry of joined users, kept in insertion order.
#[derive(Debug, Default)]
pub struct Registry {
    users: Vec<User>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a connection into a room.
    ///
    /// Fails without touching the registry if the username or room is blank,
    /// if the username is taken in that room, or if the connection has
    /// already joined.
    pub fn add_user(
        &mut self,
        connection_id: ConnectionId,
        username: &str,
        room: &str,
    ) -> Result<User, ChatError> {
        let username = normalize(username);
        let room = normalize(room);

        if username.is_empty() || room.is_empty() {
            return Err(ChatError::Validation);
        }

        if self
            .users
            .iter()
            .any(|u| u.room == room && u.username == username)
        {
            return Err(ChatError::DuplicateUsername);
        }

        if self.get_user(connection_id).is_some() {
            return Err(ChatError::AlreadyJoined);
        }

        let user = User {
            connection_id,
            username,
            room,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    /// Remove the user for a connection, returning it if present.
    pub fn remove_user(&mut self, connection_id: ConnectionId) -> Option<User> {
        let index = self
            .users
            .iter()
            .position(|u| u.connection_id == connection_id)?;
        Some(self.users.remove(index))
    }

    /// Look up the user for a connection.
    pub fn get_user(&self, connection_id: ConnectionId) -> Option<&User> {
        self.users.iter().find(|u| u.connection_id == connection_id)
    }

    /// All users in a room, in the order they joined.
    pub fn get_users_in_room(&self, room: &str) -> Vec<User> {
        let room = normalize(room);
        self.users
            .iter()
            .filter(|u| u.room == room)
            .cloned()
            .collect()
    }

    /// Distinct rooms that currently have at least one user.
    pub fn rooms(&self) -> Vec<String> {
        let mut rooms: Vec<String> = Vec::new();
        for user in &self.users {
            if !rooms.contains(&user.room) {
                rooms.push(user.room.clone());
            }
        }
        rooms
    }

    /// Number of joined users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no user has joined.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
