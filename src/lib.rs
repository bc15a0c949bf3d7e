//! chatrelay - room-based real-time chat relay
//!
//! Clients join named rooms over WebSocket, exchange text messages and
//! location shares, and receive a live roster of room occupants.

pub mod chat;
pub mod config;
pub mod error;
pub mod logging;
pub mod web;

pub use chat::{ChatError, ConnectionId, Dispatcher, Registry, User};
pub use config::Config;
pub use error::{RelayError, Result};
pub use web::ws::ChatRelay;
pub use web::ChatServer;
