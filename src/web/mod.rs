//! Web module for chatrelay.
//!
//! This module provides the HTTP server hosting the WebSocket relay and
//! the public directory of the browser client.

pub mod router;
pub mod server;
pub mod ws;

pub use router::create_router;
pub use server::ChatServer;
