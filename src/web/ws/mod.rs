//! WebSocket module for real-time communication.
//!
//! This module provides the transport side of the relay:
//! - JSON frame codec with acknowledgments
//! - Connection hub with room broadcast groups
//! - Shared relay state and the socket handler

pub mod chat;
pub mod hub;
pub mod messages;
pub mod relay;

pub use chat::chat_ws_handler;
pub use hub::ConnectionHub;
pub use messages::{ClientFrame, FrameError, ServerFrame};
pub use relay::ChatRelay;
