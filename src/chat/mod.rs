//! Chat module for chatrelay.
//!
//! This module provides the room relay core:
//! - Registry of joined connections with per-room unique usernames
//! - Dispatcher turning client events into outbound deliveries
//! - Message payloads and the profanity filter

mod dispatcher;
mod error;
mod event;
mod message;
mod profanity;
mod registry;

pub use dispatcher::{Dispatch, Dispatcher, DispatcherSettings, Outbound, Target};
pub use error::ChatError;
pub use event::names as event_names;
pub use event::{ClientEvent, Coordinates, JoinRequest, ServerEvent};
pub use message::{
    generate_location_message, generate_message, map_url, LocationMessage, Message, RoomData,
};
pub use profanity::{ProfanityFilter, WordListFilter};
pub use registry::{normalize, ConnectionId, Registry, User};
