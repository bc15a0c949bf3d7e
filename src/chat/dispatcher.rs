//! Event dispatcher for chat connections.
//!
//! The dispatcher binds registry operations to connection events and
//! decides who receives what. It performs no I/O: every handler returns
//! the acknowledgment result together with the outbound actions the
//! transport must carry out, in order.

use tracing::{debug, info};

use crate::config::ChatConfig;

use super::error::ChatError;
use super::event::{ClientEvent, Coordinates, JoinRequest, ServerEvent};
use super::message::{generate_location_message, generate_message, map_url, RoomData};
use super::profanity::{ProfanityFilter, WordListFilter};
use super::registry::{ConnectionId, Registry};

/// Recipients of an outbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single connection.
    Connection(ConnectionId),
    /// Every connection in a room.
    Room(String),
    /// Every connection in a room except one.
    RoomExcept {
        /// Room name.
        room: String,
        /// Connection to skip.
        except: ConnectionId,
    },
    /// Every live connection.
    Everyone,
}

/// An action the transport must perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Add a connection to a room's broadcast group.
    JoinGroup {
        /// Connection joining.
        connection: ConnectionId,
        /// Room name.
        room: String,
    },
    /// Deliver an event.
    Send {
        /// Recipients.
        target: Target,
        /// Event to deliver.
        event: ServerEvent,
    },
}

impl Outbound {
    fn send(target: Target, event: ServerEvent) -> Self {
        Outbound::Send { target, event }
    }
}

/// Result of handling a client event.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    /// Acknowledgment for the sender.
    pub ack: Result<(), ChatError>,
    /// Actions to perform, in order.
    pub outbound: Vec<Outbound>,
}

impl Dispatch {
    fn ok(outbound: Vec<Outbound>) -> Self {
        Self {
            ack: Ok(()),
            outbound,
        }
    }

    fn rejected(error: ChatError) -> Self {
        Self {
            ack: Err(error),
            outbound: Vec::new(),
        }
    }
}

/// Text and links used when building notices.
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    /// Sender name of system notices.
    pub admin_name: String,
    /// Notice sent to a connection after it joins.
    pub welcome_message: String,
    /// Host of location links.
    pub maps_host: String,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

impl From<&ChatConfig> for DispatcherSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            admin_name: config.admin_name.clone(),
            welcome_message: config.welcome_message.clone(),
            maps_host: config.maps_host.clone(),
        }
    }
}

/// Dispatcher owning the registry.
pub struct Dispatcher {
    registry: Registry,
    filter: Box<dyn ProfanityFilter>,
    settings: DispatcherSettings,
}

impl Dispatcher {
    /// Create a dispatcher with an empty registry.
    pub fn new(filter: Box<dyn ProfanityFilter>, settings: DispatcherSettings) -> Self {
        Self::with_registry(Registry::new(), filter, settings)
    }

    /// Create a dispatcher over an existing registry.
    pub fn with_registry(
        registry: Registry,
        filter: Box<dyn ProfanityFilter>,
        settings: DispatcherSettings,
    ) -> Self {
        Self {
            registry,
            filter,
            settings,
        }
    }

    /// Create a dispatcher from chat configuration, using the built-in
    /// word list adjusted by the configured additions and removals.
    pub fn from_config(config: &ChatConfig) -> Self {
        let mut filter = WordListFilter::new();
        filter.add_words(&config.blocked_words);
        filter.remove_words(&config.allowed_words);
        Self::new(Box::new(filter), DispatcherSettings::from(config))
    }

    /// The registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle a client event.
    pub fn dispatch(&mut self, connection: ConnectionId, event: ClientEvent) -> Dispatch {
        match event {
            ClientEvent::Join(request) => self.join(connection, request),
            ClientEvent::SendMessage(text) => self.send_message(connection, text),
            ClientEvent::SendLocation(coords) => self.send_location(connection, coords),
        }
    }

    /// Handle a join request.
    pub fn join(&mut self, connection: ConnectionId, request: JoinRequest) -> Dispatch {
        let user = match self
            .registry
            .add_user(connection, &request.username, &request.room)
        {
            Ok(user) => user,
            Err(e) => {
                debug!(%connection, error = %e, "Join rejected");
                return Dispatch::rejected(e);
            }
        };

        info!(%connection, username = %user.username, room = %user.room, "User joined");

        let admin = &self.settings.admin_name;
        Dispatch::ok(vec![
            Outbound::JoinGroup {
                connection,
                room: user.room.clone(),
            },
            Outbound::send(
                Target::Connection(connection),
                ServerEvent::Message(generate_message(admin, &self.settings.welcome_message)),
            ),
            Outbound::send(
                Target::RoomExcept {
                    room: user.room.clone(),
                    except: connection,
                },
                ServerEvent::Message(generate_message(
                    admin,
                    format!("{} has joined!", user.username),
                )),
            ),
            Outbound::send(Target::Room(user.room.clone()), self.room_data(&user.room)),
        ])
    }

    /// Handle a text message.
    ///
    /// A sender that has not joined is silently ignored but still
    /// acknowledged.
    pub fn send_message(&mut self, connection: ConnectionId, text: String) -> Dispatch {
        if self.filter.is_profane(&text) {
            debug!(%connection, "Message rejected by profanity filter");
            return Dispatch::rejected(ChatError::ProfanityRejected);
        }

        let Some(user) = self.registry.get_user(connection) else {
            debug!(%connection, "Message from connection without a room dropped");
            return Dispatch::ok(Vec::new());
        };

        Dispatch::ok(vec![Outbound::send(
            Target::Room(user.room.clone()),
            ServerEvent::Message(generate_message(&user.username, text)),
        )])
    }

    /// Handle a location share.
    pub fn send_location(&mut self, connection: ConnectionId, coords: Coordinates) -> Dispatch {
        let Some(user) = self.registry.get_user(connection) else {
            debug!(%connection, "Location from connection without a room dropped");
            return Dispatch::ok(Vec::new());
        };

        let url = map_url(&self.settings.maps_host, coords.latitude, coords.longitude);
        Dispatch::ok(vec![Outbound::send(
            Target::Room(user.room.clone()),
            ServerEvent::LocationMessage(generate_location_message(&user.username, url)),
        )])
    }

    /// Handle a closed connection.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Vec<Outbound> {
        let Some(user) = self.registry.remove_user(connection) else {
            return Vec::new();
        };

        info!(%connection, username = %user.username, room = %user.room, "User left");

        vec![
            Outbound::send(
                Target::Room(user.room.clone()),
                ServerEvent::Message(generate_message(
                    &self.settings.admin_name,
                    format!("{} has left!", user.username),
                )),
            ),
            Outbound::send(Target::Room(user.room.clone()), self.room_data(&user.room)),
        ]
    }

    fn room_data(&self, room: &str) -> ServerEvent {
        ServerEvent::RoomData(RoomData {
            room: room.to_string(),
            users: self.registry.get_users_in_room(room),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Message;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(
            Box::new(WordListFilter::from_words(["badword"])),
            DispatcherSettings::default(),
        )
    }

    fn join_request(username: &str, room: &str) -> JoinRequest {
        JoinRequest {
            username: username.to_string(),
            room: room.to_string(),
        }
    }

    fn message_of(outbound: &Outbound) -> (&Target, &Message) {
        match outbound {
            Outbound::Send {
                target,
                event: ServerEvent::Message(msg),
            } => (target, msg),
            other => panic!("Expected message, got {other:?}"),
        }
    }

    fn room_data_of(outbound: &Outbound) -> (&Target, &RoomData) {
        match outbound {
            Outbound::Send {
                target,
                event: ServerEvent::RoomData(data),
            } => (target, data),
            other => panic!("Expected roomData, got {other:?}"),
        }
    }

    #[test]
    fn test_join_success() {
        let mut d = dispatcher();
        let a = ConnectionId::new();

        let result = d.join(a, join_request("Alice", "Office"));
        assert_eq!(result.ack, Ok(()));
        assert_eq!(result.outbound.len(), 4);

        assert_eq!(
            result.outbound[0],
            Outbound::JoinGroup {
                connection: a,
                room: "office".to_string()
            }
        );

        let (target, welcome) = message_of(&result.outbound[1]);
        assert_eq!(target, &Target::Connection(a));
        assert_eq!(welcome.username, "Admin");
        assert_eq!(welcome.text, "Welcome!");

        let (target, joined) = message_of(&result.outbound[2]);
        assert_eq!(
            target,
            &Target::RoomExcept {
                room: "office".to_string(),
                except: a
            }
        );
        assert_eq!(joined.text, "alice has joined!");

        let (target, data) = room_data_of(&result.outbound[3]);
        assert_eq!(target, &Target::Room("office".to_string()));
        assert_eq!(data.room, "office");
        assert_eq!(data.users.len(), 1);
        assert_eq!(data.users[0].username, "alice");

        assert_eq!(d.registry().len(), 1);
    }

    #[test]
    fn test_join_duplicate_username() {
        let mut d = dispatcher();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        d.join(a, join_request("alice", "office"));

        let result = d.join(b, join_request("ALICE", "office"));
        assert_eq!(result.ack, Err(ChatError::DuplicateUsername));
        assert!(result.outbound.is_empty());

        let users = d.registry().get_users_in_room("office");
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].connection_id, a);
    }

    #[test]
    fn test_join_blank_fields() {
        let mut d = dispatcher();
        let result = d.join(ConnectionId::new(), join_request("  ", "office"));
        assert_eq!(result.ack, Err(ChatError::Validation));
        assert!(result.outbound.is_empty());
        assert!(d.registry().is_empty());
    }

    #[test]
    fn test_roster_lists_everyone_in_room() {
        let mut d = dispatcher();
        d.join(ConnectionId::new(), join_request("alice", "office"));
        d.join(ConnectionId::new(), join_request("carol", "lobby"));
        let result = d.join(ConnectionId::new(), join_request("bob", "office"));

        let (_, data) = room_data_of(&result.outbound[3]);
        let names: Vec<&str> = data.users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_send_message() {
        let mut d = dispatcher();
        let a = ConnectionId::new();
        d.join(a, join_request("alice", "office"));

        let result = d.send_message(a, "hello".to_string());
        assert_eq!(result.ack, Ok(()));
        assert_eq!(result.outbound.len(), 1);

        let (target, msg) = message_of(&result.outbound[0]);
        assert_eq!(target, &Target::Room("office".to_string()));
        assert_eq!(msg.username, "alice");
        assert_eq!(msg.text, "hello");
    }

    #[test]
    fn test_send_message_profane() {
        let mut d = dispatcher();
        let a = ConnectionId::new();
        d.join(a, join_request("alice", "office"));

        let result = d.send_message(a, "you BADWORD".to_string());
        assert_eq!(result.ack, Err(ChatError::ProfanityRejected));
        assert!(result.outbound.is_empty());
    }

    #[test]
    fn test_send_message_before_join_is_acknowledged() {
        let mut d = dispatcher();
        let result = d.send_message(ConnectionId::new(), "hello".to_string());
        assert_eq!(result.ack, Ok(()));
        assert!(result.outbound.is_empty());
    }

    #[test]
    fn test_send_location() {
        let mut d = dispatcher();
        let a = ConnectionId::new();
        d.join(a, join_request("alice", "office"));

        let result = d.send_location(
            a,
            Coordinates {
                latitude: 35.6812,
                longitude: 139.7671,
            },
        );
        assert_eq!(result.ack, Ok(()));
        match &result.outbound[0] {
            Outbound::Send {
                target,
                event: ServerEvent::LocationMessage(loc),
            } => {
                assert_eq!(target, &Target::Room("office".to_string()));
                assert_eq!(loc.username, "alice");
                assert_eq!(loc.location_url, "https://google.com/maps?q=35.6812,139.7671");
            }
            other => panic!("Expected locationMessage, got {other:?}"),
        }
    }

    #[test]
    fn test_send_location_custom_host() {
        let config = ChatConfig {
            maps_host: "maps.example.org".to_string(),
            ..ChatConfig::default()
        };
        let mut d = Dispatcher::from_config(&config);
        let a = ConnectionId::new();
        d.join(a, join_request("alice", "office"));

        let result = d.send_location(
            a,
            Coordinates {
                latitude: 1.5,
                longitude: -2.25,
            },
        );
        match &result.outbound[0] {
            Outbound::Send {
                event: ServerEvent::LocationMessage(loc),
                ..
            } => assert_eq!(loc.location_url, "https://maps.example.org/maps?q=1.5,-2.25"),
            other => panic!("Expected locationMessage, got {other:?}"),
        }
    }

    #[test]
    fn test_send_location_before_join_is_acknowledged() {
        let mut d = dispatcher();
        let result = d.send_location(
            ConnectionId::new(),
            Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            },
        );
        assert_eq!(result.ack, Ok(()));
        assert!(result.outbound.is_empty());
    }

    #[test]
    fn test_disconnect() {
        let mut d = dispatcher();
        let a = ConnectionId::new();
        let b = ConnectionId::new();
        d.join(a, join_request("alice", "office"));
        d.join(b, join_request("bob", "office"));

        let outbound = d.disconnect(a);
        assert_eq!(outbound.len(), 2);

        let (target, left) = message_of(&outbound[0]);
        assert_eq!(target, &Target::Room("office".to_string()));
        assert_eq!(left.username, "Admin");
        assert_eq!(left.text, "alice has left!");

        let (_, data) = room_data_of(&outbound[1]);
        assert_eq!(data.users.len(), 1);
        assert_eq!(data.users[0].username, "bob");

        assert!(d.registry().get_user(a).is_none());
    }

    #[test]
    fn test_disconnect_twice_is_noop() {
        let mut d = dispatcher();
        let a = ConnectionId::new();
        d.join(a, join_request("alice", "office"));

        assert!(!d.disconnect(a).is_empty());
        assert!(d.disconnect(a).is_empty());
        assert!(d.registry().is_empty());
    }

    #[test]
    fn test_dispatch_routes_by_event() {
        let mut d = dispatcher();
        let a = ConnectionId::new();

        let result = d.dispatch(a, ClientEvent::Join(join_request("alice", "office")));
        assert_eq!(result.ack, Ok(()));

        let result = d.dispatch(a, ClientEvent::SendMessage("badword".to_string()));
        assert_eq!(result.ack, Err(ChatError::ProfanityRejected));
    }

    #[test]
    fn test_from_config_word_lists() {
        let config = ChatConfig {
            blocked_words: vec!["darn".to_string()],
            allowed_words: vec!["hell".to_string()],
            ..ChatConfig::default()
        };
        let mut d = Dispatcher::from_config(&config);
        let a = ConnectionId::new();
        d.join(a, join_request("alice", "office"));

        assert_eq!(
            d.send_message(a, "darn".to_string()).ack,
            Err(ChatError::ProfanityRejected)
        );
        assert_eq!(d.send_message(a, "what the hell".to_string()).ack, Ok(()));
    }
}
