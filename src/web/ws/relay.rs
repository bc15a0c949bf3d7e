//! Shared relay state.
//!
//! `ChatRelay` serializes every connection event through a single lock so
//! the registry has exactly one writer at a time. Deliveries are queued
//! while the lock is held, which keeps per-room ordering identical to
//! handling order.

use tokio::sync::{mpsc, Mutex};

use crate::chat::{ChatError, ClientEvent, ConnectionId, Dispatcher, User};
use crate::config::ChatConfig;

use super::hub::ConnectionHub;
use super::messages::ServerFrame;

struct RelayInner {
    dispatcher: Dispatcher,
    hub: ConnectionHub,
}

/// Relay shared by all WebSocket connections.
pub struct ChatRelay {
    inner: Mutex<RelayInner>,
}

impl ChatRelay {
    /// Create a relay around a dispatcher.
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            inner: Mutex::new(RelayInner {
                dispatcher,
                hub: ConnectionHub::new(),
            }),
        }
    }

    /// Create a relay from chat configuration.
    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(Dispatcher::from_config(config))
    }

    /// Register a new connection.
    pub async fn connect(&self) -> (ConnectionId, mpsc::UnboundedReceiver<ServerFrame>) {
        let id = ConnectionId::new();
        let rx = self.inner.lock().await.hub.register(id);
        (id, rx)
    }

    /// Handle a client event and perform its deliveries.
    ///
    /// Returns the acknowledgment result for the sender.
    pub async fn handle(&self, id: ConnectionId, event: ClientEvent) -> Result<(), ChatError> {
        let mut inner = self.inner.lock().await;
        let dispatch = inner.dispatcher.dispatch(id, event);
        inner.hub.apply(dispatch.outbound);
        dispatch.ack
    }

    /// Queue a frame for a single connection.
    pub async fn send_to(&self, id: ConnectionId, frame: ServerFrame) -> bool {
        self.inner.lock().await.hub.send(id, frame)
    }

    /// Remove a connection and notify its room.
    ///
    /// Calling this twice for the same connection is harmless.
    pub async fn disconnect(&self, id: ConnectionId) {
        let mut inner = self.inner.lock().await;
        inner.hub.unregister(id);
        let outbound = inner.dispatcher.disconnect(id);
        inner.hub.apply(outbound);
    }

    /// Current roster of a room.
    pub async fn users_in_room(&self, room: &str) -> Vec<User> {
        self.inner
            .lock()
            .await
            .dispatcher
            .registry()
            .get_users_in_room(room)
    }

    /// Number of open connections, joined or not.
    pub async fn connection_count(&self) -> usize {
        self.inner.lock().await.hub.connection_count()
    }
}
