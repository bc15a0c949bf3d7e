//! Connection hub: per-connection outbound queues and room groups.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::chat::{ConnectionId, Outbound, Target};

use super::messages::ServerFrame;

/// Outbound queues of live connections, grouped by room.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    /// Queues indexed by connection.
    connections: HashMap<ConnectionId, mpsc::UnboundedSender<ServerFrame>>,
    /// Broadcast groups: room name to members in join order.
    groups: HashMap<String, Vec<ConnectionId>>,
}

impl ConnectionHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the receiving end of its queue.
    pub fn register(&mut self, id: ConnectionId) -> mpsc::UnboundedReceiver<ServerFrame> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(id, tx);
        rx
    }

    /// Drop a connection and remove it from every group.
    pub fn unregister(&mut self, id: ConnectionId) {
        self.connections.remove(&id);
        self.groups.retain(|_, members| {
            members.retain(|m| *m != id);
            !members.is_empty()
        });
    }

    /// Add a connection to a room group.
    pub fn join_group(&mut self, id: ConnectionId, room: &str) {
        let members = self.groups.entry(room.to_string()).or_default();
        if !members.contains(&id) {
            members.push(id);
        }
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Members of a room group.
    pub fn group_members(&self, room: &str) -> &[ConnectionId] {
        self.groups.get(room).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a target to the connections it covers.
    pub fn resolve(&self, target: &Target) -> Vec<ConnectionId> {
        match target {
            Target::Connection(id) => {
                if self.connections.contains_key(id) {
                    vec![*id]
                } else {
                    Vec::new()
                }
            }
            Target::Room(room) => self.group_members(room).to_vec(),
            Target::RoomExcept { room, except } => self
                .group_members(room)
                .iter()
                .filter(|id| *id != except)
                .copied()
                .collect(),
            Target::Everyone => self.connections.keys().copied().collect(),
        }
    }

    /// Queue a frame for one connection.
    ///
    /// Returns false if the connection is gone.
    pub fn send(&self, id: ConnectionId, frame: ServerFrame) -> bool {
        match self.connections.get(&id) {
            Some(tx) => tx.send(frame).is_ok(),
            None => false,
        }
    }

    /// Carry out dispatcher actions.
    ///
    /// Returns the number of frames queued. A failed delivery to one
    /// connection does not stop the others.
    pub fn apply(&mut self, outbound: Vec<Outbound>) -> usize {
        let mut delivered = 0;
        for action in outbound {
            match action {
                Outbound::JoinGroup { connection, room } => self.join_group(connection, &room),
                Outbound::Send { target, event } => {
                    let frame = ServerFrame::from(event);
                    for id in self.resolve(&target) {
                        if self.send(id, frame.clone()) {
                            delivered += 1;
                        } else {
                            tracing::debug!(connection = %id, "Dropped frame for closed connection");
                        }
                    }
                }
            }
        }
        delivered
    }
}
