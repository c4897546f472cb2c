//! Connection registry for per-room fan-out.
//!
//! All state sits behind one `RwLock`. It is only held to snapshot or mutate the
//! maps, never across a delivery, so a stalled peer cannot block registration or
//! broadcasts to other rooms.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use futures_util::future::join_all;

use crate::domain::{Connection, ConnectionId, Message, RoomId};

#[derive(Default)]
struct Subscriptions {
    /// Room → its live connections. A room key exists only while it has subscribers.
    rooms: HashMap<RoomId, HashMap<ConnectionId, Arc<dyn Connection>>>,
    /// Connection → the one room it is subscribed to
    memberships: HashMap<ConnectionId, RoomId>,
}

impl Subscriptions {
    fn remove(&mut self, room_id: RoomId, connection_id: ConnectionId) -> bool {
        let Some(members) = self.rooms.get_mut(&room_id) else {
            return false;
        };
        if members.remove(&connection_id).is_none() {
            return false;
        }
        if members.is_empty() {
            self.rooms.remove(&room_id);
        }
        self.memberships.remove(&connection_id);
        true
    }
}

/// Outcome of one [`ConnectionRegistry::broadcast`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections the message was handed to
    pub delivered: usize,
    /// Connections that failed and were closed and unsubscribed
    pub failed: usize,
}

/// Registry of live subscriptions, keyed by room
#[derive(Default)]
pub struct ConnectionRegistry {
    inner: RwLock<Subscriptions>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock still holds consistent maps: every mutation is a single
    // insert/remove pair, so recover the guard instead of propagating the panic.
    fn read(&self) -> RwLockReadGuard<'_, Subscriptions> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Subscriptions> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `connection` under `room_id`.
    ///
    /// Re-subscribing the same pair is a no-op. A connection already registered
    /// under another room is moved, so it is never in two rooms at once.
    pub fn subscribe(&self, room_id: RoomId, connection: Arc<dyn Connection>) {
        let connection_id = connection.id();
        let mut subs = self.write();

        match subs.memberships.get(&connection_id).copied() {
            Some(current) if current == room_id => return,
            Some(previous) => {
                tracing::warn!(
                    "Connection {} moved from room {} to room {}",
                    connection_id,
                    previous,
                    room_id
                );
                subs.remove(previous, connection_id);
            }
            None => {}
        }

        subs.rooms
            .entry(room_id)
            .or_default()
            .insert(connection_id, connection);
        subs.memberships.insert(connection_id, room_id);
        tracing::debug!("Connection {} subscribed to room {}", connection_id, room_id);
    }

    /// Remove `connection_id` from `room_id`.
    ///
    /// Unknown rooms or connections are ignored. Returns whether anything was removed.
    pub fn unsubscribe(&self, room_id: RoomId, connection_id: ConnectionId) -> bool {
        let removed = self.write().remove(room_id, connection_id);
        if removed {
            tracing::debug!(
                "Connection {} unsubscribed from room {}",
                connection_id,
                room_id
            );
        }
        removed
    }

    /// Deliver `message` to every connection subscribed to `room_id`.
    ///
    /// Targets are a point-in-time snapshot taken under the read lock; deliveries
    /// run concurrently with no lock held. A failing connection is closed and
    /// removed before this returns, and never affects delivery to the others.
    pub async fn broadcast(&self, room_id: RoomId, message: &Message) -> BroadcastReport {
        let targets: Vec<Arc<dyn Connection>> = match self.read().rooms.get(&room_id) {
            Some(members) => members.values().cloned().collect(),
            None => return BroadcastReport::default(),
        };

        let results = join_all(targets.iter().map(|connection| async move {
            (connection, connection.send(message).await)
        }))
        .await;

        let mut report = BroadcastReport::default();
        let mut failed = Vec::new();
        for (connection, result) in results {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to deliver message {} to connection {}: {}",
                        message.id,
                        connection.id(),
                        e
                    );
                    connection.close();
                    failed.push(connection.id());
                }
            }
        }

        if !failed.is_empty() {
            let mut subs = self.write();
            for connection_id in &failed {
                subs.remove(room_id, *connection_id);
            }
        }
        report.failed = failed.len();

        tracing::debug!(
            "Broadcast message {} to room {}: {} delivered, {} failed",
            message.id,
            room_id,
            report.delivered,
            report.failed
        );
        report
    }

    /// Connection ids currently subscribed to `room_id`
    pub fn subscribers(&self, room_id: RoomId) -> Vec<ConnectionId> {
        self.read()
            .rooms
            .get(&room_id)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Room a connection is subscribed to, if any
    #[cfg(test)]
    pub(crate) fn room_of(&self, connection_id: ConnectionId) -> Option<RoomId> {
        self.read().memberships.get(&connection_id).copied()
    }

    /// Number of rooms with at least one subscriber
    pub fn room_count(&self) -> usize {
        self.read().rooms.len()
    }

    /// Number of live subscriptions across all rooms
    pub fn connection_count(&self) -> usize {
        self.read().memberships.len()
    }
}
