//! The presence registry: every live connection, its role, and its room.
//!
//! This is the engine's routing table. Effects name an audience
//! ("players of room 2", "admins of room 1"); presence turns that into
//! a set of connection IDs. Both indexes are kept in sync: the flat
//! per-connection map for lookups and detach, and the per-room role
//! sets for fan-out.

use std::collections::{HashMap, HashSet};
use std::fmt;

use quizcast_protocol::{ConnId, RoomId};

use crate::SessionError;

/// What a connection is, for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A contestant; may submit answers.
    Player,
    /// A control panel; may drive the lifecycle and edit the catalog.
    Admin,
    /// A read-only stadium screen.
    Display,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Player => "player",
            Role::Admin => "admin",
            Role::Display => "display",
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Attachment {
    role: Role,
    room: RoomId,
}

#[derive(Default)]
struct RoomGroups {
    players: HashSet<ConnId>,
    admins: HashSet<ConnId>,
    displays: HashSet<ConnId>,
}

impl RoomGroups {
    fn set(&mut self, role: Role) -> &mut HashSet<ConnId> {
        match role {
            Role::Player => &mut self.players,
            Role::Admin => &mut self.admins,
            Role::Display => &mut self.displays,
        }
    }
}

/// Registry of live connections. Single-task owned, no interior locks.
#[derive(Default)]
pub struct Presence {
    conns: HashMap<ConnId, Attachment>,
    rooms: HashMap<RoomId, RoomGroups>,
}

impl Presence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection in a room under a role.
    ///
    /// Re-registering under the *same* role moves the connection to
    /// the new room atomically (the admin room switch). Re-registering
    /// under a different role is a protocol violation.
    ///
    /// # Errors
    /// [`SessionError::RoleConflict`] if the connection already holds
    /// a different role; the registry is left unchanged.
    pub fn register(
        &mut self,
        conn: ConnId,
        role: Role,
        room: RoomId,
    ) -> Result<(), SessionError> {
        if let Some(existing) = self.conns.get(&conn) {
            if existing.role != role {
                return Err(SessionError::RoleConflict {
                    conn,
                    existing: existing.role,
                });
            }
            if existing.room == room {
                return Ok(());
            }
            let old_room = existing.room;
            if let Some(groups) = self.rooms.get_mut(&old_room) {
                groups.set(role).remove(&conn);
            }
            tracing::debug!(%conn, %role, from = %old_room, to = %room, "moved rooms");
        }

        self.conns.insert(conn, Attachment { role, room });
        self.rooms.entry(room).or_default().set(role).insert(conn);
        Ok(())
    }

    /// Removes a connection, returning what it was. `None` for
    /// connections that never registered (closed before their first
    /// command, for example).
    pub fn detach(&mut self, conn: ConnId) -> Option<(Role, RoomId)> {
        let attachment = self.conns.remove(&conn)?;
        if let Some(groups) = self.rooms.get_mut(&attachment.room) {
            groups.set(attachment.role).remove(&conn);
        }
        Some((attachment.role, attachment.room))
    }

    pub fn lookup(&self, conn: ConnId) -> Option<(Role, RoomId)> {
        self.conns.get(&conn).map(|a| (a.role, a.room))
    }

    /// Connections of one role in one room, in no particular order.
    pub fn members(&self, room: RoomId, role: Role) -> impl Iterator<Item = ConnId> + '_ {
        self.rooms
            .get(&room)
            .into_iter()
            .flat_map(move |groups| match role {
                Role::Player => groups.players.iter(),
                Role::Admin => groups.admins.iter(),
                Role::Display => groups.displays.iter(),
            })
            .copied()
    }

    /// Every admin connection across all rooms. Catalog edits are
    /// global, so every admin panel gets them.
    pub fn all_admins(&self) -> impl Iterator<Item = ConnId> + '_ {
        self.rooms
            .values()
            .flat_map(|groups| groups.admins.iter())
            .copied()
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup_roundtrip() {
        let mut presence = Presence::new();
        presence
            .register(ConnId(1), Role::Player, RoomId(1))
            .unwrap();
        assert_eq!(presence.lookup(ConnId(1)), Some((Role::Player, RoomId(1))));
        assert_eq!(
            presence.members(RoomId(1), Role::Player).collect::<Vec<_>>(),
            vec![ConnId(1)]
        );
    }

    #[test]
    fn test_register_same_role_new_room_moves_the_connection() {
        let mut presence = Presence::new();
        presence
            .register(ConnId(7), Role::Admin, RoomId(1))
            .unwrap();
        presence
            .register(ConnId(7), Role::Admin, RoomId(3))
            .unwrap();

        assert_eq!(presence.lookup(ConnId(7)), Some((Role::Admin, RoomId(3))));
        assert_eq!(presence.members(RoomId(1), Role::Admin).count(), 0);
        assert_eq!(presence.members(RoomId(3), Role::Admin).count(), 1);
    }

    #[test]
    fn test_register_conflicting_role_is_rejected() {
        let mut presence = Presence::new();
        presence
            .register(ConnId(2), Role::Display, RoomId(1))
            .unwrap();
        let err = presence
            .register(ConnId(2), Role::Player, RoomId(1))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::RoleConflict {
                existing: Role::Display,
                ..
            }
        ));
        // The original registration survives.
        assert_eq!(presence.lookup(ConnId(2)), Some((Role::Display, RoomId(1))));
    }

    #[test]
    fn test_detach_removes_from_both_indexes() {
        let mut presence = Presence::new();
        presence
            .register(ConnId(1), Role::Player, RoomId(2))
            .unwrap();
        assert_eq!(presence.detach(ConnId(1)), Some((Role::Player, RoomId(2))));
        assert_eq!(presence.lookup(ConnId(1)), None);
        assert_eq!(presence.members(RoomId(2), Role::Player).count(), 0);
        assert_eq!(presence.detach(ConnId(1)), None);
    }

    #[test]
    fn test_all_admins_spans_rooms() {
        let mut presence = Presence::new();
        presence
            .register(ConnId(1), Role::Admin, RoomId(1))
            .unwrap();
        presence
            .register(ConnId(2), Role::Admin, RoomId(2))
            .unwrap();
        presence
            .register(ConnId(3), Role::Player, RoomId(1))
            .unwrap();
        let mut admins: Vec<_> = presence.all_admins().collect();
        admins.sort();
        assert_eq!(admins, vec![ConnId(1), ConnId(2)]);
    }
}
