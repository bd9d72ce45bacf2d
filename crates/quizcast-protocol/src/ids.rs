//! Identifier newtypes shared by every layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A room identifier.
///
/// Rooms are a fixed, small set known at startup (the original
/// deployment ran four), so this is just a small integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room-{}", self.0)
    }
}

/// A connection identity, assigned by the transport layer.
///
/// One `ConnId` maps to exactly one live bidirectional connection. A
/// player who drops and rejoins comes back under a *new* `ConnId`; the
/// session layer is what ties the two together by display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnId(pub u64);

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&RoomId(3)).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn test_conn_id_round_trip() {
        let id: ConnId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ConnId(42));
        assert_eq!(id.to_string(), "C-42");
    }

    #[test]
    fn test_room_id_display() {
        assert_eq!(RoomId(1).to_string(), "room-1");
    }
}
