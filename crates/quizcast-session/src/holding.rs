//! The holding area: parked state of recently disconnected players.
//!
//! A dropped connection doesn't lose a player's score. Their record is
//! parked here under `(room, normalized name)` and handed back to the
//! next join with the same name in the same room, as long as the
//! reconnection grace period hasn't elapsed. Stale entries are removed
//! lazily on reclaim and in bulk by the periodic sweep.
//!
//! Generic over the parked payload so the game's `Player` type doesn't
//! leak into this crate.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use quizcast_protocol::RoomId;

/// Normalizes a display name into a reclaim key. Matching is
/// case-insensitive so "Ana" reclaims "ana".
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

struct Parked<P> {
    payload: P,
    since: Instant,
}

/// Per-room parking lot for disconnected players' state.
pub struct HoldingArea<P> {
    grace: Duration,
    parked: HashMap<(RoomId, String), Parked<P>>,
}

impl<P> HoldingArea<P> {
    pub fn new(grace_secs: u64) -> Self {
        Self {
            grace: Duration::from_secs(grace_secs),
            parked: HashMap::new(),
        }
    }

    /// Parks a payload under the player's normalized name. A previous
    /// entry under the same key is replaced; the newest disconnect
    /// wins.
    pub fn stash(&mut self, room: RoomId, name: &str, payload: P, now: Instant) {
        let key = name_key(name);
        tracing::debug!(%room, name = %key, "player state parked");
        self.parked
            .insert((room, key), Parked { payload, since: now });
    }

    /// Takes back a parked payload if one exists and is still within
    /// the grace period. An expired entry is dropped on the spot.
    pub fn reclaim(&mut self, room: RoomId, name: &str, now: Instant) -> Option<P> {
        let key = (room, name_key(name));
        let entry = self.parked.get(&key)?;
        if now.duration_since(entry.since) > self.grace {
            self.parked.remove(&key);
            tracing::debug!(%room, name = %key.1, "parked state expired on reclaim");
            return None;
        }
        let entry = self.parked.remove(&key)?;
        tracing::info!(%room, name = %key.1, "player state reclaimed");
        Some(entry.payload)
    }

    /// Drops every entry older than the grace period. Returns how many
    /// were removed.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let grace = self.grace;
        let before = self.parked.len();
        self.parked
            .retain(|_, entry| now.duration_since(entry.since) <= grace);
        let removed = before - self.parked.len();
        if removed > 0 {
            tracing::info!(removed, remaining = self.parked.len(), "holding area swept");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.parked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reclaim_within_grace_returns_payload() {
        let mut area = HoldingArea::new(300);
        let now = Instant::now();
        area.stash(RoomId(1), "Ana", 42u32, now);

        let later = now + Duration::from_secs(299);
        assert_eq!(area.reclaim(RoomId(1), "ANA", later), Some(42));
        // Reclaim consumes the entry.
        assert_eq!(area.reclaim(RoomId(1), "Ana", later), None);
    }

    #[test]
    fn test_reclaim_after_grace_drops_entry() {
        let mut area = HoldingArea::new(300);
        let now = Instant::now();
        area.stash(RoomId(1), "Ana", 42u32, now);

        let late = now + Duration::from_secs(301);
        assert_eq!(area.reclaim(RoomId(1), "Ana", late), None);
        assert!(area.is_empty());
    }

    #[test]
    fn test_reclaim_is_scoped_to_the_room() {
        let mut area = HoldingArea::new(300);
        let now = Instant::now();
        area.stash(RoomId(1), "Ana", 42u32, now);
        assert_eq!(area.reclaim(RoomId(2), "Ana", now), None);
        assert_eq!(area.reclaim(RoomId(1), "Ana", now), Some(42));
    }

    #[test]
    fn test_newest_stash_replaces_older_entry() {
        let mut area = HoldingArea::new(300);
        let now = Instant::now();
        area.stash(RoomId(1), "Ana", 1u32, now);
        area.stash(RoomId(1), "ana ", 2u32, now + Duration::from_secs(1));
        assert_eq!(area.reclaim(RoomId(1), "Ana", now + Duration::from_secs(2)), Some(2));
    }

    #[test]
    fn test_sweep_removes_only_expired_entries() {
        let mut area = HoldingArea::new(300);
        let now = Instant::now();
        area.stash(RoomId(1), "old", 1u32, now);
        area.stash(RoomId(1), "fresh", 2u32, now + Duration::from_secs(200));

        let removed = area.sweep(now + Duration::from_secs(350));
        assert_eq!(removed, 1);
        assert_eq!(area.len(), 1);
        assert_eq!(
            area.reclaim(RoomId(1), "fresh", now + Duration::from_secs(360)),
            Some(2)
        );
    }
}
