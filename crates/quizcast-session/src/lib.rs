//! The session layer: who is connected, as what, and to which room.
//!
//! Three concerns live here, all synchronous and owned by the engine's
//! single task (plain `HashMap`s, no locks):
//!
//! - [`Presence`]: the registry of live connections and their role
//!   (player, admin, or stadium display) within a room.
//! - [`HoldingArea`]: parked state of recently disconnected players,
//!   keyed by normalized name, reclaimable within a grace period.
//! - [`identity`]: join-time name and photo validation.

mod error;
mod holding;
mod presence;

pub mod identity;

pub use error::SessionError;
pub use holding::{HoldingArea, name_key};
pub use presence::{Presence, Role};

/// Timeouts and limits for the session layer.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a disconnected player's state stays reclaimable.
    pub reconnect_grace_secs: u64,
    /// How often the engine sweeps the holding area.
    pub sweep_interval_secs: u64,
    /// Longest accepted display name, in characters.
    pub max_name_chars: usize,
    /// Largest accepted encoded player photo, in bytes.
    pub max_photo_bytes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_grace_secs: 300,
            sweep_interval_secs: 600,
            max_name_chars: 20,
            max_photo_bytes: 70_000,
        }
    }
}
