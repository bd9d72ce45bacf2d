//! Error types for the session layer.

use quizcast_protocol::ConnId;

use crate::Role;

/// Errors surfaced to a client as an `error_notice`.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The connection is already registered under a different role.
    /// A socket is exactly one of player, admin, or display for its
    /// whole lifetime.
    #[error("connection {conn} is already registered as {existing}")]
    RoleConflict { conn: ConnId, existing: Role },

    /// The display name was empty after trimming.
    #[error("a display name is required")]
    NameRequired,

    /// The encoded photo exceeded the configured byte cap.
    #[error("photo too large: {size} bytes (limit {limit})")]
    PhotoTooLarge { size: usize, limit: usize },
}
