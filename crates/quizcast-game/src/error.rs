//! Error types for the game core.
//!
//! These are precondition failures: reported to the originating
//! connection only, with the room left untouched. Best-effort realtime
//! noise (duplicate answers, out-of-phase submissions) is *not* an
//! error; those paths return empty effect lists instead.

use quizcast_protocol::RoomStatus;

/// A rejected lifecycle transition.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// `start` requires at least one active question in the catalog.
    #[error("no active questions: activate at least one question first")]
    NoActiveQuestions,

    /// The operation needs a started round and none exists.
    #[error("round has not been started")]
    NotStarted,

    /// The room's status doesn't permit this transition.
    #[error("{op} is not valid while the room is in '{status}'")]
    OutOfPhase {
        op: &'static str,
        status: RoomStatus,
    },
}
