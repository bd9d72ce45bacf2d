//! Effects: what a lifecycle transition asks the engine to do.
//!
//! The game core never sends anything itself. Each transition returns
//! a `Vec<Effect>`; the engine fans the events out to the right
//! subscriber groups and manages the one cancellable timer handle each
//! room is allowed to have.

use std::time::Duration;

use quizcast_protocol::{ConnId, ServerEvent};

/// Who receives an event. Groups are always scoped to the room the
/// effect came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every player connection in the room.
    Players,
    /// Every admin connection of the room.
    Admins,
    /// Every stadium display of the room.
    Displays,
    /// One specific connection.
    Conn(ConnId),
}

/// What a fired auto-play timer should do. Revalidated against the
/// room's current state when the timer fires, never trusted blindly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoPlayStep {
    /// The post-start settle delay elapsed; show the first question.
    FirstQuestion,
    /// The post-reveal answer window elapsed; advance or finish.
    AdvanceOrFinish,
}

/// One instruction to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver an event to a subscriber group or single connection.
    Send(Audience, ServerEvent),
    /// Arm the one-second-granularity question countdown. Supersedes
    /// any pending timer for the room.
    StartCountdown { seconds: u64 },
    /// Arm the auto-play delay timer. Supersedes any pending timer.
    ScheduleAutoPlay { delay: Duration, step: AutoPlayStep },
    /// Cancel whatever timer is pending for the room, if any.
    CancelTimer,
    /// Cancel a pending auto-play timer only; an in-flight question
    /// countdown keeps running.
    CancelAutoPlay,
    /// The room changed in a way admins must re-sync. The engine
    /// composes the full admin snapshot because it owns the catalog
    /// half of that payload.
    AdminSync,
}

impl Effect {
    /// Shorthand for `Send` with less rightward drift at call sites.
    pub fn send(audience: Audience, event: ServerEvent) -> Self {
        Self::Send(audience, event)
    }
}
