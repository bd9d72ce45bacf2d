//! The per-room trivia game core.
//!
//! A [`GameRoom`] is one isolated game instance: roster, frozen
//! question snapshot, answer ledger, timers-in-spirit. This crate is
//! deliberately pure, with no clocks and no I/O. Every lifecycle
//! transition takes the current `Instant` as an argument and returns a
//! list of [`Effect`]s (events to fan out, timers to arm or cancel)
//! that the engine interprets. That keeps the whole state machine
//! testable without an async runtime.
//!
//! # Lifecycle
//!
//! ```text
//! waiting ──start──▶ waiting ──advance──▶ question ──reveal──▶ answer
//!                      ▲                     ▲                   │
//!                      │reset                └──advance (next)───┤
//!                      │                                         ▼
//!                   finished ◀──────advance (round exhausted)────┘
//! ```

mod effect;
mod error;
mod lifecycle;
mod player;
mod room;
mod score;

pub use effect::{Audience, AutoPlayStep, Effect};
pub use error::GameError;
pub use player::{AnswerRecord, Player};
pub use room::{AnswerEntry, GameRoom, RoomSettings};
pub use score::{MAX_POINTS_PER_QUESTION, leaderboard, points_for_latency};
