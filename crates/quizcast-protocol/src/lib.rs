//! Wire protocol for Quizcast.
//!
//! This crate defines the "language" the trivia server speaks with its
//! three client roles (players, admins, stadium displays):
//!
//! - **Identifiers** ([`RoomId`], [`ConnId`], [`QuestionId`]): newtype
//!   wrappers that travel on the wire as plain numbers.
//! - **Question model** ([`Question`], [`QuestionDraft`],
//!   [`LocalizedText`]): the catalog entries and their localized text.
//! - **Messages** ([`ClientCommand`], [`ServerEvent`]): every inbound
//!   command and outbound event, plus their payload structs.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages are
//!   converted to/from bytes.
//!
//! The protocol layer knows nothing about rooms or timers; it only
//! describes what travels between the engine and a connection.

mod codec;
mod error;
mod ids;
mod question;
mod text;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use ids::{ConnId, RoomId};
pub use question::{OPTION_COUNT, Question, QuestionDraft, QuestionId};
pub use text::LocalizedText;
pub use types::{
    AdminSnapshot, AnswerStats, ClientCommand, LeaderboardEntry, RoomStatus,
    SanitizedQuestion, ServerEvent, YouView,
};
