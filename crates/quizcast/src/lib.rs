//! # QuizCast
//!
//! A multi-room live trivia engine: fixed rooms run independent game
//! state machines, admins drive them (or let auto-play drive them),
//! players answer against a countdown, and stadium displays mirror it
//! all in real time.
//!
//! The engine is transport-agnostic. Whatever carries the wire bytes
//! (WebSockets, an in-process test harness) owns the sockets and talks
//! to the engine through an [`EngineHandle`]:
//!
//! ```rust,no_run
//! use quizcast::{Engine, EngineConfig};
//! use quizcast_catalog::JsonFileStore;
//!
//! # fn main() -> Result<(), quizcast::EngineError> {
//! # let rt = tokio::runtime::Runtime::new().unwrap();
//! # rt.block_on(async {
//! let handle = Engine::spawn(
//!     EngineConfig::default(),
//!     JsonFileStore::new("questions.json"),
//! )?;
//! // For each accepted connection:
//! //   handle.connect(conn_id, event_sender);
//! //   handle.command(conn_id, decoded_command);
//! //   handle.disconnect(conn_id);
//! # Ok(())
//! # })
//! # }
//! ```

mod config;
mod engine;
mod error;
mod timer;

pub use config::EngineConfig;
pub use engine::{Engine, EngineHandle};
pub use error::EngineError;

pub use quizcast_catalog::{Catalog, CatalogStore, JsonFileStore, MemoryStore};
pub use quizcast_game::RoomSettings;
pub use quizcast_protocol::{ClientCommand, Codec, ConnId, JsonCodec, RoomId, ServerEvent};
pub use quizcast_session::SessionConfig;
