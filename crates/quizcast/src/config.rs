//! Engine configuration.

use quizcast_game::RoomSettings;
use quizcast_protocol::RoomId;
use quizcast_session::SessionConfig;

/// Everything tunable about a running engine. Rooms are a fixed set
/// decided at startup; there is no dynamic room creation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// The rooms to bring up.
    pub rooms: Vec<RoomId>,
    /// Countdown defaults applied until a start overrides them.
    pub default_settings: RoomSettings,
    /// Reconnection grace, sweep cadence, and identity caps.
    pub session: SessionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rooms: (1..=4).map(RoomId).collect(),
            default_settings: RoomSettings::default(),
            session: SessionConfig::default(),
        }
    }
}
