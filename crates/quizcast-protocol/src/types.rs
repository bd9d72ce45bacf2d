//! Inbound commands, outbound events, and their payload structs.
//!
//! Both top-level enums are internally tagged (`#[serde(tag = "type")]`)
//! so a message reads as `{ "type": "submit_answer", "choice": 2 }`, which is
//! easy to dispatch on in a browser client.
//!
//! Events are scoped to one subscriber group each (players-in-room,
//! admins-of-room, displays-of-room, or a single connection); the
//! engine decides the scope, the event itself only carries payload.

use serde::{Deserialize, Serialize};

use crate::{LocalizedText, Question, QuestionDraft, QuestionId, RoomId};

// ---------------------------------------------------------------------------
// Room status
// ---------------------------------------------------------------------------

/// The lifecycle state of a room, the single source of truth for which
/// payloads are valid at any moment.
///
/// ```text
/// Waiting → Question → Answer → { Question (next) | Finished }
/// Finished → Waiting (reset)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// No round in flight. The question pointer is unset.
    Waiting,
    /// A question is live and accepting answers.
    Question,
    /// The answer has been revealed; scores are settled for this question.
    Answer,
    /// The round is over; final scores have been published.
    Finished,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Waiting => "waiting",
            Self::Question => "question",
            Self::Answer => "answer",
            Self::Finished => "finished",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Payload structs
// ---------------------------------------------------------------------------

/// A question as players and displays see it: no correct index, no
/// explanation, no active flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedQuestion {
    pub id: QuestionId,
    pub question: LocalizedText,
    pub options: Vec<LocalizedText>,
    /// 1-based position within the round.
    pub question_number: usize,
    pub total_questions: usize,
}

/// Per-option answer distribution for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerStats {
    pub counts: [u32; 4],
    /// Integer percentages of total submissions; all zero when nobody
    /// has answered.
    pub percentages: [u8; 4],
    pub total: u32,
    pub correct: usize,
}

/// One leaderboard row. Capped to the top 10 players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub score: u32,
    #[serde(default)]
    pub photo: Option<String>,
    /// Average latency on correct answers, rounded to 0.1 s.
    /// `None` if the player has never answered correctly.
    #[serde(default)]
    pub avg_time_secs: Option<f64>,
}

/// The joining/connecting client's own slice of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YouView {
    pub name: String,
    pub score: u32,
    /// True when the join restored a disconnected player's progress.
    pub reconnected: bool,
}

/// Everything an admin panel needs to render a room plus the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSnapshot {
    pub room: RoomId,
    pub status: RoomStatus,
    /// Index into the round's frozen active-question snapshot.
    pub current_question: Option<usize>,
    /// The in-flight question, unsanitized.
    pub current: Option<Question>,
    pub total_questions: usize,
    pub player_count: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
    /// The full catalog, active or not.
    pub questions: Vec<Question>,
    pub active_count: usize,
    pub autoplay: bool,
    pub question_secs: u64,
    pub answer_secs: u64,
    pub answer_stats: Option<AnswerStats>,
    pub catalog_version: u64,
}

// ---------------------------------------------------------------------------
// Inbound commands
// ---------------------------------------------------------------------------

/// Everything a connection can ask the server to do, across all three
/// roles. Role enforcement happens in the engine, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Declare this connection a moderating admin for a room.
    ConnectAsAdmin { room: RoomId },
    /// Move an admin connection to a different room's admin set.
    /// Leaving the old set and joining the new one is atomic from the
    /// caller's perspective.
    SwitchAdminRoom { room: RoomId },
    /// Declare this connection a passive stadium display for a room.
    ConnectAsDisplay { room: RoomId },
    /// Join a room as a player.
    Join {
        room: RoomId,
        name: String,
        #[serde(default)]
        lang: Option<String>,
        /// Small encoded image; an over-sized photo is dropped while
        /// the join itself still succeeds.
        #[serde(default)]
        photo: Option<String>,
    },
    /// Answer the in-flight question. Ignored outside `question` status
    /// and on duplicate submission.
    SubmitAnswer { choice: usize },

    // -- Admin: round control --
    /// Start a round in manual mode (admin advances each question).
    Start {
        #[serde(default)]
        question_secs: Option<u64>,
        #[serde(default)]
        answer_secs: Option<u64>,
    },
    /// Start a round in auto-play mode.
    StartAutoplay {
        #[serde(default)]
        question_secs: Option<u64>,
        #[serde(default)]
        answer_secs: Option<u64>,
    },
    /// Disable auto-play; a pending auto-advance timer is cancelled,
    /// an in-flight question countdown is not.
    StopAutoplay,
    /// Show the next question, or finish if the round is exhausted.
    Advance,
    /// Reveal the answer early, cancelling the countdown.
    Reveal,
    /// Return the room to `waiting`, zeroing all scores.
    Reset,

    // -- Admin: catalog edits --
    CatalogAdd { question: QuestionDraft },
    CatalogUpdate { index: usize, question: QuestionDraft },
    CatalogDelete { index: usize },
    CatalogToggle { index: usize },
    CatalogBulkToggle { activate_all: bool },
}

// ---------------------------------------------------------------------------
// Outbound events
// ---------------------------------------------------------------------------

/// Everything the server pushes out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full state snapshot, sent to a single connection on join/connect
    /// so it can render correctly even mid-round.
    RoomSnapshot {
        room: RoomId,
        status: RoomStatus,
        question: Option<SanitizedQuestion>,
        time_remaining_secs: u64,
        total_questions: usize,
        player_count: usize,
        leaderboard: Vec<LeaderboardEntry>,
        answer_stats: Option<AnswerStats>,
        /// Present only for player snapshots.
        #[serde(default)]
        you: Option<YouView>,
    },
    /// A round has started (scores reset, first question pending).
    GameStarted {
        total_questions: usize,
        player_count: usize,
    },
    /// A new question is live. Sanitized: no correct index.
    NewQuestion {
        question: SanitizedQuestion,
        time_remaining_secs: u64,
    },
    /// One-second countdown granularity while a question is live.
    CountdownTick { seconds_remaining: u64 },
    /// Unicast confirmation of a recorded answer.
    AnswerAck { choice: usize, latency_ms: u64 },
    /// Live distribution update for displays while answers come in.
    AnswerDistribution {
        stats: AnswerStats,
        answered: usize,
        total_players: usize,
    },
    /// Lightweight answered/total counter for admins.
    AnswerCount { answered: usize, total_players: usize },
    /// Room-wide reveal: the full question, scores settled, leaderboard
    /// recomputed.
    Reveal {
        question: Question,
        correct: usize,
        explanation: Option<LocalizedText>,
        leaderboard: Vec<LeaderboardEntry>,
        stats: AnswerStats,
    },
    /// Unicast per-player outcome for the revealed question.
    IndividualResult {
        correct: bool,
        points: u32,
        latency_ms: u64,
        score: u32,
        explanation: Option<LocalizedText>,
    },
    /// The round is over.
    RoomFinished {
        leaderboard: Vec<LeaderboardEntry>,
        total_questions: usize,
    },
    /// Unicast final summary for one player.
    FinalScore {
        score: u32,
        total_questions: usize,
        /// Best achievable score for the round under the latency-tiered
        /// policy.
        max_score: u32,
        avg_time_secs: Option<f64>,
        correct_answers: u32,
    },
    /// The room went back to `waiting` and scores were zeroed.
    RoomReset,
    /// Live presence changed.
    PlayerCount {
        count: usize,
        leaderboard: Vec<LeaderboardEntry>,
    },
    /// The catalog was edited; carries the new authoritative copy.
    CatalogChanged {
        questions: Vec<Question>,
        version: u64,
    },
    /// Full admin view of one room (see [`AdminSnapshot`]).
    AdminSnapshot(AdminSnapshot),
    /// A rejected command, reported to the originating connection only.
    ErrorNotice { reason: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The wire shapes are load-bearing: three separate browser clients
    //! dispatch on the `type` tag, so these tests pin the exact JSON.

    use super::*;

    #[test]
    fn test_command_tag_is_snake_case() {
        let cmd = ClientCommand::SubmitAnswer { choice: 2 };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "submit_answer");
        assert_eq!(json["choice"], 2);
    }

    #[test]
    fn test_join_optional_fields_default() {
        let json = r#"{"type": "join", "room": 1, "name": "amina"}"#;
        let cmd: ClientCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            ClientCommand::Join {
                room: RoomId(1),
                name: "amina".into(),
                lang: None,
                photo: None,
            }
        );
    }

    #[test]
    fn test_start_autoplay_with_durations_round_trip() {
        let cmd = ClientCommand::StartAutoplay {
            question_secs: Some(20),
            answer_secs: Some(10),
        };
        let bytes = serde_json::to_vec(&cmd).unwrap();
        let decoded: ClientCommand = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(cmd, decoded);
    }

    #[test]
    fn test_catalog_bulk_toggle_json_format() {
        let cmd = ClientCommand::CatalogBulkToggle { activate_all: true };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "catalog_bulk_toggle");
        assert_eq!(json["activate_all"], true);
    }

    #[test]
    fn test_room_status_serializes_lowercase() {
        let json = serde_json::to_string(&RoomStatus::Waiting).unwrap();
        assert_eq!(json, "\"waiting\"");
        let json = serde_json::to_string(&RoomStatus::Finished).unwrap();
        assert_eq!(json, "\"finished\"");
    }

    #[test]
    fn test_countdown_tick_json_format() {
        let ev = ServerEvent::CountdownTick {
            seconds_remaining: 12,
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "countdown_tick");
        assert_eq!(json["seconds_remaining"], 12);
    }

    #[test]
    fn test_error_notice_round_trip() {
        let ev = ServerEvent::ErrorNotice {
            reason: "no active questions".into(),
        };
        let bytes = serde_json::to_vec(&ev).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(ev, decoded);
    }

    #[test]
    fn test_room_snapshot_you_defaults_to_none() {
        // Display/admin snapshots omit the "you" field entirely.
        let json = r#"{
            "type": "room_snapshot",
            "room": 1,
            "status": "waiting",
            "question": null,
            "time_remaining_secs": 0,
            "total_questions": 5,
            "player_count": 0,
            "leaderboard": [],
            "answer_stats": null
        }"#;
        let ev: ServerEvent = serde_json::from_str(json).unwrap();
        match ev {
            ServerEvent::RoomSnapshot { you, status, .. } => {
                assert!(you.is_none());
                assert_eq!(status, RoomStatus::Waiting);
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_leaderboard_entry_null_avg_time() {
        let entry = LeaderboardEntry {
            rank: 3,
            name: "kofi".into(),
            score: 0,
            photo: None,
            avg_time_secs: None,
        };
        let json: serde_json::Value = serde_json::to_value(&entry).unwrap();
        assert!(json["avg_time_secs"].is_null());
        assert!(json["photo"].is_null());
    }

    #[test]
    fn test_decode_unknown_command_type_returns_error() {
        let unknown = r#"{"type": "fly_to_moon", "speed": 9000}"#;
        let result: Result<ClientCommand, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
