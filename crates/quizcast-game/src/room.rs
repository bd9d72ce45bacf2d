//! Room state and read-side queries. Lifecycle transitions live in
//! `lifecycle.rs`.

use std::collections::HashMap;
use std::time::Instant;

use quizcast_protocol::{
    AdminSnapshot, AnswerStats, ConnId, LeaderboardEntry, OPTION_COUNT, Question, RoomId,
    RoomStatus, SanitizedQuestion, ServerEvent, YouView,
};

use crate::{Player, score};

/// Per-room countdown durations, clamped to sane ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSettings {
    /// Seconds a question stays open for answers.
    pub question_secs: u64,
    /// Seconds the answer stays on screen before auto-play advances.
    pub answer_secs: u64,
}

impl RoomSettings {
    pub const QUESTION_SECS: (u64, u64) = (10, 120);
    pub const ANSWER_SECS: (u64, u64) = (5, 60);

    /// Applies optional overrides, clamping each to its bound.
    pub fn with_overrides(self, question_secs: Option<u64>, answer_secs: Option<u64>) -> Self {
        let clamp = |v: u64, (lo, hi): (u64, u64)| v.clamp(lo, hi);
        Self {
            question_secs: question_secs
                .map_or(self.question_secs, |v| clamp(v, Self::QUESTION_SECS)),
            answer_secs: answer_secs.map_or(self.answer_secs, |v| clamp(v, Self::ANSWER_SECS)),
        }
    }
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            question_secs: 30,
            answer_secs: 15,
        }
    }
}

/// One recorded answer for the in-flight question. At most one per
/// connection per question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerEntry {
    pub choice: usize,
    pub latency_ms: u64,
}

/// One independent game instance.
///
/// Invariants the lifecycle methods maintain:
/// - `current` is `Some` iff `status ∈ {question, answer}` (and also
///   between reveal and the next advance), indexing into `round`, the
///   active-question snapshot frozen at `start`, never the live catalog.
/// - `answers` holds at most one entry per connection and is cleared
///   every time a question opens.
/// - The leaderboard is derivable purely from `players`.
pub struct GameRoom {
    pub(crate) id: RoomId,
    pub(crate) status: RoomStatus,
    /// Construction-time durations; every `start` rebuilds `settings`
    /// from these, so one round's overrides never leak into the next.
    pub(crate) defaults: RoomSettings,
    pub(crate) settings: RoomSettings,
    pub(crate) autoplay: bool,
    /// Active questions frozen at round start. Catalog edits mid-round
    /// are only visible to the *next* start.
    pub(crate) round: Vec<Question>,
    pub(crate) current: Option<usize>,
    pub(crate) question_started_at: Option<Instant>,
    pub(crate) players: HashMap<ConnId, Player>,
    pub(crate) answers: HashMap<ConnId, AnswerEntry>,
    /// Distribution for the just-revealed question; retained until the
    /// next question opens.
    pub(crate) answer_stats: Option<AnswerStats>,
}

impl GameRoom {
    pub fn new(id: RoomId, settings: RoomSettings) -> Self {
        Self {
            id,
            status: RoomStatus::Waiting,
            defaults: settings,
            settings,
            autoplay: false,
            round: Vec::new(),
            current: None,
            question_started_at: None,
            players: HashMap::new(),
            answers: HashMap::new(),
            answer_stats: None,
        }
    }

    // -- Queries ------------------------------------------------------------

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn settings(&self) -> RoomSettings {
        self.settings
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, conn: ConnId) -> Option<&Player> {
        self.players.get(&conn)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The in-flight (or just revealed) question, unsanitized.
    pub fn current_question(&self) -> Option<&Question> {
        self.round.get(self.current?)
    }

    /// Questions in this round, or the live active count before any
    /// round has been started.
    pub fn total_questions(&self, live_active_count: usize) -> usize {
        if self.round.is_empty() {
            live_active_count
        } else {
            self.round.len()
        }
    }

    /// Seconds left on the question countdown; zero outside `question`.
    pub fn time_remaining_secs(&self, now: Instant) -> u64 {
        if self.status != RoomStatus::Question {
            return 0;
        }
        let Some(started) = self.question_started_at else {
            return 0;
        };
        self.settings
            .question_secs
            .saturating_sub(now.duration_since(started).as_secs())
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        score::leaderboard(self.players.values())
    }

    /// The current question as players and displays see it.
    pub fn sanitized_current(&self) -> Option<SanitizedQuestion> {
        let index = self.current?;
        let q = self.round.get(index)?;
        Some(SanitizedQuestion {
            id: q.id,
            question: q.text.clone(),
            options: q.options.clone(),
            question_number: index + 1,
            total_questions: self.round.len(),
        })
    }

    /// Per-option distribution of the recorded answers, against the
    /// current question's correct index.
    pub fn compute_stats(&self) -> Option<AnswerStats> {
        let question = self.current_question()?;
        let mut counts = [0u32; OPTION_COUNT];
        for entry in self.answers.values() {
            if let Some(slot) = counts.get_mut(entry.choice) {
                *slot += 1;
            }
        }
        let total: u32 = counts.iter().sum();
        let mut percentages = [0u8; OPTION_COUNT];
        if total > 0 {
            for (pct, count) in percentages.iter_mut().zip(counts) {
                *pct = ((count as f64 / total as f64) * 100.0).round() as u8;
            }
        }
        Some(AnswerStats {
            counts,
            percentages,
            total,
            correct: question.correct,
        })
    }

    /// Stats of the just-revealed question, if any.
    pub fn answer_stats(&self) -> Option<AnswerStats> {
        self.answer_stats
    }

    // -- Snapshot builders --------------------------------------------------

    /// Full status-appropriate snapshot for a single connection, so a
    /// client can render correctly even when it joins mid-round.
    pub fn snapshot(
        &self,
        now: Instant,
        live_active_count: usize,
        you: Option<YouView>,
    ) -> ServerEvent {
        ServerEvent::RoomSnapshot {
            room: self.id,
            status: self.status,
            question: if self.status == RoomStatus::Question {
                self.sanitized_current()
            } else {
                None
            },
            time_remaining_secs: self.time_remaining_secs(now),
            total_questions: self.total_questions(live_active_count),
            player_count: self.players.len(),
            leaderboard: self.leaderboard(),
            answer_stats: self.answer_stats,
            you,
        }
    }

    /// Admin view of this room. The caller supplies the catalog half
    /// of the payload; the room doesn't own the catalog.
    pub fn admin_snapshot(
        &self,
        questions: Vec<Question>,
        live_active_count: usize,
        catalog_version: u64,
    ) -> AdminSnapshot {
        AdminSnapshot {
            room: self.id,
            status: self.status,
            current_question: self.current,
            current: self.current_question().cloned(),
            total_questions: self.total_questions(live_active_count),
            player_count: self.players.len(),
            leaderboard: self.leaderboard(),
            active_count: live_active_count,
            questions,
            autoplay: self.autoplay,
            question_secs: self.settings.question_secs,
            answer_secs: self.settings.answer_secs,
            answer_stats: self.answer_stats,
            catalog_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_overrides_are_clamped() {
        let s = RoomSettings::default().with_overrides(Some(2), Some(600));
        assert_eq!(s.question_secs, 10);
        assert_eq!(s.answer_secs, 60);

        let s = RoomSettings::default().with_overrides(Some(45), None);
        assert_eq!(s.question_secs, 45);
        assert_eq!(s.answer_secs, 15);
    }

    #[test]
    fn test_new_room_starts_waiting_with_no_pointer() {
        let room = GameRoom::new(RoomId(1), RoomSettings::default());
        assert_eq!(room.status(), RoomStatus::Waiting);
        assert_eq!(room.current_index(), None);
        assert_eq!(room.time_remaining_secs(Instant::now()), 0);
    }

    #[test]
    fn test_total_questions_falls_back_to_live_count_before_start() {
        let room = GameRoom::new(RoomId(1), RoomSettings::default());
        assert_eq!(room.total_questions(7), 7);
    }
}
