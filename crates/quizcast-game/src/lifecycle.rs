//! Lifecycle transitions: the room state machine.
//!
//! Every method mutates the room and returns the [`Effect`]s the engine
//! must apply, in order. Timer-fired entry points (`countdown_expired`,
//! `autoplay_step`) revalidate the room's state before acting, so a
//! stale callback that raced a manual transition degrades to a no-op.

use std::time::{Duration, Instant};

use quizcast_protocol::{ConnId, OPTION_COUNT, Question, RoomStatus, ServerEvent, YouView};

use crate::effect::{Audience, AutoPlayStep, Effect};
use crate::room::AnswerEntry;
use crate::score::{MAX_POINTS_PER_QUESTION, points_for_latency};
use crate::{GameError, GameRoom, Player};

impl GameRoom {
    /// Pause between the started notice and the first auto-played
    /// question, so clients can settle.
    pub const FIRST_QUESTION_DELAY: Duration = Duration::from_secs(3);

    /// Starts a round over the given active-question snapshot.
    ///
    /// Scores, answers, and the question pointer reset; the snapshot is
    /// frozen for the whole playthrough. With `autoplay` the first
    /// question is scheduled after [`Self::FIRST_QUESTION_DELAY`];
    /// otherwise the admin advances manually.
    ///
    /// # Errors
    /// [`GameError::NoActiveQuestions`] if the snapshot is empty; the
    /// room is left untouched.
    pub fn start(
        &mut self,
        active: Vec<Question>,
        autoplay: bool,
        question_secs: Option<u64>,
        answer_secs: Option<u64>,
    ) -> Result<Vec<Effect>, GameError> {
        if active.is_empty() {
            return Err(GameError::NoActiveQuestions);
        }

        self.reset_state();
        self.settings = self.defaults.with_overrides(question_secs, answer_secs);
        self.autoplay = autoplay;
        self.round = active;

        tracing::info!(
            room = %self.id,
            questions = self.round.len(),
            players = self.players.len(),
            autoplay,
            "round started"
        );

        let started = ServerEvent::GameStarted {
            total_questions: self.round.len(),
            player_count: self.players.len(),
        };
        let mut effects = vec![
            Effect::CancelTimer,
            Effect::send(Audience::Players, started.clone()),
            Effect::send(Audience::Displays, started),
            Effect::AdminSync,
        ];
        if autoplay {
            effects.push(Effect::ScheduleAutoPlay {
                delay: Self::FIRST_QUESTION_DELAY,
                step: AutoPlayStep::FirstQuestion,
            });
        }
        Ok(effects)
    }

    /// Shows the next question, or finishes the round if it is
    /// exhausted. Clears the answer ledger and stats, then opens the
    /// countdown.
    ///
    /// # Errors
    /// [`GameError::NotStarted`] without a frozen round,
    /// [`GameError::OutOfPhase`] once the room is finished.
    pub fn advance(&mut self, now: Instant) -> Result<Vec<Effect>, GameError> {
        if self.round.is_empty() {
            return Err(GameError::NotStarted);
        }
        if self.status == RoomStatus::Finished {
            return Err(GameError::OutOfPhase {
                op: "advance",
                status: self.status,
            });
        }

        let next = match self.current {
            None => 0,
            Some(i) if i + 1 >= self.round.len() => return Ok(self.finish()),
            Some(i) => i + 1,
        };

        self.current = Some(next);
        self.status = RoomStatus::Question;
        self.answers.clear();
        self.answer_stats = None;
        self.question_started_at = Some(now);

        let question = self
            .sanitized_current()
            .expect("index just set within round bounds");

        tracing::info!(
            room = %self.id,
            question = next + 1,
            total = self.round.len(),
            "question opened"
        );

        let new_question = ServerEvent::NewQuestion {
            question,
            time_remaining_secs: self.settings.question_secs,
        };
        Ok(vec![
            Effect::CancelTimer,
            Effect::send(Audience::Players, new_question.clone()),
            Effect::send(Audience::Displays, new_question),
            Effect::AdminSync,
            Effect::send(
                Audience::Admins,
                ServerEvent::AnswerCount {
                    answered: 0,
                    total_players: self.players.len(),
                },
            ),
            Effect::StartCountdown {
                seconds: self.settings.question_secs,
            },
        ])
    }

    /// Records one answer for the in-flight question.
    ///
    /// Out-of-phase, duplicate, unknown-connection, and out-of-range
    /// submissions are silently ignored; stale messages are expected
    /// on a best-effort realtime channel, and ignoring them is what
    /// makes submission idempotent.
    pub fn submit_answer(&mut self, conn: ConnId, choice: usize, now: Instant) -> Vec<Effect> {
        if self.status != RoomStatus::Question
            || choice >= OPTION_COUNT
            || !self.players.contains_key(&conn)
            || self.answers.contains_key(&conn)
        {
            tracing::trace!(room = %self.id, %conn, choice, "answer ignored");
            return Vec::new();
        }

        let latency_ms = self
            .question_started_at
            .map_or(0, |started| now.duration_since(started).as_millis() as u64);
        self.answers.insert(conn, AnswerEntry { choice, latency_ms });

        tracing::debug!(
            room = %self.id,
            %conn,
            choice,
            latency_ms,
            answered = self.answers.len(),
            "answer recorded"
        );

        let mut effects = vec![Effect::send(
            Audience::Conn(conn),
            ServerEvent::AnswerAck { choice, latency_ms },
        )];
        if let Some(stats) = self.compute_stats() {
            effects.push(Effect::send(
                Audience::Displays,
                ServerEvent::AnswerDistribution {
                    stats,
                    answered: self.answers.len(),
                    total_players: self.players.len(),
                },
            ));
        }
        effects.push(Effect::send(
            Audience::Admins,
            ServerEvent::AnswerCount {
                answered: self.answers.len(),
                total_players: self.players.len(),
            },
        ));
        effects
    }

    /// Scores the in-flight question and publishes the answer.
    ///
    /// Every current player is scored: a missing submission counts as
    /// wrong with latency defaulted to the full question duration.
    /// Points go through the latency-tiered policy for correct answers
    /// only. With auto-play on, the next step is scheduled after the
    /// answer window.
    ///
    /// # Errors
    /// [`GameError::OutOfPhase`] unless the room is in `question`.
    pub fn reveal(&mut self, _now: Instant) -> Result<Vec<Effect>, GameError> {
        if self.status != RoomStatus::Question {
            return Err(GameError::OutOfPhase {
                op: "reveal",
                status: self.status,
            });
        }
        let question = self
            .current_question()
            .cloned()
            .ok_or(GameError::NotStarted)?;

        let stats = self.compute_stats().ok_or(GameError::NotStarted)?;
        self.status = RoomStatus::Answer;
        self.answer_stats = Some(stats);

        let full_duration_ms = self.settings.question_secs * 1_000;
        let mut individual = Vec::with_capacity(self.players.len());

        for (conn, player) in &mut self.players {
            let entry = self.answers.get(conn);
            let (choice, latency_ms) = match entry {
                Some(e) => (Some(e.choice), e.latency_ms),
                None => (None, full_duration_ms),
            };
            let correct = choice == Some(question.correct);
            let points = if correct { points_for_latency(latency_ms) } else { 0 };
            if correct {
                player.score += points;
                player.total_correct_latency_ms += latency_ms;
                player.correct_answers += 1;
            }
            player.history.push(crate::AnswerRecord {
                question: question.id,
                choice,
                correct,
                latency_ms,
            });
            individual.push(Effect::send(
                Audience::Conn(*conn),
                ServerEvent::IndividualResult {
                    correct,
                    points,
                    latency_ms,
                    score: player.score,
                    explanation: question.explanation.clone(),
                },
            ));
        }

        tracing::info!(
            room = %self.id,
            question = self.current.map_or(0, |i| i + 1),
            answered = self.answers.len(),
            players = self.players.len(),
            "answer revealed"
        );

        let reveal = ServerEvent::Reveal {
            correct: question.correct,
            explanation: question.explanation.clone(),
            leaderboard: self.leaderboard(),
            stats,
            question,
        };
        let mut effects = vec![
            Effect::CancelTimer,
            Effect::send(Audience::Players, reveal.clone()),
            Effect::send(Audience::Displays, reveal),
        ];
        effects.extend(individual);
        effects.push(Effect::AdminSync);
        if self.autoplay {
            effects.push(Effect::ScheduleAutoPlay {
                delay: Duration::from_secs(self.settings.answer_secs),
                step: AutoPlayStep::AdvanceOrFinish,
            });
        }
        Ok(effects)
    }

    /// Ends the round: final leaderboard room-wide, one final-score
    /// summary per player, auto-play off, timers cancelled.
    pub fn finish(&mut self) -> Vec<Effect> {
        self.status = RoomStatus::Finished;
        self.autoplay = false;

        let total = self.round.len();
        tracing::info!(room = %self.id, questions = total, "round finished");

        let finished = ServerEvent::RoomFinished {
            leaderboard: self.leaderboard(),
            total_questions: total,
        };
        let mut effects = vec![
            Effect::CancelTimer,
            Effect::send(Audience::Players, finished.clone()),
            Effect::send(Audience::Displays, finished),
        ];
        for (conn, player) in &self.players {
            effects.push(Effect::send(
                Audience::Conn(*conn),
                ServerEvent::FinalScore {
                    score: player.score,
                    total_questions: total,
                    max_score: total as u32 * MAX_POINTS_PER_QUESTION,
                    avg_time_secs: player.avg_time_secs(),
                    correct_answers: player.correct_answers,
                },
            ));
        }
        effects.push(Effect::AdminSync);
        effects
    }

    /// Returns the room to `waiting`, zeroing every player's progress.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.reset_state();
        tracing::info!(room = %self.id, "room reset");
        vec![
            Effect::CancelTimer,
            Effect::send(Audience::Players, ServerEvent::RoomReset),
            Effect::send(Audience::Displays, ServerEvent::RoomReset),
            Effect::AdminSync,
        ]
    }

    /// Disables auto-play. A pending auto-advance is cancelled; an
    /// in-flight question countdown keeps running.
    pub fn stop_autoplay(&mut self) -> Vec<Effect> {
        self.autoplay = false;
        tracing::info!(room = %self.id, "auto-play stopped");
        vec![Effect::CancelAutoPlay, Effect::AdminSync]
    }

    // -- Timer-fired entry points -------------------------------------------

    /// The question countdown hit zero. Reveals, unless a manual
    /// transition got there first.
    pub fn countdown_expired(&mut self, now: Instant) -> Vec<Effect> {
        match self.reveal(now) {
            Ok(effects) => effects,
            Err(e) => {
                tracing::debug!(room = %self.id, reason = %e, "stale countdown ignored");
                Vec::new()
            }
        }
    }

    /// An auto-play delay elapsed. Revalidates that auto-play is still
    /// on and the room is in the state the timer was armed from.
    pub fn autoplay_step(&mut self, step: AutoPlayStep, now: Instant) -> Vec<Effect> {
        let expected = match step {
            AutoPlayStep::FirstQuestion => RoomStatus::Waiting,
            AutoPlayStep::AdvanceOrFinish => RoomStatus::Answer,
        };
        if !self.autoplay || self.status != expected {
            tracing::debug!(
                room = %self.id,
                ?step,
                status = %self.status,
                autoplay = self.autoplay,
                "stale auto-play timer ignored"
            );
            return Vec::new();
        }
        match self.advance(now) {
            Ok(effects) => effects,
            Err(e) => {
                tracing::warn!(room = %self.id, error = %e, "auto-play advance rejected");
                Vec::new()
            }
        }
    }

    // -- Presence -----------------------------------------------------------

    /// Attaches a player record (fresh or restored from the holding
    /// area) to a connection and snapshots the room back to it.
    pub fn join(
        &mut self,
        conn: ConnId,
        player: Player,
        reconnected: bool,
        now: Instant,
        live_active_count: usize,
    ) -> Vec<Effect> {
        let you = YouView {
            name: player.name.clone(),
            score: player.score,
            reconnected,
        };
        tracing::info!(
            room = %self.id,
            %conn,
            name = %player.name,
            score = player.score,
            reconnected,
            players = self.players.len() + 1,
            "player joined"
        );
        self.players.insert(conn, player);

        let count = ServerEvent::PlayerCount {
            count: self.players.len(),
            leaderboard: self.leaderboard(),
        };
        vec![
            Effect::send(Audience::Conn(conn), self.snapshot(now, live_active_count, Some(you))),
            Effect::send(Audience::Displays, count.clone()),
            Effect::send(Audience::Admins, count),
        ]
    }

    /// Detaches a player on disconnect, along with any pending answer
    /// for the in-flight question. The record is returned so the
    /// session layer can park it for reconnection.
    pub fn remove_player(&mut self, conn: ConnId) -> Option<(Player, Vec<Effect>)> {
        let player = self.players.remove(&conn)?;
        self.answers.remove(&conn);

        tracing::info!(
            room = %self.id,
            %conn,
            name = %player.name,
            players = self.players.len(),
            "player left"
        );

        let count = ServerEvent::PlayerCount {
            count: self.players.len(),
            leaderboard: self.leaderboard(),
        };
        let effects = vec![
            Effect::send(Audience::Displays, count.clone()),
            Effect::send(Audience::Admins, count),
        ];
        Some((player, effects))
    }

    fn reset_state(&mut self) {
        self.status = RoomStatus::Waiting;
        self.current = None;
        self.question_started_at = None;
        self.round.clear();
        self.answers.clear();
        self.answer_stats = None;
        self.autoplay = false;
        for player in self.players.values_mut() {
            player.reset_progress();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoomSettings;
    use quizcast_protocol::{QuestionId, RoomId};

    fn question(id: u64, correct: usize) -> Question {
        Question {
            id: QuestionId(id),
            text: format!("q{id}").into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
            explanation: None,
            active: true,
        }
    }

    fn room_with_players(n: u64) -> (GameRoom, Vec<ConnId>, Instant) {
        let now = Instant::now();
        let mut room = GameRoom::new(RoomId(1), RoomSettings::default());
        let conns: Vec<ConnId> = (1..=n).map(ConnId).collect();
        for (i, conn) in conns.iter().enumerate() {
            let p = Player::new(format!("p{i}"), "en".into(), None, now);
            room.join(*conn, p, false, now, 0);
        }
        (room, conns, now)
    }

    fn events_for<'a>(effects: &'a [Effect], audience: Audience) -> Vec<&'a ServerEvent> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Send(a, ev) if *a == audience => Some(ev),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_with_no_active_questions_is_rejected() {
        let (mut room, _, _) = room_with_players(1);
        let err = room.start(Vec::new(), false, None, None).unwrap_err();
        assert!(matches!(err, GameError::NoActiveQuestions));
        // The room must be untouched by the failed start.
        assert_eq!(room.status(), RoomStatus::Waiting);
    }

    #[test]
    fn test_start_resets_player_progress_and_freezes_round() {
        let (mut room, conns, now) = room_with_players(1);
        room.start(vec![question(1, 0)], false, None, None).unwrap();
        room.advance(now).unwrap();
        room.submit_answer(conns[0], 0, now);
        room.reveal(now).unwrap();
        assert_eq!(room.player(conns[0]).unwrap().score, 20);

        // A second start zeroes scores and replaces the snapshot.
        let effects = room
            .start(vec![question(2, 1), question(3, 2)], false, None, None)
            .unwrap();
        assert_eq!(room.status(), RoomStatus::Waiting);
        assert_eq!(room.current_index(), None);
        assert_eq!(room.player(conns[0]).unwrap().score, 0);
        assert_eq!(room.total_questions(99), 2);
        let started = events_for(&effects, Audience::Players);
        assert!(matches!(
            started[0],
            ServerEvent::GameStarted { total_questions: 2, .. }
        ));
        // Manual mode: nothing scheduled.
        assert!(!effects
            .iter()
            .any(|e| matches!(e, Effect::ScheduleAutoPlay { .. })));
    }

    #[test]
    fn test_start_with_autoplay_schedules_first_question_after_delay() {
        let (mut room, _, _) = room_with_players(1);
        let effects = room.start(vec![question(1, 0)], true, None, None).unwrap();
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::ScheduleAutoPlay {
                delay,
                step: AutoPlayStep::FirstQuestion,
            } if *delay == GameRoom::FIRST_QUESTION_DELAY
        )));
    }

    #[test]
    fn test_start_clamps_duration_overrides() {
        let (mut room, _, _) = room_with_players(1);
        room.start(vec![question(1, 0)], false, Some(2), Some(600))
            .unwrap();
        assert_eq!(room.settings().question_secs, 10);
        assert_eq!(room.settings().answer_secs, 60);
    }

    #[test]
    fn test_start_without_overrides_keeps_configured_defaults() {
        let configured = RoomSettings {
            question_secs: 60,
            answer_secs: 30,
        };
        let mut room = GameRoom::new(RoomId(1), configured);
        room.start(vec![question(1, 0)], false, None, None).unwrap();
        assert_eq!(room.settings(), configured);

        // Overrides apply over the configured defaults for one round
        // only; the next plain start restores them.
        room.start(vec![question(1, 0)], false, Some(90), None)
            .unwrap();
        assert_eq!(room.settings().question_secs, 90);
        assert_eq!(room.settings().answer_secs, 30);
        room.start(vec![question(1, 0)], false, None, None).unwrap();
        assert_eq!(room.settings(), configured);
    }

    #[test]
    fn test_advance_opens_question_and_arms_countdown() {
        let (mut room, _, now) = room_with_players(2);
        room.start(vec![question(1, 0), question(2, 1)], false, None, None)
            .unwrap();
        let effects = room.advance(now).unwrap();

        assert_eq!(room.status(), RoomStatus::Question);
        assert_eq!(room.current_index(), Some(0));
        assert!(effects
            .iter()
            .any(|e| matches!(e, Effect::StartCountdown { seconds: 30 })));
        let to_players = events_for(&effects, Audience::Players);
        match to_players[0] {
            ServerEvent::NewQuestion { question, .. } => {
                assert_eq!(question.question_number, 1);
                assert_eq!(question.total_questions, 2);
            }
            other => panic!("expected NewQuestion, got {other:?}"),
        }
    }

    #[test]
    fn test_advance_without_start_is_rejected() {
        let (mut room, _, now) = room_with_players(1);
        assert!(matches!(room.advance(now), Err(GameError::NotStarted)));
    }

    #[test]
    fn test_advance_past_last_question_finishes() {
        let (mut room, conns, now) = room_with_players(1);
        room.start(vec![question(1, 0)], false, None, None).unwrap();
        room.advance(now).unwrap();
        room.reveal(now).unwrap();

        let effects = room.advance(now).unwrap();
        assert_eq!(room.status(), RoomStatus::Finished);
        assert!(!room.autoplay());
        let to_players = events_for(&effects, Audience::Players);
        assert!(matches!(to_players[0], ServerEvent::RoomFinished { .. }));
        let to_conn = events_for(&effects, Audience::Conn(conns[0]));
        match to_conn[0] {
            ServerEvent::FinalScore { max_score, .. } => assert_eq!(*max_score, 20),
            other => panic!("expected FinalScore, got {other:?}"),
        }

        // Finished rooms reject further advances.
        assert!(matches!(
            room.advance(now),
            Err(GameError::OutOfPhase { op: "advance", .. })
        ));
    }

    #[test]
    fn test_submit_outside_question_phase_is_ignored() {
        let (mut room, conns, now) = room_with_players(1);
        assert!(room.submit_answer(conns[0], 0, now).is_empty());
    }

    #[test]
    fn test_duplicate_submit_keeps_first_answer() {
        let (mut room, conns, now) = room_with_players(1);
        room.start(vec![question(1, 0)], false, None, None).unwrap();
        room.advance(now).unwrap();

        let first = room.submit_answer(conns[0], 0, now + Duration::from_secs(2));
        assert!(!first.is_empty());
        let dup = room.submit_answer(conns[0], 3, now + Duration::from_secs(9));
        assert!(dup.is_empty());

        room.reveal(now).unwrap();
        let p = room.player(conns[0]).unwrap();
        assert_eq!(p.score, 20); // the 2 s answer, not the 9 s retry
        assert_eq!(p.history[0].choice, Some(0));
    }

    #[test]
    fn test_submit_out_of_range_choice_is_ignored() {
        let (mut room, conns, now) = room_with_players(1);
        room.start(vec![question(1, 0)], false, None, None).unwrap();
        room.advance(now).unwrap();
        assert!(room.submit_answer(conns[0], OPTION_COUNT, now).is_empty());
    }

    #[test]
    fn test_reveal_scores_missing_answer_as_wrong_with_full_latency() {
        let (mut room, conns, now) = room_with_players(2);
        room.start(vec![question(1, 2)], false, None, None).unwrap();
        room.advance(now).unwrap();
        room.submit_answer(conns[0], 2, now + Duration::from_secs(1));

        room.reveal(now).unwrap();
        assert_eq!(room.status(), RoomStatus::Answer);

        let answered = room.player(conns[0]).unwrap();
        assert_eq!(answered.score, 20);
        let silent = room.player(conns[1]).unwrap();
        assert_eq!(silent.score, 0);
        assert_eq!(silent.history[0].choice, None);
        assert!(!silent.history[0].correct);
        assert_eq!(silent.history[0].latency_ms, 30_000);
    }

    #[test]
    fn test_reveal_out_of_phase_is_rejected() {
        let (mut room, _, now) = room_with_players(1);
        assert!(matches!(
            room.reveal(now),
            Err(GameError::OutOfPhase { op: "reveal", .. })
        ));
    }

    #[test]
    fn test_reveal_with_autoplay_schedules_next_step() {
        let (mut room, _, now) = room_with_players(1);
        room.start(vec![question(1, 0), question(2, 0)], true, None, Some(7))
            .unwrap();
        room.autoplay_step(AutoPlayStep::FirstQuestion, now);
        let effects = room.reveal(now).unwrap();
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::ScheduleAutoPlay {
                delay,
                step: AutoPlayStep::AdvanceOrFinish,
            } if *delay == Duration::from_secs(7)
        )));
    }

    #[test]
    fn test_countdown_expiry_after_manual_reveal_is_noop() {
        let (mut room, _, now) = room_with_players(1);
        room.start(vec![question(1, 0)], false, None, None).unwrap();
        room.advance(now).unwrap();
        room.reveal(now).unwrap();
        // The countdown fires after the admin already revealed: no-op.
        assert!(room.countdown_expired(now).is_empty());
        assert_eq!(room.status(), RoomStatus::Answer);
    }

    #[test]
    fn test_autoplay_step_after_stop_is_noop() {
        let (mut room, _, now) = room_with_players(1);
        room.start(vec![question(1, 0)], true, None, None).unwrap();
        room.stop_autoplay();
        assert!(room
            .autoplay_step(AutoPlayStep::FirstQuestion, now)
            .is_empty());
        assert_eq!(room.status(), RoomStatus::Waiting);
    }

    #[test]
    fn test_stop_autoplay_does_not_cancel_question_countdown() {
        let (mut room, _, now) = room_with_players(1);
        room.start(vec![question(1, 0)], true, None, None).unwrap();
        room.autoplay_step(AutoPlayStep::FirstQuestion, now);
        let effects = room.stop_autoplay();
        assert!(effects.contains(&Effect::CancelAutoPlay));
        assert!(!effects.contains(&Effect::CancelTimer));
        assert_eq!(room.status(), RoomStatus::Question);
    }

    #[test]
    fn test_reset_returns_to_waiting_and_zeroes_scores() {
        let (mut room, conns, now) = room_with_players(1);
        room.start(vec![question(1, 0)], false, None, None).unwrap();
        room.advance(now).unwrap();
        room.submit_answer(conns[0], 0, now);
        room.reveal(now).unwrap();

        let effects = room.reset();
        assert_eq!(room.status(), RoomStatus::Waiting);
        assert_eq!(room.current_index(), None);
        assert_eq!(room.player(conns[0]).unwrap().score, 0);
        assert!(room.answer_stats().is_none());
        let to_players = events_for(&effects, Audience::Players);
        assert!(matches!(to_players[0], ServerEvent::RoomReset));
    }

    #[test]
    fn test_remove_player_drops_pending_answer() {
        let (mut room, conns, now) = room_with_players(2);
        room.start(vec![question(1, 0)], false, None, None).unwrap();
        room.advance(now).unwrap();
        room.submit_answer(conns[0], 0, now);

        let (player, effects) = room.remove_player(conns[0]).unwrap();
        assert_eq!(player.name, "p0");
        assert_eq!(room.player_count(), 1);
        assert!(room.compute_stats().unwrap().total == 0);
        let to_displays = events_for(&effects, Audience::Displays);
        assert!(matches!(
            to_displays[0],
            ServerEvent::PlayerCount { count: 1, .. }
        ));
    }
}
