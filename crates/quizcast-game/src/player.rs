//! Player records, owned exclusively by their room.

use std::time::Instant;

use quizcast_protocol::QuestionId;

/// One entry of a player's per-question answer history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question: QuestionId,
    /// `None` when the player never submitted for that question.
    pub choice: Option<usize>,
    pub correct: bool,
    pub latency_ms: u64,
}

/// A player's in-room state. Created on join, relocated to the holding
/// area on disconnect, zeroed on room reset.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub lang: String,
    /// Small encoded image, already size-checked by the session layer.
    pub photo: Option<String>,
    pub score: u32,
    pub joined_at: Instant,
    /// Summed latency over correct answers only; this is the tie-break input.
    pub total_correct_latency_ms: u64,
    pub correct_answers: u32,
    pub history: Vec<AnswerRecord>,
}

impl Player {
    pub fn new(name: String, lang: String, photo: Option<String>, now: Instant) -> Self {
        Self {
            name,
            lang,
            photo,
            score: 0,
            joined_at: now,
            total_correct_latency_ms: 0,
            correct_answers: 0,
            history: Vec::new(),
        }
    }

    /// Zeroes score and history; identity fields survive.
    pub fn reset_progress(&mut self) {
        self.score = 0;
        self.total_correct_latency_ms = 0;
        self.correct_answers = 0;
        self.history.clear();
    }

    /// Average latency on correct answers, rounded to 0.1 s.
    /// `None` until the player has answered something correctly;
    /// such players sort as "infinitely slow" in tie-breaks.
    pub fn avg_time_secs(&self) -> Option<f64> {
        if self.correct_answers == 0 {
            return None;
        }
        let avg_ms = self.total_correct_latency_ms as f64 / self.correct_answers as f64;
        Some((avg_ms / 100.0).round() / 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new("amina".into(), "en".into(), None, Instant::now())
    }

    #[test]
    fn test_avg_time_none_without_correct_answers() {
        assert_eq!(player().avg_time_secs(), None);
    }

    #[test]
    fn test_avg_time_rounds_to_tenth_of_second() {
        let mut p = player();
        p.correct_answers = 2;
        p.total_correct_latency_ms = 2_500 + 4_840; // avg 3670 ms
        assert_eq!(p.avg_time_secs(), Some(3.7));
    }

    #[test]
    fn test_reset_progress_keeps_identity() {
        let mut p = player();
        p.score = 40;
        p.correct_answers = 2;
        p.total_correct_latency_ms = 9_000;
        p.history.push(AnswerRecord {
            question: QuestionId(1),
            choice: Some(0),
            correct: true,
            latency_ms: 4_500,
        });

        p.reset_progress();

        assert_eq!(p.score, 0);
        assert_eq!(p.correct_answers, 0);
        assert!(p.history.is_empty());
        assert_eq!(p.name, "amina");
    }
}
