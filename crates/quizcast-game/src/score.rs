//! Scoring policy and leaderboard ordering.
//!
//! Two scoring formulas existed across this system's deployments: a
//! flat 10 points per correct answer, and a latency-tiered 5–20. This
//! implementation uses the latency-tiered policy, which is what the
//! latest deployment ran.

use std::cmp::Ordering;

use quizcast_protocol::LeaderboardEntry;

use crate::Player;

/// Best achievable points on a single question.
pub const MAX_POINTS_PER_QUESTION: u32 = 20;

/// Leaderboard rows published to clients.
pub const LEADERBOARD_CAP: usize = 10;

/// Points for a correct answer, by response latency.
///
/// ≤3 s → 20, ≤7 s → 15, ≤15 s → 10, slower → 5. Points are only ever
/// awarded for correct answers; the caller checks correctness first.
pub fn points_for_latency(latency_ms: u64) -> u32 {
    match latency_ms {
        0..=3_000 => 20,
        3_001..=7_000 => 15,
        7_001..=15_000 => 10,
        _ => 5,
    }
}

/// Total order over players: score descending, ties broken by
/// ascending average latency on correct answers. A player who has
/// never answered correctly sorts as infinitely slow among equals.
/// Capped to [`LEADERBOARD_CAP`] entries.
pub fn leaderboard<'a>(players: impl Iterator<Item = &'a Player>) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<&Player> = players.collect();
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| total_cmp_avg(a, b))
    });

    ranked
        .into_iter()
        .take(LEADERBOARD_CAP)
        .enumerate()
        .map(|(i, p)| LeaderboardEntry {
            rank: i + 1,
            name: p.name.clone(),
            score: p.score,
            photo: p.photo.clone(),
            avg_time_secs: p.avg_time_secs(),
        })
        .collect()
}

fn total_cmp_avg(a: &Player, b: &Player) -> Ordering {
    let avg = |p: &Player| {
        if p.correct_answers == 0 {
            f64::INFINITY
        } else {
            p.total_correct_latency_ms as f64 / p.correct_answers as f64
        }
    };
    avg(a).total_cmp(&avg(b))
}
