//! Per-room timer tasks.
//!
//! Each room has at most one pending timer: either the per-question
//! countdown or an auto-play delay. A timer is a spawned task that
//! posts messages back into the engine's channel; cancelling aborts
//! the task and drops the room's timer record, so a message already in
//! flight when the abort lands no longer matches any pending epoch and
//! is recognized as stale.

use std::time::Duration;

use quizcast_game::AutoPlayStep;
use quizcast_protocol::RoomId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::engine::EngineMsg;

/// What a pending timer will do when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerKind {
    Countdown,
    AutoPlay(AutoPlayStep),
}

/// The one pending timer of a room.
pub(crate) struct ActiveTimer {
    pub(crate) kind: TimerKind,
    pub(crate) epoch: u64,
    handle: JoinHandle<()>,
}

impl ActiveTimer {
    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}

/// Spawns the question countdown: one tick per second for the clients'
/// clocks, then the expiry that triggers the reveal.
pub(crate) fn spawn_countdown(
    tx: mpsc::UnboundedSender<EngineMsg>,
    room: RoomId,
    seconds: u64,
    epoch: u64,
) -> ActiveTimer {
    let handle = tokio::spawn(async move {
        for remaining in (0..seconds).rev() {
            tokio::time::sleep(Duration::from_secs(1)).await;
            if remaining > 0 {
                let tick = EngineMsg::TimerTick {
                    room,
                    epoch,
                    seconds_remaining: remaining,
                };
                if tx.send(tick).is_err() {
                    return;
                }
            }
        }
        let _ = tx.send(EngineMsg::TimerFired {
            room,
            epoch,
            kind: TimerKind::Countdown,
        });
    });
    ActiveTimer {
        kind: TimerKind::Countdown,
        epoch,
        handle,
    }
}

/// Spawns an auto-play delay that posts a single step when it elapses.
pub(crate) fn spawn_autoplay(
    tx: mpsc::UnboundedSender<EngineMsg>,
    room: RoomId,
    delay: Duration,
    step: AutoPlayStep,
    epoch: u64,
) -> ActiveTimer {
    let handle = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(EngineMsg::TimerFired {
            room,
            epoch,
            kind: TimerKind::AutoPlay(step),
        });
    });
    ActiveTimer {
        kind: TimerKind::AutoPlay(step),
        epoch,
        handle,
    }
}
