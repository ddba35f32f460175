//! Game-duration watchdog.
//!
//! The board itself never sleeps or polls; it only exposes its outcome.
//! This task is the driver-side loop that bounds a game in time: it wakes
//! up periodically, returns as soon as the room has finished the board,
//! and otherwise calls the game when the configured duration runs out.

use std::{env, time::Duration};

use tokio::time;
use tracing::{debug, info, instrument};

use roomsweeper_common::models::Outcome;

use crate::registry::SharedBoard;

const DEFAULT_POLL_SECS: u64 = 3;

/// Poll cadence of the watchdog, overridable for deployments that want a
/// snappier (or lazier) end-of-game announcement.
pub fn poll_interval() -> Duration {
    let secs = env::var("GAME_POLL_INTERVAL_SECONDS")
        .unwrap_or_else(|_| DEFAULT_POLL_SECS.to_string())
        .parse()
        .unwrap_or(DEFAULT_POLL_SECS);
    Duration::from_secs(secs)
}

/// Watches `board` until it reaches a terminal outcome or `duration`
/// elapses, polling at [`poll_interval`].
pub async fn watch_game(board: SharedBoard, duration: Duration) -> Outcome {
    watch_game_with(board, duration, poll_interval()).await
}

/// [`watch_game`] with an explicit poll cadence.
///
/// On expiry the board is forced into a loss and `TimedOut` is returned;
/// the board itself records `Lost` (the distinction only affects the
/// closing chat message). Cancelling the task leaves the board running.
#[instrument(level = "trace", skip(board), fields(duration_secs = duration.as_secs()))]
pub async fn watch_game_with(board: SharedBoard, duration: Duration, poll: Duration) -> Outcome {
    let deadline = time::Instant::now() + duration;
    let mut interval = time::interval(poll);

    loop {
        interval.tick().await;

        {
            let board = board.lock().await;
            let outcome = board.outcome();
            if outcome.is_terminal() {
                info!("game {} finished: {:?}", board.id(), outcome);
                return outcome;
            }
        }

        if time::Instant::now() >= deadline {
            let mut board = board.lock().await;
            // Re-check under the lock: a click may have finished the game
            // between the poll above and acquiring the lock.
            if board.outcome().is_terminal() {
                return board.outcome();
            }
            board.force_end();
            info!("game {} ran out of time", board.id());
            return Outcome::TimedOut;
        }

        debug!("game still running, next poll in {:?}", poll);
    }
}
