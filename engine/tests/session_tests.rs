use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use roomsweeper_common::models::{Outcome, Pos};
use roomsweeper_engine::{Board, SharedBoard, session};

fn shared(board: Board) -> SharedBoard {
    Arc::new(Mutex::new(board))
}

fn corner_mine_board() -> Board {
    Board::with_mine_layout(4, 4, &[Pos::new(0, 0), Pos::new(2, 0)])
}

#[tokio::test]
async fn watchdog_forces_a_loss_on_expiry() {
    let board = shared(corner_mine_board());

    let outcome = session::watch_game_with(
        Arc::clone(&board),
        Duration::from_millis(50),
        Duration::from_millis(10),
    )
    .await;

    assert_eq!(outcome, Outcome::TimedOut);
    let mut board = board.lock().await;
    // The board itself records a plain loss; TimedOut is watchdog-only.
    assert_eq!(board.outcome(), Outcome::Lost);
    assert_eq!(board.click(Pos::new(3, 3)), Outcome::Lost);
    assert!(!board.set_flag(Pos::new(3, 3)));
}

#[tokio::test]
async fn watchdog_returns_an_already_terminal_outcome() {
    let mut board = corner_mine_board();
    assert_eq!(board.click(Pos::new(0, 0)), Outcome::Lost);
    let board = shared(board);

    let outcome = session::watch_game_with(
        Arc::clone(&board),
        Duration::from_secs(60),
        Duration::from_millis(10),
    )
    .await;

    assert_eq!(outcome, Outcome::Lost);
}

#[tokio::test]
async fn watchdog_notices_a_win_while_waiting() {
    let board = shared(Board::with_mine_layout(3, 3, &[Pos::new(0, 0)]));

    let watcher = tokio::spawn(session::watch_game_with(
        Arc::clone(&board),
        Duration::from_secs(60),
        Duration::from_millis(10),
    ));

    tokio::time::sleep(Duration::from_millis(30)).await;
    // Opposite corner cascade: opens every safe cell in one click.
    assert_eq!(board.lock().await.click(Pos::new(2, 2)), Outcome::Won);

    assert_eq!(watcher.await.unwrap(), Outcome::Won);
}
