use std::sync::Arc;

use dashmap::{DashMap, Entry};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use roomsweeper_common::config::GameConfig;

use crate::{
    data::Board,
    error::{GameError, Result},
};

pub type SharedBoard = Arc<Mutex<Board>>;

/// Process-wide map from chat-room identifier to the room's single live
/// game. Cheap to clone; all clones share the same map.
///
/// Mutating operations on one board must go through its mutex, which makes
/// a whole click (flood fill included) one critical section. Boards of
/// different rooms are fully independent.
#[derive(Clone, Default)]
pub struct Registry {
    games: Arc<DashMap<String, SharedBoard>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, room: &str) -> bool {
        self.games.contains_key(room)
    }

    /// Validates the configuration and registers a fresh board for `room`.
    ///
    /// The map entry is claimed atomically, so when several start commands
    /// race only one of them wins; the rest observe [`GameError::AlreadyActive`].
    /// The returned guard keeps the room registered until it is dropped.
    #[instrument(
        level = "trace",
        skip(self, config),
        fields(width = config.width, height = config.height, mines = config.mines)
    )]
    pub fn start(&self, room: &str, config: GameConfig) -> Result<GameHandle> {
        config.validate()?;

        match self.games.entry(room.to_string()) {
            Entry::Occupied(_) => {
                debug!("start rejected, room {} already has a game", room);
                Err(GameError::AlreadyActive)
            }
            Entry::Vacant(entry) => {
                let board = Arc::new(Mutex::new(Board::new(config)));
                entry.insert(Arc::clone(&board));
                info!("room {} now has an active game", room);
                Ok(GameHandle {
                    room: room.to_string(),
                    board,
                    games: Arc::clone(&self.games),
                })
            }
        }
    }

    pub fn get(&self, room: &str) -> Option<SharedBoard> {
        self.games.get(room).map(|entry| Arc::clone(entry.value()))
    }

    /// Like [`Registry::get`], as a typed rejection for command handling.
    pub fn board(&self, room: &str) -> Result<SharedBoard> {
        self.get(room).ok_or(GameError::NotActive)
    }

    /// Removes the room's game immediately (administrative termination).
    /// Returns whether a game was registered.
    pub fn end(&self, room: &str) -> bool {
        let removed = self.games.remove(room).is_some();
        if removed {
            info!("room {} game removed from registry", room);
        }
        removed
    }
}

/// Scope guard for one registered game. Held by the session driver for the
/// whole game duration; dropping it unregisters the room on every exit
/// path, including panics and forced termination.
#[derive(Debug)]
pub struct GameHandle {
    room: String,
    board: SharedBoard,
    games: Arc<DashMap<String, SharedBoard>>,
}

impl GameHandle {
    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn board(&self) -> SharedBoard {
        Arc::clone(&self.board)
    }
}

impl Drop for GameHandle {
    fn drop(&mut self) {
        // Remove only our own board: the room may have been ended and
        // restarted while this handle was still alive.
        let removed = self
            .games
            .remove_if(&self.room, |_, board| Arc::ptr_eq(board, &self.board));
        if removed.is_some() {
            info!("room {} game unregistered", self.room);
        }
    }
}
