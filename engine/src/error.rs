use thiserror::Error;

use roomsweeper_common::config::ConfigError;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("a game is already in progress for this room")]
    AlreadyActive,
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    #[error("invalid coordinate")]
    OutOfRange,
    #[error("no active game for this room")]
    NotActive,
}

pub type Result<T> = std::result::Result<T, GameError>;
