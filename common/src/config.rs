use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest allowed board side.
pub const MIN_SIDE: usize = 3;
/// Largest allowed board side.
pub const MAX_SIDE: usize = 30;
/// Smallest allowed mine count.
pub const MIN_MINES: usize = 3;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board sides must be at least {MIN_SIDE} cells")]
    BoardTooSmall,
    #[error("board sides must be at most {MAX_SIDE} cells")]
    BoardTooLarge,
    #[error("at least {MIN_MINES} mines are required")]
    TooFewMines,
    #[error("mine count must be smaller than the number of cells")]
    TooManyMines,
}

/// Parameters of one game. Built-in presets live on [`Difficulty`];
/// free-form configurations must pass [`GameConfig::validate`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    /// How long the room has to finish the game before the watchdog calls it.
    pub duration: Duration,
}

impl GameConfig {
    pub const fn custom(width: usize, height: usize, mines: usize, minutes: u64) -> Self {
        Self {
            width,
            height,
            mines,
            duration: Duration::from_secs(minutes * 60),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_SIDE || self.height < MIN_SIDE {
            return Err(ConfigError::BoardTooSmall);
        }
        if self.width > MAX_SIDE || self.height > MAX_SIDE {
            return Err(ConfigError::BoardTooLarge);
        }
        if self.mines < MIN_MINES {
            return Err(ConfigError::TooFewMines);
        }
        if self.mines >= self.width * self.height {
            return Err(ConfigError::TooManyMines);
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Difficulty::Easy.config()
    }
}

/// The three built-in presets offered by the chat command.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::custom(8, 8, 5, 5),
            Self::Normal => GameConfig::custom(10, 10, 15, 10),
            Self::Hard => GameConfig::custom(15, 15, 30, 10),
        }
    }
}
