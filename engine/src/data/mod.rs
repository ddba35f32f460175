use tracing::info;
use uuid::Uuid;

use roomsweeper_common::{
    config::GameConfig,
    models::{CellView, Outcome, Pos},
    protocol::BoardSnapshot,
};

/// Reveal-state of a single cell. The mine grid is kept separately so a
/// cell can be both a mine and `Opened` (the detonation case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Unopened,
    Flagged,
    Maybe,
    /// `adjacent == 0` renders as a blank opened cell.
    Opened {
        adjacent: u8,
    },
}

impl CellState {
    pub const fn is_opened(self) -> bool {
        matches!(self, Self::Opened { .. })
    }
}

/// One game bound to one chat room.
///
/// The reveal grid and the mine grid are parallel row-major vectors indexed
/// `x + y * width`. Mines are placed lazily on the first click so that click
/// can never detonate (see `logic`).
#[derive(Debug)]
pub struct Board {
    id: Uuid,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) mines: usize,
    pub(crate) cells: Vec<CellState>,
    pub(crate) mine_grid: Vec<bool>,
    pub(crate) mine_positions: Vec<Pos>,
    pub(crate) opened: usize,
    pub(crate) outcome: Outcome,
    pub(crate) mines_placed: bool,
    pub(crate) exploded: Option<Pos>,
}

impl Board {
    /// Builds an empty board. `config` must already have passed
    /// [`GameConfig::validate`]; the registry is the normal entry point.
    pub fn new(config: GameConfig) -> Self {
        let id = Uuid::new_v4();
        info!(
            "creating game {}: {}x{} with {} mines",
            id, config.width, config.height, config.mines
        );
        let total = config.width * config.height;
        Self {
            id,
            width: config.width,
            height: config.height,
            mines: config.mines,
            cells: vec![CellState::Unopened; total],
            mine_grid: vec![false; total],
            mine_positions: Vec::with_capacity(config.mines),
            opened: 0,
            outcome: Outcome::InProgress,
            mines_placed: false,
            exploded: None,
        }
    }

    /// Builds a board with a fixed mine layout, skipping the lazy placement.
    /// Meant for tests and diagnostics; duplicate positions are ignored.
    pub fn with_mine_layout(width: usize, height: usize, mines: &[Pos]) -> Self {
        let mut board = Self::new(GameConfig::custom(width, height, mines.len(), 0));
        for &pos in mines {
            let index = board.index(pos);
            if !board.mine_grid[index] {
                board.mine_grid[index] = true;
                board.mine_positions.push(pos);
            }
        }
        board.mines = board.mine_positions.len();
        board.mines_placed = true;
        board
    }

    pub(crate) fn index(&self, pos: Pos) -> usize {
        pos.x + pos.y * self.width
    }

    /// Bounds check exposed to the dispatcher; coordinates here are 0-based.
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// [`Board::contains`] as a typed rejection for surfacing to the user.
    pub fn check_coordinate(&self, pos: Pos) -> crate::error::Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(crate::error::GameError::OutOfRange)
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mines(&self) -> usize {
        self.mines
    }

    pub fn opened(&self) -> usize {
        self.opened
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// The mine that ended the game, if it ended by detonation.
    pub fn exploded(&self) -> Option<Pos> {
        self.exploded
    }

    /// Read-only export for privileged inspection. Empty until the first
    /// click places the mines.
    pub fn mine_positions(&self) -> &[Pos] {
        &self.mine_positions
    }

    pub fn cell(&self, pos: Pos) -> CellState {
        self.cells[self.index(pos)]
    }

    pub(crate) fn set_cell(&mut self, pos: Pos, state: CellState) {
        let index = self.index(pos);
        self.cells[index] = state;
    }

    pub(crate) fn is_mine(&self, pos: Pos) -> bool {
        self.mine_grid[self.index(pos)]
    }

    /// What a player is allowed to see at `pos` right now.
    pub fn view(&self, pos: Pos) -> CellView {
        match self.cell(pos) {
            CellState::Unopened => CellView::Hidden,
            CellState::Flagged => CellView::Flagged,
            CellState::Maybe => CellView::Maybe,
            CellState::Opened { .. } if self.is_mine(pos) => CellView::Mine,
            CellState::Opened { adjacent } => CellView::Open { adjacent },
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            width: self.width,
            height: self.height,
            mines: self.mines,
            outcome: self.outcome,
            cells: (0..self.height)
                .map(|y| (0..self.width).map(|x| self.view(Pos::new(x, y))).collect())
                .collect(),
        }
    }
}
