use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use roomsweeper_common::{
    models::{Outcome, Pos},
    protocol::Action,
};

use crate::data::{Board, CellState};

impl Board {
    /// Resolves one click.
    ///
    /// Clicking anything but an `Unopened` cell on a running game is a
    /// no-op that returns the current outcome; so is any click once the
    /// outcome is terminal. The first click of a game triggers mine
    /// placement and therefore can never detonate.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn click(&mut self, pos: Pos) -> Outcome {
        if !self.contains(pos) {
            warn!("ignoring click outside the board at ({}, {})", pos.x, pos.y);
            return self.outcome;
        }
        if self.outcome.is_terminal() {
            debug!("ignoring click on finished game {}", self.id());
            return self.outcome;
        }
        if self.cell(pos) != CellState::Unopened {
            debug!("ignoring click on non-hidden cell ({}, {})", pos.x, pos.y);
            return self.outcome;
        }

        if !self.mines_placed {
            self.place_mines(pos);
        }

        if self.is_mine(pos) {
            let adjacent = self.adjacent_mines(pos);
            self.set_cell(pos, CellState::Opened { adjacent });
            self.exploded = Some(pos);
            self.outcome = Outcome::Lost;
            warn!(
                "mine hit at ({}, {}) - game {} over",
                pos.x,
                pos.y,
                self.id()
            );
            return self.outcome;
        }

        self.reveal_from(pos);

        if self.width * self.height - self.opened == self.mines {
            self.outcome = Outcome::Won;
            info!("game {} won, all safe cells opened", self.id());
        }
        self.outcome
    }

    /// Opens `start` and flood-fills across connected cells without any
    /// adjacent mines. Worklist form instead of recursion so a large board
    /// cannot blow the stack; the hidden-state check is repeated at pop
    /// time, which doubles as the visited guard.
    fn reveal_from(&mut self, start: Pos) {
        let mut pending = VecDeque::from([start]);
        while let Some(pos) = pending.pop_front() {
            if self.cell(pos) != CellState::Unopened {
                continue;
            }

            let adjacent = self.adjacent_mines(pos);
            self.set_cell(pos, CellState::Opened { adjacent });
            self.opened += 1;

            if adjacent == 0 {
                // Flagged and maybe cells are deliberately not enqueued:
                // a marked cell is only ever opened by an explicit click
                // after the marker is cleared.
                pending.extend(
                    self.neighbors(pos)
                        .filter(|&neighbor| self.cell(neighbor) == CellState::Unopened),
                );
            }
        }
    }

    /// Toggles the mine marker on a hidden cell. Returns whether anything
    /// changed; every other state (opened, maybe, finished game) is a no-op.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn set_flag(&mut self, pos: Pos) -> bool {
        self.toggle_marker(pos, CellState::Flagged)
    }

    /// Toggles the "maybe a mine" marker on a hidden cell. Same no-op rules
    /// as [`Board::set_flag`]; there is no direct flag-to-maybe transition,
    /// the existing marker has to be cleared first.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn set_maybe(&mut self, pos: Pos) -> bool {
        self.toggle_marker(pos, CellState::Maybe)
    }

    fn toggle_marker(&mut self, pos: Pos, marker: CellState) -> bool {
        if !self.contains(pos) {
            warn!(
                "ignoring marker outside the board at ({}, {})",
                pos.x, pos.y
            );
            return false;
        }
        if self.outcome.is_terminal() {
            debug!("ignoring marker on finished game {}", self.id());
            return false;
        }

        let current = self.cell(pos);
        if current == CellState::Unopened {
            self.set_cell(pos, marker);
            debug!("cell ({}, {}) marked {:?}", pos.x, pos.y, marker);
            true
        } else if current == marker {
            self.set_cell(pos, CellState::Unopened);
            debug!("cell ({}, {}) marker cleared", pos.x, pos.y);
            true
        } else {
            debug!(
                "ignoring {:?} marker on ({}, {}) in state {:?}",
                marker, pos.x, pos.y, current
            );
            false
        }
    }

    /// Administrative or timeout termination: records a loss if the game is
    /// still running, making every later click/flag/maybe a no-op.
    pub fn force_end(&mut self) {
        if self.outcome == Outcome::InProgress {
            self.outcome = Outcome::Lost;
            info!("game {} force-ended", self.id());
        }
    }

    /// Dispatches a parsed chat command to the matching operation.
    pub fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::Click { pos } => self.click(pos),
            Action::Flag { pos } => {
                self.set_flag(pos);
                self.outcome
            }
            Action::Maybe { pos } => {
                self.set_maybe(pos);
                self.outcome
            }
        }
    }

    /// Chooses `self.mines` distinct cells uniformly at random from the
    /// whole grid minus the clicked cell. Streaming ratio sampling: each
    /// candidate is taken with probability `mines left / cells left`.
    fn place_mines(&mut self, safe: Pos) {
        let mut rng = rand::rng();
        let safe_index = self.index(safe);
        let total = self.width * self.height;

        let mut mines_left = self.mines;
        let mut cells_left = total - 1;
        for index in 0..total {
            if index == safe_index {
                continue;
            }
            if mines_left > 0 && rng.random_ratio(mines_left as u32, cells_left as u32) {
                self.mine_grid[index] = true;
                self.mine_positions
                    .push(Pos::new(index % self.width, index / self.width));
                mines_left -= 1;
            }
            cells_left -= 1;
        }

        self.mines_placed = true;
        debug!(
            "game {}: placed {} mines, first click ({}, {}) kept clear",
            self.id(),
            self.mines,
            safe.x,
            safe.y
        );
    }

    pub(crate) fn adjacent_mines(&self, pos: Pos) -> u8 {
        self.neighbors(pos)
            .filter(|&neighbor| self.is_mine(neighbor))
            .count() as u8
    }

    /// The up-to-8 surrounding in-bounds cells; positions off the edge are
    /// simply absent from the iteration.
    fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        let (width, height) = (self.width as i64, self.height as i64);
        (-1..=1i64)
            .flat_map(move |dy| (-1..=1i64).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter_map(move |(dx, dy)| {
                let x = pos.x as i64 + dx;
                let y = pos.y as i64 + dy;
                (x >= 0 && x < width && y >= 0 && y < height)
                    .then(|| Pos::new(x as usize, y as usize))
            })
    }
}
