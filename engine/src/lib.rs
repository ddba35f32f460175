//! Rules engine for a timed, turn-free minesweeper game played through a
//! chat interface.
//!
//! One [`data::Board`] is bound to a chat room via the [`registry::Registry`];
//! every member of the room issues click/flag/maybe commands against the same
//! board. The chat adapter itself (command parsing, privilege checks, image
//! delivery) lives outside this crate and talks to it through the types in
//! `roomsweeper-common`.

pub mod data;
pub mod error;
pub mod logic;
pub mod registry;
pub mod render;
pub mod session;

pub use data::{Board, CellState};
pub use error::GameError;
pub use registry::{GameHandle, Registry, SharedBoard};
