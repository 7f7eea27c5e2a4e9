#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod coords;
pub mod env;
pub mod game;
pub mod types;

pub use board::{Board, BoardError, Jump, JumpLayout, JumpTable};
pub use coords::{DomainError, GridCoord, cell_to_coord, coord_to_cell};
pub use env::{ChannelObserver, Observation, PlayerObservation, SnapshotObserver};
pub use game::{Game, GameConfig, GameError, GameState, RollOutcome};
pub use types::{JumpKind, Phase, PlayerId};
