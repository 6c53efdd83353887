//! Two-player Battleship simulation engine.
//!
//! Boards enforce placement spacing and single-shot cells, players fire either
//! by hand or through a targeting [`Strategy`], and the [`GameManager`] runs
//! the match state machine, notifying listeners through its [`EventBus`].

mod bitboard;
mod board;
mod common;
mod config;
mod events;
mod game;
mod logging;
mod player;
pub mod render;
mod ship;
mod strategy;

pub use bitboard::{BitGrid, CellSet, Cells};
pub use board::*;
pub use common::*;
pub use config::*;
pub use events::*;
pub use game::*;
pub use logging::{init_logging, level_from, LOG_ENV};
pub use player::*;
pub use ship::*;
pub use strategy::*;
