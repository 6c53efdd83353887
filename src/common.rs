//! Common types for Battleship: coordinates, attack outcomes and errors.

use core::fmt;

use thiserror::Error;

use crate::config::BOARD_SIZE;

/// A cell on the board, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns `true` when the cell lies on a `BOARD_SIZE` grid.
    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Fails with [`GameError::OutOfBounds`] for off-board cells.
    pub fn validate(self) -> Result<Self> {
        if self.in_bounds() {
            Ok(self)
        } else {
            Err(GameError::OutOfBounds {
                row: self.row,
                col: self.col,
            })
        }
    }

    /// Step by a signed offset, `None` when it leaves the board.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Coord> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        let next = Coord::new(row, col);
        next.in_bounds().then_some(next)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord::new(row, col)
    }
}

/// Render as the human notation used by the CLI, e.g. `B7` for row 6, col 1.
/// Off-board cells print as `(row, col)`.
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.in_bounds() {
            return write!(f, "({}, {})", self.row, self.col);
        }
        let col = char::from(b'A' + self.col as u8);
        write!(f, "{}{}", col, self.row + 1)
    }
}

/// Result of a single attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AttackOutcome {
    Hit,
    Miss,
}

impl AttackOutcome {
    pub fn is_hit(self) -> bool {
        matches!(self, AttackOutcome::Hit)
    }
}

impl From<bool> for AttackOutcome {
    fn from(hit: bool) -> Self {
        if hit {
            AttackOutcome::Hit
        } else {
            AttackOutcome::Miss
        }
    }
}

/// Errors returned by board, player and game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("coordinate ({row}, {col}) is outside the {size}x{size} board", size = BOARD_SIZE)]
    OutOfBounds { row: usize, col: usize },
    #[error("cell ({row}, {col}) is already occupied")]
    OccupiedCell { row: usize, col: usize },
    #[error("cell ({row}, {col}) touches another ship")]
    AdjacentShip { row: usize, col: usize },
    #[error("cell ({row}, {col}) was already attacked")]
    AlreadyAttacked { row: usize, col: usize },
    #[error("ship length must be between 1 and {max}, got {0}", max = BOARD_SIZE)]
    InvalidShipLength(usize),
    #[error("player name cannot be empty")]
    InvalidName,
    #[error("not a valid player type: {0:?} (human or computer)")]
    InvalidPlayerType(String),
    #[error("no player with index {0}")]
    InvalidPlayerIndex(usize),
    #[error("ship list must not be empty")]
    EmptyShipList,
    #[error("coordinate list must not be empty")]
    EmptyCoordinateList,
    #[error("{ships} ships but {coordinates} coordinates")]
    CoordinateCountMismatch { ships: usize, coordinates: usize },
    #[error("game not in progress")]
    GameNotInProgress,
    #[error("game has already started")]
    GameAlreadyStarted,
    #[error("unable to place fleet after {attempts} layouts")]
    UnplaceableFleet { attempts: usize },
    #[error("no untried cell left to attack")]
    NoLegalMove,
    #[error("no ship with id {0} on this board")]
    UnknownShip(usize),
    #[error("not a valid orientation: {0:?} (vertical or horizontal)")]
    InvalidOrientation(String),
    #[error("not a valid strategy: {0:?} (random, hunt or tracking)")]
    InvalidStrategy(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
