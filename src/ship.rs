//! Ships, their types and orientations.

use core::fmt;
use core::str::FromStr;

use crate::common::{GameError, Result};
use crate::config::BOARD_SIZE;

/// Orientation of a ship on the board. Ships grow downward when vertical and
/// rightward when horizontal, starting from their origin cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    /// Row and column step between consecutive ship cells.
    pub fn step(self) -> (usize, usize) {
        match self {
            Orientation::Vertical => (1, 0),
            Orientation::Horizontal => (0, 1),
        }
    }
}

impl FromStr for Orientation {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "v" | "vertical" => Ok(Orientation::Vertical),
            "h" | "horizontal" => Ok(Orientation::Horizontal),
            _ => Err(GameError::InvalidOrientation(s.to_string())),
        }
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    name: &'static str,
    length: usize,
}

impl ShipType {
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// A ship with its damage counter.
///
/// Ships are not `Clone`: placing one moves it into a board, so a
/// single ship can never sit on two boards or twice on the same one.
#[derive(PartialEq, Eq)]
pub struct Ship {
    name: Option<&'static str>,
    length: usize,
    hits: usize,
}

impl Ship {
    /// Create an unnamed ship. Fails for a zero length or one that cannot fit
    /// on the board.
    pub fn new(length: usize) -> Result<Self> {
        if length == 0 || length > BOARD_SIZE {
            return Err(GameError::InvalidShipLength(length));
        }
        Ok(Ship {
            name: None,
            length,
            hits: 0,
        })
    }

    pub fn from_type(ship_type: ShipType) -> Result<Self> {
        let mut ship = Ship::new(ship_type.length())?;
        ship.name = Some(ship_type.name());
        Ok(ship)
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Record one hit. Hits past the length are still counted.
    pub fn damage(&mut self) {
        self.hits += 1;
    }

    pub fn is_sunk(&self) -> bool {
        self.hits >= self.length
    }

    /// A new undamaged ship with the same name and length.
    pub fn pristine(&self) -> Ship {
        Ship {
            name: self.name,
            length: self.length,
            hits: 0,
        }
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: {:?}, length: {}, hits: {} }}",
            self.name.unwrap_or("-"),
            self.length,
            self.hits,
        )
    }
}

/// Build one ship per length.
pub fn fleet_from_lengths(lengths: &[usize]) -> Result<Vec<Ship>> {
    lengths.iter().map(|&len| Ship::new(len)).collect()
}

/// Build one named ship per type.
pub fn fleet_from_types(types: &[ShipType]) -> Result<Vec<Ship>> {
    types.iter().map(|&def| Ship::from_type(def)).collect()
}
