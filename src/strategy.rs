//! Targeting for automated players. Strategies only ever see the attacker's
//! own hit/miss record, never the opponent's ship layout.

use core::fmt;
use core::str::FromStr;

use rand::Rng;

use crate::bitboard::CellSet;
use crate::common::{AttackOutcome, Coord, GameError, Result};

/// Up, down, left, right.
const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Record of attacks a player has sent, keyed by coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttackLog {
    hits: CellSet,
    misses: CellSet,
}

impl AttackLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the outcome of an attack on `cell`. Each cell is recorded once.
    pub fn record(&mut self, cell: Coord, outcome: AttackOutcome) -> Result<()> {
        let cell = cell.validate()?;
        if self.get(cell).is_some() {
            return Err(GameError::AlreadyAttacked {
                row: cell.row,
                col: cell.col,
            });
        }
        match outcome {
            AttackOutcome::Hit => self.hits.insert(cell)?,
            AttackOutcome::Miss => self.misses.insert(cell)?,
        };
        Ok(())
    }

    pub fn get(&self, cell: Coord) -> Option<AttackOutcome> {
        if self.hits.contains(cell) {
            Some(AttackOutcome::Hit)
        } else if self.misses.contains(cell) {
            Some(AttackOutcome::Miss)
        } else {
            None
        }
    }

    pub fn hits(&self) -> CellSet {
        self.hits
    }

    pub fn misses(&self) -> CellSet {
        self.misses
    }

    /// Every cell fired at so far.
    pub fn tried(&self) -> CellSet {
        self.hits | self.misses
    }

    pub fn len(&self) -> usize {
        self.hits.len() + self.misses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How an automated player picks its next target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// Uniform over untried cells.
    Random,
    /// Probe around the first recorded hit, otherwise random.
    #[default]
    Hunt,
    /// Probe around any recorded hit, otherwise random.
    Tracking,
}

impl Strategy {
    pub fn select_target<R: Rng + ?Sized>(&self, log: &AttackLog, rng: &mut R) -> Result<Coord> {
        match self {
            Strategy::Random => random_target(log, rng),
            Strategy::Hunt => hunt_target(log, rng),
            Strategy::Tracking => tracking_target(log, rng),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::Hunt => "hunt",
            Strategy::Tracking => "tracking",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" | "easy" => Ok(Strategy::Random),
            "hunt" | "normal" => Ok(Strategy::Hunt),
            "tracking" | "hard" => Ok(Strategy::Tracking),
            _ => Err(GameError::InvalidStrategy(s.to_string())),
        }
    }
}

/// Pick uniformly among the cells not yet in `log`.
pub fn random_target<R: Rng + ?Sized>(log: &AttackLog, rng: &mut R) -> Result<Coord> {
    let open: Vec<Coord> = (!log.tried()).iter().collect();
    if open.is_empty() {
        return Err(GameError::NoLegalMove);
    }
    Ok(open[rng.random_range(0..open.len())])
}

fn untried_neighbour(log: &AttackLog, cell: Coord) -> Option<Coord> {
    ORTHOGONAL
        .iter()
        .filter_map(|&(dr, dc)| cell.offset(dr, dc))
        .find(|&n| log.get(n).is_none())
}

/// Follow up the first hit in row-major order, then fall back to random.
///
/// Only that one hit is ever considered. Once its four neighbours are tried
/// the strategy goes random even if other hits still have open neighbours.
pub fn hunt_target<R: Rng + ?Sized>(log: &AttackLog, rng: &mut R) -> Result<Coord> {
    if let Some(next) = log
        .hits()
        .iter()
        .next()
        .and_then(|hit| untried_neighbour(log, hit))
    {
        return Ok(next);
    }
    random_target(log, rng)
}

/// Follow up any hit that still has an untried neighbour, then fall back to
/// random.
pub fn tracking_target<R: Rng + ?Sized>(log: &AttackLog, rng: &mut R) -> Result<Coord> {
    if let Some(next) = log
        .hits()
        .iter()
        .find_map(|hit| untried_neighbour(log, hit))
    {
        return Ok(next);
    }
    random_target(log, rng)
}
