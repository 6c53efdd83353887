//! Players: a name, who picks their moves, their own board and the shots
//! they have fired.

use core::str::FromStr;

use log::debug;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::{
    board::Board,
    common::{AttackOutcome, Coord, GameError, Result},
    strategy::{AttackLog, Strategy},
};

/// Who decides a player's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlayerKind {
    /// Moves come from outside, one coordinate per turn.
    Human,
    /// Moves are chosen by the strategy.
    Automated(Strategy),
}

impl FromStr for PlayerKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "real" => Ok(PlayerKind::Human),
            "computer" | "automated" | "ai" => Ok(PlayerKind::Automated(Strategy::default())),
            _ => Err(GameError::InvalidPlayerType(s.to_string())),
        }
    }
}

/// The resolved target and outcome of one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackReport {
    pub coord: Coord,
    pub outcome: AttackOutcome,
}

/// A participant: identity, own board and the record of shots fired.
#[derive(Debug)]
pub struct Player {
    name: String,
    kind: PlayerKind,
    board: Board,
    history: AttackLog,
    rng: SmallRng,
}

fn valid_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(GameError::InvalidName);
    }
    Ok(name)
}

impl Player {
    pub fn new(name: impl Into<String>, kind: PlayerKind) -> Result<Self> {
        let mut seed_rng = rand::rng();
        Ok(Self {
            name: valid_name(name.into())?,
            kind,
            board: Board::new(),
            history: AttackLog::new(),
            rng: SmallRng::from_rng(&mut seed_rng),
        })
    }

    pub fn human(name: impl Into<String>) -> Result<Self> {
        Self::new(name, PlayerKind::Human)
    }

    pub fn automated(name: impl Into<String>, strategy: Strategy) -> Result<Self> {
        Self::new(name, PlayerKind::Automated(strategy))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.name = valid_name(name.into())?;
        Ok(())
    }

    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: PlayerKind) {
        self.kind = kind;
    }

    pub fn is_automated(&self) -> bool {
        matches!(self.kind, PlayerKind::Automated(_))
    }

    pub fn strategy(&self) -> Option<Strategy> {
        match self.kind {
            PlayerKind::Automated(strategy) => Some(strategy),
            PlayerKind::Human => None,
        }
    }

    /// Hand the player over to `strategy`, making it automated.
    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.kind = PlayerKind::Automated(strategy);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Swap in a new board, returning the previous one.
    pub fn set_board(&mut self, board: Board) -> Board {
        core::mem::replace(&mut self.board, board)
    }

    /// Shots this player has fired and what they hit.
    pub fn history(&self) -> &AttackLog {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history = AttackLog::new();
    }

    /// Make this player's random choices reproducible.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// The cell this player will fire at: `requested` for humans, the
    /// strategy's choice for automated players.
    pub fn resolve_target(&mut self, requested: Coord) -> Result<Coord> {
        match self.kind {
            PlayerKind::Human => requested.validate(),
            PlayerKind::Automated(strategy) => strategy.select_target(&self.history, &mut self.rng),
        }
    }

    /// Fire at `opponent`. Automated players ignore (`row`, `col`).
    pub fn attack(&mut self, opponent: &mut Player, row: usize, col: usize) -> Result<AttackReport> {
        let coord = self.resolve_target(Coord::new(row, col))?;
        if self.history.get(coord).is_some() {
            return Err(GameError::AlreadyAttacked {
                row: coord.row,
                col: coord.col,
            });
        }
        let outcome = opponent.board.receive_attack(coord.row, coord.col)?;
        self.history.record(coord, outcome)?;
        debug!(
            "{} attacked {} at {}: {:?}",
            self.name, opponent.name, coord, outcome
        );
        Ok(AttackReport { coord, outcome })
    }
}
