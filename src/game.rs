//! Match orchestration: fleet setup, the state machine and turn order.

use core::fmt;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::{
    board::{Board, Placement, ShipId},
    common::{AttackOutcome, Coord, GameError, Result},
    config::GameConfig,
    events::{EventBus, GameEvent},
    player::{Player, PlayerKind},
    ship::{Orientation, Ship},
    strategy::Strategy,
};

/// Requested ship origin, as `(row, col, orientation)`.
pub type ShipCoordinate = (usize, usize, Orientation);

/// Lifecycle of a match. It only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GameState {
    Initialization,
    InProgress,
    GameOver,
}

impl GameState {
    fn can_become(self, next: GameState) -> bool {
        matches!(
            (self, next),
            (GameState::Initialization, GameState::InProgress)
                | (GameState::InProgress, GameState::GameOver)
        )
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameState::Initialization => "initialization",
            GameState::InProgress => "in progress",
            GameState::GameOver => "game over",
        };
        f.write_str(s)
    }
}

/// Ships for one side, with explicit origins or `None` for a random layout.
#[derive(Debug)]
pub struct FleetSpec {
    pub ships: Vec<Ship>,
    pub coordinates: Option<Vec<ShipCoordinate>>,
}

impl FleetSpec {
    pub fn random(ships: Vec<Ship>) -> Self {
        Self {
            ships,
            coordinates: None,
        }
    }

    pub fn at(ships: Vec<Ship>, coordinates: Vec<ShipCoordinate>) -> Self {
        Self {
            ships,
            coordinates: Some(coordinates),
        }
    }
}

/// One resolved attack within a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnRecord {
    pub turn: u32,
    pub attacker: usize,
    pub target: usize,
    pub coord: Coord,
    pub outcome: AttackOutcome,
}

/// Per-player figures for [`MatchSummary`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSummary {
    pub name: String,
    pub strategy: Option<Strategy>,
    pub shots: usize,
    pub hits: usize,
    pub ships_afloat: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchSummary {
    pub state: GameState,
    pub turn: u32,
    pub winner: Option<String>,
    pub players: [PlayerSummary; 2],
}

/// Runs one match between two players. A finished manager cannot be restarted.
pub struct GameManager {
    players: [Player; 2],
    state: GameState,
    turn: u32,
    current: Option<usize>,
    winner: Option<usize>,
    events: EventBus,
    config: GameConfig,
    rng: SmallRng,
}

impl GameManager {
    pub fn new(players: [Player; 2]) -> Self {
        Self::with_config(players, GameConfig::default())
    }

    /// A seeded config makes ship layouts and automated targeting repeatable.
    pub fn with_config(mut players: [Player; 2], config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => {
                for (i, player) in players.iter_mut().enumerate() {
                    player.reseed(seed.wrapping_add(i as u64 + 1));
                }
                SmallRng::seed_from_u64(seed)
            }
            None => {
                let mut seed_rng = rand::rng();
                SmallRng::from_rng(&mut seed_rng)
            }
        };
        for player in players.iter_mut() {
            player.clear_history();
        }
        Self {
            players,
            state: GameState::Initialization,
            turn: 0,
            current: None,
            winner: None,
            events: EventBus::new(),
            config,
            rng,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Subscribe presentation code here.
    pub fn events(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, index: usize) -> Result<&Player> {
        self.players
            .get(index)
            .ok_or(GameError::InvalidPlayerIndex(index))
    }

    fn player_mut(&mut self, index: usize) -> Result<&mut Player> {
        self.players
            .get_mut(index)
            .ok_or(GameError::InvalidPlayerIndex(index))
    }

    pub fn current_player_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current.map(|i| &self.players[i])
    }

    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|i| &self.players[i])
    }

    pub fn winner_index(&self) -> Option<usize> {
        self.winner
    }

    pub fn set_player_name(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.player_mut(index)?.set_name(name)
    }

    pub fn set_player_kind(&mut self, index: usize, kind: PlayerKind) -> Result<()> {
        self.player_mut(index)?.set_kind(kind);
        Ok(())
    }

    /// Swap the targeting strategy; a human player becomes automated.
    pub fn set_player_strategy(&mut self, index: usize, strategy: Strategy) -> Result<()> {
        self.player_mut(index)?.set_strategy(strategy);
        Ok(())
    }

    fn ensure_setup(&self) -> Result<()> {
        if self.state != GameState::Initialization {
            return Err(GameError::GameAlreadyStarted);
        }
        Ok(())
    }

    /// Lay out a fleet on a fresh board for player `index`.
    ///
    /// With `coordinates` the ships go to those origins in order (edge
    /// clamping applies); without, a random legal layout is sampled. The
    /// player's board is only replaced once every ship is placed.
    pub fn initialize_ships(
        &mut self,
        index: usize,
        ships: Vec<Ship>,
        coordinates: Option<&[ShipCoordinate]>,
    ) -> Result<Vec<Placement>> {
        self.player(index)?;
        self.ensure_setup()?;
        let (board, placements) = self.build_fleet(ships, coordinates)?;
        Ok(self.commit_fleet(index, board, placements))
    }

    /// Place `ships` on a new board without touching either player.
    fn build_fleet(
        &mut self,
        ships: Vec<Ship>,
        coordinates: Option<&[ShipCoordinate]>,
    ) -> Result<(Board, Vec<Placement>)> {
        if ships.is_empty() {
            return Err(GameError::EmptyShipList);
        }
        let generated;
        let coordinates = match coordinates {
            Some([]) => return Err(GameError::EmptyCoordinateList),
            Some(coords) if coords.len() != ships.len() => {
                return Err(GameError::CoordinateCountMismatch {
                    ships: ships.len(),
                    coordinates: coords.len(),
                })
            }
            Some(coords) => coords,
            None => {
                let lengths: Vec<usize> = ships.iter().map(Ship::length).collect();
                generated = Board::random_layout(&mut self.rng, &lengths, &self.config)?
                    .into_iter()
                    .map(|(at, orient)| (at.row, at.col, orient))
                    .collect::<Vec<_>>();
                &generated[..]
            }
        };

        let mut board = Board::new();
        let mut placements = Vec::with_capacity(ships.len());
        for (ship, &(row, col, orientation)) in ships.into_iter().zip(coordinates) {
            placements.push(board.place(row, col, ship, orientation)?);
        }
        Ok((board, placements))
    }

    fn commit_fleet(
        &mut self,
        index: usize,
        board: Board,
        placements: Vec<Placement>,
    ) -> Vec<Placement> {
        self.players[index].set_board(board);
        debug!("player {} fleet ready: {} ships", index, placements.len());

        for placement in &placements {
            let length = self.players[index]
                .board()
                .ship(placement.id)
                .map_or(0, Ship::length);
            self.events.emit(&GameEvent::ShipPlaced {
                player: index,
                ship: placement.id,
                length,
                start: placement.start,
                orientation: placement.orientation,
            });
        }
        placements
    }

    /// Throw away player `index`'s layout and sample a new random one with
    /// undamaged ships of the same lengths.
    pub fn randomize_ships(&mut self, index: usize) -> Result<Vec<Placement>> {
        let ships: Vec<Ship> = self.player(index)?.board().ships().map(Ship::pristine).collect();
        self.initialize_ships(index, ships, None)
    }

    /// Move one of player `index`'s ships before the match starts.
    pub fn move_ship(
        &mut self,
        index: usize,
        ship: ShipId,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<Placement> {
        self.player(index)?;
        self.ensure_setup()?;
        match self.players[index]
            .board_mut()
            .relocate(ship, row, col, orientation)
        {
            Ok(placement) => {
                self.events.emit(&GameEvent::ShipMoved {
                    player: index,
                    ship,
                    start: placement.start,
                    orientation,
                });
                Ok(placement)
            }
            Err(err) => {
                debug!("rejected move of ship {} for player {}: {}", ship, index, err);
                self.events.emit(&GameEvent::MoveRejected {
                    player: index,
                    ship,
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Set up both fleets and hand the first turn to player `first`.
    ///
    /// A `None` fleet keeps the layout already on that player's board. Neither
    /// board changes unless both fleets can be placed. If the
    /// first player is automated its turns are played before returning; the
    /// records of those turns are returned.
    pub fn start_game(
        &mut self,
        first: usize,
        fleets: [Option<FleetSpec>; 2],
    ) -> Result<Vec<TurnRecord>> {
        self.player(first)?;
        self.ensure_setup()?;
        for (i, fleet) in fleets.iter().enumerate() {
            if fleet.is_none() && self.players[i].board().ship_count() == 0 {
                return Err(GameError::EmptyShipList);
            }
        }
        let mut built = Vec::with_capacity(fleets.len());
        for (i, fleet) in fleets.into_iter().enumerate() {
            if let Some(given) = fleet {
                let (board, placements) =
                    self.build_fleet(given.ships, given.coordinates.as_deref())?;
                built.push((i, board, placements));
            }
        }
        for (i, board, placements) in built {
            self.commit_fleet(i, board, placements);
        }

        self.set_state(GameState::InProgress)?;
        self.switch_to(first);
        self.run_automated_turns()
    }

    /// Fire the current player's shot at (`row`, `col`).
    ///
    /// Automated players ignore the coordinate. After the turn passes, any
    /// automated player whose turn it becomes plays immediately, so on return
    /// it is a human's turn or the game is over. Returns every turn resolved.
    pub fn play_turn(&mut self, row: usize, col: usize) -> Result<Vec<TurnRecord>> {
        if self.state != GameState::InProgress {
            return Err(GameError::GameNotInProgress);
        }
        let mut records = vec![self.resolve_turn(row, col)?];
        records.extend(self.run_automated_turns()?);
        Ok(records)
    }

    /// Pass the turn to the other player without attacking.
    pub fn switch_turn(&mut self) -> Result<Vec<TurnRecord>> {
        let current = match (self.state, self.current) {
            (GameState::InProgress, Some(current)) => current,
            _ => return Err(GameError::GameNotInProgress),
        };
        self.switch_to(1 - current);
        self.run_automated_turns()
    }

    pub fn summary(&self) -> MatchSummary {
        let players = core::array::from_fn(|i| {
            let player = &self.players[i];
            PlayerSummary {
                name: player.name().to_string(),
                strategy: player.strategy(),
                shots: player.history().len(),
                hits: player.history().hits().len(),
                ships_afloat: player.board().ships_afloat(),
            }
        });
        MatchSummary {
            state: self.state,
            turn: self.turn,
            winner: self.winner().map(|p| p.name().to_string()),
            players,
        }
    }

    fn set_state(&mut self, new: GameState) -> Result<()> {
        let old = self.state;
        if !old.can_become(new) {
            return Err(match old {
                GameState::Initialization => GameError::GameNotInProgress,
                _ => GameError::GameAlreadyStarted,
            });
        }
        self.state = new;
        info!("game state: {} -> {}", old, new);
        self.events.emit(&GameEvent::StateChanged { old, new });
        Ok(())
    }

    fn switch_to(&mut self, next: usize) {
        let previous = self.current;
        self.current = Some(next);
        self.turn += 1;
        debug!(
            "turn {}: {} to move",
            self.turn,
            self.players[next].name()
        );
        self.events.emit(&GameEvent::TurnChanged {
            previous,
            next,
            turn: self.turn,
        });
    }

    fn attacker_and_target(&mut self, attacker: usize) -> (&mut Player, &mut Player) {
        let [first, second] = &mut self.players;
        if attacker == 0 {
            (first, second)
        } else {
            (second, first)
        }
    }

    fn resolve_turn(&mut self, row: usize, col: usize) -> Result<TurnRecord> {
        let attacker = self.current.ok_or(GameError::GameNotInProgress)?;
        let target = 1 - attacker;
        let (shooter, defender) = self.attacker_and_target(attacker);
        let report = shooter.attack(defender, row, col)?;
        let record = TurnRecord {
            turn: self.turn,
            attacker,
            target,
            coord: report.coord,
            outcome: report.outcome,
        };
        self.events.emit(&GameEvent::AttackResolved {
            attacker,
            target,
            coord: report.coord,
            outcome: report.outcome,
        });

        if self.players[target].board().has_all_ships_sunk() {
            self.winner = Some(attacker);
            self.set_state(GameState::GameOver)?;
            let winner = self.players[attacker].name().to_string();
            info!("{} wins after {} turns", winner, self.turn);
            self.events.emit(&GameEvent::GameOver { winner });
        } else {
            self.switch_to(target);
        }
        Ok(record)
    }

    /// Play automated turns until a human is to move or the game ends. Every
    /// attack uses a fresh cell, so a fleet-carrying board is sunk before the
    /// untried cells run out.
    fn run_automated_turns(&mut self) -> Result<Vec<TurnRecord>> {
        let mut records = Vec::new();
        while self.state == GameState::InProgress
            && self.current_player().is_some_and(Player::is_automated)
        {
            records.push(self.resolve_turn(0, 0)?);
        }
        Ok(records)
    }
}

impl fmt::Debug for GameManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameManager")
            .field("state", &self.state)
            .field("turn", &self.turn)
            .field("current", &self.current)
            .field("players", &self.players)
            .finish()
    }
}
