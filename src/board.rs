//! Game board: ship placement with edge clamping and spacing rules, attack
//! resolution, and the history of attacks received.

use core::fmt;

use log::debug;
use rand::Rng;

use crate::bitboard::CellSet;
use crate::common::{AttackOutcome, Coord, GameError, Result};
use crate::config::{GameConfig, BOARD_SIZE};
use crate::ship::{Orientation, Ship};

/// Index of a ship in its board's placement order.
pub type ShipId = usize;

/// Where a ship actually ended up after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub id: ShipId,
    pub start: Coord,
    pub orientation: Orientation,
}

struct PlacedShip {
    ship: Ship,
    start: Coord,
    orientation: Orientation,
    cells: CellSet,
}

pub struct Board {
    grid: [[Option<ShipId>; BOARD_SIZE]; BOARD_SIZE],
    ships: Vec<PlacedShip>,
    occupied: CellSet,
    hits: CellSet,
    misses: CellSet,
}

/// Shift `pos` back so that `len` cells starting there stay on the board.
fn clamp_start(pos: usize, len: usize) -> usize {
    pos.min(BOARD_SIZE - len)
}

/// Clamped origin and cells covered by a ship of `length` requested at `start`.
fn footprint(start: Coord, length: usize, orientation: Orientation) -> Result<(Coord, CellSet)> {
    let origin = match orientation {
        Orientation::Vertical => Coord::new(clamp_start(start.row, length), start.col),
        Orientation::Horizontal => Coord::new(start.row, clamp_start(start.col, length)),
    };
    let (dr, dc) = orientation.step();
    let cells = CellSet::from_cells(
        (0..length).map(|i| Coord::new(origin.row + i * dr, origin.col + i * dc)),
    )?;
    Ok((origin, cells))
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Board {
            grid: [[None; BOARD_SIZE]; BOARD_SIZE],
            ships: Vec::new(),
            occupied: CellSet::new(),
            hits: CellSet::new(),
            misses: CellSet::new(),
        }
    }

    /// Check a placement without touching the board.
    ///
    /// Returns the clamped origin and the covered cells. `ignore` excludes one
    /// already placed ship from the overlap and spacing checks, which lets a
    /// ship be moved to a spot overlapping its old position.
    pub fn check_placement(
        &self,
        row: usize,
        col: usize,
        length: usize,
        orientation: Orientation,
        ignore: Option<ShipId>,
    ) -> Result<(Coord, CellSet)> {
        let start = Coord::new(row, col).validate()?;
        if length == 0 || length > BOARD_SIZE {
            return Err(GameError::InvalidShipLength(length));
        }
        let (origin, cells) = footprint(start, length, orientation)?;

        let mut others = self.occupied;
        if let Some(id) = ignore {
            let own = self.ships.get(id).ok_or(GameError::UnknownShip(id))?;
            others = others & !own.cells;
        }

        if let Some(cell) = (cells & others).iter().next() {
            return Err(GameError::OccupiedCell {
                row: cell.row,
                col: cell.col,
            });
        }
        if let Some(cell) = (cells.halo() & others).iter().next() {
            return Err(GameError::AdjacentShip {
                row: cell.row,
                col: cell.col,
            });
        }
        Ok((origin, cells))
    }

    /// Place `ship` starting at (`row`, `col`).
    ///
    /// A ship that would run off the edge is shifted back to sit flush against
    /// it. Fails if the ship would overlap or touch (diagonals included) a ship
    /// already on the board; the board is left unchanged in that case.
    pub fn place(
        &mut self,
        row: usize,
        col: usize,
        ship: Ship,
        orientation: Orientation,
    ) -> Result<Placement> {
        let (start, cells) = self.check_placement(row, col, ship.length(), orientation, None)?;
        let id = self.ships.len();
        for cell in cells.iter() {
            self.grid[cell.row][cell.col] = Some(id);
        }
        self.occupied |= cells;
        debug!(
            "placed ship {} (length {}) at {} {:?}",
            id,
            ship.length(),
            start,
            orientation
        );
        self.ships.push(PlacedShip {
            ship,
            start,
            orientation,
            cells,
        });
        Ok(Placement {
            id,
            start,
            orientation,
        })
    }

    /// Move an already placed ship. On failure the ship keeps its old cells.
    pub fn relocate(
        &mut self,
        id: ShipId,
        row: usize,
        col: usize,
        orientation: Orientation,
    ) -> Result<Placement> {
        let length = self.ship(id).ok_or(GameError::UnknownShip(id))?.length();
        let (start, cells) = self.check_placement(row, col, length, orientation, Some(id))?;

        let placed = &mut self.ships[id];
        for cell in placed.cells.iter() {
            self.grid[cell.row][cell.col] = None;
        }
        self.occupied = self.occupied & !placed.cells;
        for cell in cells.iter() {
            self.grid[cell.row][cell.col] = Some(id);
        }
        self.occupied |= cells;
        placed.start = start;
        placed.orientation = orientation;
        placed.cells = cells;
        debug!("moved ship {} to {} {:?}", id, start, orientation);
        Ok(Placement {
            id,
            start,
            orientation,
        })
    }

    /// Resolve an attack on (`row`, `col`). Each cell may be attacked once.
    pub fn receive_attack(&mut self, row: usize, col: usize) -> Result<AttackOutcome> {
        let target = Coord::new(row, col).validate()?;
        if self.attack_at(target).is_some() {
            return Err(GameError::AlreadyAttacked { row, col });
        }
        match self.grid[row][col] {
            Some(id) => {
                self.ships[id].ship.damage();
                self.hits.insert(target)?;
                Ok(AttackOutcome::Hit)
            }
            None => {
                self.misses.insert(target)?;
                Ok(AttackOutcome::Miss)
            }
        }
    }

    /// Returns `true` when every placed ship is sunk, including when none
    /// were placed.
    pub fn has_all_ships_sunk(&self) -> bool {
        self.ships.iter().all(|p| p.ship.is_sunk())
    }

    pub fn ship_at(&self, row: usize, col: usize) -> Option<&Ship> {
        self.ship_id_at(row, col).map(|id| &self.ships[id].ship)
    }

    pub fn ship_id_at(&self, row: usize, col: usize) -> Option<ShipId> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            self.grid[row][col]
        } else {
            None
        }
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(id).map(|p| &p.ship)
    }

    /// Ships in placement order.
    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().map(|p| &p.ship)
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    pub fn ships_afloat(&self) -> usize {
        self.ships.iter().filter(|p| !p.ship.is_sunk()).count()
    }

    pub fn placement(&self, id: ShipId) -> Option<Placement> {
        self.ships.get(id).map(|p| Placement {
            id,
            start: p.start,
            orientation: p.orientation,
        })
    }

    pub fn placements(&self) -> Vec<Placement> {
        (0..self.ships.len())
            .filter_map(|id| self.placement(id))
            .collect()
    }

    /// Cells covered by ship `id`, empty for an unknown id.
    pub fn ship_cells(&self, id: ShipId) -> CellSet {
        self.ships.get(id).map(|p| p.cells).unwrap_or_default()
    }

    /// Outcome of a previous attack on `cell`, if any.
    pub fn attack_at(&self, cell: Coord) -> Option<AttackOutcome> {
        if self.hits.contains(cell) {
            Some(AttackOutcome::Hit)
        } else if self.misses.contains(cell) {
            Some(AttackOutcome::Miss)
        } else {
            None
        }
    }

    /// Occupancy mask of all ships.
    pub fn occupied(&self) -> CellSet {
        self.occupied
    }

    pub fn hits(&self) -> CellSet {
        self.hits
    }

    pub fn misses(&self) -> CellSet {
        self.misses
    }

    /// Sample a legal layout for ships of the given lengths.
    ///
    /// Each ship gets `config.placement_attempts` random tries; if one runs
    /// out the whole layout starts over, up to `config.layout_attempts` times.
    pub fn random_layout<R: Rng + ?Sized>(
        rng: &mut R,
        lengths: &[usize],
        config: &GameConfig,
    ) -> Result<Vec<(Coord, Orientation)>> {
        if let Some(&bad) = lengths.iter().find(|&&l| l == 0 || l > BOARD_SIZE) {
            return Err(GameError::InvalidShipLength(bad));
        }
        'layout: for _ in 0..config.layout_attempts {
            let mut scratch = Board::new();
            let mut layout = Vec::with_capacity(lengths.len());
            for &len in lengths {
                let mut spot = None;
                for _ in 0..config.placement_attempts {
                    let orient = if rng.random() {
                        Orientation::Horizontal
                    } else {
                        Orientation::Vertical
                    };
                    let (max_r, max_c) = match orient {
                        Orientation::Vertical => (BOARD_SIZE - len, BOARD_SIZE - 1),
                        Orientation::Horizontal => (BOARD_SIZE - 1, BOARD_SIZE - len),
                    };
                    let r = rng.random_range(0..=max_r);
                    let c = rng.random_range(0..=max_c);
                    if scratch.check_placement(r, c, len, orient, None).is_ok() {
                        spot = Some((Coord::new(r, c), orient));
                        break;
                    }
                }
                let Some((at, orient)) = spot else {
                    continue 'layout;
                };
                scratch.place(at.row, at.col, Ship::new(len)?, orient)?;
                layout.push((at, orient));
            }
            return Ok(layout);
        }
        Err(GameError::UnplaceableFleet {
            attempts: config.layout_attempts,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("ships", &self.ships.iter().map(|p| &p.ship).collect::<Vec<_>>())
            .field("placements", &self.placements())
            .field("hits", &self.hits.len())
            .field("misses", &self.misses.len())
            .finish()
    }
}
