use crate::ship::ShipType;

/// Rows and columns of every board.
pub const BOARD_SIZE: usize = 10;

/// Random placement tries per ship before the layout is restarted.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;
/// Whole-layout restarts before random placement gives up.
pub const MAX_LAYOUT_ATTEMPTS: usize = 50;

pub const NUM_SHIPS: usize = 5;
pub const CLASSIC_FLEET: [ShipType; NUM_SHIPS] = [
    ShipType::new("Carrier", 5),
    ShipType::new("Battleship", 4),
    ShipType::new("Cruiser", 3),
    ShipType::new("Submarine", 3),
    ShipType::new("Destroyer", 2),
];

/// Runtime knobs for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Fix every random choice of the match (placement and targeting).
    pub seed: Option<u64>,
    pub placement_attempts: usize,
    pub layout_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            layout_attempts: MAX_LAYOUT_ATTEMPTS,
        }
    }
}

impl GameConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Look up a classic ship type by name, ignoring case.
pub fn ship_type_by_name(name: &str) -> Option<ShipType> {
    CLASSIC_FLEET
        .iter()
        .copied()
        .find(|def| def.name().eq_ignore_ascii_case(name))
}
