use crate::ship::ShipType;

pub const BOARD_SIZE: u8 = 10;
pub const NUM_SHIPS: usize = 5;
pub const SHIPS: [ShipType; NUM_SHIPS] = [
    ShipType::new(0, "Carrier", 5),
    ShipType::new(1, "Battleship", 4),
    ShipType::new(2, "Cruiser", 3),
    ShipType::new(3, "Submarine", 3),
    ShipType::new(4, "Destroyer", 2),
];

/// Total number of ship segments in the fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Random draws tried per ship before falling back to a backtracking search.
pub const RANDOM_PLACEMENT_ATTEMPTS: usize = 100;

/// Random draws the opponent makes looking for an unattacked cell.
pub const RANDOM_ATTACK_RETRIES: usize = 200;

/// Bounds of the opponent's "thinking" pause, in milliseconds.
pub const OPPONENT_DELAY_MIN_MS: u64 = 800;
pub const OPPONENT_DELAY_MAX_MS: u64 = 1800;

/// Look up a ship in the catalog by id.
pub fn ship_type(ship_id: usize) -> Option<ShipType> {
    SHIPS.get(ship_id).copied()
}
