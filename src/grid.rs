//! Grid model: a 10×10 matrix of cells tracking occupancy and hits.

use core::fmt;

use crate::bitboard::GridMask;
use crate::common::{AttackResult, GameError, IllegalCommand};
use crate::config::BOARD_SIZE;

pub(crate) const GRID_SIZE: usize = BOARD_SIZE as usize;

/// A single grid square.
///
/// `is_hit` is set once the cell has been fired upon, whether or not a ship
/// occupies it, and never reverts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub has_ship: bool,
    pub is_hit: bool,
    pub ship_id: Option<usize>,
}

impl Cell {
    /// Fired upon and occupied.
    pub fn is_ship_hit(&self) -> bool {
        self.has_ship && self.is_hit
    }
}

/// One side's board.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// Create an empty grid (no ships, no shots).
    pub fn new() -> Self {
        Grid {
            cells: [[Cell::default(); GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Wipe every cell.
    pub fn clear(&mut self) {
        *self = Grid::new();
    }

    #[inline]
    pub fn in_bounds(row: usize, col: usize) -> bool {
        row < GRID_SIZE && col < GRID_SIZE
    }

    #[inline]
    fn check_bounds(row: usize, col: usize) -> Result<(), GameError> {
        if Self::in_bounds(row, col) {
            Ok(())
        } else {
            Err(GameError::OutOfBounds { row, col })
        }
    }

    /// Cell at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<Cell, GameError> {
        Self::check_bounds(row, col)?;
        Ok(self.cells[row][col])
    }

    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell, GameError> {
        Self::check_bounds(row, col)?;
        Ok(&mut self.cells[row][col])
    }

    /// `true` if the cell was fired upon. Out-of-range coordinates are never attacked.
    pub fn is_attacked(&self, row: usize, col: usize) -> bool {
        Self::in_bounds(row, col) && self.cells[row][col].is_hit
    }

    /// Ship id at (row, col), if the cell is occupied.
    pub fn ship_at(&self, row: usize, col: usize) -> Option<usize> {
        if Self::in_bounds(row, col) {
            self.cells[row][col].ship_id
        } else {
            None
        }
    }

    /// `true` iff the ship has cells on this grid and all of them are hit.
    pub fn is_fleet_destroyed(&self, ship_id: usize) -> bool {
        let mut found = false;
        for cell in self.cells.iter().flatten() {
            if cell.ship_id == Some(ship_id) {
                if !cell.is_hit {
                    return false;
                }
                found = true;
            }
        }
        found
    }

    /// Number of cells holding a ship segment.
    pub fn total_occupied_cells(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.has_ship).count()
    }

    /// Number of ship segments that have been hit.
    pub fn hit_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_ship_hit()).count()
    }

    /// Fire on (row, col).
    ///
    /// Rejects cells that were already fired upon without touching the grid.
    pub fn attack(&mut self, row: usize, col: usize) -> Result<AttackResult, GameError> {
        let cell = self.cell_mut(row, col)?;
        if cell.is_hit {
            return Err(IllegalCommand::AlreadyAttacked.into());
        }
        cell.is_hit = true;
        let Some(ship_id) = cell.ship_id else {
            return Ok(AttackResult::Miss);
        };
        if self.is_fleet_destroyed(ship_id) {
            Ok(AttackResult::Sink { ship_id })
        } else {
            Ok(AttackResult::Hit { ship_id })
        }
    }

    /// Occupancy snapshot of all ships.
    pub fn ship_mask(&self) -> GridMask {
        self.mask_where(|c| c.has_ship)
    }

    /// Snapshot of every cell fired upon.
    pub fn attacked_mask(&self) -> GridMask {
        self.mask_where(|c| c.is_hit)
    }

    fn mask_where(&self, pred: impl Fn(&Cell) -> bool) -> GridMask {
        let mut mask = GridMask::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if pred(cell) {
                    mask.insert(r, c);
                }
            }
        }
        mask
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {{")?;
        for row in self.cells.iter() {
            write!(f, "  ")?;
            for cell in row.iter() {
                let ch = match (cell.ship_id, cell.is_hit) {
                    (Some(_), true) => 'X',
                    (None, true) => 'o',
                    (Some(id), false) => (b'0' + id as u8) as char,
                    (None, false) => '.',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
