//! Fleet placement: collision checks, manual placement cursor and randomized
//! layouts.

use alloc::vec::Vec;
use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::bitboard::GridMask;
use crate::common::{GameError, IllegalCommand};
use crate::config::{NUM_SHIPS, RANDOM_PLACEMENT_ATTEMPTS, SHIPS};
use crate::grid::{Grid, GRID_SIZE};
use crate::ship::{run_cells, Orientation, ShipType};

/// `true` iff a run of `size` cells from (`row`, `col`) stays on the grid and
/// touches no occupied cell.
pub fn can_place(grid: &Grid, row: usize, col: usize, size: usize, orientation: Orientation) -> bool {
    if size == 0 || size > GRID_SIZE {
        return false;
    }
    match run_mask(row, col, size, orientation) {
        Ok(run) => (grid.ship_mask() & run).is_empty(),
        Err(_) => false,
    }
}

/// Mask of the cells a run covers; `OutOfBounds` if any of them is off the grid.
pub fn run_mask(row: usize, col: usize, size: usize, orientation: Orientation) -> Result<GridMask, GameError> {
    let mut mask = GridMask::new();
    for (r, c) in run_cells(row, col, size, orientation) {
        mask.set(r, c)?;
    }
    Ok(mask)
}

/// Mark the run as occupied by `ship_id`.
///
/// The run is re-validated first; an invalid run leaves the grid untouched.
pub fn place(
    grid: &mut Grid,
    row: usize,
    col: usize,
    size: usize,
    orientation: Orientation,
    ship_id: usize,
) -> Result<(), GameError> {
    if !can_place(grid, row, col, size, orientation) {
        return Err(GameError::InvalidPlacement);
    }
    for (r, c) in run_cells(row, col, size, orientation) {
        let cell = grid.cell_mut(r, c)?;
        cell.has_ship = true;
        cell.ship_id = Some(ship_id);
    }
    Ok(())
}

fn unplace(grid: &mut Grid, row: usize, col: usize, size: usize, orientation: Orientation) {
    for (r, c) in run_cells(row, col, size, orientation) {
        if let Ok(cell) = grid.cell_mut(r, c) {
            cell.has_ship = false;
            cell.ship_id = None;
        }
    }
}

/// Draw up to `RANDOM_PLACEMENT_ATTEMPTS` random spots for `ship`, returning
/// the first that fits.
pub fn random_placement<R: Rng + ?Sized>(
    grid: &Grid,
    rng: &mut R,
    ship: ShipType,
) -> Option<(usize, usize, Orientation)> {
    for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
        let orient = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let r = rng.random_range(0..GRID_SIZE);
        let c = rng.random_range(0..GRID_SIZE);
        if can_place(grid, r, c, ship.length(), orient) {
            return Some((r, c, orient));
        }
    }
    None
}

/// Clear `grid` and lay out the whole fleet at random.
///
/// Ships are tried in catalog order with random draws. If any ship runs out
/// of draws the grid is cleared and an exhaustive search with shuffled
/// candidates takes over, so the result is always a complete fleet or an
/// error with an empty grid.
pub fn place_fleet_randomly<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Result<(), GameError> {
    grid.clear();
    for ship in SHIPS.iter() {
        match random_placement(grid, rng, *ship) {
            Some((r, c, o)) => {
                trace!("random placement: {} at ({}, {}) {:?}", ship.name(), r, c, o);
                place(grid, r, c, ship.length(), o, ship.id())?;
            }
            None => {
                debug!(
                    "random placement exhausted for {}, falling back to search",
                    ship.name()
                );
                grid.clear();
                return place_fleet_exhaustive(grid, rng);
            }
        }
    }
    Ok(())
}

/// Backtracking layout of the whole fleet with a shuffled candidate order.
pub fn place_fleet_exhaustive<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Result<(), GameError> {
    if backtrack(grid, rng, 0) {
        Ok(())
    } else {
        grid.clear();
        Err(GameError::UnableToPlaceFleet)
    }
}

fn backtrack<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, idx: usize) -> bool {
    let Some(ship) = SHIPS.get(idx) else {
        return true;
    };
    let len = ship.length();
    let mut candidates: Vec<(usize, usize, Orientation)> = Vec::new();
    for r in 0..GRID_SIZE {
        for c in 0..GRID_SIZE {
            for o in [Orientation::Horizontal, Orientation::Vertical] {
                if can_place(grid, r, c, len, o) {
                    candidates.push((r, c, o));
                }
            }
        }
    }
    candidates.shuffle(rng);
    for (r, c, o) in candidates {
        if place(grid, r, c, len, o, ship.id()).is_err() {
            continue;
        }
        if backtrack(grid, rng, idx + 1) {
            return true;
        }
        unplace(grid, r, c, len, o);
    }
    false
}

/// Placement progress for one grid, plus the cursor used for manual placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetPlacement {
    placed: [bool; NUM_SHIPS],
    placed_count: usize,
    current: Option<usize>,
    orientation: Orientation,
}

impl FleetPlacement {
    pub fn new() -> Self {
        Self {
            placed: [false; NUM_SHIPS],
            placed_count: 0,
            current: Some(0),
            orientation: Orientation::Horizontal,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_placed(&self, ship_id: usize) -> bool {
        self.placed.get(ship_id).copied().unwrap_or(false)
    }

    pub fn placed_count(&self) -> usize {
        self.placed_count
    }

    pub fn is_complete(&self) -> bool {
        self.placed_count == NUM_SHIPS
    }

    /// Ship the cursor points at, `None` once the fleet is complete.
    pub fn current_ship(&self) -> Option<ShipType> {
        self.current.and_then(|i| SHIPS.get(i).copied())
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Ships still waiting to be placed, in catalog order.
    pub fn unplaced(&self) -> impl Iterator<Item = ShipType> + '_ {
        SHIPS.iter().copied().filter(|s| !self.placed[s.id()])
    }

    pub fn toggle_orientation(&mut self) -> Orientation {
        self.orientation = self.orientation.toggled();
        self.orientation
    }

    /// Move the cursor to the next unplaced ship, wrapping around.
    pub fn select_next(&mut self) -> Option<ShipType> {
        self.step(1)
    }

    /// Move the cursor to the previous unplaced ship, wrapping around.
    pub fn select_previous(&mut self) -> Option<ShipType> {
        self.step(NUM_SHIPS - 1)
    }

    fn step(&mut self, step: usize) -> Option<ShipType> {
        let start = self.current?;
        self.current = Some(self.find_next_available(start, step));
        self.current_ship()
    }

    // Walk the catalog from `start` by `step` (mod NUM_SHIPS); `start` if every
    // other ship is placed.
    fn find_next_available(&self, start: usize, step: usize) -> usize {
        let mut idx = start;
        for _ in 0..NUM_SHIPS {
            idx = (idx + step) % NUM_SHIPS;
            if !self.placed[idx] {
                return idx;
            }
        }
        start
    }

    /// Place the selected ship with the current orientation at (`row`, `col`)
    /// and advance the cursor.
    pub fn place_current(&mut self, grid: &mut Grid, row: usize, col: usize) -> Result<ShipType, GameError> {
        let ship = self
            .current_ship()
            .ok_or(GameError::IllegalCommand(IllegalCommand::NoShipSelected))?;
        if self.placed[ship.id()] {
            return Err(IllegalCommand::NoShipSelected.into());
        }
        if !Grid::in_bounds(row, col) {
            return Err(GameError::OutOfBounds { row, col });
        }
        place(grid, row, col, ship.length(), self.orientation, ship.id())?;
        self.placed[ship.id()] = true;
        self.placed_count += 1;
        self.current = if self.is_complete() {
            None
        } else {
            Some(self.find_next_available(ship.id(), 1))
        };
        Ok(ship)
    }

    /// Replace whatever is on `grid` with a random complete fleet.
    ///
    /// On failure both the grid and this tracker are left empty.
    pub fn randomize<R: Rng + ?Sized>(&mut self, grid: &mut Grid, rng: &mut R) -> Result<(), GameError> {
        let orientation = self.orientation;
        self.reset();
        self.orientation = orientation;
        place_fleet_randomly(grid, rng)?;
        self.placed = [true; NUM_SHIPS];
        self.placed_count = NUM_SHIPS;
        self.current = None;
        Ok(())
    }
}

impl Default for FleetPlacement {
    fn default() -> Self {
        Self::new()
    }
}
