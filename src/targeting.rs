//! Opponent targeting: random search until a hit, then hunt the wounded ship
//! down along its line.
//!
//! The AI keeps a LIFO stack of candidate cells. While hunting it pursues a
//! single ship (`hunted_ship`); hits on any other ship are parked in
//! `pending_hits` and picked up once the current ship sinks. Two hits on the
//! hunted ship lock its orientation, after which only the cells just past
//! either end of the known run are probed.

use alloc::vec;
use alloc::vec::Vec;
use log::{debug, trace};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::bitboard::GridMask;
use crate::common::{GameError, IllegalCommand, Shot};
use crate::config::RANDOM_ATTACK_RETRIES;
use crate::grid::{Grid, GRID_SIZE};
use crate::ship::Orientation;

/// Grid coordinate as (row, col).
pub type Coord = (usize, usize);

/// Search mode of the targeting AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Random,
    Hunt,
}

/// Hunt/target opponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetingAi {
    mode: Mode,
    target_queue: Vec<Coord>,
    queued: GridMask,
    hit_chain: Vec<Coord>,
    orientation: Option<Orientation>,
    hunted_ship: Option<usize>,
    pending_hits: Vec<Coord>,
}

impl TargetingAi {
    pub fn new() -> Self {
        Self {
            mode: Mode::Random,
            target_queue: Vec::new(),
            queued: GridMask::new(),
            hit_chain: Vec::new(),
            orientation: None,
            hunted_ship: None,
            pending_hits: Vec::new(),
        }
    }

    /// Forget everything and go back to random search.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Candidate cells; the last entry is tried next.
    pub fn target_queue(&self) -> &[Coord] {
        &self.target_queue
    }

    /// Confirmed hits on the ship being hunted.
    pub fn hit_chain(&self) -> &[Coord] {
        &self.hit_chain
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    pub fn hunted_ship(&self) -> Option<usize> {
        self.hunted_ship
    }

    /// Hits on other ships, deferred until the hunted ship sinks.
    pub fn pending_hits(&self) -> &[Coord] {
        &self.pending_hits
    }

    /// Pick a target, fire on it and update the hunt state.
    pub fn attack<R: Rng + ?Sized>(&mut self, grid: &mut Grid, rng: &mut R) -> Result<Shot, GameError> {
        let target = match self.mode {
            Mode::Hunt => match self.next_hunt_target(grid) {
                Some(target) => target,
                None => {
                    debug!("no hunt targets left, reverting to random search");
                    self.clear_hunt();
                    self.mode = Mode::Random;
                    self.random_target(grid, rng)?
                }
            },
            Mode::Random => self.random_target(grid, rng)?,
        };
        self.fire_at(grid, target)
    }

    /// Fire on a chosen cell and feed the result through the state machine.
    ///
    /// Fails without changing anything if the cell is off the grid or was
    /// already attacked.
    pub fn fire_at(&mut self, grid: &mut Grid, target: Coord) -> Result<Shot, GameError> {
        let (row, col) = target;
        let result = grid.attack(row, col)?;
        self.unqueue(target);
        let shot = Shot { row, col, result };

        let Some(ship) = result.ship_id() else {
            trace!("opponent missed at {:?}", target);
            return Ok(shot);
        };

        match (self.mode, self.hunted_ship) {
            (Mode::Hunt, Some(hunted)) if hunted == ship => {
                self.hit_chain.push(target);
                if self.orientation.is_none() {
                    self.infer_orientation();
                }
                if self.orientation.is_some() {
                    self.rebuild_targets(grid, false);
                } else {
                    self.enqueue_neighbors(grid, target);
                }
            }
            (Mode::Hunt, Some(hunted)) => {
                debug!(
                    "hit ship {} at {:?} while hunting ship {}, deferring",
                    ship, target, hunted
                );
                self.pending_hits.push(target);
            }
            _ => {
                debug!("hit ship {} at {:?}, starting hunt", ship, target);
                self.begin_hunt(grid, ship, target);
            }
        }

        if let Some(hunted) = self.hunted_ship {
            if grid.is_fleet_destroyed(hunted) {
                debug!("ship {} destroyed", hunted);
                self.clear_hunt();
                if !self.resume_from_pending(grid) {
                    self.mode = Mode::Random;
                }
            }
        }
        Ok(shot)
    }

    fn random_target<R: Rng + ?Sized>(&self, grid: &Grid, rng: &mut R) -> Result<Coord, GameError> {
        for _ in 0..RANDOM_ATTACK_RETRIES {
            let r = rng.random_range(0..GRID_SIZE);
            let c = rng.random_range(0..GRID_SIZE);
            if !grid.is_attacked(r, c) {
                return Ok((r, c));
            }
        }
        // Late in a game the retries can all land on attacked cells.
        let open: Vec<Coord> = (!grid.attacked_mask()).iter_set_bits().collect();
        open.choose(rng)
            .copied()
            .ok_or(GameError::IllegalCommand(IllegalCommand::NoTargetsRemaining))
    }

    fn next_hunt_target(&mut self, grid: &Grid) -> Option<Coord> {
        let mut rebuilt = false;
        loop {
            while let Some(target) = self.pop_target() {
                if !grid.is_attacked(target.0, target.1) {
                    return Some(target);
                }
                trace!("skipping stale target {:?}", target);
            }
            if !rebuilt {
                rebuilt = true;
                if let Some(hunted) = self.hunted_ship {
                    if !grid.is_fleet_destroyed(hunted) {
                        self.rebuild_targets(grid, true);
                        continue;
                    }
                }
            }
            if !self.resume_from_pending(grid) {
                return None;
            }
        }
    }

    /// Start pursuing `ship`, pulling any deferred hits on it into the chain.
    fn begin_hunt(&mut self, grid: &Grid, ship: usize, from: Coord) {
        self.mode = Mode::Hunt;
        self.hunted_ship = Some(ship);
        self.orientation = None;
        let mut chain = vec![from];
        self.pending_hits.retain(|&(r, c)| {
            if grid.ship_at(r, c) == Some(ship) {
                if !chain.contains(&(r, c)) {
                    chain.push((r, c));
                }
                false
            } else {
                true
            }
        });
        self.hit_chain = chain;
        self.infer_orientation();
        self.rebuild_targets(grid, false);
    }

    /// Resume the most recent deferred lead whose ship is still afloat.
    fn resume_from_pending(&mut self, grid: &Grid) -> bool {
        while let Some(coord) = self.pending_hits.pop() {
            let Some(ship) = grid.ship_at(coord.0, coord.1) else {
                continue;
            };
            if grid.is_fleet_destroyed(ship) {
                continue;
            }
            debug!("resuming hunt for ship {} from {:?}", ship, coord);
            self.begin_hunt(grid, ship, coord);
            return true;
        }
        false
    }

    fn clear_hunt(&mut self) {
        self.clear_queue();
        self.hit_chain.clear();
        self.orientation = None;
        self.hunted_ship = None;
    }

    fn infer_orientation(&mut self) {
        if self.hit_chain.len() < 2 {
            return;
        }
        let chain = &self.hit_chain;
        let shares = |same: fn(&Coord, &Coord) -> bool| {
            chain
                .iter()
                .enumerate()
                .any(|(i, a)| chain[i + 1..].iter().any(|b| same(a, b)))
        };
        if shares(|a, b| a.0 == b.0) {
            self.orientation = Some(Orientation::Horizontal);
        } else if shares(|a, b| a.1 == b.1) {
            self.orientation = Some(Orientation::Vertical);
        }
        if let Some(o) = self.orientation {
            debug!("orientation locked {:?} from {} hits", o, self.hit_chain.len());
        }
    }

    // Replace the queue with targets derived from the whole chain. With a
    // locked orientation that is the cell past each end of the run, plus
    // unattacked gaps inside it when `include_gaps` is set; otherwise the
    // neighbours of every chain cell.
    fn rebuild_targets(&mut self, grid: &Grid, include_gaps: bool) {
        self.clear_queue();
        let Some(orientation) = self.orientation else {
            let chain = self.hit_chain.clone();
            for coord in chain {
                self.enqueue_neighbors(grid, coord);
            }
            return;
        };
        let Some(&(row0, col0)) = self.hit_chain.first() else {
            return;
        };
        let line: Vec<usize> = self
            .hit_chain
            .iter()
            .filter_map(|&(r, c)| match orientation {
                Orientation::Horizontal if r == row0 => Some(c),
                Orientation::Vertical if c == col0 => Some(r),
                _ => None,
            })
            .collect();
        let (Some(&lo), Some(&hi)) = (line.iter().min(), line.iter().max()) else {
            return;
        };
        let at = |i: usize| match orientation {
            Orientation::Horizontal => (row0, i),
            Orientation::Vertical => (i, col0),
        };
        if include_gaps {
            for i in lo + 1..hi {
                self.push_target(grid, at(i));
            }
        }
        if lo > 0 {
            self.push_target(grid, at(lo - 1));
        }
        self.push_target(grid, at(hi + 1));
    }

    fn enqueue_neighbors(&mut self, grid: &Grid, (r, c): Coord) {
        if r > 0 {
            self.push_target(grid, (r - 1, c));
        }
        self.push_target(grid, (r + 1, c));
        if c > 0 {
            self.push_target(grid, (r, c - 1));
        }
        self.push_target(grid, (r, c + 1));
    }

    fn push_target(&mut self, grid: &Grid, (r, c): Coord) {
        if !Grid::in_bounds(r, c) || grid.is_attacked(r, c) {
            return;
        }
        if self.queued.insert(r, c) {
            self.target_queue.push((r, c));
        }
    }

    fn pop_target(&mut self) -> Option<Coord> {
        let target = self.target_queue.pop()?;
        self.queued.remove(target.0, target.1);
        Some(target)
    }

    fn unqueue(&mut self, target: Coord) {
        if self.queued.remove(target.0, target.1) {
            self.target_queue.retain(|&t| t != target);
        }
    }

    fn clear_queue(&mut self) {
        self.target_queue.clear();
        self.queued.clear_all();
    }
}

impl Default for TargetingAi {
    fn default() -> Self {
        Self::new()
    }
}
