//! Game orchestration: phases, turns and the command/event interface the
//! presentation layer talks to.

use alloc::vec;
use alloc::vec::Vec;
use log::{debug, info, trace};
use rand::Rng;

use crate::common::{GameError, IllegalCommand, Shot};
use crate::config::TOTAL_SHIP_CELLS;
use crate::fleet::{place_fleet_randomly, FleetPlacement};
use crate::grid::Grid;
use crate::ship::Orientation;
use crate::targeting::TargetingAi;
use crate::view::{board_view, BoardView};

/// Lifecycle phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Placement,
    Battle,
    Finished,
}

/// One of the two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Opponent,
}

/// Handle for a deferred opponent move.
///
/// Only the most recently issued ticket of the current game is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveTicket {
    epoch: u64,
    seq: u64,
}

impl MoveTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Input accepted from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place the selected ship with the current orientation.
    PlaceShip { row: usize, col: usize },
    ToggleOrientation,
    SelectNextShip,
    SelectPreviousShip,
    /// Replace the human fleet with a random layout.
    RandomizePlacement,
    StartBattle,
    /// Human attack on the opponent grid.
    Attack { row: usize, col: usize },
    Reset,
}

/// State changes reported back to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    ShipPlaced {
        ship_id: usize,
        row: usize,
        col: usize,
        orientation: Orientation,
    },
    ShipSelected { ship_id: usize },
    OrientationChanged(Orientation),
    FleetRandomized,
    FleetReady,
    BattleStarted,
    PlayerAttacked(Shot),
    /// The opponent is to move; run `opponent_move` with this ticket.
    OpponentTurn(MoveTicket),
    OpponentAttacked(Shot),
    GameOver { winner: Side },
    GameReset,
}

/// Complete state of one game against the AI.
#[derive(Debug, Clone)]
pub struct GameSession {
    phase: Phase,
    turn: Side,
    player_grid: Grid,
    opponent_grid: Grid,
    player_hit_count: usize,
    opponent_hit_count: usize,
    placement: FleetPlacement,
    ai: TargetingAi,
    winner: Option<Side>,
    epoch: u64,
    next_seq: u64,
    pending_move: Option<MoveTicket>,
}

impl GameSession {
    /// Fresh game in the placement phase.
    pub fn new() -> Self {
        Self {
            phase: Phase::Placement,
            turn: Side::Player,
            player_grid: Grid::new(),
            opponent_grid: Grid::new(),
            player_hit_count: 0,
            opponent_hit_count: 0,
            placement: FleetPlacement::new(),
            ai: TargetingAi::new(),
            winner: None,
            epoch: 0,
            next_seq: 0,
            pending_move: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Generation counter, bumped on every reset and battle start.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Ticket of the opponent move currently owed, if any.
    pub fn pending_move(&self) -> Option<MoveTicket> {
        self.pending_move
    }

    pub fn placement(&self) -> &FleetPlacement {
        &self.placement
    }

    pub fn ai(&self) -> &TargetingAi {
        &self.ai
    }

    /// The human's own grid.
    pub fn player_grid(&self) -> &Grid {
        &self.player_grid
    }

    /// Hits the human has landed on the opponent.
    pub fn player_hit_count(&self) -> usize {
        self.player_hit_count
    }

    /// Hits the opponent has landed on the human.
    pub fn opponent_hit_count(&self) -> usize {
        self.opponent_hit_count
    }

    /// The human's grid with everything visible.
    pub fn player_view(&self) -> BoardView {
        board_view(&self.player_grid, true)
    }

    /// The opponent's grid; ships stay hidden until the game is over.
    pub fn opponent_view(&self) -> BoardView {
        board_view(&self.opponent_grid, self.phase == Phase::Finished)
    }

    /// Apply a command from the presentation layer.
    ///
    /// A rejected command returns the reason and leaves the session unchanged.
    pub fn submit<R: Rng + ?Sized>(&mut self, command: Command, rng: &mut R) -> Result<Vec<GameEvent>, GameError> {
        trace!("command {:?} in {:?}", command, self.phase);
        let result = match command {
            Command::PlaceShip { row, col } => self.place_ship(row, col),
            Command::ToggleOrientation => self.toggle_orientation(),
            Command::SelectNextShip => self.select_ship(true),
            Command::SelectPreviousShip => self.select_ship(false),
            Command::RandomizePlacement => self.randomize_placement(rng),
            Command::StartBattle => self.start_battle(rng),
            Command::Attack { row, col } => self.player_attack(row, col),
            Command::Reset => Ok(self.reset()),
        };
        if let Err(e) = &result {
            debug!("rejected {:?}: {:?}", command, e);
        }
        result
    }

    /// Run the deferred opponent move for `ticket`.
    ///
    /// Tickets from an earlier game, or one already used, are rejected so a
    /// late timer cannot touch a newer game.
    pub fn opponent_move<R: Rng + ?Sized>(&mut self, ticket: MoveTicket, rng: &mut R) -> Result<Vec<GameEvent>, GameError> {
        if self.pending_move != Some(ticket) {
            debug!("stale opponent move {:?} (epoch {})", ticket, self.epoch);
            return Err(IllegalCommand::StaleOpponentMove.into());
        }
        let shot = self.ai.attack(&mut self.player_grid, rng)?;
        self.pending_move = None;
        if shot.result.is_hit() {
            self.opponent_hit_count += 1;
        }
        trace!("opponent fired at ({}, {}): {:?}", shot.row, shot.col, shot.result);
        let mut events = vec![GameEvent::OpponentAttacked(shot)];
        if self.opponent_hit_count >= TOTAL_SHIP_CELLS {
            events.push(self.finish(Side::Opponent));
        } else {
            self.turn = Side::Player;
        }
        Ok(events)
    }

    /// Start the battle against a prepared opponent fleet instead of a
    /// random one.
    pub fn start_battle_against(&mut self, opponent: Grid) -> Result<Vec<GameEvent>, GameError> {
        self.check_can_start()?;
        if opponent.total_occupied_cells() != TOTAL_SHIP_CELLS || opponent.attacked_mask().count_ones() != 0 {
            return Err(GameError::InvalidPlacement);
        }
        Ok(self.begin_battle(opponent))
    }

    fn require_placement(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::Placement => Ok(()),
            Phase::Battle => Err(IllegalCommand::NotInPlacement.into()),
            Phase::Finished => Err(IllegalCommand::GameFinished.into()),
        }
    }

    fn place_ship(&mut self, row: usize, col: usize) -> Result<Vec<GameEvent>, GameError> {
        self.require_placement()?;
        let orientation = self.placement.orientation();
        let ship = self.placement.place_current(&mut self.player_grid, row, col)?;
        let mut events = vec![GameEvent::ShipPlaced {
            ship_id: ship.id(),
            row,
            col,
            orientation,
        }];
        match self.placement.current_ship() {
            Some(next) => events.push(GameEvent::ShipSelected { ship_id: next.id() }),
            None => events.push(GameEvent::FleetReady),
        }
        Ok(events)
    }

    fn toggle_orientation(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.require_placement()?;
        if self.placement.is_complete() {
            return Err(IllegalCommand::NoShipSelected.into());
        }
        Ok(vec![GameEvent::OrientationChanged(self.placement.toggle_orientation())])
    }

    fn select_ship(&mut self, forward: bool) -> Result<Vec<GameEvent>, GameError> {
        self.require_placement()?;
        let ship = if forward {
            self.placement.select_next()
        } else {
            self.placement.select_previous()
        };
        let ship = ship.ok_or(GameError::IllegalCommand(IllegalCommand::NoShipSelected))?;
        Ok(vec![GameEvent::ShipSelected { ship_id: ship.id() }])
    }

    fn randomize_placement<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<GameEvent>, GameError> {
        self.require_placement()?;
        let mut grid = Grid::new();
        let mut placement = self.placement.clone();
        placement.randomize(&mut grid, rng)?;
        self.player_grid = grid;
        self.placement = placement;
        Ok(vec![GameEvent::FleetRandomized, GameEvent::FleetReady])
    }

    fn check_can_start(&self) -> Result<(), GameError> {
        match self.phase {
            Phase::Placement if self.placement.is_complete() => Ok(()),
            Phase::Placement => Err(IllegalCommand::FleetIncomplete.into()),
            Phase::Battle => Err(IllegalCommand::NotInPlacement.into()),
            Phase::Finished => Err(IllegalCommand::GameFinished.into()),
        }
    }

    fn start_battle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<GameEvent>, GameError> {
        self.check_can_start()?;
        let mut opponent = Grid::new();
        place_fleet_randomly(&mut opponent, rng)?;
        Ok(self.begin_battle(opponent))
    }

    fn begin_battle(&mut self, opponent: Grid) -> Vec<GameEvent> {
        self.opponent_grid = opponent;
        self.ai.reset();
        self.player_hit_count = 0;
        self.opponent_hit_count = 0;
        self.phase = Phase::Battle;
        self.turn = Side::Player;
        self.epoch += 1;
        self.pending_move = None;
        info!("battle started (epoch {})", self.epoch);
        vec![GameEvent::BattleStarted]
    }

    fn player_attack(&mut self, row: usize, col: usize) -> Result<Vec<GameEvent>, GameError> {
        match self.phase {
            Phase::Battle => {}
            Phase::Placement => return Err(IllegalCommand::NotInBattle.into()),
            Phase::Finished => return Err(IllegalCommand::GameFinished.into()),
        }
        if self.turn != Side::Player {
            return Err(IllegalCommand::NotYourTurn.into());
        }
        let result = self.opponent_grid.attack(row, col)?;
        if result.is_hit() {
            self.player_hit_count += 1;
        }
        let mut events = vec![GameEvent::PlayerAttacked(Shot { row, col, result })];
        if self.player_hit_count >= TOTAL_SHIP_CELLS {
            events.push(self.finish(Side::Player));
            return Ok(events);
        }
        self.turn = Side::Opponent;
        let ticket = MoveTicket {
            epoch: self.epoch,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending_move = Some(ticket);
        events.push(GameEvent::OpponentTurn(ticket));
        Ok(events)
    }

    fn finish(&mut self, winner: Side) -> GameEvent {
        info!("game over, {:?} wins", winner);
        self.phase = Phase::Finished;
        self.winner = Some(winner);
        self.pending_move = None;
        GameEvent::GameOver { winner }
    }

    /// Back to an empty placement phase; outstanding tickets become stale.
    fn reset(&mut self) -> Vec<GameEvent> {
        let epoch = self.epoch + 1;
        let next_seq = self.next_seq;
        *self = Self::new();
        self.epoch = epoch;
        self.next_seq = next_seq;
        info!("game reset (epoch {})", self.epoch);
        vec![GameEvent::GameReset]
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
