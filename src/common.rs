//! Common types: game errors and attack results.

use crate::bitboard::BitBoardError;
use crate::config::SHIPS;

/// Result of firing on a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackResult {
    /// Shot landed in open water.
    Miss,
    /// Shot struck a ship that is still afloat.
    Hit { ship_id: usize },
    /// Shot struck the last intact segment of a ship.
    Sink { ship_id: usize },
}

impl AttackResult {
    pub fn is_hit(&self) -> bool {
        !matches!(self, AttackResult::Miss)
    }

    /// Id of the ship struck, if any.
    pub fn ship_id(&self) -> Option<usize> {
        match *self {
            AttackResult::Miss => None,
            AttackResult::Hit { ship_id } | AttackResult::Sink { ship_id } => Some(ship_id),
        }
    }
}

/// A resolved attack: where it landed and what it struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Shot {
    pub row: usize,
    pub col: usize,
    pub result: AttackResult,
}

/// Commands that are well-formed but not allowed in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalCommand {
    /// Placement commands outside the placement phase.
    NotInPlacement,
    /// Attacks outside the battle phase.
    NotInBattle,
    /// Human attack while the opponent is to move, or vice versa.
    NotYourTurn,
    /// Battle started before the whole fleet is placed.
    FleetIncomplete,
    /// Every ship is already placed.
    NoShipSelected,
    /// The cell was fired upon before.
    AlreadyAttacked,
    /// The game is over; only a reset is accepted.
    GameFinished,
    /// A deferred opponent move from a superseded turn or game.
    StaleOpponentMove,
    /// No unattacked cell is left on the grid.
    NoTargetsRemaining,
}

/// Errors returned by grid, placement and session operations.
///
/// None of these are fatal: the offending command is dropped and state is
/// left as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// Coordinate outside the grid.
    OutOfBounds { row: usize, col: usize },
    /// Ship run leaves the grid or overlaps another ship.
    InvalidPlacement,
    /// Command rejected in the current phase or turn.
    IllegalCommand(IllegalCommand),
    /// Neither random draws nor the exhaustive search could fit the fleet.
    UnableToPlaceFleet,
}

impl From<BitBoardError> for GameError {
    fn from(err: BitBoardError) -> Self {
        match err {
            BitBoardError::IndexOutOfBounds { row, col } => GameError::OutOfBounds { row, col },
        }
    }
}

impl From<IllegalCommand> for GameError {
    fn from(cmd: IllegalCommand) -> Self {
        GameError::IllegalCommand(cmd)
    }
}

impl core::fmt::Display for IllegalCommand {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IllegalCommand::NotInPlacement => write!(f, "Ships can only be arranged before the battle."),
            IllegalCommand::NotInBattle => write!(f, "Press Start to begin attacking."),
            IllegalCommand::NotYourTurn => write!(f, "Wait for your turn."),
            IllegalCommand::FleetIncomplete => write!(f, "Place all ships first, then start the game."),
            IllegalCommand::NoShipSelected => write!(f, "All ships are already placed."),
            IllegalCommand::AlreadyAttacked => write!(f, "You already attacked that cell."),
            IllegalCommand::GameFinished => write!(f, "The game is over. Reset to play again."),
            IllegalCommand::StaleOpponentMove => write!(f, "Opponent move belongs to an earlier turn."),
            IllegalCommand::NoTargetsRemaining => write!(f, "No cells left to attack."),
        }
    }
}

impl core::fmt::Display for GameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GameError::OutOfBounds { row, col } => {
                write!(f, "Coordinate out of bounds: row={}, col={}", row, col)
            }
            GameError::InvalidPlacement => write!(f, "Cannot place ship here!"),
            GameError::IllegalCommand(cmd) => write!(f, "{}", cmd),
            GameError::UnableToPlaceFleet => write!(
                f,
                "Unable to fit all {} ships on the board",
                SHIPS.len()
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}
