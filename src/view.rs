//! What the presentation layer gets to see: per-cell visual state and the
//! status lines shown to the player.

use core::fmt;

use crate::common::{AttackResult, Shot};
use crate::config::ship_type;
use crate::game::{GameEvent, GameSession, Phase, Side};
use crate::grid::{Grid, GRID_SIZE};
use crate::ship::Orientation;

/// Visual state of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellView {
    /// Unattacked, and either empty or hidden.
    Water,
    /// Unattacked ship segment on a revealed grid.
    Ship,
    Hit,
    Miss,
}

pub type BoardView = [[CellView; GRID_SIZE]; GRID_SIZE];

/// Render `grid` into cell states, showing intact ships only if `reveal_ships`.
pub fn board_view(grid: &Grid, reveal_ships: bool) -> BoardView {
    let mut view = [[CellView::Water; GRID_SIZE]; GRID_SIZE];
    for (r, row) in view.iter_mut().enumerate() {
        for (c, slot) in row.iter_mut().enumerate() {
            let Ok(cell) = grid.get(r, c) else { continue };
            *slot = match (cell.has_ship, cell.is_hit) {
                (true, true) => CellView::Hit,
                (false, true) => CellView::Miss,
                (true, false) if reveal_ships => CellView::Ship,
                _ => CellView::Water,
            };
        }
    }
    view
}

/// Board coordinate as shown to players, e.g. `B7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordLabel(pub usize, pub usize);

impl fmt::Display for CoordLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let col = (b'A' + self.1 as u8) as char;
        write!(f, "{}{}", col, self.0 + 1)
    }
}

fn ship_name(ship_id: usize) -> &'static str {
    ship_type(ship_id).map(|s| s.name()).unwrap_or("ship")
}

fn orientation_hint(o: Orientation) -> &'static str {
    match o {
        Orientation::Horizontal => "Horizontal (left → right)",
        Orientation::Vertical => "Vertical (top → bottom)",
    }
}

/// Headline for the current state of the session.
pub struct StatusLine<'a>(pub &'a GameSession);

impl fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.0;
        match session.phase() {
            Phase::Placement => match session.placement().current_ship() {
                Some(ship) => write!(
                    f,
                    "Place {} ({} cells), placement: {}",
                    ship.name(),
                    ship.length(),
                    orientation_hint(session.placement().orientation())
                ),
                None => write!(f, "All ships placed! Start the game."),
            },
            Phase::Battle => match session.turn() {
                Side::Player => write!(f, "Battle phase: your turn"),
                Side::Opponent => write!(f, "Enemy turn..."),
            },
            Phase::Finished => match session.winner() {
                Some(Side::Player) => write!(f, "You win! All enemy ships sunk."),
                _ => write!(f, "Defeat. Enemy sunk all your ships."),
            },
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            GameEvent::ShipPlaced {
                ship_id,
                row,
                col,
                orientation,
            } => write!(
                f,
                "{} placed at {} ({:?})",
                ship_name(ship_id),
                CoordLabel(row, col),
                orientation
            ),
            GameEvent::ShipSelected { ship_id } => {
                let len = ship_type(ship_id).map(|s| s.length()).unwrap_or(0);
                write!(f, "Place {} ({} cells)", ship_name(ship_id), len)
            }
            GameEvent::OrientationChanged(o) => write!(f, "Placement: {}", orientation_hint(o)),
            GameEvent::FleetRandomized => write!(f, "Fleet placed at random."),
            GameEvent::FleetReady => write!(f, "All ships placed! Start the game."),
            GameEvent::BattleStarted => write!(f, "Battle phase: your turn"),
            GameEvent::PlayerAttacked(Shot { row, col, result }) => {
                let at = CoordLabel(row, col);
                match result {
                    AttackResult::Miss => write!(f, "{}: Miss!", at),
                    AttackResult::Hit { .. } => write!(f, "{}: Hit!", at),
                    AttackResult::Sink { ship_id } => {
                        write!(f, "{}: Hit! You sank the enemy {}!", at, ship_name(ship_id))
                    }
                }
            }
            GameEvent::OpponentTurn(_) => write!(f, "Enemy turn..."),
            GameEvent::OpponentAttacked(Shot { row, col, result }) => {
                let at = CoordLabel(row, col);
                match result {
                    AttackResult::Miss => write!(f, "Enemy fired at {} and missed.", at),
                    AttackResult::Hit { .. } => write!(f, "Enemy hit your ship at {}!", at),
                    AttackResult::Sink { ship_id } => {
                        write!(f, "Enemy sank your {} at {}!", ship_name(ship_id), at)
                    }
                }
            }
            GameEvent::GameOver { winner: Side::Player } => {
                write!(f, "You win! All enemy ships sunk.")
            }
            GameEvent::GameOver { winner: Side::Opponent } => {
                write!(f, "Defeat. Enemy sunk all your ships.")
            }
            GameEvent::GameReset => write!(f, "New game. Place your fleet."),
        }
    }
}
