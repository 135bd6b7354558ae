//! Terminal presentation: command parsing and board printing.

#![cfg(feature = "std")]

use crate::common::{GameError, IllegalCommand};
use crate::config::{BOARD_SIZE, TOTAL_SHIP_CELLS};
use crate::game::{Command, GameSession, Phase};
use crate::view::{BoardView, CellView, StatusLine};

/// A line of terminal input, decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Board,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  place A5     place the selected ship at A5 (placement phase)
  rotate, r    toggle horizontal / vertical
  next, prev   select another unplaced ship
  random       place the whole fleet at random
  start        begin the battle once all ships are placed
  fire B7, B7  attack a cell on the enemy grid
  board        show both grids
  reset        start over
  quit         leave the game";

/// Parse a coordinate like `A5` into (row, col).
pub fn parse_coord(input: &str) -> Result<(usize, usize), String> {
    if input.is_empty() {
        return Err("Empty input".to_string());
    }
    if input.len() < 2 {
        return Err("Too short - need column letter and row number (e.g., A5)".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("No column letter")?.to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("Invalid column '{}' - must be a letter A-J", col_ch));
    }
    let col = (col_ch as u8).wrapping_sub(b'A') as usize;
    if col >= BOARD_SIZE as usize {
        return Err(format!("Column '{}' out of bounds - must be A-J", col_ch));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("Invalid row '{}' - must be a number 1-10", row_str))?;
    if row == 0 {
        return Err("Row cannot be 0 - must be 1-10".to_string());
    }
    if row > BOARD_SIZE as usize {
        return Err(format!("Row {} out of bounds - must be 1-10", row));
    }
    Ok((row - 1, col))
}

/// Decode one line of input.
pub fn parse_input(line: &str) -> Result<Input, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Err("Type 'help' for a list of commands".to_string());
    };
    let arg = parts.next();
    let coord = |arg: Option<&str>| -> Result<(usize, usize), String> {
        arg.ok_or_else(|| format!("'{}' needs a coordinate, e.g. {} A5", word, word))
            .and_then(parse_coord)
    };
    let cmd = match word.to_ascii_lowercase().as_str() {
        "place" | "p" => {
            let (row, col) = coord(arg)?;
            Command::PlaceShip { row, col }
        }
        "fire" | "f" | "attack" => {
            let (row, col) = coord(arg)?;
            Command::Attack { row, col }
        }
        "rotate" | "r" => Command::ToggleOrientation,
        "next" | "n" => Command::SelectNextShip,
        "prev" | "previous" => Command::SelectPreviousShip,
        "random" => Command::RandomizePlacement,
        "start" => Command::StartBattle,
        "reset" | "new" => Command::Reset,
        "board" | "b" => return Ok(Input::Board),
        "help" | "h" | "?" => return Ok(Input::Help),
        "quit" | "q" | "exit" => return Ok(Input::Quit),
        _ => {
            // A bare coordinate is an attack.
            let (row, col) = parse_coord(word)
                .map_err(|_| format!("Unknown command '{}' - type 'help'", word))?;
            Command::Attack { row, col }
        }
    };
    Ok(Input::Command(cmd))
}

/// What to tell the player when a deferred opponent move fails. Stale
/// tickets are expected after a reset and produce no message.
pub fn opponent_failure(err: &GameError) -> Option<String> {
    match err {
        GameError::IllegalCommand(IllegalCommand::StaleOpponentMove) => None,
        other => Some(format!("Enemy could not move: {}", other)),
    }
}

fn cell_char(cell: CellView) -> char {
    match cell {
        CellView::Water => '.',
        CellView::Ship => 'S',
        CellView::Hit => 'X',
        CellView::Miss => 'o',
    }
}

/// Render a board as text, one line per row.
pub fn render_board(view: &BoardView) -> String {
    let mut out = String::from("    ");
    for c in 0..BOARD_SIZE as usize {
        out.push(' ');
        out.push((b'A' + c as u8) as char);
    }
    out.push('\n');
    for (r, row) in view.iter().enumerate() {
        out.push_str(&format!("  {:2}", r + 1));
        for cell in row.iter() {
            out.push(' ');
            out.push(cell_char(*cell));
        }
        out.push('\n');
    }
    out
}

/// Print both grids, the unplaced ships and the status line.
pub fn print_session(session: &GameSession) {
    if session.phase() != Phase::Placement {
        std::println!("Enemy waters:");
        std::print!("{}", render_board(&session.opponent_view()));
        std::println!();
    }
    std::println!("Your fleet:");
    std::print!("{}", render_board(&session.player_view()));
    if session.phase() == Phase::Placement {
        let remaining: Vec<String> = session
            .placement()
            .unplaced()
            .map(|s| format!("{} ({})", s.name(), s.length()))
            .collect();
        if !remaining.is_empty() {
            std::println!("  Ships to place: {}", remaining.join(", "));
        }
    } else {
        std::println!(
            "  Hits landed: {}/{}   Hits taken: {}/{}",
            session.player_hit_count(),
            TOTAL_SHIP_CELLS,
            session.opponent_hit_count(),
            TOTAL_SHIP_CELLS,
        );
    }
    std::println!("{}", StatusLine(session));
}
