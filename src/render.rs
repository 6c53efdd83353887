//! Plain-text views of boards and attack records for terminal front ends.
//!
//! Columns are lettered from `A`, rows numbered from `1`.

use core::fmt::Write;

use crate::{
    bitboard::CellSet,
    board::Board,
    common::Coord,
    config::BOARD_SIZE,
    strategy::AttackLog,
};

/// Parse `B7`-style input (column letter, 1-based row) into a coordinate.
pub fn parse_coord(input: &str) -> Option<Coord> {
    let input = input.trim();
    let mut chars = input.chars();
    let col_ch = chars.next()?.to_ascii_uppercase();
    if !col_ch.is_ascii_uppercase() {
        return None;
    }
    let col = (col_ch as u8 - b'A') as usize;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    let coord = Coord::new(row - 1, col);
    coord.in_bounds().then_some(coord)
}

fn header(out: &mut String) {
    out.push_str("   ");
    for c in 0..BOARD_SIZE {
        let _ = write!(out, " {}", (b'A' + c as u8) as char);
    }
    out.push('\n');
}

fn grid(hits: CellSet, misses: CellSet, ships: CellSet) -> String {
    let mut out = String::new();
    header(&mut out);
    for r in 0..BOARD_SIZE {
        let _ = write!(out, "{:2} ", r + 1);
        for c in 0..BOARD_SIZE {
            let cell = Coord::new(r, c);
            let ch = if hits.contains(cell) {
                'X'
            } else if misses.contains(cell) {
                'o'
            } else if ships.contains(cell) {
                'S'
            } else {
                '.'
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    out
}

/// A board as seen by its owner (`reveal`) or by the opponent.
pub fn render_board(board: &Board, reveal: bool) -> String {
    let ships = if reveal {
        board.occupied()
    } else {
        CellSet::new()
    };
    grid(board.hits(), board.misses(), ships)
}

/// A player's record of shots fired.
pub fn render_log(log: &AttackLog) -> String {
    grid(log.hits(), log.misses(), CellSet::new())
}
