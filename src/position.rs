use std::fmt;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: u8 = 8;

/// A square on the 8x8 board. Only constructible on-board.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Option<Position> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Position { row, col })
        } else {
            None
        }
    }

    fn in_bounds(row: i8, col: i8) -> bool {
        (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col)
    }

    /// Step by `(dr, dc)`, or `None` if that leaves the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if Self::in_bounds(row, col) {
            Some(Position { row: row as u8, col: col as u8 })
        } else {
            None
        }
    }

    /// Square jumped over when moving from `self` to `other` two steps away.
    pub fn midpoint(self, other: Position) -> Position {
        debug_assert!(self.row.abs_diff(other.row) == 2 && self.col.abs_diff(other.col) == 2);
        Position {
            row: (self.row + other.row) / 2,
            col: (self.col + other.col) / 2,
        }
    }

    pub fn is_adjacent_diagonal(self, other: Position) -> bool {
        self.row.abs_diff(other.row) == 1 && self.col.abs_diff(other.col) == 1
    }

    /// Playable squares are the dark ones.
    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position { row, col }))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
