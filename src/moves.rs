use serde::{Deserialize, Serialize};

use crate::piece::Player;
use crate::position::Position;

/// A destination reachable by a piece. Captures jump over the midpoint.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Move {
    pub destination: Position,
    pub is_capture: bool,
}

impl Move {
    pub fn step(destination: Position) -> Move {
        Move { destination, is_capture: false }
    }

    pub fn jump(destination: Position) -> Move {
        Move { destination, is_capture: true }
    }

    /// Square of the captured piece when this move is taken from `from`.
    pub fn captured_square(&self, from: Position) -> Option<Position> {
        self.is_capture.then(|| from.midpoint(self.destination))
    }
}

/// What a successful `apply_move` did to the board.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub captured: bool,
    pub promoted: bool,
}

/// Controller-level result of one completed move.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: Position,
    pub to: Position,
    pub captured: bool,
    pub promoted: bool,
    pub turn_passed: bool,
    /// The same piece has to keep capturing.
    pub must_continue: bool,
    /// Winner, when this move ended the game.
    pub game_over: Option<Player>,
}
