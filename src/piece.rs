use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    PlayerOne,
    PlayerTwo,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::PlayerOne => Player::PlayerTwo,
            Player::PlayerTwo => Player::PlayerOne,
        }
    }

    /// Row step toward the opponent's back rank.
    pub fn forward(self) -> i8 {
        match self {
            Player::PlayerOne => 1,
            Player::PlayerTwo => -1,
        }
    }

    /// The row on which this player's pieces are crowned.
    pub fn promotion_row(self) -> u8 {
        match self {
            Player::PlayerOne => 7,
            Player::PlayerTwo => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::PlayerOne => "Player One",
            Player::PlayerTwo => "Player Two",
        }
    }
}

/// Stable identity of a piece for the lifetime of one game.
pub type PieceId = u8;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub owner: Player,
    pub is_king: bool,
}

impl Piece {
    pub fn new(id: PieceId, owner: Player) -> Self {
        Piece { id, owner, is_king: false }
    }

    pub fn king(id: PieceId, owner: Player) -> Self {
        Piece { id, owner, is_king: true }
    }

    /// Row directions this piece may travel in, forward first.
    pub fn row_directions(&self) -> &'static [i8] {
        match (self.is_king, self.owner) {
            (true, _) => &[1, -1],
            (false, Player::PlayerOne) => &[1],
            (false, Player::PlayerTwo) => &[-1],
        }
    }
}
