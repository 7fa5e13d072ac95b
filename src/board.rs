use serde::{Deserialize, Serialize};

use crate::game::GameState;
use crate::moves::{Applied, Move};
use crate::piece::{Piece, PieceId, Player};
use crate::position::{Position, BOARD_SIZE};

/// Rows holding each side's men at the opening.
const PLAYER_ONE_ROWS: std::ops::Range<u8> = 0..3;
const PLAYER_TWO_ROWS: std::ops::Range<u8> = 5..8;

pub const PIECES_PER_SIDE: u8 = 12;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Board {
    pub squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board { squares: [[None; 8]; 8] }
    }

    /// Standard opening: twelve men per side on the dark squares, ids
    /// assigned in row-major order starting at 1.
    pub fn new() -> Self {
        let mut board = Board::empty();
        let mut next_id: PieceId = 1;
        for pos in Position::all().filter(|p| p.is_dark()) {
            let owner = if PLAYER_ONE_ROWS.contains(&pos.row) {
                Player::PlayerOne
            } else if PLAYER_TWO_ROWS.contains(&pos.row) {
                Player::PlayerTwo
            } else {
                continue;
            };
            board.place(pos, Piece::new(next_id, owner));
            next_id += 1;
        }
        board
    }

    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.row as usize][pos.col as usize]
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Put a piece on an empty square.
    pub fn place(&mut self, pos: Position, piece: Piece) {
        let square = &mut self.squares[pos.row as usize][pos.col as usize];
        assert!(square.is_none(), "square {pos} already occupied");
        *square = Some(piece);
    }

    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        self.squares[pos.row as usize][pos.col as usize].take()
    }

    pub fn find(&self, id: PieceId) -> Option<(Position, Piece)> {
        self.occupied().find(|(_, p)| p.id == id)
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get(pos).map(|p| (pos, p)))
    }

    pub fn pieces(&self, player: Player) -> Vec<(Position, Piece)> {
        self.occupied().filter(|(_, p)| p.owner == player).collect()
    }

    pub fn count(&self, player: Player) -> u8 {
        self.occupied().filter(|(_, p)| p.owner == player).count() as u8
    }

    /// Destinations for the piece standing on `from`: simple steps and
    /// single jumps over an opponent, in the piece's allowed directions.
    pub fn valid_moves(&self, from: Position) -> Vec<Move> {
        let piece = match self.get(from) {
            Some(p) => p,
            None => return Vec::new(),
        };
        let opponent = piece.owner.opponent();

        let mut moves = Vec::new();
        for &dr in piece.row_directions() {
            for dc in [-1, 1] {
                let adjacent = match from.offset(dr, dc) {
                    Some(p) => p,
                    None => continue,
                };
                match self.get(adjacent) {
                    None => moves.push(Move::step(adjacent)),
                    Some(other) if other.owner == opponent => {
                        if let Some(jump) = from.offset(2 * dr, 2 * dc) {
                            if self.is_empty(jump) {
                                moves.push(Move::jump(jump));
                            }
                        }
                    }
                    Some(_) => {}
                }
            }
        }
        moves
    }

    pub fn has_capture(&self, from: Position) -> bool {
        self.valid_moves(from).iter().any(|m| m.is_capture)
    }

    /// Move the piece on `from` along `mv`, taking the jumped piece and
    /// crowning on the far row. Legality is the caller's job; a broken
    /// board here is a bug and panics.
    pub fn apply_move(&mut self, from: Position, mv: Move, state: &mut GameState) -> Applied {
        let mut piece = self
            .remove(from)
            .unwrap_or_else(|| panic!("no piece to move on {from}"));

        debug_assert!(
            mv.is_capture || from.is_adjacent_diagonal(mv.destination),
            "step {from} -> {} is not a diagonal neighbour",
            mv.destination
        );
        let mut applied = Applied::default();

        if let Some(mid) = mv.captured_square(from) {
            let captured = self
                .remove(mid)
                .unwrap_or_else(|| panic!("capture over empty square {mid}"));
            assert_eq!(captured.owner, piece.owner.opponent(), "capture of own piece on {mid}");
            state.record_capture(captured.owner);
            applied.captured = true;
        }

        if !piece.is_king && mv.destination.row == piece.owner.promotion_row() {
            piece.is_king = true;
            applied.promoted = true;
        }

        self.place(mv.destination, piece);
        applied
    }

    /// Panics if the board disagrees with `state` or breaks placement rules.
    pub fn assert_consistent(&self, state: &GameState) {
        let mut seen = Vec::new();
        for (pos, piece) in self.occupied() {
            assert!(pos.is_dark(), "piece {} on light square {pos}", piece.id);
            assert!(!seen.contains(&piece.id), "piece {} appears twice", piece.id);
            seen.push(piece.id);
        }
        assert_eq!(self.count(Player::PlayerOne), state.player_one_piece_count);
        assert_eq!(self.count(Player::PlayerTwo), state.player_two_piece_count);
    }

    /// Text diagram, row 0 at the top: `o`/`O` player one, `x`/`X` player two.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let c = match self.squares[row as usize][col as usize] {
                    None if (row + col) % 2 == 1 => '.',
                    None => ' ',
                    Some(p) => match (p.owner, p.is_king) {
                        (Player::PlayerOne, false) => 'o',
                        (Player::PlayerOne, true) => 'O',
                        (Player::PlayerTwo, false) => 'x',
                        (Player::PlayerTwo, true) => 'X',
                    },
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}
