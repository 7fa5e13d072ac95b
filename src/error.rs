use thiserror::Error;

use crate::piece::PieceId;
use crate::position::Position;

/// Why a selection or move was refused. Refusals never change game state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejected {
    #[error("game is already over")]
    GameOver,
    #[error("no piece on {0}")]
    NoPieceAt(Position),
    #[error("piece {0} is not on the board")]
    PieceNotOnBoard(PieceId),
    #[error("piece on {0} does not belong to the current player")]
    NotYourPiece(Position),
    #[error("no piece selected")]
    NoPieceSelected,
    #[error("{to} is not a legal destination from {from}")]
    IllegalDestination { from: Position, to: Position },
    #[error("the piece on {0} must keep capturing")]
    MustContinueCapture(Position),
    #[error("square ({0}, {1}) is off the board")]
    OffBoard(u8, u8),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid game config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
}
