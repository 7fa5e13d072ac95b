pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod moves;
pub mod piece;
pub mod position;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use board::Board;
pub use config::GameConfig;
pub use error::{ConfigError, MoveRejected};
pub use game::{
    apply_move, can_player_play, is_game_over, new_game, selectable_pieces, valid_moves, Game,
    GameState, Phase,
};
pub use moves::{Move, MoveOutcome};
pub use piece::{Piece, PieceId, Player};
pub use position::Position;
