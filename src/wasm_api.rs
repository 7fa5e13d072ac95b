use std::sync::Once;

use crate::board::Board;
use crate::config::GameConfig;
use crate::error::MoveRejected;
use crate::game::{Game, Phase};
use crate::moves::{Move, MoveOutcome};
use crate::piece::Player;
use crate::position::Position;
use serde::Serialize;
use wasm_bindgen::prelude::*;

static LOGGER: Once = Once::new();

#[derive(Serialize)]
struct SquarePiece {
    id: u8,
    owner: String,
    king: bool,
}

#[derive(Serialize)]
struct MoveJson {
    to: [u8; 2],
    capture: bool,
}

#[derive(Serialize)]
struct OutcomeJson {
    from: [u8; 2],
    to: [u8; 2],
    captured: bool,
    promoted: bool,
    turn_passed: bool,
    must_continue: bool,
    winner: Option<String>,
}

#[derive(Serialize)]
struct BoardState {
    squares: Vec<Vec<Option<SquarePiece>>>,
    current_player: String,
    player_one_piece_count: u8,
    player_two_piece_count: u8,
    selected: Option<[u8; 2]>,
    selected_moves: Vec<MoveJson>,
    must_continue: bool,
    game_over: bool,
    winner: Option<String>,
    last_winner: Option<String>,
    last_move: Option<OutcomeJson>,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    error: Option<String>,
}

#[derive(Serialize)]
struct GameOverJson {
    game_over: bool,
    winner: Option<String>,
}

fn player_to_string(p: Player) -> String {
    match p {
        Player::PlayerOne => "player-one".to_string(),
        Player::PlayerTwo => "player-two".to_string(),
    }
}

fn pos_json(p: Position) -> [u8; 2] {
    [p.row, p.col]
}

fn move_json(m: &Move) -> MoveJson {
    MoveJson {
        to: pos_json(m.destination),
        capture: m.is_capture,
    }
}

fn outcome_json(o: &MoveOutcome) -> OutcomeJson {
    OutcomeJson {
        from: pos_json(o.from),
        to: pos_json(o.to),
        captured: o.captured,
        promoted: o.promoted,
        turn_passed: o.turn_passed,
        must_continue: o.must_continue,
        winner: o.game_over.map(player_to_string),
    }
}

fn squares_json(board: &Board) -> Vec<Vec<Option<SquarePiece>>> {
    board
        .squares
        .iter()
        .map(|row| {
            row.iter()
                .map(|sq| {
                    sq.map(|p| SquarePiece {
                        id: p.id,
                        owner: player_to_string(p.owner),
                        king: p.is_king,
                    })
                })
                .collect()
        })
        .collect()
}

fn build_board_state(game: &Game, last_move: Option<&MoveOutcome>) -> BoardState {
    let selected = game.selected();
    let selected_moves = selected
        .and_then(|(pos, _)| game.legal_moves(pos).ok())
        .unwrap_or_default()
        .iter()
        .map(move_json)
        .collect();
    let winner = match game.phase() {
        Phase::GameOver(w) => Some(player_to_string(w)),
        _ => None,
    };

    BoardState {
        squares: squares_json(game.board()),
        current_player: player_to_string(game.current_player()),
        player_one_piece_count: game.piece_count(Player::PlayerOne),
        player_two_piece_count: game.piece_count(Player::PlayerTwo),
        selected: selected.map(|(pos, _)| pos_json(pos)),
        selected_moves,
        must_continue: game.must_continue(),
        game_over: winner.is_some(),
        winner,
        last_winner: game.last_winner().map(player_to_string),
        last_move: last_move.map(outcome_json),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn error_js(err: &MoveRejected) -> JsValue {
    to_js(&MoveResult {
        board_state: None,
        error: Some(err.to_string()),
    })
}

fn position(row: u8, col: u8) -> Result<Position, MoveRejected> {
    Position::new(row, col).ok_or(MoveRejected::OffBoard(row, col))
}

#[wasm_bindgen]
pub struct Checkers {
    game: Game,
}

#[wasm_bindgen]
impl Checkers {
    /// `config_json` is an optional `GameConfig` object; bad JSON falls back
    /// to the defaults with a console warning.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Checkers {
        LOGGER.call_once(|| wasm_logger::init(wasm_logger::Config::default()));

        let config = match config_json.as_deref().map(GameConfig::from_json) {
            Some(Ok(c)) => c,
            Some(Err(e)) => {
                log::warn!("{e}; using default config");
                GameConfig::default()
            }
            None => GameConfig::default(),
        };
        Checkers { game: Game::new(config) }
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&build_board_state(&self.game, None))
    }

    /// Select the piece on a square; returns its moves or `{ error }`.
    pub fn select_piece(&mut self, row: u8, col: u8) -> JsValue {
        match position(row, col).and_then(|p| self.game.select_piece(p)) {
            Ok(moves) => to_js(&moves.iter().map(move_json).collect::<Vec<_>>()),
            Err(e) => error_js(&e),
        }
    }

    /// Moves for the piece on a square without changing the selection.
    pub fn get_moves_for_square(&self, row: u8, col: u8) -> JsValue {
        let moves = position(row, col)
            .and_then(|p| self.game.legal_moves(p))
            .unwrap_or_default();
        to_js(&moves.iter().map(move_json).collect::<Vec<_>>())
    }

    pub fn move_selected(&mut self, row: u8, col: u8) -> JsValue {
        match position(row, col).and_then(|p| self.game.move_selected(p)) {
            Ok(outcome) => to_js(&MoveResult {
                board_state: Some(build_board_state(&self.game, Some(&outcome))),
                error: None,
            }),
            Err(e) => error_js(&e),
        }
    }

    pub fn deselect(&mut self) -> JsValue {
        match self.game.deselect() {
            Ok(()) => self.get_board_state(),
            Err(e) => error_js(&e),
        }
    }

    pub fn reset(&mut self) -> JsValue {
        self.game.reset();
        self.get_board_state()
    }

    pub fn is_game_over(&self) -> JsValue {
        let winner = self.game.is_game_over();
        to_js(&GameOverJson {
            game_over: winner.is_some(),
            winner: winner.map(player_to_string),
        })
    }
}
