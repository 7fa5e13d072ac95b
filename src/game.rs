use serde::{Deserialize, Serialize};

use crate::board::{Board, PIECES_PER_SIDE};
use crate::config::GameConfig;
use crate::error::MoveRejected;
use crate::moves::{Move, MoveOutcome};
use crate::piece::{Piece, PieceId, Player};
use crate::position::Position;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct GameState {
    pub player_one_piece_count: u8,
    pub player_two_piece_count: u8,
    pub current_player: Player,
    /// Piece that just captured and must capture again before the turn ends.
    #[serde(default)]
    pub continue_capture: Option<PieceId>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::with_counts(PIECES_PER_SIDE, PIECES_PER_SIDE)
    }

    pub fn with_counts(player_one: u8, player_two: u8) -> Self {
        GameState {
            player_one_piece_count: player_one,
            player_two_piece_count: player_two,
            current_player: Player::PlayerOne,
            continue_capture: None,
        }
    }

    /// State matching whatever is on `board`, with `to_move` on turn.
    pub fn from_board(board: &Board, to_move: Player) -> Self {
        GameState {
            player_one_piece_count: board.count(Player::PlayerOne),
            player_two_piece_count: board.count(Player::PlayerTwo),
            current_player: to_move,
            continue_capture: None,
        }
    }

    pub fn count(&self, player: Player) -> u8 {
        match player {
            Player::PlayerOne => self.player_one_piece_count,
            Player::PlayerTwo => self.player_two_piece_count,
        }
    }

    /// One of `victim`'s pieces was taken.
    pub fn record_capture(&mut self, victim: Player) {
        let count = match victim {
            Player::PlayerOne => &mut self.player_one_piece_count,
            Player::PlayerTwo => &mut self.player_two_piece_count,
        };
        assert!(*count > 0, "{} piece count would go negative", victim.name());
        *count -= 1;
    }

    pub fn pass_turn(&mut self) {
        self.current_player = self.current_player.opponent();
    }
}

pub fn new_game() -> (Board, GameState) {
    (Board::new(), GameState::new())
}

/// Pieces the player on turn may pick up. Mid-chain only the capturing piece.
pub fn selectable_pieces(board: &Board, state: &GameState) -> Vec<Piece> {
    board
        .pieces(state.current_player)
        .into_iter()
        .map(|(_, p)| p)
        .filter(|p| state.continue_capture.map_or(true, |id| id == p.id))
        .collect()
}

/// Destinations for `piece` this turn. Pieces of the side not on turn, or
/// no longer on the board, have none; mid-chain only the chaining piece's
/// captures remain.
pub fn valid_moves(piece: &Piece, board: &Board, state: &GameState) -> Vec<Move> {
    if piece.owner != state.current_player {
        return Vec::new();
    }
    match board.find(piece.id) {
        Some((from, _)) => chain_filtered(board.valid_moves(from), piece.id, state),
        None => Vec::new(),
    }
}

fn chain_filtered(mut moves: Vec<Move>, id: PieceId, state: &GameState) -> Vec<Move> {
    match state.continue_capture {
        Some(chain) if chain != id => Vec::new(),
        Some(_) => {
            moves.retain(|m| m.is_capture);
            moves
        }
        None => moves,
    }
}

pub fn can_player_play(board: &Board, player: Player) -> bool {
    board
        .pieces(player)
        .iter()
        .any(|(pos, _)| !board.valid_moves(*pos).is_empty())
}

fn player_has_capture(board: &Board, player: Player) -> bool {
    board.pieces(player).iter().any(|(pos, _)| board.has_capture(*pos))
}

/// The winner, if either side has no pieces or no legal move.
/// Player one is checked first.
pub fn is_game_over(board: &Board, state: &GameState) -> Option<Player> {
    for player in [Player::PlayerOne, Player::PlayerTwo] {
        if state.count(player) == 0 || !can_player_play(board, player) {
            return Some(player.opponent());
        }
    }
    None
}

fn winner_by_elimination(state: &GameState) -> Option<Player> {
    [Player::PlayerOne, Player::PlayerTwo]
        .into_iter()
        .find(|&p| state.count(p) == 0)
        .map(Player::opponent)
}

/// Apply an already-validated move, then settle continuation, termination
/// and turn handover.
fn complete_move(board: &mut Board, state: &mut GameState, from: Position, mv: Move) -> MoveOutcome {
    let mover = state.current_player;
    let applied = board.apply_move(from, mv, state);
    if applied.promoted {
        log::info!("{} crowned a king on {}", mover.name(), mv.destination);
    }

    // Crowning ends the turn, even when the new king could jump again.
    let must_continue =
        applied.captured && !applied.promoted && board.has_capture(mv.destination);
    state.continue_capture = if must_continue {
        board.get(mv.destination).map(|p| p.id)
    } else {
        None
    };
    // Mid-chain the opponent cannot be out of pieces (there is still one to
    // jump), so only the elimination check applies before the chain ends.
    let game_over = if must_continue {
        winner_by_elimination(state)
    } else {
        is_game_over(board, state)
    };
    let turn_passed = !must_continue && game_over.is_none();
    if turn_passed {
        state.pass_turn();
    }

    MoveOutcome {
        from,
        to: mv.destination,
        captured: applied.captured,
        promoted: applied.promoted,
        turn_passed,
        must_continue,
        game_over,
    }
}

/// Move entry point over an explicit board and state: checks ownership,
/// capture chains and legality, applies the move and reports what happened.
/// Never resets; the caller decides what to do after `game_over`.
pub fn apply_move(
    piece: &Piece,
    destination: Position,
    board: &mut Board,
    state: &mut GameState,
) -> Result<MoveOutcome, MoveRejected> {
    let (from, current) = board
        .find(piece.id)
        .ok_or(MoveRejected::PieceNotOnBoard(piece.id))?;
    if current.owner != state.current_player {
        return Err(MoveRejected::NotYourPiece(from));
    }
    if let Some(chain) = state.continue_capture.filter(|&id| id != current.id) {
        let chain_at = board.find(chain).map(|(pos, _)| pos).unwrap_or(from);
        return Err(MoveRejected::MustContinueCapture(chain_at));
    }
    let mv = chain_filtered(board.valid_moves(from), current.id, state)
        .into_iter()
        .find(|m| m.destination == destination)
        .ok_or(MoveRejected::IllegalDestination { from, to: destination })?;
    Ok(complete_move(board, state, from, mv))
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    PieceSelected(PieceId),
    /// The piece just captured and has another capture available.
    ContinueCapture(PieceId),
    GameOver(Player),
}

/// Owns one game's board and state and drives selection, moves, capture
/// chains and game end.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    state: GameState,
    phase: Phase,
    config: GameConfig,
    last_winner: Option<Player>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let (board, state) = new_game();
        Game {
            board,
            state,
            phase: Phase::AwaitingSelection,
            config,
            last_winner: None,
        }
    }

    /// Start from an arbitrary position. Counts are taken from the board.
    pub fn from_position(board: Board, to_move: Player, config: GameConfig) -> Self {
        let state = GameState::from_board(&board, to_move);
        Game {
            board,
            state,
            phase: Phase::AwaitingSelection,
            config,
            last_winner: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_player(&self) -> Player {
        self.state.current_player
    }

    pub fn piece_count(&self, player: Player) -> u8 {
        self.state.count(player)
    }

    /// Winner of the most recently finished game, kept across resets.
    pub fn last_winner(&self) -> Option<Player> {
        self.last_winner
    }

    pub fn is_game_over(&self) -> Option<Player> {
        match self.phase {
            Phase::GameOver(winner) => Some(winner),
            _ => is_game_over(&self.board, &self.state),
        }
    }

    pub fn selected(&self) -> Option<(Position, Piece)> {
        match self.phase {
            Phase::PieceSelected(id) | Phase::ContinueCapture(id) => self.board.find(id),
            _ => None,
        }
    }

    pub fn must_continue(&self) -> bool {
        matches!(self.phase, Phase::ContinueCapture(_))
    }

    pub fn selectable_pieces(&self) -> Vec<Piece> {
        match self.phase {
            Phase::GameOver(_) => Vec::new(),
            Phase::ContinueCapture(id) => self.board.find(id).map(|(_, p)| p).into_iter().collect(),
            _ => selectable_pieces(&self.board, &self.state),
        }
    }

    /// Moves the piece on `from` may make right now, after capture-chain and
    /// mandatory-capture restrictions.
    pub fn legal_moves(&self, from: Position) -> Result<Vec<Move>, MoveRejected> {
        if let Phase::GameOver(_) = self.phase {
            return Err(MoveRejected::GameOver);
        }
        let piece = self.board.get(from).ok_or(MoveRejected::NoPieceAt(from))?;
        if piece.owner != self.state.current_player {
            return Err(MoveRejected::NotYourPiece(from));
        }

        let captures_only = match self.phase {
            Phase::ContinueCapture(id) if id != piece.id => {
                let chain_at = self.board.find(id).map(|(pos, _)| pos).unwrap_or(from);
                return Err(MoveRejected::MustContinueCapture(chain_at));
            }
            Phase::ContinueCapture(_) => true,
            _ => self.config.mandatory_capture && player_has_capture(&self.board, piece.owner),
        };

        let mut moves = self.board.valid_moves(from);
        if captures_only {
            moves.retain(|m| m.is_capture);
        }
        Ok(moves)
    }

    /// Pick up the piece on `pos` and report where it can go.
    pub fn select_piece(&mut self, pos: Position) -> Result<Vec<Move>, MoveRejected> {
        let moves = self.legal_moves(pos).inspect_err(|e| {
            log::warn!("selection rejected: {e}");
        })?;
        if let Phase::AwaitingSelection | Phase::PieceSelected(_) = self.phase {
            if let Some(piece) = self.board.get(pos) {
                self.phase = Phase::PieceSelected(piece.id);
            }
        }
        log::debug!("selected {pos}, {} moves", moves.len());
        Ok(moves)
    }

    pub fn deselect(&mut self) -> Result<(), MoveRejected> {
        match self.phase {
            Phase::ContinueCapture(_) => {
                let (pos, _) = self.selected().ok_or(MoveRejected::NoPieceSelected)?;
                Err(MoveRejected::MustContinueCapture(pos))
            }
            Phase::PieceSelected(_) => {
                self.phase = Phase::AwaitingSelection;
                Ok(())
            }
            Phase::AwaitingSelection | Phase::GameOver(_) => Ok(()),
        }
    }

    /// Move the selected piece to `destination`. A rejected move changes nothing.
    pub fn move_selected(&mut self, destination: Position) -> Result<MoveOutcome, MoveRejected> {
        let result = self.try_move_selected(destination);
        if let Err(e) = &result {
            log::warn!("move rejected: {e}");
        }
        result
    }

    fn try_move_selected(&mut self, destination: Position) -> Result<MoveOutcome, MoveRejected> {
        let id = match self.phase {
            Phase::GameOver(_) => return Err(MoveRejected::GameOver),
            Phase::AwaitingSelection => return Err(MoveRejected::NoPieceSelected),
            Phase::PieceSelected(id) | Phase::ContinueCapture(id) => id,
        };
        let (from, _) = self.board.find(id).ok_or(MoveRejected::PieceNotOnBoard(id))?;
        let mv = self
            .legal_moves(from)?
            .into_iter()
            .find(|m| m.destination == destination)
            .ok_or(MoveRejected::IllegalDestination { from, to: destination })?;

        let mover = self.state.current_player;
        let outcome = complete_move(&mut self.board, &mut self.state, from, mv);
        log::debug!(
            "{} moved {} -> {}{}",
            mover.name(),
            from,
            destination,
            if outcome.captured { " capturing" } else { "" }
        );

        self.phase = if let Some(winner) = outcome.game_over {
            log::info!("{} wins", winner.name());
            self.last_winner = Some(winner);
            if self.config.auto_reset {
                self.reset();
                Phase::AwaitingSelection
            } else {
                Phase::GameOver(winner)
            }
        } else if outcome.must_continue {
            Phase::ContinueCapture(id)
        } else {
            log::info!("{}'s turn", self.state.current_player.name());
            Phase::AwaitingSelection
        };
        Ok(outcome)
    }

    /// Select `from` and move it to `to` in one call. On rejection the
    /// previous selection is kept.
    pub fn move_piece(&mut self, from: Position, to: Position) -> Result<MoveOutcome, MoveRejected> {
        let previous = self.phase;
        self.select_piece(from)?;
        self.move_selected(to).inspect_err(|_| self.phase = previous)
    }

    /// Throw away the board and state and set up the opening again.
    pub fn reset(&mut self) {
        let (board, state) = new_game();
        self.board = board;
        self.state = state;
        self.phase = Phase::AwaitingSelection;
        log::debug!("new game");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Position {
        Position::new(row, col).unwrap()
    }

    fn board_with(pieces: &[(u8, u8, Piece)]) -> Board {
        let mut board = Board::empty();
        for &(row, col, piece) in pieces {
            board.place(pos(row, col), piece);
        }
        board
    }

    fn one(id: PieceId) -> Piece {
        Piece::new(id, Player::PlayerOne)
    }

    fn two(id: PieceId) -> Piece {
        Piece::new(id, Player::PlayerTwo)
    }

    fn manual_reset() -> GameConfig {
        GameConfig { auto_reset: false, ..GameConfig::default() }
    }

    #[test]
    fn new_game_is_always_the_same_opening() {
        for _ in 0..3 {
            let (board, state) = new_game();
            assert_eq!(state.player_one_piece_count, 12);
            assert_eq!(state.player_two_piece_count, 12);
            assert_eq!(state.current_player, Player::PlayerOne);
            board.assert_consistent(&state);
            for (p, piece) in board.occupied() {
                assert!(p.is_dark());
                let home = match piece.owner {
                    Player::PlayerOne => 0..=2,
                    Player::PlayerTwo => 5..=7,
                };
                assert!(home.contains(&p.row));
            }
            assert_eq!(is_game_over(&board, &state), None);
        }
    }

    #[test]
    fn only_current_player_pieces_are_selectable() {
        let (board, state) = new_game();
        let pieces = selectable_pieces(&board, &state);
        assert_eq!(pieces.len(), 12);
        assert!(pieces.iter().all(|p| p.owner == Player::PlayerOne));

        let theirs = board.get(pos(5, 0)).unwrap();
        assert!(valid_moves(&theirs, &board, &state).is_empty());
        let ours = board.get(pos(2, 1)).unwrap();
        assert_eq!(valid_moves(&ours, &board, &state).len(), 2);
    }

    #[test]
    fn simple_move_passes_the_turn() {
        let mut game = Game::default();
        let outcome = game.move_piece(pos(2, 3), pos(3, 4)).unwrap();
        assert!(outcome.turn_passed);
        assert!(!outcome.captured);
        assert_eq!(outcome.game_over, None);
        assert!(game.board().is_empty(pos(2, 3)));
        assert!(game.board().get(pos(3, 4)).is_some());
        assert_eq!(game.current_player(), Player::PlayerTwo);
        assert_eq!(game.phase(), Phase::AwaitingSelection);
    }

    #[test]
    fn capture_scenario_removes_piece_and_counts_down() {
        let mut board = Board::new();
        let advanced = board.remove(pos(5, 4)).unwrap();
        board.place(pos(3, 4), advanced);
        let mut state = GameState::new();
        let piece = board.get(pos(2, 3)).unwrap();

        let moves = valid_moves(&piece, &board, &state);
        assert!(moves.contains(&Move::jump(pos(4, 5))));
        assert_eq!(board.get(pos(3, 4)).unwrap().owner, Player::PlayerTwo);

        let outcome = apply_move(&piece, pos(4, 5), &mut board, &mut state).unwrap();
        assert!(outcome.captured);
        assert!(board.is_empty(pos(3, 4)));
        assert_eq!(state.player_two_piece_count, 11);
        board.assert_consistent(&state);
    }

    #[test]
    fn illegal_destination_is_a_no_op() {
        let mut game = Game::default();
        let before_board = game.board().clone();
        let before_state = game.state().clone();

        game.select_piece(pos(2, 3)).unwrap();
        let err = game.move_selected(pos(4, 3)).unwrap_err();
        assert_eq!(err, MoveRejected::IllegalDestination { from: pos(2, 3), to: pos(4, 3) });
        assert_eq!(game.board(), &before_board);
        assert_eq!(game.state(), &before_state);
        assert_eq!(game.phase(), Phase::PieceSelected(10));
    }

    #[test]
    fn opponent_pieces_and_empty_squares_cannot_be_selected() {
        let mut game = Game::default();
        assert_eq!(game.select_piece(pos(5, 0)), Err(MoveRejected::NotYourPiece(pos(5, 0))));
        assert_eq!(game.select_piece(pos(3, 0)), Err(MoveRejected::NoPieceAt(pos(3, 0))));
        assert_eq!(game.move_selected(pos(3, 0)), Err(MoveRejected::NoPieceSelected));
        assert_eq!(game.phase(), Phase::AwaitingSelection);
    }

    #[test]
    fn capture_chain_keeps_turn_and_restricts_to_captures() {
        // o at (2,1) can jump (3,2) to (4,3), then (5,4) to (6,5).
        let board = board_with(&[
            (2, 1, one(1)),
            (0, 7, one(2)),
            (3, 2, two(3)),
            (5, 4, two(4)),
            (7, 0, two(5)),
        ]);
        let mut game = Game::from_position(board, Player::PlayerOne, manual_reset());

        let first = game.move_piece(pos(2, 1), pos(4, 3)).unwrap();
        assert!(first.captured);
        assert!(first.must_continue);
        assert!(!first.turn_passed);
        assert_eq!(game.current_player(), Player::PlayerOne);
        assert_eq!(game.phase(), Phase::ContinueCapture(1));

        // the step to (5,2) exists on the board but is not legal mid-chain
        assert_eq!(game.legal_moves(pos(4, 3)).unwrap(), vec![Move::jump(pos(6, 5))]);
        assert_eq!(
            game.select_piece(pos(0, 7)),
            Err(MoveRejected::MustContinueCapture(pos(4, 3)))
        );
        assert_eq!(game.deselect(), Err(MoveRejected::MustContinueCapture(pos(4, 3))));
        assert_eq!(game.selectable_pieces(), vec![one(1)]);
        assert!(game.move_selected(pos(5, 2)).is_err());

        let second = game.move_selected(pos(6, 5)).unwrap();
        assert!(second.captured);
        assert!(!second.must_continue);
        assert!(second.turn_passed);
        assert_eq!(game.current_player(), Player::PlayerTwo);
        assert_eq!(game.piece_count(Player::PlayerTwo), 1);
        game.board().assert_consistent(game.state());
    }

    #[test]
    fn free_functions_hold_the_chaining_piece() {
        let mut board = board_with(&[
            (2, 1, one(1)),
            (0, 7, one(2)),
            (3, 2, two(3)),
            (5, 4, two(4)),
            (7, 0, two(5)),
        ]);
        let mut state = GameState::from_board(&board, Player::PlayerOne);

        let first = apply_move(&one(1), pos(4, 3), &mut board, &mut state).unwrap();
        assert!(first.must_continue);
        assert_eq!(state.continue_capture, Some(1));
        assert_eq!(state.current_player, Player::PlayerOne);

        assert_eq!(valid_moves(&one(1), &board, &state), vec![Move::jump(pos(6, 5))]);
        assert!(valid_moves(&one(2), &board, &state).is_empty());
        assert_eq!(selectable_pieces(&board, &state), vec![one(1)]);

        let before = board.clone();
        assert_eq!(
            apply_move(&one(2), pos(1, 6), &mut board, &mut state),
            Err(MoveRejected::MustContinueCapture(pos(4, 3)))
        );
        assert_eq!(
            apply_move(&one(1), pos(5, 2), &mut board, &mut state),
            Err(MoveRejected::IllegalDestination { from: pos(4, 3), to: pos(5, 2) })
        );
        assert_eq!(board, before);

        let second = apply_move(&one(1), pos(6, 5), &mut board, &mut state).unwrap();
        assert!(second.turn_passed);
        assert_eq!(state.continue_capture, None);
        assert_eq!(state.current_player, Player::PlayerTwo);
        assert_eq!(selectable_pieces(&board, &state), vec![two(5)]);
        board.assert_consistent(&state);
    }

    #[test]
    fn crowning_capture_ends_the_turn() {
        // o at (5,2) jumps (6,3) onto the far row; as a king it could jump (6,5) next.
        let mut board = board_with(&[
            (5, 2, one(1)),
            (6, 3, two(2)),
            (6, 5, two(3)),
            (3, 6, two(4)),
        ]);
        let mut state = GameState::from_board(&board, Player::PlayerOne);

        let outcome = apply_move(&one(1), pos(7, 4), &mut board, &mut state).unwrap();
        assert!(outcome.captured);
        assert!(outcome.promoted);
        assert!(board.has_capture(pos(7, 4)));
        assert!(!outcome.must_continue);
        assert!(outcome.turn_passed);
        assert_eq!(state.current_player, Player::PlayerTwo);
        assert_eq!(state.continue_capture, None);
    }

    #[test]
    fn controller_passes_turn_after_crowning_capture() {
        let board = board_with(&[
            (5, 2, one(1)),
            (6, 3, two(2)),
            (6, 5, two(3)),
            (3, 6, two(4)),
        ]);
        let mut game = Game::from_position(board, Player::PlayerOne, manual_reset());

        let outcome = game.move_piece(pos(5, 2), pos(7, 4)).unwrap();
        assert!(outcome.promoted);
        assert!(!outcome.must_continue);
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.current_player(), Player::PlayerTwo);
        assert_eq!(game.piece_count(Player::PlayerTwo), 2);
    }

    #[test]
    fn promotion_gives_backward_moves_afterwards() {
        let board = board_with(&[(6, 1, one(1)), (3, 6, two(2))]);
        let mut game = Game::from_position(board, Player::PlayerOne, manual_reset());

        let outcome = game.move_piece(pos(6, 1), pos(7, 2)).unwrap();
        assert!(outcome.promoted);
        assert!(outcome.turn_passed);
        assert!(game.board().get(pos(7, 2)).unwrap().is_king);

        game.move_piece(pos(3, 6), pos(2, 5)).unwrap();
        let moves = game.legal_moves(pos(7, 2)).unwrap();
        assert!(moves.iter().any(|m| m.destination.row == 6));
        assert!(moves.iter().all(|m| m.destination.row < 7));
    }

    #[test]
    fn capturing_the_last_piece_ends_the_game() {
        let board = board_with(&[(2, 3, one(1)), (3, 4, two(2))]);
        let mut game = Game::from_position(board, Player::PlayerOne, manual_reset());

        let outcome = game.move_piece(pos(2, 3), pos(4, 5)).unwrap();
        assert_eq!(outcome.game_over, Some(Player::PlayerOne));
        assert!(!outcome.turn_passed);
        assert_eq!(game.piece_count(Player::PlayerTwo), 0);
        assert_eq!(game.phase(), Phase::GameOver(Player::PlayerOne));
        assert_eq!(game.is_game_over(), Some(Player::PlayerOne));
        assert_eq!(game.select_piece(pos(4, 5)), Err(MoveRejected::GameOver));
        assert!(game.selectable_pieces().is_empty());
    }

    #[test]
    fn zero_pieces_is_a_loss() {
        let board = board_with(&[(2, 3, one(1))]);
        let state = GameState::from_board(&board, Player::PlayerOne);
        assert_eq!(is_game_over(&board, &state), Some(Player::PlayerOne));

        let board = board_with(&[(5, 2, two(1))]);
        let state = GameState::from_board(&board, Player::PlayerOne);
        assert_eq!(is_game_over(&board, &state), Some(Player::PlayerTwo));
    }

    #[test]
    fn blocked_player_loses() {
        // Player two's only man at (1,0) is walled in by (0,1); its jump would leave the board.
        let board = board_with(&[(0, 1, one(1)), (1, 0, two(2)), (4, 3, one(3))]);
        let state = GameState::from_board(&board, Player::PlayerOne);
        assert!(!can_player_play(&board, Player::PlayerTwo));
        assert!(can_player_play(&board, Player::PlayerOne));
        assert_eq!(is_game_over(&board, &state), Some(Player::PlayerOne));
    }

    #[test]
    fn move_that_stalemates_the_opponent_wins() {
        // Player two's man at (2,1) can only step to (1,2); player one fills it
        // while (0,3) stays covered so no jump opens up.
        let board = board_with(&[
            (0, 1, one(1)),
            (0, 3, one(2)),
            (1, 0, one(3)),
            (2, 1, two(4)),
        ]);
        let mut game = Game::from_position(board, Player::PlayerOne, manual_reset());
        assert!(can_player_play(game.board(), Player::PlayerTwo));

        let outcome = game.move_piece(pos(0, 1), pos(1, 2)).unwrap();
        assert_eq!(outcome.game_over, Some(Player::PlayerOne));
        assert!(!outcome.turn_passed);
        assert_eq!(game.phase(), Phase::GameOver(Player::PlayerOne));
        assert_eq!(game.piece_count(Player::PlayerTwo), 1);
    }

    #[test]
    fn auto_reset_starts_over_and_remembers_the_winner() {
        let board = board_with(&[(2, 3, one(1)), (3, 4, two(2))]);
        let mut game = Game::from_position(board, Player::PlayerOne, GameConfig::default());

        let outcome = game.move_piece(pos(2, 3), pos(4, 5)).unwrap();
        assert_eq!(outcome.game_over, Some(Player::PlayerOne));
        assert_eq!(game.last_winner(), Some(Player::PlayerOne));
        assert_eq!(game.phase(), Phase::AwaitingSelection);
        assert_eq!(game.state(), &GameState::new());
        assert_eq!(game.board(), &Board::new());
    }

    #[test]
    fn mandatory_capture_filters_steps() {
        let board = board_with(&[(2, 3, one(1)), (2, 7, one(2)), (3, 4, two(3)), (7, 0, two(4))]);
        let config = GameConfig { mandatory_capture: true, ..manual_reset() };
        let mut game = Game::from_position(board.clone(), Player::PlayerOne, config);
        assert_eq!(game.legal_moves(pos(2, 3)).unwrap(), vec![Move::jump(pos(4, 5))]);
        assert!(game.legal_moves(pos(2, 7)).unwrap().is_empty());
        assert!(game.move_piece(pos(2, 7), pos(3, 6)).is_err());

        let free = Game::from_position(board, Player::PlayerOne, manual_reset());
        assert_eq!(free.legal_moves(pos(2, 7)).unwrap(), vec![Move::step(pos(3, 6))]);
    }

    #[test]
    fn reselecting_replaces_the_selection() {
        let mut game = Game::default();
        game.select_piece(pos(2, 1)).unwrap();
        game.select_piece(pos(2, 3)).unwrap();
        assert_eq!(game.selected().map(|(p, _)| p), Some(pos(2, 3)));
        game.deselect().unwrap();
        assert_eq!(game.selected(), None);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn random_games_keep_board_and_counts_in_sync() {
        use rand::rngs::StdRng;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut game = Game::new(manual_reset());
            for _ in 0..300 {
                if game.is_game_over().is_some() {
                    break;
                }
                let options: Vec<(Position, Move)> = game
                    .selectable_pieces()
                    .iter()
                    .filter_map(|p| game.board().find(p.id))
                    .flat_map(|(from, _)| {
                        game.legal_moves(from)
                            .unwrap_or_default()
                            .into_iter()
                            .map(move |m| (from, m))
                    })
                    .collect();
                let Some(&(from, mv)) = options.choose(&mut rng) else {
                    break;
                };

                let mover = game.current_player();
                let piece = game.board().get(from).unwrap();
                let victim = mv.captured_square(from).map(|mid| game.board().get(mid).unwrap());
                if let Some(v) = victim {
                    assert_eq!(v.owner, mover.opponent());
                }

                let outcome = game.move_piece(from, mv.destination).unwrap();

                if let Some(mid) = mv.captured_square(from) {
                    assert!(game.board().is_empty(mid));
                }
                if !piece.is_king {
                    let dr = mv.destination.row as i8 - from.row as i8;
                    assert_eq!(dr.signum(), mover.forward());
                }
                let moved = game.board().get(mv.destination).unwrap();
                assert_eq!(moved.id, piece.id);
                assert!(!piece.is_king || moved.is_king);
                assert_eq!(outcome.turn_passed, game.current_player() != mover);
                game.board().assert_consistent(game.state());
            }
        }
    }
}
