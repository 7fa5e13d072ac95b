//! Plays seeded random legal games and checks board/count consistency after
//! every move.
//!
//! Usage: `selfplay [games=100] [seed=1] [config.json]`. Set `RUST_LOG=debug`
//! to print each final position.

use checkers::{Game, GameConfig, Move, Player, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

const MAX_MOVES: u32 = 400;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let games: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(100);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let config = match args.next() {
        Some(path) => match GameConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    // Each game is driven to its end here, so never let it restart itself.
    let config = GameConfig { auto_reset: false, ..config };

    let mut rng = StdRng::seed_from_u64(seed);
    let (mut one_wins, mut two_wins, mut unfinished) = (0u32, 0u32, 0u32);
    let mut total_moves = 0u32;

    for n in 0..games {
        let mut game = Game::new(config.clone());
        let mut moves = 0;
        while game.is_game_over().is_none() && moves < MAX_MOVES {
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
            if let Err(e) = game.move_piece(from, mv.destination) {
                eprintln!("game {n}: generated move {from} -> {} rejected: {e}", mv.destination);
                std::process::exit(1);
            }
            game.board().assert_consistent(game.state());
            moves += 1;
        }

        total_moves += moves;
        match game.is_game_over() {
            Some(Player::PlayerOne) => one_wins += 1,
            Some(Player::PlayerTwo) => two_wins += 1,
            None => unfinished += 1,
        }
        log::debug!("game {n} finished after {moves} moves:\n{}", game.board().to_text());
    }

    eprintln!(
        "{games} games, {total_moves} moves: player one {one_wins}, player two {two_wins}, unfinished {unfinished}"
    );
}
