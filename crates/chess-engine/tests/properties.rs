//! Property tests over random legal games.
//!
//! Each case walks a game by picking moves from the legal list with the
//! generated indices, then checks invariants that must hold everywhere.

use chess_engine::{GameStatus, Position};
use proptest::prelude::*;

/// Plays up to `choices.len()` plies, stopping early when the game ends.
fn walk(choices: &[u8]) -> Position {
    let mut position = Position::startpos();
    for &choice in choices {
        let moves = position.legal_moves();
        if moves.is_empty() {
            break;
        }
        let m = moves[choice as usize % moves.len()];
        position.apply(m).expect("generated moves are legal");
    }
    position
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn make_undo_restores_exactly(choices in prop::collection::vec(any::<u8>(), 0..40)) {
        let mut position = walk(&choices);
        let before = position.clone();
        for m in position.legal_moves().iter().copied().collect::<Vec<_>>() {
            let undo = position.make_move(m);
            position.undo_move(m, undo);
            prop_assert_eq!(&position, &before);
        }
    }

    #[test]
    fn legal_moves_never_leave_the_king_attacked(choices in prop::collection::vec(any::<u8>(), 0..40)) {
        let mut position = walk(&choices);
        let us = position.side_to_move();
        for m in position.legal_moves().iter().copied().collect::<Vec<_>>() {
            let after = position.play(m);
            prop_assert!(!after.is_in_check(us), "{} leaves the king in check", m);
        }
    }

    #[test]
    fn fen_roundtrip(choices in prop::collection::vec(any::<u8>(), 0..40)) {
        let position = walk(&choices);
        let fen = position.to_fen();
        let reloaded = Position::from_fen(&fen).unwrap();
        prop_assert_eq!(reloaded.to_fen(), fen);
        prop_assert_eq!(reloaded.fingerprint(), position.fingerprint());
    }

    #[test]
    fn history_counts_every_position_once(choices in prop::collection::vec(any::<u8>(), 0..40)) {
        let position = walk(&choices);
        let total: u32 = position.history().values().sum();
        prop_assert_eq!(total as usize, position.moves_played().len() + 1);
        prop_assert!(position.position_count() >= 1);
    }

    #[test]
    fn san_replays_to_the_same_position(choices in prop::collection::vec(any::<u8>(), 0..30)) {
        let position = walk(&choices);
        let mut replay = Position::startpos();
        for san in position.moves_played() {
            replay.apply_move(san).unwrap();
        }
        prop_assert_eq!(replay, position);
    }

    #[test]
    fn status_agrees_with_queries(choices in prop::collection::vec(any::<u8>(), 0..60)) {
        let mut position = walk(&choices);
        let us = position.side_to_move();
        match position.status() {
            GameStatus::Checkmate { loser } => {
                prop_assert_eq!(loser, us);
                prop_assert!(position.is_checkmate(us));
            }
            GameStatus::Stalemate => prop_assert!(position.is_stalemate()),
            GameStatus::ThreefoldRepetition => prop_assert!(position.is_threefold_repetition()),
            GameStatus::Ongoing => {
                prop_assert!(!position.legal_moves().is_empty());
                prop_assert!(!position.is_threefold_repetition());
            }
        }
    }
}
