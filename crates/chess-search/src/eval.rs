//! Static evaluation.
//!
//! Scores are in centipawns. Internally everything is White-relative;
//! [`evaluate`] flips the sign when Black is to move so the search always
//! sees the value from the mover's side.

use chess_core::{Color, Piece, Square};
use chess_engine::Position;

use crate::tables;

/// Penalty per king-side file (own file and neighbours) without a friendly pawn.
const OPEN_FILE_PENALTY: i32 = 15;
/// Penalty per rank the king has walked beyond its second rank.
const ADVANCED_KING_PENALTY: i32 = 10;
/// Endgame penalty for a cornered king while the opponent still has a rook's worth.
const CORNERED_KING_PENALTY: i32 = 100;
const CORNER_MATERIAL_THRESHOLD: i32 = 500;

const CORNERS: [Square; 4] = [Square::A1, Square::H1, Square::A8, Square::H8];

/// Position evaluator with a configurable mobility term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator {
    mobility_weight: i32,
}

impl Evaluator {
    pub const fn new(mobility_weight: i32) -> Self {
        Evaluator { mobility_weight }
    }

    /// Score from the side-to-move's point of view.
    pub fn evaluate(&self, position: &Position) -> i32 {
        let score = self.evaluate_white(position);
        match position.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        }
    }

    /// Score from White's point of view.
    pub fn evaluate_white(&self, position: &Position) -> i32 {
        let endgame = is_endgame(position);
        let mut score = 0;

        for (sq, piece, color) in position.pieces() {
            let value = piece.value() + tables::positional(piece, color, sq, endgame);
            score += sign(color) * value;
        }

        for color in Color::BOTH {
            score += sign(color) * king_safety(position, color, endgame);
        }

        if self.mobility_weight != 0 {
            score += self.mobility_weight * mobility(position);
        }

        score
    }
}

/// [`Evaluator::evaluate`] with default settings.
pub fn evaluate(position: &Position) -> i32 {
    Evaluator::default().evaluate(position)
}

/// [`Evaluator::evaluate_white`] with default settings.
pub fn evaluate_white(position: &Position) -> i32 {
    Evaluator::default().evaluate_white(position)
}

/// True when both queens are gone, or neither side has more than one
/// knight, bishop or rook.
pub fn is_endgame(position: &Position) -> bool {
    let mut queens = [0u32; 2];
    let mut minors_and_rooks = [0u32; 2];
    for (_, piece, color) in position.pieces() {
        match piece {
            Piece::Queen => queens[color.index()] += 1,
            Piece::Knight | Piece::Bishop | Piece::Rook => minors_and_rooks[color.index()] += 1,
            Piece::Pawn | Piece::King => {}
        }
    }
    (queens[0] == 0 && queens[1] == 0) || (minors_and_rooks[0] <= 1 && minors_and_rooks[1] <= 1)
}

fn sign(color: Color) -> i32 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Non-positive safety term for `color`'s king.
fn king_safety(position: &Position, color: Color, endgame: bool) -> i32 {
    let Some(king) = position.king_square(color) else {
        return 0;
    };

    if endgame {
        let opponent_material = non_pawn_material(position, color.opposite());
        if CORNERS.contains(&king) && opponent_material >= CORNER_MATERIAL_THRESHOLD {
            return -CORNERED_KING_PENALTY;
        }
        return 0;
    }

    let mut penalty = 0;
    let king_file = king.file().index() as i8;
    for file in (king_file - 1)..=(king_file + 1) {
        if !(0..8).contains(&file) {
            continue;
        }
        let sheltered = (0..8u8).any(|rank| position.piece_on(rank, file as u8) == Some((Piece::Pawn, color)));
        if !sheltered {
            penalty -= OPEN_FILE_PENALTY;
        }
    }

    let relative_rank = match color {
        Color::White => king.rank().index(),
        Color::Black => 7 - king.rank().index(),
    };
    if relative_rank > 1 {
        penalty -= ADVANCED_KING_PENALTY * (relative_rank as i32 - 1);
    }

    penalty
}

fn non_pawn_material(position: &Position, color: Color) -> i32 {
    position
        .pieces()
        .filter(|&(_, piece, c)| c == color && !matches!(piece, Piece::Pawn | Piece::King))
        .map(|(_, piece, _)| piece.value())
        .sum()
}

/// White's pseudo-legal move count minus Black's.
fn mobility(position: &Position) -> i32 {
    let white = position.pseudo_legal_moves_for(Color::White).len() as i32;
    let black = position.pseudo_legal_moves_for(Color::Black).len() as i32;
    white - black
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn startpos_is_balanced() {
        let start = Position::startpos();
        assert_eq!(evaluate(&start), 0);
        assert_eq!(evaluate_white(&start), 0);
        assert_eq!(Evaluator::new(5).evaluate(&start), 0);
    }

    #[test]
    fn sign_follows_side_to_move() {
        let white = pos("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let up_a_queen = pos("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let up_a_queen_black = pos("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
        assert_eq!(evaluate(&white), 0);
        assert!(evaluate(&up_a_queen) > 800);
        assert_eq!(evaluate(&up_a_queen_black), -evaluate(&up_a_queen));
        assert_eq!(evaluate_white(&up_a_queen_black), evaluate_white(&up_a_queen));
    }

    #[test]
    fn mirrored_positions_cancel() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
        let mirrored = "rnbqk2r/pppp1ppp/5n2/2b1p3/4P3/2N2N2/PPPP1PPP/R1BQKB1R b KQkq - 4 4";
        assert_eq!(evaluate_white(&pos(fen)), -evaluate_white(&pos(mirrored)));
        assert_eq!(evaluate(&pos(fen)), evaluate(&pos(mirrored)));
    }

    #[test]
    fn endgame_detection() {
        assert!(!is_endgame(&Position::startpos()));
        // Queens traded.
        assert!(is_endgame(&pos(
            "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1"
        )));
        // Queens on, one rook each.
        assert!(is_endgame(&pos("3qk2r/8/8/8/8/8/8/R2QK3 w - - 0 1")));
        assert!(!is_endgame(&pos("3qk1nr/8/8/8/8/8/8/RN1QK3 w - - 0 1")));
    }

    #[test]
    fn cornered_king_is_penalised_against_a_rook() {
        let cornered = pos("k7/8/8/8/8/8/8/1R2K3 w - - 0 1");
        let central = pos("8/8/8/3k4/8/8/8/1R2K3 w - - 0 1");
        let table_gap = tables::KING_ENDGAME[tables::index(Square::from_algebraic("d5").unwrap(), Color::Black)]
            - tables::KING_ENDGAME[tables::index(Square::A8, Color::Black)];
        assert_eq!(
            evaluate_white(&cornered) - evaluate_white(&central),
            table_gap + CORNERED_KING_PENALTY
        );
    }

    #[test]
    fn missing_shelter_costs_the_king() {
        let sheltered = pos("4k3/pppppppp/8/8/8/8/PPPPPPPP/4K3 w - - 0 1");
        let open = pos("4k3/pppppppp/8/8/8/8/PPP3PP/4K3 w - - 0 1");
        // In the endgame only the missing pawns count.
        let pawn_terms: i32 = ["d2", "e2", "f2"]
            .iter()
            .map(|s| {
                let sq = Square::from_algebraic(s).unwrap();
                100 + tables::positional(Piece::Pawn, Color::White, sq, true)
            })
            .sum();
        assert!(is_endgame(&sheltered));
        assert_eq!(evaluate_white(&sheltered) - evaluate_white(&open), pawn_terms);

        // With queens and rooks on the board the open files count.
        let mg_sheltered = pos("r2qk2r/pppppppp/8/8/8/8/PPPPPPPP/R2QK2R w KQkq - 0 1");
        let mg_open = pos("r2qk2r/pppppppp/8/8/8/8/PPP3PP/R2QK2R w KQkq - 0 1");
        let mg_pawns: i32 = ["d2", "e2", "f2"]
            .iter()
            .map(|s| {
                let sq = Square::from_algebraic(s).unwrap();
                100 + tables::positional(Piece::Pawn, Color::White, sq, false)
            })
            .sum();
        assert_eq!(
            evaluate_white(&mg_sheltered) - evaluate_white(&mg_open),
            mg_pawns + 3 * OPEN_FILE_PENALTY
        );
    }
}
