//! Piece-square tables in centipawns.
//!
//! Each table is written the way a board diagram reads: the first row is
//! rank 8, the last row rank 1, from White's point of view. White pieces
//! look up `square ^ 56`, black pieces use the square index directly,
//! which mirrors the table vertically.

use chess_core::{Color, Piece, Square};

#[rustfmt::skip]
pub const PAWN: [i32; 64] = [
     0,  0,   0,   0,   0,   0,  0,  0,
    50, 50,  50,  50,  50,  50, 50, 50,
    10, 10,  20,  30,  30,  20, 10, 10,
     5,  5,  10,  25,  25,  10,  5,  5,
     0,  0,   0,  20,  20,   0,  0,  0,
     5, -5, -10,   0,   0, -10, -5,  5,
     5, 10,  10, -20, -20,  10, 10,  5,
     0,  0,   0,   0,   0,   0,  0,  0,
];

#[rustfmt::skip]
pub const KNIGHT: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
pub const BISHOP: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
pub const ROOK: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
pub const QUEEN: [i32; 64] = [
    -20, -10, -10, -5, -5, -10, -10, -20,
    -10,   0,   0,  0,  0,   0,   0, -10,
    -10,   0,   5,  5,  5,   5,   0, -10,
     -5,   0,   5,  5,  5,   5,   0,  -5,
      0,   0,   5,  5,  5,   5,   0,  -5,
    -10,   5,   5,  5,  5,   5,   0, -10,
    -10,   0,   5,  0,  0,   0,   0, -10,
    -20, -10, -10, -5, -5, -10, -10, -20,
];

#[rustfmt::skip]
pub const KING_MIDDLEGAME: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
pub const KING_ENDGAME: [i32; 64] = [
    -50, -40, -30, -20, -20, -30, -40, -50,
    -30, -20, -10,   0,   0, -10, -20, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -30,   0,   0,   0,   0, -30, -30,
    -50, -30, -30, -30, -30, -30, -30, -50,
];

/// Table index for a piece of `color` on `sq`.
#[inline]
pub const fn index(sq: Square, color: Color) -> usize {
    match color {
        Color::White => sq.flip_vertical().index() as usize,
        Color::Black => sq.index() as usize,
    }
}

/// Positional bonus for `piece` of `color` on `sq`.
pub fn positional(piece: Piece, color: Color, sq: Square, endgame: bool) -> i32 {
    let i = index(sq, color);
    match piece {
        Piece::Pawn => PAWN[i],
        Piece::Knight => KNIGHT[i],
        Piece::Bishop => BISHOP[i],
        Piece::Rook => ROOK[i],
        Piece::Queen => QUEEN[i],
        Piece::King if endgame => KING_ENDGAME[i],
        Piece::King => KING_MIDDLEGAME[i],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_mirror_between_colors() {
        for sq in Square::all() {
            for piece in Piece::ALL {
                assert_eq!(
                    positional(piece, Color::White, sq, false),
                    positional(piece, Color::Black, sq.flip_vertical(), false),
                    "{:?} on {}",
                    piece,
                    sq
                );
            }
        }
    }

    #[test]
    fn white_reads_rank_one_from_the_last_row() {
        assert_eq!(positional(Piece::King, Color::White, Square::G1, false), 30);
        assert_eq!(positional(Piece::King, Color::Black, Square::G8, false), 30);
        let e4 = Square::from_algebraic("e4").unwrap();
        assert_eq!(positional(Piece::Pawn, Color::White, e4, false), 20);
    }
}
