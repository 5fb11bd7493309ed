//! Zobrist keys for position fingerprints.
//!
//! A fingerprint XORs one random key per occupied square (by piece kind and
//! color), one key when black is to move, one per castling right held, and
//! one for the file of the en-passant target. Clocks are not included, so
//! two positions that differ only in move counters repeat each other.

use chess_core::{Color, Piece, Square};

use crate::position::CastlingRights;

/// Zobrist hash keys, generated at compile time from a fixed seed.
pub struct ZobristKeys {
    /// Keys for pieces: [piece][color][square]
    pieces: [[[u64; 64]; 2]; 6],
    black_to_move: u64,
    castling: [u64; 4],
    en_passant: [u64; 8],
}

impl ZobristKeys {
    pub const fn new() -> Self {
        // xorshift64
        const fn next_random(state: u64) -> u64 {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            x
        }

        let mut state = 0x9E3779B97F4A7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = next_random(state);
                    pieces[piece][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        state = next_random(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = next_random(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = next_random(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub const fn piece_key(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.pieces[piece.index()][color.index()][square.index() as usize]
    }

    /// Fingerprint of a full board state, recomputed from scratch.
    pub fn hash(
        &self,
        board: &[Option<(Piece, Color)>; 64],
        side_to_move: Color,
        castling: CastlingRights,
        en_passant: Option<Square>,
    ) -> u64 {
        let mut hash = 0u64;
        for sq in Square::all() {
            if let Some((piece, color)) = board[sq.index() as usize] {
                hash ^= self.piece_key(piece, color, sq);
            }
        }
        if side_to_move == Color::Black {
            hash ^= self.black_to_move;
        }
        for (bit, key) in self.castling.iter().enumerate() {
            if castling.raw() & (1 << bit) != 0 {
                hash ^= key;
            }
        }
        if let Some(sq) = en_passant {
            hash ^= self.en_passant[sq.file().index() as usize];
        }
        hash
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();
