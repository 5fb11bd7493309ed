//! Chess position representation.

use std::collections::BTreeMap;
use std::fmt;

use chess_core::{CastleSide, Color, FenParser, Move, Piece, Square};

use crate::zobrist::ZOBRIST;
use crate::ChessError;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    const fn flag(side: CastleSide, color: Color) -> u8 {
        match (side, color) {
            (CastleSide::Kingside, Color::White) => Self::WHITE_KINGSIDE,
            (CastleSide::Queenside, Color::White) => Self::WHITE_QUEENSIDE,
            (CastleSide::Kingside, Color::Black) => Self::BLACK_KINGSIDE,
            (CastleSide::Queenside, Color::Black) => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn has(self, side: CastleSide, color: Color) -> bool {
        self.0 & Self::flag(side, color) != 0
    }

    #[inline]
    pub fn remove(&mut self, side: CastleSide, color: Color) {
        self.0 &= !Self::flag(side, color);
    }

    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(CastleSide::Kingside, color);
        self.remove(CastleSide::Queenside, color);
    }

    /// Clears the right tied to a rook home square, if `sq` is one.
    ///
    /// Called for both the origin and the destination of every move, which
    /// covers a rook leaving home and a rook being captured at home.
    pub fn remove_for_square(&mut self, sq: Square) {
        for color in Color::BOTH {
            for side in [CastleSide::Kingside, CastleSide::Queenside] {
                if side.rook_from(color) == sq {
                    self.remove(side, color);
                }
            }
        }
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    fn from_fen_field(field: &str) -> Self {
        let mut flags = 0u8;
        for c in field.chars() {
            flags |= match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => 0,
            };
        }
        CastlingRights::new(flags)
    }

    fn to_fen_field(self) -> String {
        if self.0 == 0 {
            return "-".to_string();
        }
        [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ]
        .iter()
        .filter(|(flag, _)| self.0 & flag != 0)
        .map(|(_, c)| *c)
        .collect()
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen_field())
    }
}

/// Complete game state on a mailbox board.
///
/// Besides the FEN fields the position carries the notation of every
/// committed move, the FEN it started from, and how often each
/// fingerprint has occurred. The history map is ordered so that any walk
/// over it is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<(Piece, Color)>; 64],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) moves_played: Vec<String>,
    start_fen: String,
    pub(crate) committed: Vec<Move>,
    pub(crate) history: BTreeMap<u64, u32>,
}

impl Position {
    /// The standard starting position with its fingerprint recorded once.
    pub fn startpos() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Loads a position from FEN.
    ///
    /// The loaded position has no move history and its own fingerprint
    /// recorded once.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position {
            board: parsed.placement,
            side_to_move: parsed.side_to_move,
            castling: CastlingRights::from_fen_field(&parsed.castling),
            en_passant: parsed.en_passant,
            halfmove_clock: parsed.halfmove_clock,
            fullmove_number: parsed.fullmove_number,
            moves_played: Vec::new(),
            start_fen: String::new(),
            committed: Vec::new(),
            history: BTreeMap::new(),
        };
        position.start_fen = position.to_fen();
        position.record_position();
        Ok(position)
    }

    pub fn to_fen(&self) -> String {
        FenParser {
            placement: self.board,
            side_to_move: self.side_to_move,
            castling: self.castling.to_fen_field(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_fen()
    }

    /// Returns the piece and color at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board[sq.index() as usize]
    }

    /// Same as [`piece_at`](Self::piece_at) with zero-based rank and file
    /// indices; off-board coordinates read as empty.
    pub fn piece_on(&self, rank: u8, file: u8) -> Option<(Piece, Color)> {
        Square::from_coords(rank as i8, file as i8).and_then(|sq| self.piece_at(sq))
    }

    /// Every occupied square with its occupant, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece, Color)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|(p, c)| (sq, p, c)))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| self.piece_at(sq) == Some((Piece::King, color)))
    }

    #[inline]
    pub(crate) fn put(&mut self, sq: Square, occupant: Option<(Piece, Color)>) {
        self.board[sq.index() as usize] = occupant;
    }

    #[inline]
    pub(crate) fn take(&mut self, sq: Square) -> Option<(Piece, Color)> {
        self.board[sq.index() as usize].take()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Notation of every committed move, oldest first.
    pub fn moves_played(&self) -> &[String] {
        &self.moves_played
    }

    /// The normalized FEN this game started from.
    pub fn start_fen(&self) -> &str {
        &self.start_fen
    }

    /// Occurrence count per fingerprint.
    pub fn history(&self) -> &BTreeMap<u64, u32> {
        &self.history
    }

    /// Hash of placement, side to move, castling rights and en-passant target.
    pub fn fingerprint(&self) -> u64 {
        ZOBRIST.hash(&self.board, self.side_to_move, self.castling, self.en_passant)
    }

    /// Counts one more occurrence of the current fingerprint and returns it.
    pub fn record_position(&mut self) -> u64 {
        let fp = self.fingerprint();
        *self.history.entry(fp).or_insert(0) += 1;
        fp
    }

    /// Drops one occurrence of `fp`, removing the entry when it reaches zero.
    pub(crate) fn forget_position(&mut self, fp: u64) {
        if let Some(count) = self.history.get_mut(&fp) {
            *count -= 1;
            if *count == 0 {
                self.history.remove(&fp);
            }
        }
    }

    /// How often the current position has occurred in this game.
    pub fn position_count(&self) -> u32 {
        self.history.get(&self.fingerprint()).copied().unwrap_or(0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = match self.piece_on(rank, file) {
                    Some((piece, color)) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "\n   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn startpos_fields() {
        let pos = Position::startpos();
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.castling(), CastlingRights::ALL);
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);
        assert!(pos.moves_played().is_empty());
        assert_eq!(pos.position_count(), 1);
        assert_eq!(pos.history().len(), 1);
    }

    #[test]
    fn fen_roundtrip_keeps_every_field() {
        for fen in [
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w Kq - 7 19",
        ] {
            let pos = Position::from_fen(fen).unwrap();
            assert_eq!(pos.to_fen(), fen);
            let again = Position::from_fen(&pos.to_fen()).unwrap();
            assert_eq!(again, pos);
        }
    }

    #[test]
    fn malformed_records_are_rejected() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNZ w KQkq - 0 1",
            "8/8/8/8/8/8/8/8 w - - 0 1",
            "8/8/8/3Pk3/8/8/8/4K3 w - e6 0 1",
            "4k3/8/8/3PN3/8/8/8/4K3 w - e6 0 1",
        ] {
            assert!(matches!(
                Position::from_fen(fen),
                Err(ChessError::MalformedRecord(_))
            ));
        }
    }

    #[test]
    fn piece_lookup() {
        let pos = Position::startpos();
        assert_eq!(pos.piece_at(Square::E1), Some((Piece::King, Color::White)));
        assert_eq!(pos.piece_at(Square::E8), Some((Piece::King, Color::Black)));
        assert_eq!(pos.piece_at(sq("e4")), None);
        assert_eq!(pos.piece_on(0, 3), Some((Piece::Queen, Color::White)));
        assert_eq!(pos.piece_on(6, 0), Some((Piece::Pawn, Color::Black)));
        assert_eq!(pos.piece_on(8, 0), None);
        assert_eq!(pos.pieces().count(), 32);
        assert_eq!(pos.king_square(Color::Black), Some(Square::E8));
    }

    #[test]
    fn castling_rights_flags() {
        let mut rights = CastlingRights::ALL;
        rights.remove(CastleSide::Kingside, Color::White);
        assert!(!rights.has(CastleSide::Kingside, Color::White));
        assert!(rights.has(CastleSide::Queenside, Color::White));

        rights.remove_for_square(Square::A8);
        assert!(!rights.has(CastleSide::Queenside, Color::Black));
        assert!(rights.has(CastleSide::Kingside, Color::Black));

        rights.remove_for_square(sq("e4"));
        rights.remove_color(Color::Black);
        assert_eq!(rights.raw(), CastlingRights::WHITE_QUEENSIDE);
        assert_eq!(rights.to_fen_field(), "Q");
        assert_eq!(CastlingRights::NONE.to_fen_field(), "-");
    }

    #[test]
    fn fingerprint_depends_on_state() {
        let a = Position::startpos();
        let b = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1").unwrap();
        let c = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kkq - 0 1").unwrap();
        assert_eq!(a.fingerprint(), a.fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());

        // Clocks are not part of the fingerprint.
        let d = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 5 9").unwrap();
        assert_eq!(a.fingerprint(), d.fingerprint());
    }

    #[test]
    fn recording_counts_current_position() {
        let mut pos = Position::startpos();
        let fp = pos.record_position();
        assert_eq!(fp, pos.fingerprint());
        assert_eq!(pos.position_count(), 2);
        pos.forget_position(fp);
        pos.forget_position(fp);
        assert_eq!(pos.position_count(), 0);
        assert!(pos.history().is_empty());
    }

    #[test]
    fn display_draws_the_board() {
        let text = Position::startpos().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines.last().copied(), Some("   a b c d e f g h"));
    }
}
