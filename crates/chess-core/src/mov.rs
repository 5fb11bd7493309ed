//! Move representation.

use crate::{Color, Piece, Square};
use std::fmt;

/// Which wing a castling move goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    #[inline]
    pub const fn king_from(self, color: Color) -> Square {
        match color {
            Color::White => Square::E1,
            Color::Black => Square::E8,
        }
    }

    #[inline]
    pub const fn king_to(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::Kingside, Color::White) => Square::G1,
            (CastleSide::Queenside, Color::White) => Square::C1,
            (CastleSide::Kingside, Color::Black) => Square::G8,
            (CastleSide::Queenside, Color::Black) => Square::C8,
        }
    }

    #[inline]
    pub const fn rook_from(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::Kingside, Color::White) => Square::H1,
            (CastleSide::Queenside, Color::White) => Square::A1,
            (CastleSide::Kingside, Color::Black) => Square::H8,
            (CastleSide::Queenside, Color::Black) => Square::A8,
        }
    }

    #[inline]
    pub const fn rook_to(self, color: Color) -> Square {
        match (self, color) {
            (CastleSide::Kingside, Color::White) => Square::F1,
            (CastleSide::Queenside, Color::White) => Square::D1,
            (CastleSide::Kingside, Color::Black) => Square::F8,
            (CastleSide::Queenside, Color::Black) => Square::D8,
        }
    }

    /// Algebraic notation for this castle.
    pub const fn san(self) -> &'static str {
        match self {
            CastleSide::Kingside => "O-O",
            CastleSide::Queenside => "O-O-O",
        }
    }
}

/// A chess move.
///
/// Carries everything needed to apply it without looking at the board
/// first: the moving piece kind, whether it captures, and the special
/// tags for promotion, castling and en passant. Moves are built by the
/// move generator or the notation parser and never change afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    capture: bool,
    promotion: Option<Piece>,
    castle: Option<CastleSide>,
    en_passant: bool,
}

impl Move {
    /// A placeholder that is never a legal move (a1a1).
    pub const NULL: Move = Move::new(Square::A1, Square::A1, Piece::Pawn);

    /// A plain move with no capture and no special tag.
    #[inline]
    pub const fn new(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            capture: false,
            promotion: None,
            castle: None,
            en_passant: false,
        }
    }

    /// A move that takes the piece standing on `to`.
    #[inline]
    pub const fn capture(from: Square, to: Square, piece: Piece) -> Self {
        let mut m = Self::new(from, to, piece);
        m.capture = true;
        m
    }

    /// A pawn capture onto the en-passant target.
    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        let mut m = Self::capture(from, to, Piece::Pawn);
        m.en_passant = true;
        m
    }

    /// The king move of a castle; the rook hop is implied.
    #[inline]
    pub const fn castle(side: CastleSide, color: Color) -> Self {
        let mut m = Self::new(side.king_from(color), side.king_to(color), Piece::King);
        m.castle = Some(side);
        m
    }

    /// Returns this move with a promotion piece attached.
    #[inline]
    pub const fn with_promotion(mut self, piece: Piece) -> Self {
        self.promotion = Some(piece);
        self
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// Kind of the moving piece (before any promotion).
    #[inline]
    pub const fn piece(self) -> Piece {
        self.piece
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.capture
    }

    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        self.promotion
    }

    #[inline]
    pub const fn castle_side(self) -> Option<CastleSide> {
        self.castle
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.en_passant
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.from.index() == self.to.index()
    }

    /// Coordinate notation: `e2e4`, `e7e8q`.
    pub fn to_coordinate(self) -> String {
        match self.promotion {
            Some(p) => format!("{}{}{}", self.from, self.to, p.lower_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// True when both moves name the same squares and promotion, ignoring
    /// the descriptive tags. Used to match user input against generated moves.
    #[inline]
    pub fn same_squares(self, other: Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}", self.to_coordinate())?;
        if self.capture {
            write!(f, " x")?;
        }
        if self.en_passant {
            write!(f, " ep")?;
        }
        if let Some(side) = self.castle {
            write!(f, " {}", side.san())?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_coordinate())
    }
}
