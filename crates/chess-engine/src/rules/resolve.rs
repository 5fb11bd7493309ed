//! Turning parsed notation into a legal move, with a precise reason when
//! that is impossible.

use chess_core::{CastleSide, Color, File, Move, Piece, Rank, Square};

use crate::notation::Notation;
use crate::{ChessError, IllegalMoveReason, Position};

impl Position {
    /// Resolves coordinate or algebraic notation to a legal move for the
    /// side to move. The position is left unchanged.
    ///
    /// A pawn reaching the last rank without a promotion letter promotes
    /// to a queen.
    ///
    /// # Errors
    ///
    /// - [`ChessError::InvalidNotation`] / [`ChessError::InvalidSquare`] for
    ///   unparseable input, or algebraic notation matching several moves.
    /// - [`ChessError::IllegalMove`] with the reason the move was rejected.
    pub fn parse_move(&mut self, text: &str) -> Result<Move, ChessError> {
        match Notation::parse(text)? {
            Notation::Castle(side) => self.resolve_castle(side, text),
            Notation::Coordinate {
                from,
                to,
                promotion,
            } => self.resolve_squares(from, to, promotion, text),
            Notation::San {
                piece,
                from_file,
                from_rank,
                to,
                capture,
                promotion,
            } => {
                let m = self.resolve_san(piece, from_file, from_rank, to, promotion, text)?;
                // A missing `x` is tolerated; a spurious one is not.
                if capture && !m.is_capture() {
                    return Err(ChessError::illegal(text, IllegalMoveReason::InvalidPattern));
                }
                Ok(m)
            }
        }
    }

    pub(crate) fn resolve_castle(&mut self, side: CastleSide, text: &str) -> Result<Move, ChessError> {
        let us = self.side_to_move;
        match self.castle_obstacle(side, us) {
            Some(reason) => Err(ChessError::illegal(text, reason)),
            None => Ok(Move::castle(side, us)),
        }
    }

    pub(crate) fn resolve_squares(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
        text: &str,
    ) -> Result<Move, ChessError> {
        let us = self.side_to_move;
        let (piece, color) = self
            .piece_at(from)
            .ok_or_else(|| ChessError::illegal(text, IllegalMoveReason::NoPiece))?;
        if color != us {
            return Err(ChessError::illegal(text, IllegalMoveReason::WrongSide));
        }

        // e1g1 and friends name a castle by its king squares.
        if piece == Piece::King && promotion.is_none() {
            for side in [CastleSide::Kingside, CastleSide::Queenside] {
                if from == side.king_from(us) && to == side.king_to(us) {
                    return self.resolve_castle(side, text);
                }
            }
        }

        let reaches_last_rank = piece == Piece::Pawn && to.rank().index() == us.promotion_rank();
        let promotion = match promotion {
            Some(p) if !reaches_last_rank || !p.is_promotion_target() => {
                return Err(ChessError::illegal(text, IllegalMoveReason::InvalidPromotion));
            }
            Some(p) => Some(p),
            None if reaches_last_rank => Some(Piece::Queen),
            None => None,
        };

        let candidate = self
            .pseudo_legal_moves_from(from)
            .iter()
            .copied()
            .find(|m| m.to() == to && m.promotion() == promotion && m.castle_side().is_none());

        match candidate {
            Some(m) => {
                self.ensure_king_safe(m, text)?;
                Ok(m)
            }
            None => Err(ChessError::illegal(text, self.diagnose(from, to, piece, us))),
        }
    }

    fn resolve_san(
        &mut self,
        piece: Piece,
        from_file: Option<File>,
        from_rank: Option<Rank>,
        to: Square,
        promotion: Option<Piece>,
        text: &str,
    ) -> Result<Move, ChessError> {
        let us = self.side_to_move;
        let reaches_last_rank = piece == Piece::Pawn && to.rank().index() == us.promotion_rank();
        let promotion = match promotion {
            Some(_) if !reaches_last_rank => {
                return Err(ChessError::illegal(text, IllegalMoveReason::InvalidPromotion));
            }
            Some(p) => Some(p),
            None if reaches_last_rank => Some(Piece::Queen),
            None => None,
        };

        // A pawn without an origin file moves straight ahead.
        let origin_file = match (piece, from_file) {
            (Piece::Pawn, None) => Some(to.file()),
            (_, file) => file,
        };
        let origin_matches = |sq: Square| {
            origin_file.map_or(true, |f| sq.file() == f) && from_rank.map_or(true, |r| sq.rank() == r)
        };

        let pseudo: Vec<Move> = self
            .pseudo_legal_moves()
            .iter()
            .copied()
            .filter(|m| {
                m.piece() == piece
                    && m.to() == to
                    && m.promotion() == promotion
                    && m.castle_side().is_none()
                    && origin_matches(m.from())
            })
            .collect();
        let legal: Vec<Move> = pseudo
            .iter()
            .copied()
            .filter(|&m| !self.leaves_king_in_check(m))
            .collect();

        match legal.as_slice() {
            [m] => Ok(*m),
            [] if !pseudo.is_empty() => {
                self.ensure_king_safe(pseudo[0], text)?;
                Err(ChessError::illegal(text, IllegalMoveReason::LeavesKingInCheck))
            }
            [] => {
                let reason = self
                    .pieces()
                    .filter(|&(sq, p, c)| p == piece && c == us && origin_matches(sq))
                    .map(|(sq, _, _)| self.diagnose(sq, to, piece, us))
                    .min_by_key(|reason| diagnosis_rank(*reason))
                    .unwrap_or(IllegalMoveReason::NoPiece);
                Err(ChessError::illegal(text, reason))
            }
            _ => Err(ChessError::InvalidNotation(format!("{} is ambiguous", text))),
        }
    }

    fn ensure_king_safe(&mut self, m: Move, text: &str) -> Result<(), ChessError> {
        if !self.leaves_king_in_check(m) {
            return Ok(());
        }
        let reason = if self.is_in_check(self.side_to_move) {
            IllegalMoveReason::UnresolvedCheck
        } else {
            IllegalMoveReason::LeavesKingInCheck
        };
        Err(ChessError::illegal(text, reason))
    }

    /// Explains why `piece` cannot go from `from` to `to` by its movement rules.
    fn diagnose(&self, from: Square, to: Square, piece: Piece, us: Color) -> IllegalMoveReason {
        if from == to {
            return IllegalMoveReason::InvalidPattern;
        }
        if matches!(self.piece_at(to), Some((_, color)) if color == us) {
            return IllegalMoveReason::OwnPieceOnTarget;
        }

        let dr = to.rank().index() as i8 - from.rank().index() as i8;
        let df = to.file().index() as i8 - from.file().index() as i8;

        let blocked_line = match piece {
            Piece::Pawn => {
                let dir = us.pawn_direction();
                df == 0 && (dr == dir || (dr == 2 * dir && from.rank().index() == us.pawn_rank()))
            }
            Piece::Knight | Piece::King => false,
            Piece::Bishop => dr.abs() == df.abs(),
            Piece::Rook => dr == 0 || df == 0,
            Piece::Queen => dr == 0 || df == 0 || dr.abs() == df.abs(),
        };

        if blocked_line {
            IllegalMoveReason::BlockedPath
        } else {
            IllegalMoveReason::InvalidPattern
        }
    }
}

/// Preference when several pieces could have been meant.
fn diagnosis_rank(reason: IllegalMoveReason) -> u8 {
    match reason {
        IllegalMoveReason::BlockedPath => 0,
        IllegalMoveReason::OwnPieceOnTarget => 1,
        _ => 2,
    }
}
