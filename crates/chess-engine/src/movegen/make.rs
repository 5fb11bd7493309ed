//! Reversible move application.

use std::ops::{Deref, DerefMut};

use chess_core::{Color, Move, Piece, Square};

use crate::position::CastlingRights;
use crate::Position;

/// State needed to take a move back.
///
/// Produced by [`Position::make_move`] and consumed by
/// [`Position::undo_move`]. Pairs must nest like a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    captured: Option<(Piece, Color, Square)>,
    side_to_move: Color,
    en_passant: Option<Square>,
    castling: CastlingRights,
    halfmove_clock: u32,
    fullmove_number: u32,
    /// Fingerprint whose count was bumped by the move, if it was recorded.
    recorded: Option<u64>,
}

impl Undo {
    /// The piece removed by the move and the square it stood on.
    pub fn captured(&self) -> Option<(Piece, Color, Square)> {
        self.captured
    }
}

impl Position {
    /// Applies `m` in place and records the resulting fingerprint.
    ///
    /// The move is assumed to be at least pseudo-legal for the side to move.
    pub fn make_move(&mut self, m: Move) -> Undo {
        self.apply_raw(m, true)
    }

    /// Reverts a move made by [`make_move`](Self::make_move), restoring the
    /// board, every state field, and the repetition history exactly.
    pub fn undo_move(&mut self, m: Move, undo: Undo) {
        if let Some(fp) = undo.recorded {
            self.forget_position(fp);
        }

        self.side_to_move = undo.side_to_move;
        self.en_passant = undo.en_passant;
        self.castling = undo.castling;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        let us = undo.side_to_move;
        self.put(m.to(), None);
        self.put(m.from(), Some((m.piece(), us)));

        if let Some(side) = m.castle_side() {
            self.put(side.rook_to(us), None);
            self.put(side.rook_from(us), Some((Piece::Rook, us)));
        }

        if let Some((piece, color, sq)) = undo.captured {
            self.put(sq, Some((piece, color)));
        }
    }

    /// Plays `m` for the lifetime of the returned guard.
    ///
    /// The guard derefs to the position; dropping it undoes the move, so
    /// early returns cannot leave the board modified.
    pub fn play(&mut self, m: Move) -> MoveGuard<'_> {
        let undo = self.make_move(m);
        MoveGuard {
            position: self,
            mv: m,
            undo,
        }
    }

    /// Like [`play`](Self::play) but leaves the repetition history alone.
    /// Used for legality and check probes that never look at repetitions.
    pub(crate) fn play_unrecorded(&mut self, m: Move) -> MoveGuard<'_> {
        let undo = self.apply_raw(m, false);
        MoveGuard {
            position: self,
            mv: m,
            undo,
        }
    }

    fn apply_raw(&mut self, m: Move, record: bool) -> Undo {
        let us = self.side_to_move;
        let from = m.from();
        let to = m.to();

        let victim_square = if m.is_en_passant() {
            Square::from_coords(from.rank().index() as i8, to.file().index() as i8).unwrap_or(to)
        } else {
            to
        };

        let mut undo = Undo {
            captured: self
                .piece_at(victim_square)
                .map(|(piece, color)| (piece, color, victim_square)),
            side_to_move: us,
            en_passant: self.en_passant,
            castling: self.castling,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            recorded: None,
        };

        self.en_passant = None;

        self.take(victim_square);
        self.take(from);
        self.put(to, Some((m.promotion().unwrap_or(m.piece()), us)));

        if let Some(side) = m.castle_side() {
            let rook = self.take(side.rook_from(us));
            self.put(side.rook_to(us), rook);
        }

        if m.piece() == Piece::Pawn && from.rank().index().abs_diff(to.rank().index()) == 2 {
            self.en_passant = from.offset(us.pawn_direction(), 0);
        }

        if m.piece() == Piece::King {
            self.castling.remove_color(us);
        }
        self.castling.remove_for_square(from);
        self.castling.remove_for_square(to);

        if m.piece() == Piece::Pawn || undo.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = us.opposite();

        if record {
            undo.recorded = Some(self.record_position());
        }
        undo
    }
}

/// A move held on the board until the guard is dropped.
pub struct MoveGuard<'a> {
    position: &'a mut Position,
    mv: Move,
    undo: Undo,
}

impl MoveGuard<'_> {
    /// The move this guard holds.
    pub fn mv(&self) -> Move {
        self.mv
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.position.undo_move(self.mv, self.undo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::CastleSide;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn make_undo_restores_every_legal_move() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        ] {
            let mut pos = Position::from_fen(fen).unwrap();
            let before = pos.clone();
            for m in pos.legal_moves().iter().copied().collect::<Vec<_>>() {
                let undo = pos.make_move(m);
                assert_ne!(pos, before);
                pos.undo_move(m, undo);
                assert_eq!(pos, before, "undo of {} in {}", m, fen);
            }
        }
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let mut pos = Position::startpos();
        pos.make_move(Move::new(sq("e2"), sq("e4"), Piece::Pawn));
        assert_eq!(pos.en_passant(), Some(sq("e3")));
        assert_eq!(pos.side_to_move(), Color::Black);
        pos.make_move(Move::new(sq("g8"), sq("f6"), Piece::Knight));
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.fullmove_number(), 2);
        assert_eq!(pos.halfmove_clock(), 1);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
        let undo = pos.make_move(Move::en_passant(sq("e5"), sq("f6")));
        assert_eq!(pos.piece_at(sq("f6")), Some((Piece::Pawn, Color::White)));
        assert_eq!(pos.piece_at(sq("f5")), None);
        assert_eq!(undo.captured(), Some((Piece::Pawn, Color::Black, sq("f5"))));
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").unwrap();
        pos.make_move(Move::castle(CastleSide::Queenside, Color::Black));
        assert_eq!(pos.piece_at(Square::C8), Some((Piece::King, Color::Black)));
        assert_eq!(pos.piece_at(Square::D8), Some((Piece::Rook, Color::Black)));
        assert_eq!(pos.piece_at(Square::A8), None);
        assert!(!pos.castling().has(CastleSide::Kingside, Color::Black));
        assert!(pos.castling().has(CastleSide::Kingside, Color::White));
    }

    #[test]
    fn capturing_a_home_rook_clears_its_right() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        pos.make_move(Move::capture(Square::A1, Square::A8, Piece::Rook));
        assert!(!pos.castling().has(CastleSide::Queenside, Color::White));
        assert!(!pos.castling().has(CastleSide::Queenside, Color::Black));
        assert!(pos.castling().has(CastleSide::Kingside, Color::Black));
    }

    #[test]
    fn promotion_replaces_the_pawn() {
        let mut pos = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let m = Move::new(sq("a7"), Square::A8, Piece::Pawn).with_promotion(Piece::Knight);
        let undo = pos.make_move(m);
        assert_eq!(pos.piece_at(Square::A8), Some((Piece::Knight, Color::White)));
        pos.undo_move(m, undo);
        assert_eq!(pos.piece_at(sq("a7")), Some((Piece::Pawn, Color::White)));
        assert_eq!(pos.piece_at(Square::A8), None);
    }

    #[test]
    fn make_move_records_and_undo_forgets() {
        let mut pos = Position::startpos();
        let m = Move::new(Square::G1, sq("f3"), Piece::Knight);
        let undo = pos.make_move(m);
        assert_eq!(pos.position_count(), 1);
        assert_eq!(pos.history().len(), 2);
        pos.undo_move(m, undo);
        assert_eq!(pos.history().len(), 1);
        assert_eq!(pos.position_count(), 1);
    }

    #[test]
    fn guard_undoes_on_drop() {
        let mut pos = Position::startpos();
        let before = pos.clone();
        {
            let mut first = pos.play(Move::new(sq("e2"), sq("e4"), Piece::Pawn));
            assert_eq!(first.side_to_move(), Color::Black);
            let second = first.play(Move::new(sq("e7"), sq("e5"), Piece::Pawn));
            assert_eq!(second.piece_at(sq("e5")), Some((Piece::Pawn, Color::Black)));
            assert_eq!(second.mv().to_coordinate(), "e7e5");
        }
        assert_eq!(pos, before);
    }
}
