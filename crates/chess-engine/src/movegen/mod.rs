//! Move generation.
//!
//! Pseudo-legal moves are generated per piece kind on the mailbox board.
//! Legality is decided afterwards by playing each candidate and testing
//! whether the mover's king is attacked, so pins and discovered checks
//! need no special handling.

mod list;
mod make;
pub mod perft;

pub use list::MoveList;
pub use make::{MoveGuard, Undo};

use crate::{IllegalMoveReason, Position};
use chess_core::{CastleSide, Color, Move, Piece, Square};

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const CASTLE_SIDES: [CastleSide; 2] = [CastleSide::Kingside, CastleSide::Queenside];

impl Position {
    /// Pseudo-legal moves for the side to move.
    pub fn pseudo_legal_moves(&self) -> MoveList {
        self.pseudo_legal_moves_for(self.side_to_move)
    }

    /// Pseudo-legal moves `color` would have if it were to move. En passant
    /// is only available to the side to move.
    pub fn pseudo_legal_moves_for(&self, side: Color) -> MoveList {
        let mut moves = MoveList::new();
        for (from, piece, color) in self.pieces() {
            if color == side {
                self.piece_moves(from, piece, side, &mut moves);
            }
        }
        moves
    }

    /// Pseudo-legal moves of the piece standing on `from`, if it belongs to
    /// the side to move.
    pub fn pseudo_legal_moves_from(&self, from: Square) -> MoveList {
        let mut moves = MoveList::new();
        if let Some((piece, color)) = self.piece_at(from) {
            if color == self.side_to_move {
                self.piece_moves(from, piece, color, &mut moves);
            }
        }
        moves
    }

    fn piece_moves(&self, from: Square, piece: Piece, color: Color, moves: &mut MoveList) {
        match piece {
            Piece::Pawn => self.pawn_moves(from, color, moves),
            Piece::Knight => self.step_moves(from, Piece::Knight, color, &KNIGHT_OFFSETS, moves),
            Piece::Bishop => self.slide_moves(from, Piece::Bishop, color, &BISHOP_DIRECTIONS, moves),
            Piece::Rook => self.slide_moves(from, Piece::Rook, color, &ROOK_DIRECTIONS, moves),
            Piece::Queen => {
                self.slide_moves(from, Piece::Queen, color, &ROOK_DIRECTIONS, moves);
                self.slide_moves(from, Piece::Queen, color, &BISHOP_DIRECTIONS, moves);
            }
            Piece::King => {
                self.step_moves(from, Piece::King, color, &KING_OFFSETS, moves);
                self.castling_moves(from, color, moves);
            }
        }
    }

    fn pawn_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        let dir = color.pawn_direction();

        if let Some(one) = from.offset(dir, 0) {
            if self.piece_at(one).is_none() {
                push_pawn_move(Move::new(from, one, Piece::Pawn), color, moves);
                if from.rank().index() == color.pawn_rank() {
                    if let Some(two) = from.offset(2 * dir, 0) {
                        if self.piece_at(two).is_none() {
                            moves.push(Move::new(from, two, Piece::Pawn));
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(target) = from.offset(dir, df) else {
                continue;
            };
            match self.piece_at(target) {
                Some((_, occupant)) if occupant != color => {
                    push_pawn_move(Move::capture(from, target, Piece::Pawn), color, moves);
                }
                None if self.en_passant == Some(target) && color == self.side_to_move => {
                    let victim = from.offset(0, df);
                    if victim.and_then(|sq| self.piece_at(sq)) == Some((Piece::Pawn, color.opposite())) {
                        moves.push(Move::en_passant(from, target));
                    }
                }
                _ => {}
            }
        }
    }

    fn step_moves(
        &self,
        from: Square,
        piece: Piece,
        color: Color,
        offsets: &[(i8, i8)],
        moves: &mut MoveList,
    ) {
        for &(dr, df) in offsets {
            let Some(to) = from.offset(dr, df) else {
                continue;
            };
            match self.piece_at(to) {
                None => moves.push(Move::new(from, to, piece)),
                Some((_, occupant)) if occupant != color => {
                    moves.push(Move::capture(from, to, piece))
                }
                Some(_) => {}
            }
        }
    }

    fn slide_moves(
        &self,
        from: Square,
        piece: Piece,
        color: Color,
        directions: &[(i8, i8)],
        moves: &mut MoveList,
    ) {
        for &(dr, df) in directions {
            let mut current = from;
            while let Some(to) = current.offset(dr, df) {
                match self.piece_at(to) {
                    None => moves.push(Move::new(from, to, piece)),
                    Some((_, occupant)) => {
                        if occupant != color {
                            moves.push(Move::capture(from, to, piece));
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }

    fn castling_moves(&self, from: Square, color: Color, moves: &mut MoveList) {
        if from != CastleSide::Kingside.king_from(color) {
            return;
        }
        for side in CASTLE_SIDES {
            if self.castle_obstacle(side, color).is_none() {
                moves.push(Move::castle(side, color));
            }
        }
    }

    /// Why `color` may not castle to `side` right now, or `None` if it may.
    ///
    /// Checks rights, that king and rook stand at home, that the squares
    /// between them are empty, that the king is not in check, and that no
    /// square the king crosses or lands on is attacked.
    pub fn castle_obstacle(&self, side: CastleSide, color: Color) -> Option<IllegalMoveReason> {
        let king_from = side.king_from(color);
        let rook_from = side.rook_from(color);

        if !self.castling.has(side, color)
            || self.piece_at(king_from) != Some((Piece::King, color))
            || self.piece_at(rook_from) != Some((Piece::Rook, color))
        {
            return Some(IllegalMoveReason::MissingCastlingRights);
        }

        let rank = color.back_rank() as i8;
        let (lo, hi) = match side {
            CastleSide::Kingside => (5, 6),
            CastleSide::Queenside => (1, 3),
        };
        let path_clear = (lo..=hi).all(|file| {
            Square::from_coords(rank, file).map_or(false, |sq| self.piece_at(sq).is_none())
        });
        if !path_clear {
            return Some(IllegalMoveReason::CastlingPathBlocked);
        }

        let them = color.opposite();
        if self.is_square_attacked(king_from, them) {
            return Some(IllegalMoveReason::CastlingWhileInCheck);
        }

        let king_to = side.king_to(color);
        let step: i8 = if king_to.index() > king_from.index() { 1 } else { -1 };
        let mut transit = king_from;
        while transit != king_to {
            match transit.offset(0, step) {
                Some(next) => transit = next,
                None => break,
            }
            if self.is_square_attacked(transit, them) {
                return Some(IllegalMoveReason::CastlingThroughAttack);
            }
        }

        None
    }

    /// Returns true if any piece of `by` attacks `sq`.
    ///
    /// Pawns attack diagonally whether or not the target is occupied.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        // A pawn of `by` attacks sq from one rank behind it, seen from `by`.
        let back = -by.pawn_direction();
        for df in [-1, 1] {
            if let Some(from) = sq.offset(back, df) {
                if self.piece_at(from) == Some((Piece::Pawn, by)) {
                    return true;
                }
            }
        }

        let hits = |offsets: &[(i8, i8)], piece: Piece| {
            offsets.iter().any(|&(dr, df)| {
                sq.offset(dr, df)
                    .map_or(false, |from| self.piece_at(from) == Some((piece, by)))
            })
        };
        if hits(&KNIGHT_OFFSETS, Piece::Knight) || hits(&KING_OFFSETS, Piece::King) {
            return true;
        }

        self.ray_hits(sq, by, &ROOK_DIRECTIONS, Piece::Rook)
            || self.ray_hits(sq, by, &BISHOP_DIRECTIONS, Piece::Bishop)
    }

    fn ray_hits(&self, sq: Square, by: Color, directions: &[(i8, i8)], slider: Piece) -> bool {
        for &(dr, df) in directions {
            let mut current = sq;
            while let Some(next) = current.offset(dr, df) {
                if let Some((piece, color)) = self.piece_at(next) {
                    if color == by && (piece == slider || piece == Piece::Queen) {
                        return true;
                    }
                    break;
                }
                current = next;
            }
        }
        false
    }

    /// Returns true if `color`'s king is attacked.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .map_or(false, |sq| self.is_square_attacked(sq, color.opposite()))
    }

    /// Returns true if playing `m` would leave the mover's own king attacked.
    pub fn leaves_king_in_check(&mut self, m: Move) -> bool {
        let us = self.side_to_move;
        let after = self.play_unrecorded(m);
        after.is_in_check(us)
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&mut self) -> MoveList {
        let mut moves = self.pseudo_legal_moves();
        moves.retain(|&m| !self.leaves_king_in_check(m));
        moves
    }

    /// Returns true if the side to move has at least one legal move.
    pub fn has_legal_move(&mut self) -> bool {
        let moves = self.pseudo_legal_moves();
        moves.iter().any(|&m| !self.leaves_king_in_check(m))
    }

    /// Returns true if `m` gives check to the opponent.
    pub fn gives_check(&mut self, m: Move) -> bool {
        let them = self.side_to_move.opposite();
        let after = self.play_unrecorded(m);
        after.is_in_check(them)
    }
}

fn push_pawn_move(m: Move, color: Color, moves: &mut MoveList) {
    if m.to().rank().index() == color.promotion_rank() {
        for piece in Piece::PROMOTIONS {
            moves.push(m.with_promotion(piece));
        }
    } else {
        moves.push(m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn coords(moves: &MoveList) -> Vec<String> {
        let mut out: Vec<String> = moves.iter().map(|m| m.to_coordinate()).collect();
        out.sort();
        out
    }

    #[test]
    fn twenty_moves_from_startpos() {
        let mut pos = Position::startpos();
        assert_eq!(pos.legal_moves().len(), 20);
        assert_eq!(pos.pseudo_legal_moves().len(), 20);
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let pos = Position::from_fen("4k3/8/8/8/1p1R2P1/8/8/4K3 w - - 0 1").unwrap();
        let rook = pos.pseudo_legal_moves_from(sq("d4"));
        let targets = coords(&rook);
        assert!(targets.contains(&"d4b4".to_string()));
        assert!(!targets.contains(&"d4a4".to_string()));
        assert!(targets.contains(&"d4f4".to_string()));
        assert!(!targets.contains(&"d4g4".to_string()));
        assert!(targets.contains(&"d4d8".to_string()));
        assert_eq!(rook.len(), 11);
        assert!(rook.iter().find(|m| m.to() == sq("b4")).unwrap().is_capture());
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let pos = Position::startpos();
        assert_eq!(coords(&pos.pseudo_legal_moves_from(Square::G1)), vec!["g1f3", "g1h3"]);
        // Opponent pieces are not generated for the side to move.
        assert!(pos.pseudo_legal_moves_from(Square::G8).is_empty());
    }

    #[test]
    fn attack_detection() {
        let pos = Position::startpos();
        assert!(pos.is_square_attacked(sq("e3"), Color::White));
        assert!(pos.is_square_attacked(sq("f3"), Color::White));
        assert!(!pos.is_square_attacked(sq("e4"), Color::White));
        assert!(pos.is_square_attacked(sq("e6"), Color::Black));
        assert!(!pos.is_in_check(Color::White));

        // Pawns attack diagonally only, even into empty squares.
        let pos = Position::from_fen("4k3/8/8/8/4p3/8/8/4K3 w - - 0 1").unwrap();
        assert!(pos.is_square_attacked(sq("d3"), Color::Black));
        assert!(pos.is_square_attacked(sq("f3"), Color::Black));
        assert!(!pos.is_square_attacked(sq("e3"), Color::Black));
    }

    #[test]
    fn pinned_piece_cannot_move() {
        // The e2 knight is pinned by the e8 rook.
        let mut pos = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(pos.legal_moves().iter().all(|m| m.from() != sq("e2")));
        assert!(pos.leaves_king_in_check(Move::new(sq("e2"), sq("c3"), Piece::Knight)));
    }

    #[test]
    fn castling_generated_when_allowed() {
        let mut pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let legal = pos.legal_moves();
        assert!(legal.contains(&Move::castle(CastleSide::Kingside, Color::White)));
        assert!(legal.contains(&Move::castle(CastleSide::Queenside, Color::White)));
    }

    #[test]
    fn castle_obstacles_are_reported() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Qk - 0 1").unwrap();
        assert_eq!(
            pos.castle_obstacle(CastleSide::Kingside, Color::White),
            Some(IllegalMoveReason::MissingCastlingRights)
        );
        assert_eq!(pos.castle_obstacle(CastleSide::Queenside, Color::White), None);

        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq - 0 1").unwrap();
        assert_eq!(
            pos.castle_obstacle(CastleSide::Queenside, Color::White),
            Some(IllegalMoveReason::CastlingPathBlocked)
        );

        // f8 rook attacks f1: kingside transit is attacked, queenside is fine.
        let pos = Position::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(
            pos.castle_obstacle(CastleSide::Kingside, Color::White),
            Some(IllegalMoveReason::CastlingThroughAttack)
        );
        assert_eq!(pos.castle_obstacle(CastleSide::Queenside, Color::White), None);

        let pos = Position::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(
            pos.castle_obstacle(CastleSide::Kingside, Color::White),
            Some(IllegalMoveReason::CastlingWhileInCheck)
        );
    }

    #[test]
    fn queenside_castle_ignores_attack_on_b_file() {
        // b1 is attacked but the king never crosses it.
        let pos = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        assert_eq!(pos.castle_obstacle(CastleSide::Queenside, Color::White), None);
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let mut pos =
            Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
        let legal = pos.legal_moves();
        let ep = legal.iter().find(|m| m.is_en_passant()).copied();
        assert_eq!(ep.map(|m| m.to_coordinate()), Some("e5f6".to_string()));
    }

    #[test]
    fn en_passant_needs_an_enemy_pawn_to_take() {
        for (fen, holder) in [
            ("8/8/8/3Pk3/8/8/8/4K3 w - - 0 1", (Piece::King, Color::Black)),
            ("4k3/8/8/3PN3/8/8/8/4K3 w - - 0 1", (Piece::Knight, Color::White)),
        ] {
            let mut pos = Position::from_fen(fen).unwrap();
            pos.en_passant = Square::from_algebraic("e6");
            assert!(pos.legal_moves().iter().all(|m| !m.is_en_passant()), "{}", fen);
            assert_eq!(pos.piece_at(Square::from_algebraic("e5").unwrap()), Some(holder));
        }
    }

    #[test]
    fn promotions_offer_four_pieces() {
        let mut pos = Position::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let promos: Vec<String> = pos
            .legal_moves()
            .iter()
            .filter(|m| m.promotion().is_some())
            .map(|m| m.to_coordinate())
            .collect();
        assert_eq!(promos, vec!["a7a8q", "a7a8r", "a7a8b", "a7a8n"]);
    }

    #[test]
    fn gives_check_probe() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        assert!(pos.gives_check(Move::new(Square::A1, Square::A8, Piece::Rook)));
        assert!(!pos.gives_check(Move::new(Square::A1, sq("a7"), Piece::Rook)));
        assert!(pos.has_legal_move());
    }
}
