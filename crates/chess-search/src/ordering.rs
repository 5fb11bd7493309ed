//! Move ordering for alpha-beta.
//!
//! Buckets, best first: the move the previous iteration preferred, captures
//! that win or trade up, quiet checks, other captures, everything else.
//! Within a bucket generation order is kept.

use chess_core::{Move, Piece};
use chess_engine::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Bucket {
    Principal,
    WinningCapture,
    Check,
    Capture,
    Quiet,
}

/// Coarse piece worth for capture ordering. The king outranks everything.
fn ordering_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight | Piece::Bishop => 3,
        Piece::Rook => 5,
        Piece::Queen => 9,
        Piece::King => 100,
    }
}

fn bucket(position: &mut Position, m: Move, principal: Option<Move>) -> Bucket {
    if principal == Some(m) {
        return Bucket::Principal;
    }
    if m.is_capture() {
        let victim = if m.is_en_passant() {
            Piece::Pawn
        } else {
            position.piece_at(m.to()).map_or(Piece::Pawn, |(piece, _)| piece)
        };
        return if ordering_value(victim) >= ordering_value(m.piece()) {
            Bucket::WinningCapture
        } else {
            Bucket::Capture
        };
    }
    if position.gives_check(m) {
        Bucket::Check
    } else {
        Bucket::Quiet
    }
}

/// Reorders `moves` in place. The sort is stable.
pub fn order_moves(position: &mut Position, moves: &mut [Move], principal: Option<Move>) {
    let mut keyed: Vec<(Bucket, Move)> = moves
        .iter()
        .map(|&m| (bucket(position, m, principal), m))
        .collect();
    keyed.sort_by_key(|&(bucket, _)| bucket);
    for (slot, (_, m)) in moves.iter_mut().zip(keyed) {
        *slot = m;
    }
}
