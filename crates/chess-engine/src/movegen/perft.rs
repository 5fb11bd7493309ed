//! Perft (performance test) for move generator validation.
//!
//! Perft counts leaf nodes of the legal move tree to a fixed depth. The
//! counts for the standard test positions are well known, so any mismatch
//! points at a generator or make/unmake bug.

use crate::Position;

/// Counts leaf nodes at `depth`, restoring the position afterwards.
pub fn perft(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &m in &moves {
        let mut child = position.play(m);
        nodes += perft(&mut child, depth - 1);
    }
    nodes
}

/// Node count per root move, sorted by coordinate notation.
pub fn perft_divide(position: &mut Position, depth: u32) -> Vec<(String, u64)> {
    let moves = position.legal_moves();
    let mut results = Vec::with_capacity(moves.len());

    for &m in &moves {
        let mut child = position.play(m);
        let nodes = perft(&mut child, depth.saturating_sub(1));
        results.push((m.to_coordinate(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
