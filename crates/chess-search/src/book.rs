//! A tiny opening book.
//!
//! Entries are keyed by the exact SAN history played from the standard
//! start, so the ply and the side to move follow from the key.

use chess_core::{Color, FenParser, Move, Piece, Square};
use chess_engine::Position;

/// The book is ignored once this many plies have been played.
pub const MAX_BOOK_PLY: usize = 6;

struct BookEntry {
    history: &'static [&'static str],
    reply: &'static str,
    /// The reply is only played if this piece of the mover stands here.
    requires: Option<(Square, Piece)>,
}

const BOOK: &[BookEntry] = &[
    BookEntry {
        history: &[],
        reply: "e2e4",
        requires: None,
    },
    BookEntry {
        history: &["e4"],
        reply: "e7e5",
        requires: None,
    },
    BookEntry {
        history: &["d4"],
        reply: "d7d5",
        requires: None,
    },
    BookEntry {
        history: &["e4", "e5"],
        reply: "g1f3",
        requires: Some((Square::G1, Piece::Knight)),
    },
];

/// The book reply for this position, if there is one and it is legal.
pub fn book_move(position: &mut Position) -> Option<Move> {
    let played = position.moves_played();
    if played.len() > MAX_BOOK_PLY || position.start_fen() != FenParser::STARTPOS {
        return None;
    }

    let us: Color = position.side_to_move();
    let entry = BOOK
        .iter()
        .find(|entry| played.iter().map(String::as_str).eq(entry.history.iter().copied()))?;

    if let Some((sq, piece)) = entry.requires {
        if position.piece_at(sq) != Some((piece, us)) {
            return None;
        }
    }

    let m = position.parse_move(entry.reply).ok()?;
    tracing::trace!("book move {} after {:?}", entry.reply, entry.history);
    Some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn after(moves: &[&str]) -> Position {
        let mut pos = Position::startpos();
        for m in moves {
            pos.apply_move(m).unwrap();
        }
        pos
    }

    fn reply(moves: &[&str]) -> Option<String> {
        book_move(&mut after(moves)).map(|m| m.to_coordinate())
    }

    #[test]
    fn book_lines() {
        assert_eq!(reply(&[]).as_deref(), Some("e2e4"));
        assert_eq!(reply(&["e4"]).as_deref(), Some("e7e5"));
        assert_eq!(reply(&["d4"]).as_deref(), Some("d7d5"));
        assert_eq!(reply(&["e4", "e5"]).as_deref(), Some("g1f3"));
    }

    #[test]
    fn unknown_lines_fall_through() {
        assert_eq!(reply(&["c4"]), None);
        assert_eq!(reply(&["e4", "c5"]), None);
        assert_eq!(reply(&["e4", "e5", "Nf3"]), None);
    }

    #[test]
    fn only_from_the_standard_start() {
        let mut pos =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 2").unwrap();
        assert_eq!(book_move(&mut pos), None);
    }
}
