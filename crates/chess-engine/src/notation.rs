//! Move notation: parsing user input and producing algebraic notation.
//!
//! Two input forms are accepted:
//! - coordinate notation, `e2e4` or `e7e8q` (lowercase promotion letter);
//! - standard algebraic notation (`e4`, `Nf3`, `Qxf7+`, `exd8=Q`, `Nbd7`,
//!   `R1e2`, `O-O`, `O-O-O`), with castling recognized case-insensitively.
//!
//! Parsing here is purely syntactic. Turning a [`Notation`] into a legal
//! [`Move`] needs the position and lives in [`crate::rules`].

use chess_core::{CastleSide, Color, File, Move, Piece, Rank, Square};

use crate::{ChessError, Position};

/// A syntactically valid move description, not yet checked against a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Coordinate {
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    },
    Castle(CastleSide),
    San {
        piece: Piece,
        from_file: Option<File>,
        from_rank: Option<Rank>,
        to: Square,
        capture: bool,
        promotion: Option<Piece>,
    },
}

impl Notation {
    /// Parses coordinate or algebraic notation.
    ///
    /// Trailing `+`, `#`, `!` and `?` marks are ignored. Square references
    /// outside a1..h8 yield [`ChessError::InvalidSquare`]; anything else that
    /// matches no pattern yields [`ChessError::InvalidNotation`].
    pub fn parse(text: &str) -> Result<Self, ChessError> {
        let invalid = || ChessError::InvalidNotation(text.to_string());

        let core = text
            .trim()
            .trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'));
        if core.is_empty() || !core.is_ascii() {
            return Err(invalid());
        }

        match core.to_ascii_lowercase().replace('0', "o").as_str() {
            "o-o" => return Ok(Notation::Castle(CastleSide::Kingside)),
            "o-o-o" => return Ok(Notation::Castle(CastleSide::Queenside)),
            _ => {}
        }

        let bytes = core.as_bytes();
        if is_coordinate_shape(bytes) {
            let from = square(bytes[0], bytes[1])?;
            let to = square(bytes[2], bytes[3])?;
            let promotion = match bytes.get(4) {
                None => None,
                Some(&c) => Some(Piece::from_promotion_char(c as char).ok_or_else(invalid)?),
            };
            return Ok(Notation::Coordinate {
                from,
                to,
                promotion,
            });
        }

        Self::parse_san(bytes).ok_or_else(invalid)?
    }

    /// `None` means "no recognizable pattern"; `Some(Err)` carries an
    /// out-of-range square.
    fn parse_san(bytes: &[u8]) -> Option<Result<Self, ChessError>> {
        let mut rest = bytes;

        let piece = match rest[0] {
            c if c.is_ascii_uppercase() => {
                rest = &rest[1..];
                Piece::from_san_char(c as char)?
            }
            _ => Piece::Pawn,
        };

        let mut promotion = None;
        if piece == Piece::Pawn && rest.len() >= 3 {
            let last = rest[rest.len() - 1] as char;
            let before = rest[rest.len() - 2];
            let letter = Piece::from_san_char(last.to_ascii_uppercase())
                .filter(|p| p.is_promotion_target());
            if let Some(p) = letter {
                if before == b'=' || before.is_ascii_digit() {
                    promotion = Some(p);
                    rest = &rest[..rest.len() - 1];
                    if before == b'=' {
                        rest = &rest[..rest.len() - 1];
                    }
                }
            }
        }

        if rest.len() < 2 {
            return None;
        }
        let (file, rank) = (rest[rest.len() - 2], rest[rest.len() - 1]);
        if !file.is_ascii_lowercase() || !rank.is_ascii_digit() {
            return None;
        }
        let to = match square(file, rank) {
            Ok(sq) => sq,
            Err(e) => return Some(Err(e)),
        };

        let mut prefix = &rest[..rest.len() - 2];
        let capture = prefix.last() == Some(&b'x');
        if capture {
            prefix = &prefix[..prefix.len() - 1];
        }

        let mut from_file = None;
        let mut from_rank = None;
        for &c in prefix {
            match c {
                b'a'..=b'h' if from_file.is_none() && from_rank.is_none() => {
                    from_file = File::from_char(c as char);
                }
                b'1'..=b'8' if from_rank.is_none() => {
                    from_rank = Rank::from_char(c as char);
                }
                b'i'..=b'w' | b'y' | b'z' | b'0' | b'9' => {
                    return Some(Err(ChessError::InvalidSquare(
                        String::from_utf8_lossy(prefix).into_owned(),
                    )));
                }
                _ => return None,
            }
        }

        if piece == Piece::Pawn {
            let well_formed = if capture {
                from_file.is_some() && from_rank.is_none()
            } else {
                from_file.is_none() && from_rank.is_none()
            };
            if !well_formed {
                return None;
            }
        }

        Some(Ok(Notation::San {
            piece,
            from_file,
            from_rank,
            to,
            capture,
            promotion,
        }))
    }
}

fn is_coordinate_shape(b: &[u8]) -> bool {
    (b.len() == 4 || b.len() == 5)
        && b[0].is_ascii_lowercase()
        && b[1].is_ascii_digit()
        && b[2].is_ascii_lowercase()
        && b[3].is_ascii_digit()
}

fn square(file: u8, rank: u8) -> Result<Square, ChessError> {
    let text = format!("{}{}", file as char, rank as char);
    Square::from_algebraic(&text).ok_or(ChessError::InvalidSquare(text))
}

impl Position {
    /// Standard algebraic notation for `m`, played from this position.
    ///
    /// Includes the `+` or `#` suffix. Disambiguation adds the origin file
    /// when that alone is unique, else the rank, else both; queens and kings
    /// are never disambiguated.
    pub fn move_to_san(&mut self, m: Move) -> String {
        let mut san = match m.castle_side() {
            Some(side) => side.san().to_string(),
            None => self.san_body(m),
        };

        let them = self.side_to_move.opposite();
        let mut after = self.play_unrecorded(m);
        if after.is_in_check(them) {
            san.push(if after.has_legal_move() { '+' } else { '#' });
        }
        san
    }

    fn san_body(&mut self, m: Move) -> String {
        let mut san = String::new();
        match m.piece().to_san_char() {
            Some(letter) => {
                san.push(letter);
                san.push_str(&self.disambiguation(m));
            }
            None if m.is_capture() => san.push(m.from().file().to_char()),
            None => {}
        }
        if m.is_capture() {
            san.push('x');
        }
        san.push_str(&m.to().to_algebraic());
        if let Some(promotion) = m.promotion() {
            san.push('=');
            san.push(promotion.to_fen_char(Color::White));
        }
        san
    }

    fn disambiguation(&mut self, m: Move) -> String {
        if matches!(m.piece(), Piece::Queen | Piece::King) {
            return String::new();
        }

        let from = m.from();
        let rivals: Vec<Square> = self
            .legal_moves()
            .iter()
            .filter(|o| o.piece() == m.piece() && o.to() == m.to() && o.from() != from)
            .map(|o| o.from())
            .collect();

        if rivals.is_empty() {
            String::new()
        } else if rivals.iter().all(|sq| sq.file() != from.file()) {
            from.file().to_char().to_string()
        } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
            from.rank().to_char().to_string()
        } else {
            from.to_algebraic()
        }
    }
}
