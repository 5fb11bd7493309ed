//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{Color, File, Piece, Rank, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("{color} must have exactly one king, found {count}")]
    InvalidKingCount { color: Color, count: usize },
}

/// A decoded FEN record.
///
/// Holds every field in typed form. The engine turns this into its own
/// position representation; nothing here knows about move legality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Occupants indexed by [`Square::index`].
    pub placement: [Option<(Piece, Color)>; 64],
    pub side_to_move: Color,
    /// Castling field as written, `-` or a subset of `KQkq`.
    pub castling: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses and validates a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = parts[2];
        Self::validate_castling(castling)?;

        let en_passant = Self::parse_en_passant(parts[3], &placement, side_to_move)?;

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = parts[5]
            .parse::<u32>()
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(FenParser {
            placement,
            side_to_move,
            castling: castling.to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(field: &str) -> Result<[Option<(Piece, Color)>; 64], FenError> {
        let ranks: Vec<&str> = field.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut placement = [None; 64];
        // FEN lists rank 8 first.
        for (i, row) in ranks.iter().enumerate() {
            let rank = 7 - i as i8;
            let mut file: i8 = 0;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as i8;
                } else if let Some(occupant) = Piece::from_fen_char(c) {
                    if let Some(sq) = Square::from_coords(rank, file) {
                        placement[sq.index() as usize] = Some(occupant);
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        rank + 1
                    )));
                }
                if file > 8 {
                    break;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} covers {} files, expected 8",
                    rank + 1,
                    file
                )));
            }
        }

        for color in Color::BOTH {
            let count = placement
                .iter()
                .filter(|p| **p == Some((Piece::King, color)))
                .count();
            if count != 1 {
                return Err(FenError::InvalidKingCount { color, count });
            }
        }

        Ok(placement)
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }

        let mut seen = String::new();
        for c in castling.chars() {
            if !"KQkq".contains(c) || seen.contains(c) {
                return Err(FenError::InvalidCastlingRights(castling.to_string()));
            }
            seen.push(c);
        }

        Ok(())
    }

    /// The target must be the empty square a pawn of the side that just
    /// moved skipped over, with that pawn standing right in front of it.
    fn parse_en_passant(
        field: &str,
        placement: &[Option<(Piece, Color)>; 64],
        side_to_move: Color,
    ) -> Result<Option<Square>, FenError> {
        if field == "-" {
            return Ok(None);
        }

        let invalid = || FenError::InvalidEnPassantSquare(field.to_string());
        let target = Square::from_algebraic(field).ok_or_else(invalid)?;

        let pusher = side_to_move.opposite();
        let skipped_rank = (pusher.pawn_rank() as i8 + pusher.pawn_direction()) as u8;
        if target.rank().index() != skipped_rank || placement[target.index() as usize].is_some() {
            return Err(invalid());
        }

        match target.offset(pusher.pawn_direction(), 0) {
            Some(pawn) if placement[pawn.index() as usize] == Some((Piece::Pawn, pusher)) => {
                Ok(Some(target))
            }
            _ => Err(invalid()),
        }
    }

    /// Serializes the piece placement field.
    pub fn placement_to_fen(placement: &[Option<(Piece, Color)>; 64]) -> String {
        let mut out = String::new();
        for rank in Rank::ALL.iter().rev() {
            let mut empty = 0;
            for file in File::ALL {
                match placement[Square::new(file, *rank).index() as usize] {
                    Some((piece, color)) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if *rank != Rank::R1 {
                out.push('/');
            }
        }
        out
    }

    /// Converts the record back to a FEN string.
    pub fn to_fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            Self::placement_to_fen(&self.placement),
            self.side_to_move.to_fen_char(),
            self.castling,
            self.en_passant
                .map(|sq| sq.to_algebraic())
                .unwrap_or_else(|| "-".to_string()),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}
