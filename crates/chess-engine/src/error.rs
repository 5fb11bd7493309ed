//! Errors returned by position loading, notation parsing and move commits.

use chess_core::FenError;
use thiserror::Error;

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    NoPiece,
    WrongSide,
    InvalidPattern,
    BlockedPath,
    OwnPieceOnTarget,
    InvalidPromotion,
    MissingCastlingRights,
    CastlingPathBlocked,
    CastlingWhileInCheck,
    CastlingThroughAttack,
    UnresolvedCheck,
    LeavesKingInCheck,
}

impl std::fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            IllegalMoveReason::NoPiece => "no piece on the origin square",
            IllegalMoveReason::WrongSide => "it is not that side's turn",
            IllegalMoveReason::InvalidPattern => "the piece cannot move that way",
            IllegalMoveReason::BlockedPath => "the path is blocked",
            IllegalMoveReason::OwnPieceOnTarget => "the target square holds a friendly piece",
            IllegalMoveReason::InvalidPromotion => "invalid promotion",
            IllegalMoveReason::MissingCastlingRights => "castling rights have been lost",
            IllegalMoveReason::CastlingPathBlocked => {
                "pieces stand between the king and the rook"
            }
            IllegalMoveReason::CastlingWhileInCheck => "cannot castle out of check",
            IllegalMoveReason::CastlingThroughAttack => {
                "the king would pass through an attacked square"
            }
            IllegalMoveReason::UnresolvedCheck => "the move does not resolve check",
            IllegalMoveReason::LeavesKingInCheck => "the move leaves the king in check",
        };
        f.write_str(text)
    }
}

/// Errors surfaced to callers of the engine.
///
/// Every failing operation leaves the position unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChessError {
    #[error("malformed FEN record: {0}")]
    MalformedRecord(#[from] FenError),

    #[error("invalid notation: {0}")]
    InvalidNotation(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("illegal move {notation}: {reason}")]
    IllegalMove {
        notation: String,
        reason: IllegalMoveReason,
    },
}

impl ChessError {
    pub(crate) fn illegal(notation: &str, reason: IllegalMoveReason) -> Self {
        ChessError::IllegalMove {
            notation: notation.to_string(),
            reason,
        }
    }

    /// The rejection reason, if this is an illegal-move error.
    pub fn illegal_reason(&self) -> Option<IllegalMoveReason> {
        match self {
            ChessError::IllegalMove { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
