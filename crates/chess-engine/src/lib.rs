//! Chess rules engine on a mailbox board.
//!
//! This crate provides:
//! - [`Position`] - board, side to move, castling rights, en-passant target,
//!   clocks, committed move notation and repetition history
//! - Pseudo-legal and legal move generation, attack detection and perft
//! - Reversible move application via [`Position::make_move`] /
//!   [`Position::undo_move`] and the scoped [`MoveGuard`]
//! - Coordinate and standard algebraic notation parsing and rendering
//! - Game status: checkmate, stalemate, threefold repetition
//!
//! # Example
//!
//! ```
//! use chess_engine::{GameStatus, Position};
//!
//! let mut position = Position::startpos();
//! position.apply_move("e4").unwrap();
//! position.apply_move("e7e5").unwrap();
//! assert_eq!(position.legal_moves().len(), 29);
//! assert_eq!(position.status(), GameStatus::Ongoing);
//! assert_eq!(position.moves_played(), ["e4", "e5"]);
//! ```

mod error;
pub mod movegen;
pub mod notation;
mod position;
pub mod rules;
mod zobrist;

pub use error::{ChessError, IllegalMoveReason};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{MoveGuard, MoveList, Undo};
pub use notation::Notation;
pub use position::{CastlingRights, Position};
pub use rules::GameStatus;
pub use zobrist::{ZobristKeys, ZOBRIST};
