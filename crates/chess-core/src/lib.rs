//! Core types for chess.
//!
//! This crate provides the vocabulary shared by the engine, the search and
//! the UCI front-end:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] and [`CastleSide`] for move representation
//! - [`FenParser`] for FEN parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::{CastleSide, Move};
pub use piece::Piece;
pub use square::{File, Rank, Square};
