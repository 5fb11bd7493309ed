//! Game rules on top of move generation: terminal classification, the
//! draw queries, and committing moves to the game record.
//!
//! Everything here works on [`Position`], which already carries the
//! repetition history and the notation of every committed move.

mod resolve;

use std::fmt;

use chess_core::{Color, Move};

use crate::{ChessError, Position};

/// Repetitions of the same position that make a draw.
pub const REPETITION_LIMIT: u32 = 3;

/// Half-moves without a capture or pawn move for the fifty-move rule.
pub const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// State of the game for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { loser: Color },
    Stalemate,
    ThreefoldRepetition,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }

    /// The winning side, if the game ended decisively.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameStatus::Checkmate { loser } => Some(loser.opposite()),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Checkmate { loser } => {
                write!(f, "checkmate, {} wins", loser.opposite())
            }
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::ThreefoldRepetition => write!(f, "draw by threefold repetition"),
        }
    }
}

impl Position {
    /// Classifies the position: mate and stalemate first, then repetition.
    pub fn status(&mut self) -> GameStatus {
        let us = self.side_to_move;
        if !self.has_legal_move() {
            if self.is_in_check(us) {
                GameStatus::Checkmate { loser: us }
            } else {
                GameStatus::Stalemate
            }
        } else if self.is_threefold_repetition() {
            GameStatus::ThreefoldRepetition
        } else {
            GameStatus::Ongoing
        }
    }

    /// True if `color` is to move, in check, and has no legal move.
    pub fn is_checkmate(&mut self, color: Color) -> bool {
        color == self.side_to_move && self.is_in_check(color) && !self.has_legal_move()
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.is_in_check(self.side_to_move) && !self.has_legal_move()
    }

    pub fn is_threefold_repetition(&self) -> bool {
        self.position_count() >= REPETITION_LIMIT
    }

    /// Stalemate or threefold repetition. The fifty-move rule is reported
    /// separately and never ends the game on its own.
    pub fn is_draw(&mut self) -> bool {
        self.is_threefold_repetition() || self.is_stalemate()
    }

    pub fn is_fifty_move_rule(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_HALFMOVES
    }

    /// Validates and commits a move given in coordinate or algebraic notation.
    ///
    /// On failure the position is unchanged.
    pub fn apply_move(&mut self, notation: &str) -> Result<Move, ChessError> {
        let m = self.parse_move(notation)?;
        self.commit(m);
        Ok(m)
    }

    /// Validates and commits an already-built move, returning its SAN.
    ///
    /// The move is matched by its squares and promotion, so a move built
    /// against a different position is still checked against this one.
    pub fn apply(&mut self, m: Move) -> Result<String, ChessError> {
        let text = m.to_coordinate();
        let resolved = match m.castle_side() {
            Some(side) => self.resolve_castle(side, &text)?,
            None => self.resolve_squares(m.from(), m.to(), m.promotion(), &text)?,
        };
        Ok(self.commit(resolved))
    }

    fn commit(&mut self, m: Move) -> String {
        let san = self.move_to_san(m);
        self.make_move(m);
        self.moves_played.push(san.clone());
        self.committed.push(m);
        tracing::debug!("played {} ({})", san, self.to_fen());

        match self.status() {
            GameStatus::Ongoing => {
                if self.is_in_check(self.side_to_move) {
                    tracing::debug!("{} is in check", self.side_to_move);
                }
            }
            status => tracing::debug!("game over: {}", status),
        }
        if self.is_fifty_move_rule() {
            tracing::debug!("fifty-move rule reached after {}", san);
        }
        san
    }

    /// Takes back the last committed move by replaying the game from its
    /// starting FEN, returning the notation that was removed.
    ///
    /// The stored moves are replayed rather than their notation, which can
    /// become ambiguous once a promotion adds a second piece of a kind.
    pub fn undo_last(&mut self) -> Result<Option<String>, ChessError> {
        let Some(last) = self.moves_played.last().cloned() else {
            return Ok(None);
        };

        let mut replay = Position::from_fen(self.start_fen())?;
        for &m in &self.committed[..self.committed.len() - 1] {
            replay.commit(m);
        }
        *self = replay;
        tracing::debug!("took back {}", last);
        Ok(Some(last))
    }

    /// Starts over from the standard initial position.
    pub fn reset(&mut self) {
        *self = Position::startpos();
    }
}
