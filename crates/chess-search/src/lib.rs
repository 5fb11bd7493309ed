//! Evaluation and search for the chess engine.
//!
//! This crate provides:
//! - [`evaluate`] / [`Evaluator`] - material, piece-square tables, king safety
//!   and an optional mobility term
//! - [`find_best_move`] / [`Searcher`] - iterative-deepening alpha-beta with
//!   move ordering, quiescence and a small opening book
//! - [`SearchConfig`] - search settings loadable from TOML
//!
//! # Example
//!
//! ```
//! use chess_engine::Position;
//! use chess_search::{find_best_move, SearchConfig, Searcher};
//!
//! let mut position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
//! let result = find_best_move(&mut position, 2);
//! assert_eq!(result.best_move.unwrap().to_coordinate(), "a1a8");
//!
//! let config = SearchConfig::from_toml_str("max_depth = 1").unwrap();
//! let mut searcher = Searcher::new(config);
//! assert!(searcher.find_best_move(&mut position).best_move.is_some());
//! ```

pub mod book;
mod config;
pub mod eval;
mod ordering;
mod search;
pub mod tables;

pub use config::{ConfigError, SearchConfig};
pub use eval::{evaluate, evaluate_white, is_endgame, Evaluator};
pub use search::{find_best_move, IterationInfo, SearchResult, Searcher, MATE_SCORE, MATE_THRESHOLD};
