//! Iterative-deepening minimax with alpha-beta pruning and quiescence.
//!
//! The main search is written White-maximizes / Black-minimizes over
//! White-relative scores. Quiescence is a negamax over side-to-move scores
//! and is converted at the horizon. Results are reported from the root
//! mover's side.

use chess_core::{Color, Move};
use chess_engine::Position;

use crate::book::book_move;
use crate::eval::Evaluator;
use crate::ordering::order_moves;
use crate::SearchConfig;

/// Magnitude of a mate score before the remaining-depth bonus.
pub const MATE_SCORE: i32 = 100_000;

/// Scores at least this large are forced mates. Mates inside the tree score
/// above [`MATE_SCORE`], mates found by quiescence just below it.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1_000;

const INFINITY: i32 = 1_000_000;

/// Outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the side to move has no legal move.
    pub best_move: Option<Move>,
    /// Centipawns from the side to move's point of view.
    pub score: i32,
}

/// Progress report after each completed iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationInfo {
    pub depth: u32,
    pub score: i32,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

/// A scored line, best move first.
struct Line {
    score: i32,
    moves: Vec<Move>,
}

impl Line {
    fn leaf(score: i32) -> Self {
        Line {
            score,
            moves: Vec::new(),
        }
    }
}

/// Searches positions with a fixed configuration.
pub struct Searcher<'a> {
    config: SearchConfig,
    evaluator: Evaluator,
    nodes: u64,
    on_iteration: Option<Box<dyn FnMut(&IterationInfo) + 'a>>,
}

impl<'a> Searcher<'a> {
    pub fn new(config: SearchConfig) -> Self {
        Searcher {
            evaluator: Evaluator::new(config.mobility_weight),
            config,
            nodes: 0,
            on_iteration: None,
        }
    }

    /// Calls `callback` after every completed iteration.
    pub fn on_iteration(mut self, callback: impl FnMut(&IterationInfo) + 'a) -> Self {
        self.on_iteration = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Picks a move for the side to move. The position is restored before
    /// returning.
    pub fn find_best_move(&mut self, position: &mut Position) -> SearchResult {
        self.nodes = 0;

        if self.config.use_book {
            if let Some(m) = book_move(position) {
                tracing::debug!("book move {}", m);
                return SearchResult {
                    best_move: Some(m),
                    score: 0,
                };
            }
        }

        let root_side = position.side_to_move();
        let max_depth = self.config.max_depth.max(1);
        let mut pv: Vec<Move> = Vec::new();
        let mut result = SearchResult {
            best_move: None,
            score: 0,
        };

        for depth in 1..=max_depth {
            let line = self.minimax(position, depth, -INFINITY, INFINITY, &pv, 0);
            let score = from_white(line.score, root_side);
            result = SearchResult {
                best_move: line.moves.first().copied(),
                score,
            };
            pv = line.moves;

            let info = IterationInfo {
                depth,
                score,
                nodes: self.nodes,
                pv: pv.clone(),
            };
            tracing::debug!(
                "depth {} score {} nodes {} pv {}",
                info.depth,
                info.score,
                info.nodes,
                format_pv(&info.pv)
            );
            if let Some(callback) = self.on_iteration.as_mut() {
                callback(&info);
            }
        }

        result
    }

    fn minimax(
        &mut self,
        position: &mut Position,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        pv: &[Move],
        ply: u32,
    ) -> Line {
        self.nodes += 1;

        if ply > 0 && position.is_threefold_repetition() {
            return Line::leaf(0);
        }

        let side = position.side_to_move();

        if depth == 0 {
            let score = match side {
                Color::White => self.quiescence(position, alpha, beta, 0),
                Color::Black => -self.quiescence(position, -beta, -alpha, 0),
            };
            return Line::leaf(score);
        }

        let mut moves = position.legal_moves();
        if moves.is_empty() {
            if position.is_in_check(side) {
                let mate = MATE_SCORE + depth as i32;
                return Line::leaf(from_white(-mate, side));
            }
            return Line::leaf(0);
        }

        let principal = pv.first().copied();
        order_moves(position, moves.as_mut_slice(), principal);

        let maximizing = side == Color::White;
        let mut best = Line::leaf(if maximizing { -INFINITY } else { INFINITY });

        for &m in moves.iter() {
            let child_pv: &[Move] = if Some(m) == principal { &pv[1..] } else { &[] };
            let child = {
                let mut next = position.play(m);
                self.minimax(&mut next, depth - 1, alpha, beta, child_pv, ply + 1)
            };

            let improves = if maximizing {
                child.score > best.score
            } else {
                child.score < best.score
            };
            if improves {
                let mut moves = Vec::with_capacity(child.moves.len() + 1);
                moves.push(m);
                moves.extend(child.moves);
                best = Line {
                    score: child.score,
                    moves,
                };
            }

            if maximizing {
                alpha = alpha.max(best.score);
            } else {
                beta = beta.min(best.score);
            }
            if beta <= alpha {
                break;
            }
        }

        best
    }

    /// Captures and checks only, scored for the side to move.
    fn quiescence(&mut self, position: &mut Position, mut alpha: i32, beta: i32, qdepth: u32) -> i32 {
        self.nodes += 1;

        let stand_pat = self.evaluator.evaluate(position);
        if qdepth >= self.config.quiescence_depth {
            return stand_pat;
        }

        let moves = position.legal_moves();
        if moves.is_empty() {
            return if position.is_in_check(position.side_to_move()) {
                -(MATE_SCORE - qdepth as i32)
            } else {
                0
            };
        }

        if stand_pat >= beta {
            return beta;
        }
        alpha = alpha.max(stand_pat);

        let mut tactical: Vec<Move> = moves
            .iter()
            .copied()
            .filter(|&m| m.is_capture() || position.gives_check(m))
            .collect();
        if tactical.is_empty() {
            return stand_pat;
        }
        order_moves(position, &mut tactical, None);

        for m in tactical {
            let score = {
                let mut next = position.play(m);
                -self.quiescence(&mut next, -beta, -alpha, qdepth + 1)
            };
            if score >= beta {
                return beta;
            }
            alpha = alpha.max(score);
        }

        alpha
    }
}

/// Searches `position` to `max_depth` with the default configuration.
pub fn find_best_move(position: &mut Position, max_depth: u32) -> SearchResult {
    Searcher::new(SearchConfig::with_depth(max_depth)).find_best_move(position)
}

/// Converts a White-relative score to `side`'s point of view, or back.
fn from_white(score: i32, side: Color) -> i32 {
    match side {
        Color::White => score,
        Color::Black => -score,
    }
}

fn format_pv(pv: &[Move]) -> String {
    pv.iter()
        .map(|m| m.to_coordinate())
        .collect::<Vec<_>>()
        .join(" ")
}
