//! UCI front end for the minimax searcher.

use std::io::{BufRead, Write};

use chess_engine::Position;
use chess_search::{IterationInfo, SearchConfig, Searcher, MATE_SCORE, MATE_THRESHOLD};
use uci::{GoOptions, GuiCommand, InfoBuilder, Score, UciEngine, UciError};

pub const ENGINE_NAME: &str = "Minimax";
pub const ENGINE_AUTHOR: &str = "Chess Devtools";

const MAX_DEPTH_OPTION: u32 = 12;

/// Engine state between commands.
pub struct UciSession {
    position: Position,
    config: SearchConfig,
}

impl UciSession {
    pub fn new(config: SearchConfig) -> Self {
        UciSession {
            position: Position::startpos(),
            config,
        }
    }

    /// Serves commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, engine: &mut UciEngine<R, W>) -> Result<(), UciError> {
        loop {
            let cmd = match engine.read_command() {
                Ok(cmd) => cmd,
                Err(UciError::IoError(e)) => return Err(UciError::IoError(e)),
                Err(e) => {
                    tracing::warn!("Error reading command: {}", e);
                    continue;
                }
            };

            match cmd {
                GuiCommand::Uci => {
                    engine.send_id(ENGINE_NAME, ENGINE_AUTHOR)?;
                    engine.send_spin_option(
                        "Depth",
                        i64::from(self.config.max_depth),
                        1,
                        i64::from(MAX_DEPTH_OPTION),
                    )?;
                    engine.send_uciok()?;
                }
                GuiCommand::IsReady => engine.send_readyok()?,
                GuiCommand::UciNewGame => self.position = Position::startpos(),
                GuiCommand::SetOption { name, value } => self.set_option(&name, value.as_deref()),
                GuiCommand::Position { fen, moves } => self.set_position(fen.as_deref(), &moves),
                GuiCommand::Go(opts) => self.go(engine, &opts)?,
                // Searches run to completion before the next command is read.
                GuiCommand::Stop => {}
                GuiCommand::Quit => return Ok(()),
                GuiCommand::Unknown(line) => {
                    if !line.is_empty() {
                        tracing::debug!("ignoring unknown command {:?}", line);
                    }
                }
            }
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) {
        if !name.eq_ignore_ascii_case("depth") {
            tracing::warn!("unsupported option {:?}", name);
            return;
        }
        match value.and_then(|v| v.parse::<u32>().ok()) {
            Some(depth) if (1..=MAX_DEPTH_OPTION).contains(&depth) => self.config.max_depth = depth,
            _ => tracing::warn!("invalid Depth value {:?}", value),
        }
    }

    /// Sets up the position. Moves after the first illegal one are dropped.
    fn set_position(&mut self, fen: Option<&str>, moves: &[String]) {
        self.position = match fen {
            Some(f) => Position::from_fen(f).unwrap_or_else(|e| {
                tracing::warn!("bad FEN {:?}: {}", f, e);
                Position::startpos()
            }),
            None => Position::startpos(),
        };

        for mv in moves {
            if let Err(e) = self.position.apply_move(mv) {
                tracing::warn!("rejected move {}: {}", mv, e);
                break;
            }
        }
    }

    fn go<R: BufRead, W: Write>(&mut self, engine: &mut UciEngine<R, W>, opts: &GoOptions) -> Result<(), UciError> {
        let depth = search_depth(opts, self.config.max_depth);
        let config = SearchConfig {
            max_depth: depth,
            ..self.config.clone()
        };

        let mut pv = Vec::new();
        let (result, nodes) = {
            let mut searcher = Searcher::new(config).on_iteration(|info: &IterationInfo| {
                pv = info.pv.clone();
                if let Err(e) = engine.send_info(iteration_info(info)) {
                    tracing::warn!("failed to send info: {}", e);
                }
            });
            let result = searcher.find_best_move(&mut self.position);
            (result, searcher.nodes())
        };

        match result.best_move {
            Some(best) => {
                if nodes == 0 {
                    engine.send_info(InfoBuilder::new().string("book move").build())?;
                }
                let ponder = pv
                    .get(1)
                    .filter(|_| pv.first() == Some(&best))
                    .map(|m| m.to_coordinate());
                engine.send_bestmove(&best.to_coordinate(), ponder.as_deref())
            }
            None => engine.send_bestmove("0000", None),
        }
    }
}

/// Depth for a `go` command. `movetime` is mapped onto a depth since the
/// search has no clock.
pub fn search_depth(opts: &GoOptions, default: u32) -> u32 {
    if let Some(depth) = opts.depth {
        return depth.max(1);
    }
    match opts.movetime {
        Some(ms) if ms < 100 => 1,
        Some(ms) if ms < 1_000 => 2,
        Some(ms) if ms < 5_000 => 3,
        Some(_) => default.max(4),
        None => default,
    }
}

/// Converts a side-to-move search score reached at iteration `depth` into
/// a UCI score, reporting mates in full moves.
pub fn uci_score(score: i32, depth: u32) -> Score {
    if score.abs() < MATE_THRESHOLD {
        return Score::Cp(score);
    }
    // Mates in the tree carry the remaining depth at the mated node, mates
    // in quiescence carry how far past the horizon they were found.
    let plies = (depth as i32 - (score.abs() - MATE_SCORE)).max(1);
    if score > 0 {
        Score::Mate((plies + 1) / 2)
    } else {
        Score::Mate(-(plies / 2))
    }
}

fn iteration_info(info: &IterationInfo) -> uci::EngineInfo {
    InfoBuilder::new()
        .depth(info.depth)
        .score(uci_score(info.score, info.depth))
        .nodes(info.nodes)
        .pv(info.pv.iter().map(|m| m.to_coordinate()).collect())
        .build()
}
