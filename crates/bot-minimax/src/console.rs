//! Interactive console: type moves, let the engine answer, inspect the game.

use std::io::{BufRead, Write};

use anyhow::Result;
use chess_engine::Position;
use chess_search::{Evaluator, SearchConfig, Searcher};

/// Engine moves played by `auto` before giving up on a finished game.
const AUTO_PLY_LIMIT: usize = 300;

const HELP: &str = "\
Commands:
  <move>             play a move: e4, Nf3, exd5, O-O, e7e8q, g1f3
  move (m) <move>    same, explicitly
  engine (en)        let the engine play the side to move
  auto [n]           let the engine play n moves (default: until the game ends)
  undo (u)           take back the last move
  display (d)        show the board
  eval (e)           show the static evaluation (White's view)
  fen                print the FEN of the current position
  new                start a new game
  help (h)           show this message
  quit (q)           exit";

pub struct Console<W: Write> {
    position: Position,
    config: SearchConfig,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(config: SearchConfig, out: W) -> Self {
        Console {
            position: Position::startpos(),
            config,
            out,
        }
    }

    /// Reads commands from `input` until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        writeln!(self.out, "Type 'help' for available commands")?;
        writeln!(self.out, "{}", self.position)?;

        for line in input.lines() {
            let line = line?;
            if !self.execute(line.trim())? {
                break;
            }
        }
        writeln!(self.out, "Goodbye!")?;
        Ok(())
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs one command. Returns `false` when the console should exit.
    pub fn execute(&mut self, line: &str) -> Result<bool> {
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Ok(true);
        };

        match cmd.to_ascii_lowercase().as_str() {
            "quit" | "q" => return Ok(false),
            "help" | "h" => writeln!(self.out, "{}", HELP)?,
            "display" | "d" => writeln!(self.out, "{}", self.position)?,
            "fen" => writeln!(self.out, "{}", self.position.to_fen())?,
            "eval" | "e" => {
                let score = Evaluator::new(self.config.mobility_weight).evaluate_white(&self.position);
                writeln!(self.out, "Position evaluation: {}", score)?;
            }
            "new" => {
                self.position.reset();
                writeln!(self.out, "{}", self.position)?;
            }
            "undo" | "u" => match self.position.undo_last()? {
                Some(san) => {
                    writeln!(self.out, "Took back {}", san)?;
                    writeln!(self.out, "{}", self.position)?;
                }
                None => writeln!(self.out, "Nothing to undo")?,
            },
            "engine" | "en" => {
                self.engine_move()?;
            }
            "auto" => {
                let limit = match parts.next() {
                    Some(n) => match n.parse::<usize>() {
                        Ok(n) => n,
                        Err(_) => {
                            writeln!(self.out, "Usage: auto [n]")?;
                            return Ok(true);
                        }
                    },
                    None => AUTO_PLY_LIMIT,
                };
                for _ in 0..limit {
                    if !self.engine_move()? {
                        break;
                    }
                }
            }
            "move" | "m" => match parts.next() {
                Some(mv) => self.player_move(mv)?,
                None => writeln!(self.out, "Usage: move <move>, e.g. e4, Nf3, O-O, exd5")?,
            },
            _ => self.player_move(cmd)?,
        }
        Ok(true)
    }

    fn player_move(&mut self, notation: &str) -> Result<()> {
        match self.position.apply_move(notation) {
            Ok(_) => {
                let san = self.position.moves_played().last().cloned().unwrap_or_default();
                writeln!(self.out, "Played {}", san)?;
                self.report()?;
            }
            Err(e) => writeln!(self.out, "Invalid move: {}", e)?,
        }
        Ok(())
    }

    /// Plays one engine move. Returns `false` if the game was already over.
    fn engine_move(&mut self) -> Result<bool> {
        let status = self.position.status();
        if status.is_over() {
            writeln!(self.out, "Game over: {}", status)?;
            return Ok(false);
        }

        let result = Searcher::new(self.config.clone()).find_best_move(&mut self.position);
        let Some(best) = result.best_move else {
            writeln!(self.out, "No legal moves found!")?;
            return Ok(false);
        };
        let san = self.position.apply(best)?;
        writeln!(self.out, "Engine plays: {} (evaluation: {})", san, result.score)?;
        self.report()?;
        Ok(true)
    }

    fn report(&mut self) -> Result<()> {
        writeln!(self.out, "{}", self.position)?;
        let status = self.position.status();
        if status.is_over() {
            writeln!(self.out, "Game over: {}", status)?;
        } else if self.position.is_in_check(self.position.side_to_move()) {
            writeln!(self.out, "{} is in check", self.position.side_to_move())?;
        }
        if self.position.is_fifty_move_rule() {
            writeln!(self.out, "Fifty moves without a capture or pawn move")?;
        }
        Ok(())
    }
}
