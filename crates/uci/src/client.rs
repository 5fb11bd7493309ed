//! Client for driving an external UCI engine as a subprocess.
//!
//! # Example
//!
//! ```no_run
//! use uci::client::UciClient;
//!
//! let mut client = UciClient::spawn("stockfish")?;
//! client.init()?;
//! client.set_position_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")?;
//! let reply = client.go_depth(Some(12))?;
//! println!("{} answers {}", client.name, reply.best_move);
//! client.quit()?;
//! # Ok::<(), uci::UciError>(())
//! ```

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::{EngineInfo, Score, UciError};

/// Lowest `UCI_Elo` accepted by [`UciClient::set_elo`].
pub const MIN_ELO: u32 = 1350;
/// Highest `UCI_Elo` accepted by [`UciClient::set_elo`].
pub const MAX_ELO: u32 = 2850;

/// Lines read while waiting for one response before giving up.
const MAX_RESPONSE_LINES: usize = 10_000;

/// The engine's answer to a `go` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineMove {
    /// Best move in coordinate notation (`0000` if the engine has none).
    pub best_move: String,
    /// Expected reply, when the engine reports one.
    pub ponder: Option<String>,
    /// Score from the last `info` line that carried one.
    pub score: Option<Score>,
    /// Principal variation from the last `info` line that carried one.
    pub pv: Vec<String>,
    /// Deepest completed depth reported.
    pub depth: u32,
}

/// A running UCI engine connected through its stdin and stdout.
///
/// The process is killed when the client is dropped.
pub struct UciClient {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    ready: bool,
    /// The engine's name as reported during [`init`](Self::init).
    pub name: String,
}

impl UciClient {
    /// Starts `program` without arguments.
    pub fn spawn<P: AsRef<OsStr>>(program: P) -> Result<Self, UciError> {
        Self::spawn_with_args(program, std::iter::empty::<&str>())
    }

    /// Starts `program` with `args`. Call [`init`](Self::init) before
    /// sending anything else.
    pub fn spawn_with_args<P, I, S>(program: P, args: I) -> Result<Self, UciError>
    where
        P: AsRef<OsStr>,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut process = Command::new(program.as_ref())
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(UciError::SpawnError)?;

        let (Some(stdin), Some(stdout)) = (process.stdin.take(), process.stdout.take()) else {
            let _ = process.kill();
            return Err(UciError::NotReady);
        };

        tracing::debug!("spawned engine {:?}", program.as_ref());
        Ok(Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            ready: false,
            name: String::new(),
        })
    }

    /// Sends one command line to the engine.
    pub fn send(&mut self, cmd: &str) -> Result<(), UciError> {
        tracing::trace!("> {}", cmd);
        writeln!(self.stdin, "{}", cmd)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Reads one trimmed line. A closed stdout is an error.
    pub fn read_line(&mut self) -> Result<String, UciError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(UciError::InvalidResponse("engine closed its output".to_string()));
        }
        let line = line.trim().to_string();
        tracing::trace!("< {}", line);
        Ok(line)
    }

    /// Performs the `uci`/`uciok` handshake, recording the engine name,
    /// then waits until the engine is ready.
    pub fn init(&mut self) -> Result<(), UciError> {
        self.send("uci")?;
        self.read_until(|client, line| {
            if let Some(name) = line.strip_prefix("id name ") {
                client.name = name.to_string();
            }
            line == "uciok"
        })?;
        self.wait_ready()?;
        self.ready = true;
        tracing::debug!("engine {} ready", self.name);
        Ok(())
    }

    /// Sends `isready` and waits for `readyok`.
    pub fn wait_ready(&mut self) -> Result<(), UciError> {
        self.send("isready")?;
        self.read_until(|_, line| line == "readyok")
    }

    /// Tells the engine a new game starts.
    pub fn new_game(&mut self) -> Result<(), UciError> {
        self.send("ucinewgame")?;
        self.wait_ready()
    }

    /// True once [`init`](Self::init) has completed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn set_position_fen(&mut self, fen: &str) -> Result<(), UciError> {
        self.ensure_ready()?;
        self.send(&format!("position fen {}", fen))
    }

    /// Searches the current position, to `depth` plies when given.
    pub fn go_depth(&mut self, depth: Option<u32>) -> Result<EngineMove, UciError> {
        self.ensure_ready()?;
        match depth {
            Some(d) => self.send(&format!("go depth {}", d))?,
            None => self.send("go")?,
        }

        let mut result = EngineMove {
            best_move: String::new(),
            ponder: None,
            score: None,
            pv: Vec::new(),
            depth: 0,
        };

        for _ in 0..MAX_RESPONSE_LINES {
            let line = self.read_line()?;
            if let Some(info) = EngineInfo::parse(&line) {
                if let Some(d) = info.depth {
                    result.depth = result.depth.max(d);
                }
                if info.score.is_some() {
                    result.score = info.score;
                }
                if !info.pv.is_empty() {
                    result.pv = info.pv;
                }
            } else if line.starts_with("bestmove") {
                let mut parts = line.split_whitespace().skip(1);
                result.best_move = parts
                    .next()
                    .ok_or_else(|| UciError::InvalidResponse(line.clone()))?
                    .to_string();
                if parts.next() == Some("ponder") {
                    result.ponder = parts.next().map(str::to_string);
                }
                return Ok(result);
            }
        }

        Err(UciError::InvalidResponse("Too many lines without bestmove".to_string()))
    }

    /// Limits playing strength to `elo`, which must lie in
    /// [`MIN_ELO`]`..=`[`MAX_ELO`].
    pub fn set_elo(&mut self, elo: u32) -> Result<(), UciError> {
        if !(MIN_ELO..=MAX_ELO).contains(&elo) {
            return Err(UciError::InvalidOption(format!(
                "UCI_Elo {} outside {}..={}",
                elo, MIN_ELO, MAX_ELO
            )));
        }
        self.ensure_ready()?;
        self.send("setoption name UCI_LimitStrength value true")?;
        self.send(&format!("setoption name UCI_Elo value {}", elo))?;
        self.wait_ready()
    }

    /// Restores full strength after [`set_elo`](Self::set_elo).
    pub fn disable_strength_limit(&mut self) -> Result<(), UciError> {
        self.ensure_ready()?;
        self.send("setoption name UCI_LimitStrength value false")?;
        self.wait_ready()
    }

    /// Sends `quit` and waits for the process to exit.
    pub fn quit(&mut self) -> Result<(), UciError> {
        self.ready = false;
        self.send("quit")?;
        self.process.wait()?;
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), UciError> {
        if self.ready {
            Ok(())
        } else {
            Err(UciError::NotReady)
        }
    }

    fn read_until(&mut self, mut done: impl FnMut(&mut Self, &str) -> bool) -> Result<(), UciError> {
        for _ in 0..MAX_RESPONSE_LINES {
            let line = self.read_line()?;
            if done(self, &line) {
                return Ok(());
            }
        }
        Err(UciError::NotReady)
    }
}

impl Drop for UciClient {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A shell script that answers like a tiny UCI engine.
    #[cfg(unix)]
    const FAKE_ENGINE: &str = r#"
while read -r line; do
  case "$line" in
    uci) echo "id name FakeFish 1"; echo "id author nobody"; echo "uciok" ;;
    isready) echo "readyok" ;;
    "go depth 2")
      echo "info depth 1 score cp 12 nodes 20 pv d2d4"
      echo "info depth 2 score cp 30 nodes 400 pv e2e4 e7e5"
      echo "info string thinking done"
      echo "bestmove e2e4 ponder e7e5" ;;
    go) echo "bestmove 0000" ;;
    quit) exit 0 ;;
  esac
done
"#;

    #[cfg(unix)]
    fn fake_engine() -> UciClient {
        let mut client = UciClient::spawn_with_args("sh", ["-c", FAKE_ENGINE]).unwrap();
        client.init().unwrap();
        client
    }

    #[test]
    fn spawn_nonexistent_executable_returns_error() {
        match UciClient::spawn("/nonexistent/path/to/engine") {
            Err(UciError::SpawnError(_)) => {}
            other => panic!("Expected SpawnError, got {:?}", other.err()),
        }
    }

    #[cfg(unix)]
    #[test]
    fn commands_before_init_are_refused() {
        let mut client = UciClient::spawn_with_args("sh", ["-c", FAKE_ENGINE]).unwrap();
        assert!(!client.is_ready());
        assert!(matches!(client.set_position_fen("8/8/8/8/8/8/8/8 w - - 0 1"), Err(UciError::NotReady)));
        assert!(matches!(client.go_depth(Some(1)), Err(UciError::NotReady)));
        client.init().unwrap();
        assert!(client.is_ready());
    }

    #[cfg(unix)]
    #[test]
    fn handshake_records_name() {
        let mut client = fake_engine();
        assert_eq!(client.name, "FakeFish 1");
        client.new_game().unwrap();
        client.quit().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn go_collects_the_last_info() {
        let mut client = fake_engine();
        client.set_position_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        let reply = client.go_depth(Some(2)).unwrap();
        assert_eq!(
            reply,
            EngineMove {
                best_move: "e2e4".to_string(),
                ponder: Some("e7e5".to_string()),
                score: Some(Score::Cp(30)),
                pv: vec!["e2e4".to_string(), "e7e5".to_string()],
                depth: 2,
            }
        );

        let empty = client.go_depth(None).unwrap();
        assert_eq!(empty.best_move, "0000");
        assert_eq!(empty.ponder, None);
        assert_eq!(empty.score, None);
    }

    #[cfg(unix)]
    #[test]
    fn elo_outside_range_is_rejected() {
        let mut client = fake_engine();
        assert!(matches!(client.set_elo(1000), Err(UciError::InvalidOption(_))));
        assert!(matches!(client.set_elo(3000), Err(UciError::InvalidOption(_))));
        client.set_elo(MIN_ELO).unwrap();
        client.set_elo(MAX_ELO).unwrap();
        client.disable_strength_limit().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn closed_engine_is_an_invalid_response() {
        let mut client = UciClient::spawn_with_args("sh", ["-c", "exit 0"]).unwrap();
        assert!(matches!(client.init(), Err(UciError::InvalidResponse(_)) | Err(UciError::IoError(_))));
    }
}
