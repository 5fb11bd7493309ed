//! Commands sent from the GUI to the engine.

use std::str::FromStr;

use crate::UciError;

#[derive(Debug, Clone, PartialEq)]
pub enum GuiCommand {
    Uci,
    IsReady,
    /// The next position belongs to a different game.
    UciNewGame,
    /// Change an engine option. Names may contain spaces.
    SetOption { name: String, value: Option<String> },
    /// `fen` is `None` for `startpos`. Moves are in coordinate notation.
    Position { fen: Option<String>, moves: Vec<String> },
    Go(GoOptions),
    Stop,
    Quit,
    /// Anything else, kept verbatim. Blank lines give an empty string.
    Unknown(String),
}

/// Limits for the `go` command. Unparseable values are left unset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoOptions {
    /// Search for exactly this time in milliseconds.
    pub movetime: Option<u64>,
    /// Search to this depth.
    pub depth: Option<u32>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u32>,
    /// Search until `stop`.
    pub infinite: bool,
}

impl GuiCommand {
    /// Parse one line of GUI input.
    pub fn parse(input: &str) -> Result<Self, UciError> {
        let input = input.trim();
        let mut tokens = input.split_whitespace();

        let command = match tokens.next() {
            None => GuiCommand::Unknown(String::new()),
            Some("uci") => GuiCommand::Uci,
            Some("isready") => GuiCommand::IsReady,
            Some("ucinewgame") => GuiCommand::UciNewGame,
            Some("stop") => GuiCommand::Stop,
            Some("quit") => GuiCommand::Quit,
            Some("setoption") => parse_setoption(tokens)?,
            Some("position") => parse_position(tokens)?,
            Some("go") => GuiCommand::Go(parse_go(tokens)),
            Some(_) => GuiCommand::Unknown(input.to_string()),
        };
        Ok(command)
    }
}

fn parse_setoption<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<GuiCommand, UciError> {
    if tokens.next() != Some("name") {
        return Err(UciError::ParseError(
            "Expected 'setoption name <name> [value <value>]'".to_string(),
        ));
    }

    let mut name = Vec::new();
    let mut value = None;
    while let Some(token) = tokens.next() {
        if token == "value" {
            value = Some(tokens.by_ref().collect::<Vec<_>>().join(" "));
            break;
        }
        name.push(token);
    }

    if name.is_empty() {
        return Err(UciError::ParseError("Missing option name".to_string()));
    }

    Ok(GuiCommand::SetOption {
        name: name.join(" "),
        value,
    })
}

fn parse_position<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<GuiCommand, UciError> {
    let fen = match tokens.next() {
        Some("startpos") => {
            // Anything between `startpos` and `moves` is ignored.
            tokens.by_ref().find(|&t| t == "moves");
            None
        }
        Some("fen") => {
            let fields: Vec<&str> = tokens.by_ref().take_while(|&t| t != "moves").collect();
            if fields.is_empty() {
                return Err(UciError::ParseError("Missing FEN after 'fen'".to_string()));
            }
            Some(fields.join(" "))
        }
        Some(other) => {
            return Err(UciError::ParseError(format!(
                "Expected 'startpos' or 'fen', got '{}'",
                other
            )));
        }
        None => {
            return Err(UciError::ParseError("Expected 'startpos' or 'fen'".to_string()));
        }
    };

    let moves = tokens.map(str::to_string).collect();
    Ok(GuiCommand::Position { fen, moves })
}

fn parse_go<'a>(mut tokens: impl Iterator<Item = &'a str>) -> GoOptions {
    fn value<'a, T: FromStr>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<T> {
        tokens.next().and_then(|t| t.parse().ok())
    }

    let mut opts = GoOptions::default();
    while let Some(token) = tokens.next() {
        match token {
            "movetime" => opts.movetime = value(&mut tokens),
            "depth" => opts.depth = value(&mut tokens),
            "wtime" => opts.wtime = value(&mut tokens),
            "btime" => opts.btime = value(&mut tokens),
            "winc" => opts.winc = value(&mut tokens),
            "binc" => opts.binc = value(&mut tokens),
            "movestogo" => opts.movestogo = value(&mut tokens),
            "infinite" => opts.infinite = true,
            _ => {}
        }
    }
    opts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(fen: Option<&str>, moves: &[&str]) -> GuiCommand {
        GuiCommand::Position {
            fen: fen.map(str::to_string),
            moves: moves.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn go(line: &str) -> GoOptions {
        match GuiCommand::parse(line).unwrap() {
            GuiCommand::Go(opts) => opts,
            other => panic!("Expected Go command, got {:?}", other),
        }
    }

    #[test]
    fn simple_commands() {
        assert_eq!(GuiCommand::parse("uci").unwrap(), GuiCommand::Uci);
        assert_eq!(GuiCommand::parse("  isready \n").unwrap(), GuiCommand::IsReady);
        assert_eq!(GuiCommand::parse("ucinewgame").unwrap(), GuiCommand::UciNewGame);
        assert_eq!(GuiCommand::parse("stop").unwrap(), GuiCommand::Stop);
        assert_eq!(GuiCommand::parse("quit").unwrap(), GuiCommand::Quit);
        assert_eq!(GuiCommand::parse("").unwrap(), GuiCommand::Unknown(String::new()));
        assert_eq!(
            GuiCommand::parse("debug on").unwrap(),
            GuiCommand::Unknown("debug on".to_string())
        );
    }

    #[test]
    fn position_startpos() {
        assert_eq!(GuiCommand::parse("position startpos").unwrap(), position(None, &[]));
        assert_eq!(
            GuiCommand::parse("position startpos moves e2e4 e7e5").unwrap(),
            position(None, &["e2e4", "e7e5"])
        );
    }

    #[test]
    fn position_fen() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert_eq!(
            GuiCommand::parse(&format!("position fen {}", fen)).unwrap(),
            position(Some(fen), &[])
        );
        assert_eq!(
            GuiCommand::parse("position fen 4k3/8/8/8/8/8/8/4K2R w K - 0 1 moves e1g1").unwrap(),
            position(Some("4k3/8/8/8/8/8/8/4K2R w K - 0 1"), &["e1g1"])
        );
    }

    #[test]
    fn malformed_position() {
        assert!(GuiCommand::parse("position").is_err());
        assert!(GuiCommand::parse("position somewhere").is_err());
        assert!(GuiCommand::parse("position fen moves e2e4").is_err());
    }

    #[test]
    fn setoption() {
        assert_eq!(
            GuiCommand::parse("setoption name UCI_Elo value 1500").unwrap(),
            GuiCommand::SetOption {
                name: "UCI_Elo".to_string(),
                value: Some("1500".to_string())
            }
        );
        assert_eq!(
            GuiCommand::parse("setoption name Clear Hash").unwrap(),
            GuiCommand::SetOption {
                name: "Clear Hash".to_string(),
                value: None
            }
        );
        assert!(GuiCommand::parse("setoption value 3").is_err());
        assert!(GuiCommand::parse("setoption name").is_err());
    }

    #[test]
    fn go_limits() {
        assert_eq!(go("go movetime 1000").movetime, Some(1000));
        assert_eq!(go("go depth 10").depth, Some(10));
        assert!(go("go infinite").infinite);
        assert_eq!(go("go"), GoOptions::default());

        let clock = go("go wtime 60000 btime 59000 winc 1000 binc 1000 movestogo 20");
        assert_eq!(clock.wtime, Some(60000));
        assert_eq!(clock.btime, Some(59000));
        assert_eq!(clock.winc, Some(1000));
        assert_eq!(clock.binc, Some(1000));
        assert_eq!(clock.movestogo, Some(20));
    }

    #[test]
    fn go_skips_bad_values() {
        let opts = go("go depth deep movetime 50");
        assert_eq!(opts.depth, None);
        assert_eq!(opts.movetime, Some(50));
    }
}
