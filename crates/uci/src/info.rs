//! `info` lines: search progress reported by an engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Score in centipawns or mate distance, from the engine's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Score {
    /// Centipawn score (100 = 1 pawn advantage).
    Cp(i32),
    /// Mate in N moves (positive = engine mates, negative = engine is mated).
    Mate(i32),
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Cp(cp) => write!(f, "cp {}", cp),
            Score::Mate(n) => write!(f, "mate {}", n),
        }
    }
}

/// One `info` line. Absent fields are not written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineInfo {
    pub depth: Option<u32>,
    pub seldepth: Option<u32>,
    pub score: Option<Score>,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    /// Milliseconds since the search started.
    pub time: Option<u64>,
    /// Principal variation in coordinate notation.
    pub pv: Vec<String>,
    /// Free text. Always last on the line since it runs to the end.
    pub string: Option<String>,
}

const KEYWORDS: [&str; 8] = ["depth", "seldepth", "score", "nodes", "nps", "time", "pv", "string"];

impl EngineInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_uci(&self) -> String {
        self.to_string()
    }

    /// Parses an `info` line, skipping tokens it does not understand.
    /// Returns `None` for any other kind of line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.next() != Some("info") {
            return None;
        }

        let mut info = EngineInfo::new();
        while let Some(token) = tokens.next() {
            match token {
                "depth" => info.depth = parse_next(&mut tokens),
                "seldepth" => info.seldepth = parse_next(&mut tokens),
                "nodes" => info.nodes = parse_next(&mut tokens),
                "nps" => info.nps = parse_next(&mut tokens),
                "time" => info.time = parse_next(&mut tokens),
                "score" => {
                    info.score = match tokens.next() {
                        Some("cp") => parse_next(&mut tokens).map(Score::Cp),
                        Some("mate") => parse_next(&mut tokens).map(Score::Mate),
                        _ => None,
                    };
                    // Bound markers qualify the score; they are not kept.
                    while tokens.next_if(|t| matches!(*t, "lowerbound" | "upperbound")).is_some() {}
                }
                "pv" => {
                    while let Some(mv) = tokens.next_if(|t| !KEYWORDS.contains(t)) {
                        info.pv.push(mv.to_string());
                    }
                }
                "string" => {
                    info.string = Some(tokens.by_ref().collect::<Vec<_>>().join(" "));
                }
                _ => {}
            }
        }

        Some(info)
    }
}

fn parse_next<'a, T: FromStr>(tokens: &mut impl Iterator<Item = &'a str>) -> Option<T> {
    tokens.next().and_then(|t| t.parse().ok())
}

impl fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("info")?;
        if let Some(d) = self.depth {
            write!(f, " depth {}", d)?;
        }
        if let Some(d) = self.seldepth {
            write!(f, " seldepth {}", d)?;
        }
        if let Some(score) = self.score {
            write!(f, " score {}", score)?;
        }
        if let Some(n) = self.nodes {
            write!(f, " nodes {}", n)?;
        }
        if let Some(n) = self.nps {
            write!(f, " nps {}", n)?;
        }
        if let Some(t) = self.time {
            write!(f, " time {}", t)?;
        }
        if !self.pv.is_empty() {
            write!(f, " pv {}", self.pv.join(" "))?;
        }
        if let Some(ref s) = self.string {
            write!(f, " string {}", s)?;
        }
        Ok(())
    }
}

/// Builder for constructing EngineInfo.
#[derive(Default)]
pub struct InfoBuilder {
    info: EngineInfo,
}

impl InfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(mut self, d: u32) -> Self {
        self.info.depth = Some(d);
        self
    }

    pub fn score(mut self, score: Score) -> Self {
        self.info.score = Some(score);
        self
    }

    pub fn score_cp(self, cp: i32) -> Self {
        self.score(Score::Cp(cp))
    }

    pub fn score_mate(self, moves: i32) -> Self {
        self.score(Score::Mate(moves))
    }

    pub fn nodes(mut self, n: u64) -> Self {
        self.info.nodes = Some(n);
        self
    }

    pub fn time(mut self, ms: u64) -> Self {
        self.info.time = Some(ms);
        self
    }

    pub fn pv(mut self, moves: Vec<String>) -> Self {
        self.info.pv = moves;
        self
    }

    pub fn string(mut self, s: &str) -> Self {
        self.info.string = Some(s.to_string());
        self
    }

    pub fn build(self) -> EngineInfo {
        self.info
    }
}
