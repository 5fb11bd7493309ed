//! Minimax chess engine.
//!
//! Speaks UCI on stdin/stdout by default. With `--interactive` it starts a
//! console where moves can be typed and the engine asked to reply.
//!
//! Logs go to stderr and are filtered with `RUST_LOG`.

mod console;
mod uci_loop;

use std::path::PathBuf;

use anyhow::Context;
use chess_search::SearchConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use console::Console;
use uci_loop::UciSession;

/// Minimax chess engine with alpha-beta search.
#[derive(Parser)]
#[command(name = "bot-minimax")]
#[command(about = "Minimax chess engine speaking UCI")]
struct Args {
    /// Search depth in plies (overrides the config file)
    #[arg(long)]
    depth: Option<u32>,

    /// TOML file with search settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start the interactive console instead of the UCI loop
    #[arg(long)]
    interactive: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SearchConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(depth) = args.depth {
        config.max_depth = depth;
    }
    tracing::info!("search config: {:?}", config);

    if args.interactive {
        let stdin = std::io::stdin();
        Console::new(config, std::io::stdout()).run(stdin.lock())?;
    } else {
        let mut engine = uci::stdio_engine();
        UciSession::new(config)
            .run(&mut engine)
            .context("UCI session failed")?;
    }

    Ok(())
}
