//! Chess Play - Play chess against the computer in a terminal.
//!
//! Reads moves from standard input and prints an ASCII board after each
//! turn. With `--self-play` the computer plays both sides unattended.

mod config;
mod session;

use anyhow::Context;
use chess_ai::Difficulty;
use chess_core::Color;
use chess_engine::GameState;
use clap::Parser;
use config::PlayConfig;
use session::Session;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Play chess against the computer.
#[derive(Parser)]
#[command(name = "chess-play")]
#[command(about = "Play chess against the computer in a terminal")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value_os_t = PlayConfig::config_path())]
    config: PathBuf,

    /// Opponent difficulty (easy, medium, hard, reactive, average, world-champion)
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Upper bound on the search depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Play as black instead of the configured color
    #[arg(long)]
    black: bool,

    /// Starting position as FEN
    #[arg(long)]
    fen: Option<String>,

    /// Let the computer play itself for up to N plies (defaults to the config value)
    #[arg(long, num_args = 0..=1, default_missing_value = "0")]
    self_play: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut config = PlayConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(difficulty) = args.difficulty {
        config.ai.difficulty = difficulty;
    }
    if args.seed.is_some() {
        config.ai.seed = args.seed;
    }
    if args.max_depth.is_some() {
        config.ai.max_depth = args.max_depth;
    }
    if args.black {
        config.human_color = Color::Black;
    }

    let game = match &args.fen {
        Some(fen) => GameState::from_fen(fen).with_context(|| format!("invalid FEN: {}", fen))?,
        None => GameState::new(),
    };

    tracing::info!("Difficulty: {}", config.ai.difficulty);
    tracing::info!("Search depth: {}", config.ai.profile().depth);

    let mut session = Session::new(game, config.ai.build_selector());
    let mut stdout = io::stdout().lock();
    let outcome = match args.self_play {
        Some(plies) => {
            let plies = if plies == 0 { config.self_play_plies } else { plies };
            tracing::info!("Self-play for up to {} plies", plies);
            session.self_play(plies, &mut stdout)?
        }
        None => session.run(config.human_color, io::stdin().lock(), &mut stdout)?,
    };
    tracing::info!("Game over: {}", outcome);
    Ok(())
}
