use anyhow::{Context, Result};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tui_snake::game::{GameEngine, GameMode};
use tui_snake::modes::HumanMode;
use tui_snake::score::{JsonFileStore, Scoreboard};

#[derive(Parser)]
#[command(name = "tui_snake")]
#[command(version, about = "Snake in the terminal")]
struct Cli {
    /// Preset to start from
    #[arg(long, value_enum, default_value_t = GameMode::Standard)]
    mode: GameMode,

    /// Board side length in pixels (overrides the preset)
    #[arg(long)]
    board_size: Option<u32>,

    /// Cell side length in pixels (overrides the preset)
    #[arg(long)]
    cell_size: Option<u32>,

    /// Keep the starting speed for the whole game
    #[arg(long)]
    no_dynamic_difficulty: bool,

    /// Where the high score is kept
    #[arg(long, default_value = "snake_high_score.json")]
    high_score_file: PathBuf,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (filtered by RUST_LOG, default info)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    // Start from the preset and apply command line overrides
    let mut config = cli.mode.config();
    if let Some(board_size) = cli.board_size {
        config.board_size = board_size;
    }
    if let Some(cell_size) = cli.cell_size {
        config.cell_size = cell_size;
    }
    if cli.no_dynamic_difficulty {
        config.dynamic_difficulty = false;
    }

    let scoreboard = Scoreboard::load(Box::new(JsonFileStore::new(&cli.high_score_file)));
    let engine = match cli.seed {
        Some(seed) => GameEngine::with_rng(config, scoreboard.high_score, StdRng::seed_from_u64(seed)),
        None => GameEngine::new(config, scoreboard.high_score),
    }
    .context("Invalid game configuration")?;

    info!(
        mode = cli.mode.name(),
        grid = engine.grid_count(),
        high_score = scoreboard.high_score,
        "starting game"
    );

    let mut human_mode = HumanMode::new(engine, scoreboard);
    human_mode.run().await?;

    Ok(())
}

/// Logs go to a file when asked for; the terminal belongs to the game.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}
