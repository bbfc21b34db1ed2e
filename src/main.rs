use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use grid_snake::config::GameConfig;
use grid_snake::error::AppError;
use grid_snake::game::GameState;
use grid_snake::input::{GameInput, InputHandler};
use grid_snake::logging;
use grid_snake::terminal_runtime::TerminalSession;
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square grid.
    #[arg(long)]
    grid_size: Option<u16>,

    /// Frames between two snake moves.
    #[arg(long)]
    move_cadence: Option<u32>,

    /// Points per food eaten.
    #[arg(long)]
    food_score: Option<u32>,

    /// Frame rate of the render loop.
    #[arg(long)]
    fps: Option<u32>,

    /// Seed for food placement, for reproducible games.
    #[arg(long)]
    seed: Option<u64>,

    /// Write `tracing` events to this file (filter with RUST_LOG).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("grid-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    logging::init(cli.log_file.as_deref())?;
    let config = resolve_config(&cli)?;
    info!(?config, "starting");

    let mut state = match cli.seed {
        Some(seed) => GameState::new_with_seed(config, seed),
        None => GameState::new(config),
    };
    let mut input = InputHandler::new();
    let mut session = TerminalSession::enter()?;
    let frame_duration = Duration::from_secs(1) / config.frames_per_second;

    loop {
        let frame_start = Instant::now();

        if let Some(command) = input.poll_input()? {
            if command == GameInput::Quit {
                break;
            }
            state.apply_input(command);
        }

        state.tick();
        session.draw(&state.snapshot())?;

        if let Some(remaining) = frame_duration.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    info!(score = state.score(), "quit");
    Ok(())
}

/// Defaults, then the config file, then command-line overrides.
fn resolve_config(cli: &Cli) -> Result<GameConfig, AppError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load_from_path(path)?,
        None => GameConfig::load_default()?.unwrap_or_default(),
    };

    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    if let Some(move_cadence) = cli.move_cadence {
        config.move_cadence = move_cadence;
    }
    if let Some(food_score) = cli.food_score {
        config.food_score = food_score;
    }
    if let Some(fps) = cli.fps {
        config.frames_per_second = fps;
    }

    config.validate()?;
    Ok(config)
}
