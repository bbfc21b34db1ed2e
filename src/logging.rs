use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

const DEFAULT_FILTER: &str = "grid_snake=info";

/// Installs a file-backed `tracing` subscriber.
///
/// The terminal belongs to the game screen, so events only go somewhere when
/// a log file is given. `RUST_LOG` overrides the default filter.
pub fn init(log_file: Option<&Path>) -> Result<(), AppError> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| AppError::Logging(error.to_string()))
}
