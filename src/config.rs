use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const APP_DIR_NAME: &str = "grid-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Side length of the default square grid.
pub const DEFAULT_GRID_SIZE: u16 = 20;

/// Smallest grid that still fits the starting snake with room to turn.
pub const MIN_GRID_SIZE: u16 = 4;

/// Largest grid accepted from configuration.
pub const MAX_GRID_SIZE: u16 = 256;

/// Frames between two logical moves.
pub const DEFAULT_MOVE_CADENCE: u32 = 10;

/// Points awarded for each food eaten.
pub const FOOD_SCORE_INCREMENT: u32 = 10;

/// Segment count of a freshly spawned snake.
pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Driver frame rate.
pub const DEFAULT_FRAMES_PER_SECOND: u32 = 60;

/// Upper bound for the driver frame rate.
pub const MAX_FRAMES_PER_SECOND: u32 = 240;

/// Square grid dimensions.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct GridSize {
    pub side: u16,
}

impl GridSize {
    #[must_use]
    pub fn new(side: u16) -> Self {
        Self { side }
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.side) * usize::from(self.side)
    }

    /// Side length as a signed coordinate bound.
    #[must_use]
    pub fn bound(self) -> i32 {
        i32::from(self.side)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

/// Construction-time game constants.
///
/// Values come from the defaults, then an optional JSON file, then the
/// command line. Nothing here changes once a [`crate::game::GameState`] is
/// built from it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub grid_size: u16,
    /// Ticks per logical move.
    pub move_cadence: u32,
    pub food_score: u32,
    pub frames_per_second: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            move_cadence: DEFAULT_MOVE_CADENCE,
            food_score: FOOD_SCORE_INCREMENT,
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn grid(&self) -> GridSize {
        GridSize::new(self.grid_size)
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::Invalid {
                field: "grid_size",
                reason: format!(
                    "must be between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}, got {}",
                    self.grid_size
                ),
            });
        }

        if self.move_cadence == 0 {
            return Err(ConfigError::Invalid {
                field: "move_cadence",
                reason: "must be at least 1".to_owned(),
            });
        }

        if self.food_score == 0 {
            return Err(ConfigError::Invalid {
                field: "food_score",
                reason: "must be at least 1".to_owned(),
            });
        }

        if !(1..=MAX_FRAMES_PER_SECOND).contains(&self.frames_per_second) {
            return Err(ConfigError::Invalid {
                field: "frames_per_second",
                reason: format!(
                    "must be between 1 and {MAX_FRAMES_PER_SECOND}, got {}",
                    self.frames_per_second
                ),
            });
        }

        Ok(())
    }

    /// Reads and validates a JSON config file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the default config file when it exists.
    ///
    /// Returns `Ok(None)` on first run, when there is no file yet.
    pub fn load_default() -> Result<Option<Self>, ConfigError> {
        let Some(path) = default_config_path() else {
            return Ok(None);
        };

        match Self::load_from_path(&path) {
            Ok(config) => Ok(Some(config)),
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}

/// Returns the platform-correct config file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let mut base = dirs::config_dir()?;
    base.push(APP_DIR_NAME);
    base.push(CONFIG_FILE_NAME);
    Some(base)
}
