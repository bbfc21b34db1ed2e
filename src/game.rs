use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{GameConfig, GridSize};
use crate::food::Food;
use crate::input::{Direction, GameInput};
use crate::snake::{Cell, DeathReason, Snake};

/// High-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum GameStatus {
    Running,
    GameOver,
    /// The snake fills the grid and no food can be placed.
    Victory,
}

impl GameStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Read-only view of one frame, handed to the presentation layer.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    /// Head first.
    pub segments: Vec<Cell>,
    pub food: Option<Cell>,
    pub score: u32,
    pub status: GameStatus,
    pub game_over: bool,
    pub death_reason: Option<DeathReason>,
    pub heading: Direction,
    pub grid: GridSize,
}

/// Owns every piece of mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    snake: Snake,
    food: Food,
    score: u32,
    status: GameStatus,
    death_reason: Option<DeathReason>,
    /// Ticks since the last logical move.
    frame_counter: u32,
    moves: u64,
    rng: StdRng,
}

impl GameState {
    /// Creates a fresh game seeded from OS entropy.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Creates a running game from a prepared layout.
    ///
    /// The food is taken as given; callers are responsible for keeping it off
    /// the snake.
    #[must_use]
    pub fn from_parts(config: GameConfig, snake: Snake, food: Food, seed: u64) -> Self {
        Self {
            config,
            snake,
            food,
            score: 0,
            status: GameStatus::Running,
            death_reason: None,
            frame_counter: 0,
            moves: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn with_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let snake = Snake::starting(config.grid());
        let mut food = Food::none();
        food.spawn(&mut rng, config.grid(), &snake.occupied_cells());

        Self {
            config,
            snake,
            food,
            score: 0,
            status: GameStatus::Running,
            death_reason: None,
            frame_counter: 0,
            moves: 0,
            rng,
        }
    }

    /// Advances one frame; every `move_cadence` frames the snake moves once.
    pub fn tick(&mut self) {
        if self.status != GameStatus::Running {
            return;
        }

        self.frame_counter += 1;
        if self.frame_counter < self.config.move_cadence {
            return;
        }

        self.frame_counter = 0;
        self.step();
    }

    /// Performs exactly one logical move.
    fn step(&mut self) {
        let eats = self.food.is_at(self.snake.next_head());
        if eats {
            self.snake.grow();
        }

        self.snake.move_forward();
        self.moves += 1;

        if let Some(reason) = self.snake.collision(self.config.grid()) {
            self.status = GameStatus::GameOver;
            self.death_reason = Some(reason);
            info!(
                score = self.score,
                length = self.snake.len(),
                moves = self.moves,
                ?reason,
                "game over"
            );
            return;
        }

        if eats {
            self.score = self.score.saturating_add(self.config.food_score);
            let occupied = self.snake.occupied_cells();
            let spawned = self.food.spawn(&mut self.rng, self.config.grid(), &occupied);
            debug!(
                score = self.score,
                length = self.snake.len(),
                food = ?spawned,
                "food eaten"
            );

            if spawned.is_none() {
                self.status = GameStatus::Victory;
                info!(score = self.score, moves = self.moves, "grid filled");
            }
        }
    }

    /// Steers the snake; ignored once the game has ended.
    pub fn handle_input(&mut self, direction: Direction) {
        if self.status == GameStatus::Running {
            self.snake.set_direction(direction);
        }
    }

    /// Applies one external input event.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => self.handle_input(direction),
            GameInput::Reset => {
                let _ = self.reset();
            }
            GameInput::Quit => {}
        }
    }

    /// Starts a new game after the previous one ended.
    ///
    /// Returns `false`, leaving the state untouched, while a game is still
    /// running.
    pub fn reset(&mut self) -> bool {
        if !self.status.is_terminal() {
            return false;
        }

        let grid = self.config.grid();
        self.snake = Snake::starting(grid);
        self.food.spawn(&mut self.rng, grid, &self.snake.occupied_cells());
        self.score = 0;
        self.status = GameStatus::Running;
        self.death_reason = None;
        self.frame_counter = 0;
        self.moves = 0;
        debug!("game reset");
        true
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            segments: self.snake.segments().copied().collect(),
            food: self.food.position(),
            score: self.score,
            status: self.status,
            game_over: self.status == GameStatus::GameOver,
            death_reason: self.death_reason,
            heading: self.snake.heading(),
            grid: self.config.grid(),
        }
    }

    #[must_use]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[must_use]
    pub fn food(&self) -> Food {
        self.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    #[must_use]
    pub fn death_reason(&self) -> Option<DeathReason> {
        self.death_reason
    }

    /// Logical moves since the last reset.
    #[must_use]
    pub fn moves(&self) -> u64 {
        self.moves
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::config::{FOOD_SCORE_INCREMENT, GameConfig};
    use crate::food::Food;
    use crate::input::{Direction, GameInput};
    use crate::snake::{Cell, DeathReason, Snake};

    use super::{GameState, GameStatus};

    fn every_tick() -> GameConfig {
        GameConfig {
            move_cadence: 1,
            ..GameConfig::default()
        }
    }

    fn assert_invariants(state: &GameState) {
        let snapshot = state.snapshot();
        let unique: HashSet<Cell> = snapshot.segments.iter().copied().collect();
        if let Some(food) = snapshot.food {
            assert!(!unique.contains(&food), "food {food:?} on snake");
        }
        if snapshot.status == GameStatus::Running {
            assert_eq!(unique.len(), snapshot.segments.len(), "segments overlap");
            assert!(snapshot.segments[0].is_within(snapshot.grid));
        }
    }

    #[test]
    fn new_game_starts_running_with_food_off_the_snake() {
        let state = GameState::new_with_seed(GameConfig::default(), 1);

        assert_eq!(state.status(), GameStatus::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.snake().len(), 3);
        assert!(state.food().position().is_some());
        assert_invariants(&state);
    }

    #[test]
    fn snake_moves_once_per_cadence_window() {
        let mut state = GameState::new_with_seed(GameConfig::default(), 2);

        for _ in 0..9 {
            state.tick();
        }
        assert_eq!(state.moves(), 0);

        state.tick();
        assert_eq!(state.moves(), 1);
    }

    #[test]
    fn eating_grows_on_the_same_move_and_scores_ten() {
        let config = every_tick();
        let snake = Snake::starting(config.grid());
        let mut state = GameState::from_parts(config, snake, Food::at(Cell::new(11, 10)), 4);

        state.tick();

        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.score(), FOOD_SCORE_INCREMENT);
        assert_eq!(state.score(), 10);
        assert_ne!(state.score(), 100);
        assert_invariants(&state);
    }

    #[test]
    fn length_tracks_eat_events_over_a_run() {
        let mut state = GameState::new_with_seed(every_tick(), 9);
        let mut eaten = 0;

        // Sweep rows so the snake stays alive for a while.
        for tick in 0..300 {
            if state.status() != GameStatus::Running {
                break;
            }
            let head = state.snake().head();
            let turn = match state.snake().heading() {
                Direction::Right if head.x == 19 => Some(Direction::Down),
                Direction::Down if head.x == 19 => Some(Direction::Left),
                Direction::Left if head.x == 0 => Some(Direction::Down),
                Direction::Down if head.x == 0 => Some(Direction::Right),
                _ => None,
            };
            if let Some(direction) = turn {
                state.handle_input(direction);
            }

            // Put food in the path every few moves.
            let next = state.snake().next_head();
            if tick % 4 == 0 && next.is_within(state.config().grid()) {
                state.food = Food::at(next);
            }

            let before = state.score();
            state.tick();
            if state.score() > before {
                eaten += 1;
                assert_eq!(state.snake().len(), 3 + eaten);
            }
            assert_invariants(&state);
        }

        assert!(eaten >= 3, "only {eaten} eat events");
        assert_eq!(state.snake().len(), 3 + eaten);
    }

    #[test]
    fn reverse_of_pending_heading_is_ignored() {
        let mut state = GameState::new_with_seed(GameConfig::default(), 1);

        state.handle_input(Direction::Up);
        state.handle_input(Direction::Down);

        assert_eq!(state.snake().heading(), Direction::Up);
        assert_eq!(state.snapshot().heading, Direction::Up);
    }

    #[test]
    fn huge_food_score_saturates_instead_of_overflowing() {
        let config = GameConfig {
            food_score: u32::MAX / 2 + 1,
            ..every_tick()
        };
        assert!(config.validate().is_ok());
        let snake = Snake::starting(config.grid());
        let mut state = GameState::from_parts(config, snake, Food::at(Cell::new(11, 10)), 13);

        state.tick();
        state.food = Food::at(state.snake().next_head());
        state.tick();

        assert_eq!(state.score(), u32::MAX);
        assert_eq!(state.snake().len(), 5);
        assert_eq!(state.status(), GameStatus::Running);
    }

    #[test]
    fn left_wall_ends_the_game_and_freezes_state() {
        let config = every_tick();
        let snake = Snake::from_segments(
            vec![Cell::new(1, 5), Cell::new(2, 5), Cell::new(3, 5)],
            Direction::Left,
        );
        let mut state = GameState::from_parts(config, snake, Food::at(Cell::new(10, 10)), 5);

        state.tick();
        assert_eq!(state.status(), GameStatus::Running);
        state.tick();

        assert!(state.snake().check_collision(config.grid()));
        assert_eq!(state.status(), GameStatus::GameOver);
        assert_eq!(state.death_reason(), Some(DeathReason::Wall));

        let frozen = state.snapshot();
        for _ in 0..5 {
            state.handle_input(Direction::Up);
            state.tick();
        }
        assert_eq!(state.snapshot(), frozen);
    }

    #[test]
    fn top_wall_is_a_collision() {
        let config = every_tick();
        let snake = Snake::from_segments(vec![Cell::new(4, 0)], Direction::Up);
        let mut state = GameState::from_parts(config, snake, Food::at(Cell::new(10, 10)), 6);

        state.tick();

        assert_eq!(state.status(), GameStatus::GameOver);
        assert_eq!(state.death_reason(), Some(DeathReason::Wall));
    }

    #[test]
    fn reset_is_ignored_while_running() {
        let mut state = GameState::new_with_seed(every_tick(), 7);
        state.tick();
        let before = state.snapshot();

        assert!(!state.reset());
        state.apply_input(GameInput::Reset);

        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn reset_after_game_over_restores_start_of_game() {
        let config = every_tick();
        let snake = Snake::from_segments(
            vec![Cell::new(11, 0), Cell::new(10, 0), Cell::new(9, 0)],
            Direction::Right,
        );
        let mut state = GameState::from_parts(config, snake, Food::at(Cell::new(12, 0)), 8);
        state.tick();
        state.handle_input(Direction::Up);
        state.tick();
        assert!(state.is_game_over());
        assert_eq!(state.score(), 10);

        assert!(state.reset());

        assert_eq!(state.status(), GameStatus::Running);
        assert_eq!(state.score(), 0);
        assert_eq!(state.snake().len(), 3);
        assert_eq!(state.snake().head(), Cell::new(10, 10));
        assert_eq!(state.snake().heading(), Direction::Right);
        assert_eq!(state.death_reason(), None);
        assert!(state.food().position().is_some());
        assert_invariants(&state);
    }

    #[test]
    fn filling_the_grid_is_a_victory() {
        let config = GameConfig {
            grid_size: 4,
            move_cadence: 1,
            ..GameConfig::default()
        };
        // Serpentine covering 15 of 16 cells; (0, 3) is the only free cell.
        let snake = Snake::from_segments(
            vec![
                Cell::new(1, 3),
                Cell::new(2, 3),
                Cell::new(3, 3),
                Cell::new(3, 2),
                Cell::new(2, 2),
                Cell::new(1, 2),
                Cell::new(0, 2),
                Cell::new(0, 1),
                Cell::new(1, 1),
                Cell::new(2, 1),
                Cell::new(3, 1),
                Cell::new(3, 0),
                Cell::new(2, 0),
                Cell::new(1, 0),
                Cell::new(0, 0),
            ],
            Direction::Left,
        );
        let mut state = GameState::from_parts(config, snake, Food::at(Cell::new(0, 3)), 9);

        state.tick();

        assert_eq!(state.status(), GameStatus::Victory);
        assert_eq!(state.snake().len(), 16);
        assert_eq!(state.food().position(), None);
        assert!(!state.snapshot().game_over);

        assert!(state.reset());
        assert_eq!(state.status(), GameStatus::Running);
    }

    #[test]
    fn input_after_game_over_is_ignored() {
        let config = every_tick();
        let snake = Snake::from_segments(vec![Cell::new(19, 3)], Direction::Right);
        let mut state = GameState::from_parts(config, snake, Food::at(Cell::new(0, 0)), 10);
        state.tick();
        assert!(state.is_game_over());

        state.apply_input(GameInput::Direction(Direction::Down));

        assert_eq!(state.snake().heading(), Direction::Right);
    }

    #[test]
    fn snapshot_serializes_for_presentation() {
        let state = GameState::new_with_seed(GameConfig::default(), 12);

        let json = serde_json::to_value(state.snapshot()).expect("snapshot should serialize");

        assert_eq!(json["score"], 0);
        assert_eq!(json["status"], "Running");
        assert_eq!(json["game_over"], false);
        assert_eq!(json["segments"][0]["x"], 10);
        assert_eq!(json["grid"]["side"], 20);
    }
}
