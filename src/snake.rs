use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::config::{GridSize, INITIAL_SNAKE_LENGTH};
use crate::input::{Direction, direction_change_is_valid};

/// Grid cell in logical coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the cell lies inside the grid on all four sides.
    #[must_use]
    pub fn is_within(self, grid: GridSize) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < grid.bound() && self.y < grid.bound()
    }

    /// Returns the neighbouring cell one step towards `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum DeathReason {
    Wall,
    SelfCollision,
}

/// Snake body, heading and pending growth.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    /// Direction of the last completed move; reversal checks use this.
    direction: Direction,
    /// Direction the next move will take.
    heading: Direction,
    grow_pending: bool,
}

impl Snake {
    /// Creates the start-of-game snake: centred, heading right, tail to the left.
    #[must_use]
    pub fn starting(grid: GridSize) -> Self {
        let center = grid.bound() / 2;
        let segments = (0..INITIAL_SNAKE_LENGTH as i32)
            .map(|offset| Cell::new(center - offset, center))
            .collect();

        Self::from_segments(segments, Direction::Right)
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>, direction: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");

        Self {
            body: VecDeque::from(segments),
            direction,
            heading: direction,
            grow_pending: false,
        }
    }

    /// Advances one cell along the heading, keeping the tail when growth is pending.
    pub fn move_forward(&mut self) {
        let next_head = self.next_head();
        self.direction = self.heading;

        self.body.push_front(next_head);
        if self.grow_pending {
            self.grow_pending = false;
        } else {
            let _ = self.body.pop_back();
        }
    }

    /// Makes the next [`Snake::move_forward`] lengthen the snake by one.
    pub fn grow(&mut self) {
        self.grow_pending = true;
    }

    /// Requests a new heading.
    ///
    /// Ignored when it reverses either the pending heading or the last move.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction_change_is_valid(self.heading, direction)
            && direction_change_is_valid(self.direction, direction)
        {
            self.heading = direction;
        }
    }

    /// Returns true if the head left the grid or overlaps the body.
    #[must_use]
    pub fn check_collision(&self, grid: GridSize) -> bool {
        self.collision(grid).is_some()
    }

    /// Like [`Snake::check_collision`], reporting which rule was broken.
    #[must_use]
    pub fn collision(&self, grid: GridSize) -> Option<DeathReason> {
        let head = self.head();
        if !head.is_within(grid) {
            return Some(DeathReason::Wall);
        }

        if self.body.iter().skip(1).any(|segment| *segment == head) {
            return Some(DeathReason::SelfCollision);
        }

        None
    }

    #[must_use]
    pub fn head(&self) -> Cell {
        // The body is never empty: constructors require a segment and
        // `move_forward` pushes before it pops.
        self.body[0]
    }

    /// Cell the head will occupy after the next move.
    #[must_use]
    pub fn next_head(&self) -> Cell {
        self.head().step(self.heading)
    }

    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Set of every cell covered by the body.
    #[must_use]
    pub fn occupied_cells(&self) -> HashSet<Cell> {
        self.body.iter().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn heading(&self) -> Direction {
        self.heading
    }

    #[must_use]
    pub fn is_growing(&self) -> bool {
        self.grow_pending
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}
