use std::collections::HashSet;

use rand::Rng;

use crate::config::GridSize;
use crate::snake::Cell;

/// Random draws tried before falling back to scanning for free cells.
pub const MAX_RANDOM_SPAWN_ATTEMPTS: usize = 64;

/// The single food item on the board, if any.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct Food {
    position: Option<Cell>,
}

impl Food {
    #[must_use]
    pub fn at(cell: Cell) -> Self {
        Self {
            position: Some(cell),
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self { position: None }
    }

    #[must_use]
    pub fn position(self) -> Option<Cell> {
        self.position
    }

    /// Returns true when the food sits on `cell`.
    #[must_use]
    pub fn is_at(self, cell: Cell) -> bool {
        self.position == Some(cell)
    }

    /// Moves the food to a uniformly random cell outside `occupied`.
    ///
    /// Returns the new cell, or `None` when every cell is occupied; the food
    /// is then cleared.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        grid: GridSize,
        occupied: &HashSet<Cell>,
    ) -> Option<Cell> {
        self.position = spawn_position(rng, grid, occupied);
        self.position
    }
}

/// Picks a free cell: rejection sampling first, then an exhaustive scan.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    grid: GridSize,
    occupied: &HashSet<Cell>,
) -> Option<Cell> {
    if occupied.len() >= grid.total_cells() {
        return None;
    }

    for _ in 0..MAX_RANDOM_SPAWN_ATTEMPTS {
        let candidate = Cell::new(rng.gen_range(0..grid.bound()), rng.gen_range(0..grid.bound()));
        if !occupied.contains(&candidate) {
            return Some(candidate);
        }
    }

    let free: Vec<Cell> = (0..grid.bound())
        .flat_map(|y| (0..grid.bound()).map(move |x| Cell::new(x, y)))
        .filter(|cell| !occupied.contains(cell))
        .collect();

    if free.is_empty() {
        return None;
    }

    Some(free[rng.gen_range(0..free.len())])
}
