use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::SessionRng;
use super::grid::Grid;
use super::types::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub position: Point,
    pub value: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FoodSpawnStrategy {
    /// Picks uniformly among the free cells directly.
    #[default]
    Exhaustive,
    /// Probes random cells up to `max_attempts` times, then falls back to
    /// [`FoodSpawnStrategy::Exhaustive`] so a full field is still detected.
    Rejection { max_attempts: u32 },
}

#[derive(Clone, Debug, Default)]
pub struct FoodSpawner {
    strategy: FoodSpawnStrategy,
}

impl FoodSpawner {
    pub fn new(strategy: FoodSpawnStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> FoodSpawnStrategy {
        self.strategy
    }

    /// A free cell chosen uniformly at random, or `None` when every cell of
    /// `grid` is in `occupied`.
    pub fn spawn(
        &self,
        grid: &Grid,
        occupied: &HashSet<Point>,
        rng: &mut SessionRng,
    ) -> Option<Point> {
        match self.strategy {
            FoodSpawnStrategy::Exhaustive => Self::pick_free_cell(grid, occupied, rng),
            FoodSpawnStrategy::Rejection { max_attempts } => {
                Self::sample_free_cell(grid, occupied, rng, max_attempts)
                    .or_else(|| Self::pick_free_cell(grid, occupied, rng))
            }
        }
    }

    fn pick_free_cell(
        grid: &Grid,
        occupied: &HashSet<Point>,
        rng: &mut SessionRng,
    ) -> Option<Point> {
        let taken = occupied.iter().filter(|cell| grid.contains(**cell)).count();
        let free = grid.cell_count().saturating_sub(taken);
        let index = rng.random_index(free)?;
        grid.cells().filter(|cell| !occupied.contains(cell)).nth(index)
    }

    fn sample_free_cell(
        grid: &Grid,
        occupied: &HashSet<Point>,
        rng: &mut SessionRng,
        max_attempts: u32,
    ) -> Option<Point> {
        for _ in 0..max_attempts {
            let x = rng.random_range(0..grid.width());
            let y = rng.random_range(0..grid.height());
            let pos = Point::new(x, y);
            if !occupied.contains(&pos) {
                return Some(pos);
            }
        }
        None
    }
}
