/// Food: a single cell that relocates when eaten.
/// Spawning does not avoid the snake, other food or boosts.

use rand::Rng;

use super::grid::{Grid, Pos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    pub position: Pos,
}

impl Food {
    pub fn new<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Self {
        let mut food = Food::at(Pos::default());
        food.spawn(grid, rng);
        food
    }

    pub fn at(position: Pos) -> Self {
        Food { position }
    }

    pub fn spawn<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) {
        self.position = grid.random_cell(rng);
    }
}
