/// The snake: head-first body, heading, target length and flash flag.
///
/// `size` is the length the body is growing toward. A successful move adds
/// one head cell and drops at most one tail cell, so a jump in `size` is
/// caught up one cell per tick.

use std::collections::VecDeque;

use rand::Rng;

use super::grid::{Direction, Grid, Pos};

/// Result of a single `move_step`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    Moved { new_head: Pos },
    HitWall { at: Pos },
    HitSelf { at: Pos },
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Pos>,
    size: usize,
    direction: Direction,
    is_flashing: bool,
}

impl Snake {
    /// Fresh single-cell snake at the grid centre.
    pub fn new<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Self {
        let mut snake = Snake {
            body: VecDeque::new(),
            size: 1,
            direction: Direction::Right,
            is_flashing: false,
        };
        snake.reset(grid, rng);
        snake
    }

    /// Snake with an explicit body (head first).
    /// `size` is raised to the body length if smaller.
    pub fn with_body(body: impl IntoIterator<Item = Pos>, size: usize, direction: Direction) -> Self {
        let body: VecDeque<Pos> = body.into_iter().collect();
        let size = size.max(body.len()).max(1);
        Snake { body, size, direction, is_flashing: false }
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) {
        self.body.clear();
        self.body.push_back(grid.center());
        self.size = 1;
        self.direction = Direction::random(rng);
        self.is_flashing = false;
    }

    pub fn head(&self) -> Pos {
        // Body is never empty outside of a hand-built snake.
        self.body.front().copied().unwrap_or_default()
    }

    pub fn body(&self) -> &VecDeque<Pos> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_flashing(&self) -> bool {
        self.is_flashing
    }

    pub fn set_flashing(&mut self, on: bool) {
        self.is_flashing = on;
    }

    pub fn grow(&mut self, amount: usize) {
        self.size += amount;
    }

    /// Change heading. A 180° reversal is silently ignored.
    pub fn turn(&mut self, requested: Direction) {
        if requested != self.direction.opposite() {
            self.direction = requested;
        }
    }

    /// Advance one cell. On failure the body is left untouched.
    ///
    /// Self-collision skips the first two body cells: the current head and the
    /// cell right behind it.
    pub fn move_step(&mut self, grid: &Grid) -> MoveOutcome {
        let new_head = self.direction.step(self.head(), grid.block);

        if !grid.contains(new_head) {
            return MoveOutcome::HitWall { at: new_head };
        }
        if self.body.iter().skip(2).any(|&p| p == new_head) {
            return MoveOutcome::HitSelf { at: new_head };
        }

        self.body.push_front(new_head);
        if self.body.len() > self.size {
            self.body.pop_back();
        }
        MoveOutcome::Moved { new_head }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn p(x: i32, y: i32) -> Pos { Pos::new(x, y) }

    fn single(at: Pos, dir: Direction) -> Snake {
        Snake::with_body([at], 1, dir)
    }

    // ── Turning ──

    #[test]
    fn reversal_is_ignored() {
        for d in Direction::ALL {
            let mut s = single(p(400, 300), d);
            s.turn(d.opposite());
            assert_eq!(s.direction(), d);
        }
    }

    #[test]
    fn perpendicular_and_same_turns_apply() {
        for from in Direction::ALL {
            for to in Direction::ALL {
                if to == from.opposite() { continue; }
                let mut s = single(p(400, 300), from);
                s.turn(to);
                assert_eq!(s.direction(), to, "{from:?} -> {to:?}");
            }
        }
    }

    // ── Movement ──

    #[test]
    fn moves_until_wall_then_fails() {
        let g = Grid::default();
        let mut s = single(p(700, 300), Direction::Right);
        for i in 1..=4 {
            assert!(s.move_step(&g).is_moved());
            assert_eq!(s.head(), p(700 + 20 * i, 300));
        }
        assert_eq!(s.head(), p(780, 300));
        assert_eq!(s.move_step(&g), MoveOutcome::HitWall { at: p(800, 300) });
        // Unmoved
        assert_eq!(s.head(), p(780, 300));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn left_edge_fails_immediately() {
        let g = Grid::default();
        let mut s = single(p(0, 300), Direction::Left);
        assert!(!s.move_step(&g).is_moved());
        assert_eq!(s.body().iter().copied().collect::<Vec<_>>(), vec![p(0, 300)]);
    }

    #[test]
    fn top_edge_fails() {
        let g = Grid::default();
        let mut s = single(p(100, 0), Direction::Up);
        assert_eq!(s.move_step(&g), MoveOutcome::HitWall { at: p(100, -20) });
    }

    #[test]
    fn length_catches_up_one_cell_per_tick() {
        let g = Grid::default();
        let mut s = single(p(100, 100), Direction::Right);
        s.grow(3);
        assert_eq!(s.size(), 4);
        for tick in 1..=6usize {
            assert!(s.move_step(&g).is_moved());
            assert_eq!(s.len(), (1 + tick).min(4));
        }
    }

    #[test]
    fn no_growth_keeps_length() {
        let g = Grid::default();
        let mut s = Snake::with_body([p(100, 100), p(80, 100), p(60, 100)], 3, Direction::Right);
        for _ in 0..5 {
            assert!(s.move_step(&g).is_moved());
            assert_eq!(s.len(), 3);
        }
        assert_eq!(s.head(), p(200, 100));
        assert_eq!(s.body().back(), Some(&p(160, 100)));
    }

    #[test]
    fn runs_into_own_body() {
        let g = Grid::default();
        // Head at (100,100) heading up; body loops around to its left.
        //   (80,80) (100,80)
        //   (80,100) H(100,100)
        let body = [p(100, 100), p(120, 100), p(120, 80), p(100, 80), p(80, 80), p(80, 100)];
        let mut s = Snake::with_body(body, 6, Direction::Up);
        assert_eq!(s.move_step(&g), MoveOutcome::HitSelf { at: p(100, 80) });
        assert_eq!(s.len(), 6);
    }

    #[test]
    fn cell_behind_head_is_not_an_obstacle() {
        let g = Grid::default();
        // Length-2 snake. Build the reversal by hand (turn() refuses it).
        let mut s = Snake::with_body([p(100, 100), p(80, 100)], 2, Direction::Left);
        assert!(s.move_step(&g).is_moved());
        assert_eq!(s.head(), p(80, 100));
    }

    #[test]
    fn third_cell_is_an_obstacle() {
        let g = Grid::default();
        let mut s = Snake::with_body([p(100, 100), p(100, 80), p(80, 80), p(80, 100)], 4, Direction::Left);
        assert_eq!(s.move_step(&g), MoveOutcome::HitSelf { at: p(80, 100) });
    }

    #[test]
    fn reset_returns_to_centre() {
        let g = Grid::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut s = Snake::with_body([p(0, 0), p(20, 0)], 5, Direction::Left);
        s.set_flashing(true);
        s.reset(&g, &mut rng);
        assert_eq!(s.len(), 1);
        assert_eq!(s.size(), 1);
        assert_eq!(s.head(), p(400, 300));
        assert!(!s.is_flashing());
    }

    #[test]
    fn with_body_keeps_size_at_least_length() {
        let s = Snake::with_body([p(0, 0), p(20, 0), p(40, 0)], 1, Direction::Left);
        assert_eq!(s.size(), 3);
    }
}
