/// Grid geometry: positions, directions and the playfield bounds.
///
/// Coordinates are pixels on a lattice of `block`-sized cells, so a step
/// moves a position by exactly one block.

use rand::Rng;

use crate::config::GridConfig;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The neighbouring cell one block away.
    pub fn step(self, from: Pos, block: i32) -> Pos {
        let (dx, dy) = match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        };
        Pos::new(from.x + dx * block, from.y + dy * block)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Playfield bounds. `[0, width) x [0, height)`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub block: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32, block: i32) -> Self {
        Grid { width, height, block }
    }

    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    pub fn center(&self) -> Pos {
        Pos::new(self.width / 2, self.height / 2)
    }

    /// Block size used as a divisor. Unvalidated grids (see
    /// `GridConfig::validate`) are treated as having a block of at least 1.
    #[inline]
    fn divisor(&self) -> i32 {
        self.block.max(1)
    }

    /// Number of cells across / down.
    pub fn columns(&self) -> i32 {
        self.width / self.divisor()
    }

    pub fn rows(&self) -> i32 {
        self.height / self.divisor()
    }

    /// Uniform random aligned cell. Draws x first, then y.
    ///
    /// A grid smaller than one block yields the origin.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Pos {
        let b = self.divisor();
        let x = rng.gen_range(0..=((self.width - b) / b).max(0)) * b;
        let y = rng.gen_range(0..=((self.height - b) / b).max(0)) * b;
        Pos::new(x, y)
    }

    /// Cell coordinates of a position (column, row).
    pub fn cell_of(&self, p: Pos) -> (i32, i32) {
        (p.x / self.divisor(), p.y / self.divisor())
    }
}

impl From<GridConfig> for Grid {
    fn from(cfg: GridConfig) -> Self {
        Grid::new(cfg.width, cfg.height, cfg.block_size)
    }
}

impl Default for Grid {
    fn default() -> Self {
        GridConfig::default().into()
    }
}
