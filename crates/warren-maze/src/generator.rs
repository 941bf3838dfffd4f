//! Seeded perfect-maze generation.
//!
//! Carves a spanning tree over the logical cells with an iterative
//! recursive backtracker: every logical cell is reachable from every
//! other by exactly one path.

use rand::seq::IndexedRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use warren_core::{ConfigError, Direction, Position};

use crate::grid::{Cell, Grid};
use crate::maze::Maze;
use crate::placement::Placement;

/// Deterministic maze generator.
///
/// Two generators built from the same seed produce the same sequence of
/// mazes.
pub struct MazeGenerator {
    rng: ChaCha8Rng,
}

impl MazeGenerator {
    /// A generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Carve a perfect maze of logical size `size` on a
    /// `(2 * size + 1)`-square grid.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyMaze`] for `size == 0`,
    /// [`ConfigError::MazeTooLarge`] above [`MAX_SIZE`](crate::MAX_SIZE).
    pub fn generate(&mut self, size: u32) -> Result<Grid, ConfigError> {
        let mut grid = Grid::walled(size)?;
        let n = size as usize;
        let mut seen = vec![false; n * n];
        let mut stack = vec![(0usize, 0usize)];
        seen[0] = true;
        grid.set(centre(0, 0), Cell::Path);

        while let Some(&(r, c)) = stack.last() {
            let fresh: Vec<(usize, usize)> = Direction::ALL
                .into_iter()
                .filter_map(|d| neighbour(r, c, d, n))
                .filter(|&(nr, nc)| !seen[nr * n + nc])
                .collect();
            let Some(&(nr, nc)) = fresh.choose(&mut self.rng) else {
                stack.pop();
                continue;
            };
            // Open the wall cell between the two centres.
            let (from, to) = (centre(r, c), centre(nr, nc));
            grid.set(
                Position::new((from.row + to.row) / 2, (from.col + to.col) / 2),
                Cell::Path,
            );
            grid.set(to, Cell::Path);
            seen[nr * n + nc] = true;
            stack.push((nr, nc));
        }
        Ok(grid)
    }

    /// Generate a grid and place start and end on it.
    pub fn generate_maze(
        &mut self,
        size: u32,
        start: Placement,
        end: Placement,
    ) -> Result<Maze, ConfigError> {
        let grid = self.generate(size)?;
        Maze::place(grid, start, end, &mut self.rng)
    }

    /// Direct access to the generator's RNG, for callers that place goals
    /// themselves.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

fn centre(r: usize, c: usize) -> Position {
    Position::new(2 * r as i32 + 1, 2 * c as i32 + 1)
}

fn neighbour(r: usize, c: usize, d: Direction, n: usize) -> Option<(usize, usize)> {
    let (dr, dc) = d.offset();
    let nr = r.checked_add_signed(dr as isize)?;
    let nc = c.checked_add_signed(dc as isize)?;
    (nr < n && nc < n).then_some((nr, nc))
}
