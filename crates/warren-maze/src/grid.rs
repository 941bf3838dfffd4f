//! Square wall/path grids without goal positions.

use warren_core::{ConfigError, Position};

/// Largest supported logical maze size.
pub const MAX_SIZE: u32 = 2048;

/// Largest supported grid dimension, `2 * MAX_SIZE + 1`.
pub const MAX_SIZE_MATRIX: u32 = 2 * MAX_SIZE + 1;

/// Kind of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Impassable.
    Wall,
    /// Walkable.
    Path,
}

/// A validated square grid of odd dimension `2 * size + 1`.
///
/// Cells are stored row-major. Logical maze cells sit on odd
/// coordinates; even rows and columns hold the walls (or openings)
/// between them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    size_matrix: u32,
}

impl Grid {
    /// A grid of the given logical `size` with every cell a wall.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyMaze`] for `size == 0`,
    /// [`ConfigError::MazeTooLarge`] above [`MAX_SIZE`].
    pub fn walled(size: u32) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyMaze);
        }
        if size > MAX_SIZE {
            return Err(ConfigError::MazeTooLarge {
                size_matrix: 2 * u64::from(size) + 1,
                max: MAX_SIZE_MATRIX,
            });
        }
        let size_matrix = 2 * size + 1;
        Ok(Self {
            cells: vec![Cell::Wall; (size_matrix as usize) * (size_matrix as usize)],
            size_matrix,
        })
    }

    /// Build a grid from rows of cells.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyMaze`] for no rows,
    /// [`ConfigError::NotSquare`] if any row length differs from the row
    /// count, [`ConfigError::EvenDimension`] for an even dimension and
    /// [`ConfigError::MazeTooLarge`] above [`MAX_SIZE_MATRIX`] rows.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, ConfigError> {
        let n = rows.len();
        if n == 0 {
            return Err(ConfigError::EmptyMaze);
        }
        if n > MAX_SIZE_MATRIX as usize {
            return Err(ConfigError::MazeTooLarge {
                size_matrix: n as u64,
                max: MAX_SIZE_MATRIX,
            });
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != n) {
            return Err(ConfigError::NotSquare {
                rows: n,
                cols: bad.len(),
            });
        }
        if n % 2 == 0 {
            return Err(ConfigError::EvenDimension { size_matrix: n });
        }
        Ok(Self {
            cells: rows.into_iter().flatten().collect(),
            size_matrix: n as u32,
        })
    }

    /// Grid dimension including the wall border.
    pub fn size_matrix(&self) -> u32 {
        self.size_matrix
    }

    /// Logical maze size: `(size_matrix - 1) / 2`.
    pub fn size(&self) -> u32 {
        (self.size_matrix - 1) / 2
    }

    /// Whether `pos` lies within `[0, size_matrix)` on both axes.
    pub fn in_bounds(&self, pos: Position) -> bool {
        let n = self.size_matrix as i32;
        (0..n).contains(&pos.row) && (0..n).contains(&pos.col)
    }

    /// The cell at `pos`, or `None` outside the grid.
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Overwrite the cell at `pos`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// Iterate over every path cell in row-major order.
    pub fn path_cells(&self) -> impl Iterator<Item = Position> + '_ {
        let n = self.size_matrix as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Path)
            .map(move |(i, _)| Position::new((i / n) as i32, (i % n) as i32))
    }

    /// Iterate over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size_matrix as usize)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.row as usize * self.size_matrix as usize + pos.col as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walled_grid_has_odd_dimension() {
        let g = Grid::walled(3).unwrap();
        assert_eq!(g.size_matrix(), 7);
        assert_eq!(g.size(), 3);
        assert_eq!(g.path_cells().count(), 0);
    }

    #[test]
    fn walled_rejects_zero_size() {
        assert_eq!(Grid::walled(0), Err(ConfigError::EmptyMaze));
    }

    #[test]
    fn walled_rejects_sizes_above_the_limit() {
        assert_eq!(Grid::walled(MAX_SIZE).unwrap().size_matrix(), MAX_SIZE_MATRIX);
        assert_eq!(
            Grid::walled(MAX_SIZE + 1),
            Err(ConfigError::MazeTooLarge {
                size_matrix: u64::from(MAX_SIZE_MATRIX) + 2,
                max: MAX_SIZE_MATRIX,
            })
        );
        assert_eq!(
            Grid::walled(u32::MAX),
            Err(ConfigError::MazeTooLarge {
                size_matrix: 2 * u64::from(u32::MAX) + 1,
                max: MAX_SIZE_MATRIX,
            })
        );
    }

    #[test]
    fn from_rows_rejects_too_many_rows() {
        let rows = vec![Vec::new(); MAX_SIZE_MATRIX as usize + 2];
        assert!(matches!(
            Grid::from_rows(rows),
            Err(ConfigError::MazeTooLarge { .. })
        ));
    }

    #[test]
    fn from_rows_rejects_ragged_and_even() {
        let ragged = vec![vec![Cell::Wall; 3], vec![Cell::Wall; 2], vec![Cell::Wall; 3]];
        assert!(matches!(
            Grid::from_rows(ragged),
            Err(ConfigError::NotSquare { rows: 3, cols: 2 })
        ));

        let even = vec![vec![Cell::Wall; 2]; 2];
        assert_eq!(
            Grid::from_rows(even),
            Err(ConfigError::EvenDimension { size_matrix: 2 })
        );

        assert_eq!(Grid::from_rows(vec![]), Err(ConfigError::EmptyMaze));
    }

    #[test]
    fn set_and_read_back() {
        let mut g = Grid::walled(1).unwrap();
        g.set(Position::new(1, 1), Cell::Path);
        g.set(Position::new(9, 9), Cell::Path);
        assert_eq!(g.cell(Position::new(1, 1)), Some(Cell::Path));
        assert_eq!(g.cell(Position::new(0, 1)), Some(Cell::Wall));
        assert_eq!(g.cell(Position::new(-1, 1)), None);
        assert_eq!(g.path_cells().collect::<Vec<_>>(), vec![Position::new(1, 1)]);
    }
}
