//! The immutable maze model and its legality queries.

use std::collections::{HashSet, VecDeque};

use rand::Rng;
use smallvec::SmallVec;
use warren_core::{ConfigError, Direction, Endpoint, Position};

use crate::grid::{Cell, Grid};
use crate::placement::Placement;

/// Up to four orthogonal neighbour moves, stored inline.
pub type LegalMoves = SmallVec<[Position; 4]>;

/// A square grid maze with distinct start and end positions.
///
/// Immutable once built: every worker in a session reads the same
/// `Maze` (typically behind an `Arc`) and legality never depends on
/// exploration state.
///
/// # Invariants
///
/// - `size_matrix == 2 * size + 1` (always odd).
/// - `start_pos` and `end_pos` are in-bounds path cells.
/// - `start_pos != end_pos`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    start: Position,
    end: Position,
}

impl Maze {
    /// Build a maze from a grid and explicit goal coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::OutOfBounds`] or [`ConfigError::NotAPath`]
    /// for a misplaced goal, and [`ConfigError::StartEqualsEnd`] when the
    /// two goals coincide.
    pub fn new(grid: Grid, start: Position, end: Position) -> Result<Self, ConfigError> {
        check_goal(&grid, Endpoint::Start, start)?;
        check_goal(&grid, Endpoint::End, end)?;
        if start == end {
            return Err(ConfigError::StartEqualsEnd { pos: start });
        }
        Ok(Self { grid, start, end })
    }

    /// Build a maze by resolving two [`Placement`] anchors on `grid`.
    ///
    /// Random anchors draw from `rng` and never resolve to the same cell.
    /// Two fixed anchors naming the same cell fail with
    /// [`ConfigError::StartEqualsEnd`].
    pub fn place<R: Rng + ?Sized>(
        grid: Grid,
        start: Placement,
        end: Placement,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let (start, end) = Placement::resolve_pair(start, end, grid.size(), rng)?;
        Self::new(grid, start, end)
    }

    /// The underlying grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Logical maze size.
    pub fn size(&self) -> u32 {
        self.grid.size()
    }

    /// Grid dimension including wall borders (`2 * size + 1`).
    pub fn size_matrix(&self) -> u32 {
        self.grid.size_matrix()
    }

    /// Where every worker starts.
    pub fn start_pos(&self) -> Position {
        self.start
    }

    /// The goal.
    pub fn end_pos(&self) -> Position {
        self.end
    }

    /// Whether `pos` lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.grid.in_bounds(pos)
    }

    /// Whether `pos` is an in-bounds wall cell.
    pub fn is_wall(&self, pos: Position) -> bool {
        self.grid.cell(pos) == Some(Cell::Wall)
    }

    /// Whether `pos` is an in-bounds path cell.
    pub fn is_path(&self, pos: Position) -> bool {
        self.grid.cell(pos) == Some(Cell::Path)
    }

    /// Whether `pos` is the goal.
    pub fn is_end(&self, pos: Position) -> bool {
        pos == self.end
    }

    /// The in-bounds path neighbours of `pos`, in up, down, left, right
    /// order.
    ///
    /// Empty when `pos` is the goal (exploration halts there) or when
    /// `pos` is not itself a path cell.
    pub fn legal_moves(&self, pos: Position) -> LegalMoves {
        if self.is_end(pos) || !self.is_path(pos) {
            return LegalMoves::new();
        }
        Direction::ALL
            .into_iter()
            .map(|d| pos.step(d))
            .filter(|&next| self.is_path(next))
            .collect()
    }

    /// Every position reachable from the start by repeated legal moves,
    /// the start included.
    pub fn reachable(&self) -> HashSet<Position> {
        let mut seen = HashSet::from([self.start]);
        let mut queue = VecDeque::from([self.start]);
        while let Some(pos) = queue.pop_front() {
            for next in self.legal_moves(pos) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}

fn check_goal(grid: &Grid, endpoint: Endpoint, pos: Position) -> Result<(), ConfigError> {
    match grid.cell(pos) {
        None => Err(ConfigError::OutOfBounds {
            endpoint,
            pos,
            size_matrix: grid.size_matrix(),
        }),
        Some(Cell::Wall) => Err(ConfigError::NotAPath { endpoint, pos }),
        Some(Cell::Path) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Symbols;

    // 3x3 perfect maze on a 7x7 grid, S=(1,1), E=(5,5).
    const TREE: &str = "\
#######
#S#...#
#.#.#.#
#...#.#
###.#.#
#...#E#
#######";

    fn tree() -> Maze {
        Maze::parse(TREE, &Symbols::default()).unwrap()
    }

    #[test]
    fn dimensions_and_goals() {
        let m = tree();
        assert_eq!(m.size(), 3);
        assert_eq!(m.size_matrix(), 7);
        assert_eq!(m.start_pos(), Position::new(1, 1));
        assert_eq!(m.end_pos(), Position::new(5, 5));
    }

    #[test]
    fn predicates() {
        let m = tree();
        assert!(m.is_wall(Position::new(0, 0)));
        assert!(m.is_path(Position::new(1, 1)));
        assert!(!m.is_path(Position::new(-1, 1)));
        assert!(!m.is_wall(Position::new(7, 0)));
        assert!(m.in_bounds(Position::new(6, 6)));
        assert!(!m.in_bounds(Position::new(6, 7)));
        assert!(m.is_end(Position::new(5, 5)));
    }

    #[test]
    fn legal_moves_ordering_is_up_down_left_right() {
        let m = tree();
        // (3,3): up (2,3), down (4,3), left (3,2); right is a wall.
        assert_eq!(
            m.legal_moves(Position::new(3, 3)).as_slice(),
            &[
                Position::new(2, 3),
                Position::new(4, 3),
                Position::new(3, 2)
            ]
        );
    }

    #[test]
    fn legal_moves_empty_at_goal_and_on_walls() {
        let m = tree();
        assert!(m.legal_moves(m.end_pos()).is_empty());
        assert!(m.legal_moves(Position::new(0, 0)).is_empty());
        assert!(m.legal_moves(Position::new(-3, 2)).is_empty());
    }

    #[test]
    fn goal_on_wall_rejected() {
        let m = tree();
        let err = Maze::new(m.grid().clone(), Position::new(0, 0), m.end_pos());
        assert_eq!(
            err,
            Err(ConfigError::NotAPath {
                endpoint: Endpoint::Start,
                pos: Position::new(0, 0)
            })
        );
    }

    #[test]
    fn goal_out_of_bounds_rejected() {
        let m = tree();
        let err = Maze::new(m.grid().clone(), m.start_pos(), Position::new(9, 9));
        assert!(matches!(
            err,
            Err(ConfigError::OutOfBounds {
                endpoint: Endpoint::End,
                ..
            })
        ));
    }

    #[test]
    fn identical_goals_rejected() {
        let m = tree();
        let err = Maze::new(m.grid().clone(), m.start_pos(), m.start_pos());
        assert!(matches!(err, Err(ConfigError::StartEqualsEnd { .. })));
    }

    #[test]
    fn reachable_covers_connected_paths() {
        let m = tree();
        let reach = m.reachable();
        assert_eq!(reach.len(), m.grid().path_cells().count());
        assert!(reach.contains(&m.end_pos()));
    }
}
