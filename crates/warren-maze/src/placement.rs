//! Start and end anchors.
//!
//! Anchors name cell centres relative to the grid (`TopLeft`, `Middle`,
//! ...) or draw one at random from a pool. A random anchor never lands
//! on the cell already taken by the other goal.

use rand::seq::IndexedRandom;
use rand::Rng;
use warren_core::{ConfigError, Endpoint, Position};

use crate::grid::{MAX_SIZE, MAX_SIZE_MATRIX};

/// Where to put a goal on a grid of logical size `size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// `(1, 1)`.
    TopLeft,
    /// `(1, 2·size − 1)`.
    TopRight,
    /// `(2·size − 1, 1)`.
    BottomLeft,
    /// `(2·size − 1, 2·size − 1)`.
    BottomRight,
    /// Centre of the middle logical cell.
    Middle,
    /// One of the four corners or the middle.
    Random,
    /// One of the four corners.
    RandomCorner,
    /// Any logical cell centre.
    RandomAny,
    /// An explicit coordinate.
    At(Position),
}

impl Placement {
    /// Whether this anchor is drawn at random.
    pub fn is_random(self) -> bool {
        matches!(
            self,
            Placement::Random | Placement::RandomCorner | Placement::RandomAny
        )
    }

    /// Every coordinate this anchor may resolve to.
    ///
    /// Sizes above [`MAX_SIZE`] are treated as [`MAX_SIZE`].
    pub fn candidates(self, size: u32) -> Vec<Position> {
        let size = size.min(MAX_SIZE) as i32;
        let far = 2 * size - 1;
        let corners = [
            Position::new(1, 1),
            Position::new(1, far),
            Position::new(far, 1),
            Position::new(far, far),
        ];
        let middle = Position::new(2 * (size / 2) + 1, 2 * (size / 2) + 1);
        match self {
            Placement::TopLeft => vec![corners[0]],
            Placement::TopRight => vec![corners[1]],
            Placement::BottomLeft => vec![corners[2]],
            Placement::BottomRight => vec![corners[3]],
            Placement::Middle => vec![middle],
            Placement::At(pos) => vec![pos],
            Placement::RandomCorner => dedup(corners.to_vec()),
            Placement::Random => {
                let mut pool = corners.to_vec();
                pool.push(middle);
                dedup(pool)
            }
            Placement::RandomAny => (0..size)
                .flat_map(|r| (0..size).map(move |c| Position::new(2 * r + 1, 2 * c + 1)))
                .collect(),
        }
    }

    /// Resolve a start/end pair of anchors to coordinates.
    ///
    /// # Errors
    ///
    /// [`ConfigError::StartEqualsEnd`] when both anchors are fixed and
    /// name the same cell, [`ConfigError::NoPlacementCandidates`] when a
    /// random pool is empty once the other goal is excluded, and
    /// [`ConfigError::MazeTooLarge`] for `size` above [`MAX_SIZE`].
    pub fn resolve_pair<R: Rng + ?Sized>(
        start: Placement,
        end: Placement,
        size: u32,
        rng: &mut R,
    ) -> Result<(Position, Position), ConfigError> {
        if size > MAX_SIZE {
            return Err(ConfigError::MazeTooLarge {
                size_matrix: 2 * u64::from(size) + 1,
                max: MAX_SIZE_MATRIX,
            });
        }
        match (start.is_random(), end.is_random()) {
            (true, true) => {
                let start_pos = choose(start.candidates(size), None, Endpoint::Start, rng)?;
                let end_pos = choose(end.candidates(size), Some(start_pos), Endpoint::End, rng)?;
                Ok((start_pos, end_pos))
            }
            (true, false) => {
                let end_pos = fixed(end, size);
                let start_pos = choose(start.candidates(size), Some(end_pos), Endpoint::Start, rng)?;
                Ok((start_pos, end_pos))
            }
            (false, true) => {
                let start_pos = fixed(start, size);
                let end_pos = choose(end.candidates(size), Some(start_pos), Endpoint::End, rng)?;
                Ok((start_pos, end_pos))
            }
            (false, false) => {
                let start_pos = fixed(start, size);
                let end_pos = fixed(end, size);
                if start_pos == end_pos {
                    return Err(ConfigError::StartEqualsEnd { pos: start_pos });
                }
                Ok((start_pos, end_pos))
            }
        }
    }
}

fn fixed(anchor: Placement, size: u32) -> Position {
    anchor.candidates(size)[0]
}

fn choose<R: Rng + ?Sized>(
    pool: Vec<Position>,
    exclude: Option<Position>,
    endpoint: Endpoint,
    rng: &mut R,
) -> Result<Position, ConfigError> {
    let pool: Vec<Position> = pool.into_iter().filter(|p| Some(*p) != exclude).collect();
    pool.choose(rng)
        .copied()
        .ok_or(ConfigError::NoPlacementCandidates { endpoint })
}

fn dedup(mut pool: Vec<Position>) -> Vec<Position> {
    pool.sort();
    pool.dedup();
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn fixed_anchors_on_size_three() {
        assert_eq!(Placement::TopLeft.candidates(3), vec![Position::new(1, 1)]);
        assert_eq!(Placement::TopRight.candidates(3), vec![Position::new(1, 5)]);
        assert_eq!(Placement::BottomLeft.candidates(3), vec![Position::new(5, 1)]);
        assert_eq!(Placement::BottomRight.candidates(3), vec![Position::new(5, 5)]);
        assert_eq!(Placement::Middle.candidates(3), vec![Position::new(3, 3)]);
    }

    #[test]
    fn middle_is_on_an_odd_cell_for_even_sizes() {
        let m = Placement::Middle.candidates(10)[0];
        assert_eq!(m, Position::new(11, 11));
        assert_eq!(m.row % 2, 1);
    }

    #[test]
    fn random_any_covers_every_cell_centre() {
        let pool = Placement::RandomAny.candidates(3);
        assert_eq!(pool.len(), 9);
        assert!(pool.iter().all(|p| p.row % 2 == 1 && p.col % 2 == 1));
    }

    #[test]
    fn equal_fixed_anchors_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = Placement::resolve_pair(Placement::Middle, Placement::Middle, 3, &mut rng);
        assert_eq!(
            err,
            Err(ConfigError::StartEqualsEnd {
                pos: Position::new(3, 3)
            })
        );
    }

    #[test]
    fn oversized_mazes_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = Placement::resolve_pair(
            Placement::TopLeft,
            Placement::BottomRight,
            MAX_SIZE + 1,
            &mut rng,
        );
        assert!(matches!(err, Err(ConfigError::MazeTooLarge { .. })));
        assert_eq!(
            Placement::BottomRight.candidates(u32::MAX),
            Placement::BottomRight.candidates(MAX_SIZE)
        );
    }

    #[test]
    fn equal_random_anchors_resolve_to_distinct_cells() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let (s, e) =
                Placement::resolve_pair(Placement::RandomCorner, Placement::RandomCorner, 4, &mut rng)
                    .unwrap();
            assert_ne!(s, e);
        }
    }

    #[test]
    fn random_start_avoids_fixed_end() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let (s, e) =
                Placement::resolve_pair(Placement::RandomCorner, Placement::TopLeft, 3, &mut rng)
                    .unwrap();
            assert_eq!(e, Position::new(1, 1));
            assert_ne!(s, e);
        }
    }

    #[test]
    fn random_end_avoids_fixed_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..100 {
            let (s, e) =
                Placement::resolve_pair(Placement::BottomRight, Placement::Random, 3, &mut rng)
                    .unwrap();
            assert_eq!(s, Position::new(5, 5));
            assert_ne!(s, e);
        }
    }

    #[test]
    fn exhausted_pool_is_reported() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // Size 1: every corner and the middle are the same cell.
        let err = Placement::resolve_pair(Placement::TopLeft, Placement::RandomCorner, 1, &mut rng);
        assert_eq!(
            err,
            Err(ConfigError::NoPlacementCandidates {
                endpoint: Endpoint::End
            })
        );
    }
}
