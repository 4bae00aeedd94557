//! Random puzzles, built by filling a grid at random and reading its clues back.
//!
//! A puzzle made this way always has at least one solution, the grid it came
//! from, though it need not be the only one.

use crate::nonogram::error::PuzzleError;
use crate::nonogram::grid::Grid;
use crate::nonogram::model::{Cell, PuzzleModel};
use fastrand::Rng;

/// Fraction of filled cells used when none is given.
pub const DEFAULT_DENSITY: f64 = 0.5;

/// A grid whose cells are filled independently with probability `density`.
///
/// `density` is clamped to `0.0..=1.0`.
#[must_use]
pub fn random_grid(rng: &mut Rng, width: usize, height: usize, density: f64) -> Grid {
    let density = density.clamp(0.0, 1.0);
    let cells = (0..height)
        .map(|_| {
            (0..width)
                .map(|_| if rng.f64() < density { Cell::Filled } else { Cell::Empty })
                .collect()
        })
        .collect();
    Grid::new(cells)
}

/// A random puzzle and the grid it was read from.
///
/// The same `seed` always yields the same puzzle; without one the generator is
/// seeded from the system.
///
/// # Errors
///
/// If `width` or `height` is zero.
pub fn random_puzzle(
    name: impl Into<String>,
    width: usize,
    height: usize,
    density: f64,
    seed: Option<u64>,
) -> Result<(PuzzleModel, Grid), PuzzleError> {
    if width == 0 || height == 0 {
        return Err(PuzzleError::ZeroDimension { width, height });
    }
    let mut rng = seed.map_or_else(Rng::new, Rng::with_seed);
    let grid = random_grid(&mut rng, width, height, density);
    let model = grid.to_model(name)?;
    Ok((model, grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let (a, ga) = random_puzzle("r", 7, 5, 0.4, Some(42)).unwrap();
        let (b, gb) = random_puzzle("r", 7, 5, 0.4, Some(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(ga, gb);
        assert_eq!(a.width(), 7);
        assert_eq!(a.height(), 5);
    }

    #[test]
    fn test_source_grid_satisfies_clues() {
        for seed in 0..20 {
            let (model, grid) = random_puzzle("s", 6, 4, DEFAULT_DENSITY, Some(seed)).unwrap();
            assert!(grid.satisfies(&model), "seed {seed}");
        }
    }

    #[test]
    fn test_density_extremes() {
        let mut rng = Rng::with_seed(1);
        assert_eq!(random_grid(&mut rng, 4, 3, 0.0).filled(), 0);
        assert_eq!(random_grid(&mut rng, 4, 3, 1.0).filled(), 12);
        assert_eq!(random_grid(&mut rng, 4, 3, 7.5).filled(), 12);
    }

    #[test]
    fn test_zero_dimension() {
        assert!(matches!(
            random_puzzle("z", 0, 3, 0.5, None),
            Err(PuzzleError::ZeroDimension { width: 0, height: 3 })
        ));
    }
}
