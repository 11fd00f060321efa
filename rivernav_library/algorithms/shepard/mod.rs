//! Shepard's Method Depth Approximation
//!
//! Fills missing depth samples with an inverse-distance-weighted average of
//! every known sample in the segment.
//!
//! # Features
//!
//! - Global (unmodified) Shepard interpolation, power parameter 8
//! - Known cells are never rewritten
//! - Exact hits short-circuit to the sample value, no division by zero
//! - Empty sample sets are reported instead of producing NaNs
//!
//! Cost is O(missing cells x known samples); segments are small enough for that.
//!
//! # Example
//!
//! ```rust
//! use rivernav_core::Grid;
//! use rivernav_library::algorithms::shepard::Approximator;
//!
//! let mut depths: Grid<f32> = Grid::new(10, 10);
//! depths.set(1, 1, 3.0);
//! depths.set(8, 8, 6.0);
//!
//! Approximator::new().approximate(&mut depths).unwrap();
//! assert_eq!(depths.missing_count(), 0);
//! assert_eq!(depths.get(1, 1), Some(3.0));
//! ```

use rivernav_core::grid::{Grid, UNKNOWN_DEPTH};
use rivernav_core::{NavError, NavResult};

/// Shepard power parameter
pub const POWER_PARAMETER: i32 = 8;

/// Known samples of one grid, stored as parallel sequences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    xs: Vec<u32>,
    ys: Vec<u32>,
    values: Vec<f32>,
}

impl SampleSet {
    /// Collect every non-sentinel cell of `grid`
    pub fn from_grid(grid: &Grid<f32>) -> Self {
        let mut samples = Self::default();
        for (x, y, &value) in grid.iter() {
            if value != UNKNOWN_DEPTH {
                samples.push(x as u32, y as u32, value);
            }
        }
        samples
    }

    pub fn push(&mut self, x: u32, y: u32, value: f32) {
        self.xs.push(x);
        self.ys.push(y);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(x, y, value)`
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, f32)> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.values)
            .map(|((&x, &y), &v)| (x, y, v))
    }
}

/// Inverse-distance-weighting interpolator
#[derive(Debug, Clone, Copy, Default)]
pub struct Approximator;

impl Approximator {
    pub fn new() -> Self {
        Self
    }

    /// Weight of sample (xj, yj) for query (xi, yi): `1 / dist^8`.
    ///
    /// Coincident points weigh `f64::INFINITY`; [`Approximator::interpolate`]
    /// never reaches that case because it returns the sample value first.
    pub fn weighting(xi: u32, yi: u32, xj: u32, yj: u32) -> f64 {
        let dx = xi as f64 - xj as f64;
        let dy = yi as f64 - yj as f64;
        let dist_sq = dx * dx + dy * dy;
        if dist_sq == 0.0 {
            return f64::INFINITY;
        }
        // dist^8 == (dist^2)^4
        1.0 / dist_sq.powi(POWER_PARAMETER / 2)
    }

    /// Estimate the value at (x, y) from `samples`.
    ///
    /// Returns `None` for an empty sample set.
    pub fn interpolate(&self, x: u32, y: u32, samples: &SampleSet) -> Option<f32> {
        if samples.is_empty() {
            return None;
        }

        let mut weighted_sum = 0.0f64;
        let mut weight_total = 0.0f64;
        for (sx, sy, value) in samples.iter() {
            if sx == x && sy == y {
                return Some(value);
            }
            let w = Self::weighting(x, y, sx, sy);
            weighted_sum += w * value as f64;
            weight_total += w;
        }

        Some((weighted_sum / weight_total) as f32)
    }

    /// Fill every sentinel cell of `grid` in place.
    ///
    /// Samples are collected once before any cell is written, so filled cells
    /// never feed later estimates.
    pub fn approximate(&self, grid: &mut Grid<f32>) -> NavResult<()> {
        if grid.is_empty() {
            return Ok(());
        }

        let samples = SampleSet::from_grid(grid);
        if samples.is_empty() {
            return Err(NavError::InsufficientSamples {
                width: grid.width(),
                height: grid.height(),
            });
        }
        if samples.len() == grid.len() {
            return Ok(());
        }

        let width = grid.width();
        for (index, cell) in grid.as_mut_slice().iter_mut().enumerate() {
            if *cell != UNKNOWN_DEPTH {
                continue;
            }
            let (x, y) = (index % width, index / width);
            if let Some(value) = self.interpolate(x as u32, y as u32, &samples) {
                *cell = value;
            }
        }

        Ok(())
    }

    /// Approximated copy of `grid`
    pub fn approximated(&self, grid: &Grid<f32>) -> NavResult<Grid<f32>> {
        let mut filled = grid.clone();
        self.approximate(&mut filled)?;
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sparse_grid(width: usize, height: usize, known: usize, seed: u64) -> Grid<f32> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = Grid::new(width, height);
        for _ in 0..known {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            grid.set(x, y, rng.gen_range(1.0..50.0));
        }
        grid
    }

    #[test]
    fn test_single_known_point_fills_everything() {
        let mut grid = Grid::new(7, 5);
        grid.set(3, 2, 12.5);

        Approximator::new().approximate(&mut grid).unwrap();

        for (_, _, &value) in grid.iter() {
            assert_relative_eq!(value, 12.5, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_weighting_symmetry() {
        let pairs = [((0, 0), (3, 4)), ((10, 2), (1, 7)), ((5, 5), (6, 5))];
        for ((x1, y1), (x2, y2)) in pairs {
            assert_eq!(
                Approximator::weighting(x1, y1, x2, y2),
                Approximator::weighting(x2, y2, x1, y1)
            );
        }
    }

    #[test]
    fn test_weighting_monotonicity() {
        let near = Approximator::weighting(10, 10, 11, 10);
        let mid = Approximator::weighting(10, 10, 12, 11);
        let far = Approximator::weighting(10, 10, 20, 25);
        assert!(near > mid);
        assert!(mid > far);
        assert!(far > 0.0);
    }

    #[test]
    fn test_weighting_power_eight() {
        // dist = 2 -> 1 / 256
        assert_relative_eq!(Approximator::weighting(0, 0, 2, 0), 1.0 / 256.0);
        assert!(Approximator::weighting(4, 4, 4, 4).is_infinite());
    }

    #[test]
    fn test_known_cells_untouched() {
        for seed in 0..5 {
            let original = sparse_grid(20, 15, 12, seed);
            let filled = Approximator::new().approximated(&original).unwrap();

            for (x, y, &value) in original.iter() {
                if value != UNKNOWN_DEPTH {
                    assert_eq!(filled.get(x, y), Some(value));
                }
            }
            assert_eq!(filled.missing_count(), 0);
        }
    }

    #[test]
    fn test_estimates_stay_within_sample_range() {
        let original = sparse_grid(16, 16, 10, 42);
        let samples = SampleSet::from_grid(&original);
        let min = samples.iter().map(|(_, _, v)| v).fold(f32::MAX, f32::min);
        let max = samples.iter().map(|(_, _, v)| v).fold(f32::MIN, f32::max);

        let filled = Approximator::new().approximated(&original).unwrap();
        for (_, _, &value) in filled.iter() {
            assert!(value >= min - 1e-3 && value <= max + 1e-3);
        }
    }

    #[test]
    fn test_closer_sample_dominates() {
        let mut grid = Grid::new(10, 1);
        grid.set(0, 0, 2.0);
        grid.set(9, 0, 20.0);

        Approximator::new().approximate(&mut grid).unwrap();

        let near_left = grid.get(1, 0).unwrap();
        let near_right = grid.get(8, 0).unwrap();
        assert!(near_left < 2.1);
        assert!(near_right > 19.9);
    }

    #[test]
    fn test_empty_sample_set_is_an_error() {
        let mut grid: Grid<f32> = Grid::new(4, 4);
        let result = Approximator::new().approximate(&mut grid);
        assert!(matches!(
            result,
            Err(NavError::InsufficientSamples {
                width: 4,
                height: 4
            })
        ));
        assert_eq!(Approximator::new().interpolate(0, 0, &SampleSet::default()), None);
    }

    #[test]
    fn test_empty_grid_is_a_no_op() {
        let mut grid: Grid<f32> = Grid::new(4, 0);
        assert!(Approximator::new().approximate(&mut grid).is_ok());
    }

    #[test]
    fn test_sample_set_extraction() {
        let mut grid = Grid::new(3, 3);
        grid.set(0, 0, 1.0);
        grid.set(2, 1, 5.0);

        let samples = SampleSet::from_grid(&grid);
        assert_eq!(samples.len(), 2);
        let collected: Vec<_> = samples.iter().collect();
        assert_eq!(collected, vec![(0, 0, 1.0), (2, 1, 5.0)]);
    }
}
