//! Dense 2D depth grid
//!
//! Row-major storage for depth samples of one river segment.
//!
//! # Sentinel
//!
//! A stored depth of exactly `0.0` means "no measurement". True zero depth is
//! therefore indistinguishable from missing data; consumers treat both as unknown.
//!
//! # Example
//!
//! ```rust
//! use rivernav_core::grid::Grid;
//!
//! let mut grid: Grid<f32> = Grid::new(4, 3);  // 4 columns, 3 rows
//! grid.set(1, 2, 7.5);
//!
//! assert_eq!(grid.get(1, 2), Some(7.5));
//! assert_eq!(grid.get(4, 0), None);
//! assert_eq!(grid.known_count(), 1);
//! ```

use std::ops::{Index, IndexMut};

/// Missing-data sentinel for depth grids
pub const UNKNOWN_DEPTH: f32 = 0.0;

/// Integer cell coordinate (x = column, y = row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    /// "No further waypoint"
    pub const NONE: GridCoord = GridCoord { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Dense height x width container
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Create a grid filled with `T::default()`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![T::default(); width * height],
        }
    }

    /// Build a grid from rows; every row is padded or truncated to `width`
    pub fn from_rows<R>(width: usize, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: AsRef<[T]>,
    {
        let mut cells = Vec::new();
        let mut height = 0;
        for row in rows {
            let row = row.as_ref();
            let take = row.len().min(width);
            cells.extend_from_slice(&row[..take]);
            cells.resize(cells.len() + (width - take), T::default());
            height += 1;
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Reshape in place and reset every cell to `T::default()`
    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width * height, T::default());
    }

    /// Append one row (padded or truncated to the grid width)
    pub fn push_row(&mut self, row: &[T]) {
        let take = row.len().min(self.width);
        self.cells.extend_from_slice(&row[..take]);
        self.cells
            .resize(self.cells.len() + (self.width - take), T::default());
        self.height += 1;
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when the grid has no rows (the "no more segments" marker)
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Check if grid coordinates are valid
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Linear index of (x, y); caller guarantees bounds
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Coordinates of a linear index
    #[inline]
    pub fn coord_of(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn get_ref(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.cells.get(self.index_of(x, y))
        } else {
            None
        }
    }

    /// Set a cell; out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if x < self.width && y < self.height {
            let index = self.index_of(x, y);
            self.cells[index] = value;
        }
    }

    /// One row as a slice
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y < self.height {
            let start = y * self.width;
            Some(&self.cells[start..start + self.width])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Iterate `(x, y, &value)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, v)| (i % width, i / width, v))
    }
}

impl<T: Copy> Grid<T> {
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        self.get_ref(x, y).copied()
    }

    /// Signed lookup for sensor offsets that may fall outside the grid
    pub fn sample(&self, x: i32, y: i32) -> Option<T> {
        if self.in_bounds(x, y) {
            Some(self.cells[self.index_of(x as usize, y as usize)])
        } else {
            None
        }
    }
}

impl Grid<f32> {
    /// Whether (x, y) holds a measurement (anything but the sentinel)
    pub fn is_known(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(|d| d != UNKNOWN_DEPTH)
    }

    /// Number of non-sentinel cells
    pub fn known_count(&self) -> usize {
        self.cells.iter().filter(|&&d| d != UNKNOWN_DEPTH).count()
    }

    /// Number of sentinel cells
    pub fn missing_count(&self) -> usize {
        self.len() - self.known_count()
    }

    /// Deepest value in the grid, 0.0 for an empty grid
    pub fn max_depth(&self) -> f32 {
        self.cells.iter().copied().fold(0.0, f32::max)
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.cells[y * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        &mut self.cells[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_grid() {
        let grid: Grid<f32> = Grid::new(5, 3);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.len(), 15);
        assert_eq!(grid.missing_count(), 15);
    }

    #[test]
    fn test_row_major_layout() {
        let mut grid: Grid<f32> = Grid::new(3, 2);
        grid.set(2, 1, 4.0);
        assert_eq!(grid.as_slice()[5], 4.0);
        assert_eq!(grid[(2, 1)], 4.0);
        assert_eq!(grid.coord_of(5), (2, 1));
        assert_eq!(grid.index_of(2, 1), 5);
    }

    #[test]
    fn test_from_rows_pads_and_truncates() {
        let grid = Grid::from_rows(3, vec![vec![1.0f32], vec![1.0, 2.0, 3.0, 4.0]]);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.row(0), Some(&[1.0, 0.0, 0.0][..]));
        assert_eq!(grid.row(1), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut grid: Grid<f32> = Grid::new(2, 2);
        grid.set(5, 5, 1.0);
        assert_eq!(grid.known_count(), 0);
        assert_eq!(grid.sample(-1, 0), None);
        assert_eq!(grid.sample(0, 2), None);
        assert!(!grid.in_bounds(2, 0));
    }

    #[test]
    fn test_reset_and_rows() {
        let mut grid: Grid<f32> = Grid::new(2, 0);
        assert!(grid.is_empty());
        grid.push_row(&[3.0, 4.0, 5.0]);
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.get(1, 0), Some(4.0));

        grid.reset(4, 4);
        assert_eq!(grid.len(), 16);
        assert_eq!(grid.max_depth(), 0.0);
    }

    #[test]
    fn test_sentinel_coord() {
        assert!(GridCoord::NONE.is_none());
        assert!(!GridCoord::new(0, 0).is_none());
        assert_eq!(GridCoord::from((-1, -1)), GridCoord::NONE);
    }
}
