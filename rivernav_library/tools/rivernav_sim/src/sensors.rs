//! Depth sounder model
//!
//! Each tick the boat sounds three zones of the active segment:
//!
//! ```text
//!   left  . . . . .  right   front arc: `proximity` rows ahead of the bow,
//!  flank  . . . . .  flank   hull width wide
//!         . . B . .          B = bow (the boat's reference point)
//! ```
//!
//! The flanks run `proximity` columns outboard of the hull, over the bow row
//! and the `length - 1` rows ahead of it.
//!
//! Offsets are rotated by the boat's heading and rounded onto the grid. Cells
//! outside the segment are dropped, never read as zero.

use crate::boat::{rotate_offset, BoatState};
use rivernav_core::params::BoatConfig;
use rivernav_core::{Grid, GridCoord};
use rivernav_library::ZoneSoundings;

/// Sampled cells of one zone and the depths read there
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneSamples {
    pub cells: Vec<GridCoord>,
    pub depths: Vec<f32>,
}

impl ZoneSamples {
    fn record(&mut self, grid: &Grid<f32>, x: i32, y: i32) {
        if let Some(depth) = grid.sample(x, y) {
            self.cells.push(GridCoord::new(x, y));
            self.depths.push(depth);
        }
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

/// Soundings of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorWindow {
    pub front: ZoneSamples,
    pub left: ZoneSamples,
    pub right: ZoneSamples,
    bounds: Option<(f32, f32)>,
}

impl SensorWindow {
    /// Sound the grid around `boat`
    pub fn sample(grid: &Grid<f32>, boat: &BoatState, hull: &BoatConfig, proximity: usize) -> Self {
        let half_width = (hull.width / 2) as i32;
        let length = hull.length as i32;
        let mut window = Self::default();

        let place = |dx: i32, dy: i32| {
            let (rx, ry) = rotate_offset(dx as f32, dy as f32, boat.heading);
            (boat.x + rx.round() as i32, boat.y + ry.round() as i32)
        };

        for j in 1..=proximity as i32 {
            for i in -half_width..=half_width {
                let (x, y) = place(i, j);
                window.front.record(grid, x, y);
            }
            for i in 0..length {
                let (x, y) = place(-half_width - j, i);
                window.left.record(grid, x, y);
                let (x, y) = place(half_width + j, i);
                window.right.record(grid, x, y);
            }
        }

        window.bounds = window.soundings().observed_bounds();
        window
    }

    /// Borrow the depths in the form the controller consumes
    pub fn soundings(&self) -> ZoneSoundings<'_> {
        ZoneSoundings {
            front: &self.front.depths,
            left: &self.left.depths,
            right: &self.right.depths,
        }
    }

    /// Shallowest and deepest sounding of this tick
    pub fn bounds(&self) -> Option<(f32, f32)> {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.left.is_empty() && self.right.is_empty()
    }

    /// Total number of soundings
    pub fn len(&self) -> usize {
        self.front.len() + self.left.len() + self.right.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hull() -> BoatConfig {
        BoatConfig {
            length: 3,
            width: 3,
            ..BoatConfig::default()
        }
    }

    /// Depth equal to 1 + x + 100 * y, so every cell is unique
    fn ramp(width: usize, height: usize) -> Grid<f32> {
        let mut grid = Grid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.set(x, y, 1.0 + x as f32 + 100.0 * y as f32);
            }
        }
        grid
    }

    #[test]
    fn test_zone_layout_heading_straight() {
        let grid = ramp(20, 20);
        let boat = BoatState::new(10, 5);
        let window = SensorWindow::sample(&grid, &boat, &hull(), 2);

        assert_eq!(window.front.len(), 6);
        assert_eq!(window.left.len(), 6);
        assert_eq!(window.right.len(), 6);

        assert!(window.front.cells.iter().all(|c| c.y == 6 || c.y == 7));
        assert!(window.front.cells.iter().all(|c| (9..=11).contains(&c.x)));
        assert!(window.left.cells.iter().all(|c| c.x == 8 || c.x == 7));
        assert!(window.right.cells.iter().all(|c| c.x == 12 || c.x == 13));
        assert!(window
            .left
            .cells
            .iter()
            .chain(&window.right.cells)
            .all(|c| (5..=7).contains(&c.y)));
    }

    #[test]
    fn test_depths_match_cells() {
        let grid = ramp(20, 20);
        let window = SensorWindow::sample(&grid, &BoatState::new(10, 5), &hull(), 3);
        for zone in [&window.front, &window.left, &window.right] {
            for (cell, depth) in zone.cells.iter().zip(&zone.depths) {
                assert_eq!(grid.sample(cell.x, cell.y), Some(*depth));
            }
        }
    }

    #[test]
    fn test_out_of_range_cells_excluded() {
        let grid = ramp(6, 6);
        // Bow on the last row at the left edge: nothing ahead, nothing to port,
        // and only the bow row of the starboard flank
        let window = SensorWindow::sample(&grid, &BoatState::new(0, 5), &hull(), 2);

        assert!(window.front.is_empty());
        assert!(window.left.is_empty());
        assert_eq!(window.right.len(), 2);
        assert!(window.right.cells.iter().all(|c| c.y == 5));

        let (min, max) = window.bounds().unwrap();
        assert_eq!(min, 1.0 + 2.0 + 500.0);
        assert_eq!(max, 1.0 + 3.0 + 500.0);
    }

    #[test]
    fn test_turned_boat_sounds_to_the_side() {
        let grid = ramp(30, 30);
        let mut boat = BoatState::new(10, 10);
        boat.heading = 90.0;
        let window = SensorWindow::sample(&grid, &boat, &hull(), 2);

        // Facing +x: "ahead" is to the right of the course
        assert!(window.front.cells.iter().all(|c| c.x > 10));
        // Port side now lies further down the course
        assert!(window.left.cells.iter().all(|c| c.y > 10));
        assert!(window.right.cells.iter().all(|c| c.y < 10));
    }

    #[test]
    fn test_window_off_grid_is_empty() {
        let grid = ramp(4, 4);
        let window = SensorWindow::sample(&grid, &BoatState::new(50, 50), &hull(), 2);
        assert!(window.is_empty());
        assert_eq!(window.len(), 0);
        assert_eq!(window.bounds(), None);
    }
}
