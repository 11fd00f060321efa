//! Hazard-weighted A* Route Planning
//!
//! Finds a low-hazard course through one approximated river segment, from the
//! entry edge (row 0) to the exit edge (last row).
//!
//! # Features
//!
//! - Implicit 8-connected graph, addressed by linear cell index
//! - Flat arena storage for cost, parent and closed flags
//! - Edge cost grows as the destination gets shallower, scaled by edge length
//! - Deterministic tie-breaking: fixed neighbor order, FIFO among equal priorities
//! - Unreachable exit edge yields the best partial route, flagged infeasible
//!
//! # Example
//!
//! ```rust
//! use rivernav_core::Grid;
//! use rivernav_library::algorithms::route_planner::RoutePlanner;
//!
//! let depths: Grid<f32> = Grid::from_rows(5, vec![vec![4.0f32; 5]; 6]);
//! let path = RoutePlanner::new().plan(&depths, 2);
//!
//! assert!(path.is_feasible());
//! assert_eq!(path.len(), 6);
//!
//! let mut cursor = path.into_cursor(2);
//! assert_eq!(cursor.next_waypoint().y, 0);
//! assert_eq!(cursor.next_waypoint().y, 2);
//! ```

use rivernav_core::grid::{Grid, GridCoord};
use rivernav_core::NavError;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;


/// Extra cost of entering the shallowest passable water, on top of the unit step
pub const HAZARD_WEIGHT: f32 = 9.0;

/// Cheapest possible cost of one axis-aligned step (deepest water)
pub const MIN_STEP_COST: f32 = 1.0;

const NO_PARENT: u32 = u32::MAX;

/// Neighbor visitation order: downstream first, then sideways, then upstream
const NEIGHBORS: [(i32, i32); 8] = [
    (0, 1),
    (-1, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (-1, -1),
    (1, -1),
];

/// Route through one segment
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPath {
    waypoints: Vec<GridCoord>,
    cost: f32,
    feasible: bool,
    exit_row: i32,
}

impl PlannedPath {
    /// Route without waypoints, as planned over an empty grid
    pub fn empty(exit_row: i32) -> Self {
        Self {
            waypoints: Vec::new(),
            cost: 0.0,
            feasible: false,
            exit_row,
        }
    }

    /// Waypoints from entry to exit (or to the furthest reachable cell)
    pub fn waypoints(&self) -> &[GridCoord] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Accumulated hazard cost
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Whether the route reaches the exit edge
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// `InfeasibleRoute` for partial routes, `None` otherwise
    pub fn advisory(&self) -> Option<NavError> {
        if self.feasible {
            return None;
        }
        Some(NavError::InfeasibleRoute {
            reached_row: self.waypoints.last().map_or(-1, |c| c.y),
            exit_row: self.exit_row,
        })
    }

    /// Waypoint reader advancing `step` waypoints per read
    pub fn into_cursor(self, step: usize) -> PathCursor {
        PathCursor::new(self, step)
    }
}

/// Index-based waypoint reader over a [`PlannedPath`]
#[derive(Debug, Clone)]
pub struct PathCursor {
    path: PlannedPath,
    index: usize,
    step: usize,
}

impl PathCursor {
    /// A zero step is treated as 1 so the cursor always advances
    pub fn new(path: PlannedPath, step: usize) -> Self {
        Self {
            path,
            index: 0,
            step: step.max(1),
        }
    }

    /// Current waypoint, then advance by `step`.
    ///
    /// Returns [`GridCoord::NONE`] once the path is used up.
    pub fn next_waypoint(&mut self) -> GridCoord {
        match self.path.waypoints.get(self.index) {
            Some(&coord) => {
                self.index += self.step;
                coord
            }
            None => GridCoord::NONE,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.path.len()
    }

    pub fn path(&self) -> &PlannedPath {
        &self.path
    }
}

/// Open-set entry; ordered for a min-heap on (f, insertion sequence)
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f_cost: f32,
    g_cost: f32,
    seq: u64,
    index: usize,
}

impl Eq for OpenEntry {}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .f_cost
            .total_cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* planner over a depth grid
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    min_passable_depth: f32,
    hazard_weight: f32,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutePlanner {
    /// Planner treating only sentinel (zero) cells as impassable
    pub fn new() -> Self {
        Self {
            min_passable_depth: 0.0,
            hazard_weight: HAZARD_WEIGHT,
        }
    }

    /// Cells at or below `depth` are impassable
    pub fn with_min_passable_depth(mut self, depth: f32) -> Self {
        self.min_passable_depth = depth.max(0.0);
        self
    }

    pub fn is_passable(&self, depth: f32) -> bool {
        depth > self.min_passable_depth
    }

    /// Cost of entering a cell of `depth` by an axis-aligned step.
    ///
    /// `MIN_STEP_COST` at `max_depth`, rising quadratically toward
    /// `MIN_STEP_COST + hazard_weight` as depth goes to zero.
    pub fn hazard_cost(&self, depth: f32, max_depth: f32) -> f32 {
        let ratio = if max_depth > 0.0 {
            (depth / max_depth).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let shallowness = 1.0 - ratio;
        MIN_STEP_COST + self.hazard_weight * shallowness * shallowness
    }

    fn heuristic(y: i32, exit_row: i32) -> f32 {
        (exit_row - y).max(0) as f32 * MIN_STEP_COST
    }

    /// Plan from entry cell (`entry_x`, 0) to any cell of the last row.
    ///
    /// `entry_x` is clamped into the grid. Never fails: when the exit edge is
    /// unreachable the returned path is partial and not feasible.
    pub fn plan(&self, grid: &Grid<f32>, entry_x: i32) -> PlannedPath {
        let exit_row = grid.height() as i32 - 1;
        if grid.is_empty() {
            return PlannedPath::empty(exit_row);
        }

        let width = grid.width();
        let entry_x = entry_x.clamp(0, width as i32 - 1) as usize;
        let start = grid.index_of(entry_x, 0);
        let max_depth = grid.max_depth();
        let depths = grid.as_slice();

        if !self.is_passable(depths[start]) {
            debug!("[RoutePlanner] entry cell ({}, 0) is impassable", entry_x);
            return PlannedPath {
                waypoints: vec![GridCoord::new(entry_x as i32, 0)],
                cost: 0.0,
                feasible: false,
                exit_row,
            };
        }

        let cells = grid.len();
        let mut g_cost = vec![f32::INFINITY; cells];
        let mut parent = vec![NO_PARENT; cells];
        let mut closed = vec![false; cells];
        let mut open = BinaryHeap::new();
        let mut seq = 0u64;

        g_cost[start] = 0.0;
        open.push(OpenEntry {
            f_cost: Self::heuristic(0, exit_row),
            g_cost: 0.0,
            seq,
            index: start,
        });

        let mut best = start;
        let mut expanded = 0usize;

        while let Some(current) = open.pop() {
            let index = current.index;
            if closed[index] || current.g_cost > g_cost[index] {
                continue;
            }
            closed[index] = true;
            expanded += 1;

            let (x, y) = grid.coord_of(index);
            let (x, y) = (x as i32, y as i32);

            let (_, best_y) = grid.coord_of(best);
            if y > best_y as i32 || (y == best_y as i32 && g_cost[index] < g_cost[best]) {
                best = index;
            }

            if y == exit_row {
                debug!(
                    "[RoutePlanner] reached exit ({}, {}) cost {:.2} after {} expansions",
                    x, y, g_cost[index], expanded
                );
                return Self::reconstruct(grid, &parent, &g_cost, index, true, exit_row);
            }

            for (dx, dy) in NEIGHBORS {
                let (nx, ny) = (x + dx, y + dy);
                if !grid.in_bounds(nx, ny) {
                    continue;
                }
                let neighbor = grid.index_of(nx as usize, ny as usize);
                if closed[neighbor] || !self.is_passable(depths[neighbor]) {
                    continue;
                }

                let length = if dx != 0 && dy != 0 {
                    std::f32::consts::SQRT_2
                } else {
                    1.0
                };
                let tentative = g_cost[index] + length * self.hazard_cost(depths[neighbor], max_depth);

                if tentative < g_cost[neighbor] {
                    g_cost[neighbor] = tentative;
                    parent[neighbor] = index as u32;
                    seq += 1;
                    open.push(OpenEntry {
                        f_cost: tentative + Self::heuristic(ny, exit_row),
                        g_cost: tentative,
                        seq,
                        index: neighbor,
                    });
                }
            }
        }

        let path = Self::reconstruct(grid, &parent, &g_cost, best, false, exit_row);
        debug!(
            "[RoutePlanner] exit row {} unreachable after {} expansions; partial route ends at row {}",
            exit_row,
            expanded,
            path.waypoints.last().map_or(-1, |c| c.y)
        );
        path
    }

    fn reconstruct(
        grid: &Grid<f32>,
        parent: &[u32],
        g_cost: &[f32],
        goal: usize,
        feasible: bool,
        exit_row: i32,
    ) -> PlannedPath {
        let mut waypoints = Vec::new();
        let mut current = goal;
        loop {
            let (x, y) = grid.coord_of(current);
            waypoints.push(GridCoord::new(x as i32, y as i32));
            match parent[current] {
                NO_PARENT => break,
                prev => current = prev as usize,
            }
        }
        waypoints.reverse();

        PlannedPath {
            waypoints,
            cost: g_cost[goal],
            feasible,
            exit_row,
        }
    }
}
