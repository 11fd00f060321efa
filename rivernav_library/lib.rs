//! # rivernav Standard Library
//!
//! Navigation algorithms for a boat on a partially surveyed river.
//!
//! ## Structure
//!
//! ```text
//! rivernav_library/
//! ── algorithms/     # Pure computation, no I/O
//!    ── shepard/        # Missing-depth interpolation
//!    ── route_planner/  # A* over the depth field
//!    ── fuzzy/          # Four-stage steering/speed controller
//! ── tools/          # rivernav_sim (simulation loop + headless runner)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use rivernav_core::Grid;
//! use rivernav_library::{Approximator, RoutePlanner};
//!
//! let mut depths: Grid<f32> = Grid::new(8, 8);
//! depths.set(2, 2, 4.0);
//! depths.set(6, 5, 9.0);
//!
//! Approximator::new().approximate(&mut depths).unwrap();
//! let path = RoutePlanner::new().plan(&depths, 4);
//! assert!(path.is_feasible());
//! ```

pub mod algorithms;

pub use algorithms::fuzzy::{ControlDecision, FuzzyController, ZoneSoundings};
pub use algorithms::route_planner::{PathCursor, PlannedPath, RoutePlanner};
pub use algorithms::shepard::{Approximator, SampleSet};
