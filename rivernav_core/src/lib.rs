//! # rivernav Core
//!
//! Shared building blocks for the rivernav river navigation simulator.
//!
//! - **Grid**: dense depth container with the zero-means-unknown sentinel
//! - **Error**: the single [`NavError`] type used across the workspace
//! - **Params**: [`SimConfig`], the startup configuration surface
//!
//! ## Quick Start
//!
//! ```rust
//! use rivernav_core::{Grid, SimConfig};
//!
//! let config = SimConfig::default();
//! let mut depths: Grid<f32> = Grid::new(config.map.width, config.map.height);
//! depths.set(3, 4, 2.5);
//!
//! assert!(depths.is_known(3, 4));
//! assert!(!depths.is_known(0, 0));
//! ```

pub mod error;
pub mod grid;
pub mod params;

pub use error::{NavError, NavResult};
pub use grid::{Grid, GridCoord};
pub use params::{PrefetchMode, SimConfig};
