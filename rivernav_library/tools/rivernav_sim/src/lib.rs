//! # rivernav_sim - Headless River Navigation Simulator
//!
//! This crate provides both a binary executable and a library interface
//! for sailing a boat down a partially surveyed river.
//!
//! ## Binary Usage
//! ```bash
//! rivernav --data river.txt --config river.yaml --snapshot last_segment.png
//! ```
//!
//! ## Library Usage
//! ```rust
//! use rivernav_core::SimConfig;
//! use rivernav_sim::{SimulationLoop, SyntheticDepthSource};
//!
//! let mut config = SimConfig::default();
//! config.map.width = 30;
//! config.map.height = 40;
//!
//! let source = SyntheticDepthSource::new(30, 40, 7).with_remaining_rows(Some(120));
//! let mut sim = SimulationLoop::new(config, Box::new(source), "synthetic").unwrap();
//!
//! let summary = sim.run(10_000).unwrap();
//! assert!(summary.exhausted);
//! assert_eq!(summary.segments, 3);
//! ```

// Boat kinematics
pub mod boat;

// Segment preparation and background prefetch
pub mod prefetch;

// Color mapping and snapshots
pub mod render;

// Depth sounder model
pub mod sensors;

// Main loop
pub mod simulation;

// Depth data sources
pub mod source;

pub use boat::BoatState;
pub use prefetch::{prepare_segment, PreparedSegment, SegmentFeed};
pub use sensors::SensorWindow;
pub use simulation::{RunSummary, SimState, SimulationLoop, TickOutcome};
pub use source::{
    source_for_path, DepthSource, ImageDepthSource, MemoryDepthSource, SyntheticDepthSource, TextDepthSource,
};
