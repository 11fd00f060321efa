//! Pure computational algorithms for river navigation
//!
//! Nothing in here touches files, threads or clocks. Every stage takes plain
//! values and returns plain values so it can be tested on its own.
//!
//! # Available Algorithms
//!
//! ## Mapping
//! - **shepard**: inverse-distance-weighted filling of missing depth samples
//!
//! ## Motion Planning
//! - **route_planner**: A* from the entry edge to the exit edge of a segment, hazard-weighted
//!
//! ## Control
//! - **fuzzy**: fuzzifier, rule base, inference engine and centroid defuzzifier

pub mod fuzzy;
pub mod route_planner;
pub mod shepard;
