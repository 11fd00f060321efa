//! Simulation loop
//!
//! Owns everything that changes while the boat sails: the active segment, the
//! prefetched one, the boat and the planned route. One call to
//! [`SimulationLoop::tick`] is one step of the state machine:
//!
//! ```text
//! Initializing ──▶ Navigating ⇄ SegmentRollover ──▶ Exhausted
//!                                       │
//!                                       └──▶ Failed
//! ```
//!
//! A navigation tick senses, decides and moves. Once the bow passes the last
//! row the next tick rolls over instead: the prefetched segment becomes
//! active, the route is replanned and another segment is requested. When the
//! prefetched segment is empty the course is over and the loop stops mutating.
//! A segment that cannot be prepared halts the loop in `Failed` instead, and
//! every later tick reports it until [`SimulationLoop::reset`].

use crate::boat::BoatState;
use crate::prefetch::{PreparedSegment, SegmentFeed};
use crate::sensors::SensorWindow;
use crate::source::DepthSource;
use rivernav_core::{Grid, GridCoord, NavError, NavResult, SimConfig};
use rivernav_library::{ControlDecision, FuzzyController, PathCursor, PlannedPath, RoutePlanner};
use serde::Serialize;
use std::mem;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace, warn};

/// Loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimState {
    Initializing,
    Navigating,
    SegmentRollover,
    Exhausted,
    /// A later segment could not be prepared
    Failed,
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The boat sensed and moved
    Navigated,
    /// The prefetched segment became active
    RolledOver,
    /// The course is complete; nothing changed
    Exhausted,
}

/// Totals of a [`SimulationLoop::run`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub navigation_ticks: u64,
    pub rollovers: u64,
    /// Segments made active so far, the first one included
    pub segments: u64,
    pub infeasible_routes: u64,
    pub exhausted: bool,
    pub boat: BoatState,
}

/// Single owner of the simulation state
pub struct SimulationLoop {
    config: SimConfig,
    source_path: PathBuf,
    state: SimState,
    failure: Option<String>,

    /// Held only while no feed is running
    idle_source: Option<Box<dyn DepthSource>>,
    feed: Option<SegmentFeed>,

    active: Grid<f32>,
    prefetched: Grid<f32>,
    max_depth: f32,
    max_buffer_depth: f32,
    remaining_rows: Option<usize>,

    boat: BoatState,
    planner: RoutePlanner,
    controller: FuzzyController,
    cursor: PathCursor,
    window: SensorWindow,
    last_decision: ControlDecision,

    navigation_ticks: u64,
    rollovers: u64,
    segments: u64,
    infeasible_routes: u64,
}

impl SimulationLoop {
    /// Validate `config`, open `source` at `path` and prepare the first two
    /// segments.
    ///
    /// Fails with `DataSourceUnavailable` when the source cannot be opened,
    /// with `InsufficientSamples` when a segment has no known cell and with
    /// `CourseExhausted` when the source has no data at all.
    pub fn new(config: SimConfig, source: Box<dyn DepthSource>, path: impl Into<PathBuf>) -> NavResult<Self> {
        config.validate()?;

        let planner = RoutePlanner::new().with_min_passable_depth(config.depth.min_passable_depth);
        let controller = FuzzyController::from_config(&config.controller);
        let step = config.boat.step;

        let mut sim = Self {
            source_path: path.into(),
            state: SimState::Initializing,
            failure: None,
            idle_source: Some(source),
            feed: None,
            active: Grid::new(0, 0),
            prefetched: Grid::new(0, 0),
            max_depth: config.depth.max_depth,
            max_buffer_depth: config.depth.max_buffer_depth,
            remaining_rows: config.source.remaining_rows,
            boat: BoatState::default(),
            planner,
            controller,
            cursor: PathCursor::new(PlannedPath::empty(-1), step),
            window: SensorWindow::default(),
            last_decision: ControlDecision::default(),
            navigation_ticks: 0,
            rollovers: 0,
            segments: 0,
            infeasible_routes: 0,
            config,
        };
        sim.initialize()?;
        Ok(sim)
    }

    fn initialize(&mut self) -> NavResult<()> {
        self.state = SimState::Initializing;
        self.failure = None;

        let mut source = match self.feed.take() {
            Some(feed) => feed.into_source()?,
            None => self
                .idle_source
                .take()
                .ok_or_else(|| NavError::Prefetch("depth source was lost by a failed restart".to_string()))?,
        };
        if let Err(err) = source.open(&self.source_path) {
            self.idle_source = Some(source);
            return Err(err);
        }

        self.max_depth = self.config.depth.max_depth;
        self.max_buffer_depth = self.config.depth.max_buffer_depth;
        self.remaining_rows = self.config.source.remaining_rows;
        self.navigation_ticks = 0;
        self.rollovers = 0;
        self.segments = 0;
        self.infeasible_routes = 0;
        self.window = SensorWindow::default();
        self.last_decision = ControlDecision::default();

        self.feed = Some(SegmentFeed::start(self.config.prefetch, source));
        let first = self.next_prepared()?;
        if first.is_empty() {
            return Err(NavError::CourseExhausted);
        }
        self.stage(first);
        self.promote();

        let next = self.next_prepared()?;
        self.stage(next);

        self.boat = BoatState::at_start(self.active.width(), &self.config.boat);
        self.replan();
        self.state = SimState::Navigating;

        info!(
            "Simulation initialized from {}: {}x{} segment, boat at ({}, {}), {:?} prefetch",
            self.source_path.display(),
            self.active.width(),
            self.active.height(),
            self.boat.x,
            self.boat.y,
            self.config.prefetch
        );
        Ok(())
    }

    fn next_prepared(&mut self) -> NavResult<PreparedSegment> {
        self.feed
            .as_mut()
            .ok_or_else(|| NavError::Prefetch("no segment feed".to_string()))?
            .next_segment()
    }

    /// Keep a prepared segment as the next one
    fn stage(&mut self, segment: PreparedSegment) {
        if !segment.is_empty() {
            self.max_buffer_depth = segment.max_depth;
        }
        self.prefetched = segment.grid;
    }

    /// Move the prefetched segment into the active slot
    fn promote(&mut self) {
        self.active = mem::replace(&mut self.prefetched, Grid::new(0, 0));
        self.max_depth = self.max_buffer_depth;
        self.segments += 1;
    }

    fn replan(&mut self) {
        let path = self.planner.plan(&self.active, self.boat.x);
        match path.advisory() {
            Some(advisory) => {
                self.infeasible_routes += 1;
                warn!("{}; navigating on live soundings", advisory);
            }
            None => debug!("Route planned: {} waypoints, cost {:.2}", path.len(), path.cost()),
        }
        self.cursor = path.into_cursor(self.config.boat.step);
    }

    /// Advance the state machine by one step
    pub fn tick(&mut self) -> NavResult<TickOutcome> {
        match self.state {
            SimState::Exhausted => Ok(TickOutcome::Exhausted),
            SimState::Failed => Err(NavError::Halted(
                self.failure.clone().unwrap_or_else(|| "unknown failure".to_string()),
            )),
            SimState::Initializing => Err(NavError::unavailable(
                &self.source_path,
                "simulation is not initialized",
            )),
            SimState::Navigating | SimState::SegmentRollover => {
                if self.boat.y >= self.active.height() as i32 {
                    self.roll_over()
                } else {
                    self.navigate();
                    Ok(TickOutcome::Navigated)
                }
            }
        }
    }

    fn navigate(&mut self) {
        let window = SensorWindow::sample(
            &self.active,
            &self.boat,
            &self.config.boat,
            self.config.sensors.proximity,
        );

        debug_assert!(
            !window.is_empty(),
            "empty sensor window at ({}, {})",
            self.boat.x,
            self.boat.y
        );

        let decision = match window.bounds() {
            Some((min, max)) => self.controller.decide(&window.soundings(), min, max),
            None => {
                warn!(
                    "No soundings at ({}, {}); holding course",
                    self.boat.x, self.boat.y
                );
                ControlDecision {
                    steering_delta: 0.0,
                    speed: self.boat.speed,
                }
            }
        };

        self.boat.advance(decision, &self.config.boat, self.active.width());
        self.window = window;
        self.last_decision = decision;
        self.navigation_ticks += 1;

        trace!(
            "tick {}: steer {:+.2} speed {:.2} -> ({}, {}) heading {:+.1}",
            self.navigation_ticks,
            decision.steering_delta,
            decision.speed,
            self.boat.x,
            self.boat.y,
            self.boat.heading
        );
    }

    fn roll_over(&mut self) -> NavResult<TickOutcome> {
        self.state = SimState::SegmentRollover;
        let finished_rows = self.active.height();
        self.remaining_rows = self.remaining_rows.map(|rows| rows.saturating_sub(finished_rows));

        if self.prefetched.is_empty() {
            self.state = SimState::Exhausted;
            info!(
                "Course exhausted after {} segments and {} ticks",
                self.segments, self.navigation_ticks
            );
            return Ok(TickOutcome::Exhausted);
        }

        self.promote();
        self.replan();
        self.boat.y = self.config.boat.length as i32;
        self.rollovers += 1;
        self.state = SimState::Navigating;

        info!(
            "Rolled over to segment {} ({}x{}), boat at ({}, {})",
            self.segments,
            self.active.width(),
            self.active.height(),
            self.boat.x,
            self.boat.y
        );

        match self.next_prepared() {
            Ok(next) => {
                self.stage(next);
                Ok(TickOutcome::RolledOver)
            }
            Err(err) => {
                error!("Segment {} could not be prepared: {}", self.segments + 1, err);
                self.state = SimState::Failed;
                self.failure = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Tick until the course is exhausted or `max_ticks` ticks have run
    pub fn run(&mut self, max_ticks: u64) -> NavResult<RunSummary> {
        let mut ticks = 0;
        while ticks < max_ticks && self.state != SimState::Exhausted {
            self.tick()?;
            ticks += 1;
        }
        Ok(self.summary(ticks))
    }

    fn summary(&self, ticks: u64) -> RunSummary {
        RunSummary {
            ticks,
            navigation_ticks: self.navigation_ticks,
            rollovers: self.rollovers,
            segments: self.segments,
            infeasible_routes: self.infeasible_routes,
            exhausted: self.is_exhausted(),
            boat: self.boat,
        }
    }

    /// Restart the course from the beginning of the source
    pub fn reset(&mut self) -> NavResult<()> {
        info!("Resetting simulation");
        self.initialize()
    }

    /// Next waypoint of the planned route, `GridCoord::NONE` once it is used up
    pub fn next_waypoint(&mut self) -> GridCoord {
        self.cursor.next_waypoint()
    }

    pub fn planned_path(&self) -> &PlannedPath {
        self.cursor.path()
    }

    /// `InfeasibleRoute` when the current segment has no route to its exit edge
    pub fn route_advisory(&self) -> Option<NavError> {
        self.planned_path().advisory()
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == SimState::Exhausted
    }

    /// Why the loop halted, if a segment failed to prepare
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn boat(&self) -> &BoatState {
        &self.boat
    }

    /// Segment the boat is on, for rendering
    pub fn active_grid(&self) -> &Grid<f32> {
        &self.active
    }

    /// Segment waiting for the next rollover; empty when none is left
    pub fn prefetched_grid(&self) -> &Grid<f32> {
        &self.prefetched
    }

    /// Normalization bound of the active segment
    pub fn max_depth(&self) -> f32 {
        self.max_depth
    }

    /// Normalization bound of the prefetched segment
    pub fn max_buffer_depth(&self) -> f32 {
        self.max_buffer_depth
    }

    /// Rows of the survey not yet sailed through, if capped
    pub fn remaining_rows(&self) -> Option<usize> {
        self.remaining_rows
    }

    /// Soundings taken on the last navigation tick
    pub fn sensor_window(&self) -> &SensorWindow {
        &self.window
    }

    pub fn last_decision(&self) -> ControlDecision {
        self.last_decision
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }
}
