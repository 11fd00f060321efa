//! Segment preparation and prefetch
//!
//! A segment is ready once it is loaded, approximated and its deepest value is
//! known. [`SegmentFeed`] prepares segments either on the caller's thread or on
//! a worker that stays one segment ahead, handing each grid over a bounded
//! channel so ownership moves and nothing is shared.

use crate::source::DepthSource;
use crossbeam::channel::{bounded, Receiver};
use rivernav_core::{Grid, NavError, NavResult, PrefetchMode};
use rivernav_library::Approximator;
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// A fully approximated segment
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSegment {
    pub grid: Grid<f32>,
    /// Deepest value of the segment, its normalization bound
    pub max_depth: f32,
}

impl PreparedSegment {
    /// The "no more segments" marker
    pub fn empty() -> Self {
        Self {
            grid: Grid::new(0, 0),
            max_depth: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}

/// Load the next segment from `source` and fill its gaps.
///
/// An exhausted source yields [`PreparedSegment::empty`]. A segment without a
/// single known cell is `InsufficientSamples`.
pub fn prepare_segment(source: &mut dyn DepthSource, approximator: &Approximator) -> NavResult<PreparedSegment> {
    let mut grid = Grid::new(0, 0);
    if !source.load_segment(&mut grid)? {
        return Ok(PreparedSegment::empty());
    }

    let missing = grid.missing_count();
    approximator.approximate(&mut grid)?;
    let max_depth = grid.max_depth();
    debug!(
        "Prepared {}x{} segment ({} cells approximated, max depth {:.2})",
        grid.width(),
        grid.height(),
        missing,
        max_depth
    );

    Ok(PreparedSegment { grid, max_depth })
}

/// Where the next segment comes from
pub enum SegmentFeed {
    /// Prepared on demand on the caller's thread
    Eager {
        source: Box<dyn DepthSource>,
        approximator: Approximator,
    },
    /// Prepared ahead of time by a worker thread
    Background {
        receiver: Receiver<NavResult<PreparedSegment>>,
        worker: JoinHandle<Box<dyn DepthSource>>,
        finished: bool,
    },
}

impl SegmentFeed {
    /// Start a feed over an opened source
    pub fn start(mode: PrefetchMode, source: Box<dyn DepthSource>) -> Self {
        match mode {
            PrefetchMode::Eager => SegmentFeed::Eager {
                source,
                approximator: Approximator::new(),
            },
            PrefetchMode::Background => Self::spawn(source),
        }
    }

    fn spawn(mut source: Box<dyn DepthSource>) -> Self {
        let (sender, receiver) = bounded(1);

        let worker = thread::spawn(move || {
            let approximator = Approximator::new();
            loop {
                let result = prepare_segment(source.as_mut(), &approximator);
                let last = !matches!(&result, Ok(segment) if !segment.is_empty());
                if let Err(err) = &result {
                    error!("Segment worker stopped: {}", err);
                }
                // A closed channel means the feed was dropped or recalled
                if sender.send(result).is_err() || last {
                    break;
                }
            }
            source
        });

        SegmentFeed::Background {
            receiver,
            worker,
            finished: false,
        }
    }

    /// Next prepared segment; empty once the source is exhausted
    pub fn next_segment(&mut self) -> NavResult<PreparedSegment> {
        match self {
            SegmentFeed::Eager {
                source,
                approximator,
            } => prepare_segment(source.as_mut(), approximator),
            SegmentFeed::Background {
                receiver, finished, ..
            } => {
                if *finished {
                    return Ok(PreparedSegment::empty());
                }
                match receiver.recv() {
                    Ok(Ok(segment)) => {
                        *finished = segment.is_empty();
                        Ok(segment)
                    }
                    Ok(Err(err)) => {
                        *finished = true;
                        Err(err)
                    }
                    Err(_) => {
                        *finished = true;
                        Err(NavError::Prefetch("segment worker disconnected".to_string()))
                    }
                }
            }
        }
    }

    /// Stop the feed and take the source back
    pub fn into_source(self) -> NavResult<Box<dyn DepthSource>> {
        match self {
            SegmentFeed::Eager { source, .. } => Ok(source),
            SegmentFeed::Background {
                receiver, worker, ..
            } => {
                // Unblocks a worker waiting to hand over a segment
                drop(receiver);
                worker
                    .join()
                    .map_err(|_| NavError::Prefetch("segment worker panicked".to_string()))
            }
        }
    }
}
