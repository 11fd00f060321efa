//! Depth sources
//!
//! A source hands out the river one segment at a time. Row 0 of each segment is
//! the first row read; a source that has run dry leaves the target with zero
//! rows, which the simulation treats as "no more segments".
//!
//! Every source honours an optional row budget (the remaining extent of the
//! survey) and restarts from the beginning when it is opened again.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rivernav_core::grid::UNKNOWN_DEPTH;
use rivernav_core::{Grid, NavError, NavResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Segment producer
pub trait DepthSource: Send {
    /// (Re)open the source at `path`; a failure is `DataSourceUnavailable`
    fn open(&mut self, path: &Path) -> NavResult<()>;

    /// Refill `target` with the next segment; returns whether any rows were delivered
    fn load_segment(&mut self, target: &mut Grid<f32>) -> NavResult<bool>;

    /// Rows the source may still deliver, if capped
    fn remaining_rows(&self) -> Option<usize>;
}

/// Segment size and row budget shared by every source
#[derive(Debug, Clone, Copy)]
struct RowBudget {
    width: usize,
    height: usize,
    cap: Option<usize>,
    remaining: Option<usize>,
}

impl RowBudget {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cap: None,
            remaining: None,
        }
    }

    fn capped(mut self, rows: Option<usize>) -> Self {
        self.cap = rows;
        self.remaining = rows;
        self
    }

    fn restart(&mut self) {
        self.remaining = self.cap;
    }

    /// Pull rows from `next_row` until the segment is full, the budget is
    /// spent or the data ends
    fn fill<F>(&mut self, target: &mut Grid<f32>, mut next_row: F) -> NavResult<bool>
    where
        F: FnMut() -> NavResult<Option<Vec<f32>>>,
    {
        target.reset(self.width, 0);
        let wanted = self.remaining.map_or(self.height, |rows| rows.min(self.height));

        while target.height() < wanted {
            match next_row()? {
                Some(row) => target.push_row(&row),
                None => break,
            }
        }

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= target.height();
        }
        Ok(!target.is_empty())
    }
}

fn not_opened() -> NavError {
    NavError::unavailable(PathBuf::new(), "source has not been opened")
}

/// Parse one line of a depth table; `None` for blank and comment lines
fn parse_row(line: &str, line_no: usize) -> NavResult<Option<Vec<f32>>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    line.split_whitespace()
        .map(|token| {
            token
                .parse::<f32>()
                .map_err(|e| NavError::Parse(format!("line {}: '{}': {}", line_no, token, e)))
        })
        .collect::<NavResult<Vec<f32>>>()
        .map(Some)
}

/// Whitespace-separated depth table, one grid row per line
pub struct TextDepthSource {
    budget: RowBudget,
    lines: Option<Lines<BufReader<File>>>,
    line_no: usize,
}

impl TextDepthSource {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            budget: RowBudget::new(width, height),
            lines: None,
            line_no: 0,
        }
    }

    pub fn with_remaining_rows(mut self, rows: Option<usize>) -> Self {
        self.budget = self.budget.capped(rows);
        self
    }
}

impl DepthSource for TextDepthSource {
    fn open(&mut self, path: &Path) -> NavResult<()> {
        let file = File::open(path).map_err(|e| NavError::unavailable(path, e))?;
        self.lines = Some(BufReader::new(file).lines());
        self.line_no = 0;
        self.budget.restart();
        info!("Opened depth table {}", path.display());
        Ok(())
    }

    fn load_segment(&mut self, target: &mut Grid<f32>) -> NavResult<bool> {
        let lines = self.lines.as_mut().ok_or_else(not_opened)?;
        let line_no = &mut self.line_no;

        self.budget.fill(target, || {
            for line in lines.by_ref() {
                *line_no += 1;
                if let Some(row) = parse_row(&line?, *line_no)? {
                    return Ok(Some(row));
                }
            }
            Ok(None)
        })
    }

    fn remaining_rows(&self) -> Option<usize> {
        self.budget.remaining
    }
}

/// Rows held in memory, handed out in order
#[derive(Debug, Clone)]
pub struct MemoryDepthSource {
    budget: RowBudget,
    rows: Vec<Vec<f32>>,
    cursor: usize,
    available: bool,
}

impl MemoryDepthSource {
    pub fn new(width: usize, height: usize, rows: Vec<Vec<f32>>) -> Self {
        Self {
            budget: RowBudget::new(width, height),
            rows,
            cursor: 0,
            available: true,
        }
    }

    /// Source whose `open` always fails
    pub fn unavailable(width: usize, height: usize) -> Self {
        Self {
            available: false,
            ..Self::new(width, height, Vec::new())
        }
    }

    pub fn with_remaining_rows(mut self, rows: Option<usize>) -> Self {
        self.budget = self.budget.capped(rows);
        self
    }
}

impl DepthSource for MemoryDepthSource {
    fn open(&mut self, path: &Path) -> NavResult<()> {
        if !self.available {
            return Err(NavError::unavailable(path, "source is not available"));
        }
        self.cursor = 0;
        self.budget.restart();
        Ok(())
    }

    fn load_segment(&mut self, target: &mut Grid<f32>) -> NavResult<bool> {
        let rows = &self.rows;
        let cursor = &mut self.cursor;
        self.budget.fill(target, || {
            let row = rows.get(*cursor).cloned();
            *cursor += row.is_some() as usize;
            Ok(row)
        })
    }

    fn remaining_rows(&self) -> Option<usize> {
        self.budget.remaining
    }
}

/// Raster survey: pixel luminance is the depth, black is unknown
pub struct ImageDepthSource {
    inner: MemoryDepthSource,
}

impl ImageDepthSource {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            inner: MemoryDepthSource::new(width, height, Vec::new()),
        }
    }

    pub fn with_remaining_rows(mut self, rows: Option<usize>) -> Self {
        self.inner = self.inner.with_remaining_rows(rows);
        self
    }
}

impl DepthSource for ImageDepthSource {
    fn open(&mut self, path: &Path) -> NavResult<()> {
        let img = image::open(path).map_err(|e| NavError::unavailable(path, e))?;
        let gray = img.to_luma8();
        info!(
            "Opened depth image {} ({}x{} pixels)",
            path.display(),
            gray.width(),
            gray.height()
        );

        self.inner.rows = gray
            .rows()
            .map(|row| row.map(|pixel| pixel[0] as f32).collect())
            .collect();
        self.inner.open(path)
    }

    fn load_segment(&mut self, target: &mut Grid<f32>) -> NavResult<bool> {
        self.inner.load_segment(target)
    }

    fn remaining_rows(&self) -> Option<usize> {
        self.inner.remaining_rows()
    }
}

/// Generated river: a deep channel meandering down the course between
/// shallow banks, with a share of the cells left unsurveyed
pub struct SyntheticDepthSource {
    budget: RowBudget,
    seed: u64,
    missing_fraction: f64,
    max_depth: f32,
    rng: StdRng,
    row_index: usize,
}

impl SyntheticDepthSource {
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        Self {
            budget: RowBudget::new(width, height),
            seed,
            missing_fraction: 0.9,
            max_depth: 20.0,
            rng: StdRng::seed_from_u64(seed),
            row_index: 0,
        }
    }

    /// Fraction of cells left at the unknown sentinel, in `[0, 1)`
    pub fn with_missing_fraction(mut self, fraction: f64) -> Self {
        self.missing_fraction = fraction.clamp(0.0, 0.999);
        self
    }

    pub fn with_max_depth(mut self, depth: f32) -> Self {
        self.max_depth = depth.max(1.0);
        self
    }

    pub fn with_remaining_rows(mut self, rows: Option<usize>) -> Self {
        self.budget = self.budget.capped(rows);
        self
    }

    fn generate_row(&mut self) -> Vec<f32> {
        let width = self.budget.width as f32;
        let t = self.row_index as f32;
        let center = width / 2.0 + width / 4.0 * (t * 0.03).sin() * (t * 0.011).cos();
        let spread = (width / 6.0).max(1.0);

        let row = (0..self.budget.width)
            .map(|x| {
                if self.rng.gen_bool(self.missing_fraction) {
                    return UNKNOWN_DEPTH;
                }
                let offset = (x as f32 - center) / spread;
                let channel = self.max_depth * (-offset * offset).exp();
                let noise: f32 = self.rng.gen_range(-0.5..0.5);
                (channel + noise).clamp(0.5, self.max_depth)
            })
            .collect();
        self.row_index += 1;
        row
    }
}

impl DepthSource for SyntheticDepthSource {
    fn open(&mut self, _path: &Path) -> NavResult<()> {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.row_index = 0;
        self.budget.restart();
        debug!("Synthetic river restarted with seed {}", self.seed);
        Ok(())
    }

    fn load_segment(&mut self, target: &mut Grid<f32>) -> NavResult<bool> {
        let mut budget = self.budget;
        let loaded = budget.fill(target, || Ok(Some(self.generate_row())));
        self.budget.remaining = budget.remaining;
        loaded
    }

    fn remaining_rows(&self) -> Option<usize> {
        self.budget.remaining
    }
}

/// Pick a file source by extension: common raster formats are read as images,
/// anything else as a depth table
pub fn source_for_path(path: &Path, width: usize, height: usize, remaining_rows: Option<usize>) -> Box<dyn DepthSource> {
    let is_image = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            matches!(
                ext.to_ascii_lowercase().as_str(),
                "png" | "jpg" | "jpeg" | "bmp" | "pgm" | "tif" | "tiff"
            )
        })
        .unwrap_or(false);

    if is_image {
        Box::new(ImageDepthSource::new(width, height).with_remaining_rows(remaining_rows))
    } else {
        Box::new(TextDepthSource::new(width, height).with_remaining_rows(remaining_rows))
    }
}
