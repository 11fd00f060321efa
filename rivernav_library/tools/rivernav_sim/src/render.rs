//! Depth color mapping and snapshots
//!
//! Unknown cells are white. Known depths run from blue (shallow) through green
//! (half the normalization bound) to red (at or beyond the bound).

use rivernav_core::grid::UNKNOWN_DEPTH;
use rivernav_core::{Grid, NavError, NavResult};
use std::path::Path;

/// RGB color of one depth value normalized against `max_depth`
pub fn depth_color(value: f32, max_depth: f32) -> [u8; 3] {
    if value == UNKNOWN_DEPTH {
        return [255, 255, 255];
    }

    let half = (max_depth / 2.0).max(f32::EPSILON);
    let blue = (255.0 * (1.0 - value / half)).clamp(0.0, 255.0) as u8;
    let red = (255.0 * (value / half - 1.0)).clamp(0.0, 255.0) as u8;
    let green = 255 - blue.max(red);
    [red, green, blue]
}

/// RGBA pixels of `grid`, the last row of the course at the top
pub fn render_rgba(grid: &Grid<f32>, max_depth: f32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(grid.len() * 4);
    for y in (0..grid.height()).rev() {
        if let Some(row) = grid.row(y) {
            for &value in row {
                let [r, g, b] = depth_color(value, max_depth);
                pixels.extend_from_slice(&[r, g, b, 255]);
            }
        }
    }
    pixels
}

/// Write `grid` as a PNG
pub fn save_png(grid: &Grid<f32>, max_depth: f32, path: impl AsRef<Path>) -> NavResult<()> {
    let path = path.as_ref();
    let image = image::RgbaImage::from_raw(
        grid.width() as u32,
        grid.height() as u32,
        render_rgba(grid, max_depth),
    )
    .ok_or_else(|| NavError::Image(format!("{}x{} grid does not fit an image", grid.width(), grid.height())))?;

    image
        .save(path)
        .map_err(|e| NavError::Image(format!("{}: {}", path.display(), e)))
}
