//! Composition analysis over a coarse brightness grid.
//!
//! The frame is split into G×G cells (G = 3 by default). Each cell holds
//! the mean brightness of its pixels normalized to `[0, 1]`. Two scores
//! are read off the grid:
//!
//! - **Rule of thirds:** mean of the cells whose leading edges sit on the
//!   1/3 and 2/3 lines (indices `G/3` and `2G/3` on each axis).
//! - **Horizontal balance:** absolute difference between the mean of the
//!   left third of columns and the right third of columns.
//!
//! Cell spans are clamped to the image so that frames smaller than the
//! grid still give every cell at least one pixel. The grid size itself is
//! clamped to `1..=MAX_GRID_SIZE`.

use framesight_common::config::MAX_GRID_SIZE;
use framesight_frame_model::{CompositionFeatures, PixelBuffer};

use crate::luminance::pixel_brightness;

/// A normalized brightness grid.
#[derive(Debug, Clone, PartialEq)]
pub struct LuminanceGrid {
    pub size: usize,
    /// Row-major cell means, each in `[0, 1]`.
    pub cells: Vec<f64>,
}

impl LuminanceGrid {
    pub fn from_buffer(buffer: &PixelBuffer, size: usize) -> Self {
        let size = size.clamp(1, MAX_GRID_SIZE);
        let width = buffer.width() as usize;
        let height = buffer.height() as usize;
        let mut cells = vec![0.0; size * size];

        for row in 0..size {
            let (y0, y1) = cell_span(row, size, height);
            for col in 0..size {
                let (x0, x1) = cell_span(col, size, width);

                let mut sum = 0.0;
                let mut count = 0usize;
                for y in y0..y1 {
                    for x in x0..x1 {
                        sum += pixel_brightness(&buffer.pixel(x as u32, y as u32));
                        count += 1;
                    }
                }

                cells[row * size + col] = if count == 0 {
                    0.0
                } else {
                    sum / count as f64 / 255.0
                };
            }
        }

        Self { size, cells }
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.size || row >= self.size {
            return None;
        }
        Some(self.cells[row * self.size + col])
    }

    /// Mean of all cells in the given columns, across every row.
    pub fn columns_mean(&self, cols: std::ops::Range<usize>) -> f64 {
        let cols = cols.start.min(self.size)..cols.end.min(self.size);
        let count = cols.len() * self.size;
        if count == 0 {
            return 0.0;
        }
        let sum: f64 = (0..self.size)
            .flat_map(|row| cols.clone().map(move |col| (col, row)))
            .filter_map(|(col, row)| self.cell(col, row))
            .sum();
        sum / count as f64
    }

    /// Grid indices that sit on the thirds lines, deduplicated.
    pub fn thirds_indices(&self) -> Vec<usize> {
        let mut indices = vec![self.size / 3, 2 * self.size / 3];
        indices.dedup();
        indices
    }

    pub fn rule_of_thirds_score(&self) -> f64 {
        let indices = self.thirds_indices();
        let mut sum = 0.0;
        let mut count = 0usize;
        for &row in &indices {
            for &col in &indices {
                if let Some(value) = self.cell(col, row) {
                    sum += value;
                    count += 1;
                }
            }
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    pub fn balance_horizontal(&self) -> f64 {
        let third = (self.size / 3).max(1);
        let left = self.columns_mean(0..third);
        let right = self.columns_mean(self.size.saturating_sub(third)..self.size);
        (left - right).abs()
    }
}

/// Half-open pixel span `[start, end)` of cell `index` along an axis of
/// `len` pixels split into `cells` parts. Never empty unless `len == 0`.
fn cell_span(index: usize, cells: usize, len: usize) -> (usize, usize) {
    if len == 0 {
        return (0, 0);
    }
    let start = (index * len / cells).min(len - 1);
    let end = ((index + 1) * len / cells).max(start + 1).min(len);
    (start, end)
}

/// Compute composition features for a frame.
pub fn analyze(buffer: &PixelBuffer, grid_size: usize) -> CompositionFeatures {
    let grid = LuminanceGrid::from_buffer(buffer, grid_size);
    CompositionFeatures {
        rule_of_thirds_score: grid.rule_of_thirds_score(),
        balance_horizontal: grid.balance_horizontal(),
        grid_size: grid.size,
        brightness_grid: grid.cells,
    }
}
