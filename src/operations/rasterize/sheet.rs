use super::{cells, require_finite, require_positive, KeyedMask};
use crate::error::Result;
use crate::math::Cell;
use crate::raster::transform::{rotate, rotate_position, threshold, to_unit, Interpolation};
use crate::raster::Grid;

/// Margin kept around the centerline before rotation.
const MARGIN: usize = 5;

/// Interpolated values at or below this count as background.
const SUPPORT: f64 = 1e-6;

/// Rasterizes the undeformed centerline of a sheet: a one-cell-thick
/// segment of `length` cells rotated by `rotation` degrees.
///
/// The returned key points are the foreground cells nearest to the rotated
/// segment ends.
pub struct RasterizeSheet {
    length: f64,
    rotation: f64,
}

impl RasterizeSheet {
    #[must_use]
    pub fn new(length: f64, rotation: f64) -> Self {
        Self { length, rotation }
    }

    /// # Errors
    ///
    /// Returns `RasterError::InvalidParameter` if the length is not positive
    /// or the rotation is not finite.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss
    )]
    pub fn execute(&self) -> Result<KeyedMask> {
        require_positive("length", self.length)?;
        require_finite("rotation", self.rotation)?;

        let length = cells(self.length).max(1);
        let side = length + 2 * MARGIN;
        let mid = side / 2;
        let mut buffer = Grid::new(side, side);
        for col in MARGIN..MARGIN + length {
            buffer.set(mid, col, true);
        }

        let rotated = rotate(&to_unit(&buffer), self.rotation, Interpolation::Linear, false);
        let full = threshold(&rotated, SUPPORT);
        let Some((mask, rect)) = full.crop_to_content() else {
            return Ok(KeyedMask {
                mask: Grid::new(0, 0),
                points: [Cell::default(); 2],
            });
        };

        let ends = [MARGIN, MARGIN + length - 1].map(|col| {
            let (r, c) = rotate_position(
                (mid as f64, col as f64),
                buffer.dims(),
                buffer.dims(),
                self.rotation,
            );
            let nearest = nearest_foreground(&mask, r - rect.row_min as f64, c - rect.col_min as f64);
            nearest.unwrap_or_default()
        });
        Ok(KeyedMask { mask, points: ends })
    }
}

/// Foreground cell closest to `(row, col)`; the first in raster order wins
/// a tie.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn nearest_foreground(mask: &Grid<bool>, row: f64, col: f64) -> Option<Cell> {
    let mut best: Option<(Cell, f64)> = None;
    for (r, c, v) in mask.iter_cells() {
        if !v {
            continue;
        }
        let d = (r as f64 - row).powi(2) + (c as f64 - col).powi(2);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((Cell::new(r as i64, c as i64), d));
        }
    }
    best.map(|(cell, _)| cell)
}
