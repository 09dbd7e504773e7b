use super::{cells, require_finite, require_non_negative, KeyedMask};
use crate::error::Result;
use crate::math::polygon_2d::{fill_polygon, signed_area_2d};
use crate::math::{Cell, Point2, TOLERANCE};
use crate::raster::transform::{rotate, rotate_position, threshold, to_unit, Interpolation};
use crate::raster::Grid;

/// Rasterizes the 2D section of a cone or cylinder: a trapezoid whose
/// parallel sides have half-widths `radius1` at `base` and `radius2` at
/// `apex`.
///
/// The trapezoid is built along the column axis and rotated by the angle of
/// the base→apex vector (`x` = column, `y` = row). Base and apex are
/// returned in the frame of the cropped mask.
pub struct RasterizeTrapezoid {
    base: Point2,
    apex: Point2,
    radius1: f64,
    radius2: f64,
}

impl RasterizeTrapezoid {
    #[must_use]
    pub fn new(base: Point2, apex: Point2, radius1: f64, radius2: f64) -> Self {
        Self {
            base,
            apex,
            radius1,
            radius2,
        }
    }

    /// # Errors
    ///
    /// Returns `RasterError::InvalidParameter` if a radius is negative or a
    /// coordinate is not finite.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn execute(&self) -> Result<KeyedMask> {
        require_finite("base.x", self.base.x)?;
        require_finite("base.y", self.base.y)?;
        require_finite("apex.x", self.apex.x)?;
        require_finite("apex.y", self.apex.y)?;
        require_non_negative("radius1", self.radius1)?;
        require_non_negative("radius2", self.radius2)?;

        let axis = self.apex - self.base;
        let length = cells(axis.norm()).max(1);
        let reach = self.radius1.max(self.radius2).ceil() as usize;
        let rows = 2 * reach + 1;
        let mid = reach as f64;
        let end = (length - 1) as f64;

        let outline = [
            Point2::new(0.0, mid - self.radius1),
            Point2::new(end, mid - self.radius2),
            Point2::new(end, mid + self.radius2),
            Point2::new(0.0, mid + self.radius1),
        ];
        if signed_area_2d(&outline).abs() < TOLERANCE {
            return Ok(KeyedMask {
                mask: Grid::new(0, 0),
                points: [Cell::default(); 2],
            });
        }

        let mut buffer = Grid::new(rows, length);
        for (row, col) in fill_polygon(&outline, rows, length) {
            buffer.set(row, col, true);
        }

        // Rows grow downward, so the displayed angle flips the row delta.
        let degrees = (-axis.y).atan2(axis.x).to_degrees();
        let rotated = rotate(&to_unit(&buffer), degrees, Interpolation::Nearest, true);
        let mask = threshold(&rotated, 0.5);
        let Some((mask, rect)) = mask.crop_to_content() else {
            return Ok(KeyedMask {
                mask: Grid::new(0, 0),
                points: [Cell::default(); 2],
            });
        };

        let place = |col: f64| {
            let (r, c) = rotate_position((mid, col), buffer.dims(), rotated.dims(), degrees);
            let row = (r.round() as i64 - rect.row_min as i64).clamp(0, mask.rows() as i64 - 1);
            let col = (c.round() as i64 - rect.col_min as i64).clamp(0, mask.cols() as i64 - 1);
            Cell::new(row, col)
        };
        Ok(KeyedMask {
            points: [place(0.0), place(end)],
            mask,
        })
    }
}
