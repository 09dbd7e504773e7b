use super::{cells, require_finite, require_positive, tight};
use crate::error::Result;
use crate::raster::transform::{rotate, threshold, to_unit, Interpolation};
use crate::raster::Grid;

/// Rasterizes a filled rectangle of `height` rows by `width` columns,
/// rotated about its center.
pub struct RasterizeRect {
    width: f64,
    height: f64,
    rotation: f64,
}

impl RasterizeRect {
    #[must_use]
    pub fn new(width: f64, height: f64, rotation: f64) -> Self {
        Self {
            width,
            height,
            rotation,
        }
    }

    /// # Errors
    ///
    /// Returns `RasterError::InvalidParameter` if a side is not positive or
    /// the rotation is not finite.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn execute(&self) -> Result<Grid<bool>> {
        require_positive("width", self.width)?;
        require_positive("height", self.height)?;
        require_finite("rotation", self.rotation)?;

        let w = cells(self.width).max(1);
        let h = cells(self.height).max(1);
        // Odd square buffer large enough for the diagonal.
        let diagonal = self.width.hypot(self.height);
        let side = (2 * (diagonal / 2.0).floor() as usize + 1).max(w).max(h);

        let mut buffer = Grid::new(side, side);
        let row0 = (side - h) / 2;
        let col0 = (side - w) / 2;
        for row in row0..row0 + h {
            for col in col0..col0 + w {
                buffer.set(row, col, true);
            }
        }

        let rotated = rotate(&to_unit(&buffer), self.rotation, Interpolation::Nearest, true);
        Ok(tight(&threshold(&rotated, 0.5)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_box_is_exact() {
        let mask = RasterizeRect::new(30.0, 20.0, 0.0).execute().unwrap();
        assert_eq!(mask.dims(), (20, 30));
        assert_eq!(mask.area(), 600);
    }

    #[test]
    fn quarter_turn_swaps_dims() {
        let mask = RasterizeRect::new(30.0, 20.0, 90.0).execute().unwrap();
        assert_eq!(mask.dims(), (30, 20));
        assert_eq!(mask.area(), 600);
    }

    #[test]
    fn oblique_box_grows_bounds() {
        let mask = RasterizeRect::new(30.0, 10.0, 45.0).execute().unwrap();
        let (rows, cols) = mask.dims();
        assert!(rows > 10 && cols > 10);
        assert!(rows <= 31 && cols <= 31);
        assert!(mask.area().abs_diff(300) < 30);
    }

    #[test]
    fn rejects_zero_side() {
        assert!(RasterizeRect::new(0.0, 5.0, 0.0).execute().is_err());
    }
}
