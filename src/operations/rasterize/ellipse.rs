use super::{require_finite, require_positive, tight};
use crate::error::Result;
use crate::raster::Grid;

/// Rasterizes a filled, rotated ellipse.
///
/// `semi_axes` are the half extents along rows and columns before rotation.
pub struct RasterizeEllipse {
    semi_axes: [f64; 2],
    rotation: f64,
}

impl RasterizeEllipse {
    #[must_use]
    pub fn new(semi_axes: [f64; 2], rotation: f64) -> Self {
        Self {
            semi_axes,
            rotation,
        }
    }

    /// Returns the tight mask of cells whose rotated normalized distance to
    /// the center is below one.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::InvalidParameter` if a semi-axis is not positive
    /// or the rotation is not finite.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn execute(&self) -> Result<Grid<bool>> {
        let [a, b] = self.semi_axes;
        require_positive("semi_axes[0]", a)?;
        require_positive("semi_axes[1]", b)?;
        require_finite("rotation", self.rotation)?;

        let reach = a.max(b).ceil() as usize;
        let side = 2 * reach + 3;
        let center = (reach + 1) as f64;
        let (s, c) = self.rotation.to_radians().sin_cos();

        let mut mask = Grid::new(side, side);
        for row in 0..side {
            for col in 0..side {
                let dr = row as f64 - center;
                let dc = col as f64 - center;
                let u = c * dr + s * dc;
                let v = c * dc - s * dr;
                if (u / a).powi(2) + (v / b).powi(2) < 1.0 {
                    mask.set(row, col, true);
                }
            }
        }
        Ok(tight(&mask))
    }
}
