use super::{require_finite, require_positive, tight, DEFAULT_CUSTOM_MIN_PIXELS};
use crate::error::Result;
use crate::raster::transform::{rescale, rotate, threshold, to_unit, Interpolation};
use crate::raster::Grid;
use crate::shape::VoxelMask;

/// Interpolated values at or below this count as background.
const SUPPORT: f64 = 1e-6;

/// Rasterizes one depth section of an externally supplied voxel mask,
/// rotated and rescaled.
pub struct RasterizeCustom<'a> {
    volume: &'a VoxelMask,
    rotation: f64,
    scale: f64,
    min_pixels: usize,
}

impl<'a> RasterizeCustom<'a> {
    #[must_use]
    pub fn new(volume: &'a VoxelMask, rotation: f64, scale: f64) -> Self {
        Self {
            volume,
            rotation,
            scale,
            min_pixels: DEFAULT_CUSTOM_MIN_PIXELS,
        }
    }

    /// Minimum foreground count for a section to be picked on its own merit.
    #[must_use]
    pub fn with_min_pixels(mut self, min_pixels: usize) -> Self {
        self.min_pixels = min_pixels;
        self
    }

    /// # Errors
    ///
    /// Returns `RasterError::InvalidParameter` if the scale is not positive or
    /// the rotation is not finite.
    pub fn execute(&self) -> Result<Grid<bool>> {
        require_positive("scale", self.scale)?;
        require_finite("rotation", self.rotation)?;

        let Some(section) = self.pick_section() else {
            return Ok(Grid::new(0, 0));
        };
        let rotated = rotate(&to_unit(&section), self.rotation, Interpolation::Nearest, true);
        let scaled = rescale(&rotated, self.scale, Interpolation::Linear);
        Ok(tight(&threshold(&scaled, SUPPORT)))
    }

    /// The middle section if it is populated enough, else the first section
    /// that is, else the fullest non-empty one.
    fn pick_section(&self) -> Option<Grid<bool>> {
        let [rows, cols, depths] = self.volume.dims();
        if rows == 0 || cols == 0 || depths == 0 {
            return None;
        }
        let counts: Vec<usize> = (0..depths).map(|d| self.section(d).area()).collect();
        let middle = depths / 2;
        let depth = if counts[middle] >= self.min_pixels {
            middle
        } else if let Some(d) = counts.iter().position(|&n| n >= self.min_pixels) {
            d
        } else {
            let (d, &n) = counts
                .iter()
                .enumerate()
                .rev()
                .max_by_key(|&(_, n)| *n)?;
            if n == 0 {
                return None;
            }
            d
        };
        Some(self.section(depth))
    }

    fn section(&self, depth: usize) -> Grid<bool> {
        let [rows, cols, _] = self.volume.dims();
        let mut out = Grid::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                out.set(row, col, self.volume.get(row, col, depth));
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A `rows x cols x depths` volume whose section `d` holds a filled
    /// square of side `sides[d]` in its corner.
    fn volume(rows: usize, cols: usize, sides: &[usize]) -> VoxelMask {
        let depths = sides.len();
        let mut voxels = vec![false; rows * cols * depths];
        for (d, &side) in sides.iter().enumerate() {
            for r in 0..side {
                for c in 0..side {
                    voxels[(r * cols + c) * depths + d] = true;
                }
            }
        }
        VoxelMask::new([rows, cols, depths], voxels).unwrap()
    }

    #[test]
    fn middle_section_preferred() {
        let v = volume(20, 20, &[10, 8, 9]);
        let mask = RasterizeCustom::new(&v, 0.0, 1.0).execute().unwrap();
        assert_eq!(mask.dims(), (8, 8));
    }

    #[test]
    fn sparse_middle_falls_back_to_first_populated() {
        let v = volume(20, 20, &[3, 9, 2, 10]);
        // Middle (index 2) holds 4 cells; index 1 is the first with >= 50.
        let mask = RasterizeCustom::new(&v, 0.0, 1.0).execute().unwrap();
        assert_eq!(mask.dims(), (9, 9));
    }

    #[test]
    fn all_sparse_uses_fullest_section() {
        let v = volume(10, 10, &[2, 4, 1]);
        let mask = RasterizeCustom::new(&v, 0.0, 1.0).execute().unwrap();
        assert_eq!(mask.dims(), (4, 4));
    }

    #[test]
    fn scale_grows_mask() {
        let v = volume(12, 12, &[8]);
        let mask = RasterizeCustom::new(&v, 0.0, 2.0)
            .with_min_pixels(1)
            .execute()
            .unwrap();
        assert!(mask.rows() >= 16 && mask.rows() <= 18);
    }

    #[test]
    fn empty_volume_yields_empty_mask() {
        let v = volume(5, 5, &[0, 0]);
        assert!(RasterizeCustom::new(&v, 0.0, 1.0).execute().unwrap().is_empty());
        assert!(RasterizeCustom::new(&v, 0.0, 0.0).execute().is_err());
    }
}
