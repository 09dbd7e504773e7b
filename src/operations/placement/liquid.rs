use crate::error::{PlacementError, Result};
use crate::raster::morphology::{disk, erode};
use crate::raster::VOID;
use crate::shape::{LiquidSpec, ObjectInstance};

/// Summary of a successful [`FillLiquid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidFill {
    /// First raster row holding liquid.
    pub fill_row: usize,
    pub liquid_cells: usize,
    pub void_cells: usize,
}

/// Fills the cavity of a placed container: cells at or below the fill line
/// get the liquid label, cells above it become void.
pub struct FillLiquid<'a> {
    spec: &'a LiquidSpec,
}

impl<'a> FillLiquid<'a> {
    #[must_use]
    pub fn new(spec: &'a LiquidSpec) -> Self {
        Self { spec }
    }

    /// Rewrites `obj.raster` in place. On error the raster is untouched.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::LiquidFill` if the level is outside `[0, 1]`
    /// or the wall thickness leaves no cavity.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn execute(&self, obj: &mut ObjectInstance) -> Result<LiquidFill> {
        let level = self.spec.level;
        if !level.is_finite() || !(0.0..=1.0).contains(&level) {
            return Err(PlacementError::LiquidFill(format!("fill level {level} outside [0, 1]")).into());
        }
        let cavity = erode(&obj.raster.occupancy(), &disk(self.spec.wall_thickness));
        let Some(rect) = cavity.foreground_bounds() else {
            return Err(PlacementError::LiquidFill(format!(
                "wall thickness {} leaves no cavity in a {}x{} footprint",
                self.spec.wall_thickness,
                obj.raster.rows(),
                obj.raster.cols()
            ))
            .into());
        };

        let depth = (rect.row_max - rect.row_min) as f64;
        let fill_row = rect.row_min + ((1.0 - level) * depth).floor() as usize;
        let mut liquid_cells = 0;
        let mut void_cells = 0;
        for (row, col, inside) in cavity.iter_cells() {
            if !inside {
                continue;
            }
            if row >= fill_row {
                obj.raster.set(row, col, self.spec.label);
                liquid_cells += 1;
            } else {
                obj.raster.set(row, col, VOID);
                void_cells += 1;
            }
        }
        Ok(LiquidFill {
            fill_row,
            liquid_cells,
            void_cells,
        })
    }
}
