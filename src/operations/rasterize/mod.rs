mod custom;
mod ellipse;
mod rect;
mod sheet;
mod trapezoid;

pub use custom::RasterizeCustom;
pub use ellipse::RasterizeEllipse;
pub use rect::RasterizeRect;
pub use sheet::RasterizeSheet;
pub use trapezoid::RasterizeTrapezoid;

use std::sync::Arc;

use tracing::warn;

use crate::error::{RasterError, Result};
use crate::math::Cell;
use crate::raster::Grid;
use crate::shape::{ObjectInstance, ShapeDescriptor, ShapeGeometry};

/// Default minimum foreground count for a custom mask section to be used.
pub const DEFAULT_CUSTOM_MIN_PIXELS: usize = 50;

/// A tight mask together with two key points in the mask's frame
/// (sheet endpoints or cone/cylinder base and apex).
#[derive(Debug, Clone)]
pub struct KeyedMask {
    pub mask: Grid<bool>,
    pub points: [Cell; 2],
}

/// Rasterizes a descriptor into an [`ObjectInstance`] template at pose `(0, 0)`.
///
/// Any primitive that comes out empty is replaced by a single foreground
/// cell so later rules never see a zero extent.
#[derive(Debug, Clone)]
pub struct Rasterize {
    custom_min_pixels: usize,
}

impl Default for Rasterize {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterize {
    #[must_use]
    pub fn new() -> Self {
        Self {
            custom_min_pixels: DEFAULT_CUSTOM_MIN_PIXELS,
        }
    }

    #[must_use]
    pub fn with_custom_min_pixels(mut self, min_pixels: usize) -> Self {
        self.custom_min_pixels = min_pixels;
        self
    }

    /// # Errors
    ///
    /// Returns `RasterError::InvalidParameter` for non-finite or out-of-range
    /// geometry parameters.
    pub fn execute(&self, descriptor: Arc<ShapeDescriptor>) -> Result<ObjectInstance> {
        let (mask, points) = match &descriptor.geometry {
            ShapeGeometry::Ellipse {
                semi_axes,
                rotation,
            } => (RasterizeEllipse::new(*semi_axes, *rotation).execute()?, None),
            ShapeGeometry::Box {
                width,
                height,
                rotation,
            } => (RasterizeRect::new(*width, *height, *rotation).execute()?, None),
            ShapeGeometry::Cone {
                base,
                apex,
                radius1,
                radius2,
            } => {
                let out = RasterizeTrapezoid::new(*base, *apex, *radius1, *radius2).execute()?;
                (out.mask, Some(out.points))
            }
            ShapeGeometry::Cylinder { base, apex, radius } => {
                let out = RasterizeTrapezoid::new(*base, *apex, *radius, *radius).execute()?;
                (out.mask, Some(out.points))
            }
            ShapeGeometry::Sheet {
                length, rotation, ..
            } => {
                let out = RasterizeSheet::new(*length, *rotation).execute()?;
                (out.mask, Some(out.points))
            }
            ShapeGeometry::Custom {
                mask,
                rotation,
                scale,
                ..
            } => (
                RasterizeCustom::new(mask, *rotation, *scale)
                    .with_min_pixels(self.custom_min_pixels)
                    .execute()?,
                None,
            ),
        };

        let (mask, points) = if mask.area() == 0 {
            warn!(
                kind = ?descriptor.kind(),
                label = descriptor.label,
                "primitive rasterized to an empty mask, substituting a single cell"
            );
            (Grid::filled(1, 1, true), points.map(|_| [Cell::default(); 2]))
        } else {
            (mask, points)
        };

        let is_sheet = matches!(descriptor.geometry, ShapeGeometry::Sheet { .. });
        let instance = ObjectInstance::new(descriptor, &mask);
        Ok(match points {
            Some(p) if is_sheet => instance.with_curve_points(p),
            Some(p) => instance.with_axis_points(p),
            None => instance,
        })
    }
}

/// Crops a mask to its content; an all-background mask becomes `0 x 0`.
pub(crate) fn tight(mask: &Grid<bool>) -> Grid<bool> {
    mask.crop_to_content()
        .map_or_else(|| Grid::new(0, 0), |(crop, _)| crop)
}

pub(crate) fn require_finite(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RasterError::InvalidParameter {
            parameter,
            value,
            min: f64::MIN,
            max: f64::MAX,
        }
        .into())
    }
}

pub(crate) fn require_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RasterError::InvalidParameter {
            parameter,
            value,
            min: 0.0,
            max: f64::MAX,
        }
        .into())
    }
}

pub(crate) fn require_non_negative(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RasterError::InvalidParameter {
            parameter,
            value,
            min: 0.0,
            max: f64::MAX,
        }
        .into())
    }
}

/// Rounds a non-negative measure to a cell count.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn cells(value: f64) -> usize {
    value.round().max(0.0) as usize
}
