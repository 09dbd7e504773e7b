use std::sync::Arc;

use super::{LiquidSpec, ShapeDescriptor, ShapeKind};
use crate::math::Cell;
use crate::raster::{Grid, Label, BACKGROUND};

/// A rasterized object with a mutable pose.
///
/// The descriptor is shared and never mutated; the raster, pose and key
/// points belong to this instance and are changed by the placement rules.
#[derive(Debug)]
pub struct ObjectInstance {
    descriptor: Arc<ShapeDescriptor>,
    /// Labeled mask; non-zero cells are the object's footprint.
    pub raster: Grid<Label>,
    /// Canvas cell of the raster's top-left corner.
    pub pose: Cell,
    /// Sheet centerline endpoints, relative to `pose`.
    pub curve_points: Option<[Cell; 2]>,
    /// Cone/cylinder base and apex, relative to `pose`.
    pub axis_points: Option<[Cell; 2]>,
}

impl ObjectInstance {
    /// Builds an instance from a binary mask already cropped to its content.
    #[must_use]
    pub fn new(descriptor: Arc<ShapeDescriptor>, mask: &Grid<bool>) -> Self {
        let raster = mask.to_labels(descriptor.label);
        Self {
            descriptor,
            raster,
            pose: Cell::default(),
            curve_points: None,
            axis_points: None,
        }
    }

    #[must_use]
    pub fn with_curve_points(mut self, points: [Cell; 2]) -> Self {
        self.curve_points = Some(points);
        self
    }

    #[must_use]
    pub fn with_axis_points(mut self, points: [Cell; 2]) -> Self {
        self.axis_points = Some(points);
        self
    }

    /// Per-slice copy: the raster is deep-copied, the descriptor is shared.
    #[must_use]
    pub fn clone_for_slice(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            raster: self.raster.clone(),
            pose: self.pose,
            curve_points: self.curve_points,
            axis_points: self.axis_points,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> &ShapeDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.descriptor.kind()
    }

    #[must_use]
    pub fn label(&self) -> Label {
        self.descriptor.label
    }

    #[must_use]
    pub fn liquid(&self) -> Option<&LiquidSpec> {
        self.descriptor.liquid.as_ref()
    }

    #[must_use]
    pub fn is_sheet(&self) -> bool {
        self.kind() == ShapeKind::Sheet
    }

    /// Raster height in cells.
    #[must_use]
    pub fn height(&self) -> i64 {
        i64::try_from(self.raster.rows()).unwrap_or(i64::MAX)
    }

    /// Raster width in cells.
    #[must_use]
    pub fn width(&self) -> i64 {
        i64::try_from(self.raster.cols()).unwrap_or(i64::MAX)
    }

    /// First canvas row below the raster.
    #[must_use]
    pub fn bottom(&self) -> i64 {
        self.pose.row + self.height()
    }

    /// Number of non-background raster cells.
    #[must_use]
    pub fn footprint(&self) -> usize {
        self.raster.count(|v| v != BACKGROUND)
    }

    /// Sheet endpoints in canvas coordinates.
    #[must_use]
    pub fn absolute_curve_points(&self) -> Option<[Cell; 2]> {
        self.curve_points
            .map(|[a, b]| [self.pose.add(a), self.pose.add(b)])
    }
}
