use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::math::Cell;
use crate::raster::Label;
use crate::shape::{ObjectInstance, ShapeKind};

/// Final geometry of a placed object in image-frame coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlacedGeometry {
    /// Raster center (`[row, col]`).
    Center { center: [f64; 2] },
    /// Cone/cylinder axis end points.
    Axis { base: Cell, apex: Cell },
}

/// Per-object metadata emitted with each slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub label: Label,
    pub kind: ShapeKind,
    pub material: Option<String>,
    /// Raster top-left corner.
    pub pose: Cell,
    /// Raster `[rows, cols]`.
    pub dims: [usize; 2],
    pub footprint: usize,
    pub geometry: PlacedGeometry,
    pub liquid_label: Option<Label>,
}

impl ObjectRecord {
    /// Describes `obj` with its pose shifted by `origin`.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::Frame` if a cone or cylinder has no axis points.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_instance(obj: &ObjectInstance, origin: Cell) -> Result<Self> {
        let pose = origin.add(obj.pose);
        let (rows, cols) = obj.raster.dims();
        let geometry = match obj.kind() {
            ShapeKind::Cone | ShapeKind::Cylinder => {
                let [base, apex] = obj.axis_points.ok_or_else(|| {
                    PlacementError::Frame(format!(
                        "{:?} with label {} has no axis points",
                        obj.kind(),
                        obj.label()
                    ))
                })?;
                PlacedGeometry::Axis {
                    base: pose.add(base),
                    apex: pose.add(apex),
                }
            }
            ShapeKind::Ellipse | ShapeKind::Box | ShapeKind::Sheet | ShapeKind::Custom => {
                PlacedGeometry::Center {
                    center: [
                        pose.row as f64 + rows as f64 / 2.0,
                        pose.col as f64 + cols as f64 / 2.0,
                    ],
                }
            }
        };
        Ok(Self {
            label: obj.label(),
            kind: obj.kind(),
            material: obj.descriptor().material.clone(),
            pose,
            dims: [rows, cols],
            footprint: obj.footprint(),
            geometry,
            liquid_label: obj.liquid().map(|l| l.label),
        })
    }
}
