use serde::{Deserialize, Serialize};

use crate::error::{BagError, ConfigError, Result};
use crate::math::Point2;
use crate::raster::Label;

/// Primitive shape family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Ellipse,
    Box,
    Cone,
    Cylinder,
    Sheet,
    Custom,
}

/// Shape-specific geometry. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeGeometry {
    Ellipse {
        /// Semi-axes along rows and columns before rotation.
        semi_axes: [f64; 2],
        #[serde(default)]
        rotation: f64,
    },
    Box {
        /// Extent along columns.
        width: f64,
        /// Extent along rows.
        height: f64,
        #[serde(default)]
        rotation: f64,
    },
    /// Trapezoid with half-widths `radius1` at `base` and `radius2` at `apex`.
    Cone {
        base: Point2,
        apex: Point2,
        radius1: f64,
        radius2: f64,
    },
    Cylinder {
        base: Point2,
        apex: Point2,
        radius: f64,
    },
    /// Deformable sheet: a centerline of `length` inflated to `thickness`.
    Sheet {
        length: f64,
        thickness: f64,
        #[serde(default)]
        rotation: f64,
    },
    Custom {
        /// Handle of the externally supplied mask (e.g. its file path).
        source: String,
        mask: VoxelMask,
        #[serde(default)]
        rotation: f64,
        #[serde(default = "unit_scale")]
        scale: f64,
    },
}

fn unit_scale() -> f64 {
    1.0
}

impl ShapeGeometry {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Ellipse { .. } => ShapeKind::Ellipse,
            Self::Box { .. } => ShapeKind::Box,
            Self::Cone { .. } => ShapeKind::Cone,
            Self::Cylinder { .. } => ShapeKind::Cylinder,
            Self::Sheet { .. } => ShapeKind::Sheet,
            Self::Custom { .. } => ShapeKind::Custom,
        }
    }
}

/// Parameters of a liquid-filled container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidSpec {
    /// Fill fraction: `0.0` empty, `1.0` full.
    pub level: f64,
    /// Wall thickness eroded from the container footprint, in cells.
    pub wall_thickness: usize,
    /// Label written into the filled cavity.
    pub label: Label,
    #[serde(default)]
    pub material: Option<String>,
}

/// Boolean voxel volume indexed `(row, col, depth)`, row-major with depth
/// varying fastest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawVoxelMask")]
pub struct VoxelMask {
    dims: [usize; 3],
    voxels: Vec<bool>,
}

/// Unchecked serialized form of [`VoxelMask`].
#[derive(Deserialize)]
struct RawVoxelMask {
    dims: [usize; 3],
    voxels: Vec<bool>,
}

impl TryFrom<RawVoxelMask> for VoxelMask {
    type Error = BagError;

    fn try_from(raw: RawVoxelMask) -> Result<Self> {
        Self::new(raw.dims, raw.voxels)
    }
}

impl VoxelMask {
    /// Wraps voxel data.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidInput` if the data length does not match `dims`.
    pub fn new(dims: [usize; 3], voxels: Vec<bool>) -> Result<Self> {
        let expected = dims[0].checked_mul(dims[1]).and_then(|n| n.checked_mul(dims[2]));
        if expected != Some(voxels.len()) {
            return Err(ConfigError::InvalidInput(format!(
                "voxel mask {}x{}x{} does not hold {} values",
                dims[0],
                dims[1],
                dims[2],
                voxels.len()
            ))
            .into());
        }
        Ok(Self { dims, voxels })
    }

    #[must_use]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize, depth: usize) -> bool {
        let [rows, cols, depths] = self.dims;
        row < rows && col < cols && depth < depths && self.voxels[(row * cols + col) * depths + depth]
    }
}

/// Immutable description of one object, as produced by an external sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub geometry: ShapeGeometry,
    pub label: Label,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub liquid: Option<LiquidSpec>,
}

impl ShapeDescriptor {
    #[must_use]
    pub fn new(geometry: ShapeGeometry, label: Label) -> Self {
        Self {
            geometry,
            label,
            material: None,
            liquid: None,
        }
    }

    /// Sets the material name.
    #[must_use]
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Turns the object into a liquid-filled container.
    #[must_use]
    pub fn with_liquid(mut self, liquid: LiquidSpec) -> Self {
        self.liquid = Some(liquid);
        self
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Parses a JSON array of descriptors. Any unknown shape kind rejects the
    /// whole list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` on malformed input.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        let list = serde_json::from_str(json).map_err(ConfigError::from)?;
        Ok(list)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_tagged_list() {
        let json = r#"[
            {"geometry": {"kind": "ellipse", "semi_axes": [10, 6]}, "label": 4},
            {"geometry": {"kind": "box", "width": 30, "height": 20, "rotation": 15}, "label": 5,
             "liquid": {"level": 0.5, "wall_thickness": 2, "label": 9}},
            {"geometry": {"kind": "cylinder", "base": [0, 0], "apex": [0, 40], "radius": 6}, "label": 6}
        ]"#;
        let list = ShapeDescriptor::list_from_json(json).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].kind(), ShapeKind::Ellipse);
        assert_eq!(list[1].liquid.as_ref().unwrap().label, 9);
        assert_eq!(list[2].kind(), ShapeKind::Cylinder);
    }

    #[test]
    fn unknown_kind_rejects_list() {
        let json = r#"[
            {"geometry": {"kind": "ellipse", "semi_axes": [3, 3]}, "label": 4},
            {"geometry": {"kind": "torus", "radius": 3}, "label": 5}
        ]"#;
        let err = ShapeDescriptor::list_from_json(json).unwrap_err();
        assert!(matches!(err, BagError::Config(ConfigError::Json(_))));
    }

    #[test]
    fn voxel_mask_checks_length() {
        assert!(VoxelMask::new([2, 2, 2], vec![false; 8]).is_ok());
        assert!(VoxelMask::new([2, 2, 2], vec![false; 7]).is_err());
    }

    #[test]
    fn short_voxel_data_rejects_list() {
        let json = r#"[
            {"geometry": {"kind": "custom", "source": "bag/0007.npy",
                          "mask": {"dims": [4, 4, 2], "voxels": [true, true]}}, "label": 4}
        ]"#;
        let err = ShapeDescriptor::list_from_json(json).unwrap_err();
        assert!(matches!(err, BagError::Config(ConfigError::Json(_))));
        assert!(err.to_string().contains("4x4x2"));
    }

    #[test]
    fn voxel_indexing_depth_fastest() {
        let mut voxels = vec![false; 2 * 3 * 4];
        voxels[(3 + 2) * 4 + 1] = true;
        let mask = VoxelMask::new([2, 3, 4], voxels).unwrap();
        assert!(mask.get(1, 2, 1));
        assert!(!mask.get(1, 2, 0));
        assert!(!mask.get(5, 0, 0));
    }
}
