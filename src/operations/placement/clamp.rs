use crate::canvas::InteriorBounds;
use crate::math::{Cell, CellRect};
use crate::raster::Grid;
use crate::shape::ObjectInstance;

/// Raster rows and columns removed by [`ClampToContainer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trim {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Trim {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Cuts away the parts of an object's raster that stick out of the
/// container interior, moving the pose onto the interior edge when the top
/// or left side is cut.
pub struct ClampToContainer {
    interior: InteriorBounds,
}

impl ClampToContainer {
    #[must_use]
    pub fn new(interior: InteriorBounds) -> Self {
        Self { interior }
    }

    pub fn execute(&self, obj: &mut ObjectInstance) -> Trim {
        let (top, bottom) = overhang(obj.pose.row, obj.height(), self.interior.top, self.interior.floor);
        let (left, right) = overhang(obj.pose.col, obj.width(), self.interior.left, self.interior.right);
        let trim = Trim {
            top,
            bottom,
            left,
            right,
        };
        if trim.is_empty() {
            return trim;
        }

        let (rows, cols) = obj.raster.dims();
        let keep_rows = rows.saturating_sub(top + bottom);
        let keep_cols = cols.saturating_sub(left + right);
        obj.raster = if keep_rows == 0 || keep_cols == 0 {
            Grid::new(0, 0)
        } else {
            obj.raster.crop(CellRect {
                row_min: top,
                row_max: top + keep_rows - 1,
                col_min: left,
                col_max: left + keep_cols - 1,
            })
        };

        let shift = Cell::new(to_i64(top), to_i64(left));
        obj.pose = obj.pose.add(shift);
        obj.curve_points = obj.curve_points.map(|pts| pts.map(|p| p.sub(shift)));
        obj.axis_points = obj.axis_points.map(|pts| pts.map(|p| p.sub(shift)));
        trim
    }
}

/// Cells of `[start, start + len)` before `lo` and at or after `hi`.
fn overhang(start: i64, len: i64, lo: i64, hi: i64) -> (usize, usize) {
    let before = (lo - start).clamp(0, len);
    let after = (start + len - hi).clamp(0, len - before);
    (
        usize::try_from(before).unwrap_or(0),
        usize::try_from(after).unwrap_or(0),
    )
}

fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::shape::{ShapeDescriptor, ShapeGeometry};

    fn interior() -> InteriorBounds {
        InteriorBounds {
            top: 10,
            floor: 50,
            left: 10,
            right: 50,
        }
    }

    fn block(rows: usize, cols: usize, pose: Cell) -> ObjectInstance {
        let desc = ShapeDescriptor::new(
            ShapeGeometry::Box {
                width: 1.0,
                height: 1.0,
                rotation: 0.0,
            },
            4,
        );
        let mut obj = ObjectInstance::new(Arc::new(desc), &Grid::filled(rows, cols, true));
        obj.pose = pose;
        obj
    }

    #[test]
    fn inside_object_is_untouched() {
        let mut obj = block(5, 5, Cell::new(20, 20));
        assert!(ClampToContainer::new(interior()).execute(&mut obj).is_empty());
        assert_eq!(obj.raster.dims(), (5, 5));
    }

    #[test]
    fn overflow_is_cut_on_every_side() {
        let mut obj = block(10, 10, Cell::new(6, 45));
        let trim = ClampToContainer::new(interior()).execute(&mut obj);
        assert_eq!(
            trim,
            Trim {
                top: 4,
                bottom: 0,
                left: 0,
                right: 5
            }
        );
        assert_eq!(obj.pose, Cell::new(10, 45));
        assert_eq!(obj.raster.dims(), (6, 5));

        let mut obj = block(10, 10, Cell::new(45, 5));
        ClampToContainer::new(interior()).execute(&mut obj);
        assert_eq!(obj.pose, Cell::new(45, 10));
        assert_eq!(obj.raster.dims(), (5, 5));
    }

    #[test]
    fn key_points_follow_the_cut() {
        let mut obj = block(10, 10, Cell::new(7, 8)).with_axis_points([Cell::new(5, 5), Cell::new(9, 9)]);
        ClampToContainer::new(interior()).execute(&mut obj);
        assert_eq!(obj.axis_points, Some([Cell::new(2, 3), Cell::new(6, 7)]));
    }

    #[test]
    fn object_fully_outside_vanishes() {
        let mut obj = block(4, 4, Cell::new(0, 20));
        ClampToContainer::new(interior()).execute(&mut obj);
        assert!(obj.raster.is_empty());
    }
}
