use tracing::debug;

use crate::canvas::OccupancyCanvas;
use crate::math::line_2d::line_cells;
use crate::math::Cell;
use crate::operations::rasterize::cells;
use crate::raster::morphology::{dilate, disk};
use crate::raster::{Grid, BACKGROUND};
use crate::shape::{ObjectInstance, ShapeGeometry};

/// Polyline a sheet drapes along, as ordered segments in canvas coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetCurve {
    pub segments: Vec<[Cell; 2]>,
}

impl SheetCurve {
    /// Replaces `obj`'s raster by the one-cell-thick curve and moves its pose
    /// to the curve's bounding-box corner.
    pub fn apply(&self, obj: &mut ObjectInstance) {
        let Some((min, max)) = self.bounds() else {
            return;
        };
        let rows = usize::try_from(max.row - min.row + 1).unwrap_or(0);
        let cols = usize::try_from(max.col - min.col + 1).unwrap_or(0);
        let label = obj.label();
        let mut raster = Grid::new(rows, cols);
        for &[a, b] in &self.segments {
            for cell in line_cells(a.sub(min), b.sub(min)) {
                if let (Ok(r), Ok(c)) = (usize::try_from(cell.row), usize::try_from(cell.col)) {
                    raster.set(r, c, label);
                }
            }
        }
        obj.raster = raster;
        obj.pose = min;
        if let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) {
            obj.curve_points = Some([first[0].sub(min), last[1].sub(min)]);
        }
    }

    fn bounds(&self) -> Option<(Cell, Cell)> {
        let mut cells = self.segments.iter().flatten();
        let first = *cells.next()?;
        Some(cells.fold((first, first), |(lo, hi), c| {
            (
                Cell::new(lo.row.min(c.row), lo.col.min(c.col)),
                Cell::new(hi.row.max(c.row), hi.col.max(c.col)),
            )
        }))
    }
}

/// Decides how a sheet deforms around canvas content by recursive midpoint
/// subdivision of its centerline. The canvas is only read.
///
/// A segment whose line crosses no occupied cell is kept. Otherwise its
/// midpoint moves to the nearest free cell in its column and both halves
/// are refined. When the relocated midpoint coincides with a segment end
/// the segment is kept as is, so some residual overlap may remain.
#[derive(Debug, Default)]
pub struct FitSheetCurve;

impl FitSheetCurve {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Fits the curve for `obj`, whose `curve_points` must be set. Objects
    /// without curve points yield an empty curve.
    #[must_use]
    pub fn execute(&self, canvas: &OccupancyCanvas<'_>, obj: &ObjectInstance) -> SheetCurve {
        let Some(ends) = obj.absolute_curve_points() else {
            return SheetCurve {
                segments: Vec::new(),
            };
        };
        let interior = canvas.boundary().interior();
        let [a, b] = ends.map(|p| {
            let p = Cell::new(
                p.row.clamp(interior.top, interior.floor - 1),
                p.col.clamp(interior.left, interior.right - 1),
            );
            if canvas.is_occupied(p) {
                canvas.nearest_free_in_column(p).unwrap_or(p)
            } else {
                p
            }
        });

        let (rows, cols) = canvas.dims();
        let max_depth = rows.max(cols);
        let mut segments = Vec::new();
        subdivide(canvas, a, b, max_depth, &mut segments);
        debug!(label = obj.label(), segments = segments.len(), "sheet curve fitted");
        SheetCurve { segments }
    }
}

fn subdivide(canvas: &OccupancyCanvas<'_>, a: Cell, b: Cell, depth: usize, out: &mut Vec<[Cell; 2]>) {
    let blocked = line_cells(a, b).into_iter().any(|c| canvas.is_occupied(c));
    if !blocked || depth == 0 {
        out.push([a, b]);
        return;
    }
    let mid = a.midpoint(b);
    let mid = canvas.nearest_free_in_column(mid).unwrap_or(mid);
    if mid == a || mid == b {
        out.push([a, b]);
        return;
    }
    subdivide(canvas, a, mid, depth - 1, out);
    subdivide(canvas, mid, b, depth - 1, out);
}

/// Thickens a fitted sheet curve to the sheet's thickness and drops the
/// cells that would overlap existing content.
#[derive(Debug)]
pub struct InflateSheet {
    radius: usize,
}

impl InflateSheet {
    /// Dilation radius is half the thickness, rounded.
    #[must_use]
    pub fn new(thickness: f64) -> Self {
        Self {
            radius: cells(thickness / 2.0),
        }
    }

    /// Uses the thickness stored in `obj`'s descriptor.
    #[must_use]
    pub fn for_object(obj: &ObjectInstance) -> Self {
        match obj.descriptor().geometry {
            ShapeGeometry::Sheet { thickness, .. } => Self::new(thickness),
            _ => Self { radius: 0 },
        }
    }

    /// Returns the number of cells removed because of overlap.
    pub fn execute(&self, canvas: &OccupancyCanvas<'_>, obj: &mut ObjectInstance) -> usize {
        let r = self.radius;
        if r > 0 {
            let padded = obj.raster.occupancy().padded(r, r, false);
            obj.raster = dilate(&padded, &disk(r)).to_labels(obj.label());
            let pad = Cell::new(to_i64(r), to_i64(r));
            obj.pose = obj.pose.sub(pad);
            obj.curve_points = obj.curve_points.map(|pts| pts.map(|p| p.add(pad)));
        }
        let overlap = canvas.overlap(obj);
        for (row, col, hit) in overlap.region.iter_cells() {
            if hit {
                obj.raster.set(row, col, BACKGROUND);
            }
        }
        overlap.cells()
    }
}

fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::canvas::ContainerBoundary;
    use crate::raster::Label;
    use crate::shape::ShapeDescriptor;

    fn block(label: Label, rows: usize, cols: usize, pose: Cell) -> ObjectInstance {
        let desc = ShapeDescriptor::new(
            ShapeGeometry::Box {
                width: 1.0,
                height: 1.0,
                rotation: 0.0,
            },
            label,
        );
        let mut obj = ObjectInstance::new(Arc::new(desc), &Grid::filled(rows, cols, true));
        obj.pose = pose;
        obj
    }

    #[allow(clippy::cast_precision_loss)]
    fn flat_sheet(length: usize, thickness: f64, pose: Cell) -> ObjectInstance {
        let desc = ShapeDescriptor::new(
            ShapeGeometry::Sheet {
                length: length as f64,
                thickness,
                rotation: 0.0,
            },
            9,
        );
        let end = i64::try_from(length).unwrap() - 1;
        let mut obj = ObjectInstance::new(Arc::new(desc), &Grid::filled(1, length, true))
            .with_curve_points([Cell::new(0, 0), Cell::new(0, end)]);
        obj.pose = pose;
        obj
    }

    #[test]
    fn unobstructed_sheet_stays_straight() {
        let b = ContainerBoundary::square(30, 2).unwrap();
        let canvas = OccupancyCanvas::new(&b);
        let sheet = flat_sheet(20, 2.0, Cell::new(30, 10));
        let curve = FitSheetCurve::new().execute(&canvas, &sheet);
        assert_eq!(curve.segments, vec![[Cell::new(30, 10), Cell::new(30, 29)]]);
    }

    #[test]
    fn sheet_drapes_over_an_obstacle() {
        let b = ContainerBoundary::square(30, 2).unwrap();
        let mut canvas = OccupancyCanvas::new(&b);
        canvas.commit(&block(4, 8, 6, Cell::new(54, 27)));
        let sheet = flat_sheet(30, 2.0, Cell::new(58, 15));
        let curve = FitSheetCurve::new().execute(&canvas, &sheet);
        assert!(curve.segments.len() > 1);
        // Consecutive segments share their joint.
        for pair in curve.segments.windows(2) {
            assert_eq!(pair[0][1], pair[1][0]);
        }
        // Every vertex sits on a free cell.
        for seg in &curve.segments {
            for &p in seg {
                assert!(!canvas.is_occupied(p));
            }
        }
        assert_eq!(curve.segments.first().unwrap()[0], Cell::new(58, 15));
        assert_eq!(curve.segments.last().unwrap()[1], Cell::new(58, 44));
    }

    #[test]
    fn occupied_endpoint_moves_up_its_column() {
        let b = ContainerBoundary::square(30, 2).unwrap();
        let mut canvas = OccupancyCanvas::new(&b);
        canvas.commit(&block(4, 4, 4, Cell::new(58, 8)));
        let sheet = flat_sheet(10, 0.0, Cell::new(60, 10));
        let curve = FitSheetCurve::new().execute(&canvas, &sheet);
        assert_eq!(curve.segments[0][0], Cell::new(57, 10));
    }

    #[test]
    fn endpoints_are_clamped_inside() {
        let b = ContainerBoundary::square(30, 2).unwrap();
        let canvas = OccupancyCanvas::new(&b);
        let sheet = flat_sheet(10, 0.0, Cell::new(70, -3));
        let curve = FitSheetCurve::new().execute(&canvas, &sheet);
        assert_eq!(curve.segments, vec![[Cell::new(61, 2), Cell::new(61, 6)]]);
    }

    #[test]
    fn apply_rebases_the_raster() {
        let curve = SheetCurve {
            segments: vec![
                [Cell::new(20, 10), Cell::new(15, 15)],
                [Cell::new(15, 15), Cell::new(20, 20)],
            ],
        };
        let mut sheet = flat_sheet(5, 0.0, Cell::default());
        curve.apply(&mut sheet);
        assert_eq!(sheet.pose, Cell::new(15, 10));
        assert_eq!(sheet.raster.dims(), (6, 11));
        assert_eq!(sheet.curve_points, Some([Cell::new(5, 0), Cell::new(5, 10)]));
        assert_eq!(sheet.footprint(), 11);
    }

    #[test]
    fn inflation_thickens_and_avoids_content() {
        let b = ContainerBoundary::square(30, 2).unwrap();
        let mut canvas = OccupancyCanvas::new(&b);
        canvas.commit(&block(4, 1, 20, Cell::new(31, 10)));
        let mut sheet = flat_sheet(10, 4.0, Cell::new(30, 15));
        let removed = InflateSheet::for_object(&sheet).execute(&canvas, &mut sheet);
        assert_eq!(sheet.pose, Cell::new(28, 13));
        assert_eq!(sheet.raster.dims(), (5, 14));
        assert!(removed > 0);
        assert!(canvas.overlap(&sheet).is_empty());
        assert_eq!(sheet.curve_points, Some([Cell::new(2, 2), Cell::new(2, 11)]));
    }
}
