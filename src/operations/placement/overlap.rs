use tracing::debug;

use crate::canvas::OccupancyCanvas;
use crate::math::{Cell, CellRect};
use crate::raster::components::Components;
use crate::shape::ObjectInstance;

/// Default cap on resolver iterations.
pub const DEFAULT_MAX_OVERLAP_ITERATIONS: usize = 10;

/// Consecutive pose revisits that count as an oscillation.
const OSCILLATION_REVISITS: usize = 2;

/// Axes along which the resolver may shift an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axes {
    pub rows: bool,
    pub cols: bool,
}

impl Axes {
    pub const BOTH: Self = Self {
        rows: true,
        cols: true,
    };
    pub const ROWS: Self = Self {
        rows: true,
        cols: false,
    };
    pub const COLS: Self = Self {
        rows: false,
        cols: true,
    };
}

/// How a call to [`ResolveOverlap::execute`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No overlap remains.
    Resolved,
    /// The object kept returning to earlier poses; an upward escape shift was
    /// applied.
    Oscillating,
    /// The iteration cap was hit with overlap remaining.
    Capped,
    /// The next shift would have sunk the object into the floor; it was not
    /// applied.
    Floored,
}

/// Shifts an object away from the largest connected patch of its overlap
/// with the canvas until the overlap clears or a stop condition is met.
pub struct ResolveOverlap {
    axes: Axes,
    max_iterations: usize,
}

impl ResolveOverlap {
    #[must_use]
    pub fn new(axes: Axes) -> Self {
        Self {
            axes,
            max_iterations: DEFAULT_MAX_OVERLAP_ITERATIONS,
        }
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Mutates `obj.pose` only.
    pub fn execute(&self, canvas: &OccupancyCanvas<'_>, obj: &mut ObjectInstance) -> Resolution {
        let floor = canvas.boundary().floor();
        let mut history = vec![obj.pose];
        let mut revisits = 0;

        for _ in 0..self.max_iterations {
            let overlap = canvas.overlap(obj);
            if overlap.is_empty() {
                return Resolution::Resolved;
            }
            let components = Components::label(&overlap.region);
            let Some(patch) = components.largest().and_then(|id| components.bounds(id)) else {
                return Resolution::Resolved;
            };

            let (rows, cols) = obj.raster.dims();
            let d_row = if self.axes.rows {
                axis_shift(patch.row_min, patch.row_max, rows)
            } else {
                0
            };
            let d_col = if self.axes.cols {
                axis_shift(patch.col_min, patch.col_max, cols)
            } else {
                0
            };

            let candidate = obj.pose.offset(d_row, d_col);
            // Last raster row would sit on or below the floor row.
            if candidate.row + obj.height() > floor {
                debug!(label = obj.label(), ?candidate, "overlap shift stopped at the floor");
                return Resolution::Floored;
            }

            if history.contains(&candidate) {
                revisits += 1;
            } else {
                revisits = 0;
            }
            obj.pose = candidate;
            history.push(candidate);

            if revisits >= OSCILLATION_REVISITS {
                obj.pose = escape(candidate, patch);
                debug!(label = obj.label(), pose = ?obj.pose, "overlap oscillation, escaped upward");
                return Resolution::Oscillating;
            }
        }

        if canvas.overlap(obj).is_empty() {
            Resolution::Resolved
        } else {
            Resolution::Capped
        }
    }
}

/// Shift along one axis for an overlap patch spanning `[min, max]` of a
/// raster of length `len`.
fn axis_shift(min: usize, max: usize, len: usize) -> i64 {
    let span = i64::try_from(max - min + 1).unwrap_or(i64::MAX);
    let near = min == 0;
    let far = max + 1 == len;
    match (near, far) {
        (true, true) | (false, false) => 0,
        (false, true) => -span,
        (true, false) => span,
    }
}

fn escape(pose: Cell, patch: CellRect) -> Cell {
    let span = i64::try_from(patch.rows()).unwrap_or(i64::MAX);
    pose.offset(-span, 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::canvas::ContainerBoundary;
    use crate::raster::{Grid, Label};
    use crate::shape::{ShapeDescriptor, ShapeGeometry};

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

    #[test]
    fn shift_rules() {
        assert_eq!(axis_shift(0, 9, 10), 0);
        assert_eq!(axis_shift(6, 9, 10), -4);
        assert_eq!(axis_shift(0, 2, 10), 3);
        assert_eq!(axis_shift(3, 5, 10), 0);
    }

    #[test]
    fn non_overlapping_object_is_untouched() {
        let b = ContainerBoundary::square(50, 2).unwrap();
        let mut canvas = OccupancyCanvas::new(&b);
        canvas.commit(&block(4, 10, 10, Cell::new(60, 40)));
        let mut obj = block(5, 10, 10, Cell::new(20, 40));
        let res = ResolveOverlap::new(Axes::BOTH).execute(&canvas, &mut obj);
        assert_eq!(res, Resolution::Resolved);
        assert_eq!(obj.pose, Cell::new(20, 40));
    }

    #[test]
    fn resting_on_top_clears_overlap() {
        let b = ContainerBoundary::square(50, 2).unwrap();
        let mut canvas = OccupancyCanvas::new(&b);
        canvas.commit(&block(4, 10, 30, Cell::new(60, 30)));
        // Bottom four rows sink into the obstacle across the full width.
        let mut obj = block(5, 10, 10, Cell::new(54, 40));
        let res = ResolveOverlap::new(Axes::BOTH).execute(&canvas, &mut obj);
        assert_eq!(res, Resolution::Resolved);
        assert_eq!(obj.pose, Cell::new(50, 40));
        assert!(canvas.overlap(&obj).is_empty());
    }

    #[test]
    fn side_overlap_moves_sideways() {
        let b = ContainerBoundary::square(50, 2).unwrap();
        let mut canvas = OccupancyCanvas::new(&b);
        canvas.commit(&block(4, 40, 10, Cell::new(40, 30)));
        // Left three columns overlap over the whole height.
        let mut obj = block(5, 10, 10, Cell::new(50, 37));
        let res = ResolveOverlap::new(Axes::BOTH).execute(&canvas, &mut obj);
        assert_eq!(res, Resolution::Resolved);
        assert_eq!(obj.pose, Cell::new(50, 40));
    }

    #[test]
    fn shift_into_floor_is_refused() {
        let b = ContainerBoundary::square(50, 2).unwrap();
        let mut canvas = OccupancyCanvas::new(&b);
        canvas.commit(&block(4, 5, 30, Cell::new(80, 30)));
        // Top rows overlap, so the resolver wants to push down past the floor.
        let mut obj = block(5, 18, 10, Cell::new(82, 40));
        let res = ResolveOverlap::new(Axes::BOTH).execute(&canvas, &mut obj);
        assert_eq!(res, Resolution::Floored);
        assert_eq!(obj.pose, Cell::new(82, 40));
    }

    #[test]
    fn enclosed_overlap_terminates() {
        let b = ContainerBoundary::square(50, 2).unwrap();
        let mut canvas = OccupancyCanvas::new(&b);
        canvas.commit(&block(4, 2, 2, Cell::new(45, 45)));
        // The obstacle sits strictly inside the object: no direction helps.
        let mut obj = block(5, 10, 10, Cell::new(41, 41));
        let res = ResolveOverlap::new(Axes::BOTH).execute(&canvas, &mut obj);
        assert_eq!(res, Resolution::Oscillating);
        assert_eq!(obj.pose, Cell::new(39, 41));
    }

    #[test]
    fn cap_is_respected() {
        let b = ContainerBoundary::square(50, 2).unwrap();
        let mut canvas = OccupancyCanvas::new(&b);
        canvas.commit(&block(4, 2, 2, Cell::new(45, 45)));
        let mut obj = block(5, 10, 10, Cell::new(41, 41));
        let res = ResolveOverlap::new(Axes::BOTH)
            .with_max_iterations(1)
            .execute(&canvas, &mut obj);
        assert_eq!(res, Resolution::Capped);
    }
}
