//! Per-slice occupancy state.

pub mod boundary;

pub use boundary::{ContainerBoundary, InteriorBounds};

use crate::math::Cell;
use crate::raster::{Grid, Label, BACKGROUND, VOID};
use crate::shape::ObjectInstance;

/// Cells where an object's foreground meets existing canvas content,
/// expressed in the object's raster frame.
#[derive(Debug, Clone)]
pub struct Overlap {
    pub region: Grid<bool>,
    cells: usize,
}

impl Overlap {
    /// Number of overlapping cells.
    #[must_use]
    pub fn cells(&self) -> usize {
        self.cells
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells == 0
    }
}

/// Labeled occupancy grid owned by one slice.
///
/// Walls and prior content are written with the wall label at construction.
/// Objects are added with [`OccupancyCanvas::commit`].
#[derive(Debug, Clone)]
pub struct OccupancyCanvas<'a> {
    boundary: &'a ContainerBoundary,
    labels: Grid<Label>,
}

impl<'a> OccupancyCanvas<'a> {
    #[must_use]
    pub fn new(boundary: &'a ContainerBoundary) -> Self {
        let wall = boundary.wall_label();
        let labels = boundary.walls().map(|w| if w { wall } else { BACKGROUND });
        Self { boundary, labels }
    }

    #[must_use]
    pub fn boundary(&self) -> &'a ContainerBoundary {
        self.boundary
    }

    #[must_use]
    pub fn labels(&self) -> &Grid<Label> {
        &self.labels
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn dims(&self) -> (usize, usize) {
        self.labels.dims()
    }

    /// Whether `cell` holds anything, walls included. Cells outside the
    /// canvas count as occupied.
    #[must_use]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.labels
            .get_signed(cell.row, cell.col)
            .is_none_or(|v| v != BACKGROUND)
    }

    /// Whether `cell` holds placed content: occupied and not a static cell.
    /// Walls and cells outside the canvas do not count.
    #[must_use]
    pub fn holds_content(&self, cell: Cell) -> bool {
        !self.boundary.is_wall(cell.row, cell.col) && self.is_occupied(cell)
    }

    /// Free cell in `cell`'s column closest to `cell.row`; the upper cell
    /// wins a tie. `None` if the column is full or outside the canvas.
    #[must_use]
    pub fn nearest_free_in_column(&self, cell: Cell) -> Option<Cell> {
        let col = usize::try_from(cell.col).ok()?;
        if col >= self.labels.cols() {
            return None;
        }
        let mut best: Option<(i64, i64)> = None;
        for row in 0..self.labels.rows() {
            if self.labels[(row, col)] != BACKGROUND {
                continue;
            }
            let row = i64::try_from(row).unwrap_or(i64::MAX);
            let distance = (row - cell.row).abs();
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((row, distance));
            }
        }
        best.map(|(row, _)| Cell::new(row, cell.col))
    }

    /// Overlap of `obj`'s foreground with non-wall canvas content. Raster
    /// cells that fall outside the canvas never overlap.
    #[must_use]
    pub fn overlap(&self, obj: &ObjectInstance) -> Overlap {
        let mut region = Grid::new(obj.raster.rows(), obj.raster.cols());
        let mut cells = 0;
        for (row, col, v) in obj.raster.iter_cells() {
            if v == BACKGROUND {
                continue;
            }
            let target = obj.pose.offset(to_i64(row), to_i64(col));
            let Some(existing) = self.labels.get_signed(target.row, target.col) else {
                continue;
            };
            if existing != BACKGROUND && !self.boundary.is_wall(target.row, target.col) {
                region.set(row, col, true);
                cells += 1;
            }
        }
        Overlap { region, cells }
    }

    /// Writes `obj`'s foreground at its pose. A cell is written only if it is
    /// background or already carries `obj`'s own label, so neither walls nor
    /// other objects are ever erased. Returns the number of cells written.
    pub fn commit(&mut self, obj: &ObjectInstance) -> usize {
        let own = obj.label();
        let mut written = 0;
        for (row, col, v) in obj.raster.iter_cells() {
            if v == BACKGROUND {
                continue;
            }
            let target = obj.pose.offset(to_i64(row), to_i64(col));
            let (Ok(r), Ok(c)) = (usize::try_from(target.row), usize::try_from(target.col)) else {
                continue;
            };
            match self.labels.get(r, c) {
                Some(existing) if existing == BACKGROUND || existing == own => {
                    self.labels.set(r, c, v);
                    written += 1;
                }
                _ => {}
            }
        }
        written
    }

    /// Final slice image: void cleared to background and prior content
    /// restored with its original labels.
    #[must_use]
    pub fn into_output(self) -> Grid<Label> {
        let mut out = self.labels.map(|v| if v == VOID { BACKGROUND } else { v });
        if let Some(prior) = self.boundary.prior() {
            for (row, col, v) in prior.iter_cells() {
                if v != BACKGROUND {
                    out.set(row, col, v);
                }
            }
        }
        out
    }
}

fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
