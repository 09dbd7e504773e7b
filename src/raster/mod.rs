//! Dense row-major grids and the pixel operations the placement rules need.

pub mod components;
pub mod morphology;
pub mod transform;

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::{RasterError, Result};
use crate::math::CellRect;

/// Material identity stored in labeled grids.
pub type Label = i32;

/// Empty cell.
pub const BACKGROUND: Label = 0;

/// Hollow part of a liquid container above the fill line.
pub const VOID: Label = -1;

/// A dense 2D grid stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "RawGrid<T>",
    bound(deserialize = "T: Copy + Deserialize<'de>")
)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

/// Unchecked serialized form of [`Grid`].
#[derive(Deserialize)]
struct RawGrid<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Copy> TryFrom<RawGrid<T>> for Grid<T> {
    type Error = crate::error::BagError;

    fn try_from(raw: RawGrid<T>) -> Result<Self> {
        Self::from_vec(raw.rows, raw.cols, raw.cells)
    }
}

impl<T: Copy + Default> Grid<T> {
    /// Creates a grid filled with `T::default()`.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }
}

impl<T: Copy> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }

    /// Wraps row-major `cells`.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::ShapeMismatch` if `cells.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, cells: Vec<T>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(cells.len()) {
            return Err(RasterError::ShapeMismatch {
                rows,
                cols,
                len: cells.len(),
            }
            .into());
        }
        Ok(Self { rows, cols, cells })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major view of the cells.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Returns the cell at `(row, col)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    /// Like [`Grid::get`] but accepts signed coordinates.
    #[must_use]
    pub fn get_signed(&self, row: i64, col: i64) -> Option<T> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        self.get(row, col)
    }

    /// Sets the cell at `(row, col)`; out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = value;
        }
    }

    /// Iterates `(row, col, value)` in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i / cols, i % cols, v))
    }

    /// Applies `f` to every cell.
    #[must_use]
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Counts cells matching `pred`.
    #[must_use]
    pub fn count(&self, pred: impl Fn(T) -> bool) -> usize {
        self.cells.iter().filter(|&&v| pred(v)).count()
    }

    /// Bounding rectangle of cells matching `pred`, or `None` if there are none.
    #[must_use]
    pub fn bounds_where(&self, pred: impl Fn(T) -> bool) -> Option<CellRect> {
        let mut rect: Option<CellRect> = None;
        for (row, col, v) in self.iter_cells() {
            if !pred(v) {
                continue;
            }
            match rect.as_mut() {
                Some(r) => r.include(row, col),
                None => {
                    rect = Some(CellRect {
                        row_min: row,
                        row_max: row,
                        col_min: col,
                        col_max: col,
                    });
                }
            }
        }
        rect
    }

    /// Copies out the cells covered by `rect` (clipped to the grid).
    #[must_use]
    pub fn crop(&self, rect: CellRect) -> Self {
        let row_end = (rect.row_max + 1).min(self.rows);
        let col_end = (rect.col_max + 1).min(self.cols);
        let rows = row_end.saturating_sub(rect.row_min);
        let cols = col_end.saturating_sub(rect.col_min);
        let mut cells = Vec::with_capacity(rows * cols);
        for row in rect.row_min..row_end {
            let start = row * self.cols;
            cells.extend_from_slice(&self.cells[start + rect.col_min..start + col_end]);
        }
        Self { rows, cols, cells }
    }

    /// Returns a copy with `rows` extra cells above and below and `cols`
    /// extra cells left and right, filled with `value`.
    #[must_use]
    pub fn padded(&self, rows: usize, cols: usize, value: T) -> Self {
        let mut out = Self::filled(self.rows + 2 * rows, self.cols + 2 * cols, value);
        for (row, col, v) in self.iter_cells() {
            out.set(row + rows, col + cols, v);
        }
        out
    }
}

impl<T: Copy + Default + PartialEq> Grid<T> {
    /// Bounding rectangle of non-default cells.
    #[must_use]
    pub fn foreground_bounds(&self) -> Option<CellRect> {
        let zero = T::default();
        self.bounds_where(|v| v != zero)
    }

    /// Crops to the non-default cells, returning the crop and the offset of
    /// its top-left corner. `None` if every cell is default.
    #[must_use]
    pub fn crop_to_content(&self) -> Option<(Self, CellRect)> {
        let rect = self.foreground_bounds()?;
        Some((self.crop(rect), rect))
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rows && col < self.cols, "grid index out of range");
        &self.cells[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rows && col < self.cols, "grid index out of range");
        &mut self.cells[row * self.cols + col]
    }
}

impl Grid<bool> {
    /// Scales a binary mask into a labeled grid.
    #[must_use]
    pub fn to_labels(&self, label: Label) -> Grid<Label> {
        self.map(|v| if v { label } else { BACKGROUND })
    }

    /// Number of set cells.
    #[must_use]
    pub fn area(&self) -> usize {
        self.count(|v| v)
    }
}

impl Grid<Label> {
    /// Binary footprint: every non-background cell.
    #[must_use]
    pub fn occupancy(&self) -> Grid<bool> {
        self.map(|v| v != BACKGROUND)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Grid<bool> {
        let mut g = Grid::new(5, 6);
        g.set(1, 2, true);
        g.set(3, 4, true);
        g
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Grid::from_vec(2, 2, vec![0; 4]).is_ok());
        assert!(Grid::from_vec(2, 2, vec![0; 5]).is_err());
    }

    #[test]
    fn deserialize_checks_length() {
        let g: Grid<i32> = serde_json::from_str(r#"{"rows":2,"cols":2,"cells":[1,2,3,4]}"#).unwrap();
        assert_eq!(g[(1, 0)], 3);
        let bad = serde_json::from_str::<Grid<i32>>(r#"{"rows":4,"cols":4,"cells":[1,2]}"#);
        assert!(bad.unwrap_err().to_string().contains("does not match 4x4"));
    }

    #[test]
    fn get_and_signed_get() {
        let g = sample();
        assert_eq!(g.get(1, 2), Some(true));
        assert_eq!(g.get(5, 0), None);
        assert_eq!(g.get_signed(-1, 0), None);
        assert_eq!(g.get_signed(3, 4), Some(true));
    }

    #[test]
    fn crop_to_content_is_tight() {
        let (crop, rect) = sample().crop_to_content().unwrap();
        assert_eq!(crop.dims(), (3, 3));
        assert_eq!((rect.row_min, rect.col_min), (1, 2));
        assert!(crop[(0, 0)]);
        assert!(crop[(2, 2)]);
        assert_eq!(crop.area(), 2);
    }

    #[test]
    fn empty_grid_has_no_content() {
        let g: Grid<bool> = Grid::new(3, 3);
        assert!(g.crop_to_content().is_none());
    }

    #[test]
    fn padding_preserves_cells() {
        let g = sample().padded(2, 1, false);
        assert_eq!(g.dims(), (9, 8));
        assert!(g[(3, 3)]);
        assert_eq!(g.area(), 2);
    }

    #[test]
    fn labels_and_occupancy() {
        let labels = sample().to_labels(7);
        assert_eq!(labels[(1, 2)], 7);
        assert_eq!(labels.occupancy(), sample());
    }
}
