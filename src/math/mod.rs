pub mod line_2d;
pub mod polygon_2d;
pub mod rng;

use serde::{Deserialize, Serialize};

pub use rng::Rng64;

/// 2D point type for continuous geometry (`x` = column, `y` = row).
pub type Point2 = nalgebra::Point2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// An integer grid coordinate. Rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub row: i64,
    pub col: i64,
}

impl Cell {
    #[must_use]
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Component-wise sum.
    #[must_use]
    pub const fn offset(self, d_row: i64, d_col: i64) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Returns `self + other`.
    #[must_use]
    pub const fn add(self, other: Cell) -> Self {
        self.offset(other.row, other.col)
    }

    /// Returns `self - other`.
    #[must_use]
    pub const fn sub(self, other: Cell) -> Self {
        self.offset(-other.row, -other.col)
    }

    /// Integer midpoint, rounded toward negative infinity.
    #[must_use]
    pub fn midpoint(self, other: Cell) -> Self {
        Self {
            row: (self.row + other.row).div_euclid(2),
            col: (self.col + other.col).div_euclid(2),
        }
    }
}

/// An inclusive rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub row_min: usize,
    pub row_max: usize,
    pub col_min: usize,
    pub col_max: usize,
}

impl CellRect {
    /// Number of rows covered.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.row_max - self.row_min + 1
    }

    /// Number of columns covered.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.col_max - self.col_min + 1
    }

    /// Grows the rectangle to include `(row, col)`.
    pub fn include(&mut self, row: usize, col: usize) {
        self.row_min = self.row_min.min(row);
        self.row_max = self.row_max.max(row);
        self.col_min = self.col_min.min(col);
        self.col_max = self.col_max.max(col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_arithmetic() {
        let a = Cell::new(4, 10);
        let b = Cell::new(1, -3);
        assert_eq!(a.add(b), Cell::new(5, 7));
        assert_eq!(a.sub(b), Cell::new(3, 13));
        assert_eq!(a.offset(-4, 0), Cell::new(0, 10));
    }

    #[test]
    fn midpoint_floors() {
        assert_eq!(Cell::new(0, 0).midpoint(Cell::new(3, 5)), Cell::new(1, 2));
        assert_eq!(Cell::new(-1, 0).midpoint(Cell::new(0, 0)), Cell::new(-1, 0));
    }

    #[test]
    fn rect_include_and_extent() {
        let mut r = CellRect {
            row_min: 2,
            row_max: 2,
            col_min: 5,
            col_max: 5,
        };
        r.include(0, 9);
        assert_eq!((r.rows(), r.cols()), (3, 5));
    }
}
