use super::Cell;

/// Rasterizes the segment `start -> end` with Bresenham's algorithm.
///
/// Both endpoints are included and cells are returned in walking order, so
/// the first cell is always `start` and the last is always `end`.
#[must_use]
pub fn line_cells(start: Cell, end: Cell) -> Vec<Cell> {
    let d_row = (end.row - start.row).abs();
    let d_col = (end.col - start.col).abs();
    let step_row = if end.row >= start.row { 1 } else { -1 };
    let step_col = if end.col >= start.col { 1 } else { -1 };

    let capacity = usize::try_from(d_row.max(d_col) + 1).unwrap_or(1);
    let mut cells = Vec::with_capacity(capacity);

    let mut row = start.row;
    let mut col = start.col;
    let mut err = d_col - d_row;
    loop {
        cells.push(Cell::new(row, col));
        if row == end.row && col == end.col {
            break;
        }
        let e2 = 2 * err;
        if e2 > -d_row {
            err -= d_row;
            col += step_col;
        }
        if e2 < d_col {
            err += d_col;
            row += step_row;
        }
    }
    cells
}
