use super::Grid;

/// Disk-shaped structuring element of the given radius
/// (`(2r+1) x (2r+1)`, cells with `dr² + dc² <= r²`).
#[must_use]
pub fn disk(radius: usize) -> Grid<bool> {
    let side = 2 * radius + 1;
    let r = i64::try_from(radius).unwrap_or(i64::MAX / 4);
    let mut out = Grid::new(side, side);
    for row in 0..side {
        for col in 0..side {
            let dr = i64::try_from(row).unwrap_or(0) - r;
            let dc = i64::try_from(col).unwrap_or(0) - r;
            out.set(row, col, dr * dr + dc * dc <= r * r);
        }
    }
    out
}

/// Binary dilation with a centered structuring element. The output keeps
/// the input shape; pad first if growth past the border is wanted.
#[must_use]
pub fn dilate(mask: &Grid<bool>, element: &Grid<bool>) -> Grid<bool> {
    let offsets = element_offsets(element);
    let (rows, cols) = mask.dims();
    let mut out = Grid::new(rows, cols);
    for (row, col, v) in mask.iter_cells() {
        if !v {
            continue;
        }
        for &(dr, dc) in &offsets {
            if let Some((r, c)) = shifted(row, col, dr, dc, rows, cols) {
                out.set(r, c, true);
            }
        }
    }
    out
}

/// Binary erosion with a centered structuring element. Cells outside the
/// mask count as background, so the border is eroded too.
#[must_use]
pub fn erode(mask: &Grid<bool>, element: &Grid<bool>) -> Grid<bool> {
    let offsets = element_offsets(element);
    let (rows, cols) = mask.dims();
    let mut out = Grid::new(rows, cols);
    for (row, col, v) in mask.iter_cells() {
        if !v {
            continue;
        }
        let keep = offsets.iter().all(|&(dr, dc)| {
            shifted(row, col, dr, dc, rows, cols).is_some_and(|(r, c)| mask[(r, c)])
        });
        out.set(row, col, keep);
    }
    out
}

fn element_offsets(element: &Grid<bool>) -> Vec<(i64, i64)> {
    let center_r = i64::try_from(element.rows() / 2).unwrap_or(0);
    let center_c = i64::try_from(element.cols() / 2).unwrap_or(0);
    element
        .iter_cells()
        .filter(|&(_, _, v)| v)
        .map(|(r, c, _)| {
            (
                i64::try_from(r).unwrap_or(0) - center_r,
                i64::try_from(c).unwrap_or(0) - center_c,
            )
        })
        .collect()
}

fn shifted(row: usize, col: usize, dr: i64, dc: i64, rows: usize, cols: usize) -> Option<(usize, usize)> {
    let r = usize::try_from(i64::try_from(row).ok()? + dr).ok()?;
    let c = usize::try_from(i64::try_from(col).ok()? + dc).ok()?;
    (r < rows && c < cols).then_some((r, c))
}
