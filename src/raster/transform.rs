use super::Grid;

/// Resampling kernel used when a grid is rotated or rescaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Nearest neighbour; never produces fractional occupancy.
    Nearest,
    /// Bilinear.
    Linear,
}

/// Rotates a grid counter-clockwise (as displayed, rows down) by `degrees`
/// about its center.
///
/// With `reshape` the output is enlarged to hold the whole rotated input;
/// otherwise it keeps the input shape. Samples falling outside the input
/// read as `0.0`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn rotate(grid: &Grid<f64>, degrees: f64, interpolation: Interpolation, reshape: bool) -> Grid<f64> {
    let (rows, cols) = grid.dims();
    if rows == 0 || cols == 0 {
        return grid.clone();
    }
    let (s, c) = degrees.to_radians().sin_cos();
    let (out_rows, out_cols) = if reshape {
        let r = rows as f64;
        let k = cols as f64;
        (
            ((c.abs() * r + s.abs() * k) + 0.5) as usize,
            ((s.abs() * r + c.abs() * k) + 0.5) as usize,
        )
    } else {
        (rows, cols)
    };
    let out_rows = out_rows.max(1);
    let out_cols = out_cols.max(1);

    let in_center = ((rows as f64 - 1.0) / 2.0, (cols as f64 - 1.0) / 2.0);
    let out_center = ((out_rows as f64 - 1.0) / 2.0, (out_cols as f64 - 1.0) / 2.0);

    let mut out = Grid::filled(out_rows, out_cols, 0.0);
    for row in 0..out_rows {
        for col in 0..out_cols {
            let dr = row as f64 - out_center.0;
            let dc = col as f64 - out_center.1;
            let src_row = c * dr + s * dc + in_center.0;
            let src_col = c * dc - s * dr + in_center.1;
            out.set(row, col, sample(grid, src_row, src_col, interpolation));
        }
    }
    out
}

/// Rescales a grid by `factor` in both directions.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn rescale(grid: &Grid<f64>, factor: f64, interpolation: Interpolation) -> Grid<f64> {
    let (rows, cols) = grid.dims();
    let out_rows = ((rows as f64 * factor).round() as usize).max(1);
    let out_cols = ((cols as f64 * factor).round() as usize).max(1);
    let row_ratio = rows as f64 / out_rows as f64;
    let col_ratio = cols as f64 / out_cols as f64;

    let mut out = Grid::filled(out_rows, out_cols, 0.0);
    for row in 0..out_rows {
        for col in 0..out_cols {
            let src_row = (row as f64 + 0.5) * row_ratio - 0.5;
            let src_col = (col as f64 + 0.5) * col_ratio - 0.5;
            let src_row = src_row.clamp(0.0, rows as f64 - 1.0);
            let src_col = src_col.clamp(0.0, cols as f64 - 1.0);
            out.set(row, col, sample(grid, src_row, src_col, interpolation));
        }
    }
    out
}

/// Converts a binary mask to `0.0`/`1.0` for resampling.
#[must_use]
pub fn to_unit(mask: &Grid<bool>) -> Grid<f64> {
    mask.map(|v| if v { 1.0 } else { 0.0 })
}

/// Thresholds a resampled grid back into a binary mask.
#[must_use]
pub fn threshold(grid: &Grid<f64>, above: f64) -> Grid<bool> {
    grid.map(|v| v > above)
}

/// Maps a continuous `(row, col)` position of an `input` grid to where
/// [`rotate`] puts it in an output grid of `output` dims.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rotate_position(
    position: (f64, f64),
    input: (usize, usize),
    output: (usize, usize),
    degrees: f64,
) -> (f64, f64) {
    let (s, c) = degrees.to_radians().sin_cos();
    let sr = position.0 - (input.0 as f64 - 1.0) / 2.0;
    let sc = position.1 - (input.1 as f64 - 1.0) / 2.0;
    (
        c * sr - s * sc + (output.0 as f64 - 1.0) / 2.0,
        s * sr + c * sc + (output.1 as f64 - 1.0) / 2.0,
    )
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn sample(grid: &Grid<f64>, row: f64, col: f64, interpolation: Interpolation) -> f64 {
    const EDGE: f64 = 1e-9;
    let max_row = grid.rows() as f64 - 1.0;
    let max_col = grid.cols() as f64 - 1.0;
    if row < -0.5 - EDGE || col < -0.5 - EDGE || row > max_row + 0.5 + EDGE || col > max_col + 0.5 + EDGE {
        return 0.0;
    }
    match interpolation {
        Interpolation::Nearest => {
            let r = row.round().clamp(0.0, max_row) as usize;
            let c = col.round().clamp(0.0, max_col) as usize;
            grid.get(r, c).unwrap_or(0.0)
        }
        Interpolation::Linear => {
            let r0 = row.floor();
            let c0 = col.floor();
            let fr = row - r0;
            let fc = col - c0;
            let at = |r: f64, c: f64| -> f64 {
                if r < 0.0 || c < 0.0 || r > max_row || c > max_col {
                    0.0
                } else {
                    grid.get(r as usize, c as usize).unwrap_or(0.0)
                }
            };
            at(r0, c0) * (1.0 - fr) * (1.0 - fc)
                + at(r0, c0 + 1.0) * (1.0 - fr) * fc
                + at(r0 + 1.0, c0) * fr * (1.0 - fc)
                + at(r0 + 1.0, c0 + 1.0) * fr * fc
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn bar(rows: usize, cols: usize) -> Grid<f64> {
        Grid::filled(rows, cols, 1.0)
    }

    #[test]
    fn zero_rotation_is_identity() {
        let g = bar(4, 7);
        let out = rotate(&g, 0.0, Interpolation::Nearest, true);
        assert_eq!(out, g);
    }

    #[test]
    fn quarter_turn_swaps_dims() {
        let g = bar(20, 30);
        let out = rotate(&g, 90.0, Interpolation::Nearest, true);
        assert_eq!(out.dims(), (30, 20));
        assert_eq!(out.count(|v| v > 0.5), 600);
    }

    #[test]
    fn quarter_turn_is_counter_clockwise() {
        // A single marked cell on the right edge ends up on the top edge.
        let mut g = Grid::filled(3, 3, 0.0);
        g.set(1, 2, 1.0);
        let out = rotate(&g, 90.0, Interpolation::Nearest, false);
        assert_abs_diff_eq!(out[(0, 1)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn position_follows_rotation() {
        let (r, c) = rotate_position((1.0, 2.0), (3, 3), (3, 3), 90.0);
        assert_abs_diff_eq!(r, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn linear_rotation_keeps_shape_without_reshape() {
        let g = bar(9, 9);
        let out = rotate(&g, 30.0, Interpolation::Linear, false);
        assert_eq!(out.dims(), (9, 9));
        assert!(out[(4, 4)] > 0.99);
    }

    #[test]
    fn rescale_doubles_extent() {
        let g = bar(3, 5);
        let out = rescale(&g, 2.0, Interpolation::Linear);
        assert_eq!(out.dims(), (6, 10));
        for &v in out.as_slice() {
            assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn threshold_round_trip() {
        let mut mask = Grid::new(2, 2);
        mask.set(0, 1, true);
        assert_eq!(threshold(&to_unit(&mask), 0.5), mask);
    }
}
