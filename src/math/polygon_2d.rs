use super::{Point2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise in `x`/`y`, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Even-odd point-in-polygon test. Points on an edge count as inside.
#[must_use]
pub fn contains_point(polygon: &[Point2], p: &Point2) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if on_segment(&a, &b, p) {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn on_segment(a: &Point2, b: &Point2, p: &Point2) -> bool {
    let ab = b - a;
    let ap = p - a;
    let cross = ab.x * ap.y - ab.y * ap.x;
    if cross.abs() > TOLERANCE * ab.norm().max(1.0) {
        return false;
    }
    let dot = ab.dot(&ap);
    dot >= -TOLERANCE && dot <= ab.norm_squared() + TOLERANCE
}

/// Returns every `(row, col)` cell of a `rows x cols` grid whose center lies
/// inside `polygon` (`x` = column, `y` = row).
#[must_use]
pub fn fill_polygon(polygon: &[Point2], rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    if polygon.len() < 3 {
        return cells;
    }
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in polygon {
        y_min = y_min.min(p.y);
        y_max = y_max.max(p.y);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let first_row = y_min.ceil().max(0.0) as usize;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let last_row = (y_max.floor().max(-1.0) + 1.0) as usize;

    for row in first_row..last_row.min(rows) {
        for col in 0..cols {
            #[allow(clippy::cast_precision_loss)]
            let p = Point2::new(col as f64, row as f64);
            if contains_point(polygon, &p) {
                cells.push((row, col));
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ]
    }

    #[test]
    fn signed_area_orientation() {
        let pts = square();
        assert!((signed_area_2d(&pts) - 16.0).abs() < TOLERANCE);
        let rev: Vec<Point2> = pts.into_iter().rev().collect();
        assert!((signed_area_2d(&rev) + 16.0).abs() < TOLERANCE);
        assert!(signed_area_2d(&[Point2::origin()]).abs() < TOLERANCE);
    }

    #[test]
    fn contains_interior_edge_and_exterior() {
        let pts = square();
        assert!(contains_point(&pts, &Point2::new(2.0, 2.0)));
        assert!(contains_point(&pts, &Point2::new(0.0, 2.0)));
        assert!(contains_point(&pts, &Point2::new(4.0, 4.0)));
        assert!(!contains_point(&pts, &Point2::new(4.5, 2.0)));
    }

    #[test]
    fn fill_square_includes_boundary_cells() {
        let cells = fill_polygon(&square(), 10, 10);
        assert_eq!(cells.len(), 25);
        assert!(cells.contains(&(0, 0)));
        assert!(cells.contains(&(4, 4)));
    }

    #[test]
    fn fill_is_clipped_to_grid() {
        let cells = fill_polygon(&square(), 3, 2);
        assert_eq!(cells.len(), 6);
    }
}
