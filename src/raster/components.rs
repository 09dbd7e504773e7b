use std::collections::VecDeque;

use super::Grid;
use crate::math::CellRect;

/// Connected components of a binary mask (8-connectivity).
#[derive(Debug, Clone)]
pub struct Components {
    /// Component index per cell, `0` for background. Indices start at 1 and
    /// follow the raster order of each component's first cell.
    pub labels: Grid<u32>,
    /// Cell count per component; `sizes[i]` belongs to index `i + 1`.
    pub sizes: Vec<usize>,
}

impl Components {
    /// Labels the set cells of `mask`.
    #[must_use]
    pub fn label(mask: &Grid<bool>) -> Self {
        let (rows, cols) = mask.dims();
        let mut labels: Grid<u32> = Grid::new(rows, cols);
        let mut sizes = Vec::new();
        let mut queue = VecDeque::new();

        for (row, col, v) in mask.iter_cells() {
            if !v || labels[(row, col)] != 0 {
                continue;
            }
            let id = u32::try_from(sizes.len() + 1).unwrap_or(u32::MAX);
            let mut size = 0;
            labels.set(row, col, id);
            queue.push_back((row, col));
            while let Some((r, c)) = queue.pop_front() {
                size += 1;
                for (nr, nc) in neighbours(r, c, rows, cols) {
                    if mask[(nr, nc)] && labels[(nr, nc)] == 0 {
                        labels.set(nr, nc, id);
                        queue.push_back((nr, nc));
                    }
                }
            }
            sizes.push(size);
        }
        Self { labels, sizes }
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Index of the largest component. Equal sizes resolve to the first
    /// encountered component.
    #[must_use]
    pub fn largest(&self) -> Option<u32> {
        let mut best: Option<(usize, usize)> = None;
        for (i, &size) in self.sizes.iter().enumerate() {
            if best.is_none_or(|(_, s)| size > s) {
                best = Some((i, size));
            }
        }
        best.and_then(|(i, _)| u32::try_from(i + 1).ok())
    }

    /// Bounding rectangle of component `id`.
    #[must_use]
    pub fn bounds(&self, id: u32) -> Option<CellRect> {
        self.labels.bounds_where(|v| v == id)
    }
}

fn neighbours(row: usize, col: usize, rows: usize, cols: usize) -> impl Iterator<Item = (usize, usize)> {
    let r0 = row.saturating_sub(1);
    let c0 = col.saturating_sub(1);
    let r1 = (row + 1).min(rows - 1);
    let c1 = (col + 1).min(cols - 1);
    (r0..=r1)
        .flat_map(move |r| (c0..=c1).map(move |c| (r, c)))
        .filter(move |&(r, c)| (r, c) != (row, col))
}
