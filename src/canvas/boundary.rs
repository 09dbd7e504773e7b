use crate::error::{ConfigError, Result};
use crate::math::Cell;
use crate::raster::{Grid, Label, BACKGROUND};
use crate::shape::WALL_LABEL;

/// Interior of the container in canvas coordinates. `floor` and `right` are
/// exclusive: the floor row is the first wall row below the interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteriorBounds {
    pub top: i64,
    pub floor: i64,
    pub left: i64,
    pub right: i64,
}

impl InteriorBounds {
    #[must_use]
    pub fn height(&self) -> i64 {
        self.floor - self.top
    }

    #[must_use]
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        (self.top..self.floor).contains(&cell.row) && (self.left..self.right).contains(&cell.col)
    }
}

/// Static container geometry shared read-only by every slice.
#[derive(Debug, Clone)]
pub struct ContainerBoundary {
    walls: Grid<bool>,
    interior: InteriorBounds,
    wall_label: Label,
    prior: Option<Grid<Label>>,
    origin: Cell,
}

impl ContainerBoundary {
    /// Square container: an interior of `2 * half_extent` cells per side
    /// surrounded by walls `thickness` cells thick.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidInput` if `half_extent` is zero.
    pub fn square(half_extent: usize, thickness: usize) -> Result<Self> {
        if half_extent == 0 {
            return Err(ConfigError::InvalidInput("container half extent must be positive".into()).into());
        }
        let size = 2 * (half_extent + thickness);
        let mut walls = Grid::filled(size, size, true);
        for row in thickness..thickness + 2 * half_extent {
            for col in thickness..thickness + 2 * half_extent {
                walls.set(row, col, false);
            }
        }
        let t = to_i64(thickness);
        let side = to_i64(2 * half_extent);
        Ok(Self {
            walls,
            interior: InteriorBounds {
                top: t,
                floor: t + side,
                left: t,
                right: t + side,
            },
            wall_label: WALL_LABEL,
            prior: None,
            origin: Cell::default(),
        })
    }

    /// Container from an arbitrary wall mask. The interior bounds are the
    /// bounding box of `interior`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidInput` if the masks differ in shape or the
    /// interior is empty.
    pub fn from_masks(walls: Grid<bool>, interior: &Grid<bool>) -> Result<Self> {
        if walls.dims() != interior.dims() {
            return Err(ConfigError::InvalidInput(format!(
                "wall mask {:?} and interior mask {:?} differ in shape",
                walls.dims(),
                interior.dims()
            ))
            .into());
        }
        let rect = interior
            .foreground_bounds()
            .ok_or_else(|| ConfigError::InvalidInput("container interior is empty".into()))?;
        Ok(Self {
            walls,
            interior: InteriorBounds {
                top: to_i64(rect.row_min),
                floor: to_i64(rect.row_max + 1),
                left: to_i64(rect.col_min),
                right: to_i64(rect.col_max + 1),
            },
            wall_label: WALL_LABEL,
            prior: None,
            origin: Cell::default(),
        })
    }

    /// Adds pre-existing content. Its cells become static obstacles during
    /// placement and are written back into the output.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidInput` if `prior` differs in shape from the canvas.
    pub fn with_prior(mut self, prior: Grid<Label>) -> Result<Self> {
        if prior.dims() != self.walls.dims() {
            return Err(ConfigError::InvalidInput(format!(
                "prior image {:?} does not match canvas {:?}",
                prior.dims(),
                self.walls.dims()
            ))
            .into());
        }
        for (row, col, v) in prior.iter_cells() {
            if v != BACKGROUND {
                self.walls.set(row, col, true);
            }
        }
        self.prior = Some(prior);
        Ok(self)
    }

    /// Position of the canvas' top-left cell in the output image frame.
    #[must_use]
    pub fn with_origin(mut self, origin: Cell) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_wall_label(mut self, label: Label) -> Self {
        self.wall_label = label;
        self
    }

    /// `(rows, cols)` of the canvas.
    #[must_use]
    pub fn dims(&self) -> (usize, usize) {
        self.walls.dims()
    }

    #[must_use]
    pub fn interior(&self) -> InteriorBounds {
        self.interior
    }

    /// First wall row below the interior.
    #[must_use]
    pub fn floor(&self) -> i64 {
        self.interior.floor
    }

    #[must_use]
    pub fn wall_label(&self) -> Label {
        self.wall_label
    }

    #[must_use]
    pub fn origin(&self) -> Cell {
        self.origin
    }

    #[must_use]
    pub fn prior(&self) -> Option<&Grid<Label>> {
        self.prior.as_ref()
    }

    /// Static cells (walls and prior content).
    #[must_use]
    pub fn walls(&self) -> &Grid<bool> {
        &self.walls
    }

    /// Whether `(row, col)` is a static cell. Cells outside the canvas are.
    #[must_use]
    pub fn is_wall(&self, row: i64, col: i64) -> bool {
        self.walls.get_signed(row, col).unwrap_or(true)
    }
}

fn to_i64(v: usize) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}
