use slotmap::SlotMap;
use tracing::{debug, info, warn};

use super::config::{PlacementMode, SessionConfig};
use super::record::ObjectRecord;
use crate::canvas::{ContainerBoundary, OccupancyCanvas};
use crate::error::Result;
use crate::math::{Cell, Rng64};
use crate::operations::placement::{
    Axes, ClampToContainer, DropUnderGravity, FillLiquid, ResolveOverlap,
};
use crate::raster::{Grid, Label};
use crate::shape::ObjectInstance;

slotmap::new_key_type! {
    /// Unique identifier for an object placed in a slice.
    pub struct ObjectId;
}

/// Everything one slice produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceOutput {
    pub index: usize,
    /// Final label image, void cleared and prior content restored.
    pub labels: Grid<Label>,
    /// One record per object, in placement order.
    pub records: Vec<ObjectRecord>,
}

/// Places one copy of every template into a fresh canvas.
///
/// Every object spawns with its whole raster inside the columns
/// `[left, right - col_margin)`. Spawn columns and placement order come from
/// an RNG derived from the configured seed and the slice index. Only the
/// boundary is shared.
pub struct SliceSession<'a> {
    index: usize,
    config: &'a SessionConfig,
    canvas: OccupancyCanvas<'a>,
    objects: SlotMap<ObjectId, ObjectInstance>,
    order: Vec<ObjectId>,
}

impl<'a> SliceSession<'a> {
    /// Clones every template into the session and gives each a spawn pose.
    #[must_use]
    pub fn new(
        index: usize,
        config: &'a SessionConfig,
        boundary: &'a ContainerBoundary,
        templates: &[ObjectInstance],
    ) -> Self {
        let mut rng = Rng64::derive(config.seed, index as u64);
        let interior = boundary.interior();
        let spawn_row = interior.top + config.spawn.row_offset;

        let mut objects = SlotMap::with_key();
        let mut order = Vec::with_capacity(templates.len());
        for template in templates {
            let mut obj = template.clone_for_slice();
            // Last column whose raster still ends inside the spawn range.
            let col_end = interior.right - config.spawn.col_margin - obj.width() + 1;
            obj.pose = Cell::new(spawn_row, rng.range_i64(interior.left, col_end));
            order.push(objects.insert(obj));
        }
        rng.shuffle(&mut order);

        Self {
            index,
            config,
            canvas: OccupancyCanvas::new(boundary),
            objects,
            order,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Objects in placement order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &ObjectInstance)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.objects.get(id).map(|obj| (id, obj)))
    }

    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&ObjectInstance> {
        self.objects.get(id)
    }

    #[must_use]
    pub fn canvas(&self) -> &OccupancyCanvas<'a> {
        &self.canvas
    }

    /// Places every object, fills liquids and renders the slice.
    ///
    /// # Errors
    ///
    /// Returns `PlacementError::Frame` if an object's record cannot be built.
    pub fn execute(mut self) -> Result<SliceOutput> {
        for &id in &self.order {
            let Some(obj) = self.objects.get_mut(id) else {
                continue;
            };
            place(self.config, &mut self.canvas, obj);
        }
        self.fill_liquids();

        let origin = self.canvas.boundary().origin();
        let records = self
            .order
            .iter()
            .filter_map(|&id| self.objects.get(id))
            .map(|obj| ObjectRecord::from_instance(obj, origin))
            .collect::<Result<Vec<_>>>()?;

        let labels = self.canvas.into_output();
        info!(
            slice = self.index,
            objects = records.len(),
            "slice finished"
        );
        Ok(SliceOutput {
            index: self.index,
            labels,
            records,
        })
    }

    fn fill_liquids(&mut self) {
        for &id in &self.order {
            let Some(obj) = self.objects.get_mut(id) else {
                continue;
            };
            let Some(spec) = obj.liquid().cloned() else {
                continue;
            };
            match FillLiquid::new(&spec).execute(obj) {
                Ok(fill) => {
                    self.canvas.commit(obj);
                    debug!(label = obj.label(), liquid = spec.label, ?fill, "liquid filled");
                }
                Err(err) => {
                    warn!(label = obj.label(), %err, "liquid fill skipped");
                }
            }
        }
    }
}

fn place(config: &SessionConfig, canvas: &mut OccupancyCanvas<'_>, obj: &mut ObjectInstance) {
    match config.placement {
        PlacementMode::Gravity => {
            DropUnderGravity::new()
                .with_drop_step(config.drop_step)
                .with_max_drop_steps(config.max_drop_steps)
                .with_max_overlap_iterations(config.max_overlap_iterations)
                .execute(canvas, obj);
        }
        PlacementMode::OverlapOnly => {
            let resolution = ResolveOverlap::new(Axes::BOTH)
                .with_max_iterations(config.max_overlap_iterations)
                .execute(canvas, obj);
            debug!(label = obj.label(), ?resolution, "overlap resolved in place");
            ClampToContainer::new(canvas.boundary().interior()).execute(obj);
            canvas.commit(obj);
        }
        PlacementMode::Stamp => {
            ClampToContainer::new(canvas.boundary().interior()).execute(obj);
            canvas.commit(obj);
        }
    }
}
