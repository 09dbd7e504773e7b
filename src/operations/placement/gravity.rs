use tracing::debug;

use super::{Axes, ClampToContainer, FitSheetCurve, InflateSheet, Resolution, ResolveOverlap};
use crate::canvas::OccupancyCanvas;
use crate::shape::ObjectInstance;

/// Default downward translation per step, in cells.
pub const DEFAULT_DROP_STEP: i64 = 50;

/// Default cap on descent steps.
pub const DEFAULT_MAX_DROP_STEPS: usize = 50;

/// How a descent ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescentOutcome {
    /// A sheet met content and was draped over it.
    Landed,
    /// The object reached the container floor.
    Floor,
    /// Collision handling pushed the object back to where the step began.
    Stalled,
    /// The collision resolver detected an oscillation.
    Oscillated,
    /// The step cap ran out while the object was still falling.
    Exhausted,
}

/// Result of [`DropUnderGravity::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descent {
    pub steps: usize,
    pub outcome: DescentOutcome,
}

/// Drops an object from its spawn pose in fixed steps, resolving collisions
/// after each step, then clamps it into the container and commits it.
///
/// Sheets stop falling as soon as an end touches content or the floor and
/// are draped with [`FitSheetCurve`] and [`InflateSheet`].
pub struct DropUnderGravity {
    drop_step: i64,
    max_drop_steps: usize,
    max_overlap_iterations: usize,
}

impl Default for DropUnderGravity {
    fn default() -> Self {
        Self::new()
    }
}

impl DropUnderGravity {
    #[must_use]
    pub fn new() -> Self {
        Self {
            drop_step: DEFAULT_DROP_STEP,
            max_drop_steps: DEFAULT_MAX_DROP_STEPS,
            max_overlap_iterations: super::DEFAULT_MAX_OVERLAP_ITERATIONS,
        }
    }

    #[must_use]
    pub fn with_drop_step(mut self, drop_step: i64) -> Self {
        self.drop_step = drop_step;
        self
    }

    #[must_use]
    pub fn with_max_drop_steps(mut self, max_drop_steps: usize) -> Self {
        self.max_drop_steps = max_drop_steps;
        self
    }

    #[must_use]
    pub fn with_max_overlap_iterations(mut self, max_overlap_iterations: usize) -> Self {
        self.max_overlap_iterations = max_overlap_iterations;
        self
    }

    pub fn execute(&self, canvas: &mut OccupancyCanvas<'_>, obj: &mut ObjectInstance) -> Descent {
        let descent = if obj.is_sheet() {
            self.drop_sheet(canvas, obj)
        } else {
            self.drop_solid(canvas, obj)
        };
        let trim = ClampToContainer::new(canvas.boundary().interior()).execute(obj);
        if !trim.is_empty() {
            debug!(label = obj.label(), ?trim, "object trimmed to the container");
        }
        canvas.commit(obj);
        debug!(
            label = obj.label(),
            steps = descent.steps,
            outcome = ?descent.outcome,
            pose = ?obj.pose,
            "object placed"
        );
        descent
    }

    fn drop_solid(&self, canvas: &OccupancyCanvas<'_>, obj: &mut ObjectInstance) -> Descent {
        let floor = canvas.boundary().floor();
        let resolver = ResolveOverlap::new(Axes::BOTH).with_max_iterations(self.max_overlap_iterations);

        for step in 1..=self.max_drop_steps {
            let before = obj.pose;
            obj.pose = obj.pose.offset(self.drop_step, 0);

            if obj.bottom() >= floor {
                obj.pose.row = floor - obj.height();
                if !canvas.overlap(obj).is_empty() {
                    ResolveOverlap::new(Axes::COLS)
                        .with_max_iterations(self.max_overlap_iterations)
                        .execute(canvas, obj);
                }
                return Descent {
                    steps: step,
                    outcome: DescentOutcome::Floor,
                };
            }

            let mut resolution = Resolution::Resolved;
            for _ in 0..self.max_overlap_iterations {
                if canvas.overlap(obj).is_empty() {
                    break;
                }
                resolution = resolver.execute(canvas, obj);
                if matches!(resolution, Resolution::Oscillating | Resolution::Floored) {
                    break;
                }
            }

            if resolution == Resolution::Oscillating {
                return Descent {
                    steps: step,
                    outcome: DescentOutcome::Oscillated,
                };
            }
            if obj.pose == before {
                return Descent {
                    steps: step,
                    outcome: DescentOutcome::Stalled,
                };
            }
        }
        debug!(label = obj.label(), "descent step cap reached");
        Descent {
            steps: self.max_drop_steps,
            outcome: DescentOutcome::Exhausted,
        }
    }

    fn drop_sheet(&self, canvas: &OccupancyCanvas<'_>, obj: &mut ObjectInstance) -> Descent {
        let floor = canvas.boundary().floor();
        for step in 1..=self.max_drop_steps {
            obj.pose = obj.pose.offset(self.drop_step, 0);
            let Some(ends) = obj.absolute_curve_points() else {
                break;
            };
            let on_floor = ends.iter().any(|p| p.row >= floor);
            let touching = ends.iter().any(|&p| canvas.holds_content(p));
            if on_floor || touching {
                FitSheetCurve::new().execute(canvas, obj).apply(obj);
                InflateSheet::for_object(obj).execute(canvas, obj);
                return Descent {
                    steps: step,
                    outcome: if on_floor {
                        DescentOutcome::Floor
                    } else {
                        DescentOutcome::Landed
                    },
                };
            }
        }
        Descent {
            steps: self.max_drop_steps,
            outcome: DescentOutcome::Exhausted,
        }
    }
}
