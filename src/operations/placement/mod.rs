//! Placement rules applied to objects on an occupancy canvas.

mod clamp;
mod gravity;
mod liquid;
mod overlap;
mod sheet_fit;

pub use clamp::{ClampToContainer, Trim};
pub use gravity::{
    Descent, DescentOutcome, DropUnderGravity, DEFAULT_DROP_STEP, DEFAULT_MAX_DROP_STEPS,
};
pub use liquid::{FillLiquid, LiquidFill};
pub use overlap::{Axes, Resolution, ResolveOverlap, DEFAULT_MAX_OVERLAP_ITERATIONS};
pub use sheet_fit::{FitSheetCurve, InflateSheet, SheetCurve};
